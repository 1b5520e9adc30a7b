use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::whisky::{ReorderRequest, ReorderResponse, WhiskyInput, WhiskySummary},
    error::AppError,
    services::whisky_service,
    state::SharedState,
};

/// Routes handling the host's whisky lineup.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions/{id}/whiskies", post(add_whisky))
        .route("/sessions/{id}/whiskies/{whisky_id}", put(update_whisky))
        .route(
            "/sessions/{id}/whiskies/{whisky_id}/reorder",
            post(reorder_whisky),
        )
}

/// Append a whisky to the session's lineup.
#[utoipa::path(
    post,
    path = "/sessions/{id}/whiskies",
    tag = "whisky",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = WhiskyInput,
    responses(
        (status = 200, description = "Whisky added at the end of the lineup", body = WhiskySummary),
        (status = 404, description = "Session does not exist"),
        (status = 409, description = "Session is no longer in waiting status")
    )
)]
pub async fn add_whisky(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WhiskyInput>,
) -> Result<Json<WhiskySummary>, AppError> {
    payload.validate()?;
    let summary = whisky_service::add_whisky(&state, id, payload.into()).await?;
    Ok(Json(summary))
}

/// Replace a whisky's attributes.
#[utoipa::path(
    put,
    path = "/sessions/{id}/whiskies/{whisky_id}",
    tag = "whisky",
    params(
        ("id" = Uuid, Path, description = "Identifier of the session"),
        ("whisky_id" = Uuid, Path, description = "Identifier of the whisky")
    ),
    request_body = WhiskyInput,
    responses(
        (status = 200, description = "Whisky updated", body = WhiskySummary),
        (status = 404, description = "Session or whisky does not exist"),
        (status = 409, description = "Session is no longer in waiting status")
    )
)]
pub async fn update_whisky(
    State(state): State<SharedState>,
    Path((id, whisky_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<WhiskyInput>,
) -> Result<Json<WhiskySummary>, AppError> {
    payload.validate()?;
    let summary = whisky_service::update_whisky(&state, id, whisky_id, payload.into()).await?;
    Ok(Json(summary))
}

/// Move a whisky one position up or down the tasting order.
#[utoipa::path(
    post,
    path = "/sessions/{id}/whiskies/{whisky_id}/reorder",
    tag = "whisky",
    params(
        ("id" = Uuid, Path, description = "Identifier of the session"),
        ("whisky_id" = Uuid, Path, description = "Identifier of the whisky to move")
    ),
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Positions swapped with the neighbour", body = ReorderResponse),
        (status = 400, description = "Whisky is already at the edge of the lineup"),
        (status = 404, description = "Session or whisky does not exist"),
        (status = 409, description = "Session is no longer in waiting status")
    )
)]
pub async fn reorder_whisky(
    State(state): State<SharedState>,
    Path((id, whisky_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<ReorderResponse>, AppError> {
    let response =
        whisky_service::reorder_whisky(&state, id, whisky_id, payload.direction).await?;
    Ok(Json(response))
}
