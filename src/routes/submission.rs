use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        reveal::RevealResponse,
        submission::{SubmitGuessRequest, SubmitGuessResponse},
    },
    error::AppError,
    services::{reveal_service, submission_service},
    state::SharedState,
};

/// Routes handling guess submission and the reveal view.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/sessions/{id}/whiskies/{whisky_id}/submissions",
            post(submit_guess),
        )
        .route("/sessions/{id}/reveal", get(reveal))
}

/// Submit or revise a guess for a whisky.
#[utoipa::path(
    post,
    path = "/sessions/{id}/whiskies/{whisky_id}/submissions",
    tag = "submission",
    params(
        ("id" = Uuid, Path, description = "Identifier of the session"),
        ("whisky_id" = Uuid, Path, description = "Identifier of the guessed whisky")
    ),
    request_body = SubmitGuessRequest,
    responses(
        (status = 200, description = "Guess stored", body = SubmitGuessResponse),
        (status = 404, description = "Session, whisky, or participant does not exist"),
        (status = 409, description = "Session is not collecting guesses")
    )
)]
pub async fn submit_guess(
    State(state): State<SharedState>,
    Path((id, whisky_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SubmitGuessRequest>,
) -> Result<Json<SubmitGuessResponse>, AppError> {
    payload.validate()?;
    let response = submission_service::submit_guess(&state, id, whisky_id, payload).await?;
    Ok(Json(response))
}

/// Query parameters accepted by the reveal view.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RevealQuery {
    /// Participant whose guesses should be flagged as the viewer's own.
    pub participant_id: Option<Uuid>,
}

/// Fetch the comparison view of truths and guesses.
#[utoipa::path(
    get,
    path = "/sessions/{id}/reveal",
    tag = "submission",
    params(
        ("id" = Uuid, Path, description = "Identifier of the session"),
        RevealQuery
    ),
    responses(
        (status = 200, description = "Whiskies with every guess about them", body = RevealResponse),
        (status = 404, description = "Session does not exist"),
        (status = 409, description = "Session is not revealed yet")
    )
)]
pub async fn reveal(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RevealQuery>,
) -> Result<Json<RevealResponse>, AppError> {
    let response = reveal_service::reveal(&state, id, query.participant_id).await?;
    Ok(Json(response))
}
