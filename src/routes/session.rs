use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::session::{
        AdvanceStatusRequest, CreateSessionRequest, JoinSessionRequest, JoinSessionResponse,
        SessionAggregateResponse, SessionSummary,
    },
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Routes handling session creation, joining, and lifecycle.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/join", post(join_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/status", post(advance_status))
}

/// Create a fresh tasting session with a generated join code.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "session",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = SessionSummary),
        (status = 401, description = "Host account is disabled")
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    payload.validate()?;
    let summary = session_service::create_session(&state, payload).await?;
    Ok(Json(summary))
}

/// Join an existing session by its code.
#[utoipa::path(
    post,
    path = "/sessions/join",
    tag = "session",
    request_body = JoinSessionRequest,
    responses(
        (status = 200, description = "Joined the session", body = JoinSessionResponse),
        (status = 404, description = "No session with that code"),
        (status = 401, description = "Participant account is disabled")
    )
)]
pub async fn join_session(
    State(state): State<SharedState>,
    Json(payload): Json<JoinSessionRequest>,
) -> Result<Json<JoinSessionResponse>, AppError> {
    payload.validate()?;
    let response = session_service::join_session(&state, payload).await?;
    Ok(Json(response))
}

/// Fetch the full session graph.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    tag = "session",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    responses(
        (status = 200, description = "The session and everything in it", body = SessionAggregateResponse),
        (status = 404, description = "Session does not exist")
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionAggregateResponse>, AppError> {
    let aggregate = session_service::get_aggregate(&state, id).await?;
    Ok(Json(aggregate))
}

/// Advance the session to the next lifecycle status.
#[utoipa::path(
    post,
    path = "/sessions/{id}/status",
    tag = "session",
    params(("id" = Uuid, Path, description = "Identifier of the session")),
    request_body = AdvanceStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = SessionSummary),
        (status = 404, description = "Session does not exist"),
        (status = 409, description = "Not a legal forward step from the current status")
    )
)]
pub async fn advance_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceStatusRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = session_service::advance_status(&state, id, payload).await?;
    Ok(Json(summary))
}
