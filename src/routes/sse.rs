use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, services::feed_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sessions/{id}/events",
    tag = "feed",
    params(("id" = Uuid, Path, description = "Identifier of the session to follow")),
    responses(
        (status = 200, description = "Per-session SSE feed", content_type = "text/event-stream", body = String),
        (status = 404, description = "Session does not exist")
    )
)]
/// Stream row-level change events of one session to connected clients.
pub async fn session_events(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let subscription = feed_service::subscribe(&state, id).await?;
    info!(session_id = %id, "new session feed connection");
    Ok(feed_service::to_sse_stream(state, subscription))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sessions/{id}/events", get(session_events))
}
