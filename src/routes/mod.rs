//! HTTP route trees composed into the application router.

use axum::Router;

use crate::state::SharedState;

/// Account administration endpoints.
pub mod account;
/// Swagger UI and OpenAPI document.
pub mod docs;
/// Healthcheck endpoint.
pub mod health;
/// Region and distillery reference endpoints.
pub mod reference;
/// Session creation, joining, and lifecycle endpoints.
pub mod session;
/// Per-session SSE feed endpoint.
pub mod sse;
/// Guess submission endpoint.
pub mod submission;
/// Whisky lineup endpoints.
pub mod whisky;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(session::router())
        .merge(whisky::router())
        .merge(submission::router())
        .merge(reference::router())
        .merge(account::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
