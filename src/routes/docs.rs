use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Serve the interactive API documentation.
///
/// Swagger UI lives at `/docs` and the generated OpenAPI document at
/// `/api-doc/openapi.json`.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}
