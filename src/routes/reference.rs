use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::reference::{DistillerySummary, RegionSummary},
    error::AppError,
    services::reference_service,
    state::SharedState,
};

/// Routes serving the read-only whisky reference data.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/regions", get(list_regions))
        .route("/regions/{id}/distilleries", get(list_distilleries))
}

/// List all whisky production regions.
#[utoipa::path(
    get,
    path = "/regions",
    tag = "reference",
    responses((status = 200, description = "All regions, sorted by name", body = [RegionSummary]))
)]
pub async fn list_regions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<RegionSummary>>, AppError> {
    let regions = reference_service::list_regions(&state).await?;
    Ok(Json(regions))
}

/// List the distilleries of one region.
#[utoipa::path(
    get,
    path = "/regions/{id}/distilleries",
    tag = "reference",
    params(("id" = Uuid, Path, description = "Identifier of the region")),
    responses(
        (status = 200, description = "Distilleries of the region, sorted by name", body = [DistillerySummary])
    )
)]
pub async fn list_distilleries(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DistillerySummary>>, AppError> {
    let distilleries = reference_service::distilleries_by_region(&state, id).await?;
    Ok(Json(distilleries))
}
