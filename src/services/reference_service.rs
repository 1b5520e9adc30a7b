use uuid::Uuid;

use crate::{
    dto::reference::{DistillerySummary, RegionSummary},
    error::ServiceError,
    state::SharedState,
};

/// All whisky production regions, sorted by name.
pub async fn list_regions(state: &SharedState) -> Result<Vec<RegionSummary>, ServiceError> {
    let store = state.require_session_store().await?;
    let regions = store.list_regions().await?;
    Ok(regions.iter().map(Into::into).collect())
}

/// Distilleries of one region, sorted by name.
///
/// A pure function of the region id; an unknown region yields an empty list
/// rather than an error, mirroring a cascading form reset.
pub async fn distilleries_by_region(
    state: &SharedState,
    region_id: Uuid,
) -> Result<Vec<DistillerySummary>, ServiceError> {
    let store = state.require_session_store().await?;
    let distilleries = store.distilleries_by_region(region_id).await?;
    Ok(distilleries.iter().map(Into::into).collect())
}
