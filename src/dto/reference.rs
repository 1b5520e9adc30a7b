use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{DistilleryEntity, RegionEntity};

/// A whisky production region.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegionSummary {
    /// Region identifier.
    pub id: Uuid,
    /// Region name.
    pub name: String,
}

impl From<&RegionEntity> for RegionSummary {
    fn from(region: &RegionEntity) -> Self {
        Self {
            id: region.id,
            name: region.name.clone(),
        }
    }
}

/// A distillery within a region.
#[derive(Debug, Serialize, ToSchema)]
pub struct DistillerySummary {
    /// Distillery identifier.
    pub id: Uuid,
    /// Distillery name.
    pub name: String,
    /// Region the distillery belongs to.
    pub region_id: Uuid,
}

impl From<&DistilleryEntity> for DistillerySummary {
    fn from(distillery: &DistilleryEntity) -> Self {
        Self {
            id: distillery.id,
            name: distillery.name.clone(),
            region_id: distillery.region_id,
        }
    }
}
