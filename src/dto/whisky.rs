use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{BottlingType, WhiskyEntity, WhiskyFields},
    dto::{format_system_time, validation::validate_abv},
};

/// Request body for adding or editing a whisky in the lineup.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WhiskyInput {
    /// Bottle name as printed on the label.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Age statement in years, absent for NAS bottlings.
    #[validate(range(max = 100))]
    pub age: Option<u32>,
    /// Alcohol by volume, percent.
    #[validate(custom(function = validate_abv))]
    pub abv: f64,
    /// Production region name.
    #[validate(length(min = 1, max = 64))]
    pub region: String,
    /// Distillery name.
    #[validate(length(min = 1, max = 64))]
    pub distillery: String,
    /// Free-form category (single malt, blend, ...).
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    /// Independent or original bottling.
    #[serde(default)]
    pub bottling_type: BottlingType,
    /// Cask description, when known.
    pub cask_type: Option<String>,
    /// Host's own rating, 0-5.
    #[validate(range(max = 5))]
    pub host_score: Option<u8>,
    /// Link to the bottle's Whiskybase page.
    #[validate(url)]
    pub whiskybase_link: Option<String>,
    /// Host's private tasting notes reference.
    pub tasting_reference: Option<String>,
}

impl From<WhiskyInput> for WhiskyFields {
    fn from(input: WhiskyInput) -> Self {
        Self {
            name: input.name,
            age: input.age,
            abv: input.abv,
            region: input.region,
            distillery: input.distillery,
            category: input.category,
            bottling_type: input.bottling_type,
            cask_type: input.cask_type,
            host_score: input.host_score,
            whiskybase_link: input.whiskybase_link,
            tasting_reference: input.tasting_reference,
        }
    }
}

/// Which way to move a whisky in the tasting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    /// Towards the front of the lineup.
    Up,
    /// Towards the back of the lineup.
    Down,
}

/// Request body for moving a whisky one position in the lineup.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderRequest {
    /// Direction to move the whisky in.
    pub direction: ReorderDirection,
}

/// Projection of a whisky row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WhiskySummary {
    /// Whisky identifier.
    pub id: Uuid,
    /// Position in the tasting order.
    pub order_index: u32,
    /// Bottle name.
    pub name: String,
    /// Age statement, if any.
    pub age: Option<u32>,
    /// Alcohol by volume, percent.
    pub abv: f64,
    /// Production region name.
    pub region: String,
    /// Distillery name.
    pub distillery: String,
    /// Category.
    pub category: String,
    /// Independent or original bottling.
    pub bottling_type: BottlingType,
    /// Cask description, when known.
    pub cask_type: Option<String>,
    /// Host's own rating, 0-5.
    pub host_score: Option<u8>,
    /// Link to the bottle's Whiskybase page.
    pub whiskybase_link: Option<String>,
    /// Host's private tasting notes reference.
    pub tasting_reference: Option<String>,
    /// RFC3339 creation timestamp.
    pub created_at: String,
}

impl From<&WhiskyEntity> for WhiskySummary {
    fn from(whisky: &WhiskyEntity) -> Self {
        Self {
            id: whisky.id,
            order_index: whisky.order_index,
            name: whisky.fields.name.clone(),
            age: whisky.fields.age,
            abv: whisky.fields.abv,
            region: whisky.fields.region.clone(),
            distillery: whisky.fields.distillery.clone(),
            category: whisky.fields.category.clone(),
            bottling_type: whisky.fields.bottling_type,
            cask_type: whisky.fields.cask_type.clone(),
            host_score: whisky.fields.host_score,
            whiskybase_link: whisky.fields.whiskybase_link.clone(),
            tasting_reference: whisky.fields.tasting_reference.clone(),
            created_at: format_system_time(whisky.created_at),
        }
    }
}

/// Response returned by the reorder operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReorderResponse {
    /// The whisky the client asked to move, at its new position.
    pub moved: WhiskySummary,
    /// The neighbour it swapped places with.
    pub displaced: WhiskySummary,
}
