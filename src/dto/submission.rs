use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{BottlingType, GuessFields, SubmissionEntity},
    dto::{format_system_time, validation::validate_abv},
};

/// The guessed attributes carried by a submit request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GuessInput {
    /// Guessed bottle name.
    #[validate(length(min = 1, max = 120))]
    pub guessed_name: String,
    /// Rating of the dram, 0-5.
    #[validate(range(max = 5))]
    pub guessed_score: u8,
    /// Guessed age statement, optional.
    #[validate(range(max = 100))]
    pub guessed_age: Option<u32>,
    /// Guessed alcohol by volume, percent.
    #[validate(custom(function = validate_abv))]
    pub guessed_abv: f64,
    /// Guessed region name.
    #[validate(length(min = 1, max = 64))]
    pub guessed_region: String,
    /// Guessed distillery name.
    #[validate(length(min = 1, max = 64))]
    pub guessed_distillery: String,
    /// Guessed category.
    #[validate(length(min = 1, max = 64))]
    pub guessed_category: String,
    /// Guessed bottling type.
    #[serde(default)]
    pub guessed_bottling_type: BottlingType,
}

impl From<GuessInput> for GuessFields {
    fn from(input: GuessInput) -> Self {
        Self {
            guessed_name: input.guessed_name,
            guessed_score: input.guessed_score,
            guessed_age: input.guessed_age,
            guessed_abv: input.guessed_abv,
            guessed_region: input.guessed_region,
            guessed_distillery: input.guessed_distillery,
            guessed_category: input.guessed_category,
            guessed_bottling_type: input.guessed_bottling_type,
        }
    }
}

/// Request body for submitting or revising a guess.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitGuessRequest {
    /// The participant submitting the guess.
    pub participant_id: Uuid,
    /// The guessed attributes.
    #[validate(nested)]
    pub guess: GuessInput,
}

/// Projection of a submission row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionSummary {
    /// Submission identifier.
    pub id: Uuid,
    /// Participant who guessed.
    pub participant_id: Uuid,
    /// Whisky the guess is about.
    pub whisky_id: Uuid,
    /// Guessed bottle name.
    pub guessed_name: String,
    /// Rating of the dram, 0-5.
    pub guessed_score: u8,
    /// Guessed age statement.
    pub guessed_age: Option<u32>,
    /// Guessed alcohol by volume, percent.
    pub guessed_abv: f64,
    /// Guessed region name.
    pub guessed_region: String,
    /// Guessed distillery name.
    pub guessed_distillery: String,
    /// Guessed category.
    pub guessed_category: String,
    /// Guessed bottling type.
    pub guessed_bottling_type: BottlingType,
    /// RFC3339 first-submit timestamp.
    pub created_at: String,
    /// RFC3339 timestamp of the latest revision.
    pub updated_at: String,
}

impl From<&SubmissionEntity> for SubmissionSummary {
    fn from(submission: &SubmissionEntity) -> Self {
        Self {
            id: submission.id,
            participant_id: submission.participant_id,
            whisky_id: submission.whisky_id,
            guessed_name: submission.guess.guessed_name.clone(),
            guessed_score: submission.guess.guessed_score,
            guessed_age: submission.guess.guessed_age,
            guessed_abv: submission.guess.guessed_abv,
            guessed_region: submission.guess.guessed_region.clone(),
            guessed_distillery: submission.guess.guessed_distillery.clone(),
            guessed_category: submission.guess.guessed_category.clone(),
            guessed_bottling_type: submission.guess.guessed_bottling_type,
            created_at: format_system_time(submission.created_at),
            updated_at: format_system_time(submission.updated_at),
        }
    }
}

/// Response returned when a guess was stored.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitGuessResponse {
    /// The stored row, after the upsert.
    pub submission: SubmissionSummary,
    /// Whether the row was created rather than revised.
    pub created: bool,
    /// Next whisky in tasting order the participant has not guessed yet.
    pub next_whisky_id: Option<Uuid>,
}
