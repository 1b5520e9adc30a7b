use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{
    session::SessionSummary, submission::SubmissionSummary, whisky::WhiskySummary,
};

/// One participant's guess in the comparison view.
#[derive(Debug, Serialize, ToSchema)]
pub struct RevealedGuess {
    /// Participant who guessed.
    pub participant_id: Uuid,
    /// Display name of the participant.
    pub participant_name: String,
    /// Whether this guess belongs to the requesting viewer.
    pub is_viewer: bool,
    /// The guess row.
    pub submission: SubmissionSummary,
}

/// A whisky with its true attributes next to every guess about it.
#[derive(Debug, Serialize, ToSchema)]
pub struct RevealedWhisky {
    /// The bottle, truths included.
    pub whisky: WhiskySummary,
    /// Every guess submitted for this whisky, in submit order.
    pub guesses: Vec<RevealedGuess>,
}

/// The comparison view, available once the session is revealed.
#[derive(Debug, Serialize, ToSchema)]
pub struct RevealResponse {
    /// The session row.
    pub session: SessionSummary,
    /// Whiskies in tasting order, each with its guesses.
    pub whiskies: Vec<RevealedWhisky>,
}
