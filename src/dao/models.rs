use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::state::lifecycle::SessionStatus;

/// Whether a bottle is an independent or original bottling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
pub enum BottlingType {
    /// Independent bottling.
    #[serde(rename = "IB")]
    Ib,
    /// Original (distillery) bottling.
    #[serde(rename = "OB")]
    #[default]
    Ob,
}

impl BottlingType {
    /// Serialized wire form of the variant.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ib => "IB",
            Self::Ob => "OB",
        }
    }
}

/// Root row of a tasting session's object graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionEntity {
    /// Stable identifier for the session.
    pub id: Uuid,
    /// Short human-enterable join code, stored uppercased.
    pub code: String,
    /// Display name of the host.
    pub host_name: String,
    /// Identity of the host account, when the host is signed in.
    pub host_user_id: Option<Uuid>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last time the session row itself was updated.
    pub updated_at: SystemTime,
}

/// A non-host attendee of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantEntity {
    /// Stable identifier for the participant.
    pub id: Uuid,
    /// Session this participant joined.
    pub session_id: Uuid,
    /// Display name entered when joining.
    pub name: String,
    /// Identity of the participant's account, when signed in.
    pub user_id: Option<Uuid>,
    /// Join timestamp.
    pub created_at: SystemTime,
}

/// One bottle being tasted, with its true attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhiskyEntity {
    /// Stable identifier for the whisky.
    pub id: Uuid,
    /// Session this whisky belongs to.
    pub session_id: Uuid,
    /// Presentation/tasting position; pairwise distinct within a session.
    pub order_index: u32,
    /// The editable attributes of the bottle.
    #[serde(flatten)]
    pub fields: WhiskyFields,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// Host-editable attributes of a whisky, shared between insert and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhiskyFields {
    /// Bottle name as printed on the label.
    pub name: String,
    /// Age statement in years, absent for NAS bottlings.
    pub age: Option<u32>,
    /// Alcohol by volume, percent.
    pub abv: f64,
    /// Production region name.
    pub region: String,
    /// Distillery name.
    pub distillery: String,
    /// Free-form category (single malt, blend, ...).
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
}

/// One participant's guess for one whisky.
///
/// The (`participant_id`, `whisky_id`) pair is unique within a session; a
/// second submit for the same pair updates the row in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionEntity {
    /// Stable identifier for the submission.
    pub id: Uuid,
    /// Session this submission belongs to.
    pub session_id: Uuid,
    /// Participant who guessed.
    pub participant_id: Uuid,
    /// Whisky the guess is about.
    pub whisky_id: Uuid,
    /// The guessed attributes.
    #[serde(flatten)]
    pub guess: GuessFields,
    /// First-submit timestamp.
    pub created_at: SystemTime,
    /// Refreshed on every subsequent edit of the same pair.
    pub updated_at: SystemTime,
}

/// The guessable attributes of a whisky, mirroring [`WhiskyFields`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuessFields {
    /// Guessed bottle name.
    pub guessed_name: String,
    /// Participant's rating of the dram, 0-5.
    pub guessed_score: u8,
    /// Guessed age statement, optional.
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
}

/// The full object graph of one session, loaded in a single read.
///
/// This is the unit feed subscribers re-fetch after every change event.
/// Whiskies come back sorted by `order_index`, participants and submissions
/// in creation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionAggregate {
    /// The session row.
    pub session: SessionEntity,
    /// Everyone who joined, in join order.
    pub participants: Vec<ParticipantEntity>,
    /// The lineup, in tasting order.
    pub whiskies: Vec<WhiskyEntity>,
    /// All guesses submitted so far.
    pub submissions: Vec<SubmissionEntity>,
}

impl SessionAggregate {
    /// Look up a participant of this session by id.
    pub fn participant(&self, participant_id: Uuid) -> Option<&ParticipantEntity> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    /// Look up a whisky of this session by id.
    pub fn whisky(&self, whisky_id: Uuid) -> Option<&WhiskyEntity> {
        self.whiskies.iter().find(|w| w.id == whisky_id)
    }

    /// Find the submission for a (participant, whisky) pair, if present.
    pub fn submission_for(
        &self,
        participant_id: Uuid,
        whisky_id: Uuid,
    ) -> Option<&SubmissionEntity> {
        self.submissions
            .iter()
            .find(|s| s.participant_id == participant_id && s.whisky_id == whisky_id)
    }

    /// First whisky in tasting order the participant has not guessed yet.
    pub fn next_unanswered_whisky(&self, participant_id: Uuid) -> Option<&WhiskyEntity> {
        self.whiskies
            .iter()
            .find(|w| self.submission_for(participant_id, w.id).is_none())
    }
}

/// Read-only whisky production region reference row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionEntity {
    /// Stable identifier for the region.
    pub id: Uuid,
    /// Region name (e.g. "Speyside").
    pub name: String,
}

/// Read-only distillery reference row; belongs to exactly one region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistilleryEntity {
    /// Stable identifier for the distillery.
    pub id: Uuid,
    /// Distillery name.
    pub name: String,
    /// Region the distillery is located in.
    pub region_id: Uuid,
}

/// Account profile mirrored from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfileEntity {
    /// Identity of the account.
    pub id: Uuid,
    /// Account email address.
    pub email: String,
    /// Display name, if the account set one.
    pub name: Option<String>,
    /// Administratively disabled accounts are signed out at the next check.
    pub is_disabled: bool,
    /// When the account was disabled.
    pub disabled_at: Option<SystemTime>,
    /// Who disabled the account.
    pub disabled_by: Option<Uuid>,
}
