//! BSON document shapes for the session store.
//!
//! Documents carry ids as strings and timestamps as BSON datetimes; every
//! read converts back into the typed entities of [`crate::dao::models`] and
//! fails loudly on malformed rows rather than letting them leak upward.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::{
    dao::models::{
        BottlingType, DistilleryEntity, GuessFields, ParticipantEntity, RegionEntity,
        SessionAggregate, SessionEntity, SubmissionEntity, UserProfileEntity, WhiskyEntity,
        WhiskyFields,
    },
    state::lifecycle::SessionStatus,
};

/// Name of the session aggregate collection.
pub const SESSION_COLLECTION: &str = "sessions";
/// Name of the region reference collection.
pub const REGION_COLLECTION: &str = "regions";
/// Name of the distillery reference collection.
pub const DISTILLERY_COLLECTION: &str = "distilleries";
/// Name of the account profile collection.
pub const PROFILE_COLLECTION: &str = "user_profiles";
/// Name of the keep-alive probe collection.
pub const KEEP_ALIVE_COLLECTION: &str = "keep_alive";

fn parse_uuid(value: &str, collection: &'static str, field: &str) -> MongoResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| MongoDaoError::CorruptDocument {
        collection,
        detail: format!("field `{field}` holds a malformed id: `{value}`"),
    })
}

fn parse_optional_uuid(
    value: Option<&str>,
    collection: &'static str,
    field: &str,
) -> MongoResult<Option<Uuid>> {
    value.map(|v| parse_uuid(v, collection, field)).transpose()
}

/// One session's entire object graph, stored as a single document so every
/// mutation of the graph enjoys single-document atomicity.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Session id as a hyphenated UUID string.
    #[serde(rename = "_id")]
    pub id: String,
    /// Uppercased join code; uniquely indexed.
    pub code: String,
    /// Host display name.
    pub host_name: String,
    /// Host account id, when signed in.
    pub host_user_id: Option<String>,
    /// Lifecycle status, stored as its snake_case wire name.
    pub status: SessionStatus,
    /// Creation timestamp.
    pub created_at: DateTime,
    /// Last session-row update.
    pub updated_at: DateTime,
    /// Embedded participant rows.
    pub participants: Vec<ParticipantDocument>,
    /// Embedded whisky rows.
    pub whiskies: Vec<WhiskyDocument>,
    /// Embedded submission rows.
    pub submissions: Vec<SubmissionDocument>,
}

/// Embedded participant row.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParticipantDocument {
    /// Participant id as a UUID string.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Linked account id, when signed in.
    pub user_id: Option<String>,
    /// Join timestamp.
    pub created_at: DateTime,
}

/// Embedded whisky row.
#[derive(Debug, Serialize, Deserialize)]
pub struct WhiskyDocument {
    /// Whisky id as a UUID string.
    pub id: String,
    /// Tasting order position.
    pub order_index: u32,
    /// Bottle name.
    pub name: String,
    /// Age statement.
    pub age: Option<u32>,
    /// Alcohol by volume.
    pub abv: f64,
    /// Region name.
    pub region: String,
    /// Distillery name.
    pub distillery: String,
    /// Category.
    pub category: String,
    /// Bottling type.
    pub bottling_type: BottlingType,
    /// Cask description.
    pub cask_type: Option<String>,
    /// Host rating.
    pub host_score: Option<u8>,
    /// Whiskybase link.
    pub whiskybase_link: Option<String>,
    /// Tasting notes reference.
    pub tasting_reference: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime,
}

/// Embedded submission row.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionDocument {
    /// Submission id as a UUID string.
    pub id: String,
    /// Guessing participant id.
    pub participant_id: String,
    /// Guessed whisky id.
    pub whisky_id: String,
    /// Guessed bottle name.
    pub guessed_name: String,
    /// Guessed score.
    pub guessed_score: u8,
    /// Guessed age.
    pub guessed_age: Option<u32>,
    /// Guessed alcohol by volume.
    pub guessed_abv: f64,
    /// Guessed region.
    pub guessed_region: String,
    /// Guessed distillery.
    pub guessed_distillery: String,
    /// Guessed category.
    pub guessed_category: String,
    /// Guessed bottling type.
    pub guessed_bottling_type: BottlingType,
    /// First submit timestamp.
    pub created_at: DateTime,
    /// Last edit timestamp.
    pub updated_at: DateTime,
}

/// Region reference document.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegionDocument {
    /// Region id as a UUID string.
    #[serde(rename = "_id")]
    pub id: String,
    /// Region name.
    pub name: String,
}

/// Distillery reference document.
#[derive(Debug, Serialize, Deserialize)]
pub struct DistilleryDocument {
    /// Distillery id as a UUID string.
    #[serde(rename = "_id")]
    pub id: String,
    /// Distillery name.
    pub name: String,
    /// Owning region id.
    pub region_id: String,
}

/// Account profile document.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfileDocument {
    /// Account id as a UUID string.
    #[serde(rename = "_id")]
    pub id: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Disabled flag.
    pub is_disabled: bool,
    /// When the account was disabled.
    pub disabled_at: Option<DateTime>,
    /// Who disabled it.
    pub disabled_by: Option<String>,
}

impl SessionDocument {
    /// Wrap a fresh session row into an empty aggregate document.
    pub fn from_new_session(session: &SessionEntity) -> Self {
        Self {
            id: session.id.to_string(),
            code: session.code.clone(),
            host_name: session.host_name.clone(),
            host_user_id: session.host_user_id.map(|id| id.to_string()),
            status: session.status,
            created_at: DateTime::from_system_time(session.created_at),
            updated_at: DateTime::from_system_time(session.updated_at),
            participants: Vec::new(),
            whiskies: Vec::new(),
            submissions: Vec::new(),
        }
    }

    /// Convert just the session row, leaving the embedded rows untouched.
    pub fn to_session_entity(&self) -> MongoResult<SessionEntity> {
        Ok(SessionEntity {
            id: parse_uuid(&self.id, SESSION_COLLECTION, "_id")?,
            code: self.code.clone(),
            host_name: self.host_name.clone(),
            host_user_id: parse_optional_uuid(
                self.host_user_id.as_deref(),
                SESSION_COLLECTION,
                "host_user_id",
            )?,
            status: self.status,
            created_at: self.created_at.to_system_time(),
            updated_at: self.updated_at.to_system_time(),
        })
    }

    /// Convert the whole document into the typed aggregate, sorting whiskies
    /// into tasting order.
    pub fn into_aggregate(self) -> MongoResult<SessionAggregate> {
        let session = self.to_session_entity()?;
        let session_id = session.id;

        let participants = self
            .participants
            .iter()
            .map(|p| p.to_entity(session_id))
            .collect::<MongoResult<Vec<_>>>()?;
        let mut whiskies = self
            .whiskies
            .iter()
            .map(|w| w.to_entity(session_id))
            .collect::<MongoResult<Vec<_>>>()?;
        whiskies.sort_by_key(|w| w.order_index);
        let submissions = self
            .submissions
            .iter()
            .map(|s| s.to_entity(session_id))
            .collect::<MongoResult<Vec<_>>>()?;

        Ok(SessionAggregate {
            session,
            participants,
            whiskies,
            submissions,
        })
    }
}

impl ParticipantDocument {
    /// Build the embedded row from an entity.
    pub fn from_entity(participant: &ParticipantEntity) -> Self {
        Self {
            id: participant.id.to_string(),
            name: participant.name.clone(),
            user_id: participant.user_id.map(|id| id.to_string()),
            created_at: DateTime::from_system_time(participant.created_at),
        }
    }

    fn to_entity(&self, session_id: Uuid) -> MongoResult<ParticipantEntity> {
        Ok(ParticipantEntity {
            id: parse_uuid(&self.id, SESSION_COLLECTION, "participants.id")?,
            session_id,
            name: self.name.clone(),
            user_id: parse_optional_uuid(
                self.user_id.as_deref(),
                SESSION_COLLECTION,
                "participants.user_id",
            )?,
            created_at: self.created_at.to_system_time(),
        })
    }
}

impl WhiskyDocument {
    /// Build the embedded row from editable fields plus placement data.
    pub fn from_fields(id: Uuid, order_index: u32, fields: &WhiskyFields, created_at: SystemTime) -> Self {
        Self {
            id: id.to_string(),
            order_index,
            name: fields.name.clone(),
            age: fields.age,
            abv: fields.abv,
            region: fields.region.clone(),
            distillery: fields.distillery.clone(),
            category: fields.category.clone(),
            bottling_type: fields.bottling_type,
            cask_type: fields.cask_type.clone(),
            host_score: fields.host_score,
            whiskybase_link: fields.whiskybase_link.clone(),
            tasting_reference: fields.tasting_reference.clone(),
            created_at: DateTime::from_system_time(created_at),
        }
    }

    fn to_entity(&self, session_id: Uuid) -> MongoResult<WhiskyEntity> {
        Ok(WhiskyEntity {
            id: parse_uuid(&self.id, SESSION_COLLECTION, "whiskies.id")?,
            session_id,
            order_index: self.order_index,
            fields: WhiskyFields {
                name: self.name.clone(),
                age: self.age,
                abv: self.abv,
                region: self.region.clone(),
                distillery: self.distillery.clone(),
                category: self.category.clone(),
                bottling_type: self.bottling_type,
                cask_type: self.cask_type.clone(),
                host_score: self.host_score,
                whiskybase_link: self.whiskybase_link.clone(),
                tasting_reference: self.tasting_reference.clone(),
            },
            created_at: self.created_at.to_system_time(),
        })
    }
}

impl SubmissionDocument {
    /// Build the embedded row for a brand-new guess.
    pub fn from_guess(
        id: Uuid,
        participant_id: Uuid,
        whisky_id: Uuid,
        guess: &GuessFields,
        at: SystemTime,
    ) -> Self {
        Self {
            id: id.to_string(),
            participant_id: participant_id.to_string(),
            whisky_id: whisky_id.to_string(),
            guessed_name: guess.guessed_name.clone(),
            guessed_score: guess.guessed_score,
            guessed_age: guess.guessed_age,
            guessed_abv: guess.guessed_abv,
            guessed_region: guess.guessed_region.clone(),
            guessed_distillery: guess.guessed_distillery.clone(),
            guessed_category: guess.guessed_category.clone(),
            guessed_bottling_type: guess.guessed_bottling_type,
            created_at: DateTime::from_system_time(at),
            updated_at: DateTime::from_system_time(at),
        }
    }

    fn to_entity(&self, session_id: Uuid) -> MongoResult<SubmissionEntity> {
        Ok(SubmissionEntity {
            id: parse_uuid(&self.id, SESSION_COLLECTION, "submissions.id")?,
            session_id,
            participant_id: parse_uuid(
                &self.participant_id,
                SESSION_COLLECTION,
                "submissions.participant_id",
            )?,
            whisky_id: parse_uuid(&self.whisky_id, SESSION_COLLECTION, "submissions.whisky_id")?,
            guess: GuessFields {
                guessed_name: self.guessed_name.clone(),
                guessed_score: self.guessed_score,
                guessed_age: self.guessed_age,
                guessed_abv: self.guessed_abv,
                guessed_region: self.guessed_region.clone(),
                guessed_distillery: self.guessed_distillery.clone(),
                guessed_category: self.guessed_category.clone(),
                guessed_bottling_type: self.guessed_bottling_type,
            },
            created_at: self.created_at.to_system_time(),
            updated_at: self.updated_at.to_system_time(),
        })
    }
}

impl RegionDocument {
    /// Convert the reference row into its entity.
    pub fn to_entity(&self) -> MongoResult<RegionEntity> {
        Ok(RegionEntity {
            id: parse_uuid(&self.id, REGION_COLLECTION, "_id")?,
            name: self.name.clone(),
        })
    }
}

impl DistilleryDocument {
    /// Convert the reference row into its entity.
    pub fn to_entity(&self) -> MongoResult<DistilleryEntity> {
        Ok(DistilleryEntity {
            id: parse_uuid(&self.id, DISTILLERY_COLLECTION, "_id")?,
            name: self.name.clone(),
            region_id: parse_uuid(&self.region_id, DISTILLERY_COLLECTION, "region_id")?,
        })
    }
}

impl UserProfileDocument {
    /// Convert the profile row into its entity.
    pub fn to_entity(&self) -> MongoResult<UserProfileEntity> {
        Ok(UserProfileEntity {
            id: parse_uuid(&self.id, PROFILE_COLLECTION, "_id")?,
            email: self.email.clone(),
            name: self.name.clone(),
            is_disabled: self.is_disabled,
            disabled_at: self.disabled_at.map(|at| at.to_system_time()),
            disabled_by: parse_optional_uuid(
                self.disabled_by.as_deref(),
                PROFILE_COLLECTION,
                "disabled_by",
            )?,
        })
    }
}
