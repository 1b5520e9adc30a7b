use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{ParticipantEntity, SessionAggregate, SessionEntity},
    dto::{
        format_system_time, submission::SubmissionSummary, validation::validate_session_code,
        whisky::WhiskySummary,
    },
    state::lifecycle::SessionStatus,
};

/// Request body for creating a new tasting session.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSessionRequest {
    /// Display name of the host.
    #[validate(length(min = 1, max = 64))]
    pub host_name: String,
    /// Account id of the host, when signed in.
    pub host_user_id: Option<Uuid>,
}

/// Request body for joining a session by code.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinSessionRequest {
    /// The join code shown by the host. Case-insensitive.
    #[validate(custom(function = normalized_code))]
    pub code: String,
    /// Display name of the joining participant.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Account id of the participant, when signed in.
    pub user_id: Option<Uuid>,
}

/// Join codes are validated after uppercasing so clients may send either case.
pub(crate) fn normalized_code(code: &str) -> Result<(), validator::ValidationError> {
    validate_session_code(&code.to_uppercase())
}

/// Request body for advancing the session lifecycle.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceStatusRequest {
    /// The status to advance to. Must be the direct successor of the current one.
    pub status: SessionStatus,
}

/// Projection of a session row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionSummary {
    /// Session identifier.
    pub id: Uuid,
    /// Join code, uppercase.
    pub code: String,
    /// Display name of the host.
    pub host_name: String,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// RFC3339 creation timestamp.
    pub created_at: String,
    /// RFC3339 timestamp of the last session-row change.
    pub updated_at: String,
}

impl From<&SessionEntity> for SessionSummary {
    fn from(session: &SessionEntity) -> Self {
        Self {
            id: session.id,
            code: session.code.clone(),
            host_name: session.host_name.clone(),
            status: session.status,
            created_at: format_system_time(session.created_at),
            updated_at: format_system_time(session.updated_at),
        }
    }
}

/// Projection of a participant row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantSummary {
    /// Participant identifier.
    pub id: Uuid,
    /// Display name entered when joining.
    pub name: String,
    /// RFC3339 join timestamp.
    pub created_at: String,
}

impl From<&ParticipantEntity> for ParticipantSummary {
    fn from(participant: &ParticipantEntity) -> Self {
        Self {
            id: participant.id,
            name: participant.name.clone(),
            created_at: format_system_time(participant.created_at),
        }
    }
}

/// The full session graph, the re-fetch target for feed clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionAggregateResponse {
    /// The session row.
    pub session: SessionSummary,
    /// Everyone who joined, in join order.
    pub participants: Vec<ParticipantSummary>,
    /// The lineup, in tasting order.
    pub whiskies: Vec<WhiskySummary>,
    /// All guesses submitted so far.
    pub submissions: Vec<SubmissionSummary>,
}

impl From<&SessionAggregate> for SessionAggregateResponse {
    fn from(aggregate: &SessionAggregate) -> Self {
        Self {
            session: SessionSummary::from(&aggregate.session),
            participants: aggregate.participants.iter().map(Into::into).collect(),
            whiskies: aggregate.whiskies.iter().map(Into::into).collect(),
            submissions: aggregate.submissions.iter().map(Into::into).collect(),
        }
    }
}

/// Response returned when a participant joined a session.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinSessionResponse {
    /// The session that was joined.
    pub session: SessionSummary,
    /// The newly created participant row.
    pub participant: ParticipantSummary,
}
