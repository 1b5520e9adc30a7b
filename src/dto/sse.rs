use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{
    session::{ParticipantSummary, SessionSummary},
    submission::SubmissionSummary,
    whisky::WhiskySummary,
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the per-session SSE feed.
pub struct ServerEvent {
    /// SSE event name, when the message is typed.
    pub event: Option<String>,
    /// Serialized JSON payload.
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already-serialized payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the session the stream follows.
    pub session_id: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the session row changed (status advance).
pub struct SessionUpdatedEvent {
    /// The session after the change.
    pub session: SessionSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a participant joined the session.
pub struct ParticipantJoinedEvent {
    /// The participant row, display name included.
    pub participant: ParticipantSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a whisky was added to the lineup.
pub struct WhiskyCreatedEvent {
    /// The new whisky row.
    pub whisky: WhiskySummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a whisky's attributes were edited.
pub struct WhiskyUpdatedEvent {
    /// The whisky row after the edit.
    pub whisky: WhiskySummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when two whiskies swapped places in the tasting order.
pub struct WhiskyReorderedEvent {
    /// The whisky the host moved.
    pub moved: WhiskySummary,
    /// The neighbour it swapped places with.
    pub displaced: WhiskySummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a guess was created or revised.
pub struct SubmissionEvent {
    /// The submission row after the upsert.
    pub submission: SubmissionSummary,
    /// Display name of the guessing participant.
    pub participant_name: String,
}
