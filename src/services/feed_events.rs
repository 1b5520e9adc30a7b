//! Row-level change events published on the per-session feed.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{ParticipantEntity, SessionEntity, SubmissionEntity, WhiskyEntity},
    dto::sse::{
        ParticipantJoinedEvent, ServerEvent, SessionUpdatedEvent, SubmissionEvent,
        WhiskyCreatedEvent, WhiskyReorderedEvent, WhiskyUpdatedEvent,
    },
    state::SharedState,
};

const EVENT_SESSION_UPDATED: &str = "session.updated";
const EVENT_PARTICIPANT_JOINED: &str = "participant.joined";
const EVENT_WHISKY_CREATED: &str = "whisky.created";
const EVENT_WHISKY_UPDATED: &str = "whisky.updated";
const EVENT_WHISKY_REORDERED: &str = "whisky.reordered";
const EVENT_SUBMISSION_CREATED: &str = "submission.created";
const EVENT_SUBMISSION_UPDATED: &str = "submission.updated";

/// Broadcast that the session row changed (status advance).
pub fn broadcast_session_updated(state: &SharedState, session: &SessionEntity) {
    let payload = SessionUpdatedEvent {
        session: session.into(),
    };
    send_session_event(state, session.id, EVENT_SESSION_UPDATED, &payload);
}

/// Broadcast that a participant joined the session.
pub fn broadcast_participant_joined(state: &SharedState, participant: &ParticipantEntity) {
    let payload = ParticipantJoinedEvent {
        participant: participant.into(),
    };
    send_session_event(
        state,
        participant.session_id,
        EVENT_PARTICIPANT_JOINED,
        &payload,
    );
}

/// Broadcast that a whisky was added to the lineup.
pub fn broadcast_whisky_created(state: &SharedState, whisky: &WhiskyEntity) {
    let payload = WhiskyCreatedEvent {
        whisky: whisky.into(),
    };
    send_session_event(state, whisky.session_id, EVENT_WHISKY_CREATED, &payload);
}

/// Broadcast that a whisky's attributes were edited.
pub fn broadcast_whisky_updated(state: &SharedState, whisky: &WhiskyEntity) {
    let payload = WhiskyUpdatedEvent {
        whisky: whisky.into(),
    };
    send_session_event(state, whisky.session_id, EVENT_WHISKY_UPDATED, &payload);
}

/// Broadcast that two whiskies swapped places in the tasting order.
pub fn broadcast_whisky_reordered(
    state: &SharedState,
    moved: &WhiskyEntity,
    displaced: &WhiskyEntity,
) {
    let payload = WhiskyReorderedEvent {
        moved: moved.into(),
        displaced: displaced.into(),
    };
    send_session_event(state, moved.session_id, EVENT_WHISKY_REORDERED, &payload);
}

/// Broadcast that a guess was stored, distinguishing first submits from revisions.
pub fn broadcast_submission(
    state: &SharedState,
    submission: &SubmissionEntity,
    participant_name: &str,
    created: bool,
) {
    let payload = SubmissionEvent {
        submission: submission.into(),
        participant_name: participant_name.to_owned(),
    };
    let event = if created {
        EVENT_SUBMISSION_CREATED
    } else {
        EVENT_SUBMISSION_UPDATED
    };
    send_session_event(state, submission.session_id, event, &payload);
}

fn send_session_event(
    state: &SharedState,
    session_id: Uuid,
    event: &str,
    payload: &impl Serialize,
) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.feed().publish(session_id, event),
        Err(err) => warn!(event, error = %err, "failed to serialize feed payload"),
    }
}
