use std::time::SystemTime;

use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::{ParticipantEntity, SessionEntity},
        storage::StorageError,
    },
    dto::session::{
        AdvanceStatusRequest, CreateSessionRequest, JoinSessionRequest, JoinSessionResponse,
        SessionAggregateResponse, SessionSummary,
    },
    error::ServiceError,
    services::{feed_events, identity_service},
    state::{SessionStatus, SharedState},
};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Create a new tasting session in `Waiting` status with an empty graph.
///
/// The join code is regenerated on collision a bounded number of times; a
/// signed-in host is checked against the identity gate first.
pub async fn create_session(
    state: &SharedState,
    request: CreateSessionRequest,
) -> Result<SessionSummary, ServiceError> {
    identity_service::ensure_active(state, request.host_user_id).await?;
    let store = state.require_session_store().await?;

    let mut attempts_left = state.config().code_attempts;
    loop {
        let now = SystemTime::now();
        let session = SessionEntity {
            id: Uuid::new_v4(),
            code: generate_code(state.config().code_length),
            host_name: request.host_name.clone(),
            host_user_id: request.host_user_id,
            status: SessionStatus::initial(),
            created_at: now,
            updated_at: now,
        };

        match store.create_session(session).await {
            Ok(created) => {
                info!(session_id = %created.id, code = %created.code, "session created");
                return Ok(SessionSummary::from(&created));
            }
            Err(StorageError::CodeTaken { code }) if attempts_left > 1 => {
                attempts_left -= 1;
                info!(%code, attempts_left, "session code collision; regenerating");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Join an existing session by code.
///
/// An unknown code is terminal: no participant row is created. A signed-in
/// participant is checked against the identity gate first. Joining is allowed
/// in any session status.
pub async fn join_session(
    state: &SharedState,
    request: JoinSessionRequest,
) -> Result<JoinSessionResponse, ServiceError> {
    identity_service::ensure_active(state, request.user_id).await?;
    let store = state.require_session_store().await?;

    let Some(session) = store.find_session_by_code(request.code.clone()).await? else {
        return Err(ServiceError::NotFound(format!(
            "no session with code {}",
            request.code.to_uppercase()
        )));
    };

    let participant = ParticipantEntity {
        id: Uuid::new_v4(),
        session_id: session.id,
        name: request.name,
        user_id: request.user_id,
        created_at: SystemTime::now(),
    };

    let Some(inserted) = store.insert_participant(participant).await? else {
        return Err(ServiceError::NotFound(format!(
            "session {} no longer exists",
            session.id
        )));
    };

    info!(session_id = %session.id, participant_id = %inserted.id, "participant joined");
    feed_events::broadcast_participant_joined(state, &inserted);

    Ok(JoinSessionResponse {
        session: SessionSummary::from(&session),
        participant: (&inserted).into(),
    })
}

/// Load the full session graph, the re-fetch target for feed clients.
pub async fn get_aggregate(
    state: &SharedState,
    session_id: Uuid,
) -> Result<SessionAggregateResponse, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(aggregate) = store.load_aggregate(session_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "no session with id {session_id}"
        )));
    };
    Ok(SessionAggregateResponse::from(&aggregate))
}

/// Advance the session lifecycle to the requested status.
///
/// The transition table rejects skips and regressions; the store re-checks
/// the current status inside the write, so a stale client replaying an
/// advance gets a conflict instead of silently winning.
pub async fn advance_status(
    state: &SharedState,
    session_id: Uuid,
    request: AdvanceStatusRequest,
) -> Result<SessionSummary, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(aggregate) = store.load_aggregate(session_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "no session with id {session_id}"
        )));
    };

    let transition = aggregate.session.status.advance_to(request.status)?;
    // Whiskies cannot be removed, so a non-empty lineup observed here still
    // holds when the store applies the compare-and-swap.
    if transition.requires_whisky() && aggregate.whiskies.is_empty() {
        return Err(ServiceError::InvalidState(
            "cannot start collecting before any whisky is registered".into(),
        ));
    }

    let Some(updated) = store.advance_status(session_id, transition).await? else {
        return Err(ServiceError::NotFound(format!(
            "no session with id {session_id}"
        )));
    };

    info!(%session_id, status = updated.status.as_str(), "session status advanced");
    feed_events::broadcast_session_updated(state, &updated);
    Ok(SessionSummary::from(&updated))
}

/// Generate an uppercase alphanumeric join code.
fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::UserProfileEntity,
        services::{test_support, whisky_service},
    };

    #[test]
    fn generated_codes_are_uppercase_alphanumeric() {
        for _ in 0..50 {
            let code = generate_code(6);
            assert_eq!(code.len(), 6);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_lowercase())
            );
        }
    }

    fn create_request(host: &str) -> CreateSessionRequest {
        CreateSessionRequest {
            host_name: host.into(),
            host_user_id: None,
        }
    }

    fn join_request(code: &str, name: &str) -> JoinSessionRequest {
        JoinSessionRequest {
            code: code.into(),
            name: name.into(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn created_session_starts_waiting_with_a_code() {
        let harness = test_support::harness().await;

        let summary = create_session(&harness.state, create_request("Amy"))
            .await
            .unwrap();

        assert_eq!(summary.status, SessionStatus::Waiting);
        assert_eq!(summary.code.len(), 6);
        assert_eq!(summary.code, summary.code.to_uppercase());
    }

    #[tokio::test]
    async fn joining_an_unknown_code_is_terminal() {
        let harness = test_support::harness().await;

        let err = join_session(&harness.state, join_request("ZZZZZZ", "Ben"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn joining_is_case_insensitive_and_broadcasts() {
        let harness = test_support::harness().await;
        let session = create_session(&harness.state, create_request("Amy"))
            .await
            .unwrap();

        let mut feed = harness.state.feed().subscribe(session.id);
        let lowered = session.code.to_lowercase();
        let response = join_session(&harness.state, join_request(&lowered, "Ben"))
            .await
            .unwrap();

        assert_eq!(response.session.id, session.id);
        assert_eq!(response.participant.name, "Ben");

        let event = feed.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("participant.joined"));
    }

    #[tokio::test]
    async fn advancing_requires_at_least_one_whisky() {
        let harness = test_support::harness().await;
        let session = create_session(&harness.state, create_request("Amy"))
            .await
            .unwrap();

        let request = AdvanceStatusRequest {
            status: SessionStatus::Collecting,
        };
        let err = advance_status(&harness.state, session.id, request)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        whisky_service::add_whisky(
            &harness.state,
            session.id,
            test_support::whisky_fields("Benriach 12"),
        )
        .await
        .unwrap();

        let request = AdvanceStatusRequest {
            status: SessionStatus::Collecting,
        };
        let summary = advance_status(&harness.state, session.id, request)
            .await
            .unwrap();
        assert_eq!(summary.status, SessionStatus::Collecting);
    }

    #[tokio::test]
    async fn skipping_a_status_is_rejected() {
        let harness = test_support::harness().await;
        let session = create_session(&harness.state, create_request("Amy"))
            .await
            .unwrap();

        let request = AdvanceStatusRequest {
            status: SessionStatus::Reviewing,
        };
        let err = advance_status(&harness.state, session.id, request)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn disabled_host_account_is_rejected_and_signed_out() {
        let harness = test_support::harness().await;
        let user_id = Uuid::new_v4();
        harness.store.put_user_profile(UserProfileEntity {
            id: user_id,
            email: "amy@example.com".into(),
            name: Some("Amy".into()),
            is_disabled: true,
            disabled_at: Some(SystemTime::now()),
            disabled_by: None,
        });

        let request = CreateSessionRequest {
            host_name: "Amy".into(),
            host_user_id: Some(user_id),
        };
        let err = create_session(&harness.state, request).await.unwrap_err();

        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert_eq!(harness.identity.signed_out(), vec![user_id]);
    }
}
