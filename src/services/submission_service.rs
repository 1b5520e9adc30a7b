use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::GuessFields, session_store::SubmissionUpsert},
    dto::submission::{SubmitGuessRequest, SubmitGuessResponse},
    error::ServiceError,
    services::feed_events,
    state::SharedState,
};

/// Store a participant's guess for a whisky.
///
/// The store upserts on the (participant, whisky) pair, so resubmitting the
/// same dram revises the earlier row instead of adding a duplicate. The
/// response carries the next whisky in tasting order the participant has not
/// guessed yet, if any.
pub async fn submit_guess(
    state: &SharedState,
    session_id: Uuid,
    whisky_id: Uuid,
    request: SubmitGuessRequest,
) -> Result<SubmitGuessResponse, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(aggregate) = store.load_aggregate(session_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "no session with id {session_id}"
        )));
    };

    let Some(participant) = aggregate.participant(request.participant_id) else {
        return Err(ServiceError::NotFound(format!(
            "no participant {} in session {session_id}",
            request.participant_id
        )));
    };
    if aggregate.whisky(whisky_id).is_none() {
        return Err(ServiceError::NotFound(format!(
            "no whisky {whisky_id} in session {session_id}"
        )));
    }
    let participant_name = participant.name.clone();

    let guess = GuessFields::from(request.guess);
    let Some(outcome) = store
        .upsert_submission(session_id, request.participant_id, whisky_id, guess)
        .await?
    else {
        return Err(ServiceError::NotFound(format!(
            "no whisky {whisky_id} in session {session_id}"
        )));
    };

    let created = matches!(outcome, SubmissionUpsert::Created(_));
    let submission = outcome.submission().clone();
    info!(
        %session_id,
        %whisky_id,
        participant_id = %request.participant_id,
        created,
        "guess stored"
    );
    feed_events::broadcast_submission(state, &submission, &participant_name, created);

    let next_whisky_id = store
        .load_aggregate(session_id)
        .await?
        .and_then(|aggregate| {
            aggregate
                .next_unanswered_whisky(request.participant_id)
                .map(|w| w.id)
        });

    Ok(SubmitGuessResponse {
        submission: (&submission).into(),
        created,
        next_whisky_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::BottlingType,
        dto::{
            session::{AdvanceStatusRequest, CreateSessionRequest, JoinSessionRequest},
            submission::GuessInput,
        },
        services::{session_service, test_support, whisky_service},
        state::SessionStatus,
    };

    fn guess_input(name: &str, score: u8) -> GuessInput {
        GuessInput {
            guessed_name: name.into(),
            guessed_score: score,
            guessed_age: Some(10),
            guessed_abv: 43.0,
            guessed_region: "Islay".into(),
            guessed_distillery: "Laphroaig".into(),
            guessed_category: "Single Malt".into(),
            guessed_bottling_type: BottlingType::Ob,
        }
    }

    fn request(participant_id: Uuid, name: &str, score: u8) -> SubmitGuessRequest {
        SubmitGuessRequest {
            participant_id,
            guess: guess_input(name, score),
        }
    }

    /// Session in `Collecting` with two whiskies and one joined participant.
    async fn collecting_session(
        harness: &test_support::TestHarness,
    ) -> (Uuid, Vec<Uuid>, Uuid) {
        let session = session_service::create_session(
            &harness.state,
            CreateSessionRequest {
                host_name: "Amy".into(),
                host_user_id: None,
            },
        )
        .await
        .unwrap();

        let mut whisky_ids = Vec::new();
        for name in ["Dram one", "Dram two"] {
            let summary = whisky_service::add_whisky(
                &harness.state,
                session.id,
                test_support::whisky_fields(name),
            )
            .await
            .unwrap();
            whisky_ids.push(summary.id);
        }

        let joined = session_service::join_session(
            &harness.state,
            JoinSessionRequest {
                code: session.code.clone(),
                name: "Ben".into(),
                user_id: None,
            },
        )
        .await
        .unwrap();

        session_service::advance_status(
            &harness.state,
            session.id,
            AdvanceStatusRequest {
                status: SessionStatus::Collecting,
            },
        )
        .await
        .unwrap();

        (session.id, whisky_ids, joined.participant.id)
    }

    #[tokio::test]
    async fn first_submit_creates_and_points_at_the_next_dram() {
        let harness = test_support::harness().await;
        let (session_id, whiskies, ben) = collecting_session(&harness).await;

        let response = submit_guess(
            &harness.state,
            session_id,
            whiskies[0],
            request(ben, "Ardbeg 10", 4),
        )
        .await
        .unwrap();

        assert!(response.created);
        assert_eq!(response.next_whisky_id, Some(whiskies[1]));
    }

    #[tokio::test]
    async fn resubmitting_the_same_dram_revises_the_single_row() {
        let harness = test_support::harness().await;
        let (session_id, whiskies, ben) = collecting_session(&harness).await;

        let mut feed = harness.state.feed().subscribe(session_id);
        submit_guess(
            &harness.state,
            session_id,
            whiskies[0],
            request(ben, "Ardbeg 10", 4),
        )
        .await
        .unwrap();
        let second = submit_guess(
            &harness.state,
            session_id,
            whiskies[0],
            request(ben, "Lagavulin 16", 5),
        )
        .await
        .unwrap();

        assert!(!second.created);
        assert_eq!(second.submission.guessed_name, "Lagavulin 16");

        let aggregate = session_service::get_aggregate(&harness.state, session_id)
            .await
            .unwrap();
        assert_eq!(aggregate.submissions.len(), 1);
        assert_eq!(aggregate.submissions[0].guessed_score, 5);

        let first_event = feed.recv().await.unwrap();
        assert_eq!(first_event.event.as_deref(), Some("submission.created"));
        let second_event = feed.recv().await.unwrap();
        assert_eq!(second_event.event.as_deref(), Some("submission.updated"));
    }

    #[tokio::test]
    async fn all_drams_answered_yields_no_next_whisky() {
        let harness = test_support::harness().await;
        let (session_id, whiskies, ben) = collecting_session(&harness).await;

        for whisky_id in &whiskies {
            let response = submit_guess(
                &harness.state,
                session_id,
                *whisky_id,
                request(ben, "Some dram", 3),
            )
            .await
            .unwrap();
            if *whisky_id == whiskies[1] {
                assert_eq!(response.next_whisky_id, None);
            }
        }
    }

    #[tokio::test]
    async fn submitting_outside_collecting_conflicts() {
        let harness = test_support::harness().await;
        let (session_id, whiskies, ben) = collecting_session(&harness).await;

        session_service::advance_status(
            &harness.state,
            session_id,
            AdvanceStatusRequest {
                status: SessionStatus::Reviewing,
            },
        )
        .await
        .unwrap();

        let err = submit_guess(
            &harness.state,
            session_id,
            whiskies[0],
            request(ben, "Too late", 2),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_participant_is_rejected() {
        let harness = test_support::harness().await;
        let (session_id, whiskies, _ben) = collecting_session(&harness).await;

        let err = submit_guess(
            &harness.state,
            session_id,
            whiskies[0],
            request(Uuid::new_v4(), "Who dis", 1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
