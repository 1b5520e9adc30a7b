use uuid::Uuid;

use crate::{
    dto::reveal::{RevealResponse, RevealedGuess, RevealedWhisky},
    error::ServiceError,
    state::SharedState,
};

/// Build the comparison view: every whisky with its true attributes next to
/// every guess about it.
///
/// Only available once the session reached `Revealed` (or `Finished`);
/// earlier statuses answer with a conflict so participant clients keep
/// showing the wait screen. The optional `viewer` flags that participant's
/// own guesses. No scores are computed here.
pub async fn reveal(
    state: &SharedState,
    session_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<RevealResponse, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(aggregate) = store.load_aggregate(session_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "no session with id {session_id}"
        )));
    };

    let status = aggregate.session.status;
    if !status.is_revealed() {
        return Err(ServiceError::InvalidState(format!(
            "session is {} and not revealed yet",
            status.as_str()
        )));
    }

    let whiskies = aggregate
        .whiskies
        .iter()
        .map(|whisky| {
            let guesses = aggregate
                .submissions
                .iter()
                .filter(|s| s.whisky_id == whisky.id)
                .map(|submission| {
                    let participant_name = aggregate
                        .participant(submission.participant_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| "unknown participant".into());
                    RevealedGuess {
                        participant_id: submission.participant_id,
                        participant_name,
                        is_viewer: viewer == Some(submission.participant_id),
                        submission: submission.into(),
                    }
                })
                .collect();

            RevealedWhisky {
                whisky: whisky.into(),
                guesses,
            }
        })
        .collect();

    Ok(RevealResponse {
        session: (&aggregate.session).into(),
        whiskies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::BottlingType,
        dto::{
            session::{AdvanceStatusRequest, CreateSessionRequest, JoinSessionRequest},
            submission::{GuessInput, SubmitGuessRequest},
        },
        services::{session_service, submission_service, test_support, whisky_service},
        state::SessionStatus,
    };

    async fn advance(harness: &test_support::TestHarness, session_id: Uuid, to: SessionStatus) {
        session_service::advance_status(
            &harness.state,
            session_id,
            AdvanceStatusRequest { status: to },
        )
        .await
        .unwrap();
    }

    /// Session with one whisky and one guess from Ben, advanced to `Reviewing`.
    async fn reviewed_session(harness: &test_support::TestHarness) -> (Uuid, Uuid, Uuid) {
        let session = session_service::create_session(
            &harness.state,
            CreateSessionRequest {
                host_name: "Amy".into(),
                host_user_id: None,
            },
        )
        .await
        .unwrap();

        let whisky = whisky_service::add_whisky(
            &harness.state,
            session.id,
            test_support::whisky_fields("Benriach 12"),
        )
        .await
        .unwrap();

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

        advance(harness, session.id, SessionStatus::Collecting).await;

        submission_service::submit_guess(
            &harness.state,
            session.id,
            whisky.id,
            SubmitGuessRequest {
                participant_id: joined.participant.id,
                guess: GuessInput {
                    guessed_name: "Glen Moray".into(),
                    guessed_score: 3,
                    guessed_age: None,
                    guessed_abv: 40.0,
                    guessed_region: "Speyside".into(),
                    guessed_distillery: "Glen Moray".into(),
                    guessed_category: "Single Malt".into(),
                    guessed_bottling_type: BottlingType::Ob,
                },
            },
        )
        .await
        .unwrap();

        advance(harness, session.id, SessionStatus::Reviewing).await;
        (session.id, whisky.id, joined.participant.id)
    }

    #[tokio::test]
    async fn reveal_is_gated_until_the_session_is_revealed() {
        let harness = test_support::harness().await;
        let (session_id, _whisky, ben) = reviewed_session(&harness).await;

        let err = reveal(&harness.state, session_id, Some(ben))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn reveal_joins_truths_with_guesses_and_flags_the_viewer() {
        let harness = test_support::harness().await;
        let (session_id, whisky_id, ben) = reviewed_session(&harness).await;
        advance(&harness, session_id, SessionStatus::Revealed).await;

        let response = reveal(&harness.state, session_id, Some(ben)).await.unwrap();

        assert_eq!(response.whiskies.len(), 1);
        let revealed = &response.whiskies[0];
        assert_eq!(revealed.whisky.id, whisky_id);
        assert_eq!(revealed.whisky.name, "Benriach 12");
        assert_eq!(revealed.guesses.len(), 1);

        let guess = &revealed.guesses[0];
        assert_eq!(guess.participant_name, "Ben");
        assert!(guess.is_viewer);
        assert_eq!(guess.submission.guessed_name, "Glen Moray");

        // Another viewer sees the same rows without the flag.
        let other = reveal(&harness.state, session_id, None).await.unwrap();
        assert!(!other.whiskies[0].guesses[0].is_viewer);
    }

    #[tokio::test]
    async fn reveal_stays_available_once_finished() {
        let harness = test_support::harness().await;
        let (session_id, _whisky, ben) = reviewed_session(&harness).await;
        advance(&harness, session_id, SessionStatus::Revealed).await;
        advance(&harness, session_id, SessionStatus::Finished).await;

        let response = reveal(&harness.state, session_id, Some(ben)).await.unwrap();
        assert_eq!(response.session.status, SessionStatus::Finished);
    }
}
