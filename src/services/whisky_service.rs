use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::WhiskyFields,
    dto::whisky::{ReorderDirection, ReorderResponse, WhiskySummary},
    error::ServiceError,
    services::feed_events,
    state::SharedState,
};

/// Append a whisky to the session's lineup.
///
/// The store enforces the `Waiting` precondition and assigns the next
/// position atomically.
pub async fn add_whisky(
    state: &SharedState,
    session_id: Uuid,
    fields: WhiskyFields,
) -> Result<WhiskySummary, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(whisky) = store.insert_whisky(session_id, fields).await? else {
        return Err(ServiceError::NotFound(format!(
            "no session with id {session_id}"
        )));
    };

    info!(%session_id, whisky_id = %whisky.id, order_index = whisky.order_index, "whisky added");
    feed_events::broadcast_whisky_created(state, &whisky);
    Ok(WhiskySummary::from(&whisky))
}

/// Replace a whisky's editable attributes.
pub async fn update_whisky(
    state: &SharedState,
    session_id: Uuid,
    whisky_id: Uuid,
    fields: WhiskyFields,
) -> Result<WhiskySummary, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(whisky) = store.update_whisky(session_id, whisky_id, fields).await? else {
        return Err(ServiceError::NotFound(format!(
            "no whisky {whisky_id} in session {session_id}"
        )));
    };

    info!(%session_id, %whisky_id, "whisky updated");
    feed_events::broadcast_whisky_updated(state, &whisky);
    Ok(WhiskySummary::from(&whisky))
}

/// Move a whisky one position up or down the tasting order.
///
/// The neighbour is resolved from the current lineup and both positions are
/// swapped in a single store write, so two racing reorders can interleave but
/// never leave duplicate positions behind.
pub async fn reorder_whisky(
    state: &SharedState,
    session_id: Uuid,
    whisky_id: Uuid,
    direction: ReorderDirection,
) -> Result<ReorderResponse, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(aggregate) = store.load_aggregate(session_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "no session with id {session_id}"
        )));
    };

    // load_aggregate returns whiskies sorted by order_index.
    let lineup = &aggregate.whiskies;
    let Some(position) = lineup.iter().position(|w| w.id == whisky_id) else {
        return Err(ServiceError::NotFound(format!(
            "no whisky {whisky_id} in session {session_id}"
        )));
    };

    let neighbour = match direction {
        ReorderDirection::Up => {
            if position == 0 {
                return Err(ServiceError::InvalidInput(
                    "whisky is already first in the tasting order".into(),
                ));
            }
            &lineup[position - 1]
        }
        ReorderDirection::Down => {
            if position + 1 >= lineup.len() {
                return Err(ServiceError::InvalidInput(
                    "whisky is already last in the tasting order".into(),
                ));
            }
            &lineup[position + 1]
        }
    };

    let Some((moved, displaced)) = store
        .swap_whisky_order(session_id, whisky_id, neighbour.id)
        .await?
    else {
        return Err(ServiceError::NotFound(format!(
            "no whisky {whisky_id} in session {session_id}"
        )));
    };

    info!(
        %session_id,
        moved = %moved.id,
        displaced = %displaced.id,
        "whiskies swapped in tasting order"
    );
    feed_events::broadcast_whisky_reordered(state, &moved, &displaced);
    Ok(ReorderResponse {
        moved: WhiskySummary::from(&moved),
        displaced: WhiskySummary::from(&displaced),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::session::{AdvanceStatusRequest, CreateSessionRequest},
        services::{session_service, test_support},
        state::SessionStatus,
    };

    async fn session_with_lineup(
        harness: &test_support::TestHarness,
        names: &[&str],
    ) -> (Uuid, Vec<Uuid>) {
        let session = session_service::create_session(
            &harness.state,
            CreateSessionRequest {
                host_name: "Amy".into(),
                host_user_id: None,
            },
        )
        .await
        .unwrap();

        let mut ids = Vec::new();
        for name in names {
            let summary = add_whisky(
                &harness.state,
                session.id,
                test_support::whisky_fields(name),
            )
            .await
            .unwrap();
            ids.push(summary.id);
        }
        (session.id, ids)
    }

    #[tokio::test]
    async fn whiskies_are_appended_in_order() {
        let harness = test_support::harness().await;
        let (session_id, ids) = session_with_lineup(&harness, &["First", "Second", "Third"]).await;

        let aggregate = session_service::get_aggregate(&harness.state, session_id)
            .await
            .unwrap();
        let listed: Vec<Uuid> = aggregate.whiskies.iter().map(|w| w.id).collect();
        assert_eq!(listed, ids);
        assert_eq!(aggregate.whiskies[2].order_index, 2);
    }

    #[tokio::test]
    async fn reorder_swaps_with_the_neighbour() {
        let harness = test_support::harness().await;
        let (session_id, ids) = session_with_lineup(&harness, &["First", "Second", "Third"]).await;

        let response = reorder_whisky(&harness.state, session_id, ids[1], ReorderDirection::Up)
            .await
            .unwrap();
        assert_eq!(response.moved.id, ids[1]);
        assert_eq!(response.displaced.id, ids[0]);

        let aggregate = session_service::get_aggregate(&harness.state, session_id)
            .await
            .unwrap();
        let listed: Vec<Uuid> = aggregate.whiskies.iter().map(|w| w.id).collect();
        assert_eq!(listed, vec![ids[1], ids[0], ids[2]]);
    }

    #[tokio::test]
    async fn reorder_rejects_moves_past_the_edges() {
        let harness = test_support::harness().await;
        let (session_id, ids) = session_with_lineup(&harness, &["First", "Second"]).await;

        let err = reorder_whisky(&harness.state, session_id, ids[0], ReorderDirection::Up)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = reorder_whisky(&harness.state, session_id, ids[1], ReorderDirection::Down)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn lineup_is_frozen_once_collecting_starts() {
        let harness = test_support::harness().await;
        let (session_id, ids) = session_with_lineup(&harness, &["First", "Second"]).await;

        session_service::advance_status(
            &harness.state,
            session_id,
            AdvanceStatusRequest {
                status: SessionStatus::Collecting,
            },
        )
        .await
        .unwrap();

        let err = add_whisky(
            &harness.state,
            session_id,
            test_support::whisky_fields("Late entry"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        let err = reorder_whisky(&harness.state, session_id, ids[1], ReorderDirection::Up)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }
}
