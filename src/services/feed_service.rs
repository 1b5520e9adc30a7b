use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    error::ServiceError,
    state::SharedState,
};

/// An owned slot on a session's feed hub.
///
/// Holding the handle keeps the hub entry alive; [`to_sse_stream`] releases
/// the slot when the client disconnects.
#[derive(Debug)]
pub struct FeedSubscription {
    session_id: Uuid,
    receiver: broadcast::Receiver<ServerEvent>,
}

/// Subscribe to the live feed of an existing session.
///
/// Fails with a not-found error when no session has the given id, so clients
/// cannot park streams on arbitrary ids.
pub async fn subscribe(
    state: &SharedState,
    session_id: Uuid,
) -> Result<FeedSubscription, ServiceError> {
    let store = state.require_session_store().await?;
    if store.load_aggregate(session_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "no session with id {session_id}"
        )));
    }

    let receiver = state.feed().subscribe(session_id);
    Ok(FeedSubscription {
        session_id,
        receiver,
    })
}

/// Convert a feed subscription into an SSE response, forwarding events and
/// releasing the hub slot once the client disconnects.
pub fn to_sse_stream(
    state: SharedState,
    subscription: FeedSubscription,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let FeedSubscription {
        session_id,
        mut receiver,
    } = subscription;

    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: reads from broadcast and pushes into mpsc
    tokio::spawn(async move {
        send_handshake(&state, &tx, session_id).await;

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            // Skip lagged messages but keep the stream alive;
                            // clients recover by re-fetching the aggregate.
                            continue;
                        }
                    }
                }
            }
        }

        // Own the state inside the spawned task so the slot is released even
        // if the request context has already dropped.
        state.feed().release(session_id);
        tracing::info!(%session_id, "session feed stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Push the initial handshake message onto a freshly opened stream.
async fn send_handshake(
    state: &SharedState,
    tx: &mpsc::Sender<Result<Event, Infallible>>,
    session_id: Uuid,
) {
    let handshake = Handshake {
        session_id: session_id.to_string(),
        message: "subscribed to session feed".into(),
        degraded: state.is_degraded().await,
    };
    match serde_json::to_string(&handshake) {
        Ok(data) => {
            let event = Event::default().event("handshake").data(data);
            let _ = tx.send(Ok(event)).await;
        }
        Err(err) => tracing::warn!(error = %err, "failed to serialize feed handshake"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dto::session::CreateSessionRequest, services::{session_service, test_support}};

    #[tokio::test]
    async fn subscribing_to_an_unknown_session_is_not_found() {
        let harness = test_support::harness().await;

        let err = subscribe(&harness.state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(harness.state.feed().active_sessions(), 0);
    }

    #[tokio::test]
    async fn subscription_receives_session_events() {
        let harness = test_support::harness().await;
        let session = session_service::create_session(
            &harness.state,
            CreateSessionRequest {
                host_name: "Amy".into(),
                host_user_id: None,
            },
        )
        .await
        .unwrap();

        let mut subscription = subscribe(&harness.state, session.id).await.unwrap();
        harness.state.feed().publish(
            session.id,
            ServerEvent::new(Some("session.updated".into()), "{}".into()),
        );

        let event = subscription.receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("session.updated"));

        harness.state.feed().release(subscription.session_id);
        assert_eq!(harness.state.feed().active_sessions(), 0);
    }
}
