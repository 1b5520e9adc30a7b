use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// Fan-out hub for realtime session change events.
///
/// Every viewing context (host dashboard, participant view) holds exactly one
/// subscription scoped to its session. Delivery is at-least-once and ordering
/// across distinct events is not guaranteed; subscribers react by re-fetching
/// the session aggregate, which makes duplicate delivery harmless. Hubs are
/// created lazily on first subscribe and removed again when the last
/// subscriber releases its slot, so an idle process carries no per-session
/// state.
pub struct LiveFeed {
    hubs: DashMap<Uuid, SessionHub>,
    capacity: usize,
}

struct SessionHub {
    sender: broadcast::Sender<ServerEvent>,
    subscribers: usize,
}

impl LiveFeed {
    /// Create a feed whose per-session broadcast channels buffer `capacity`
    /// events for slow subscribers before they start lagging.
    pub fn new(capacity: usize) -> Self {
        Self {
            hubs: DashMap::new(),
            capacity,
        }
    }

    /// Register a subscriber for the given session, creating the hub on
    /// first use. The returned receiver observes every event published after
    /// this call.
    pub fn subscribe(&self, session_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        let mut hub = self.hubs.entry(session_id).or_insert_with(|| {
            let (sender, _receiver) = broadcast::channel(self.capacity);
            SessionHub {
                sender,
                subscribers: 0,
            }
        });
        hub.subscribers += 1;
        hub.sender.subscribe()
    }

    /// Release one subscription slot for the session, tearing the hub down
    /// when it was the last one. Must be called exactly once per
    /// [`LiveFeed::subscribe`] when the stream ends.
    pub fn release(&self, session_id: Uuid) {
        let remove = match self.hubs.get_mut(&session_id) {
            Some(mut hub) => {
                hub.subscribers = hub.subscribers.saturating_sub(1);
                hub.subscribers == 0
            }
            None => false,
        };

        if remove {
            // Re-check under the entry lock: a new subscriber may have
            // arrived between the decrement and the removal.
            self.hubs
                .remove_if(&session_id, |_, hub| hub.subscribers == 0);
        }
    }

    /// Publish an event to every subscriber of the session. Events for
    /// sessions nobody watches are dropped, as are send failures: the feed
    /// is a change notification, not a durable queue.
    pub fn publish(&self, session_id: Uuid, event: ServerEvent) {
        if let Some(hub) = self.hubs.get(&session_id) {
            let _ = hub.sender.send(event);
        }
    }

    /// Number of sessions that currently have at least one subscriber.
    pub fn active_sessions(&self) -> usize {
        self.hubs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> ServerEvent {
        ServerEvent::new(Some(name.to_string()), "{}".to_string())
    }

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let feed = LiveFeed::new(8);
        let session_id = Uuid::new_v4();

        let mut receiver = feed.subscribe(session_id);
        feed.publish(session_id, event("participant.joined"));

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.event.as_deref(), Some("participant.joined"));
    }

    #[tokio::test]
    async fn events_are_scoped_to_their_session() {
        let feed = LiveFeed::new(8);
        let watched = Uuid::new_v4();
        let other = Uuid::new_v4();

        let mut receiver = feed.subscribe(watched);
        feed.publish(other, event("whisky.created"));
        feed.publish(watched, event("session.updated"));

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.event.as_deref(), Some("session.updated"));
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_subscriber_sees_each_event() {
        let feed = LiveFeed::new(8);
        let session_id = Uuid::new_v4();

        let mut host = feed.subscribe(session_id);
        let mut participant = feed.subscribe(session_id);
        feed.publish(session_id, event("submission.created"));

        assert_eq!(
            host.recv().await.unwrap().event.as_deref(),
            Some("submission.created")
        );
        assert_eq!(
            participant.recv().await.unwrap().event.as_deref(),
            Some("submission.created")
        );
    }

    #[test]
    fn last_release_removes_the_hub() {
        let feed = LiveFeed::new(8);
        let session_id = Uuid::new_v4();

        let first = feed.subscribe(session_id);
        let second = feed.subscribe(session_id);
        assert_eq!(feed.active_sessions(), 1);

        drop(first);
        feed.release(session_id);
        assert_eq!(feed.active_sessions(), 1);

        drop(second);
        feed.release(session_id);
        assert_eq!(feed.active_sessions(), 0);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let feed = LiveFeed::new(8);
        feed.publish(Uuid::new_v4(), event("session.updated"));
        assert_eq!(feed.active_sessions(), 0);
    }
}
