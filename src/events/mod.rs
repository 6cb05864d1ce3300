//! Session event hub.
//!
//! Every workflow change is published to a broadcast channel and kept in a
//! bounded history, so a late subscriber can render the recent past from a
//! snapshot and then follow the live stream.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use futures::stream::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::config::EventConfig;

mod types;

pub use types::SessionEvent;

/// Snapshot of hub state for reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EventSnapshot {
    pub recent: Vec<SessionEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Broadcast hub retaining a bounded history of session events.
pub struct EventHub {
    tx: broadcast::Sender<SessionEvent>,
    history: Mutex<VecDeque<SessionEvent>>,
    history_capacity: usize,
    total_events: AtomicU64,
    dropped_history: AtomicU64,
}

impl EventHub {
    pub fn new(config: &EventConfig) -> Self {
        let (tx, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            tx,
            history: Mutex::new(VecDeque::with_capacity(config.history_capacity)),
            history_capacity: config.history_capacity,
            total_events: AtomicU64::new(0),
            dropped_history: AtomicU64::new(0),
        }
    }

    fn lock_history(&self) -> MutexGuard<'_, VecDeque<SessionEvent>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn publish(&self, event: SessionEvent) {
        self.total_events.fetch_add(1, Ordering::Relaxed);
        if self.history_capacity > 0 {
            let mut history = self.lock_history();
            if history.len() == self.history_capacity {
                history.pop_front();
                self.dropped_history.fetch_add(1, Ordering::Relaxed);
            }
            history.push_back(event.clone());
        }

        // No receivers is fine
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Live events as a stream. Events missed by a lagging subscriber are
    /// skipped.
    pub fn stream(&self) -> impl Stream<Item = SessionEvent> + Send + 'static {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|item| async move {
            match item {
                Ok(event) => Some(event),
                Err(err) => {
                    tracing::warn!("[Events] Subscriber lagged: {}", err);
                    None
                }
            }
        })
    }

    pub fn snapshot(&self) -> EventSnapshot {
        let history = self.lock_history();
        EventSnapshot {
            recent: history.iter().cloned().collect(),
            total_events: self.total_events.load(Ordering::Relaxed),
            dropped_events: self.dropped_history.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(&EventConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VentType;

    fn vent(vent_type: VentType) -> SessionEvent {
        SessionEvent::VentChanged { vent_type }
    }

    #[test]
    fn hub_preserves_order_within_history() {
        let hub = EventHub::default();
        hub.publish(vent(VentType::Small));
        hub.publish(SessionEvent::PlaybackStopped);
        hub.publish(SessionEvent::TargetsGenerated { count: 2 });

        let snapshot = hub.snapshot();
        assert_eq!(snapshot.recent.len(), 3);
        assert_eq!(snapshot.recent[0], vent(VentType::Small));
        assert_eq!(snapshot.recent[2], SessionEvent::TargetsGenerated { count: 2 });
    }

    #[test]
    fn hub_drops_history_when_full() {
        let hub = EventHub::new(&EventConfig {
            channel_capacity: 8,
            history_capacity: 2,
        });
        hub.publish(vent(VentType::Small));
        hub.publish(vent(VentType::Medium));
        hub.publish(vent(VentType::Open));

        let snapshot = hub.snapshot();
        assert_eq!(snapshot.total_events, 3);
        assert_eq!(snapshot.dropped_events, 1);
        assert_eq!(snapshot.recent, vec![vent(VentType::Medium), vent(VentType::Open)]);
    }

    #[test]
    fn event_json_is_tagged() {
        let json = serde_json::to_value(SessionEvent::TargetsGenerated { count: 2 }).unwrap();
        assert_eq!(json["type"], "targets_generated");
        assert_eq!(json["payload"]["count"], 2);
    }

    #[tokio::test]
    async fn stream_delivers_live_events() {
        let hub = EventHub::default();
        let mut stream = Box::pin(hub.stream());
        hub.publish(SessionEvent::PlaybackStopped);
        assert_eq!(stream.next().await, Some(SessionEvent::PlaybackStopped));
    }

    #[tokio::test]
    async fn receiver_sees_events_after_subscribe() {
        let hub = EventHub::default();
        hub.publish(vent(VentType::Large));
        let mut rx = hub.subscribe();
        hub.publish(vent(VentType::Closed));
        assert_eq!(rx.recv().await.unwrap(), vent(VentType::Closed));
    }
}
