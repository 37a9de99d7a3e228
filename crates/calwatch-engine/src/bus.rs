//! In-process event bus for engine events.

use tokio::sync::broadcast;

use calwatch_core::events::EngineEvent;

/// Broadcast-channel event bus.
///
/// Subscribed UI components receive every engine event after it happens,
/// replacing a fixed-interval poll. Delivery is lossy for subscribers that
/// fall behind the buffer; the store remains the source of truth.
#[derive(Debug)]
pub struct EventBus {
    /// The underlying broadcast sender.
    tx: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// Create a bus with the given buffer size per subscriber.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: EngineEvent) {
        // Send fails only when there are no subscribers; that is fine.
        let _ = self.tx.send(event);
    }

    /// Subscribe to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
