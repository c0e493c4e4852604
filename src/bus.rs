use crate::message::Message;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// A message finished translating and was appended to the store
    MessageAppended(Message),

    /// A non-fatal user-visible notice (e.g. a send failed to translate)
    Notice {
        level: NoticeLevel,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
    Success,
}

/// Broadcast bus the session publishes to after every append.
///
/// This is the explicit subscriber contract: interested parties (the HTTP
/// event stream, tests) subscribe and receive each event once; callers that
/// prefer pulling can ignore the bus and re-read the store instead.
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Buffered events per subscriber; a consumer that lags further than
    /// this sees `RecvError::Lagged` and keeps receiving newer events.
    const CAPACITY: usize = 256;

    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(Self::CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: Event) {
        // Publishing with nobody subscribed is not an error here
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
