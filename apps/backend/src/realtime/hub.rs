use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::game_transition::SessionTransition;
use crate::domain::state::SessionId;

/// Per-subscriber backlog before a slow receiver starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// What subscribers of a session receive after each committed action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionEvent {
    pub session_id: SessionId,
    /// Session version after the action committed.
    pub version: i32,
    pub transitions: Vec<SessionTransition>,
}

/// In-process fan-out of session events, one broadcast channel per session.
///
/// Publishing never blocks and never fails: with nobody listening the event
/// is dropped.
#[derive(Debug, Default)]
pub struct SessionHub {
    channels: DashMap<SessionId, broadcast::Sender<SessionEvent>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    pub fn subscribe(&self, session_id: SessionId) -> broadcast::Receiver<SessionEvent> {
        self.channels
            .entry(session_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Returns how many receivers got the event.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let session_id = event.session_id;
        let delivered = match self.channels.get(&session_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        };
        if delivered == 0 {
            // Everyone unsubscribed; forget the channel.
            self.channels
                .remove_if(&session_id, |_, sender| sender.receiver_count() == 0);
        }
        debug!(session_id, delivered, "Published session event");
        delivered
    }

    pub fn subscriber_count(&self, session_id: SessionId) -> usize {
        self.channels
            .get(&session_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}
