//! Session flow service - bridges the pure state machine with DB persistence.
//!
//! Every method runs inside a caller-owned transaction: load the snapshot,
//! apply one machine transition, persist the diff. Retrying and committing
//! are the engine's job.

use std::sync::Arc;

use crate::domain::words::WordBank;

mod lifecycle;
mod mutation;
mod player_actions;
mod repair;

pub use mutation::SessionMutation;

/// Cheap to clone; the word bank is shared.
#[derive(Debug, Clone)]
pub struct GameFlowService {
    words: Arc<WordBank>,
}

impl GameFlowService {
    pub fn new(words: Arc<WordBank>) -> Self {
        Self { words }
    }

    pub fn word_bank(&self) -> &WordBank {
        &self.words
    }
}

impl Default for GameFlowService {
    fn default() -> Self {
        Self::new(Arc::new(WordBank::builtin()))
    }
}
