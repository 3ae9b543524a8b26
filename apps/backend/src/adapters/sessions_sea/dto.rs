//! DTOs for sessions_sea adapter.

use crate::entities::sessions::{SessionOutcome, SessionPhase};

/// DTO for creating a new session in the Waiting phase.
#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub max_rounds: i16,
    pub undercover_count: i16,
    pub mr_white_count: i16,
}

impl SessionCreate {
    pub fn new(max_rounds: i16) -> Self {
        Self {
            max_rounds,
            undercover_count: 1,
            mr_white_count: 0,
        }
    }

    pub fn with_roles(mut self, undercover_count: i16, mr_white_count: i16) -> Self {
        self.undercover_count = undercover_count;
        self.mr_white_count = mr_white_count;
        self
    }
}

/// Full write of the mutable session columns, guarded by `expected_version`.
///
/// Every engine action rewrites the whole row; the version filter is what
/// serialises concurrent actions on the same session.
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub id: i64,
    pub phase: SessionPhase,
    pub round: i16,
    pub max_rounds: i16,
    pub turn_order: String,
    pub turn_index: Option<i16>,
    pub undercover_count: i16,
    pub mr_white_count: i16,
    pub guesser_id: Option<i64>,
    pub outcome: Option<SessionOutcome>,
    pub rng_seed: Option<Vec<u8>>,
    pub expected_version: i32,
}
