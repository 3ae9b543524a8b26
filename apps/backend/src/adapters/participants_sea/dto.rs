//! DTOs for participants_sea adapter.

use crate::entities::participants::ParticipantRole;

/// Per-game fields of one participant row. Written whenever the row differs
/// from what was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantUpdate {
    pub id: i64,
    pub alive: bool,
    pub role: ParticipantRole,
    pub has_clued: bool,
    pub clue_text: Option<String>,
    pub has_voted: bool,
    pub vote_target: Option<i64>,
    pub eliminated_round: Option<i16>,
}
