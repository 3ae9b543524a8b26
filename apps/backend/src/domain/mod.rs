//! Domain layer: pure game logic types and helpers.

pub mod game_transition;
pub mod machine;
pub mod player_view;
pub mod roles;
pub mod seed_derivation;
pub mod state;
pub mod turns;
pub mod votes;
pub mod win;
pub mod words;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_machine;
#[cfg(test)]
mod tests_player_view;
#[cfg(test)]
mod tests_props_rounds;
#[cfg(test)]
mod tests_props_votes;

// Re-exports for ergonomics
pub use game_transition::{derive_session_transitions, SessionLifecycleView, SessionTransition};
pub use player_view::{build_player_view, PlayerView};
pub use roles::{Role, RoleConfig};
pub use state::{Ballot, Participant, ParticipantId, Phase, PhaseKind, Session, SessionId, SessionSnapshot, WordAssignment};
pub use win::{AliveCounts, GameOutcome};
pub use words::WordBank;
