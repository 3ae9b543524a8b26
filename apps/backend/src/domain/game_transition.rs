//! Edge-triggered session transitions, derived by diffing two views.

use serde::Serialize;

use crate::domain::state::{ParticipantId, Phase, PhaseKind, SessionSnapshot};
use crate::domain::win::GameOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLifecycleView {
    pub version: i32,
    pub phase: PhaseKind,
    pub round: u16,
    pub turn: Option<ParticipantId>,
    pub guesser: Option<ParticipantId>,
    pub outcome: Option<GameOutcome>,
    pub alive: Vec<ParticipantId>,
    pub roster: Vec<ParticipantId>,
}

impl SessionLifecycleView {
    pub fn from_snapshot(snap: &SessionSnapshot) -> Self {
        Self {
            version: snap.session.version,
            phase: snap.session.phase.kind(),
            round: snap.session.round,
            turn: snap.awaiting_turn_holder(),
            guesser: match snap.session.phase {
                Phase::MrWhiteGuessing { guesser } => Some(guesser),
                _ => None,
            },
            outcome: snap.session.phase.outcome(),
            alive: snap.alive().map(|p| p.id).collect(),
            roster: snap.participants.iter().map(|p| p.id).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionTransition {
    /// Waiting -> Discussion
    GameStarted,
    /// A new clue giver is up.
    TurnBecame { participant_id: ParticipantId },
    /// Clue phase is over (or was cut short).
    VotingStarted,
    /// Round counter moved past 1.
    RoundStarted { round: u16 },
    /// A participant was marked dead.
    ParticipantEliminated { participant_id: ParticipantId },
    /// A MrWhite was voted out and is guessing.
    GuessingStarted { participant_id: ParticipantId },
    /// Entered Results.
    GameEnded { outcome: GameOutcome },
    /// Back to Waiting from a game.
    GameReset,
    ParticipantJoined { participant_id: ParticipantId },
    ParticipantLeft { participant_id: ParticipantId },
}

/// Derive transitions from before/after lifecycle state, in the order
/// they happened.
pub fn derive_session_transitions(
    before: &SessionLifecycleView,
    after: &SessionLifecycleView,
) -> Vec<SessionTransition> {
    let mut transitions = Vec::new();

    // 1. Roster changes (only possible while Waiting)
    for id in after.roster.iter().filter(|id| !before.roster.contains(id)) {
        transitions.push(SessionTransition::ParticipantJoined {
            participant_id: *id,
        });
    }
    for id in before.roster.iter().filter(|id| !after.roster.contains(id)) {
        transitions.push(SessionTransition::ParticipantLeft {
            participant_id: *id,
        });
    }

    // 2. Reset wipes everything else
    if before.phase != PhaseKind::Waiting && after.phase == PhaseKind::Waiting {
        transitions.push(SessionTransition::GameReset);
        return transitions;
    }

    if before.phase == PhaseKind::Waiting && after.phase != PhaseKind::Waiting {
        transitions.push(SessionTransition::GameStarted);
    }

    // 3. Eliminations (skip the start, where everyone is revived)
    if before.phase != PhaseKind::Waiting {
        for id in before.alive.iter().filter(|id| !after.alive.contains(id)) {
            transitions.push(SessionTransition::ParticipantEliminated {
                participant_id: *id,
            });
        }
    }

    if before.phase != PhaseKind::MrWhiteGuessing && after.phase == PhaseKind::MrWhiteGuessing {
        if let Some(participant_id) = after.guesser {
            transitions.push(SessionTransition::GuessingStarted { participant_id });
        }
    }

    if after.round > before.round && after.round > 1 {
        transitions.push(SessionTransition::RoundStarted { round: after.round });
    }

    // 4. Phase edges inside a game
    if after.phase == PhaseKind::Voting && (before.phase != PhaseKind::Voting || after.round != before.round)
    {
        transitions.push(SessionTransition::VotingStarted);
    }

    if let (Some(participant_id), PhaseKind::Discussion) = (after.turn, after.phase) {
        if before.turn != Some(participant_id) || before.round != after.round {
            transitions.push(SessionTransition::TurnBecame { participant_id });
        }
    }

    if before.phase != PhaseKind::Results && after.phase == PhaseKind::Results {
        if let Some(outcome) = after.outcome {
            transitions.push(SessionTransition::GameEnded { outcome });
        }
    }

    transitions
}
