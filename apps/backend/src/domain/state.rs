use serde::{Deserialize, Serialize};

use crate::domain::roles::{Role, RoleConfig};
use crate::domain::turns::next_turn;
use crate::domain::win::{AliveCounts, GameOutcome};
use crate::errors::domain::{DomainError, InfraErrorKind};

pub type SessionId = i64;
pub type ParticipantId = i64;

/// Smallest roster that can start a game.
pub const MIN_PLAYERS: usize = 3;
/// Largest roster a session accepts.
pub const MAX_PLAYERS: usize = 10;
/// A MrWhite needs at least this many players at the table.
pub const MIN_PLAYERS_WITH_MR_WHITE: usize = 4;
/// Bounds for the configurable round cap.
pub const MIN_ROUND_CAP: u16 = 1;
pub const MAX_ROUND_CAP: u16 = 30;

/// Session phase. Fields that only mean something in one phase live on
/// that variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Lobby: participants join and the host tunes the role counts.
    Waiting,
    /// Clue giving; `turn_index` points into `Session::turn_order`.
    Discussion { turn_index: usize },
    /// Every alive participant votes (or abstains).
    Voting,
    /// A MrWhite was voted out and may guess the civilian word.
    MrWhiteGuessing { guesser: ParticipantId },
    /// Terminal until restart/stop.
    Results { outcome: GameOutcome },
}

/// Phase without its payload, for storage and views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Waiting,
    Discussion,
    Voting,
    MrWhiteGuessing,
    Results,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Waiting => PhaseKind::Waiting,
            Phase::Discussion { .. } => PhaseKind::Discussion,
            Phase::Voting => PhaseKind::Voting,
            Phase::MrWhiteGuessing { .. } => PhaseKind::MrWhiteGuessing,
            Phase::Results { .. } => PhaseKind::Results,
        }
    }

    /// Discussion, Voting or MrWhiteGuessing.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Phase::Discussion { .. } | Phase::Voting | Phase::MrWhiteGuessing { .. }
        )
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self {
            Phase::Results { outcome } => Some(*outcome),
            _ => None,
        }
    }
}

/// A participant's vote for the current round.
///
/// "Decided" is tracked separately from "has a target": a voter who
/// re-casts the same target withdraws it but stays decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Ballot {
    #[default]
    Undecided,
    Abstained,
    For(ParticipantId),
}

impl Ballot {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Ballot::Undecided)
    }

    pub fn target(&self) -> Option<ParticipantId> {
        match self {
            Ballot::For(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub alive: bool,
    pub role: Role,
    /// Clue for the current round; `Some` means the participant has clued.
    pub clue: Option<String>,
    pub ballot: Ballot,
    pub eliminated_round: Option<u16>,
}

impl Participant {
    pub fn new(id: ParticipantId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            alive: true,
            role: Role::Civilian,
            clue: None,
            ballot: Ballot::Undecided,
            eliminated_round: None,
        }
    }

    pub fn has_clued(&self) -> bool {
        self.clue.is_some()
    }

    /// Alive and still owes a clue this round.
    pub fn awaiting_clue(&self) -> bool {
        self.alive && !self.has_clued()
    }

    pub fn clear_round_fields(&mut self) {
        self.clue = None;
        self.ballot = Ballot::Undecided;
    }

    pub fn eliminate(&mut self, round: u16) {
        self.alive = false;
        self.eliminated_round = Some(round);
    }
}

/// Words handed out at game start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAssignment {
    pub civilian_word: String,
    pub undercover_word: String,
    /// Present only when the game has MrWhite participants.
    pub mr_white_marker: Option<String>,
}

impl WordAssignment {
    /// What a participant holding `role` sees as their word.
    pub fn word_for(&self, role: Role) -> Option<&str> {
        match role {
            Role::Civilian => Some(self.civilian_word.as_str()),
            Role::Undercover => Some(self.undercover_word.as_str()),
            Role::MrWhite => self.mr_white_marker.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub phase: Phase,
    /// 0 while Waiting, 1 for the first round.
    pub round: u16,
    pub max_rounds: u16,
    pub roles: RoleConfig,
    /// Alive participants at the start of the current round, in clue order.
    pub turn_order: Vec<ParticipantId>,
    pub rng_seed: Option<[u8; 32]>,
    /// Optimistic lock version read with the snapshot.
    pub version: i32,
}

/// Everything one action needs: the session row, its roster and words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session: Session,
    /// Ordered by join time.
    pub participants: Vec<Participant>,
    pub words: Option<WordAssignment>,
}

impl SessionSnapshot {
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn require_participant(&self, id: ParticipantId) -> Result<&Participant, DomainError> {
        self.participant(id)
            .ok_or_else(|| DomainError::participant_not_found(id))
    }

    pub fn alive(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.alive)
    }

    pub fn alive_counts(&self) -> AliveCounts {
        AliveCounts::from_roles(self.alive().map(|p| p.role))
    }

    /// Participant the stored pointer names, if the pointer is valid.
    /// May lag behind after racing writes; see `awaiting_turn_holder`.
    pub fn current_turn_holder(&self) -> Option<ParticipantId> {
        match self.session.phase {
            Phase::Discussion { turn_index } => {
                self.session.turn_order.get(turn_index).copied()
            }
            _ => None,
        }
    }

    /// The slot actually awaited: the stored pointer if its participant
    /// still owes a clue, otherwise the next pending slot after it.
    pub fn awaiting_turn_index(&self) -> Option<usize> {
        let Phase::Discussion { turn_index } = self.session.phase else {
            return None;
        };
        let order = &self.session.turn_order;
        if order
            .get(turn_index)
            .is_some_and(|id| self.is_awaiting_clue(*id))
        {
            Some(turn_index)
        } else {
            next_turn(order, turn_index, |id| self.is_awaiting_clue(id))
        }
    }

    /// Participant whose clue will be accepted next.
    pub fn awaiting_turn_holder(&self) -> Option<ParticipantId> {
        self.awaiting_turn_index()
            .and_then(|i| self.session.turn_order.get(i).copied())
    }

    pub fn is_awaiting_clue(&self, id: ParticipantId) -> bool {
        self.participant(id).is_some_and(Participant::awaiting_clue)
    }

    pub fn require_seed(&self) -> Result<[u8; 32], DomainError> {
        self.session.rng_seed.ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("session {} is in play without an rng seed", self.session.id),
            )
        })
    }
}
