//! What one participant is allowed to see of a session.
//!
//! Civilians and undercovers are not told which of the two they are; they
//! only see their word. MrWhite sees the marker and its role. Roles of
//! eliminated participants are public, and Results reveals everything.

use serde::Serialize;

use crate::domain::roles::Role;
use crate::domain::state::{Participant, ParticipantId, Phase, PhaseKind, SessionId, SessionSnapshot};
use crate::domain::win::GameOutcome;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub session_id: SessionId,
    pub phase: PhaseKind,
    pub round: u16,
    pub max_rounds: u16,
    pub undercover_count: u8,
    pub mr_white_count: u8,
    pub current_turn: Option<ParticipantId>,
    pub guesser: Option<ParticipantId>,
    pub outcome: Option<GameOutcome>,
    pub me: SelfView,
    pub participants: Vec<PublicParticipant>,
    /// Both words, once the game is over.
    pub revealed_words: Option<RevealedWords>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelfView {
    pub id: ParticipantId,
    pub display_name: String,
    pub alive: bool,
    pub role: Option<Role>,
    pub word: Option<String>,
    pub has_clued: bool,
    pub has_voted: bool,
    pub vote_target: Option<ParticipantId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicParticipant {
    pub id: ParticipantId,
    pub display_name: String,
    pub alive: bool,
    pub has_clued: bool,
    pub clue: Option<String>,
    pub has_voted: bool,
    pub role: Option<Role>,
    pub eliminated_round: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealedWords {
    pub civilian_word: String,
    pub undercover_word: String,
}

fn public_role(p: &Participant, game_over: bool) -> Option<Role> {
    (game_over || !p.alive).then_some(p.role)
}

pub fn build_player_view(
    snap: &SessionSnapshot,
    viewer: ParticipantId,
) -> Result<PlayerView, DomainError> {
    let me = snap.require_participant(viewer)?;
    let phase = snap.session.phase;
    let game_over = matches!(phase, Phase::Results { .. });
    let in_game = phase != Phase::Waiting;

    let word = if in_game {
        snap.words
            .as_ref()
            .and_then(|w| w.word_for(me.role))
            .map(str::to_string)
    } else {
        None
    };
    let own_role = if !in_game {
        None
    } else if game_over || me.role == Role::MrWhite {
        Some(me.role)
    } else {
        public_role(me, false)
    };

    let guesser = match phase {
        Phase::MrWhiteGuessing { guesser } => Some(guesser),
        _ => None,
    };

    Ok(PlayerView {
        session_id: snap.session.id,
        phase: phase.kind(),
        round: snap.session.round,
        max_rounds: snap.session.max_rounds,
        undercover_count: snap.session.roles.undercover_count,
        mr_white_count: snap.session.roles.mr_white_count,
        current_turn: snap.awaiting_turn_holder(),
        guesser,
        outcome: phase.outcome(),
        me: SelfView {
            id: me.id,
            display_name: me.display_name.clone(),
            alive: me.alive,
            role: own_role,
            word,
            has_clued: me.has_clued(),
            has_voted: me.ballot.is_decided(),
            vote_target: me.ballot.target(),
        },
        participants: snap
            .participants
            .iter()
            .map(|p| PublicParticipant {
                id: p.id,
                display_name: p.display_name.clone(),
                alive: p.alive,
                has_clued: p.has_clued(),
                clue: p.clue.clone(),
                has_voted: p.ballot.is_decided(),
                role: if in_game { public_role(p, game_over) } else { None },
                eliminated_round: p.eliminated_round,
            })
            .collect(),
        revealed_words: if game_over {
            snap.words.as_ref().map(|w| RevealedWords {
                civilian_word: w.civilian_word.clone(),
                undercover_word: w.undercover_word.clone(),
            })
        } else {
            None
        },
    })
}
