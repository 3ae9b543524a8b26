//! Test-only snapshot builders for domain unit tests.

use crate::domain::machine;
use crate::domain::roles::{Role, RoleConfig};
use crate::domain::state::{
    Ballot, Participant, ParticipantId, Phase, Session, SessionSnapshot, WordAssignment,
};
use crate::domain::words::WordBank;
use crate::test_bootstrap::logging;

pub const SEED: [u8; 32] = [42u8; 32];

/// Waiting session with participants 1..=n.
pub fn lobby(n: usize, roles: RoleConfig) -> SessionSnapshot {
    logging::init();
    SessionSnapshot {
        session: Session {
            id: 1,
            phase: Phase::Waiting,
            round: 0,
            max_rounds: 10,
            roles,
            turn_order: Vec::new(),
            rng_seed: None,
            version: 1,
        },
        participants: (1..=n as ParticipantId)
            .map(|id| Participant::new(id, format!("player-{id}")))
            .collect(),
        words: None,
    }
}

pub fn roles(undercover_count: u8, mr_white_count: u8) -> RoleConfig {
    RoleConfig {
        undercover_count,
        mr_white_count,
    }
}

/// Started game with the fixed test seed.
pub fn started(n: usize, config: RoleConfig) -> SessionSnapshot {
    let mut snap = lobby(n, config);
    machine::start_game(&mut snap, SEED, &WordBank::builtin()).expect("valid start");
    snap
}

/// Hand-built Discussion round with explicit roles and clue order.
pub fn discussion(roster: &[(ParticipantId, Role)], max_rounds: u16) -> SessionSnapshot {
    let mut snap = lobby(0, roles(1, 0));
    snap.participants = roster
        .iter()
        .map(|(id, role)| {
            let mut p = Participant::new(*id, format!("player-{id}"));
            p.role = *role;
            p
        })
        .collect();
    snap.session.turn_order = roster.iter().map(|(id, _)| *id).collect();
    snap.session.phase = Phase::Discussion { turn_index: 0 };
    snap.session.round = 1;
    snap.session.max_rounds = max_rounds;
    snap.session.rng_seed = Some(SEED);
    snap.session.roles = roles(
        roster.iter().filter(|(_, r)| *r == Role::Undercover).count() as u8,
        roster.iter().filter(|(_, r)| *r == Role::MrWhite).count() as u8,
    );
    snap.words = Some(WordAssignment {
        civilian_word: "coffee".into(),
        undercover_word: "tea".into(),
        mr_white_marker: Some("You are Mr. White".into()),
    });
    snap
}

/// Same as `discussion` but already in Voting.
pub fn voting(roster: &[(ParticipantId, Role)], max_rounds: u16) -> SessionSnapshot {
    let mut snap = discussion(roster, max_rounds);
    for p in &mut snap.participants {
        p.clue = Some("clue".into());
    }
    snap.session.phase = Phase::Voting;
    snap
}

/// Give every alive participant their clue in turn order.
pub fn clue_everyone(snap: &mut SessionSnapshot) {
    while let Some(holder) = snap.current_turn_holder() {
        machine::submit_clue(snap, holder, "hint").expect("turn holder can clue");
    }
}

pub fn role_of(snap: &SessionSnapshot, id: ParticipantId) -> Role {
    snap.participant(id).map(|p| p.role).expect("participant exists")
}

pub fn ballots(snap: &SessionSnapshot) -> Vec<Ballot> {
    snap.participants.iter().map(|p| p.ballot).collect()
}
