//! Pure session transitions.
//!
//! Every function here takes the loaded snapshot, validates the action
//! against it and mutates it in place. On `Err` the snapshot may be left
//! untouched or partially inspected, never partially written: validation
//! always completes before the first mutation.

use serde::Serialize;
use tracing::debug;

use crate::domain::roles::{assign_roles, Role, RoleConfig};
use crate::domain::seed_derivation::{rng_for, SeedPurpose};
use crate::domain::state::{
    Ballot, ParticipantId, Phase, SessionSnapshot, MAX_PLAYERS, MAX_ROUND_CAP, MIN_ROUND_CAP,
};
use crate::domain::turns::{build_turn_order, first_turn, next_turn};
use crate::domain::votes::{apply_vote, tally_alive, voting_complete, VoteTally};
use crate::domain::win::{evaluate, GameOutcome};
use crate::domain::words::{guess_matches, WordBank};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind, ValidationKind};

/// Where a submitted clue left the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClueOutcome {
    NextTurn { participant_id: ParticipantId },
    VotingStarted,
}

/// A vote that was voted out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Elimination {
    pub participant_id: ParticipantId,
    pub role: Role,
    /// MrWhite stays alive until the guess is judged.
    pub provisional: bool,
}

/// What follows a resolved round or guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundNext {
    NextRound { round: u16 },
    MrWhiteGuessing { guesser: ParticipantId },
    GameOver { outcome: GameOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundResolution {
    pub tally: VoteTally,
    pub elimination: Option<Elimination>,
    pub next: RoundNext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoteOutcome {
    Recorded { ballot: Ballot },
    Resolved(RoundResolution),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuessOutcome {
    pub correct: bool,
    pub next: RoundNext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepairOutcome {
    NoChange,
    TurnAdvanced { participant_id: ParticipantId },
    VotingStarted,
    RoundResolved(RoundResolution),
}

fn phase_error(action: &str, phase: Phase) -> DomainError {
    DomainError::phase_mismatch(format!("cannot {action} during {:?}", phase.kind()))
}

fn require_waiting(snap: &SessionSnapshot, action: &str) -> Result<(), DomainError> {
    match snap.session.phase {
        Phase::Waiting => Ok(()),
        other => Err(phase_error(action, other)),
    }
}

fn non_blank<'a>(text: &'a str, what: &str) -> Result<&'a str, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyInput,
            format!("{what} must not be blank"),
        ));
    }
    Ok(trimmed)
}

/// Validate a join; returns the trimmed display name to store.
pub fn ensure_can_join(snap: &SessionSnapshot, display_name: &str) -> Result<String, DomainError> {
    require_waiting(snap, "join")?;
    let name = non_blank(display_name, "display name")?;
    if snap.participants.len() >= MAX_PLAYERS {
        return Err(DomainError::validation(
            ValidationKind::SessionFull,
            format!("session already has {MAX_PLAYERS} participants"),
        ));
    }
    Ok(name.to_string())
}

pub fn ensure_can_leave(
    snap: &SessionSnapshot,
    participant_id: ParticipantId,
) -> Result<(), DomainError> {
    require_waiting(snap, "leave")?;
    snap.require_participant(participant_id)?;
    Ok(())
}

/// Change role counts and round cap while Waiting.
pub fn configure(
    snap: &mut SessionSnapshot,
    roles: RoleConfig,
    max_rounds: u16,
) -> Result<(), DomainError> {
    require_waiting(snap, "reconfigure")?;
    roles.validate_shape()?;
    if !(MIN_ROUND_CAP..=MAX_ROUND_CAP).contains(&max_rounds) {
        return Err(DomainError::validation(
            ValidationKind::InvalidConfiguration,
            format!("max rounds must be within {MIN_ROUND_CAP}..={MAX_ROUND_CAP}"),
        ));
    }
    snap.session.roles = roles;
    snap.session.max_rounds = max_rounds;
    Ok(())
}

/// Waiting -> Discussion: roles, words, first turn order, round 1.
pub fn start_game(
    snap: &mut SessionSnapshot,
    seed: [u8; 32],
    bank: &WordBank,
) -> Result<(), DomainError> {
    require_waiting(snap, "start")?;
    snap.session.roles.validate_for(snap.participants.len())?;
    if bank.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidConfiguration,
            "word bank is empty",
        ));
    }

    let ids: Vec<ParticipantId> = snap.participants.iter().map(|p| p.id).collect();
    let assigned = assign_roles(&ids, snap.session.roles, &mut rng_for(&seed, SeedPurpose::Roles, 1));
    for (id, role) in assigned {
        if let Some(p) = snap.participant_mut(id) {
            p.role = role;
            p.alive = true;
            p.eliminated_round = None;
            p.clear_round_fields();
        }
    }

    let pair = bank.pick(&mut rng_for(&seed, SeedPurpose::Words, 1));
    snap.words = Some(pair.into_assignment(snap.session.roles.mr_white_count > 0));
    snap.session.rng_seed = Some(seed);
    snap.session.round = 1;
    begin_discussion(snap, &seed)?;

    debug!(
        session_id = snap.session.id,
        players = ids.len(),
        undercovers = snap.session.roles.undercover_count,
        mr_whites = snap.session.roles.mr_white_count,
        "game started"
    );
    Ok(())
}

/// Fresh turn order for the current round over the alive set.
fn begin_discussion(snap: &mut SessionSnapshot, seed: &[u8; 32]) -> Result<(), DomainError> {
    let alive: Vec<(ParticipantId, Role)> = snap.alive().map(|p| (p.id, p.role)).collect();
    let mut rng = rng_for(seed, SeedPurpose::TurnOrder, snap.session.round);
    let order: Vec<ParticipantId> = build_turn_order(&alive, &mut rng)
        .into_iter()
        .map(|(id, _)| id)
        .collect();

    let participants = &snap.participants;
    let turn_index = first_turn(&order, |id| {
        participants.iter().any(|p| p.id == id && p.awaiting_clue())
    })
    .ok_or_else(|| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("session {} has nobody left to give a clue", snap.session.id),
        )
    })?;

    snap.session.turn_order = order;
    snap.session.phase = Phase::Discussion { turn_index };
    Ok(())
}

fn begin_voting(snap: &mut SessionSnapshot) {
    for p in &mut snap.participants {
        p.ballot = Ballot::Undecided;
    }
    snap.session.phase = Phase::Voting;
}

/// Next pending slot after `from`, or `None` when everyone alive has clued.
fn pending_after(snap: &SessionSnapshot, from: usize) -> Option<usize> {
    next_turn(&snap.session.turn_order, from, |id| snap.is_awaiting_clue(id))
}

pub fn submit_clue(
    snap: &mut SessionSnapshot,
    participant_id: ParticipantId,
    clue: &str,
) -> Result<ClueOutcome, DomainError> {
    let Phase::Discussion { .. } = snap.session.phase else {
        return Err(phase_error("submit a clue", snap.session.phase));
    };
    let caller = snap.require_participant(participant_id)?;
    if !caller.alive {
        return Err(DomainError::validation(
            ValidationKind::ParticipantEliminated,
            "eliminated participants cannot give clues",
        ));
    }
    if caller.has_clued() {
        return Err(DomainError::validation(
            ValidationKind::AlreadyActed,
            "clue already given this round",
        ));
    }
    let clue = non_blank(clue, "clue")?.to_string();

    let current = snap.awaiting_turn_index();
    let holder = current.and_then(|i| snap.session.turn_order.get(i).copied());
    let Some(current) = current.filter(|_| holder == Some(participant_id)) else {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            "another participant is giving a clue",
        ));
    };

    if let Some(p) = snap.participant_mut(participant_id) {
        p.clue = Some(clue);
    }

    match pending_after(snap, current) {
        Some(next) => {
            snap.session.phase = Phase::Discussion { turn_index: next };
            let participant_id = snap.session.turn_order[next];
            Ok(ClueOutcome::NextTurn { participant_id })
        }
        None => {
            begin_voting(snap);
            Ok(ClueOutcome::VotingStarted)
        }
    }
}

/// Discussion/Voting -> Voting with every ballot cleared.
pub fn force_voting(snap: &mut SessionSnapshot) -> Result<(), DomainError> {
    match snap.session.phase {
        Phase::Discussion { .. } | Phase::Voting => {
            begin_voting(snap);
            Ok(())
        }
        other => Err(phase_error("force voting", other)),
    }
}

pub fn cast_vote(
    snap: &mut SessionSnapshot,
    voter_id: ParticipantId,
    target_id: ParticipantId,
) -> Result<VoteOutcome, DomainError> {
    if snap.session.phase != Phase::Voting {
        return Err(phase_error("vote", snap.session.phase));
    }
    let voter = snap.require_participant(voter_id)?;
    if !voter.alive {
        return Err(DomainError::validation(
            ValidationKind::InvalidVote,
            "eliminated participants cannot vote",
        ));
    }
    if voter_id == target_id {
        return Err(DomainError::validation(
            ValidationKind::InvalidVote,
            "participants cannot vote for themselves",
        ));
    }
    match snap.participant(target_id) {
        None => {
            return Err(DomainError::validation(
                ValidationKind::InvalidVote,
                format!("participant {target_id} is not in this session"),
            ))
        }
        Some(target) if !target.alive => {
            return Err(DomainError::validation(
                ValidationKind::InvalidVote,
                format!("participant {target_id} has been eliminated"),
            ))
        }
        Some(_) => {}
    }

    let ballot = apply_vote(voter.ballot, target_id);
    if let Some(p) = snap.participant_mut(voter_id) {
        p.ballot = ballot;
    }

    if voting_complete(&snap.participants) {
        Ok(VoteOutcome::Resolved(resolve_round(snap)?))
    } else {
        Ok(VoteOutcome::Recorded { ballot })
    }
}

fn finish(snap: &mut SessionSnapshot, outcome: GameOutcome) -> RoundNext {
    snap.session.phase = Phase::Results { outcome };
    RoundNext::GameOver { outcome }
}

fn start_next_round(snap: &mut SessionSnapshot) -> Result<RoundNext, DomainError> {
    let seed = snap.require_seed()?;
    snap.session.round += 1;
    for p in &mut snap.participants {
        p.clear_round_fields();
    }
    begin_discussion(snap, &seed)?;
    Ok(RoundNext::NextRound {
        round: snap.session.round,
    })
}

/// Win check on the current alive set; ends the game or opens the next round.
fn settle(snap: &mut SessionSnapshot) -> Result<RoundNext, DomainError> {
    match evaluate(
        snap.alive_counts(),
        snap.session.round,
        snap.session.max_rounds,
    ) {
        Some(outcome) => Ok(finish(snap, outcome)),
        None => start_next_round(snap),
    }
}

/// Tally the decided ballots and apply the result.
fn resolve_round(snap: &mut SessionSnapshot) -> Result<RoundResolution, DomainError> {
    let tally = tally_alive(&snap.participants);
    let round = snap.session.round;

    let Some(eliminated_id) = tally.eliminated else {
        let next = settle(snap)?;
        return Ok(RoundResolution {
            tally,
            elimination: None,
            next,
        });
    };

    let role = snap.require_participant(eliminated_id)?.role;
    if role == Role::MrWhite {
        snap.session.phase = Phase::MrWhiteGuessing {
            guesser: eliminated_id,
        };
        return Ok(RoundResolution {
            tally,
            elimination: Some(Elimination {
                participant_id: eliminated_id,
                role,
                provisional: true,
            }),
            next: RoundNext::MrWhiteGuessing {
                guesser: eliminated_id,
            },
        });
    }

    if let Some(p) = snap.participant_mut(eliminated_id) {
        p.eliminate(round);
    }
    let next = settle(snap)?;
    Ok(RoundResolution {
        tally,
        elimination: Some(Elimination {
            participant_id: eliminated_id,
            role,
            provisional: false,
        }),
        next,
    })
}

/// MrWhiteGuessing -> Results | Discussion.
pub fn submit_guess(
    snap: &mut SessionSnapshot,
    participant_id: ParticipantId,
    guess: &str,
) -> Result<GuessOutcome, DomainError> {
    let Phase::MrWhiteGuessing { guesser } = snap.session.phase else {
        return Err(phase_error("guess", snap.session.phase));
    };
    snap.require_participant(participant_id)?;
    if participant_id != guesser {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            "only the eliminated Mr. White may guess",
        ));
    }
    let guess = non_blank(guess, "guess")?;
    let civilian_word = snap
        .words
        .as_ref()
        .map(|w| w.civilian_word.clone())
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::WordAssignment,
                format!("session {} has no words assigned", snap.session.id),
            )
        })?;

    if guess_matches(guess, &civilian_word) {
        let next = finish(snap, GameOutcome::MrWhiteWin);
        return Ok(GuessOutcome {
            correct: true,
            next,
        });
    }

    let round = snap.session.round;
    if let Some(p) = snap.participant_mut(guesser) {
        p.eliminate(round);
    }
    let next = settle(snap)?;
    Ok(GuessOutcome {
        correct: false,
        next,
    })
}

/// Back to a clean Waiting lobby; roster kept, game state dropped.
fn reset_to_waiting(snap: &mut SessionSnapshot) {
    let session = &mut snap.session;
    session.phase = Phase::Waiting;
    session.round = 0;
    session.turn_order.clear();
    session.rng_seed = None;
    snap.words = None;
    for p in &mut snap.participants {
        p.alive = true;
        p.role = Role::Civilian;
        p.eliminated_round = None;
        p.clear_round_fields();
    }
}

/// Results -> Waiting.
pub fn restart(snap: &mut SessionSnapshot) -> Result<(), DomainError> {
    match snap.session.phase {
        Phase::Results { .. } => {
            reset_to_waiting(snap);
            Ok(())
        }
        other => Err(phase_error("restart", other)),
    }
}

/// Any active phase or Results -> Waiting.
pub fn stop(snap: &mut SessionSnapshot) -> Result<(), DomainError> {
    match snap.session.phase {
        Phase::Waiting => Err(phase_error("stop", Phase::Waiting)),
        _ => {
            reset_to_waiting(snap);
            Ok(())
        }
    }
}

/// Reconcile the turn pointer and completion flags after racing writes.
/// Idempotent: a consistent session reports `NoChange`.
pub fn repair(snap: &mut SessionSnapshot) -> Result<RepairOutcome, DomainError> {
    match snap.session.phase {
        Phase::Discussion { turn_index } => match snap.awaiting_turn_index() {
            Some(i) if i == turn_index => Ok(RepairOutcome::NoChange),
            Some(i) => {
                snap.session.phase = Phase::Discussion { turn_index: i };
                Ok(RepairOutcome::TurnAdvanced {
                    participant_id: snap.session.turn_order[i],
                })
            }
            None => {
                begin_voting(snap);
                Ok(RepairOutcome::VotingStarted)
            }
        },
        Phase::Voting if voting_complete(&snap.participants) => {
            Ok(RepairOutcome::RoundResolved(resolve_round(snap)?))
        }
        _ => Ok(RepairOutcome::NoChange),
    }
}
