//! Scenario tests for the session state machine (pure domain, no DB).

use crate::domain::machine::{
    self, ClueOutcome, Elimination, GuessOutcome, RepairOutcome, RoundNext, VoteOutcome,
};
use crate::domain::roles::Role;
use crate::domain::state::{Ballot, Phase, PhaseKind};
use crate::domain::test_state_helpers::{
    ballots, clue_everyone, discussion, lobby, role_of, roles, started, voting, SEED,
};
use crate::domain::win::GameOutcome;
use crate::domain::words::WordBank;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

const A: i64 = 1;
const B: i64 = 2;
const C: i64 = 3;
const D: i64 = 4;
const E: i64 = 5;

fn kind(err: DomainError) -> Option<ValidationKind> {
    err.validation_kind()
}

fn resolved(outcome: VoteOutcome) -> machine::RoundResolution {
    match outcome {
        VoteOutcome::Resolved(resolution) => resolution,
        other => panic!("expected a resolved round, got {other:?}"),
    }
}

// ---------- start ----------

#[test]
fn three_players_one_undercover_start() {
    let snap = started(3, roles(1, 0));

    let undercovers = snap
        .participants
        .iter()
        .filter(|p| p.role == Role::Undercover)
        .count();
    let civilians = snap
        .participants
        .iter()
        .filter(|p| p.role == Role::Civilian)
        .count();
    assert_eq!(undercovers, 1);
    assert_eq!(civilians, 2);

    let words = snap.words.as_ref().expect("words assigned");
    assert_ne!(words.civilian_word, words.undercover_word);
    assert_eq!(words.mr_white_marker, None);

    assert_eq!(snap.session.round, 1);
    assert_eq!(snap.session.phase.kind(), PhaseKind::Discussion);
    assert_eq!(snap.session.rng_seed, Some(SEED));
    let mut order = snap.session.turn_order.clone();
    order.sort_unstable();
    assert_eq!(order, vec![A, B, C]);
    let holder = snap.current_turn_holder().expect("someone is up");
    assert!(snap.is_awaiting_clue(holder));
}

#[test]
fn start_with_mr_white_sets_marker_and_keeps_slot_zero_clear() {
    let snap = started(6, roles(1, 1));
    assert!(snap.words.as_ref().and_then(|w| w.mr_white_marker.as_ref()).is_some());
    let first = snap.session.turn_order[0];
    assert_ne!(role_of(&snap, first), Role::MrWhite);
}

#[test]
fn start_rejects_bad_roster_without_touching_state() {
    let mut snap = lobby(2, roles(1, 0));
    let before = snap.clone();
    let err = machine::start_game(&mut snap, SEED, &WordBank::builtin()).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::InvalidPlayerCount));
    assert_eq!(snap, before);

    let mut snap = lobby(3, roles(1, 1));
    let err = machine::start_game(&mut snap, SEED, &WordBank::builtin()).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::InvalidConfiguration));
}

#[test]
fn start_twice_is_a_phase_mismatch() {
    let mut snap = started(4, roles(1, 0));
    let err = machine::start_game(&mut snap, SEED, &WordBank::builtin()).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::PhaseMismatch));
}

#[test]
fn same_seed_replays_the_same_start() {
    let a = started(7, roles(2, 1));
    let b = started(7, roles(2, 1));
    assert_eq!(a, b);
}

// ---------- clues ----------

#[test]
fn only_the_turn_holder_may_clue() {
    let mut snap = discussion(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);

    let err = machine::submit_clue(&mut snap, B, "bean").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::NotYourTurn));

    let outcome = machine::submit_clue(&mut snap, A, "  bean ").unwrap();
    assert_eq!(outcome, ClueOutcome::NextTurn { participant_id: B });
    assert_eq!(
        snap.participant(A).and_then(|p| p.clue.as_deref()),
        Some("bean")
    );

    let err = machine::submit_clue(&mut snap, A, "again").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::AlreadyActed));
}

#[test]
fn blank_clue_is_rejected() {
    let mut snap = discussion(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    let err = machine::submit_clue(&mut snap, A, "   ").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::EmptyInput));
    assert!(!snap.participant(A).is_some_and(|p| p.has_clued()));
}

#[test]
fn last_clue_opens_voting() {
    let mut snap = discussion(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    machine::submit_clue(&mut snap, A, "a").unwrap();
    machine::submit_clue(&mut snap, B, "b").unwrap();
    let outcome = machine::submit_clue(&mut snap, C, "c").unwrap();
    assert_eq!(outcome, ClueOutcome::VotingStarted);
    assert_eq!(snap.session.phase, Phase::Voting);
    assert!(ballots(&snap).iter().all(|b| *b == Ballot::Undecided));
}

#[test]
fn dead_participants_are_skipped_and_cannot_clue() {
    let mut snap = discussion(
        &[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian), (D, Role::Civilian)],
        10,
    );
    if let Some(p) = snap.participant_mut(B) {
        p.eliminate(1);
    }
    let err = machine::submit_clue(&mut snap, B, "b").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::ParticipantEliminated));

    let outcome = machine::submit_clue(&mut snap, A, "a").unwrap();
    assert_eq!(outcome, ClueOutcome::NextTurn { participant_id: C });
}

#[test]
fn stale_pointer_is_followed_on_submit() {
    let mut snap = discussion(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    // A clued but the pointer never moved
    if let Some(p) = snap.participant_mut(A) {
        p.clue = Some("a".into());
    }
    let outcome = machine::submit_clue(&mut snap, B, "b").unwrap();
    assert_eq!(outcome, ClueOutcome::NextTurn { participant_id: C });
}

#[test]
fn clue_outside_discussion_is_a_phase_mismatch() {
    let mut snap = lobby(3, roles(1, 0));
    let err = machine::submit_clue(&mut snap, A, "a").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::PhaseMismatch));
}

// ---------- force voting ----------

#[test]
fn force_voting_clears_ballots() {
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian), (D, Role::Civilian)], 10);
    machine::cast_vote(&mut snap, A, B).unwrap();
    machine::force_voting(&mut snap).unwrap();
    assert!(ballots(&snap).iter().all(|b| *b == Ballot::Undecided));

    let mut snap = discussion(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    machine::force_voting(&mut snap).unwrap();
    assert_eq!(snap.session.phase, Phase::Voting);

    let mut snap = lobby(3, roles(1, 0));
    let err = machine::force_voting(&mut snap).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::PhaseMismatch));
}

// ---------- votes ----------

#[test]
fn invalid_votes_are_rejected() {
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian), (D, Role::Civilian)], 10);
    if let Some(p) = snap.participant_mut(D) {
        p.eliminate(1);
    }

    let self_vote = machine::cast_vote(&mut snap, A, A).unwrap_err();
    assert_eq!(kind(self_vote), Some(ValidationKind::InvalidVote));

    let dead_target = machine::cast_vote(&mut snap, A, D).unwrap_err();
    assert_eq!(kind(dead_target), Some(ValidationKind::InvalidVote));

    let dead_voter = machine::cast_vote(&mut snap, D, A).unwrap_err();
    assert_eq!(kind(dead_voter), Some(ValidationKind::InvalidVote));

    let stranger = machine::cast_vote(&mut snap, A, 99).unwrap_err();
    assert_eq!(kind(stranger), Some(ValidationKind::InvalidVote));

    let unknown_voter = machine::cast_vote(&mut snap, 99, A).unwrap_err();
    assert!(matches!(
        unknown_voter,
        DomainError::NotFound(NotFoundKind::Participant, _)
    ));

    assert!(ballots(&snap).iter().all(|b| *b == Ballot::Undecided));
}

#[test]
fn vote_outside_voting_is_a_phase_mismatch() {
    let mut snap = discussion(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    let err = machine::cast_vote(&mut snap, A, B).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::PhaseMismatch));
}

#[test]
fn recast_same_target_abstains_and_counts_as_decided() {
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    let first = machine::cast_vote(&mut snap, A, B).unwrap();
    assert_eq!(first, VoteOutcome::Recorded { ballot: Ballot::For(B) });
    let second = machine::cast_vote(&mut snap, A, B).unwrap();
    assert_eq!(second, VoteOutcome::Recorded { ballot: Ballot::Abstained });
    let third = machine::cast_vote(&mut snap, A, C).unwrap();
    assert_eq!(third, VoteOutcome::Recorded { ballot: Ballot::For(C) });
}

#[test]
fn majority_eliminates_and_game_continues() {
    // D is the undercover; B is a civilian voted out
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Civilian), (C, Role::Civilian), (D, Role::Undercover)], 10);
    machine::cast_vote(&mut snap, A, B).unwrap();
    machine::cast_vote(&mut snap, C, B).unwrap();
    machine::cast_vote(&mut snap, B, A).unwrap();
    machine::cast_vote(&mut snap, B, A).unwrap(); // withdraw
    let resolution = resolved(machine::cast_vote(&mut snap, D, A).unwrap());

    assert_eq!(resolution.tally.counts.get(&B), Some(&2));
    assert_eq!(resolution.tally.counts.get(&A), Some(&1));
    assert!(!resolution.tally.tie);
    assert_eq!(
        resolution.elimination,
        Some(Elimination {
            participant_id: B,
            role: Role::Civilian,
            provisional: false
        })
    );
    assert_eq!(resolution.next, RoundNext::NextRound { round: 2 });

    assert_eq!(snap.session.round, 2);
    assert!(!snap.participant(B).is_some_and(|p| p.alive));
    assert_eq!(snap.participant(B).and_then(|p| p.eliminated_round), Some(1));
    assert!(!snap.session.turn_order.contains(&B));
    assert_eq!(snap.session.turn_order.len(), 3);
    assert!(snap.participants.iter().all(|p| p.clue.is_none()));
    assert!(ballots(&snap).iter().all(|b| *b == Ballot::Undecided));
    let holder = snap.current_turn_holder().expect("new round has a holder");
    assert!(snap.is_awaiting_clue(holder));
}

#[test]
fn voting_out_the_last_undercover_ends_the_game() {
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian), (D, Role::Civilian)], 10);
    machine::cast_vote(&mut snap, A, B).unwrap();
    machine::cast_vote(&mut snap, C, B).unwrap();
    machine::cast_vote(&mut snap, D, A).unwrap();
    let resolution = resolved(machine::cast_vote(&mut snap, B, C).unwrap());
    assert_eq!(resolution.tally.eliminated, Some(B));
    assert_eq!(
        resolution.next,
        RoundNext::GameOver {
            outcome: GameOutcome::CiviliansWin
        }
    );
    assert_eq!(
        snap.session.phase,
        Phase::Results {
            outcome: GameOutcome::CiviliansWin
        }
    );
}

#[test]
fn tie_means_no_elimination_and_a_new_round() {
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian), (D, Role::Civilian)], 10);
    // B and D end up decided without a target
    machine::cast_vote(&mut snap, D, C).unwrap();
    machine::cast_vote(&mut snap, B, D).unwrap();
    machine::cast_vote(&mut snap, B, D).unwrap();
    machine::cast_vote(&mut snap, D, C).unwrap();
    machine::cast_vote(&mut snap, A, B).unwrap();
    let resolution = resolved(machine::cast_vote(&mut snap, C, A).unwrap());

    assert_eq!(resolution.tally.counts.len(), 2);

    assert!(resolution.tally.tie);
    assert_eq!(resolution.tally.eliminated, None);
    assert_eq!(resolution.elimination, None);
    assert_eq!(resolution.next, RoundNext::NextRound { round: 2 });
    assert!(snap.participants.iter().all(|p| p.alive));
}

#[test]
fn round_cap_ends_the_game() {
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian), (D, Role::Civilian)], 1);
    machine::cast_vote(&mut snap, A, B).unwrap();
    machine::cast_vote(&mut snap, B, A).unwrap();
    machine::cast_vote(&mut snap, C, D).unwrap();
    let resolution = resolved(machine::cast_vote(&mut snap, D, C).unwrap());
    assert!(resolution.tally.tie);
    assert_eq!(
        resolution.next,
        RoundNext::GameOver {
            outcome: GameOutcome::MaxRoundsReached
        }
    );
}

// ---------- Mr. White ----------

fn mr_white_table() -> crate::domain::state::SessionSnapshot {
    let mut snap = voting(
        &[
            (A, Role::Civilian),
            (B, Role::Civilian),
            (C, Role::Civilian),
            (D, Role::MrWhite),
            (E, Role::Undercover),
        ],
        10,
    );
    for voter in [A, B, C, E] {
        machine::cast_vote(&mut snap, voter, D).unwrap();
    }
    let resolution = resolved(machine::cast_vote(&mut snap, D, A).unwrap());
    assert_eq!(
        resolution.elimination,
        Some(Elimination {
            participant_id: D,
            role: Role::MrWhite,
            provisional: true
        })
    );
    assert_eq!(resolution.next, RoundNext::MrWhiteGuessing { guesser: D });
    snap
}

#[test]
fn voted_out_mr_white_guesses_while_alive() {
    let snap = mr_white_table();
    assert_eq!(snap.session.phase, Phase::MrWhiteGuessing { guesser: D });
    assert!(snap.participant(D).is_some_and(|p| p.alive));
}

#[test]
fn correct_guess_wins_for_mr_white() {
    let mut snap = mr_white_table();
    let outcome = machine::submit_guess(&mut snap, D, "  COFFEE ").unwrap();
    assert_eq!(
        outcome,
        GuessOutcome {
            correct: true,
            next: RoundNext::GameOver {
                outcome: GameOutcome::MrWhiteWin
            }
        }
    );
    assert!(snap.participant(D).is_some_and(|p| p.alive));
}

#[test]
fn wrong_guess_kills_mr_white_and_play_continues() {
    let mut snap = mr_white_table();
    let outcome = machine::submit_guess(&mut snap, D, "tea").unwrap();
    assert!(!outcome.correct);
    assert_eq!(outcome.next, RoundNext::NextRound { round: 2 });
    assert!(!snap.participant(D).is_some_and(|p| p.alive));
    assert!(!snap.session.turn_order.contains(&D));
}

#[test]
fn only_the_guesser_may_guess() {
    let mut snap = mr_white_table();
    let err = machine::submit_guess(&mut snap, A, "coffee").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::NotYourTurn));
    let err = machine::submit_guess(&mut snap, D, " ").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::EmptyInput));
}

// ---------- restart / stop ----------

#[test]
fn restart_only_from_results() {
    let mut snap = started(4, roles(1, 0));
    let err = machine::restart(&mut snap).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::PhaseMismatch));

    snap.session.phase = Phase::Results {
        outcome: GameOutcome::CiviliansWin,
    };
    if let Some(p) = snap.participants.first_mut() {
        p.eliminate(1);
    }
    machine::restart(&mut snap).unwrap();
    assert_eq!(snap.session.phase, Phase::Waiting);
    assert_eq!(snap.session.round, 0);
    assert!(snap.session.turn_order.is_empty());
    assert!(snap.session.rng_seed.is_none());
    assert!(snap.words.is_none());
    assert!(snap
        .participants
        .iter()
        .all(|p| p.alive && p.role == Role::Civilian && p.clue.is_none() && p.eliminated_round.is_none()));
}

#[test]
fn stop_aborts_an_active_game() {
    let mut snap = started(5, roles(1, 1));
    clue_everyone(&mut snap);
    assert_eq!(snap.session.phase, Phase::Voting);
    machine::stop(&mut snap).unwrap();
    assert_eq!(snap.session.phase, Phase::Waiting);
    assert!(ballots(&snap).iter().all(|b| *b == Ballot::Undecided));

    let err = machine::stop(&mut snap).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::PhaseMismatch));
}

// ---------- lobby ----------

#[test]
fn join_rules() {
    let snap = lobby(10, roles(1, 0));
    let err = machine::ensure_can_join(&snap, "late").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::SessionFull));

    let snap = lobby(2, roles(1, 0));
    let err = machine::ensure_can_join(&snap, "   ").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::EmptyInput));
    assert_eq!(machine::ensure_can_join(&snap, " Ada ").unwrap(), "Ada");

    let snap = started(3, roles(1, 0));
    let err = machine::ensure_can_join(&snap, "late").unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::PhaseMismatch));
}

#[test]
fn configure_rules() {
    let mut snap = lobby(3, roles(1, 0));
    machine::configure(&mut snap, roles(2, 1), 12).unwrap();
    assert_eq!(snap.session.roles, roles(2, 1));
    assert_eq!(snap.session.max_rounds, 12);

    let err = machine::configure(&mut snap, roles(0, 1), 12).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::InvalidConfiguration));
    let err = machine::configure(&mut snap, roles(5, 5), 12).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::InvalidConfiguration));
    let err = machine::configure(&mut snap, roles(1, 0), 0).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::InvalidConfiguration));
    let err = machine::configure(&mut snap, roles(1, 0), 31).unwrap_err();
    assert_eq!(kind(err), Some(ValidationKind::InvalidConfiguration));
    assert_eq!(snap.session.max_rounds, 12);
}

// ---------- repair ----------

#[test]
fn repair_advances_a_stale_pointer() {
    let mut snap = discussion(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    if let Some(p) = snap.participant_mut(A) {
        p.clue = Some("a".into());
    }
    assert_eq!(
        machine::repair(&mut snap).unwrap(),
        RepairOutcome::TurnAdvanced { participant_id: B }
    );
    assert_eq!(machine::repair(&mut snap).unwrap(), RepairOutcome::NoChange);
}

#[test]
fn repair_opens_voting_when_everyone_clued() {
    let mut snap = discussion(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    for p in &mut snap.participants {
        p.clue = Some("x".into());
    }
    assert_eq!(machine::repair(&mut snap).unwrap(), RepairOutcome::VotingStarted);
    assert_eq!(snap.session.phase, Phase::Voting);
}

#[test]
fn repair_resolves_a_fully_decided_vote() {
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian), (D, Role::Civilian)], 10);
    for (voter, target) in [(A, B), (C, B), (D, B), (B, A)] {
        if let Some(p) = snap.participant_mut(voter) {
            p.ballot = Ballot::For(target);
        }
    }
    match machine::repair(&mut snap).unwrap() {
        RepairOutcome::RoundResolved(resolution) => {
            assert_eq!(resolution.tally.eliminated, Some(B));
        }
        other => panic!("expected resolution, got {other:?}"),
    }
    assert_eq!(machine::repair(&mut snap).unwrap(), RepairOutcome::NoChange);
}

#[test]
fn repair_is_a_no_op_elsewhere() {
    let mut snap = lobby(3, roles(1, 0));
    assert_eq!(machine::repair(&mut snap).unwrap(), RepairOutcome::NoChange);
    let mut snap = voting(&[(A, Role::Civilian), (B, Role::Undercover), (C, Role::Civilian)], 10);
    assert_eq!(machine::repair(&mut snap).unwrap(), RepairOutcome::NoChange);
}

// ---------- full game ----------

#[test]
fn full_game_reaches_results_within_the_cap() {
    let mut snap = started(6, roles(1, 1));
    for _ in 0..40 {
        match snap.session.phase {
            Phase::Discussion { .. } => clue_everyone(&mut snap),
            Phase::Voting => {
                let alive: Vec<i64> = snap.alive().map(|p| p.id).collect();
                // everyone piles onto the first alive participant they can
                for voter in &alive {
                    let target = alive.iter().copied().find(|t| t != voter).unwrap();
                    let target = if *voter == alive[0] { target } else { alive[0] };
                    if snap.session.phase == Phase::Voting {
                        machine::cast_vote(&mut snap, *voter, target).unwrap();
                    }
                }
            }
            Phase::MrWhiteGuessing { guesser } => {
                machine::submit_guess(&mut snap, guesser, "definitely wrong").unwrap();
            }
            Phase::Results { .. } => break,
            Phase::Waiting => unreachable!("game never returns to the lobby on its own"),
        }
    }
    assert_eq!(snap.session.phase.kind(), PhaseKind::Results);
}
