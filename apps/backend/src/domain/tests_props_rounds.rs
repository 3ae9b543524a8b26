//! Property tests driving whole games through the state machine.
//!
//! Each case starts a valid table, then plays random clues, votes (with
//! occasional withdrawals) and guesses until Results, checking the round
//! invariants after every action.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::machine;
use crate::domain::roles::Role;
use crate::domain::state::{Phase, SessionSnapshot};
use crate::domain::test_gens;
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::lobby;
use crate::domain::words::WordBank;

fn check_invariants(snap: &SessionSnapshot, expected_roles: &[(i64, Role)]) -> Result<(), TestCaseError> {
    // roles never change once dealt
    for (id, role) in expected_roles {
        prop_assert_eq!(snap.participant(*id).map(|p| p.role), Some(*role));
    }
    prop_assert!(snap.session.round <= snap.session.max_rounds);

    if let Phase::Discussion { .. } = snap.session.phase {
        let holder = snap.current_turn_holder();
        prop_assert!(holder.is_some_and(|id| snap.is_awaiting_clue(id)));

        let order: HashSet<_> = snap.session.turn_order.iter().copied().collect();
        prop_assert_eq!(order.len(), snap.session.turn_order.len(), "no duplicates");
        let alive: HashSet<_> = snap.alive().map(|p| p.id).collect();
        prop_assert_eq!(order, alive);
    }
    if let Phase::MrWhiteGuessing { guesser } = snap.session.phase {
        prop_assert!(snap
            .participant(guesser)
            .is_some_and(|p| p.alive && p.role == Role::MrWhite));
    }
    Ok(())
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_random_games_terminate_consistently(
        (n, config) in test_gens::roster_and_config(),
        seed in test_gens::seed(),
        play_seed in any::<u64>(),
        max_rounds in 1u16..=6,
    ) {
        let mut snap = lobby(n, config);
        machine::configure(&mut snap, config, max_rounds).unwrap();
        machine::start_game(&mut snap, seed, &WordBank::builtin()).unwrap();
        let dealt: Vec<(i64, Role)> = snap.participants.iter().map(|p| (p.id, p.role)).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(play_seed);

        let mut steps = 0;
        while !matches!(snap.session.phase, Phase::Results { .. }) {
            steps += 1;
            prop_assert!(steps < 2_000, "game did not terminate");

            match snap.session.phase {
                Phase::Discussion { .. } => {
                    let holder = snap.current_turn_holder().unwrap();
                    let round_before = snap.session.round;
                    machine::submit_clue(&mut snap, holder, "hint").unwrap();
                    prop_assert_eq!(snap.session.round, round_before);
                }
                Phase::Voting => {
                    let alive: Vec<i64> = snap.alive().map(|p| p.id).collect();
                    let undecided: Vec<i64> = snap
                        .alive()
                        .filter(|p| !p.ballot.is_decided())
                        .map(|p| p.id)
                        .collect();
                    let voter = undecided[rng.random_range(0..undecided.len())];
                    let others: Vec<i64> = alive.iter().copied().filter(|id| *id != voter).collect();
                    let target = others[rng.random_range(0..others.len())];
                    machine::cast_vote(&mut snap, voter, target).unwrap();
                    if rng.random_bool(0.2) && snap.session.phase == Phase::Voting {
                        // withdraw: stays decided without a target
                        machine::cast_vote(&mut snap, voter, target).unwrap();
                    }
                }
                Phase::MrWhiteGuessing { guesser } => {
                    let guess = if rng.random_bool(0.5) {
                        snap.words.as_ref().map(|w| w.civilian_word.clone()).unwrap()
                    } else {
                        "nowhere near".to_string()
                    };
                    machine::submit_guess(&mut snap, guesser, &guess).unwrap();
                }
                Phase::Waiting | Phase::Results { .. } => unreachable!(),
            }
            check_invariants(&snap, &dealt)?;
        }

        // repair never disturbs a finished game
        let frozen = snap.clone();
        prop_assert_eq!(machine::repair(&mut snap).unwrap(), machine::RepairOutcome::NoChange);
        prop_assert_eq!(snap, frozen);
    }

    /// Property: after restart every participant is alive, civilian and clean.
    #[test]
    fn prop_restart_resets_everyone(
        (n, config) in test_gens::roster_and_config(),
        seed in test_gens::seed(),
    ) {
        let mut snap = lobby(n, config);
        machine::start_game(&mut snap, seed, &WordBank::builtin()).unwrap();
        machine::stop(&mut snap).unwrap();

        prop_assert_eq!(snap.session.phase, Phase::Waiting);
        prop_assert!(snap.words.is_none());
        prop_assert!(snap.session.turn_order.is_empty());
        for p in &snap.participants {
            prop_assert!(p.alive);
            prop_assert_eq!(p.role, Role::Civilian);
            prop_assert!(p.clue.is_none());
            prop_assert!(!p.ballot.is_decided());
        }
        // and the table can start again
        prop_assert!(machine::start_game(&mut snap, seed, &WordBank::builtin()).is_ok());
    }
}
