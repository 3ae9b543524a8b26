//! Property tests for the vote tally and the win evaluator.

use proptest::prelude::*;

use crate::domain::test_gens;
use crate::domain::test_prelude;
use crate::domain::votes::tally_votes;
use crate::domain::win::{evaluate, AliveCounts, GameOutcome};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: an eliminated target strictly beats every other count, and
    /// a shared maximum never eliminates.
    #[test]
    fn prop_elimination_is_strict_maximum(
        targets in (3usize..=10).prop_flat_map(test_gens::ballots_for),
    ) {
        let tally = tally_votes(targets.iter().copied());
        let total: u32 = tally.counts.values().sum();
        prop_assert_eq!(total as usize, targets.iter().flatten().count());

        match tally.eliminated {
            Some(winner) => {
                prop_assert!(!tally.tie);
                let top = tally.counts[&winner];
                for (id, count) in &tally.counts {
                    if *id != winner {
                        prop_assert!(*count < top);
                    }
                }
            }
            None if tally.counts.is_empty() => prop_assert!(!tally.tie),
            None => {
                prop_assert!(tally.tie);
                let top = tally.counts.values().max().copied().unwrap_or(0);
                let leaders = tally.counts.values().filter(|c| **c == top).count();
                prop_assert!(leaders >= 2);
            }
        }
    }

    /// Property: the evaluator is pure and the round cap wins first.
    #[test]
    fn prop_evaluate_is_pure(
        civilians in 0usize..=10,
        undercovers in 0usize..=9,
        mr_whites in 0usize..=8,
        round in 0u16..=30,
        max_rounds in 1u16..=30,
    ) {
        let counts = AliveCounts { civilians, undercovers, mr_whites };
        let first = evaluate(counts, round, max_rounds);
        prop_assert_eq!(first, evaluate(counts, round, max_rounds));

        if round >= max_rounds {
            prop_assert_eq!(first, Some(GameOutcome::MaxRoundsReached));
        } else if first.is_none() {
            prop_assert!(civilians >= 2);
            prop_assert!(undercovers + mr_whites >= 1);
        }
    }
}
