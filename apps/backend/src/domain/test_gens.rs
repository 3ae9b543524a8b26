// Proptest generators for domain types.
// Configurations are valid by construction rather than filtered.

use proptest::prelude::*;

use crate::domain::roles::{Role, RoleConfig};
use crate::domain::state::{ParticipantId, MAX_PLAYERS, MIN_PLAYERS, MIN_PLAYERS_WITH_MR_WHITE};

/// A roster size together with a role config that is valid for it.
pub fn roster_and_config() -> impl Strategy<Value = (usize, RoleConfig)> {
    (MIN_PLAYERS..=MAX_PLAYERS).prop_flat_map(|n| {
        let max_mr_white = if n >= MIN_PLAYERS_WITH_MR_WHITE { n - 2 } else { 0 };
        (Just(n), 0..=max_mr_white).prop_flat_map(|(n, mr_whites)| {
            // leave at least one civilian and one undercover
            let max_undercovers = n - 1 - mr_whites;
            (Just(n), 1..=max_undercovers, Just(mr_whites)).prop_map(|(n, u, m)| {
                (
                    n,
                    RoleConfig {
                        undercover_count: u as u8,
                        mr_white_count: m as u8,
                    },
                )
            })
        })
    })
}

pub fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Civilian),
        Just(Role::Undercover),
        Just(Role::MrWhite),
    ]
}

/// Alive roster of distinct ids with arbitrary roles.
pub fn alive_roster() -> impl Strategy<Value = Vec<(ParticipantId, Role)>> {
    prop::collection::vec(role(), 1..=MAX_PLAYERS).prop_map(|roles| {
        roles
            .into_iter()
            .enumerate()
            .map(|(i, r)| (i as ParticipantId + 1, r))
            .collect()
    })
}

/// Per-voter target (or none) over a roster of `n` participants 1..=n.
pub fn ballots_for(n: usize) -> impl Strategy<Value = Vec<Option<ParticipantId>>> {
    prop::collection::vec(prop::option::of(1..=n as ParticipantId), n)
}

/// 32-byte seed
pub fn seed() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}
