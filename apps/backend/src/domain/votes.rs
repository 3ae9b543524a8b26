//! Vote tally and ballot rules.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::state::{Ballot, Participant, ParticipantId};

/// Counts for one round and the elimination they imply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VoteTally {
    pub counts: BTreeMap<ParticipantId, u32>,
    pub eliminated: Option<ParticipantId>,
    pub tie: bool,
}

/// Count active targets. A unique maximum eliminates; a shared maximum is
/// a tie; no targets at all is neither.
pub fn tally_votes<I>(targets: I) -> VoteTally
where
    I: IntoIterator<Item = Option<ParticipantId>>,
{
    let mut counts: BTreeMap<ParticipantId, u32> = BTreeMap::new();
    for target in targets.into_iter().flatten() {
        *counts.entry(target).or_default() += 1;
    }

    let Some(max) = counts.values().copied().max() else {
        return VoteTally::default();
    };
    let mut leaders = counts.iter().filter(|(_, c)| **c == max).map(|(id, _)| *id);
    let first = leaders.next();
    let tie = leaders.next().is_some();

    VoteTally {
        eliminated: if tie { None } else { first },
        tie,
        counts,
    }
}

/// Tally over the alive roster's ballots.
pub fn tally_alive(participants: &[Participant]) -> VoteTally {
    tally_votes(
        participants
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.ballot.target()),
    )
}

/// Ballot after `target` is cast on top of `current`.
///
/// Re-casting the current target withdraws it; the voter stays decided.
/// Any other target overwrites.
pub fn apply_vote(current: Ballot, target: ParticipantId) -> Ballot {
    match current {
        Ballot::For(existing) if existing == target => Ballot::Abstained,
        _ => Ballot::For(target),
    }
}

/// Every alive participant has decided.
pub fn voting_complete(participants: &[Participant]) -> bool {
    participants
        .iter()
        .filter(|p| p.alive)
        .all(|p| p.ballot.is_decided())
}
