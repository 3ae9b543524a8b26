//! Clue order: building a round's permutation and walking it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::roles::Role;
use crate::domain::state::ParticipantId;

/// Random clue order over `alive` (id, role) pairs.
///
/// MrWhite never opens a round: if the shuffle puts one in slot 0, every
/// MrWhite is pulled out and reinserted at an independently chosen slot
/// other than 0. The rule applies to every order built, not just the first.
pub fn build_turn_order<R: Rng + ?Sized>(
    alive: &[(ParticipantId, Role)],
    rng: &mut R,
) -> Vec<(ParticipantId, Role)> {
    let mut order = alive.to_vec();
    order.shuffle(rng);

    let opens_with_mr_white = order.first().is_some_and(|(_, r)| *r == Role::MrWhite);
    let has_other = order.iter().any(|(_, r)| *r != Role::MrWhite);
    if !opens_with_mr_white || !has_other {
        return order;
    }

    let (mr_whites, mut rest): (Vec<_>, Vec<_>) =
        order.into_iter().partition(|(_, r)| *r == Role::MrWhite);
    for entry in mr_whites {
        let slot = rng.random_range(1..=rest.len());
        rest.insert(slot, entry);
    }
    rest
}

/// First index at or after 0 whose participant is still pending.
pub fn first_turn(
    order: &[ParticipantId],
    mut pending: impl FnMut(ParticipantId) -> bool,
) -> Option<usize> {
    order.iter().position(|id| pending(*id))
}

/// Next pending slot after `current`, wrapping to the front but never
/// back onto `current` itself. `None` means the clue phase is complete.
///
/// An out-of-range `current` searches the whole order.
pub fn next_turn(
    order: &[ParticipantId],
    current: usize,
    mut pending: impl FnMut(ParticipantId) -> bool,
) -> Option<usize> {
    let after = (current.saturating_add(1)..order.len()).find(|&i| pending(order[i]));
    after.or_else(|| (0..current.min(order.len())).find(|&i| pending(order[i])))
}
