//! Per-purpose RNG streams derived from a session's base seed.
//!
//! A retried transaction re-derives the same streams, so it recomputes the
//! identical transition.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// What a derived stream is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPurpose {
    Roles,
    Words,
    TurnOrder,
}

impl SeedPurpose {
    fn label(self) -> &'static [u8] {
        match self {
            SeedPurpose::Roles => b"undercover/roles",
            SeedPurpose::Words => b"undercover/words",
            SeedPurpose::TurnOrder => b"undercover/turn-order",
        }
    }
}

/// BLAKE3 keyed hash of (purpose, round) under the session seed.
pub fn derive_seed(base: &[u8; 32], purpose: SeedPurpose, round: u16) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_keyed(base);
    hasher.update(purpose.label());
    hasher.update(&round.to_le_bytes());
    *hasher.finalize().as_bytes()
}

pub fn rng_for(base: &[u8; 32], purpose: SeedPurpose, round: u16) -> ChaCha20Rng {
    ChaCha20Rng::from_seed(derive_seed(base, purpose, round))
}

/// Fresh 32-byte session seed from the OS-seeded thread RNG.
pub fn fresh_seed() -> [u8; 32] {
    rand::random()
}

/// Read a stored seed column back into a fixed array.
pub fn seed_from_bytes(bytes: &[u8]) -> Option<[u8; 32]> {
    bytes.try_into().ok()
}
