//! Role assignment under count constraints.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::state::{ParticipantId, MAX_PLAYERS, MIN_PLAYERS, MIN_PLAYERS_WITH_MR_WHITE};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Civilian,
    Undercover,
    MrWhite,
}

/// How many special roles to hand out at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub undercover_count: u8,
    pub mr_white_count: u8,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            undercover_count: 1,
            mr_white_count: 0,
        }
    }
}

impl RoleConfig {
    pub fn special_count(&self) -> usize {
        self.undercover_count as usize + self.mr_white_count as usize
    }

    /// Checks that hold regardless of roster size: at least one
    /// undercover, and a full table could still seat a civilian.
    pub fn validate_shape(&self) -> Result<(), DomainError> {
        if self.undercover_count == 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfiguration,
                "At least one undercover is required",
            ));
        }
        if self.special_count() >= MAX_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfiguration,
                format!(
                    "{} undercover and {} Mr. White leave no civilians even with {MAX_PLAYERS} players",
                    self.undercover_count, self.mr_white_count
                ),
            ));
        }
        Ok(())
    }

    /// Full check against an actual roster size.
    pub fn validate_for(&self, player_count: usize) -> Result<(), DomainError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                format!(
                    "A game needs {MIN_PLAYERS} to {MAX_PLAYERS} participants, found {player_count}"
                ),
            ));
        }
        self.validate_shape()?;
        if self.special_count() >= player_count {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfiguration,
                format!(
                    "{} special roles leave no civilian among {player_count} participants",
                    self.special_count()
                ),
            ));
        }
        if self.mr_white_count > 0 && player_count < MIN_PLAYERS_WITH_MR_WHITE {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfiguration,
                format!("Mr. White needs at least {MIN_PLAYERS_WITH_MR_WHITE} participants"),
            ));
        }
        Ok(())
    }
}

/// Shuffle `ids` and deal roles: the first `undercover_count` become
/// Undercover, the next `mr_white_count` MrWhite, everyone else Civilian.
///
/// `config` must already have passed `validate_for(ids.len())`.
/// The result is in shuffled order.
pub fn assign_roles<R: Rng + ?Sized>(
    ids: &[ParticipantId],
    config: RoleConfig,
    rng: &mut R,
) -> Vec<(ParticipantId, Role)> {
    debug_assert!(config.validate_for(ids.len()).is_ok());

    let mut shuffled = ids.to_vec();
    shuffled.shuffle(rng);

    let undercovers = config.undercover_count as usize;
    let specials = config.special_count();
    shuffled
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            let role = if i < undercovers {
                Role::Undercover
            } else if i < specials {
                Role::MrWhite
            } else {
                Role::Civilian
            };
            (id, role)
        })
        .collect()
}
