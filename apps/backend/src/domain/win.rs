//! Win evaluation from alive role counts.

use serde::{Deserialize, Serialize};

use crate::domain::roles::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    CiviliansWin,
    UndercoversWin,
    MrWhiteWin,
    UndercoversAndMrWhiteWin,
    MaxRoundsReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AliveCounts {
    pub civilians: usize,
    pub undercovers: usize,
    pub mr_whites: usize,
}

impl AliveCounts {
    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        roles.into_iter().fold(Self::default(), |mut acc, role| {
            match role {
                Role::Civilian => acc.civilians += 1,
                Role::Undercover => acc.undercovers += 1,
                Role::MrWhite => acc.mr_whites += 1,
            }
            acc
        })
    }
}

/// Terminal outcome for the given counts, or `None` to keep playing.
/// First matching rule wins; the round cap is checked before any faction.
pub fn evaluate(counts: AliveCounts, round: u16, max_rounds: u16) -> Option<GameOutcome> {
    let AliveCounts {
        civilians,
        undercovers,
        mr_whites,
    } = counts;

    if round >= max_rounds {
        Some(GameOutcome::MaxRoundsReached)
    } else if undercovers == 0 && mr_whites == 0 {
        Some(GameOutcome::CiviliansWin)
    } else if civilians == 0 && undercovers > 0 && mr_whites > 0 {
        Some(GameOutcome::UndercoversAndMrWhiteWin)
    } else if civilians <= 1 && undercovers > 0 {
        Some(GameOutcome::UndercoversWin)
    } else if civilians <= 1 && mr_whites > 0 {
        Some(GameOutcome::MrWhiteWin)
    } else {
        None
    }
}
