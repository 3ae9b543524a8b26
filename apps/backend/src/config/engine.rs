use std::env;
use std::time::Duration;

use crate::db::retry::RetryPolicy;
use crate::domain::state::{MAX_ROUND_CAP, MIN_ROUND_CAP};
use crate::error::AppError;

/// Tunables for the game engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub retry: RetryPolicy,
    /// Round cap given to newly created sessions.
    pub default_max_rounds: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            default_max_rounds: 10,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_attempts: u32 = parse_or(&lookup, "TXN_MAX_ATTEMPTS", defaults.retry.max_attempts)?;
        let base_ms: u64 = parse_or(
            &lookup,
            "TXN_BASE_DELAY_MS",
            defaults.retry.base_delay.as_millis() as u64,
        )?;
        let max_ms: u64 = parse_or(
            &lookup,
            "TXN_MAX_DELAY_MS",
            defaults.retry.max_delay.as_millis() as u64,
        )?;
        let default_max_rounds: u16 =
            parse_or(&lookup, "DEFAULT_MAX_ROUNDS", defaults.default_max_rounds)?;

        if max_attempts == 0 {
            return Err(AppError::config("TXN_MAX_ATTEMPTS must be at least 1"));
        }
        if max_ms < base_ms {
            return Err(AppError::config(
                "TXN_MAX_DELAY_MS must not be smaller than TXN_BASE_DELAY_MS",
            ));
        }
        if !(MIN_ROUND_CAP..=MAX_ROUND_CAP).contains(&default_max_rounds) {
            return Err(AppError::config(format!(
                "DEFAULT_MAX_ROUNDS must be within {MIN_ROUND_CAP}..={MAX_ROUND_CAP}"
            )));
        }

        Ok(Self {
            retry: RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(base_ms),
                max_delay: Duration::from_millis(max_ms),
            },
            default_max_rounds,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{name} must be a number, got '{raw}'"))),
    }
}
