//! Bounded retry of whole transactional actions.

use std::future::Future;
use std::time::Duration;

use rand::random;
use tracing::{debug, warn};

use crate::error::AppError;

const JITTER_PERCENT: f64 = 0.2;

/// How often and how patiently a conflicting action is re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. At least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Retry immediately; used by tests that race actions on purpose.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// `min(base * 2^(attempt-1), max)` for the attempt that just failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Backoff with ±20% jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let capped = self.backoff(attempt).as_secs_f64();
        let jitter = (random::<f64>() * 2.0 - 1.0) * capped * JITTER_PERCENT;
        Duration::from_secs_f64((capped + jitter).max(0.0))
    }
}

/// Run `f` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent. Exhaustion surfaces as `AppError::Transient`.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut f: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match f().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "Action succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    code = %err.code(),
                    "Conflicting write, retrying"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(err) if err.is_retryable() => {
                warn!(
                    operation,
                    attempts = attempt,
                    error = %err,
                    "Retry budget exhausted"
                );
                return Err(AppError::transient(format!(
                    "{operation} kept conflicting after {attempt} attempts"
                )));
            }
            Err(err) => return Err(err),
        }
    }
}
