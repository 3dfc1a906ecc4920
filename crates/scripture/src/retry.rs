// crates/scripture/src/retry.rs
//! Exponential backoff for provider requests

use crate::error::{ScriptureError, ScriptureResult};
use std::time::Duration;

/// How often and how patiently a failed chapter request is repeated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts in total, the first one included; never below 1
    pub attempts: usize,
    /// Wait after the first failure
    pub first_delay: Duration,
    /// Ceiling for any single wait
    pub max_delay: Duration,
    /// Growth factor between consecutive waits
    pub factor: f64,
}

impl RetryPolicy {
    pub fn new(attempts: usize) -> Self {
        Self {
            attempts: attempts.max(1),
            ..Self::default()
        }
    }

    pub fn with_initial_delay(self, first_delay: Duration) -> Self {
        Self { first_delay, ..self }
    }

    pub fn with_max_delay(self, max_delay: Duration) -> Self {
        Self { max_delay, ..self }
    }

    pub fn with_multiplier(self, factor: f64) -> Self {
        Self { factor, ..self }
    }

    /// Wait after failure number `failures` (1-based); zero for 0
    pub fn delay_for_attempt(&self, failures: usize) -> Duration {
        let Some(exponent) = failures.checked_sub(1) else {
            return Duration::ZERO;
        };
        let exponent = i32::try_from(exponent).unwrap_or(i32::MAX);
        let scaled = self.first_delay.as_secs_f64() * self.factor.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_millis((scaled * 1000.0).round() as u64)
    }

    pub fn max_attempts(&self) -> usize {
        self.attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            first_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            factor: 2.0,
        }
    }
}

/// Runs `request` until it succeeds, fails with an error that is not
/// [`ScriptureError::is_retryable`], or runs out of attempts
///
/// The error of the final attempt is returned.
pub fn with_retry<T, F>(policy: &RetryPolicy, mut request: F) -> ScriptureResult<T>
where
    F: FnMut() -> ScriptureResult<T>,
{
    let attempts = policy.max_attempts();
    let mut failures = 0;
    loop {
        let error: ScriptureError = match request() {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        failures += 1;
        if failures >= attempts || !error.is_retryable() {
            return Err(error);
        }

        let wait = policy.delay_for_attempt(failures);
        log::warn!("{}; retry {}/{} in {:?}", error, failures, attempts - 1, wait);
        std::thread::sleep(wait);
    }
}
