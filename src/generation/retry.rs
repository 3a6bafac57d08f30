//! Retry with exponential backoff.

use super::cancel::CancellationToken;
use super::client::ClientError;
use crate::config::GenerationConfig;
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetryError {
    #[error("cancelled")]
    Cancelled,
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: ClientError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.max_attempts, config.backoff())
    }

    /// One attempt, no waiting.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait before attempt `attempt` (1-based): nothing before the first,
    /// then `base`, `2 × base`, `4 × base`, ...
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 2).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, attempts run out or `token` is cancelled.
    pub fn run<T>(
        &self,
        token: &CancellationToken,
        mut op: impl FnMut() -> Result<T, ClientError>,
    ) -> Result<T, RetryError> {
        let mut last = None;
        for attempt in 1..=self.max_attempts {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            if token.is_cancelled() {
                return Err(RetryError::Cancelled);
            }
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(attempt, max = self.max_attempts, error = %e, "attempt failed");
                    last = Some(e);
                }
            }
        }
        Err(RetryError::Exhausted {
            attempts: self.max_attempts,
            last: last.unwrap_or(ClientError::NoImage),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250));
        let delays: Vec<u128> = (1..=5).map(|a| policy.delay_before(a).as_millis()).collect();
        assert_eq!(delays, vec![0, 250, 500, 1000, 2000]);
    }

    #[test]
    fn huge_attempt_saturates() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        assert!(policy.delay_before(100) >= Duration::from_millis(1));
    }

    #[test]
    fn succeeds_after_failures() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let mut calls = 0;
        let result = policy.run(&CancellationToken::new(), || {
            calls += 1;
            if calls < 3 {
                Err(ClientError::NoImage)
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn exhausts_with_last_error() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let result: Result<(), _> =
            policy.run(&CancellationToken::new(), || Err(ClientError::Request("busy".into())));
        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                attempts: 2,
                last: ClientError::Request("busy".into())
            })
        );
    }

    #[test]
    fn cancelled_before_first_attempt() {
        let token = CancellationToken::new();
        token.cancel();
        let mut called = false;
        let result = RetryPolicy::once().run(&token, || {
            called = true;
            Ok(())
        });
        assert_eq!(result, Err(RetryError::Cancelled));
        assert!(!called);
    }

    #[test]
    fn zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
