//! Parallel fan-out with per-item outcomes.

use super::GenerationError;
use super::cancel::CancellationToken;
use super::client::ClientError;
use rayon::prelude::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure<I> {
    pub input: I,
    pub error: ClientError,
}

/// Successes and failures of one batch, each in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult<T, I> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure<I>>,
}

impl<T, I> Default for BatchResult<T, I> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T, I> BatchResult<T, I> {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

impl<T, I> fmt::Display for BatchResult<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failed.is_empty() {
            write!(f, "{} succeeded", self.succeeded.len())
        } else {
            write!(
                f,
                "{} succeeded, {} failed ({} total)",
                self.succeeded.len(),
                self.failed.len(),
                self.total()
            )
        }
    }
}

/// Run `work` over `inputs` in parallel.
///
/// Each item checks `token` before calling out; once the token is
/// cancelled the whole batch reports [`GenerationError::Cancelled`] and
/// partial results are discarded.
pub fn run_batch<I, T, F>(
    inputs: &[I],
    token: &CancellationToken,
    work: F,
) -> Result<BatchResult<T, I>, GenerationError>
where
    I: Clone + Sync,
    T: Send,
    F: Fn(&I) -> Result<T, ClientError> + Sync,
{
    if token.is_cancelled() {
        return Err(GenerationError::Cancelled);
    }

    let outcomes: Vec<Option<Result<T, ClientError>>> = inputs
        .par_iter()
        .map(|input| {
            if token.is_cancelled() {
                None
            } else {
                Some(work(input))
            }
        })
        .collect();

    if token.is_cancelled() {
        tracing::info!(items = inputs.len(), "batch cancelled");
        return Err(GenerationError::Cancelled);
    }

    let mut result = BatchResult::default();
    for (input, outcome) in inputs.iter().zip(outcomes) {
        match outcome {
            Some(Ok(value)) => result.succeeded.push(value),
            Some(Err(error)) => {
                tracing::warn!(error = %error, "batch item failed");
                result.failed.push(BatchFailure {
                    input: input.clone(),
                    error,
                });
            }
            None => return Err(GenerationError::Cancelled),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_input_order_and_records_failures() {
        let inputs: Vec<u32> = (1..=8).collect();
        let result = run_batch(&inputs, &CancellationToken::new(), |n| {
            if n % 3 == 0 {
                Err(ClientError::Request(format!("no {n}")))
            } else {
                Ok(n * 10)
            }
        })
        .unwrap();

        assert_eq!(result.succeeded, vec![10, 20, 40, 50, 70, 80]);
        let failed: Vec<u32> = result.failed.iter().map(|f| f.input).collect();
        assert_eq!(failed, vec![3, 6]);
        assert_eq!(result.failed[0].error, ClientError::Request("no 3".into()));
        assert!(!result.is_complete());
    }

    #[test]
    fn cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let result = run_batch(&[1, 2], &token, |n: &i32| Ok(*n));
        assert!(matches!(result, Err(GenerationError::Cancelled)));
    }

    #[test]
    fn cancel_during_batch_discards_results() {
        let token = CancellationToken::new();
        let inner = token.clone();
        let result = run_batch(&[1, 2, 3], &token, |n: &i32| {
            if *n == 2 {
                inner.cancel();
            }
            Ok(*n)
        });
        assert!(matches!(result, Err(GenerationError::Cancelled)));
    }

    #[test]
    fn display_summary() {
        let mut result: BatchResult<u8, u8> = BatchResult::default();
        result.succeeded = vec![1, 2];
        assert_eq!(result.to_string(), "2 succeeded");
        result.failed.push(BatchFailure {
            input: 3,
            error: ClientError::NoImage,
        });
        assert_eq!(result.to_string(), "2 succeeded, 1 failed (3 total)");
    }

    #[test]
    fn empty_batch() {
        let result = run_batch(&[] as &[u8], &CancellationToken::new(), |n| Ok(*n)).unwrap();
        assert_eq!(result.total(), 0);
        assert!(result.is_complete());
    }
}
