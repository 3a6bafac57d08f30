//! Cooperative cancellation for generation batches.
//!
//! A token is a shared flag. Workers check it before every backend call;
//! a batch whose token was cancelled reports
//! [`GenerationError::Cancelled`](super::GenerationError::Cancelled) and
//! its results are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Hands out one token per batch. Starting a batch cancels the previous
/// one, so a superseded batch can never overwrite newer results.
#[derive(Debug, Default)]
pub struct BatchSupervisor {
    current: Option<CancellationToken>,
    started: u64,
}

impl BatchSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> CancellationToken {
        if let Some(previous) = self.current.take() {
            tracing::info!(batch = self.started, "superseding running batch");
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        self.started += 1;
        token
    }

    /// Cancel the running batch, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// Number of batches started so far.
    pub fn started(&self) -> u64 {
        self.started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let worker = token.clone();
        assert!(!worker.is_cancelled());
        token.cancel();
        assert!(worker.is_cancelled());
    }

    #[test]
    fn new_batch_cancels_previous() {
        let mut supervisor = BatchSupervisor::new();
        let first = supervisor.begin();
        let second = supervisor.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(supervisor.started(), 2);

        supervisor.cancel();
        assert!(second.is_cancelled());
    }
}
