// src/checker/context.rs
// =============================================================================
// This module defines CheckContext, the cancellation signal that scopes one
// whole batch check.
//
// A context combines two ways a batch can be told to stop:
// 1. Explicit cancellation (the user pressed Ctrl-C) - benign, the batch
//    returns whatever it finished.
// 2. A deadline (--deadline flag) - fatal, the batch returns an error along
//    with its partial results.
//
// Rust concepts:
// - CancellationToken: tokio-util's broadcast "stop" flag; clones share the
//   same underlying state, so any clone can cancel all of them
// - tokio::select!: race two futures, take whichever finishes first
// =============================================================================

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline signal for a single batch check.
///
/// Cloning is cheap and all clones observe the same cancellation state.
/// Workers hold a clone and race their HTTP attempts against it.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CheckContext {
    /// A context that never expires and is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    ///
    /// Once the deadline passes, `Checker::check` reports the batch as
    /// failed even though completed results are still returned.
    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Cancel the batch. Undispatched URLs will never be checked.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the deadline (if any) has passed.
    pub fn deadline_expired(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Time left until the deadline, or None if there is no deadline.
    ///
    /// Saturates at zero instead of going negative, so callers can use it
    /// directly as a timeout value.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Resolves when the context is cancelled or its deadline passes,
    /// whichever happens first. Never resolves for a plain `new()` context
    /// that nobody cancels.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_cancellation() {
        let ctx = CheckContext::new();
        let clone = ctx.clone();
        assert!(!clone.is_cancelled());
        ctx.cancel();
        assert!(clone.is_cancelled());
        // done() must resolve immediately once cancelled
        clone.done().await;
    }

    #[tokio::test]
    async fn deadline_expires() {
        tokio::time::pause();
        let ctx = CheckContext::with_deadline(Duration::from_secs(1));
        assert!(!ctx.deadline_expired());
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(ctx.deadline_expired());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
        ctx.done().await;
    }

    #[test]
    fn plain_context_has_no_deadline() {
        let ctx = CheckContext::new();
        assert!(!ctx.deadline_expired());
        assert_eq!(ctx.remaining(), None);
    }
}
