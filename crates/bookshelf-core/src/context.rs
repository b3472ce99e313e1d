//! Per-request deadline and cancellation.
//!
//! Every call into the durable store or the cache runs under a
//! [`RequestContext`]. The context is created once per inbound request and
//! handed down through the service and repository layers by reference.

use crate::{BookshelfError, BookshelfResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation token threaded from the originating request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl RequestContext {
    /// A context with no deadline that is only cancelled explicitly.
    #[must_use]
    pub fn background() -> Self {
        Self {
            deadline: None,
            token: CancellationToken::new(),
        }
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            token: CancellationToken::new(),
        }
    }

    /// A context that expires `timeout` from now and is cancelled together
    /// with `parent`.
    #[must_use]
    pub fn child(parent: &CancellationToken, timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            token: parent.child_token(),
        }
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` means unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns the cancellation token of this context.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels this context and every operation running under it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Checks whether the context was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `future` under this context.
    ///
    /// Fails with [`BookshelfError::Timeout`] when the deadline passes first and
    /// with [`BookshelfError::Cancelled`] when the token fires first.
    pub async fn run<F, T>(&self, operation: &str, future: F) -> BookshelfResult<T>
    where
        F: Future<Output = BookshelfResult<T>>,
    {
        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, future)
                    .await
                    .map_err(|_| {
                        BookshelfError::Timeout(format!("{operation} exceeded request deadline"))
                    })?,
                None => future.await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(BookshelfError::Cancelled(operation.to_string())),
            result = bounded => result,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_within_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(1));
        let result = ctx.run("fast", async { Ok::<_, BookshelfError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(10));
        let result = ctx
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, BookshelfError>(())
            })
            .await;

        match result {
            Err(BookshelfError::Timeout(message)) => assert!(message.contains("slow")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_propagates_inner_error() {
        let ctx = RequestContext::background();
        let result: BookshelfResult<()> = ctx
            .run("failing", async { Err(BookshelfError::Database("down".to_string())) })
            .await;
        assert!(matches!(result, Err(BookshelfError::Database(_))));
    }

    #[tokio::test]
    async fn test_cancelled_context_fails_fast() {
        let ctx = RequestContext::background();
        ctx.cancel();

        let result = ctx
            .run("store.fetch_by_id", std::future::pending::<BookshelfResult<()>>())
            .await;
        assert!(matches!(result, Err(BookshelfError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_child_follows_parent_cancellation() {
        let parent = CancellationToken::new();
        let ctx = RequestContext::child(&parent, Duration::from_secs(30));
        assert!(!ctx.is_cancelled());

        parent.cancel();
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_background_has_no_deadline() {
        let ctx = RequestContext::background();
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_shrinks() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(ctx.remaining(), Some(Duration::from_secs(6)));
    }
}
