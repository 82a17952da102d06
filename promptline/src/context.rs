//! Cancellation and deadline signal passed through every operation.
//!
//! A [`Context`] carries an optional absolute deadline and an explicit-cancel
//! trigger. It can be queried without blocking via [`Context::err`], or awaited
//! via [`Context::done`].
//!
//! Contexts derived with [`Context::child_with_timeout`] share the cancel
//! trigger of their parent: cancelling either one cancels both. The child's
//! deadline is the earlier of the parent's deadline and the new timeout.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// Why a [`Context`] fired.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context was cancelled explicitly.
    #[error("context canceled")]
    Canceled,

    /// The context's deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation/deadline signal.
///
/// Cloning is cheap; clones observe the same cancel trigger.
#[derive(Debug, Clone)]
pub struct Context {
    cancel: Arc<watch::Sender<bool>>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that never expires unless cancelled.
    pub fn background() -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            cancel: Arc::new(cancel),
            deadline: None,
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::background()
        }
    }

    /// Derive a context that also expires `timeout` from now.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent <= candidate => parent,
            _ => candidate,
        };
        Self {
            cancel: Arc::clone(&self.cancel),
            deadline: Some(deadline),
        }
    }

    /// The absolute deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fire the cancel trigger. Idempotent.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Non-blocking check: `Some(reason)` once the context has fired.
    ///
    /// Explicit cancellation takes precedence over an expired deadline.
    pub fn err(&self) -> Option<ContextError> {
        if *self.cancel.borrow() {
            return Some(ContextError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolve when the context fires, yielding the reason.
    pub async fn done(&self) -> ContextError {
        let mut cancelled = self.cancel.subscribe();
        // The sender lives as long as `self`, so `wait_for` only returns once
        // the trigger is set.
        let cancelled = async move {
            let _ = cancelled.wait_for(|fired| *fired).await;
        };

        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = cancelled => ContextError::Canceled,
                _ = tokio::time::sleep_until(deadline) => ContextError::DeadlineExceeded,
            },
            None => {
                cancelled.await;
                ContextError::Canceled
            }
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_never_fires() {
        let ctx = Context::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_is_shared_by_clones() {
        let ctx = Context::background();
        let clone = ctx.clone();
        clone.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Canceled));

        // Cancelling twice is harmless
        ctx.cancel();
        assert_eq!(clone.err(), Some(ContextError::Canceled));
    }

    #[tokio::test]
    async fn test_expired_deadline() {
        let ctx = Context::with_timeout(Duration::from_millis(10));
        assert_eq!(ctx.done().await, ContextError::DeadlineExceeded);
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_cancel_wins_over_deadline() {
        let ctx = Context::with_timeout(Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(5)).await;
        ctx.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Canceled));
        assert_eq!(ctx.done().await, ContextError::Canceled);
    }

    #[tokio::test]
    async fn test_done_wakes_on_cancel() {
        let ctx = Context::background();
        let trigger = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });
        assert_eq!(ctx.done().await, ContextError::Canceled);
    }

    #[test]
    fn test_child_keeps_earlier_parent_deadline() {
        let parent = Context::with_timeout(Duration::from_secs(1));
        let child = parent.child_with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        let tighter = parent.child_with_timeout(Duration::from_millis(10));
        assert!(tighter.deadline() < parent.deadline());

        tighter.cancel();
        assert_eq!(parent.err(), Some(ContextError::Canceled));
    }
}
