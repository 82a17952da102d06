//! High-level driver for device interaction.
//!
//! The driver layer provides the main API for sending commands and running
//! configuration transactions on network devices.

mod builder;
mod config;
mod config_session;
mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use builder::SessionBuilder;
pub use config::SessionConfig;
pub use config_session::ConfigSession;
pub use session::DeviceSession;

use std::fmt;
use std::future::Future;

use crate::channel::PromptMatcher;
use crate::context::Context;
use crate::error::Result;

/// Lifecycle state of a [`DeviceSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection; `dial()` has not succeeded or the session was closed.
    Disconnected,

    /// Connected and idle.
    Connected,

    /// A command is waiting for its prompt.
    ///
    /// Observed between commands only when a command future was dropped before
    /// its prompt arrived; the output stream framing is then unknown.
    AwaitingPrompt,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
            Self::AwaitingPrompt => write!(f, "awaiting prompt"),
        }
    }
}

/// Trait for device drivers.
///
/// Every operation takes a [`Context`]; when it fires, the pending prompt
/// wait fails with a timeout error.
pub trait Driver: Send {
    /// Open the connection and run post-connect initialization commands.
    fn dial(&mut self, ctx: &Context) -> impl Future<Output = Result<()>> + Send;

    /// Elevate privileges. Idempotent.
    fn enable(&mut self, ctx: &Context) -> impl Future<Output = Result<()>> + Send;

    /// Run a command and return its output with framing stripped.
    fn run(&mut self, ctx: &Context, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// Run a command, wait for `prompt` instead of the base prompt and return
    /// the raw output.
    fn run_until<P: PromptMatcher + ?Sized>(
        &mut self,
        ctx: &Context,
        command: &str,
        prompt: &P,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Apply `commands` inside exclusive edit mode, then commit.
    ///
    /// On failure the error carries the output gathered so far (see
    /// [`Error::partial_output`](crate::Error::partial_output)). Nothing is
    /// rolled back: after a failed command or commit the device may still be
    /// in edit mode with uncommitted changes.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use promptline::{Context, Driver};
    ///
    /// # async fn example(driver: &mut impl Driver) -> Result<(), promptline::Error> {
    /// let ctx = Context::with_timeout(std::time::Duration::from_secs(60));
    /// let output = driver
    ///     .configure(&ctx, &[
    ///         "/configure system name lab-router",
    ///         "/configure system location lab",
    ///     ])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    fn configure(
        &mut self,
        ctx: &Context,
        commands: &[&str],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Close the connection. Idempotent, never fails.
    fn close(&mut self, ctx: &Context) -> impl Future<Output = Result<()>> + Send;

    /// Check if the driver is connected.
    fn is_open(&self) -> bool;
}
