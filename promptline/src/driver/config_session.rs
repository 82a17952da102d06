//! Exclusive edit mode transactions as RAII guards.
//!
//! A configuration transaction borrows the session mutably, so nothing else
//! can run on it until the transaction ends:
//! - `commit()`/`abort()` consume the guard, ensuring single-use
//! - `detach()` releases the guard and leaves the device in edit mode
//!
//! # Example
//!
//! ```rust,no_run
//! use promptline::{Context, DeviceSession, Dialer};
//!
//! # async fn example<D: Dialer>(session: &mut DeviceSession<D>) -> Result<(), promptline::Error> {
//! let ctx = Context::background();
//! let mut tx = session.config_session(&ctx).await?;
//! tx.run(&ctx, "/configure system name lab-router").await?;
//! let output = tx.commit(&ctx).await?; // consumes the guard
//! # Ok(())
//! # }
//! ```

use log::{debug, warn};

use super::session::DeviceSession;
use crate::context::Context;
use crate::error::{DriverError, Result};
use crate::platform::ConfigMode;
use crate::transport::Dialer;

/// RAII guard for one exclusive edit mode transaction.
///
/// Output of every command run through the guard is accumulated, and failing
/// operations hand it back inside the error (see
/// [`Error::partial_output`](crate::Error::partial_output)).
pub struct ConfigSession<'a, D: Dialer> {
    driver: &'a mut DeviceSession<D>,
    mode: ConfigMode,
    output: String,
    consumed: bool,
}

impl<'a, D: Dialer> ConfigSession<'a, D> {
    pub(super) fn new(driver: &'a mut DeviceSession<D>, mode: ConfigMode) -> Self {
        Self {
            driver,
            mode,
            output: String::new(),
            consumed: false,
        }
    }

    /// Output accumulated so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Run one command inside the transaction and return its output.
    pub async fn run(&mut self, ctx: &Context, command: &str) -> Result<String> {
        match self.driver.run_checked(ctx, command).await {
            Ok(result) => {
                self.output.push_str(&result);
                Ok(result)
            }
            Err(source) => Err(DriverError::ConfigCommandFailed {
                command: command.to_string(),
                output: self.output.clone(),
                source: Box::new(source),
            }
            .into()),
        }
    }

    /// Commit the candidate configuration.
    ///
    /// Returns the output of every command run in the transaction. The
    /// device stays in edit mode afterwards.
    pub async fn commit(mut self, ctx: &Context) -> Result<String> {
        self.consumed = true;
        debug!("committing configuration");

        let output = std::mem::take(&mut self.output);
        match self.driver.run_checked(ctx, &self.mode.commit).await {
            Ok(_) => Ok(output),
            Err(source) => Err(DriverError::CommitFailed {
                output,
                source: Box::new(source),
            }
            .into()),
        }
    }

    /// Discard uncommitted changes and leave edit mode.
    ///
    /// Either step is skipped if the platform has no command for it.
    pub async fn abort(mut self, ctx: &Context) -> Result<()> {
        self.consumed = true;
        debug!("aborting configuration");

        for command in [&self.mode.discard, &self.mode.exit].into_iter().flatten() {
            self.driver
                .run_checked(ctx, command)
                .await
                .map_err(|source| DriverError::AbortFailed {
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    /// Release the guard without committing or aborting.
    ///
    /// The device is left in edit mode with any uncommitted changes.
    pub fn detach(mut self) {
        self.consumed = true;
    }
}

impl<D: Dialer> Drop for ConfigSession<'_, D> {
    fn drop(&mut self) {
        if !self.consumed {
            warn!("ConfigSession dropped without explicit commit/abort/detach");
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::io::Builder;

    use crate::driver::testing;
    use crate::driver::{Driver, SessionState};
    use crate::error::{DriverError, Error};
    use crate::Context;

    #[tokio::test]
    async fn test_commit_returns_accumulated_output() {
        let mut script = Builder::new();
        testing::login(&mut script);
        testing::exchange(&mut script, "edit-config exclusive", "");
        testing::exchange_in(&mut script, "(ex)[/]", "set x", "x applied\r\n");
        testing::exchange_in(&mut script, "*(ex)[/]", "commit", "");
        let mut session = testing::sros_session(script.build());
        let ctx = Context::background();

        session.dial(&ctx).await.unwrap();
        let mut tx = session.config_session(&ctx).await.unwrap();
        assert_eq!(tx.run(&ctx, "set x").await.unwrap(), "x applied\n");
        assert_eq!(tx.output(), "x applied\n");
        assert_eq!(tx.commit(&ctx).await.unwrap(), "x applied\n");
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[tokio::test]
    async fn test_abort_discards_and_exits() {
        let mut script = Builder::new();
        testing::login(&mut script);
        testing::exchange(&mut script, "edit-config exclusive", "");
        testing::exchange_in(&mut script, "(ex)[/]", "set x", "");
        testing::exchange_in(&mut script, "*(ex)[/]", "discard", "");
        testing::exchange(&mut script, "quit-config", "");
        let mut session = testing::sros_session(script.build());
        let ctx = Context::background();

        session.dial(&ctx).await.unwrap();
        let mut tx = session.config_session(&ctx).await.unwrap();
        tx.run(&ctx, "set x").await.unwrap();
        tx.abort(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_abort_failure_is_wrapped() {
        let mut script = Builder::new();
        testing::login(&mut script);
        testing::exchange(&mut script, "edit-config exclusive", "");
        testing::exchange_in(
            &mut script,
            "(ex)[/]",
            "discard",
            "MAJOR: MGMT_CORE #2001: Nothing to discard\r\n",
        );
        let mut session = testing::sros_session(script.build());
        let ctx = Context::background();

        session.dial(&ctx).await.unwrap();
        let tx = session.config_session(&ctx).await.unwrap();
        let err = tx.abort(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::AbortFailed { .. })));
    }

    #[tokio::test]
    async fn test_detach_leaves_session_usable() {
        let mut script = Builder::new();
        testing::login(&mut script);
        testing::exchange(&mut script, "edit-config exclusive", "");
        testing::exchange_in(&mut script, "(ex)[/]", "info", "    system { }\r\n");
        let mut session = testing::sros_session(script.build());
        let ctx = Context::background();

        session.dial(&ctx).await.unwrap();
        session.config_session(&ctx).await.unwrap().detach();
        assert_eq!(session.run(&ctx, "info").await.unwrap(), "    system { }\n");
    }
}
