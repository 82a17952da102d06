//! Device session: one connection, one command at a time.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use super::config_session::ConfigSession;
use super::{Driver, SessionState};
use crate::channel::{PromptMatcher, PromptSynchronizer};
use crate::context::Context;
use crate::error::{ChannelError, DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::{Connection, Dialer};

/// Driver for one device, parameterized by how it dials.
///
/// This is the main driver implementation that handles:
/// - connection lifecycle (dial, post-connect commands, close)
/// - command execution with prompt detection
/// - stripping framing artifacts from command output
/// - exclusive edit mode transactions
///
/// Commands take `&mut self`, so at most one prompt wait is ever active on the
/// connection. If a command future is dropped before its prompt arrives, the
/// session stays in [`SessionState::AwaitingPrompt`] and every later command
/// fails with [`DriverError::OutOfSync`] instead of misreading the leftover
/// output.
pub struct DeviceSession<D: Dialer> {
    /// Dials the connection.
    dialer: D,

    /// Platform definition.
    platform: Arc<PlatformDefinition>,

    /// Live connection (None when disconnected).
    connection: Option<D::Connection>,

    /// Lifecycle state.
    state: SessionState,

    /// Whether `enable()` already succeeded on this connection.
    enabled: bool,

    /// Default per-command timeout, layered under the caller's context.
    timeout: Option<Duration>,

    /// Reads output until a prompt.
    synchronizer: PromptSynchronizer,
}

impl<D: Dialer> DeviceSession<D> {
    /// Create a new, undialed session.
    pub fn new(dialer: D, platform: PlatformDefinition) -> Self {
        Self {
            dialer,
            platform: Arc::new(platform),
            connection: None,
            state: SessionState::Disconnected,
            enabled: false,
            timeout: None,
            synchronizer: PromptSynchronizer::default(),
        }
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Default per-command timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Set the default per-command timeout.
    ///
    /// Each command waits until the earlier of the caller's deadline and this
    /// timeout. `None` leaves the caller's context alone.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Set how many bytes are requested per read.
    pub fn set_chunk_size(&mut self, chunk_size: usize) {
        self.synchronizer = PromptSynchronizer::new(chunk_size);
    }

    /// Enter exclusive edit mode and return a guard for the transaction.
    ///
    /// See [`ConfigSession`] for the available operations.
    pub async fn config_session(&mut self, ctx: &Context) -> Result<ConfigSession<'_, D>> {
        let mode = self
            .platform
            .config_mode
            .clone()
            .ok_or_else(|| DriverError::Unsupported {
                platform: self.platform.name.clone(),
                operation: "exclusive configuration",
            })?;

        debug!("entering exclusive edit mode with {:?}", mode.enter);
        self.run_checked(ctx, &mode.enter)
            .await
            .map_err(|source| DriverError::EnterConfigFailed {
                source: Box::new(source),
            })?;

        Ok(ConfigSession::new(self, mode))
    }

    /// Run a command and fail if its output contains one of the platform's
    /// failure patterns.
    ///
    /// Used for steps whose output is a device verdict (entering edit mode,
    /// configuration lines, commit). Plain [`Driver::run`] never inspects
    /// output, since show commands routinely print the same markers.
    pub async fn run_checked(&mut self, ctx: &Context, command: &str) -> Result<String> {
        let output = self.run(ctx, command).await?;

        if let Some(pattern) = self.platform.detect_failure(&output) {
            debug!("command {:?} matched failure pattern {:?}", command, pattern);
            return Err(DriverError::CommandRejected {
                command: command.to_string(),
                pattern: pattern.to_string(),
                output,
            }
            .into());
        }
        Ok(output)
    }

    fn command_context(&self, ctx: &Context) -> Context {
        match self.timeout {
            Some(timeout) => ctx.child_with_timeout(timeout),
            None => ctx.clone(),
        }
    }

    /// Optionally send `command`, then read until `prompt`.
    ///
    /// Tracks the session state around the wait and tears the connection
    /// down if it failed.
    async fn await_prompt<P>(&mut self, ctx: &Context, command: Option<&str>, prompt: &P) -> Result<String>
    where
        P: PromptMatcher + ?Sized,
    {
        match self.state {
            SessionState::Disconnected => return Err(DriverError::NotConnected.into()),
            SessionState::AwaitingPrompt => return Err(DriverError::OutOfSync.into()),
            SessionState::Connected => {}
        }

        let ctx = self.command_context(ctx);
        self.state = SessionState::AwaitingPrompt;
        let result = self.exchange(&ctx, command, prompt).await;

        match &result {
            Err(err) if err.is_transport_failure() => {
                warn!("connection to {} device failed: {}", self.platform.name, err);
                self.teardown(&ctx).await;
            }
            _ => self.state = SessionState::Connected,
        }
        result
    }

    async fn exchange<P>(&mut self, ctx: &Context, command: Option<&str>, prompt: &P) -> Result<String>
    where
        P: PromptMatcher + ?Sized,
    {
        if let Some(reason) = ctx.err() {
            return Err(ChannelError::PromptTimeout(reason).into());
        }

        let connection = self.connection.as_mut().ok_or(DriverError::NotConnected)?;

        if let Some(command) = command {
            debug!("sending command {:?}", command);
            connection
                .send(ctx, command)
                .await
                .map_err(|source| DriverError::SendFailed {
                    command: command.to_string(),
                    source: Box::new(source),
                })?;
        }

        let reader = connection.receive(ctx);
        self.synchronizer.read_until_prompt(ctx, reader, prompt).await
    }

    /// Wait for the login prompt, then run the on_open commands.
    async fn initialize(&mut self, ctx: &Context) -> Result<()> {
        let platform = Arc::clone(&self.platform);
        self.await_prompt(ctx, None, &platform.base_prompt).await?;

        for command in &platform.on_open_commands {
            self.run_until(ctx, command, &platform.base_prompt).await?;
        }
        Ok(())
    }

    /// Close and forget the connection; close errors are only logged.
    async fn teardown(&mut self, ctx: &Context) {
        if let Some(mut connection) = self.connection.take() {
            if let Err(err) = connection.close(ctx).await {
                warn!("error closing connection: {}", err);
            }
        }
        self.state = SessionState::Disconnected;
        self.enabled = false;
    }
}

impl<D: Dialer> Driver for DeviceSession<D> {
    async fn dial(&mut self, ctx: &Context) -> Result<()> {
        if self.connection.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }

        debug!("dialing {} device", self.platform.name);
        let connection = self.dialer.dial(&self.command_context(ctx)).await?;
        self.connection = Some(connection);
        self.state = SessionState::Connected;

        if let Err(err) = self.initialize(ctx).await {
            debug!("post-connect initialization failed: {}", err);
            self.teardown(ctx).await;
            return Err(err);
        }

        debug!("session {}", self.state);
        Ok(())
    }

    async fn enable(&mut self, ctx: &Context) -> Result<()> {
        if self.enabled {
            return Ok(());
        }
        let Some(command) = self.platform.enable_command.clone() else {
            return Ok(());
        };
        if self.connection.is_none() {
            return Err(DriverError::NotConnected.into());
        }

        self.run_checked(ctx, &command)
            .await
            .map_err(|source| DriverError::EnableFailed {
                source: Box::new(source),
            })?;
        self.enabled = true;
        Ok(())
    }

    async fn run(&mut self, ctx: &Context, command: &str) -> Result<String> {
        let platform = Arc::clone(&self.platform);
        let raw = self
            .await_prompt(ctx, Some(command), &platform.base_prompt)
            .await?;
        Ok(platform.framing.strip(&raw))
    }

    async fn run_until<P: PromptMatcher + ?Sized>(
        &mut self,
        ctx: &Context,
        command: &str,
        prompt: &P,
    ) -> Result<String> {
        self.await_prompt(ctx, Some(command), prompt).await
    }

    async fn configure(&mut self, ctx: &Context, commands: &[&str]) -> Result<String> {
        let mut session = self.config_session(ctx).await?;

        for command in commands {
            if let Err(err) = session.run(ctx, command).await {
                // Left in edit mode; recovering is up to the caller.
                session.detach();
                return Err(err);
            }
        }
        session.commit(ctx).await
    }

    async fn close(&mut self, ctx: &Context) -> Result<()> {
        if self.connection.is_some() {
            debug!("closing {} session", self.platform.name);
        }
        self.teardown(ctx).await;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.connection.is_some()
    }
}
