//! Builder for creating device sessions.

use std::time::Duration;

use super::config::SessionConfig;
use super::session::DeviceSession;
use crate::channel::DEFAULT_CHUNK_SIZE;
use crate::error::{DriverError, Result};
use crate::platform::{PlatformDefinition, PlatformRegistry};
use crate::transport::Dialer;

/// Default per-command timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for constructing device sessions.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use promptline::{Dialer, SessionBuilder};
///
/// # fn example<D: Dialer>(dialer: D) -> Result<(), promptline::Error> {
/// let session = SessionBuilder::new(dialer)
///     .platform("nokia_sros")
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder<D> {
    dialer: D,
    platform_name: Option<String>,
    custom_platform: Option<PlatformDefinition>,
    timeout: Option<Duration>,
    chunk_size: usize,
}

impl<D: Dialer> SessionBuilder<D> {
    /// Create a new session builder around `dialer`.
    pub fn new(dialer: D) -> Self {
        Self {
            dialer,
            platform_name: None,
            custom_platform: None,
            timeout: Some(DEFAULT_TIMEOUT),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a builder from a deserialized [`SessionConfig`].
    pub fn from_config(dialer: D, config: &SessionConfig) -> Self {
        let mut builder = Self::new(dialer).platform(config.platform.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(chunk_size) = config.chunk_size {
            builder = builder.chunk_size(chunk_size);
        }
        builder
    }

    /// Set the platform name (e.g., "nokia_sros", "linux").
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform_name = Some(platform.into());
        self
    }

    /// Set a custom platform definition.
    pub fn custom_platform(mut self, platform: PlatformDefinition) -> Self {
        self.custom_platform = Some(platform);
        self
    }

    /// Set the default per-command timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Rely on the caller's context alone, with no default timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set the number of bytes requested per read.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Build the session.
    ///
    /// This creates the session but does not connect. Call `dial()` on the
    /// returned session to establish the connection.
    pub fn build(self) -> Result<DeviceSession<D>> {
        if self.chunk_size == 0 {
            return Err(DriverError::InvalidConfig {
                message: "chunk size must be greater than zero".to_string(),
            }
            .into());
        }

        let platform = if let Some(custom) = self.custom_platform {
            custom
        } else if let Some(name) = self.platform_name {
            PlatformRegistry::lookup(&name)?
        } else {
            return Err(DriverError::InvalidConfig {
                message: "Platform must be specified".to_string(),
            }
            .into());
        };

        let mut session = DeviceSession::new(self.dialer, platform);
        session.set_timeout(self.timeout);
        session.set_chunk_size(self.chunk_size);
        Ok(session)
    }
}
