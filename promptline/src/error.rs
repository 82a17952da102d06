//! Error types for promptline.

use std::io;
use thiserror::Error;

use crate::context::ContextError;

/// Main error type for promptline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Prompt synchronization errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl Error {
    /// Whether the operation gave up because its context fired before the
    /// expected prompt arrived.
    ///
    /// Wrapped errors (e.g. a timed out command inside `configure`) are
    /// inspected as well.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Channel(ChannelError::PromptTimeout(_)) => true,
            Error::Transport(TransportError::Aborted(_)) => true,
            Error::Driver(err) => err.inner().is_some_and(Error::is_timeout),
            _ => false,
        }
    }

    /// Whether the underlying connection failed while sending or reading.
    pub fn is_transport_failure(&self) -> bool {
        match self {
            Error::Channel(ChannelError::Read { .. }) => true,
            Error::Transport(TransportError::Aborted(_)) => false,
            Error::Transport(_) => true,
            Error::Driver(err) => err.inner().is_some_and(Error::is_transport_failure),
            _ => false,
        }
    }

    /// Output accumulated by a `configure` transaction before it failed.
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            Error::Driver(DriverError::ConfigCommandFailed { output, .. })
            | Error::Driver(DriverError::CommitFailed { output, .. }) => Some(output),
            _ => None,
        }
    }
}

/// Errors raised by a connection or dialer.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to establish a connection
    #[error("Connection failed to {target}: {message}")]
    ConnectionFailed { target: String, message: String },

    /// The connection was already closed
    #[error("Connection closed")]
    Closed,

    /// The context fired before the operation started
    #[error("Operation aborted: {0}")]
    Aborted(ContextError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Prompt synchronization errors.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The byte stream failed (or ended) before the prompt appeared
    #[error("error reading output from device: {source}")]
    Read {
        #[source]
        source: io::Error,
    },

    /// The context fired before the prompt appeared
    #[error("time out waiting to find prompt: {0}")]
    PromptTimeout(ContextError),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (command execution, configuration transactions).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call dial() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// A previous prompt wait was abandoned mid-flight; framing is lost
    #[error("Session out of sync: a previous command never finished waiting for its prompt")]
    OutOfSync,

    /// Sending the command to the device failed
    #[error("unable to send command '{command}' to device: {source}")]
    SendFailed {
        command: String,
        #[source]
        source: Box<Error>,
    },

    /// The device answered with a known failure pattern
    #[error("command '{command}' failed: output contains '{pattern}'")]
    CommandRejected {
        command: String,
        pattern: String,
        output: String,
    },

    /// Privilege elevation failed
    #[error("unable to elevate privileges: {source}")]
    EnableFailed {
        #[source]
        source: Box<Error>,
    },

    /// Entering exclusive edit mode failed
    #[error("unable to enter exclusive edit mode: {source}")]
    EnterConfigFailed {
        #[source]
        source: Box<Error>,
    },

    /// A command inside a configuration transaction failed
    #[error("unable to run command '{command}': {source}")]
    ConfigCommandFailed {
        command: String,
        output: String,
        #[source]
        source: Box<Error>,
    },

    /// Committing the configuration failed; the edit session may still be open
    #[error("unable to commit configuration: {source}")]
    CommitFailed {
        output: String,
        #[source]
        source: Box<Error>,
    },

    /// Leaving the edit session failed
    #[error("unable to abort configuration: {source}")]
    AbortFailed {
        #[source]
        source: Box<Error>,
    },

    /// The platform does not support the requested operation
    #[error("platform '{platform}' does not support {operation}")]
    Unsupported {
        platform: String,
        operation: &'static str,
    },

    /// Invalid configuration in the session builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl DriverError {
    /// The wrapped error, for variants that wrap one.
    fn inner(&self) -> Option<&Error> {
        match self {
            DriverError::SendFailed { source, .. }
            | DriverError::EnableFailed { source }
            | DriverError::EnterConfigFailed { source }
            | DriverError::ConfigCommandFailed { source, .. }
            | DriverError::CommitFailed { source, .. }
            | DriverError::AbortFailed { source } => Some(source),
            _ => None,
        }
    }
}

/// Platform/vendor definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },

    /// Platform name not present in the registry
    #[error("Unknown platform '{name}'")]
    UnknownPlatform { name: String },

    /// Platform name already present in the registry
    #[error("Platform '{name}' is already registered")]
    AlreadyRegistered { name: String },
}

/// Result type alias using promptline's Error.
pub type Result<T> = std::result::Result<T, Error>;
