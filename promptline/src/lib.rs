//! # Promptline
//!
//! Prompt-synchronized CLI driver for network devices.
//!
//! Promptline drives an interactive device shell over any byte stream: it
//! sends a command, reads until the device prints its prompt again and hands
//! back the output between the two. Every wait takes a [`Context`], so a
//! deadline or a cancel from another task ends it promptly.
//!
//! ## Features
//!
//! - Context-cancellable prompt waits with a chunk-size independent result
//! - Output framing removal (command echo, prompt lines, separators)
//! - Exclusive edit mode transactions with partial output on failure
//! - Platform registry with Nokia SR OS and Linux built in
//! - Pluggable transport through the [`Dialer`] and [`Connection`] traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use promptline::{Context, Dialer, Driver, SessionBuilder};
//!
//! async fn show_version<D: Dialer>(dialer: D) -> Result<(), promptline::Error> {
//!     let mut session = SessionBuilder::new(dialer)
//!         .platform("nokia_sros")
//!         .build()?;
//!
//!     let ctx = Context::with_timeout(Duration::from_secs(30));
//!     session.dial(&ctx).await?;
//!
//!     let output = session.run(&ctx, "show version").await?;
//!     println!("{output}");
//!
//!     session.close(&ctx).await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod context;
pub mod driver;
pub mod error;
pub mod platform;
pub mod transport;

// Re-export main types for convenience
pub use channel::{Prompt, PromptMatcher, PromptSynchronizer, read_until_prompt};
pub use context::{Context, ContextError};
pub use driver::{ConfigSession, DeviceSession, Driver, SessionBuilder, SessionConfig, SessionState};
pub use error::{Error, Result};
pub use platform::{ConfigMode, Framing, PlatformDefinition, PlatformRegistry};
pub use transport::{Connection, Dialer, StreamConnection};
