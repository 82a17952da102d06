//! Platform definitions for multi-vendor support.
//!
//! This module defines vendor-specific configurations including
//! prompt patterns, output framing and configuration mode commands.

mod definition;
mod framing;
mod registry;
pub mod vendors;

pub use definition::{ConfigMode, PlatformDefinition};
pub use framing::Framing;
pub use registry::PlatformRegistry;
