//! Nokia SR OS support.

mod platform;

pub use platform::{PLATFORM_NAME, platform};
