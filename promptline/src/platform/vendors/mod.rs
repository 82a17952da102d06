//! Built-in vendor platforms.

pub mod linux;
pub mod nokia_sros;
