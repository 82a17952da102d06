//! Serializable session settings.

use serde::{Deserialize, Serialize};

/// Session settings as they appear in an inventory or config file.
///
/// ```json
/// { "platform": "nokia_sros", "timeout_secs": 60 }
/// ```
///
/// Feed it to [`SessionBuilder::from_config`](super::SessionBuilder::from_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Registered platform name.
    pub platform: String,

    /// Default per-command timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Bytes requested per read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
}
