//! Nokia SR OS platform definition.
//!
//! Targets routers running the MD-CLI engine. The base prompt is the second
//! line of the two-line MD-CLI prompt; the first line carries the context
//! (`[/]`, `(ex)[/configure]`, ...) and is removed by the default
//! [`Framing`](crate::platform::Framing) together with the prompt itself.
//!
//! # Prompt Examples
//!
//! ```text
//! [/]                                  # MD-CLI exec (line 1)
//! A:admin@router#                      # MD-CLI exec (line 2)
//!
//! *(ex)[/configure router "Base"]      # MD-CLI exclusive config + uncommitted (line 1)
//! A:admin@router#                      # MD-CLI config (line 2)
//!
//! A:router#                            # Classic CLI, reached with `//`
//! ```
//!
//! MD-CLI separates command output from the prompt with one blank line,
//! which the default framing drops.

use crate::channel::Prompt;
use crate::platform::{ConfigMode, Framing, PlatformDefinition};

/// Platform name for Nokia SR OS.
pub const PLATFORM_NAME: &str = "nokia_sros";

/// Create the Nokia SR OS platform definition.
///
/// Prompt variants:
/// - `classic` - the single-line Classic CLI prompt, for use with
///   `run_until` after toggling engines with `//`.
pub fn platform() -> PlatformDefinition {
    let base = Prompt::new(r"^[ABCD]:\S+@\S+#").expect("MD-CLI prompt pattern is valid");

    // not_contains "@" keeps the MD-CLI prompt from matching
    let classic = Prompt::new(r"^\*?[ABCD]:[\w\s_.-]+#\s?$")
        .expect("Classic CLI prompt pattern is valid")
        .with_not_contains("@");

    let config_mode = ConfigMode::new("edit-config exclusive", "commit")
        .with_discard("discard")
        .with_exit("quit-config");

    PlatformDefinition::new(PLATFORM_NAME, base)
        .with_prompt("classic", classic)
        .with_framing(Framing::default())
        .with_on_open_command("environment more false")
        .with_config_mode(config_mode)
        .with_failure_pattern("MINOR:")
        .with_failure_pattern("MAJOR:")
        .with_failure_pattern("CRITICAL:")
}
