//! Platform definition for vendor-specific configurations.

use indexmap::IndexMap;

use super::framing::Framing;
use crate::channel::Prompt;

/// Commands that drive a device's exclusive edit (candidate/commit) mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMode {
    /// Command entering exclusive edit mode (e.g. `edit-config exclusive`).
    pub enter: String,

    /// Command committing the candidate configuration.
    pub commit: String,

    /// Command discarding uncommitted changes, if the device has one.
    pub discard: Option<String>,

    /// Command leaving edit mode, if the device has one.
    pub exit: Option<String>,
}

impl ConfigMode {
    /// Create a config mode from its enter and commit commands.
    pub fn new(enter: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            enter: enter.into(),
            commit: commit.into(),
            discard: None,
            exit: None,
        }
    }

    /// Set the discard command.
    pub fn with_discard(mut self, command: impl Into<String>) -> Self {
        self.discard = Some(command.into());
        self
    }

    /// Set the exit command.
    pub fn with_exit(mut self, command: impl Into<String>) -> Self {
        self.exit = Some(command.into());
        self
    }
}

/// Platform definition containing all vendor-specific configuration.
///
/// The prompt set is compiled once, when the definition is built, and never
/// changes afterwards.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "nokia_sros", "linux").
    pub name: String,

    /// Prompt that ends ordinary command output.
    pub base_prompt: Prompt,

    /// Additional named prompt variants (sub-modes, alternate CLI engines).
    pub prompts: IndexMap<String, Prompt>,

    /// How to cut framing artifacts out of raw command output.
    pub framing: Framing,

    /// Commands to run when connection is established.
    pub on_open_commands: Vec<String>,

    /// Privilege elevation command; `None` when dial already grants full privilege.
    pub enable_command: Option<String>,

    /// Exclusive edit mode commands; `None` when the platform has no such mode.
    pub config_mode: Option<ConfigMode>,

    /// Output substrings that indicate command failure.
    pub failed_when_contains: Vec<String>,
}

impl PlatformDefinition {
    /// Create a new platform definition with minimal required fields.
    pub fn new(name: impl Into<String>, base_prompt: Prompt) -> Self {
        Self {
            name: name.into(),
            base_prompt,
            prompts: IndexMap::new(),
            framing: Framing::default(),
            on_open_commands: vec![],
            enable_command: None,
            config_mode: None,
            failed_when_contains: vec![],
        }
    }

    /// Add a named prompt variant.
    pub fn with_prompt(mut self, name: impl Into<String>, prompt: Prompt) -> Self {
        self.prompts.insert(name.into(), prompt);
        self
    }

    /// Set the output framing.
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Set the privilege elevation command.
    pub fn with_enable_command(mut self, command: impl Into<String>) -> Self {
        self.enable_command = Some(command.into());
        self
    }

    /// Set the exclusive edit mode commands.
    pub fn with_config_mode(mut self, config_mode: ConfigMode) -> Self {
        self.config_mode = Some(config_mode);
        self
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Get a prompt variant by name.
    pub fn prompt(&self, name: &str) -> Option<&Prompt> {
        self.prompts.get(name)
    }

    /// The first failure pattern contained in `output`, if any.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::PromptMatcher;

    fn definition() -> PlatformDefinition {
        PlatformDefinition::new("lab", Prompt::new(r"#\s*$").unwrap())
            .with_prompt("confirm", Prompt::new(r"\[y/n\]\s*$").unwrap())
            .with_failure_pattern("% Invalid")
            .with_failure_pattern("% Incomplete")
    }

    #[test]
    fn test_prompt_variants() {
        let platform = definition();
        let confirm = platform.prompt("confirm").unwrap();
        assert!(confirm.matches_line(b"Proceed? [y/n] "));
        assert!(platform.prompt("missing").is_none());
    }

    #[test]
    fn test_detect_failure() {
        let platform = definition();
        assert_eq!(
            platform.detect_failure("% Incomplete command.\n"),
            Some("% Incomplete")
        );
        assert_eq!(platform.detect_failure("all good\n"), None);
    }

    #[test]
    fn test_config_mode_builder() {
        let mode = ConfigMode::new("configure exclusive", "commit")
            .with_discard("rollback 0")
            .with_exit("exit");
        assert_eq!(mode.discard.as_deref(), Some("rollback 0"));
        assert_eq!(mode.exit.as_deref(), Some("exit"));

        let platform = definition().with_config_mode(mode.clone());
        assert_eq!(platform.config_mode, Some(mode));
        assert!(platform.enable_command.is_none());
    }
}
