//! Linux platform definition.
//!
//! This is the simplest platform, supporting standard Linux/Unix shells
//! with `$` (user) and `#` (root) prompts. Shells echo the command on the
//! first line and print the prompt on the last, with no separator line.

use crate::channel::Prompt;
use crate::platform::{Framing, PlatformDefinition};

/// Create the Linux platform definition.
pub fn platform() -> PlatformDefinition {
    let prompt = Prompt::new(r"[$#]\s*$").expect("shell prompt pattern is valid");

    PlatformDefinition::new("linux", prompt)
        .with_framing(Framing::new(1, 1, false))
        .with_failure_pattern("command not found")
        .with_failure_pattern("No such file or directory")
        .with_failure_pattern("Permission denied")
        .with_failure_pattern("Operation not permitted")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::PromptMatcher;

    #[test]
    fn test_linux_platform() {
        let platform = platform();
        assert_eq!(platform.name, "linux");
        assert!(platform.config_mode.is_none());
        assert!(platform.prompts.is_empty());
    }

    #[test]
    fn test_prompt_match() {
        let platform = platform();
        assert!(platform.base_prompt.matches_line(b"user@host:~$ "));
        assert!(platform.base_prompt.matches_line(b"root@host:~# "));
        assert!(platform.base_prompt.matches_line(b"$"));
        assert!(!platform.base_prompt.matches_line(b"Linux host 6.1.0"));
    }

    #[test]
    fn test_output_framing() {
        let platform = platform();
        assert_eq!(
            platform.framing.strip("uname -s\r\nLinux\r\nuser@host:~$ "),
            "Linux\n"
        );
    }

    #[test]
    fn test_failed_when_contains() {
        let platform = platform();
        assert_eq!(
            platform.detect_failure("bash: foo: command not found\n"),
            Some("command not found")
        );
    }
}
