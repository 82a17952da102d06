//! Pattern matching utilities for prompt detection.

use regex::bytes::Regex;

use crate::error::{ChannelError, Result};

/// Trait for prompt matching - regex by default, extensible for custom parsers.
///
/// Implementations are handed exactly one line of output, with its line
/// terminator already removed.
pub trait PromptMatcher: Send + Sync {
    /// Check whether `line` is a prompt.
    fn matches_line(&self, line: &[u8]) -> bool;
}

/// Regex-based prompt matcher (the default implementation).
impl PromptMatcher for Regex {
    fn matches_line(&self, line: &[u8]) -> bool {
        self.is_match(line)
    }
}

/// A compiled prompt pattern with optional negative matches.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// The main pattern to match.
    pattern: Regex,

    /// Literal strings that must NOT be present for a match.
    not_contains: Vec<String>,
}

impl Prompt {
    /// Compile a prompt from a pattern string.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern).map_err(ChannelError::InvalidPattern)?,
            not_contains: Vec::new(),
        })
    }

    /// Add a literal that disqualifies a line from matching.
    pub fn with_not_contains(mut self, literal: impl Into<String>) -> Self {
        self.not_contains.push(literal.into());
        self
    }

    /// Get a reference to the underlying regex.
    pub fn regex(&self) -> &Regex {
        &self.pattern
    }
}

impl From<Regex> for Prompt {
    fn from(pattern: Regex) -> Self {
        Self {
            pattern,
            not_contains: Vec::new(),
        }
    }
}

impl PromptMatcher for Prompt {
    fn matches_line(&self, line: &[u8]) -> bool {
        let excluded = self
            .not_contains
            .iter()
            .any(|nc| memchr::memmem::find(line, nc.as_bytes()).is_some());

        !excluded && self.pattern.is_match(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_prompt_matcher() {
        let pattern = Regex::new(r"^[ABCD]:\S+@\S+#").unwrap();
        assert!(pattern.matches_line(b"A:admin@router# "));
        assert!(pattern.matches_line(b"D:svc-neo@use1.lm1#"));
        assert!(!pattern.matches_line(b"A:router#"));
        assert!(!pattern.matches_line(b"[/]"));
    }

    #[test]
    fn test_prompt_not_contains() {
        let prompt = Prompt::new(r"^\*?[ABCD]:\S+#\s?$")
            .unwrap()
            .with_not_contains("@");

        assert!(prompt.matches_line(b"A:router#"));
        assert!(prompt.matches_line(b"*B:router# "));
        assert!(!prompt.matches_line(b"A:admin@router#"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Prompt::new(r"[unclosed").unwrap_err();
        assert!(err.to_string().contains("Invalid regex pattern"));
    }

    #[test]
    fn test_from_regex() {
        let prompt = Prompt::from(Regex::new(r"[$#]\s*$").unwrap());
        assert_eq!(prompt.regex().as_str(), r"[$#]\s*$");
        assert!(prompt.matches_line(b"user@host:~$ "));
    }
}
