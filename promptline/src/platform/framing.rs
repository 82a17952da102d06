//! Removal of framing artifacts (command echo, prompt lines, separators).

use crate::channel::normalize_line_endings;

/// Line offsets used to cut a command result out of raw output.
///
/// Raw output is normalized to LF line endings and split into lines. Both
/// CRLF and a lone CR count as a line break, so a device that redraws a line
/// with a bare `\r` yields one extra line per redraw. The
/// first `leading_lines` (the command echo) and the last `trailing_lines`
/// (prompt and anything the device prints around it) are dropped. If
/// `elide_blank_before_trailer` is set, a blank line directly before the
/// dropped trailer is dropped too. Every remaining line is returned with a
/// trailing `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
    /// Lines removed from the start (command echo).
    pub leading_lines: usize,

    /// Lines removed from the end (prompt, prompt context).
    pub trailing_lines: usize,

    /// Drop a single blank separator line right before the trailer.
    pub elide_blank_before_trailer: bool,
}

impl Framing {
    /// Create a framing with explicit offsets.
    pub fn new(leading_lines: usize, trailing_lines: usize, elide_blank_before_trailer: bool) -> Self {
        Self {
            leading_lines,
            trailing_lines,
            elide_blank_before_trailer,
        }
    }

    /// Strip framing artifacts from `raw`.
    ///
    /// Output too short to contain a body yields an empty string.
    pub fn strip(&self, raw: &str) -> String {
        let normalized = normalize_line_endings(raw);
        let lines: Vec<&str> = normalized.split('\n').collect();
        let end = lines.len().saturating_sub(self.trailing_lines);

        let mut result = String::new();
        for (index, line) in lines.iter().enumerate().take(end).skip(self.leading_lines) {
            if self.elide_blank_before_trailer && index + 1 == end && line.is_empty() {
                continue;
            }
            result.push_str(line);
            result.push('\n');
        }
        result
    }
}

impl Default for Framing {
    /// One echo line, a two-line trailer, spurious blank line elided.
    fn default() -> Self {
        Self::new(1, 2, true)
    }
}
