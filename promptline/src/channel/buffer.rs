//! Accumulation buffer with last-line prompt detection.
//!
//! Only the final line of the output is ever tested against a prompt. The
//! normalized view (CRLF and lone CR collapsed to LF) is never materialized:
//! the last normalized line is exactly the bytes following the final `\r` or
//! `\n` in the raw buffer, so a reverse scan finds it without copying.

use std::borrow::Cow;

use bytes::BytesMut;

use super::patterns::PromptMatcher;

/// Buffer for accumulating one command's output.
#[derive(Debug, Default)]
pub struct PromptBuffer {
    buffer: BytesMut,
}

impl PromptBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append newly read bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// The last line of the line-ending normalized output.
    ///
    /// Returns `None` while the buffer is empty. A buffer ending in a line
    /// terminator has an empty last line.
    pub fn last_line(&self) -> Option<&[u8]> {
        if self.is_empty() {
            return None;
        }
        let start = memchr::memrchr2(b'\r', b'\n', &self.buffer).map_or(0, |pos| pos + 1);
        Some(&self.buffer[start..])
    }

    /// Check whether the last line is a prompt.
    pub fn last_line_matches<P: PromptMatcher + ?Sized>(&self, prompt: &P) -> bool {
        self.last_line().is_some_and(|line| prompt.matches_line(line))
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the buffer, decoding it as (lossy) UTF-8.
    ///
    /// Line endings are returned exactly as the device sent them.
    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }
}

/// Collapse CRLF and lone CR line endings into LF.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
