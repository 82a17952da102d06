//! Channel layer: prompt synchronization over a raw byte stream.
//!
//! This module turns an unbounded stream of device output into one chunk of
//! text per command, using the prompt on the last line as the boundary.

mod buffer;
mod patterns;
mod reader;
mod sync;

pub use buffer::{PromptBuffer, normalize_line_endings};
pub use patterns::{Prompt, PromptMatcher};
pub use reader::ContextReader;
pub use sync::{DEFAULT_CHUNK_SIZE, PromptSynchronizer, read_until_prompt};
