//! Prompt synchronizer: read until the last line of output is a prompt.
//!
//! The read loop and the context are raced in a biased `select!`, so a fired
//! context wins against a read that is pending or about to start, and the
//! pending read future is dropped. Tokio readers are cancel-safe, so no bytes
//! are lost by that drop.
//!
//! Known limitation: a reader whose `poll_read` blocks the thread (instead of
//! returning `Pending`) cannot be raced. Cancellation latency is then bounded
//! only by how quickly that transport returns on its own.
//!
//! The prompt is tested after every read. A pattern that already matches a
//! prefix of the prompt line (e.g. `#` before the trailing space arrives)
//! ends the wait early, and the rest of the prompt stays in the stream where
//! the next command reads it.

use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::buffer::PromptBuffer;
use super::patterns::PromptMatcher;
use super::reader::{ContextReader, context_reason};
use crate::context::Context;
use crate::error::{ChannelError, Result};

/// Default number of bytes requested per read.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Reads a byte stream until a prompt appears on its last line.
#[derive(Debug, Clone, Copy)]
pub struct PromptSynchronizer {
    chunk_size: usize,
}

impl PromptSynchronizer {
    /// Create a synchronizer reading at most `chunk_size` bytes per read.
    ///
    /// A chunk size of zero is bumped to one.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Bytes requested per read.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Read from `reader` until the last line matches `prompt`.
    ///
    /// Returns everything read, with line endings exactly as received. Fails
    /// with [`ChannelError::PromptTimeout`] if `ctx` fires first, or with
    /// [`ChannelError::Read`] if the stream errors or ends.
    pub async fn read_until_prompt<R, P>(
        &self,
        ctx: &Context,
        reader: &mut R,
        prompt: &P,
    ) -> Result<String>
    where
        R: AsyncRead + Unpin + ?Sized,
        P: PromptMatcher + ?Sized,
    {
        let mut source = ContextReader::new(ctx.clone(), reader);

        tokio::select! {
            biased;
            reason = ctx.done() => {
                debug!("gave up waiting for prompt: {}", reason);
                Err(ChannelError::PromptTimeout(reason).into())
            }
            result = self.read_loop(ctx, &mut source, prompt) => result,
        }
    }

    async fn read_loop<R, P>(&self, ctx: &Context, source: &mut R, prompt: &P) -> Result<String>
    where
        R: AsyncRead + Unpin + ?Sized,
        P: PromptMatcher + ?Sized,
    {
        let mut buffer = PromptBuffer::new();
        let mut chunk = vec![0u8; self.chunk_size];

        loop {
            if let Some(reason) = ctx.err() {
                return Err(ChannelError::PromptTimeout(reason).into());
            }

            let read = match source.read(&mut chunk).await {
                Ok(0) => {
                    return Err(ChannelError::Read {
                        source: std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "stream ended before prompt",
                        ),
                    }
                    .into());
                }
                Ok(read) => read,
                Err(err) => {
                    return Err(match context_reason(&err) {
                        Some(reason) => ChannelError::PromptTimeout(reason),
                        None => ChannelError::Read { source: err },
                    }
                    .into());
                }
            };

            buffer.extend(&chunk[..read]);
            trace!("read {} bytes, buffered {}", read, buffer.len());

            if buffer.last_line_matches(prompt) {
                debug!("prompt found after {} bytes", buffer.len());
                return Ok(buffer.into_string());
            }
        }
    }
}

impl Default for PromptSynchronizer {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

/// Read from `reader` until the last line matches `prompt`, using the default
/// chunk size.
pub async fn read_until_prompt<R, P>(ctx: &Context, reader: &mut R, prompt: &P) -> Result<String>
where
    R: AsyncRead + Unpin + ?Sized,
    P: PromptMatcher + ?Sized,
{
    PromptSynchronizer::default()
        .read_until_prompt(ctx, reader, prompt)
        .await
}
