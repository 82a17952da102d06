//! [`Connection`] over any duplex byte stream.

use log::trace;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};

use super::Connection;
use crate::context::Context;
use crate::error::{Result, TransportError};

/// Adapts an `AsyncRead + AsyncWrite` stream (a TCP socket, a PTY, an SSH
/// channel stream, ...) into a [`Connection`].
///
/// Every sent line is terminated with the configured line ending (`"\n"` by
/// default). Closing shuts down the write half and is idempotent.
#[derive(Debug)]
pub struct StreamConnection<S> {
    reader: ReadHalf<S>,
    writer: WriteHalf<S>,
    line_ending: String,
    closed: bool,
}

impl<S: AsyncRead + AsyncWrite> StreamConnection<S> {
    /// Wrap a connected stream.
    pub fn new(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader,
            writer,
            line_ending: "\n".to_string(),
            closed: false,
        }
    }

    /// Terminate sent lines with `line_ending` instead of `"\n"`.
    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }

    /// Whether [`Connection::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<S> Connection for StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Send,
{
    type Reader = ReadHalf<S>;

    async fn send(&mut self, ctx: &Context, text: &str) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed.into());
        }
        if let Some(reason) = ctx.err() {
            return Err(TransportError::Aborted(reason).into());
        }

        let mut line = String::with_capacity(text.len() + self.line_ending.len());
        line.push_str(text);
        line.push_str(&self.line_ending);

        trace!("writing {} bytes", line.len());
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(TransportError::Io)?;
        self.writer.flush().await.map_err(TransportError::Io)?;
        Ok(())
    }

    fn receive(&mut self, _ctx: &Context) -> &mut Self::Reader {
        &mut self.reader
    }

    async fn close(&mut self, _ctx: &Context) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.shutdown().await.map_err(TransportError::Io)?;
        Ok(())
    }
}
