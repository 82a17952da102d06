//! Byte source that refuses to start a read once its context has fired.

use std::io;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use crate::context::{Context, ContextError};

/// Wraps a reader so every read first checks a [`Context`].
///
/// If the context has fired, the read fails with an `io::Error` wrapping the
/// [`ContextError`] (kind `TimedOut` for an expired deadline, `Other` for an
/// explicit cancel) and the inner reader is not touched. Otherwise the read is
/// delegated unchanged.
///
/// A read that is already pending inside the inner reader is not interrupted
/// by this wrapper; the caller is expected to race it against
/// [`Context::done`].
#[derive(Debug)]
pub struct ContextReader<R> {
    ctx: Context,
    inner: R,
}

impl<R> ContextReader<R> {
    /// Wrap `inner`, checking `ctx` before every read.
    pub fn new(ctx: Context, inner: R) -> Self {
        Self { ctx, inner }
    }
}

/// Build the error a fired context produces.
pub(crate) fn context_io_error(reason: ContextError) -> io::Error {
    let kind = match reason {
        ContextError::DeadlineExceeded => io::ErrorKind::TimedOut,
        ContextError::Canceled => io::ErrorKind::Other,
    };
    io::Error::new(kind, reason)
}

/// Recover the [`ContextError`] from an error built by a [`ContextReader`].
pub(crate) fn context_reason(err: &io::Error) -> Option<ContextError> {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<ContextError>())
        .copied()
}

impl<R: AsyncRead + Unpin> AsyncRead for ContextReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut TaskContext<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if let Some(reason) = this.ctx.err() {
            return Poll::Ready(Err(context_io_error(reason)));
        }
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_delegates_when_live() {
        let mut reader = ContextReader::new(Context::background(), &b"show version"[..]);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"show version");
    }

    #[tokio::test]
    async fn test_fails_fast_after_cancel() {
        let ctx = Context::background();
        ctx.cancel();

        // The inner mock has no scripted actions; touching it would return EOF
        // instead of an error.
        let mut inner = tokio_test::io::Builder::new().build();
        let mut reader = ContextReader::new(ctx, &mut inner);
        let mut buf = [0u8; 16];
        let err = reader.read(&mut buf).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(context_reason(&err), Some(ContextError::Canceled));
    }

    #[tokio::test]
    async fn test_deadline_maps_to_timed_out() {
        let ctx = Context::with_timeout(std::time::Duration::ZERO);
        let mut inner = &b"never read"[..];
        let mut reader = ContextReader::new(ctx, &mut inner);
        let mut buf = [0u8; 16];
        let err = reader.read(&mut buf).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert_eq!(context_reason(&err), Some(ContextError::DeadlineExceeded));

        // Nothing was consumed from the inner reader
        drop(reader);
        assert_eq!(inner, b"never read");
    }

    #[test]
    fn test_foreign_errors_have_no_reason() {
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        assert_eq!(context_reason(&err), None);
    }
}
