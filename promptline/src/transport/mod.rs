//! Connection contracts consumed by the driver.
//!
//! Dialing, authentication and terminal negotiation live outside this crate.
//! A transport plugs in by implementing [`Dialer`] and [`Connection`];
//! [`StreamConnection`] adapts any duplex byte stream that is already past
//! those steps.

mod stream;

pub use stream::StreamConnection;

use std::future::Future;

use tokio::io::AsyncRead;

use crate::context::Context;
use crate::error::Result;

/// A live interactive session on a device.
pub trait Connection: Send {
    /// Byte stream carrying the device's output.
    type Reader: AsyncRead + Unpin + Send;

    /// Send one line of input.
    fn send(&mut self, ctx: &Context, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// The live output stream.
    ///
    /// The same stream is returned on every call; it is read repeatedly
    /// across commands, never re-created per command.
    fn receive(&mut self, ctx: &Context) -> &mut Self::Reader;

    /// Close the session.
    fn close(&mut self, ctx: &Context) -> impl Future<Output = Result<()>> + Send;
}

/// Establishes [`Connection`]s.
pub trait Dialer: Send + Sync {
    /// The connection type produced.
    type Connection: Connection;

    /// Dial, authenticate and negotiate a terminal.
    fn dial(&self, ctx: &Context) -> impl Future<Output = Result<Self::Connection>> + Send;
}
