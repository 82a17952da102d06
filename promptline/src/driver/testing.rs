//! Scripted devices for driver tests.

use std::sync::Mutex;

use tokio_test::io::{Builder, Mock};

use super::DeviceSession;
use crate::context::Context;
use crate::error::{Result, TransportError};
use crate::platform::vendors;
use crate::transport::{Dialer, StreamConnection};

/// MD-CLI prompt line.
pub(crate) const PROMPT: &str = "A:admin@router# ";

/// Banner and first prompt after login.
pub(crate) const LOGIN: &str = "\r\nWelcome to SR OS\r\n\r\n[/]\r\nA:admin@router# ";

/// Hands out one scripted stream, then refuses to dial.
pub(crate) struct MockDialer {
    stream: Mutex<Option<Mock>>,
}

impl MockDialer {
    pub(crate) fn new(mock: Mock) -> Self {
        Self {
            stream: Mutex::new(Some(mock)),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            stream: Mutex::new(None),
        }
    }
}

impl Dialer for MockDialer {
    type Connection = StreamConnection<Mock>;

    async fn dial(&self, _ctx: &Context) -> Result<Self::Connection> {
        let stream = self.stream.lock().unwrap().take();
        stream.map(StreamConnection::new).ok_or_else(|| {
            TransportError::ConnectionFailed {
                target: "mock".to_string(),
                message: "no scripted stream left".to_string(),
            }
            .into()
        })
    }
}

/// Script the login banner and the SR OS on_open exchange.
pub(crate) fn login(script: &mut Builder) {
    script.read(LOGIN.as_bytes());
    exchange(script, "environment more false", "");
}

/// Script one command at the `[/]` context.
pub(crate) fn exchange(script: &mut Builder, command: &str, body: &str) {
    exchange_in(script, "[/]", command, body);
}

/// Script one command whose reply ends with `context` above the prompt.
///
/// An empty `body` yields a reply with only the separator line.
pub(crate) fn exchange_in(script: &mut Builder, context: &str, command: &str, body: &str) {
    let reply = format!("{command}\r\n{body}\r\n{context}\r\n{PROMPT}");
    script
        .write(format!("{command}\n").as_bytes())
        .read(reply.as_bytes());
}

/// An undialed SR OS session over `mock`.
pub(crate) fn sros_session(mock: Mock) -> DeviceSession<MockDialer> {
    DeviceSession::new(MockDialer::new(mock), vendors::nokia_sros::platform())
}

/// Route `log` output through the test harness when `RUST_LOG` is set.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
