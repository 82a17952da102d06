//! Nokia SR OS over a raw TCP stream
//!
//! This example drives an SR OS CLI that is reachable as a plain byte
//! stream: a console server port, or a `socat` bridge to an already
//! authenticated session. It runs a few operational commands and, if asked,
//! applies a configuration transaction.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example tcp_sros -- --host console1 --port 7001
//! ```
//!
//! Apply configuration lines (committed in exclusive edit mode):
//! ```bash
//! cargo run --example tcp_sros -- --host console1 --port 7001 \
//!     --set '/configure system location "lab rack 4"'
//! ```

use std::env;
use std::time::Duration;

use promptline::transport::Dialer;
use promptline::{Context, Driver, SessionBuilder, StreamConnection};
use tokio::net::TcpStream;

/// Dials a TCP endpoint that already presents a logged-in CLI.
struct TcpDialer {
    addr: String,
}

impl Dialer for TcpDialer {
    type Connection = StreamConnection<TcpStream>;

    async fn dial(&self, ctx: &Context) -> promptline::Result<Self::Connection> {
        let connect = TcpStream::connect(&self.addr);
        let stream = tokio::select! {
            reason = ctx.done() => {
                return Err(promptline::error::TransportError::Aborted(reason).into());
            }
            result = connect => result.map_err(|e| promptline::error::TransportError::ConnectionFailed {
                target: self.addr.clone(),
                message: e.to_string(),
            })?,
        };
        stream
            .set_nodelay(true)
            .map_err(promptline::error::TransportError::Io)?;
        Ok(StreamConnection::new(stream).with_line_ending("\r\n"))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("=== Promptline Nokia SR OS Example ===\n");
    println!("Connecting to {}:{}...", args.host, args.port);

    let dialer = TcpDialer {
        addr: format!("{}:{}", args.host, args.port),
    };
    let mut session = SessionBuilder::new(dialer)
        .platform("nokia_sros")
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    // The whole run gets one overall budget on top of the per-command timeout
    let ctx = Context::with_timeout(Duration::from_secs(args.timeout * 10));

    session.dial(&ctx).await?;
    println!("Connected!\n");

    for command in ["show version", "show system information", "show port"] {
        println!("Executing: {command}");
        match session.run(&ctx, command).await {
            Ok(output) => {
                let lines: Vec<&str> = output.lines().take(15).collect();
                println!("{}", lines.join("\n"));
                if output.lines().count() > 15 {
                    println!("... (truncated)");
                }
            }
            Err(e) if e.is_timeout() => eprintln!("Timed out: {e}"),
            Err(e) => eprintln!("Command failed: {e}"),
        }
        println!();
    }

    if !args.set.is_empty() {
        println!("--- Configuration ---\n");
        let commands: Vec<&str> = args.set.iter().map(String::as_str).collect();
        match session.configure(&ctx, &commands).await {
            Ok(output) => println!("Committed.\n{output}"),
            Err(e) => {
                eprintln!("Configuration failed: {e}");
                if let Some(output) = e.partial_output() {
                    eprintln!("Output before the failure:\n{output}");
                }
            }
        }
    }

    println!("Closing connection...");
    session.close(&ctx).await?;
    println!("Done!");

    Ok(())
}

/// Simple argument parser
struct Args {
    host: String,
    port: u16,
    timeout: u64,
    set: Vec<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 23u16;
        let mut timeout = 30u64;
        let mut set = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(23);
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--set" => {
                    i += 1;
                    if i < args.len() {
                        set.push(args[i].clone());
                    }
                }
                "--help" => {
                    println!("Usage: tcp_sros [--host HOST] [--port PORT] [--timeout SECS] [--set LINE]...");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            timeout,
            set,
        }
    }
}
