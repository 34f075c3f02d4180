//! ackwire Client Binary
//!
//! Runs several concurrent sessions against a server, each sending a fixed
//! number of Submits with random code-name payloads.

use std::thread;

use ackwire::payload::RandomWords;
use ackwire::{ClientSession, Config};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// ackwire Client
#[derive(Parser, Debug)]
#[command(name = "ackwire-client")]
#[command(about = "Sends paced Submit requests and reports their acks")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Number of concurrent sessions
    #[arg(short = 'n', long, default_value = "5")]
    sessions: usize,

    /// Requests sent by each session
    #[arg(short, long, default_value = "10")]
    requests: u64,

    /// Pause between requests in milliseconds
    #[arg(short, long, default_value = "1000")]
    pacing_ms: u64,

    /// Receiver read deadline in milliseconds
    #[arg(short = 't', long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Seed for payload generation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ackwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .server_addr(&args.server)
        .concurrency(args.sessions)
        .request_count(args.requests)
        .pacing_interval_ms(args.pacing_ms)
        .read_timeout_ms(args.read_timeout_ms)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(2);
    }

    let failures = thread::scope(|scope| {
        let handles: Vec<_> = (1..=config.concurrency)
            .map(|session| {
                let config = &config;
                let seed = args.seed;
                scope.spawn(move || {
                    let payloads = match seed {
                        Some(seed) => RandomWords::seeded(seed.wrapping_add(session as u64), 4),
                        None => RandomWords::default(),
                    };
                    ClientSession::connect(config, session)
                        .and_then(|s| s.with_payloads(payloads).run())
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(i, handle)| match handle.join() {
                Ok(Ok(report)) => {
                    tracing::debug!("Session {} finished: {:?}", i + 1, report);
                    false
                }
                Ok(Err(e)) => {
                    tracing::error!("Session {} failed: {}", i + 1, e);
                    true
                }
                Err(_) => {
                    tracing::error!("Session {} panicked", i + 1);
                    true
                }
            })
            .filter(|&failed| failed)
            .count()
    });

    if failures > 0 {
        tracing::error!("{} of {} sessions failed", failures, config.concurrency);
        std::process::exit(1);
    }
}
