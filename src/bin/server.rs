//! ackwire Server Binary
//!
//! Starts the TCP server that acknowledges every Submit it receives.

use ackwire::{Config, Server};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// ackwire Server
#[derive(Parser, Debug)]
#[command(name = "ackwire-server")]
#[command(about = "Acknowledges length-prefixed Submit packets over TCP")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Largest accepted frame payload in bytes
    #[arg(short, long, default_value_t = ackwire::frame::DEFAULT_MAX_FRAME_SIZE)]
    max_frame_size: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ackwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("ackwire server v{}", ackwire::VERSION);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_frame_size(args.max_frame_size)
        .build();

    let server = match Server::bind(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
