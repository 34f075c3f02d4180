//! # ackwire
//!
//! A minimal binary protocol for correlated request/acknowledgment messages
//! over a persistent TCP connection:
//! - Length-prefixed framing over any byte stream
//! - Command-tagged packets (Submit / SubmitAck)
//! - Thread-per-connection server
//! - Client sessions with a concurrent sender/receiver pair and a race-free
//!   shutdown handshake
//!
//! ## Architecture Overview
//!
//! ```text
//!  ClientSession                                   Server
//! ┌──────────────┐                         ┌──────────────────────┐
//! │ sender  ─────┼── Submit ──────────────▶│ Connection (thread)  │
//! │              │                         │  decode → ack →      │
//! │ receiver ◀───┼────────────── SubmitAck ┼─ encode              │
//! └──────┬───────┘                         └──────────────────────┘
//!        │ both directions:
//!        ▼
//!  ┌─────────────┐     ┌─────────────┐
//!  │   Packet    │ ──▶ │    Frame    │ ──▶ socket
//!  │ (cmd + body)│     │ (len + data)│
//!  └─────────────┘     └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod frame;
pub mod packet;
pub mod payload;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AckwireError, Result};
pub use config::Config;
pub use frame::FrameCodec;
pub use packet::{Packet, Submit, SubmitAck};
pub use network::{ClientSession, Server};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ackwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
