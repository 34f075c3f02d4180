//! Network Module
//!
//! TCP server and client session handling.
//!
//! ## Architecture
//! - Server: single acceptor thread, one thread per connection
//! - Client: one sender and one receiver thread per session, stopped by a
//!   cancel/acknowledge handshake

mod server;
mod connection;
mod session;
mod shutdown;

pub use server::{Server, ShutdownHandle};
pub use connection::{handle_packet, Connection};
pub use session::{AckObserver, ClientSession, LogObserver, SessionReport, SessionState};
pub use shutdown::{shutdown_pair, ShutdownListener, ShutdownTrigger};
