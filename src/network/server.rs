//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::error::Result;
use crate::frame::FrameCodec;

use super::Connection;

/// TCP server for ackwire
///
/// Connections are independent: one thread each, no shared state, no limit
/// on how many are open at once.
pub struct Server {
    config: Config,
    listener: TcpListener,
    codec: FrameCodec,
    shutdown: Arc<AtomicBool>,
}

/// Cloneable handle that stops a running server's accept loop
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the acceptor to stop. Connections already being served run on.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Server {
    /// Bind the listener described by `config`
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking accept so the loop can notice shutdown
        listener.set_nonblocking(true)?;

        let codec = FrameCodec::new(config.max_frame_size);

        Ok(Self {
            config,
            listener,
            codec,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Run the accept loop (blocking until shutdown or a listener failure)
    ///
    /// A connection that cannot be set up (socket mode, thread spawn) is
    /// logged and dropped; the acceptor keeps going.
    pub fn run(&self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);

        while !self.shutdown.load(Ordering::Acquire) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::trace!("Accepted connection from {}", addr);
                    // Only listener failures end the loop
                    if let Err(e) = self.spawn_connection(stream, addr) {
                        tracing::warn!("Dropping connection from {}: {}", addr, e);
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(self.config.accept_poll());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::error!("Error accepting connection: {}", e);
                    return Err(e.into());
                }
            }
        }

        tracing::info!("Server shutting down");
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, addr: SocketAddr) -> Result<()> {
        // Accepted sockets inherit non-blocking mode on some platforms
        stream.set_nonblocking(false)?;

        let codec = self.codec;
        thread::Builder::new()
            .name(format!("conn-{}", addr))
            .spawn(move || {
                let result = Connection::new(stream, codec).and_then(|mut conn| conn.handle());
                if let Err(e) = result {
                    tracing::debug!("Connection {} closed with error: {}", addr, e);
                }
            })?;

        Ok(())
    }
}
