//! Configuration for ackwire
//!
//! Centralized configuration with sensible defaults. Everything the server
//! and the client sessions need is injected from here at construction.

use std::time::Duration;

use crate::error::{AckwireError, Result};
use crate::frame::{DEFAULT_MAX_FRAME_SIZE, LENGTH_FIELD_SIZE};
use crate::packet::{ID_LEN, SUBMIT_ACK_BODY_LEN};

/// Main configuration for ackwire servers and clients
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address for the server
    pub listen_addr: String,

    /// Address client sessions connect to
    pub server_addr: String,

    /// How often the acceptor wakes up to check for shutdown (milliseconds)
    pub accept_poll_ms: u64,

    // -------------------------------------------------------------------------
    // Framing Configuration
    // -------------------------------------------------------------------------
    /// Largest frame payload accepted by the decoder (in bytes)
    pub max_frame_size: usize,

    // -------------------------------------------------------------------------
    // Client Session Configuration
    // -------------------------------------------------------------------------
    /// Number of Submit requests each session sends before shutting down
    pub request_count: u64,

    /// Sleep between two consecutive requests (milliseconds)
    pub pacing_interval_ms: u64,

    /// Receiver read deadline (milliseconds). Upper-bounds shutdown latency.
    pub read_timeout_ms: u64,

    /// Number of concurrent sessions the client binary runs
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            server_addr: "127.0.0.1:8080".to_string(),
            accept_poll_ms: 50,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            request_count: 10,
            pacing_interval_ms: 1000,
            read_timeout_ms: 5000,
            concurrency: 5,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn accept_poll(&self) -> Duration {
        Duration::from_millis(self.accept_poll_ms)
    }

    /// Reject settings the server or the sessions cannot run with
    pub fn validate(&self) -> Result<()> {
        // A zero socket timeout means "block forever" and would make the
        // receiver unable to observe shutdown.
        if self.read_timeout_ms == 0 {
            return Err(AckwireError::Config(
                "read_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.accept_poll_ms == 0 {
            return Err(AckwireError::Config(
                "accept_poll_ms must be greater than zero".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(AckwireError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        // Smallest packet on the wire is a SubmitAck: command byte + body
        let min_frame = 1 + SUBMIT_ACK_BODY_LEN;
        if self.max_frame_size < min_frame {
            return Err(AckwireError::Config(format!(
                "max_frame_size must be at least {} bytes, got {}",
                min_frame, self.max_frame_size
            )));
        }
        if self.max_frame_size > u32::MAX as usize - LENGTH_FIELD_SIZE {
            return Err(AckwireError::Config(format!(
                "max_frame_size {} does not fit the 4-byte length field",
                self.max_frame_size
            )));
        }

        // IDs are 8 decimal digits, so the counter cannot go past 99_999_999
        let max_requests = 10u64.pow(ID_LEN as u32) - 1;
        if self.request_count > max_requests {
            return Err(AckwireError::Config(format!(
                "request_count {} exceeds the {}-digit ID space",
                self.request_count, ID_LEN
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the address sessions connect to
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the acceptor shutdown poll interval (in milliseconds)
    pub fn accept_poll_ms(mut self, ms: u64) -> Self {
        self.config.accept_poll_ms = ms;
        self
    }

    /// Set the maximum frame payload size (in bytes)
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    /// Set the number of requests per session
    pub fn request_count(mut self, count: u64) -> Self {
        self.config.request_count = count;
        self
    }

    /// Set the pause between requests (in milliseconds)
    pub fn pacing_interval_ms(mut self, ms: u64) -> Self {
        self.config.pacing_interval_ms = ms;
        self
    }

    /// Set the receiver read deadline (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the number of concurrent client sessions
    pub fn concurrency(mut self, count: usize) -> Self {
        self.config.concurrency = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
