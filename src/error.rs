//! Error types for ackwire
//!
//! Provides a unified error type for framing, packet and session operations.

use std::io::ErrorKind;

use thiserror::Error;

/// Result type alias using AckwireError
pub type Result<T> = std::result::Result<T, AckwireError>;

/// Unified error type for ackwire operations
#[derive(Debug, Error)]
pub enum AckwireError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The read deadline expired before the first byte of a frame arrived
    #[error("Read timed out")]
    Timeout,

    /// A partially read frame was abandoned at the caller's request
    #[error("Read cancelled mid-frame after {consumed} bytes")]
    Cancelled { consumed: usize },

    // -------------------------------------------------------------------------
    // Frame Errors
    // -------------------------------------------------------------------------
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("Short write: {expected} payload bytes were not fully written")]
    ShortWrite { expected: usize },

    #[error("Invalid frame length: {0} (must count its own 4-byte header)")]
    InvalidFrameLength(u32),

    #[error("Frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Packet Errors
    // -------------------------------------------------------------------------
    #[error("Empty packet")]
    EmptyPacket,

    #[error("Unknown command: 0x{0:02x}")]
    UnknownCommand(u8),

    #[error("{packet} body too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        packet: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid ID: {0} bytes")]
    InvalidId(usize),

    #[error("Invalid result code: {0} (must be 0 or 1)")]
    InvalidResult(u8),

    #[error("Unexpected packet: {0}")]
    UnexpectedPacket(String),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Session aborted: receiver exited without acknowledging shutdown")]
    SessionAborted,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AckwireError {
    /// True for the transient read-deadline error
    pub fn is_timeout(&self) -> bool {
        matches!(self, AckwireError::Timeout)
    }

    /// True when the peer went away (clean EOF, reset, abort, broken pipe)
    pub fn is_disconnect(&self) -> bool {
        match self {
            AckwireError::Io(e) => matches!(
                e.kind(),
                ErrorKind::UnexpectedEof
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }

    /// True for malformed packet input
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            AckwireError::EmptyPacket
                | AckwireError::UnknownCommand(_)
                | AckwireError::TooShort { .. }
                | AckwireError::InvalidId(_)
                | AckwireError::InvalidResult(_)
        )
    }
}
