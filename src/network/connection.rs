//! Connection Handler
//!
//! Serves a single client connection on the server side.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use bytes::Bytes;

use crate::error::{AckwireError, Result};
use crate::frame::FrameCodec;
use crate::packet::{decode_packet, encode_packet, Packet, SubmitAck};

/// Handles a single client connection
///
/// The connection is Open while `handle` loops and Closed once it returns.
/// Any failure closes it: after a bad frame or packet the stream position
/// can no longer be trusted, so there is no error response.
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Frame codec shared by both directions
    codec: FrameCodec,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O. Reads block without a deadline.
    pub fn new(stream: TcpStream, codec: FrameCodec) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            codec,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads frames in a loop and answers every Submit with a SubmitAck.
    /// Returns `Ok` when the client disconnects and `Err` on any protocol or
    /// transport failure.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let payload = match self.codec.decode(&mut self.reader) {
                Ok(payload) => payload,
                Err(e) if e.is_disconnect() => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading frame from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            let ack = match handle_packet(&payload) {
                Ok(ack) => ack,
                Err(e) => {
                    tracing::warn!("Dropping connection {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            if let Err(e) = self.codec.encode(&mut self.writer, &ack) {
                // The client going away before reading its ack is not a server error
                if e.is_disconnect() {
                    tracing::debug!(
                        "Client {} disconnected before ack could be sent: {}",
                        self.peer_addr,
                        e
                    );
                    return Ok(());
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }
}

/// Turn one inbound frame payload into the encoded ack payload
///
/// Only Submit is a valid request. Anything else, including the reserved
/// commands that decode to nothing, is an error.
pub fn handle_packet(payload: &[u8]) -> Result<Bytes> {
    match decode_packet(payload)? {
        Some(Packet::Submit(submit)) => {
            tracing::trace!(
                "Received submit: id = {}, payload = {}",
                submit.id_str(),
                String::from_utf8_lossy(&submit.payload)
            );
            encode_packet(&SubmitAck::ok(&submit).into())
        }
        Some(other) => Err(AckwireError::UnexpectedPacket(format!(
            "server cannot accept {:?}",
            other.command_id()
        ))),
        None => Err(AckwireError::UnexpectedPacket(
            "reserved command has no handler".to_string(),
        )),
    }
}
