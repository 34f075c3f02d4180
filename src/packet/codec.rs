//! Packet codec
//!
//! Encoding and decoding of tagged packets, plus stream helpers that run a
//! packet through the frame layer.
//!
//! ## Wire Format
//! ```text
//! ┌────────────────┬──────────┬──────────────────────────┐
//! │ Total Len (4)  │ Cmd (1)  │  Body (Total Len - 5)    │
//! └────────────────┴──────────┴──────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::{CommandId, Packet, Submit, SubmitAck, ID_LEN};
use crate::error::{AckwireError, Result};
use crate::frame::FrameCodec;

// =============================================================================
// Packet Encoding/Decoding
// =============================================================================

/// Encode a packet to bytes
///
/// Format: cmd (1) + body
pub fn encode_packet(packet: &Packet) -> Result<Bytes> {
    let body = match packet {
        Packet::Submit(submit) => submit.encode_body()?,
        Packet::SubmitAck(ack) => ack.encode_body()?,
    };

    let mut bytes = BytesMut::with_capacity(1 + body.len());
    bytes.put_u8(packet.command_id().into());
    bytes.put_slice(&body);
    Ok(bytes.freeze())
}

/// Decode a packet from bytes
///
/// Reserved commands (Conn, ConnAck) carry no defined body and decode to
/// `Ok(None)`.
pub fn decode_packet(bytes: &[u8]) -> Result<Option<Packet>> {
    let (&cmd, body) = bytes.split_first().ok_or(AckwireError::EmptyPacket)?;

    match CommandId::try_from(cmd)? {
        CommandId::Conn | CommandId::ConnAck => Ok(None),
        CommandId::Submit => Submit::decode_body(body).map(|s| Some(Packet::Submit(s))),
        CommandId::SubmitAck => SubmitAck::decode_body(body).map(|a| Some(Packet::SubmitAck(a))),
    }
}

/// Render a request counter as an 8-digit, zero-padded decimal ID
pub fn format_id(counter: u64) -> String {
    format!("{:0width$}", counter, width = ID_LEN)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one frame from a stream and decode the packet inside it
pub fn read_packet<R: Read>(codec: &FrameCodec, reader: &mut R) -> Result<Option<Packet>> {
    let payload = codec.decode(reader)?;
    decode_packet(&payload)
}

/// Encode a packet and write it to a stream as one frame
pub fn write_packet<W: Write>(codec: &FrameCodec, writer: &mut W, packet: &Packet) -> Result<()> {
    let bytes = encode_packet(packet)?;
    codec.encode(writer, &bytes)
}
