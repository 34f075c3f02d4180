//! Message definitions
//!
//! Submit requests and their acknowledgments.

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

use super::CommandId;
use crate::error::{AckwireError, Result};

/// Length of a correlation ID on the wire
pub const ID_LEN: usize = 8;

/// SubmitAck body: id (8) + result (1)
pub const SUBMIT_ACK_BODY_LEN: usize = ID_LEN + 1;

/// Result code for a successfully handled Submit
pub const RESULT_OK: u8 = 0;

/// Result code for a failed Submit
pub const RESULT_ERROR: u8 = 1;

/// A decoded packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Client request
    Submit(Submit),

    /// Server acknowledgment of a Submit
    SubmitAck(SubmitAck),
}

impl Packet {
    /// Get the command tag for this packet
    pub fn command_id(&self) -> CommandId {
        match self {
            Packet::Submit(_) => CommandId::Submit,
            Packet::SubmitAck(_) => CommandId::SubmitAck,
        }
    }
}

impl From<Submit> for Packet {
    fn from(submit: Submit) -> Self {
        Packet::Submit(submit)
    }
}

impl From<SubmitAck> for Packet {
    fn from(ack: SubmitAck) -> Self {
        Packet::SubmitAck(ack)
    }
}

/// A request carrying a correlation ID and an opaque payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submit {
    /// Correlation ID, echoed back in the SubmitAck
    pub id: Bytes,

    /// Opaque payload, may be empty
    pub payload: Bytes,
}

impl Submit {
    pub fn new(id: impl Into<Bytes>, payload: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// The ID rendered for logs
    pub fn id_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.id)
    }

    /// Encode the body: id (8) + payload
    pub fn encode_body(&self) -> Result<Bytes> {
        if self.id.len() != ID_LEN {
            return Err(AckwireError::InvalidId(self.id.len()));
        }

        let mut body = BytesMut::with_capacity(ID_LEN + self.payload.len());
        body.put_slice(&self.id);
        body.put_slice(&self.payload);
        Ok(body.freeze())
    }

    /// Decode a body; everything past the ID is payload
    pub fn decode_body(body: &[u8]) -> Result<Self> {
        if body.len() < ID_LEN {
            return Err(AckwireError::TooShort {
                packet: "Submit",
                expected: ID_LEN,
                actual: body.len(),
            });
        }

        Ok(Self {
            id: Bytes::copy_from_slice(&body[..ID_LEN]),
            payload: Bytes::copy_from_slice(&body[ID_LEN..]),
        })
    }
}

/// The server's answer to a Submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAck {
    /// ID of the Submit being answered
    pub id: Bytes,

    /// 0 = success, 1 = error
    pub result: u8,
}

impl SubmitAck {
    pub fn new(id: impl Into<Bytes>, result: u8) -> Self {
        Self {
            id: id.into(),
            result,
        }
    }

    /// Build a success acknowledgment for `submit`
    pub fn ok(submit: &Submit) -> Self {
        Self {
            id: submit.id.clone(),
            result: RESULT_OK,
        }
    }

    /// The ID rendered for logs
    pub fn id_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.id)
    }

    /// Encode the body: id (8) + result (1)
    ///
    /// IDs longer than 8 bytes are accepted and truncated.
    pub fn encode_body(&self) -> Result<Bytes> {
        if self.id.len() < ID_LEN {
            return Err(AckwireError::InvalidId(self.id.len()));
        }
        if self.result != RESULT_OK && self.result != RESULT_ERROR {
            return Err(AckwireError::InvalidResult(self.result));
        }

        let mut body = BytesMut::with_capacity(SUBMIT_ACK_BODY_LEN);
        body.put_slice(&self.id[..ID_LEN]);
        body.put_u8(self.result);
        Ok(body.freeze())
    }

    /// Decode a body. The result byte is taken as-is.
    pub fn decode_body(body: &[u8]) -> Result<Self> {
        if body.len() < SUBMIT_ACK_BODY_LEN {
            return Err(AckwireError::TooShort {
                packet: "SubmitAck",
                expected: SUBMIT_ACK_BODY_LEN,
                actual: body.len(),
            });
        }

        Ok(Self {
            id: Bytes::copy_from_slice(&body[..ID_LEN]),
            result: body[ID_LEN],
        })
    }
}
