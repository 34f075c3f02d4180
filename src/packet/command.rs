//! Command identifiers
//!
//! The one-byte tag in front of every packet body.

use crate::error::AckwireError;

/// Command tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandId {
    Conn = 0x01,
    Submit = 0x02,
    ConnAck = 0x81,
    SubmitAck = 0x82,
}

impl From<CommandId> for u8 {
    fn from(id: CommandId) -> u8 {
        id as u8
    }
}

impl TryFrom<u8> for CommandId {
    type Error = AckwireError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x01 => Ok(CommandId::Conn),
            0x02 => Ok(CommandId::Submit),
            0x81 => Ok(CommandId::ConnAck),
            0x82 => Ok(CommandId::SubmitAck),
            other => Err(AckwireError::UnknownCommand(other)),
        }
    }
}
