//! Packet Module
//!
//! Typed messages carried inside frame payloads.
//!
//! ## Packet Format
//! ```text
//! ┌──────────┬─────────────────────────────────────┐
//! │ Cmd (1)  │               Body                  │
//! └──────────┴─────────────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: CONN       - reserved, decodes to nothing
//! - 0x02: SUBMIT     - Body: id (8) + payload
//! - 0x81: CONN_ACK   - reserved, decodes to nothing
//! - 0x82: SUBMIT_ACK - Body: id (8) + result (1)
//!
//! ### Result Codes
//! - 0x00: OK
//! - 0x01: ERROR

mod command;
mod message;
mod codec;

pub use command::CommandId;
pub use message::{Packet, Submit, SubmitAck, ID_LEN, RESULT_ERROR, RESULT_OK, SUBMIT_ACK_BODY_LEN};
pub use codec::{decode_packet, encode_packet, format_id, read_packet, write_packet};
