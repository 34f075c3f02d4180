//! Frame Module
//!
//! Turns an unbounded byte stream into discrete, opaque payloads.
//!
//! ## Frame Format
//! ```text
//! ┌────────────────────┬─────────────────────────────┐
//! │ Total Len (4, BE)  │      Payload (Len - 4)      │
//! └────────────────────┴─────────────────────────────┘
//! ```
//!
//! The length field counts itself, so an empty payload is encoded as
//! `00 00 00 04`. The framing layer knows nothing about what the payload
//! contains; that is the packet layer's job.

mod codec;

pub use codec::{FrameCodec, FramePayload, DEFAULT_MAX_FRAME_SIZE, LENGTH_FIELD_SIZE};
