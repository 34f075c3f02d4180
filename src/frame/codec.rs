//! Frame codec
//!
//! Length-prefixed encoding and decoding over any `Read`/`Write` stream.

use std::io::{ErrorKind, Read, Write};

use bytes::{Bytes, BytesMut};

use crate::error::{AckwireError, Result};

/// Size of the big-endian length prefix
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Default maximum payload size (16 MB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// The body of a frame, before packet-level parsing
pub type FramePayload = Bytes;

/// Stateless length-prefix codec
///
/// The only state is the payload size limit, which guards the decoder
/// against allocating whatever a corrupt length field claims.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }
}

impl FrameCodec {
    pub fn new(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    /// Write `payload` as one frame and flush the sink
    ///
    /// A sink that stops accepting payload bytes without reporting an error
    /// yields `ShortWrite`; any reported failure is returned as `Io`.
    pub fn encode<W: Write>(&self, sink: &mut W, payload: &[u8]) -> Result<()> {
        let total_len = u32::try_from(payload.len() + LENGTH_FIELD_SIZE).map_err(|_| {
            AckwireError::FrameTooLarge {
                len: payload.len(),
                max: u32::MAX as usize - LENGTH_FIELD_SIZE,
            }
        })?;

        sink.write_all(&total_len.to_be_bytes())?;

        match sink.write_all(payload) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::WriteZero => {
                return Err(AckwireError::ShortWrite {
                    expected: payload.len(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        // A buffered sink only pushes small payloads through on flush
        match sink.flush() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::WriteZero => Err(AckwireError::ShortWrite {
                expected: payload.len(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Read exactly one frame and return its payload
    ///
    /// - End of stream before the first byte: `Io(UnexpectedEof)`
    /// - End of stream inside the frame: `ShortRead`
    /// - Read deadline before the first byte: `Timeout`
    ///
    /// A deadline hit inside a frame is retried, so a stalled peer can hold
    /// this call indefinitely. Use [`FrameCodec::decode_until`] when the
    /// caller must be able to give up.
    pub fn decode<R: Read>(&self, source: &mut R) -> Result<FramePayload> {
        self.decode_until(source, || false)
    }

    /// Like `decode`, but `cancelled` is consulted on every read deadline
    /// inside a frame. Once it returns true the partial frame is abandoned
    /// with `Cancelled`; the stream position is lost, so the connection must
    /// not be read from again.
    pub fn decode_until<R, F>(&self, source: &mut R, mut cancelled: F) -> Result<FramePayload>
    where
        R: Read,
        F: FnMut() -> bool,
    {
        let mut header = [0u8; LENGTH_FIELD_SIZE];
        let n = read_full(source, &mut header, false, &mut cancelled)?;
        if n == 0 {
            return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into());
        }
        if n < LENGTH_FIELD_SIZE {
            return Err(AckwireError::ShortRead {
                expected: LENGTH_FIELD_SIZE,
                actual: n,
            });
        }

        let total_len = u32::from_be_bytes(header);
        if (total_len as usize) < LENGTH_FIELD_SIZE {
            return Err(AckwireError::InvalidFrameLength(total_len));
        }

        let payload_len = total_len as usize - LENGTH_FIELD_SIZE;
        if payload_len > self.max_frame_size {
            return Err(AckwireError::FrameTooLarge {
                len: payload_len,
                max: self.max_frame_size,
            });
        }

        let mut payload = BytesMut::zeroed(payload_len);
        let n = read_full(source, &mut payload, true, &mut cancelled)?;
        if n < payload_len {
            return Err(AckwireError::ShortRead {
                expected: payload_len,
                actual: n,
            });
        }

        Ok(payload.freeze())
    }
}

/// Fill `buf` from `source`, stopping early only at end of stream
///
/// Returns the number of bytes read. A read deadline is reported as
/// `Timeout` only while nothing of the current frame has been consumed;
/// once a frame is in progress the read is retried so the stream never
/// loses its position inside a frame, unless `cancelled` says to give up.
fn read_full<R, F>(
    source: &mut R,
    buf: &mut [u8],
    mut in_frame: bool,
    cancelled: &mut F,
) -> Result<usize>
where
    R: Read,
    F: FnMut() -> bool,
{
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                in_frame = true;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            // Unix reports SO_RCVTIMEO expiry as WouldBlock, Windows as TimedOut
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                if !in_frame {
                    return Err(AckwireError::Timeout);
                }
                if cancelled() {
                    return Err(AckwireError::Cancelled { consumed: filled });
                }
                tracing::trace!("Read deadline hit mid-frame after {} bytes, retrying", filled);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
