//! Frame Codec Tests
//!
//! These tests verify:
//! - Length header counts itself
//! - Decode consumes exactly one frame
//! - Write and read failures surface as the right errors

use std::io::{self, Cursor, Read, Write};

use ackwire::frame::{FrameCodec, LENGTH_FIELD_SIZE};
use ackwire::AckwireError;

// =============================================================================
// Helper Types
// =============================================================================

/// Writer that fails on the Nth call to `write`
struct FailingWriter {
    inner: Vec<u8>,
    fail_on: usize,
    calls: usize,
}

impl FailingWriter {
    fn new(fail_on: usize) -> Self {
        Self {
            inner: Vec::new(),
            fail_on,
            calls: 0,
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls >= self.fail_on {
            return Err(io::Error::new(io::ErrorKind::Other, "write error"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that accepts the header and then stops taking bytes
struct StallingWriter {
    accepted: usize,
    limit: usize,
}

impl Write for StallingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.limit - self.accepted);
        self.accepted += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reader that fails on the Nth call to `read`
struct FailingReader<R> {
    inner: R,
    fail_on: usize,
    calls: usize,
}

impl<R: Read> Read for FailingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls >= self.fail_on {
            return Err(io::Error::new(io::ErrorKind::Other, "read error"));
        }
        self.inner.read(buf)
    }
}

fn encode(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    FrameCodec::default().encode(&mut out, payload).unwrap();
    out
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_hello_world() {
    let bytes = encode(b"hello world");

    assert_eq!(&bytes[..4], &15u32.to_be_bytes());
    assert_eq!(&bytes[4..], b"hello world");
}

#[test]
fn test_encode_empty_payload() {
    let bytes = encode(b"");
    assert_eq!(bytes, vec![0, 0, 0, 4]);
}

#[test]
fn test_header_is_payload_len_plus_four() {
    for n in [0usize, 1, 7, 255, 256, 65_536] {
        let payload = vec![0xAB; n];
        let bytes = encode(&payload);

        let header = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(header as usize, n + LENGTH_FIELD_SIZE);
        assert_eq!(bytes.len(), n + LENGTH_FIELD_SIZE);
    }
}

#[test]
fn test_encode_header_write_fails() {
    let mut writer = FailingWriter::new(1);
    let result = FrameCodec::default().encode(&mut writer, b"hello");
    assert!(matches!(result, Err(AckwireError::Io(_))));
}

#[test]
fn test_encode_payload_write_fails() {
    // First write (header) succeeds, second (payload) fails
    let mut writer = FailingWriter::new(2);
    let result = FrameCodec::default().encode(&mut writer, b"hello");
    assert!(matches!(result, Err(AckwireError::Io(_))));
    assert_eq!(writer.inner.len(), LENGTH_FIELD_SIZE);
}

#[test]
fn test_encode_short_write() {
    let mut writer = StallingWriter {
        accepted: 0,
        limit: LENGTH_FIELD_SIZE + 2,
    };
    let result = FrameCodec::default().encode(&mut writer, b"hello");
    assert!(matches!(
        result,
        Err(AckwireError::ShortWrite { expected: 5 })
    ));
}

#[test]
fn test_encode_short_write_through_buffer() {
    // Small frames sit in the buffer until flush, which is where the sink stalls
    let mut writer = io::BufWriter::new(StallingWriter {
        accepted: 0,
        limit: LENGTH_FIELD_SIZE + 2,
    });
    let result = FrameCodec::default().encode(&mut writer, b"hello");
    assert!(matches!(
        result,
        Err(AckwireError::ShortWrite { expected: 5 })
    ));
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_hello_world() {
    let data = [0x0, 0x0, 0x0, 0xf, b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', b'r', b'l', b'd'];
    let payload = FrameCodec::default().decode(&mut Cursor::new(&data[..])).unwrap();
    assert_eq!(&payload[..], b"hello world");
}

#[test]
fn test_decode_consumes_exactly_one_frame() {
    let mut stream = encode(b"first");
    stream.extend(encode(b""));
    stream.extend(encode(b"third"));

    let codec = FrameCodec::default();
    let mut cursor = Cursor::new(stream);

    assert_eq!(&codec.decode(&mut cursor).unwrap()[..], b"first");
    assert!(codec.decode(&mut cursor).unwrap().is_empty());
    assert_eq!(&codec.decode(&mut cursor).unwrap()[..], b"third");
    assert_eq!(cursor.position() as usize, cursor.get_ref().len());
}

#[test]
fn test_round_trip_binary_payload() {
    let payload: Vec<u8> = (0..=255).collect();
    let bytes = encode(&payload);
    let decoded = FrameCodec::default().decode(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(&decoded[..], &payload[..]);
}

#[test]
fn test_decode_header_read_fails() {
    let data = [0x0, 0x0, 0x0, 0x9, b'h', b'e', b'l', b'l', b'o'];
    let mut reader = FailingReader {
        inner: Cursor::new(&data[..]),
        fail_on: 1,
        calls: 0,
    };
    let result = FrameCodec::default().decode(&mut reader);
    assert!(matches!(result, Err(AckwireError::Io(_))));
}

#[test]
fn test_decode_payload_read_fails() {
    // Cursor serves the 4-byte header in one read; the payload read fails
    let data = [0x0, 0x0, 0x0, 0x9, b'h', b'e', b'l', b'l', b'o'];
    let mut reader = FailingReader {
        inner: Cursor::new(&data[..]),
        fail_on: 2,
        calls: 0,
    };
    let result = FrameCodec::default().decode(&mut reader);
    assert!(matches!(result, Err(AckwireError::Io(_))));
}

#[test]
fn test_decode_short_payload() {
    // Header promises 10 payload bytes, stream ends after 3
    let data = [0x0, 0x0, 0x0, 0xE, b'a', b'b', b'c'];
    let result = FrameCodec::default().decode(&mut Cursor::new(&data[..]));
    assert!(matches!(
        result,
        Err(AckwireError::ShortRead {
            expected: 10,
            actual: 3
        })
    ));
}

#[test]
fn test_decode_short_header() {
    let data = [0x0, 0x0];
    let result = FrameCodec::default().decode(&mut Cursor::new(&data[..]));
    assert!(matches!(
        result,
        Err(AckwireError::ShortRead {
            expected: 4,
            actual: 2
        })
    ));
}

#[test]
fn test_decode_clean_eof() {
    let result = FrameCodec::default().decode(&mut Cursor::new(Vec::<u8>::new()));
    let err = result.unwrap_err();
    assert!(err.is_disconnect());
}

#[test]
fn test_decode_length_below_header_size() {
    let data = [0x0, 0x0, 0x0, 0x3];
    let result = FrameCodec::default().decode(&mut Cursor::new(&data[..]));
    assert!(matches!(result, Err(AckwireError::InvalidFrameLength(3))));
}

#[test]
fn test_decode_frame_too_large() {
    let codec = FrameCodec::new(16);
    let data = 0xFFFF_FFFFu32.to_be_bytes();
    let result = codec.decode(&mut Cursor::new(&data[..]));
    assert!(matches!(
        result,
        Err(AckwireError::FrameTooLarge { max: 16, .. })
    ));

    // Exactly at the limit is fine
    let bytes = encode(&[7u8; 16]);
    assert_eq!(codec.decode(&mut Cursor::new(bytes)).unwrap().len(), 16);
}
