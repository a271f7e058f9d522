use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{decode_frame, RawFrame};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Bytes requested from the source per poll. Telemetry devices burst in
/// small batches; one frame is 7 bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Reads complete frames from any `Read` byte source.
///
/// Owns the accumulation buffer and performs one bounded read per poll.
/// Callers always get complete frames; partial frames and garbage stay
/// internal. Built for sources with a read timeout: a timed-out read is a
/// normal empty cycle, not an error.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    chunk: Vec<u8>,
}

impl<T: Read> FrameReader<T> {
    /// Create a frame reader with the default per-poll chunk size.
    pub fn new(inner: T) -> Self {
        Self::with_chunk_size(inner, DEFAULT_CHUNK_SIZE)
    }

    /// Create a frame reader requesting up to `chunk_size` bytes per poll.
    pub fn with_chunk_size(inner: T, chunk_size: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            chunk: vec![0u8; chunk_size.max(1)],
        }
    }

    /// Perform one bounded read, then return every complete frame
    /// buffered so far.
    ///
    /// An empty `Vec` is a normal quiet cycle (timeout or bytes that did
    /// not complete a frame). Returns `Err(FrameError::Disconnected)` on
    /// end of stream.
    pub fn poll_frames(&mut self) -> Result<Vec<RawFrame>> {
        match self.inner.read(&mut self.chunk) {
            Ok(0) => return Err(FrameError::Disconnected),
            Ok(n) => self.buf.extend_from_slice(&self.chunk[..n]),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) => {}
            Err(err) => return Err(FrameError::Io(err)),
        }

        let mut frames = Vec::new();
        while let Some(frame) = decode_frame(&mut self.buf) {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Borrow the underlying byte source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying byte source.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner byte source.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::encode_frame;

    fn drain_source(reader: &mut FrameReader<impl Read>) -> Vec<RawFrame> {
        let mut frames = Vec::new();
        loop {
            match reader.poll_frames() {
                Ok(batch) => frames.extend(batch),
                Err(FrameError::Disconnected) => return frames,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }

    #[test]
    fn reads_frames_from_single_chunk() {
        let mut wire = BytesMut::new();
        encode_frame(0x01, 0x0010, [0, 0], &mut wire);
        encode_frame(0x02, 0x0020, [0, 0], &mut wire);

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        let frames = reader.poll_frames().unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].code(), 0x01);
        assert_eq!(frames[1].code(), 0x02);
    }

    #[test]
    fn byte_by_byte_delivery_yields_same_frames() {
        let mut wire = BytesMut::new();
        wire.extend_from_slice(&[0xAA, 0xFC]);
        encode_frame(0x01, 1, [0, 0], &mut wire);
        encode_frame(0x08, 0x8000, [b'v', 0], &mut wire);

        let mut bulk = FrameReader::new(Cursor::new(wire.to_vec()));
        let expected = drain_source(&mut bulk);

        let mut trickle = FrameReader::new(ByteByByteReader {
            bytes: wire.to_vec(),
            pos: 0,
        });
        let got = drain_source(&mut trickle);

        assert_eq!(got, expected);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn timed_out_read_is_an_empty_cycle() {
        let mut wire = BytesMut::new();
        encode_frame(0x05, 80, [0, 0], &mut wire);

        let mut reader = FrameReader::new(TimeoutThenData {
            fired: false,
            bytes: wire.to_vec(),
            pos: 0,
        });

        let quiet = reader.poll_frames().unwrap();
        assert!(quiet.is_empty());

        let frames = reader.poll_frames().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].code(), 0x05);
    }

    #[test]
    fn eof_reports_disconnected() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(matches!(
            reader.poll_frames(),
            Err(FrameError::Disconnected)
        ));
    }

    #[test]
    fn partial_frame_held_across_polls() {
        let mut wire = BytesMut::new();
        encode_frame(0x03, 48, [0, 0], &mut wire);
        let bytes = wire.to_vec();

        let mut reader = FrameReader::new(SplitReader {
            first: bytes[..4].to_vec(),
            second: bytes[4..].to_vec(),
            call: 0,
        });

        assert!(reader.poll_frames().unwrap().is_empty());
        let frames = reader.poll_frames().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].raw_value(), 48);
    }

    #[test]
    fn io_errors_propagate() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(ErrorKind::BrokenPipe))
            }
        }

        let mut reader = FrameReader::new(Broken);
        assert!(matches!(
            reader.poll_frames(),
            Err(FrameError::Io(e)) if e.kind() == ErrorKind::BrokenPipe
        ));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct TimeoutThenData {
        fired: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for TimeoutThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.fired {
                self.fired = true;
                return Err(std::io::Error::from(ErrorKind::TimedOut));
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            if n == 0 {
                return Ok(0);
            }
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct SplitReader {
        first: Vec<u8>,
        second: Vec<u8>,
        call: usize,
    }

    impl Read for SplitReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.call += 1;
            let src = match self.call {
                1 => &self.first,
                2 => &self.second,
                _ => return Ok(0),
            };
            let n = src.len().min(buf.len());
            buf[..n].copy_from_slice(&src[..n]);
            Ok(n)
        }
    }
}
