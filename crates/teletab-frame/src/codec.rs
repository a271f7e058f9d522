use bytes::{Buf, BufMut, BytesMut};
use tracing::trace;

/// Total frame size on the wire.
pub const FRAME_SIZE: usize = 7;

/// First marker byte delimiting a frame.
pub const MARKER: u8 = 0xFC;

/// Second marker byte: the frame kind. Only sample frames exist today.
pub const FRAME_KIND_SAMPLE: u8 = b'S';

/// A raw telemetry frame, exactly as its 7 bytes appeared on the wire.
///
/// Wire format:
/// ```text
/// ┌────────┬────────┬────────┬─────────────────┬────────┬────────┐
/// │ 0xFC   │ 'S'    │ code   │ value (2B BE)   │ extra1 │ extra2 │
/// └────────┴────────┴────────┴─────────────────┴────────┴────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; FRAME_SIZE],
}

impl RawFrame {
    /// Wrap 7 wire bytes without validation.
    pub fn from_bytes(bytes: [u8; FRAME_SIZE]) -> Self {
        Self { bytes }
    }

    /// The marker byte at offset 0.
    pub fn marker(&self) -> u8 {
        self.bytes[0]
    }

    /// The frame kind byte at offset 1.
    pub fn kind(&self) -> u8 {
        self.bytes[1]
    }

    /// The raw indicator code at offset 2.
    pub fn code(&self) -> u8 {
        self.bytes[2]
    }

    /// The big-endian 16-bit value field at offsets 3-4.
    pub fn raw_value(&self) -> u16 {
        u16::from_be_bytes([self.bytes[3], self.bytes[4]])
    }

    /// The first trailing byte (symbol substitute for high-code frames).
    pub fn extra1(&self) -> u8 {
        self.bytes[5]
    }

    /// The second trailing byte.
    pub fn extra2(&self) -> u8 {
        self.bytes[6]
    }

    /// The underlying wire bytes.
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }
}

/// Encode a frame into the wire format. Used by tests and replay tooling;
/// the live path only decodes.
pub fn encode_frame(code: u8, value: u16, extras: [u8; 2], dst: &mut BytesMut) {
    dst.reserve(FRAME_SIZE);
    dst.put_u8(MARKER);
    dst.put_u8(FRAME_KIND_SAMPLE);
    dst.put_u8(code);
    dst.put_u16(value);
    dst.put_slice(&extras);
}

/// Decode the next frame from a buffer, resynchronizing past garbage.
///
/// Returns `None` when the buffer holds no complete frame yet. On
/// success, consumes the frame bytes from the buffer; call again, since a
/// second marker may immediately follow.
///
/// Resynchronization policy:
/// - Bytes ahead of the first `0xFC 'S'` pair are discarded.
/// - A lone `0xFC` not followed by `'S'` is discarded by itself; the next
///   byte may begin a real marker.
/// - When no marker pair exists, everything but a trailing `0xFC` (whose
///   partner may not have arrived yet) is discarded.
pub fn decode_frame(src: &mut BytesMut) -> Option<RawFrame> {
    if src.len() < 2 {
        return None;
    }

    match find_marker(src) {
        Some(start) => {
            if start > 0 {
                trace!(dropped = start, "resynchronized past leading garbage");
                src.advance(start);
            }
            if src.len() < FRAME_SIZE {
                return None; // Partial frame; wait for more bytes
            }
            let mut bytes = [0u8; FRAME_SIZE];
            bytes.copy_from_slice(&src[..FRAME_SIZE]);
            src.advance(FRAME_SIZE);
            Some(RawFrame::from_bytes(bytes))
        }
        None => {
            let keep = usize::from(src[src.len() - 1] == MARKER);
            let dropped = src.len() - keep;
            if dropped > 0 {
                trace!(dropped, "no marker in buffer; discarding garbage");
                src.advance(dropped);
            }
            None
        }
    }
}

fn find_marker(src: &[u8]) -> Option<usize> {
    src.windows(2)
        .position(|pair| pair[0] == MARKER && pair[1] == FRAME_KIND_SAMPLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(src: &mut BytesMut) -> Vec<RawFrame> {
        let mut frames = Vec::new();
        while let Some(frame) = decode_frame(src) {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn decode_single_frame() {
        let mut buf = BytesMut::new();
        encode_frame(0x01, 16, [0, 0], &mut buf);

        let frame = decode_frame(&mut buf).unwrap();
        assert_eq!(frame.marker(), MARKER);
        assert_eq!(frame.kind(), FRAME_KIND_SAMPLE);
        assert_eq!(frame.code(), 0x01);
        assert_eq!(frame.raw_value(), 16);
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_back_to_back_frames() {
        let mut buf = BytesMut::new();
        encode_frame(0x01, 0x0010, [0, 0], &mut buf);
        encode_frame(0x02, 0x0020, [0, 0], &mut buf);

        let frames = drain(&mut buf);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].code(), 0x01);
        assert_eq!(frames[1].code(), 0x02);
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_skips_leading_garbage() {
        let mut buf = BytesMut::from(&[0x00, 0x7F, 0xAA][..]);
        encode_frame(0x05, 100, [1, 2], &mut buf);

        let frames = drain(&mut buf);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].code(), 0x05);
        assert!(buf.is_empty());
    }

    #[test]
    fn partial_frame_is_retained() {
        let mut buf = BytesMut::new();
        encode_frame(0x03, 42, [0, 0], &mut buf);
        let full = buf.clone();
        buf.truncate(5);

        assert!(decode_frame(&mut buf).is_none());
        assert_eq!(buf.len(), 5, "partial frame must not be discarded");

        buf.extend_from_slice(&full[5..]);
        let frame = decode_frame(&mut buf).unwrap();
        assert_eq!(frame.code(), 0x03);
        assert_eq!(frame.raw_value(), 42);
    }

    #[test]
    fn false_marker_does_not_mask_real_marker() {
        // 0xFC followed by a non-'S' byte, where that byte is itself the
        // start of a genuine marker.
        let mut buf = BytesMut::from(&[MARKER][..]);
        encode_frame(0x02, 7, [0, 0], &mut buf);

        let frames = drain(&mut buf);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].code(), 0x02);
    }

    #[test]
    fn trailing_marker_byte_survives_garbage_discard() {
        let mut buf = BytesMut::from(&[0x11, 0x22, MARKER][..]);
        assert!(decode_frame(&mut buf).is_none());
        assert_eq!(buf.as_ref(), &[MARKER][..], "trailing 0xFC awaits its partner");

        buf.extend_from_slice(&[FRAME_KIND_SAMPLE, 0x04, 0x00, 0x10, 0x00, 0x00]);
        let frame = decode_frame(&mut buf).unwrap();
        assert_eq!(frame.code(), 0x04);
    }

    #[test]
    fn pure_garbage_is_fully_discarded() {
        let mut buf = BytesMut::from(&[0x01, 0x02, 0x03, 0x04][..]);
        assert!(decode_frame(&mut buf).is_none());
        assert!(buf.is_empty());
    }

    #[test]
    fn frames_interleaved_with_garbage_all_emitted_in_order() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&[0x10, 0x20]);
        encode_frame(0x01, 1, [0, 0], &mut buf);
        buf.extend_from_slice(&[0xEE]);
        encode_frame(0x02, 2, [0, 0], &mut buf);
        buf.extend_from_slice(&[0x30, 0x40, 0x50]);
        encode_frame(0x03, 3, [0, 0], &mut buf);

        let frames = drain(&mut buf);
        let codes: Vec<u8> = frames.iter().map(RawFrame::code).collect();
        assert_eq!(codes, vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn chunk_boundary_invariance() {
        let mut wire = BytesMut::new();
        wire.extend_from_slice(&[0x99]);
        encode_frame(0x01, 0x1234, [5, 6], &mut wire);
        encode_frame(0x08, 0x8000, [b'x', 0], &mut wire);
        wire.extend_from_slice(&[MARKER, 0x00]);
        encode_frame(0x03, 7, [0, 0], &mut wire);

        let mut all_at_once = BytesMut::from(wire.as_ref());
        let expected = drain(&mut all_at_once);

        let mut buf = BytesMut::new();
        let mut one_at_a_time = Vec::new();
        for byte in wire.iter() {
            buf.extend_from_slice(&[*byte]);
            one_at_a_time.extend(drain(&mut buf));
        }

        assert_eq!(one_at_a_time, expected);
        assert_eq!(one_at_a_time.len(), 3);
    }

    #[test]
    fn accessors_expose_wire_fields() {
        let mut buf = BytesMut::new();
        encode_frame(0x08, 0xABCD, [b'q', 0x77], &mut buf);

        let frame = decode_frame(&mut buf).unwrap();
        assert_eq!(frame.marker(), 0xFC);
        assert_eq!(frame.kind(), b'S');
        assert_eq!(frame.code(), 0x08);
        assert_eq!(frame.raw_value(), 0xABCD);
        assert_eq!(frame.extra1(), b'q');
        assert_eq!(frame.extra2(), 0x77);
        assert_eq!(frame.as_bytes().len(), FRAME_SIZE);
    }
}
