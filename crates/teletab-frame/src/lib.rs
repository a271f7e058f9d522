//! Marker-delimited telemetry frame decoding and value normalization.
//!
//! This is the core value-add layer of teletab. The wire carries fixed
//! 7-byte frames over an unreliable serial stream:
//! - A 2-byte marker (`0xFC 'S'`) for stream synchronization
//! - A 1-byte indicator code
//! - A big-endian 16-bit value at offsets 3-4
//! - Two trailing bytes (the first substitutes as the symbol for
//!   high-code indicators)
//!
//! The decoder resynchronizes past garbage; callers never see partial
//! frames or manage buffers themselves.

pub mod codec;
pub mod error;
pub mod reader;
pub mod reading;

pub use codec::{decode_frame, encode_frame, RawFrame, FRAME_KIND_SAMPLE, FRAME_SIZE, MARKER};
pub use error::{FrameError, Result};
pub use reader::{FrameReader, DEFAULT_CHUNK_SIZE};
pub use reading::{normalize, NormalizeConfig, Reading};
