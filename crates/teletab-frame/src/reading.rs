use std::time::Instant;

use tracing::trace;

use crate::codec::{RawFrame, FRAME_KIND_SAMPLE, MARKER};

/// Symbols whose values arrive pre-scaled and are left undivided.
pub const DEFAULT_UNSCALED_SYMBOLS: [char; 2] = ['c', 'P'];

/// Symbol whose frames carry the real symbol in `extra1` instead.
pub const DEFAULT_SUBSTITUTION_TRIGGER: char = 'H';

const SCALE_DIVISOR: f64 = 16.0;

/// How raw frame fields map onto indicator readings.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Symbols exempt from the divide-by-16 scaling.
    pub unscaled_symbols: Vec<char>,
    /// The `code | 0x40` symbol that triggers extra1-as-symbol
    /// substitution.
    pub substitution_trigger: char,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            unscaled_symbols: DEFAULT_UNSCALED_SYMBOLS.to_vec(),
            substitution_trigger: DEFAULT_SUBSTITUTION_TRIGGER,
        }
    }
}

/// A typed indicator reading extracted from one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Single-character indicator identifier.
    pub symbol: char,
    /// Signed, scaled physical value.
    pub value: f64,
    /// When this reading was observed.
    pub observed_at: Instant,
}

/// Convert a raw frame into a reading.
///
/// Pure function of the frame, the config, and the injected timestamp.
/// Re-validates the marker bytes even though the decoder already has:
/// this is the sole gate when frames arrive from any other source.
/// Returns `None` for frames that fail that check (silently dropped, per
/// the recoverable-error policy).
///
/// The symbol is `code | 0x40` as ASCII, unless that equals the
/// substitution trigger, in which case `extra1` carries the symbol. The
/// value is the big-endian 16-bit field reinterpreted as two's-complement
/// (sign-extended first), then divided by 16 unless the symbol is exempt.
pub fn normalize(frame: &RawFrame, config: &NormalizeConfig, now: Instant) -> Option<Reading> {
    if frame.marker() != MARKER || frame.kind() != FRAME_KIND_SAMPLE {
        trace!(
            marker = frame.marker(),
            kind = frame.kind(),
            "dropping malformed frame"
        );
        return None;
    }

    let coded = char::from(frame.code() | 0x40);
    let symbol = if coded == config.substitution_trigger {
        char::from(frame.extra1())
    } else {
        coded
    };

    let raw = i32::from(frame.raw_value() as i16);
    let value = if config.unscaled_symbols.contains(&symbol) {
        f64::from(raw)
    } else {
        f64::from(raw) / SCALE_DIVISOR
    };

    Some(Reading {
        symbol,
        value,
        observed_at: now,
    })
}
