use std::collections::HashMap;
use std::time::{Duration, Instant};

use teletab_frame::Reading;
use tracing::debug;

/// One snapshot row: an indicator's latest value and how old it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub symbol: char,
    pub value: f64,
    pub age: Duration,
}

/// Latest reading per indicator symbol.
///
/// Entries are overwritten in place and never removed; staleness is a
/// display classification, not an eviction policy. The order symbols
/// first appeared is tracked separately and is not affected by later
/// updates.
#[derive(Debug, Default)]
pub struct IndicatorStore {
    readings: HashMap<char, Reading>,
    first_seen: Vec<char>,
}

impl IndicatorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for the reading's symbol.
    pub fn update(&mut self, reading: Reading) {
        if self.readings.insert(reading.symbol, reading).is_none() {
            debug!(symbol = %reading.symbol, "new indicator");
            self.first_seen.push(reading.symbol);
        }
    }

    /// Derive the ordered view for rendering.
    ///
    /// Rows come out in first-seen order, stable across calls; a symbol's
    /// position never changes once assigned.
    pub fn snapshot(&self, now: Instant) -> Vec<IndicatorRow> {
        self.first_seen
            .iter()
            .filter_map(|symbol| self.readings.get(symbol))
            .map(|reading| IndicatorRow {
                symbol: reading.symbol,
                value: reading.value,
                age: now.saturating_duration_since(reading.observed_at),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
