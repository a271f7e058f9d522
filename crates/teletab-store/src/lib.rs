//! Live indicator state: latest value per symbol, age tracking, and
//! staleness classification.
//!
//! The store keeps exactly one entry per indicator symbol, continuously
//! overwritten in place. Rows never move: snapshots come out in
//! first-seen order so operators watching a fixed panel keep stable row
//! positions across refreshes.

pub mod staleness;
pub mod store;

pub use staleness::{StalenessParseError, StalenessScale};
pub use store::{IndicatorRow, IndicatorStore};
