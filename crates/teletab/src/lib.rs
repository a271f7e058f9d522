//! Live serial telemetry indicator dashboard.
//!
//! teletab reads fixed-size binary telemetry frames from a serial link
//! and maintains a continuously refreshed view of the latest value per
//! indicator.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial byte source with bounded read timeouts
//! - [`frame`] — Frame decoding, resynchronization, and normalization
//! - [`store`] — Latest-value store, age tracking, staleness tiers

/// Re-export transport types.
pub mod transport {
    pub use teletab_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use teletab_frame::*;
}

/// Re-export store types.
pub mod store {
    pub use teletab_store::*;
}
