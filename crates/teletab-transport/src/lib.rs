//! Serial transport for telemetry byte streams.
//!
//! Provides the byte source the rest of teletab reads from: a serial link
//! opened with a bounded read timeout so the polling loop never blocks
//! indefinitely. This is the lowest layer of teletab; everything else
//! builds on the [`SerialLink`] type provided here.

pub mod error;
pub mod serial;

pub use error::{Result, TransportError};
pub use serial::{available_ports, SerialLink};
pub use serialport::{SerialPortInfo, SerialPortType};
