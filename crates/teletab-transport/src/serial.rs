use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// Byte the far end interprets as a request to start streaming.
const START_REQUEST: u8 = b's';

/// An open serial link carrying the telemetry byte stream.
///
/// The read timeout is mandatory: the polling loop relies on reads
/// returning within a bounded interval so it can check for cancellation.
/// The underlying port is closed when the link is dropped, on every exit
/// path.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialLink {
    /// Open a serial port with the given baud rate and read timeout.
    pub fn open(name: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self> {
        let port = serialport::new(name, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: name.to_string(),
                source,
            })?;

        info!(port = name, baud_rate, "opened serial link");

        Ok(Self {
            port,
            name: name.to_string(),
        })
    }

    /// Send the one-shot `'s'` byte asking the device to start streaming.
    ///
    /// Not part of the framing protocol; some device configurations only
    /// transmit after receiving it.
    pub fn request_start(&mut self) -> Result<()> {
        self.port
            .write_all(&[START_REQUEST])
            .map_err(TransportError::StartRequest)?;
        debug!(port = %self.name, "sent start request");
        Ok(())
    }

    /// The port name this link was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink").field("port", &self.name).finish()
    }
}

/// Enumerate serial ports visible to this process.
pub fn available_ports() -> Result<Vec<serialport::SerialPortInfo>> {
    serialport::available_ports().map_err(TransportError::Enumerate)
}
