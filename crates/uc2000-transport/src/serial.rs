//! Serial port transport for the UC-2000.
//!
//! The UC-2000 REMOTE port is RS-232 at a fixed 9600 baud, 8 data bits, one
//! stop bit, no parity and no flow control. In practice it is reached
//! through a USB-to-serial adapter or a network serial bridge that presents
//! a COM port.
//!
//! # Example
//!
//! ```no_run
//! use uc2000_transport::SerialTransport;
//! use uc2000_core::transport::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> uc2000_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//!
//! // Status request
//! transport.send(&[0x7E]).await?;
//! let reply = transport.read_line(Duration::from_millis(50)).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, SerialStream, StopBits};
use uc2000_core::error::{Error, Result};
use uc2000_core::transport::Transport;

/// Baud rate of the UC-2000 REMOTE port.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial port transport to a UC-2000.
#[derive(Debug)]
pub struct SerialTransport {
    port: Option<SerialStream>,
    /// Port name for logging
    port_name: String,
}

impl SerialTransport {
    /// Open `port` (e.g. `/dev/ttyUSB0` or `COM3`) at `baud_rate`, 8N1, no
    /// flow control.
    pub async fn open(port: &str, baud_rate: u32) -> Result<Self> {
        if baud_rate == 0 {
            return Err(Error::InvalidParameter("baud rate must be non-zero".into()));
        }

        tracing::debug!(port = %port, baud_rate, "Opening serial port");

        let mut serial_stream = tokio_serial::new(port, baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                tracing::error!(port = %port, error = %e, "Failed to open serial port");
                Error::Transport(format!("Failed to open serial port {}: {}", port, e))
            })?;

        // USB adapters commonly assert DTR/RTS on open; the controller has no
        // use for them.
        if let Err(e) = serial_stream.write_data_terminal_ready(false) {
            tracing::warn!(port = %port, error = %e, "Failed to de-assert DTR");
        }
        if let Err(e) = serial_stream.write_request_to_send(false) {
            tracing::warn!(port = %port, error = %e, "Failed to de-assert RTS");
        }

        tracing::info!(port = %port, baud_rate, "Serial port opened");

        Ok(Self {
            port: Some(serial_stream),
            port_name: port.to_string(),
        })
    }

    /// Get the name of the serial port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

/// Map an I/O error to `ConnectionLost` when the link itself went away.
fn link_error(e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::NotConnected => Error::ConnectionLost,
        _ => Error::Io(e),
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(port = %self.port_name, bytes = data.len(), data = ?data, "Sending data");

        port.write_all(data).await.map_err(|e| {
            tracing::error!(port = %self.port_name, error = %e, "Failed to send data");
            link_error(e)
        })?;
        port.flush().await.map_err(Error::Io)?;

        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        match tokio::time::timeout(timeout, port.read(buf)).await {
            Ok(Ok(n)) => {
                tracing::trace!(port = %self.port_name, bytes = n, data = ?&buf[..n], "Received data");
                Ok(n)
            }
            Ok(Err(e)) => {
                tracing::error!(port = %self.port_name, error = %e, "Failed to receive data");
                Err(link_error(e))
            }
            Err(_) => Err(Error::Timeout),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            if let Err(e) = port.flush().await {
                tracing::warn!(port = %self.port_name, error = %e, "Failed to flush before closing");
            }
            tracing::info!(port = %self.port_name, "Serial port closed");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}
