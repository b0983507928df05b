//! Trait abstraction for serial port operations to enable testing

use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio_serial::SerialPortBuilderExt;
use tracing::debug;

use crate::error::{GloveBridgeError, Result};

/// Settings used to open the glove's serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSettings {
    /// Device path (e.g., /dev/ttyS1)
    pub path: String,
    pub baud_rate: u32,
    /// Read timeout of the underlying port
    pub timeout: Duration,
}

/// Trait for serial port I/O operations
#[async_trait]
pub trait SerialPortIO: Send {
    /// Return the bytes already buffered by the driver without waiting.
    ///
    /// Returns an empty vector when nothing is pending.
    async fn read_available(&mut self) -> io::Result<Vec<u8>>;

    /// Write all data to the port
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush the output buffer
    async fn flush(&mut self) -> io::Result<()>;
}

/// Opens serial ports. Called again after every failure to reconnect.
#[cfg_attr(test, mockall::automock)]
pub trait PortConnector: Send + Sync {
    fn open(&self, settings: &PortSettings) -> Result<Box<dyn SerialPortIO>>;
}

/// Wrapper around tokio_serial::SerialStream that implements SerialPortIO
pub struct TokioSerialPort {
    port: tokio_serial::SerialStream,
}

impl TokioSerialPort {
    pub fn new(port: tokio_serial::SerialStream) -> Self {
        Self { port }
    }
}

#[async_trait]
impl SerialPortIO for TokioSerialPort {
    async fn read_available(&mut self) -> io::Result<Vec<u8>> {
        use tokio::io::AsyncReadExt;
        use tokio_serial::SerialPort;

        let pending = self.port.bytes_to_read()? as usize;
        if pending == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; pending];
        let read = self.port.read(&mut buf).await?;
        buf.truncate(read);
        Ok(buf)
    }

    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.flush().await
    }
}

/// Opens real ports through tokio-serial (8N1, no flow control)
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSerialConnector;

impl PortConnector for TokioSerialConnector {
    fn open(&self, settings: &PortSettings) -> Result<Box<dyn SerialPortIO>> {
        debug!("Opening serial port {} @ {} baud", settings.path, settings.baud_rate);

        let port = tokio_serial::new(&settings.path, settings.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(settings.timeout)
            .open_native_async()
            .map_err(|e| {
                GloveBridgeError::SerialPortUnavailable(format!("Failed to open {}: {}", settings.path, e))
            })?;

        Ok(Box::new(TokioSerialPort::new(port)))
    }
}
