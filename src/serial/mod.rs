//! # Serial Communication Module
//!
//! Handles the single serial link to the glove's microcontroller.
//!
//! This module handles:
//! - Lazily opening the port (and reopening it after failures)
//! - Draining inbound sensor lines, keeping only the newest sample
//! - Writing servo frames
//!
//! Every operation connects on demand. I/O failures drop the port handle so
//! the next operation reconnects.

pub mod port_trait;

use bytes::{Buf, BytesMut};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::SerialConfig;
use crate::error::{GloveBridgeError, Result};
use crate::sensor::sample::RawSample;
use crate::state::SharedState;
use port_trait::{PortConnector, PortSettings, SerialPortIO, TokioSerialConnector};

/// Longest partial line kept between reads before it is discarded
const MAX_PENDING_LINE_BYTES: usize = 256;

/// Channel shared by the read path and the telemetry sender
pub type SharedChannel = Arc<Mutex<SerialChannel>>;

/// Serial link to the glove
pub struct SerialChannel {
    settings: PortSettings,
    connector: Box<dyn PortConnector>,
    /// Open port, `None` while disconnected
    port: Option<Box<dyn SerialPortIO>>,
    /// Bytes of an incomplete inbound line
    rx_buffer: BytesMut,
    state: Arc<SharedState>,
    /// Set after a failed open until the next successful one
    connect_failing: bool,
}

impl std::fmt::Debug for SerialChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialChannel")
            .field("settings", &self.settings)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl From<&SerialConfig> for PortSettings {
    fn from(config: &SerialConfig) -> Self {
        Self {
            path: config.port.clone(),
            baud_rate: config.baud_rate,
            timeout: std::time::Duration::from_millis(config.timeout_ms),
        }
    }
}

impl SerialChannel {
    /// Create a disconnected channel that opens ports through `connector`
    pub fn new(settings: PortSettings, connector: Box<dyn PortConnector>, state: Arc<SharedState>) -> Self {
        Self {
            settings,
            connector,
            port: None,
            rx_buffer: BytesMut::with_capacity(MAX_PENDING_LINE_BYTES),
            state,
            connect_failing: false,
        }
    }

    /// Create a disconnected channel backed by a real serial port
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use glove_bridge::config::Config;
    /// use glove_bridge::serial::SerialChannel;
    /// use glove_bridge::state::SharedState;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let config = Config::default();
    ///     let mut channel = SerialChannel::open_native(&config.serial, SharedState::shared(true));
    ///     if let Some(sample) = channel.try_read_latest_line().await {
    ///         println!("latest sample: {}", sample);
    ///     }
    /// }
    /// ```
    pub fn open_native(config: &SerialConfig, state: Arc<SharedState>) -> Self {
        Self::new(config.into(), Box::new(TokioSerialConnector), state)
    }

    /// Wrap the channel for sharing between tasks
    pub fn into_shared(self) -> SharedChannel {
        Arc::new(Mutex::new(self))
    }

    /// Get the device path of the serial port
    pub fn port_path(&self) -> &str {
        &self.settings.path
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    /// Open the port unless already connected
    ///
    /// # Errors
    ///
    /// Returns [`GloveBridgeError::SerialPortUnavailable`] if the port cannot
    /// be opened. Only the first failure of an outage is logged as a warning.
    pub fn connect(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }

        match self.connector.open(&self.settings) {
            Ok(port) => {
                info!("Serial port connected: {} @ {} bps", self.settings.path, self.settings.baud_rate);
                self.port = Some(port);
                self.rx_buffer.clear();
                self.connect_failing = false;
                Ok(())
            }
            Err(e) => {
                // Warn once per outage, retries every poll stay at debug
                if self.connect_failing {
                    debug!("Serial connection still failing: {}", e);
                } else {
                    warn!("Serial connection failed: {}", e);
                    self.connect_failing = true;
                }
                Err(e)
            }
        }
    }

    /// Drop the port handle; the next operation reconnects
    pub fn disconnect(&mut self) {
        if self.port.take().is_some() {
            info!("Serial port {} closed", self.settings.path);
        }
        self.rx_buffer.clear();
    }

    /// Read the newest sensor sample
    ///
    /// Drains everything the driver has buffered, keeps the last well-formed
    /// line and stores it in the shared cache. Intermediate lines are
    /// discarded and malformed ones are dropped silently.
    ///
    /// A successful read that brings no new line returns the cached sample.
    /// A failed connect or read counts as no data for this cycle and returns
    /// `None`; the error is logged and the port is reopened on the next call.
    pub async fn try_read_latest_line(&mut self) -> Option<RawSample> {
        self.connect().ok()?;

        match self.read_newest_sample().await {
            Ok(Some(sample)) => self.state.store_sample(sample),
            Ok(None) => {}
            Err(e) => {
                warn!("Serial read failed: {}", e);
                self.disconnect();
                return None;
            }
        }

        self.state.latest_sample()
    }

    async fn read_newest_sample(&mut self) -> std::io::Result<Option<RawSample>> {
        let Some(port) = self.port.as_mut() else {
            return Ok(None);
        };

        let bytes = port.read_available().await?;
        self.rx_buffer.extend_from_slice(&bytes);
        Ok(self.drain_lines())
    }

    /// Split complete lines off the receive buffer and parse the newest one
    fn drain_lines(&mut self) -> Option<RawSample> {
        let mut newest = None;

        while let Some(end) = self.rx_buffer.iter().position(|&b| b == b'\n') {
            let line = self.rx_buffer.split_to(end + 1);
            let text = String::from_utf8_lossy(&line);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            match RawSample::parse_line(text) {
                Ok(sample) => newest = Some(sample),
                Err(e) => debug!("Dropping sensor line {:?}: {}", text, e),
            }
        }

        if self.rx_buffer.len() > MAX_PENDING_LINE_BYTES {
            debug!("Discarding {} bytes without line ending", self.rx_buffer.len());
            self.rx_buffer.advance(self.rx_buffer.len());
        }

        newest
    }

    /// Write bytes to the port
    ///
    /// # Returns
    ///
    /// * `Result<usize>` - Number of bytes written
    ///
    /// # Errors
    ///
    /// Returns error if the port cannot be opened or the write fails. After a
    /// write failure the port is closed and reopened on the next call.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.connect()?;
        let Some(port) = self.port.as_mut() else {
            return Err(GloveBridgeError::Serial("Serial port not connected".to_string()));
        };

        let result = match port.write_all(bytes).await {
            Ok(()) => port.flush().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                debug!("Wrote {} bytes", bytes.len());
                Ok(bytes.len())
            }
            Err(e) => {
                self.disconnect();
                Err(GloveBridgeError::Serial(format!("Failed to write frame: {}", e)))
            }
        }
    }
}
