//! # Servo Frame Sender
//!
//! Each tick walks through:
//!
//! 1. Sending disabled → [`TickOutcome::Disabled`]
//! 2. Port closed and cannot be opened → [`TickOutcome::ConnectFailed`]
//! 3. No sample cached yet → [`TickOutcome::NoSample`]
//! 4. Transform and encode the sample
//! 5. Write the frame → [`TickOutcome::Sent`] or [`TickOutcome::WriteFailed`]
//!
//! [`TelemetrySender::run`] waits the send interval after every tick,
//! whatever its outcome. The wait starts when the tick finishes, so the
//! effective period is the interval plus the tick's own duration.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::TelemetryConfig;
use crate::frame::encoder::encode_frame;
use crate::frame::protocol::Frame;
use crate::sensor::transform::ValueTransformer;
use crate::serial::SharedChannel;
use crate::state::SharedState;

/// Where each tick's frame comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// Encode the newest cached sensor sample
    LatestSample,
    /// Send the same frame every tick (bench testing)
    Fixed(Frame),
}

/// Result of a single sender tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Disabled,
    ConnectFailed,
    NoSample,
    /// Frame written, with the number of bytes
    Sent(usize),
    WriteFailed,
}

/// Log line for a written frame: byte count and uppercase hex
fn sent_message(written: usize, frame: &Frame) -> String {
    format!("Sent servo frame ({} bytes): {}", written, frame)
}

/// Periodic servo frame transmitter
pub struct TelemetrySender {
    channel: SharedChannel,
    state: Arc<SharedState>,
    transformer: ValueTransformer,
    source: FrameSource,
    interval: Duration,
    append_crlf: bool,
    status_every: u64,
    frames_sent: u64,
}

impl TelemetrySender {
    pub fn new(channel: SharedChannel, state: Arc<SharedState>, config: &TelemetryConfig) -> Self {
        Self {
            channel,
            state,
            transformer: ValueTransformer::new(),
            source: FrameSource::LatestSample,
            interval: config.send_interval(),
            append_crlf: config.append_crlf,
            status_every: config.status_every.max(1),
            frames_sent: 0,
        }
    }

    /// Replace the frame source
    #[must_use]
    pub fn with_source(mut self, source: FrameSource) -> Self {
        self.source = source;
        self
    }

    /// Frames successfully written so far
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Run one transmission attempt
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.state.send_enabled() {
            return TickOutcome::Disabled;
        }

        let mut channel = self.channel.lock().await;
        if !channel.is_connected() && channel.connect().is_err() {
            return TickOutcome::ConnectFailed;
        }

        let Some(frame) = self.next_frame() else {
            return TickOutcome::NoSample;
        };

        match channel.write(&frame.to_wire(self.append_crlf)).await {
            Ok(written) => {
                self.frames_sent += 1;
                info!("{}", sent_message(written, &frame));

                if self.frames_sent % self.status_every == 0 {
                    info!("Sent {} servo frames, latest {}", self.frames_sent, frame);
                }
                TickOutcome::Sent(written)
            }
            Err(e) => {
                warn!("Failed to send servo frame: {}", e);
                TickOutcome::WriteFailed
            }
        }
    }

    fn next_frame(&self) -> Option<Frame> {
        match self.source {
            FrameSource::Fixed(frame) => Some(frame),
            FrameSource::LatestSample => {
                let sample = self.state.latest_sample()?;
                let values = self.transformer.transform(sample.channels())?;
                Some(encode_frame(&values))
            }
        }
    }

    /// Tick every interval until `shutdown` turns `true` or its sender drops
    ///
    /// # Returns
    ///
    /// * `u64` - Total frames sent
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        info!("Starting servo frame transmission every {} ms", self.interval.as_millis());

        'send: loop {
            let deadline = Instant::now() + self.interval;

            // Only a shutdown ends the wait early; other watch updates keep the deadline
            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break 'send;
                        }
                    }
                }
            }

            self.tick().await;
        }

        info!("Servo frame transmission stopped, total frames sent: {}", self.frames_sent);
        self.frames_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GloveBridgeError;
    use crate::frame::encoder::test_pattern_frame;
    use crate::sensor::sample::RawSample;
    use crate::serial::port_trait::mocks::{connector_for, MockSerialPort};
    use crate::serial::port_trait::{MockPortConnector, PortSettings, SerialPortIO};
    use crate::serial::SerialChannel;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const OK_FRAME: [u8; 14] = [
        0xA5, 0x5A, 0x0A, 0x5C, 0x07, 0xF6, 0x04, 0x66, 0x07, 0x66, 0x07, 0xF2, 0x06, 0x2F,
    ];

    fn settings() -> PortSettings {
        PortSettings {
            path: "/dev/ttyMOCK0".to_string(),
            baud_rate: 9600,
            timeout: Duration::from_secs(1),
        }
    }

    fn sender_with(connector: MockPortConnector, config: &TelemetryConfig) -> (TelemetrySender, Arc<SharedState>) {
        let state = SharedState::shared(true);
        let channel = SerialChannel::new(settings(), Box::new(connector), Arc::clone(&state)).into_shared();
        (TelemetrySender::new(channel, Arc::clone(&state), config), state)
    }

    /// Connector that counts open calls and hands out clones of `port`
    fn counting_connector(port: &MockSerialPort, opens: Arc<AtomicUsize>) -> MockPortConnector {
        let port = port.clone();
        let mut connector = MockPortConnector::new();
        connector.expect_open().returning(move |_| {
            opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(port.clone()) as Box<dyn SerialPortIO>)
        });
        connector
    }

    // ==================== Tick Tests ====================

    #[tokio::test]
    async fn test_tick_sends_reference_frame() {
        let port = MockSerialPort::new();
        let (mut sender, state) = sender_with(connector_for(&port), &TelemetryConfig::default());
        state.store_sample(RawSample::new([331, 303, 479, 959]));

        assert_eq!(sender.tick().await, TickOutcome::Sent(14));
        assert_eq!(port.get_written_data(), vec![OK_FRAME.to_vec()]);
        assert_eq!(sender.frames_sent(), 1);
    }

    #[tokio::test]
    async fn test_tick_appends_crlf_when_configured() {
        let port = MockSerialPort::new();
        let config = TelemetryConfig {
            append_crlf: true,
            ..TelemetryConfig::default()
        };
        let (mut sender, state) = sender_with(connector_for(&port), &config);
        state.store_sample(RawSample::new([331, 303, 479, 959]));

        assert_eq!(sender.tick().await, TickOutcome::Sent(16));
        let written = port.get_written_data();
        assert_eq!(&written[0][..14], &OK_FRAME);
        assert_eq!(&written[0][14..], &[0x0D, 0x0A]);
    }

    #[tokio::test]
    async fn test_tick_disabled_does_nothing() {
        let port = MockSerialPort::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (mut sender, state) =
            sender_with(counting_connector(&port, Arc::clone(&opens)), &TelemetryConfig::default());
        state.store_sample(RawSample::new([331, 303, 479, 959]));
        state.set_send_enabled(false);

        assert_eq!(sender.tick().await, TickOutcome::Disabled);
        assert_eq!(opens.load(Ordering::SeqCst), 0);
        assert!(port.get_written_data().is_empty());
    }

    #[tokio::test]
    async fn test_tick_without_sample() {
        let port = MockSerialPort::new();
        let (mut sender, _) = sender_with(connector_for(&port), &TelemetryConfig::default());

        assert_eq!(sender.tick().await, TickOutcome::NoSample);
        assert!(port.get_written_data().is_empty());
    }

    #[tokio::test]
    async fn test_tick_connect_failure() {
        let mut connector = MockPortConnector::new();
        connector
            .expect_open()
            .returning(|s| Err(GloveBridgeError::SerialPortUnavailable(s.path.clone())));
        let (mut sender, state) = sender_with(connector, &TelemetryConfig::default());
        state.store_sample(RawSample::new([331, 303, 479, 959]));

        assert_eq!(sender.tick().await, TickOutcome::ConnectFailed);
        assert_eq!(sender.frames_sent(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_reconnects_on_next_tick() {
        let port = MockSerialPort::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (mut sender, state) =
            sender_with(counting_connector(&port, Arc::clone(&opens)), &TelemetryConfig::default());
        state.store_sample(RawSample::new([331, 303, 479, 959]));

        port.set_write_error(Some(io::ErrorKind::BrokenPipe));
        assert_eq!(sender.tick().await, TickOutcome::WriteFailed);
        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert!(port.get_written_data().is_empty());

        port.set_write_error(None);
        assert_eq!(sender.tick().await, TickOutcome::Sent(14));
        assert_eq!(opens.load(Ordering::SeqCst), 2, "second tick must reopen the port");
        assert_eq!(port.get_written_data().len(), 1);
    }

    #[tokio::test]
    async fn test_connected_port_is_reused() {
        let port = MockSerialPort::new();
        let opens = Arc::new(AtomicUsize::new(0));
        let (mut sender, state) =
            sender_with(counting_connector(&port, Arc::clone(&opens)), &TelemetryConfig::default());
        state.store_sample(RawSample::new([500, 500, 400, 800]));

        for _ in 0..3 {
            assert_eq!(sender.tick().await, TickOutcome::Sent(14));
        }
        assert_eq!(opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fixed_source_ignores_cache() {
        let port = MockSerialPort::new();
        let (sender, _) = sender_with(connector_for(&port), &TelemetryConfig::default());
        let mut sender = sender.with_source(FrameSource::Fixed(test_pattern_frame()));

        assert_eq!(sender.tick().await, TickOutcome::Sent(14));
        assert_eq!(port.get_written_data()[0], test_pattern_frame().as_bytes().to_vec());
    }

    #[test]
    fn test_sent_message_has_byte_count_and_hex() {
        let frame = encode_frame(&[1778, 1894, 1270, 1884]);
        assert_eq!(
            sent_message(16, &frame),
            "Sent servo frame (16 bytes): A55A0A5C07F60466076607F2062F"
        );
    }

    // ==================== Run Loop Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_run_sends_every_interval_until_shutdown() {
        let port = MockSerialPort::new();
        let (sender, state) = sender_with(connector_for(&port), &TelemetryConfig::default());
        state.store_sample(RawSample::new([331, 303, 479, 959]));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(sender.run(shutdown_rx));

        // Ticks at 800, 1600 and 2400 ms
        tokio::time::sleep(Duration::from_millis(2500)).await;
        shutdown_tx.send(true).unwrap();

        assert_eq!(handle.await.unwrap(), 3);
        assert_eq!(port.get_written_data().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_keeps_ticking_while_disabled() {
        let port = MockSerialPort::new();
        let (sender, state) = sender_with(connector_for(&port), &TelemetryConfig::default());
        state.store_sample(RawSample::new([331, 303, 479, 959]));
        state.set_send_enabled(false);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(sender.run(shutdown_rx));

        tokio::time::sleep(Duration::from_millis(1700)).await;
        assert!(port.get_written_data().is_empty());

        state.set_send_enabled(true);
        tokio::time::sleep(Duration::from_millis(800)).await;
        shutdown_tx.send(true).unwrap();

        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_full_interval_after_non_shutdown_update() {
        let port = MockSerialPort::new();
        let (sender, state) = sender_with(connector_for(&port), &TelemetryConfig::default());
        state.store_sample(RawSample::new([331, 303, 479, 959]));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(sender.run(shutdown_rx));

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown_tx.send(false).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(port.get_written_data().is_empty());

        // First frame still lands at 800 ms
        tokio::time::sleep(Duration::from_millis(750)).await;
        assert_eq!(port.get_written_data().len(), 1);

        shutdown_tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_when_shutdown_sender_dropped() {
        let port = MockSerialPort::new();
        let (sender, _) = sender_with(connector_for(&port), &TelemetryConfig::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(sender.run(shutdown_rx));
        drop(shutdown_tx);

        assert_eq!(handle.await.unwrap(), 0);
    }
}
