//! # Gesture Recognizer
//!
//! Foreground polling loop. Each poll reads the newest sensor sample from
//! the serial channel, classifies it, extends the gesture sequence and
//! reports the result to a [`DisplaySink`].
//!
//! The poll interval adapts to how long a poll takes (see
//! [`PollSchedule`]). Sequence save/clear requests arrive over an mpsc
//! channel and are handled between polls.

use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::RecognizerConfig;
use crate::error::GloveBridgeError;
use crate::gesture::classifier::GestureClassifier;
use crate::gesture::mapping::SignMapping;
use crate::gesture::sequence::SequenceTracker;
use crate::gesture::GestureId;
use crate::serial::SharedChannel;

/// Operator requests handled by the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceCommand {
    Save,
    Clear,
}

/// Status reported after each poll or command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// No sample yet, or the port could not be read this poll
    WaitingForData,
    Recognized { id: GestureId, name: String },
    /// Classification failed for the current sample
    Error(String),
    SequenceCleared,
    SequenceSaved(PathBuf),
    NothingToSave,
    SaveFailed(String),
}

/// Receives recognizer output
pub trait DisplaySink: Send {
    fn show_status(&mut self, status: &Status);

    fn show_sequence(&mut self, sequence: &str);

    fn show_processing_time(&mut self, _elapsed: Duration) {}
}

/// Display that writes changes to the log
#[derive(Debug, Default)]
pub struct LogDisplay {
    last_status: Option<Status>,
    last_sequence: String,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for LogDisplay {
    fn show_status(&mut self, status: &Status) {
        if self.last_status.as_ref() == Some(status) {
            return;
        }

        match status {
            Status::WaitingForData => info!("Waiting for sensor data..."),
            Status::Recognized { id, name } => info!("Recognized gesture: {} (ID: {})", name, id),
            Status::Error(message) => warn!("Recognition error: {}", message),
            Status::SequenceCleared => info!("Gesture sequence cleared"),
            Status::SequenceSaved(path) => info!("Gesture sequence saved to {}", path.display()),
            Status::NothingToSave => warn!("Cannot save an empty gesture sequence"),
            Status::SaveFailed(message) => error!("Failed to save gesture sequence: {}", message),
        }
        self.last_status = Some(status.clone());
    }

    fn show_sequence(&mut self, sequence: &str) {
        if self.last_sequence != sequence {
            info!("Sequence: {}", sequence);
            self.last_sequence = sequence.to_string();
        }
    }

    fn show_processing_time(&mut self, elapsed: Duration) {
        debug!("Poll took {:.1} ms", elapsed.as_secs_f64() * 1000.0);
    }
}

/// Adaptive poll interval
///
/// A poll slower than `slow_threshold` stretches the next interval to
/// `observed * backoff_factor`, never below `min_interval`. Faster polls
/// reset it to `min_interval`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSchedule {
    pub min_interval: Duration,
    pub slow_threshold: Duration,
    pub backoff_factor: f64,
}

impl PollSchedule {
    pub fn next_interval(&self, observed: Duration) -> Duration {
        if observed > self.slow_threshold {
            observed.mul_f64(self.backoff_factor).max(self.min_interval)
        } else {
            self.min_interval
        }
    }
}

impl From<&RecognizerConfig> for PollSchedule {
    fn from(config: &RecognizerConfig) -> Self {
        Self {
            min_interval: Duration::from_millis(config.poll_interval_ms),
            slow_threshold: Duration::from_millis(config.slow_threshold_ms),
            backoff_factor: config.backoff_factor,
        }
    }
}

pub struct Recognizer {
    channel: SharedChannel,
    classifier: Box<dyn GestureClassifier>,
    mapping: SignMapping,
    sequence: SequenceTracker,
    display: Box<dyn DisplaySink>,
    output_path: PathBuf,
    schedule: PollSchedule,
}

impl Recognizer {
    pub fn new(
        channel: SharedChannel,
        classifier: Box<dyn GestureClassifier>,
        mapping: SignMapping,
        display: Box<dyn DisplaySink>,
        output_path: PathBuf,
        schedule: PollSchedule,
    ) -> Self {
        Self {
            channel,
            classifier,
            mapping,
            sequence: SequenceTracker::new(),
            display,
            output_path,
            schedule,
        }
    }

    pub fn sequence(&self) -> &str {
        self.sequence.as_str()
    }

    /// Poll once and report the outcome
    pub async fn update(&mut self) -> Status {
        let sample = self.channel.lock().await.try_read_latest_line().await;

        let status = match sample {
            None => Status::WaitingForData,
            Some(sample) => match self.classifier.predict(&sample) {
                Ok(id) => {
                    let name = self.mapping.label(id);
                    if self.sequence.push(&name) {
                        self.display.show_sequence(self.sequence.as_str());
                    }
                    Status::Recognized { id, name }
                }
                Err(e) => Status::Error(e.to_string()),
            },
        };

        self.display.show_status(&status);
        status
    }

    pub fn clear_sequence(&mut self) -> Status {
        self.sequence.clear();
        self.display.show_sequence(self.sequence.as_str());

        let status = Status::SequenceCleared;
        self.display.show_status(&status);
        status
    }

    /// Append the sequence to the output file
    pub fn save_sequence(&mut self) -> Status {
        let status = match self.sequence.export(&self.output_path) {
            Ok(()) => Status::SequenceSaved(self.output_path.clone()),
            Err(GloveBridgeError::EmptySequence) => Status::NothingToSave,
            Err(e) => Status::SaveFailed(e.to_string()),
        };

        self.display.show_status(&status);
        status
    }

    fn handle(&mut self, command: SequenceCommand) {
        match command {
            SequenceCommand::Save => self.save_sequence(),
            SequenceCommand::Clear => self.clear_sequence(),
        };
    }

    /// Poll until `shutdown` turns `true` or its sender drops
    ///
    /// # Returns
    ///
    /// * `String` - The sequence at shutdown
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SequenceCommand>,
        mut shutdown: watch::Receiver<bool>,
    ) -> String {
        info!(
            "Starting gesture recognition, polling every {} ms",
            self.schedule.min_interval.as_millis()
        );

        'poll: loop {
            let started = Instant::now();
            self.update().await;
            let elapsed = started.elapsed();
            self.display.show_processing_time(elapsed);

            let deadline = Instant::now() + self.schedule.next_interval(elapsed);

            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    Some(command) = commands.recv() => self.handle(command),
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break 'poll;
                        }
                    }
                }
            }
        }

        info!("Gesture recognition stopped");
        self.sequence.as_str().to_string()
    }
}
