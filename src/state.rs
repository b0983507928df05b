//! # Shared State
//!
//! State shared between the serial read path, the recognizer and the
//! telemetry sender.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::sensor::sample::RawSample;

/// Most recent sensor sample plus the sender enable switch.
///
/// The cache lock is only held for a copy in or out, never across an
/// `.await`.
#[derive(Debug)]
pub struct SharedState {
    latest: Mutex<Option<RawSample>>,
    send_enabled: AtomicBool,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SharedState {
    /// Creates empty state with sending enabled or disabled.
    pub fn new(send_enabled: bool) -> Self {
        Self {
            latest: Mutex::new(None),
            send_enabled: AtomicBool::new(send_enabled),
        }
    }

    /// Creates shared state ready to hand to tasks.
    pub fn shared(send_enabled: bool) -> Arc<Self> {
        Arc::new(Self::new(send_enabled))
    }

    /// Latest sample, if any has been received.
    pub fn latest_sample(&self) -> Option<RawSample> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the cached sample.
    pub fn store_sample(&self, sample: RawSample) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(sample);
    }

    pub fn send_enabled(&self) -> bool {
        self.send_enabled.load(Ordering::Relaxed)
    }

    pub fn set_send_enabled(&self, enabled: bool) {
        self.send_enabled.store(enabled, Ordering::Relaxed);
    }
}
