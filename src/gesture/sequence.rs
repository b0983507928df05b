//! # Gesture Sequence
//!
//! Running, arrow-separated list of recognized gesture names.
//!
//! A name is appended only when it differs from the last one appended, so
//! holding a gesture across many polls records it once.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{GloveBridgeError, Result};

/// Separator between gesture names
pub const SEQUENCE_SEPARATOR: &str = " → ";

#[derive(Debug, Clone, Default)]
pub struct SequenceTracker {
    text: String,
    last: Option<String>,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recognized gesture name
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if the sequence changed
    pub fn push(&mut self, name: &str) -> bool {
        if self.last.as_deref() == Some(name) {
            return false;
        }

        if !self.text.is_empty() {
            self.text.push_str(SEQUENCE_SEPARATOR);
        }
        self.text.push_str(name);
        self.last = Some(name.to_string());
        true
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.last = None;
    }

    /// Append the sequence as one line to `path`, creating the file if needed
    ///
    /// # Errors
    ///
    /// Returns [`GloveBridgeError::EmptySequence`] if nothing was recorded,
    /// or an I/O error if the file cannot be written.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if self.is_empty() {
            return Err(GloveBridgeError::EmptySequence);
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", self.text)?;
        Ok(())
    }
}
