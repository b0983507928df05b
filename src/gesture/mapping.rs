//! Gesture id to display name mapping, stored as a JSON object keyed by the
//! stringified id.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::training::GESTURE_NAMES;
use super::GestureId;
use crate::error::Result;

/// Display names by gesture id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignMapping {
    names: BTreeMap<String, String>,
}

impl SignMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names for the built-in training gestures
    pub fn builtin() -> Self {
        GESTURE_NAMES
            .iter()
            .map(|&(id, name)| (id, name.to_string()))
            .collect()
    }

    pub fn insert(&mut self, id: GestureId, name: impl Into<String>) {
        self.names.insert(id.to_string(), name.into());
    }

    pub fn get(&self, id: GestureId) -> Option<&str> {
        self.names.get(&id.to_string()).map(String::as_str)
    }

    /// Display name for `id`, or `Unknown gesture (<id>)` when unmapped
    pub fn label(&self, id: GestureId) -> String {
        match self.get(id) {
            Some(name) => name.to_string(),
            None => format!("Unknown gesture ({})", id),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl FromIterator<(GestureId, String)> for SignMapping {
    fn from_iter<I: IntoIterator<Item = (GestureId, String)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (id, name) in iter {
            mapping.insert(id, name);
        }
        mapping
    }
}
