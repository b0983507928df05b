//! # Gesture Classifier
//!
//! Nearest-neighbour classifier over z-score standardized sensor readings.
//!
//! Each of the four channels is shifted by its mean and divided by its
//! (population) standard deviation over the training set. A sample is
//! labelled with the gesture of the closest training point in that space.
//!
//! ## Usage
//!
//! ```
//! use glove_bridge::gesture::classifier::{GestureClassifier, GestureModel};
//! use glove_bridge::gesture::training::builtin_samples;
//! use glove_bridge::sensor::sample::RawSample;
//!
//! let model = GestureModel::train(&builtin_samples()).unwrap();
//! let id = model.predict(&RawSample::new([331, 303, 479, 959])).unwrap();
//! assert_eq!(id, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::GestureId;
use crate::error::{GloveBridgeError, Result};
use crate::sensor::sample::{RawSample, SAMPLE_CHANNELS};

/// Maps a sensor sample to a gesture id
pub trait GestureClassifier: Send {
    fn predict(&self, sample: &RawSample) -> Result<GestureId>;
}

/// A standardized training point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledPoint {
    pub gesture: GestureId,
    pub features: [f64; SAMPLE_CHANNELS],
}

/// Trained nearest-neighbour model, persisted as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureModel {
    mean: [f64; SAMPLE_CHANNELS],
    scale: [f64; SAMPLE_CHANNELS],
    points: Vec<LabelledPoint>,
}

impl GestureModel {
    /// Fit the scaler and store the standardized training points
    ///
    /// # Errors
    ///
    /// Returns [`GloveBridgeError::Model`] if `samples` is empty.
    pub fn train(samples: &[(GestureId, RawSample)]) -> Result<Self> {
        if samples.is_empty() {
            return Err(GloveBridgeError::Model("no training samples".to_string()));
        }

        let count = samples.len() as f64;
        let mut mean = [0.0; SAMPLE_CHANNELS];
        let mut scale = [0.0; SAMPLE_CHANNELS];

        for (_, sample) in samples {
            for (sum, value) in mean.iter_mut().zip(sample.features()) {
                *sum += value;
            }
        }
        mean.iter_mut().for_each(|m| *m /= count);

        for (_, sample) in samples {
            for (channel, value) in sample.features().iter().enumerate() {
                scale[channel] += (value - mean[channel]).powi(2);
            }
        }
        for s in scale.iter_mut() {
            *s = (*s / count).sqrt();
            // Constant channel: leave it unscaled
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        let mut model = Self {
            mean,
            scale,
            points: Vec::with_capacity(samples.len()),
        };
        model.points = samples
            .iter()
            .map(|(gesture, sample)| LabelledPoint {
                gesture: *gesture,
                features: model.standardize(sample),
            })
            .collect();

        Ok(model)
    }

    /// Number of stored training points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn standardize(&self, sample: &RawSample) -> [f64; SAMPLE_CHANNELS] {
        let mut features = sample.features();
        for (channel, value) in features.iter_mut().enumerate() {
            *value = (*value - self.mean[channel]) / self.scale[channel];
        }
        features
    }

    /// Write the model as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a model written by [`GestureModel::save`]
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or holds no
    /// training points.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let model: Self = serde_json::from_reader(reader)?;

        if model.is_empty() {
            return Err(GloveBridgeError::Model("model has no training points".to_string()));
        }
        if model.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(GloveBridgeError::Model("model has an invalid feature scale".to_string()));
        }

        Ok(model)
    }
}

impl GestureClassifier for GestureModel {
    fn predict(&self, sample: &RawSample) -> Result<GestureId> {
        let query = self.standardize(sample);

        self.points
            .iter()
            .map(|point| {
                let distance: f64 = point
                    .features
                    .iter()
                    .zip(&query)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum();
                (distance, point.gesture)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, gesture)| gesture)
            .ok_or_else(|| GloveBridgeError::Model("model has no training points".to_string()))
    }
}
