//! # Sensor to Servo Value Transform
//!
//! Maps raw flex-sensor readings to servo control values using per-channel
//! linear fits.
//!
//! ## Channel Formulas
//!
//! | Channel | Formula |
//! |---------|---------|
//! | A1 | `-3.9130 * a1 + 3073.913` |
//! | A2 | `-2 * a2 + 2500` |
//! | A3 | `-3.333 * a3 + 2866.667` |
//! | A4 | `1.4286 * a4 + 514.286` |
//!
//! ## Value Ranges
//!
//! - Raw sensor input: 10-bit ADC counts (0-1023), not enforced
//! - Output: 1000-1900
//!
//! Results are truncated toward zero (not rounded) before clamping.
//!
//! ## Usage
//!
//! ```
//! use glove_bridge::sensor::sample::RawSample;
//! use glove_bridge::sensor::transform::ValueTransformer;
//!
//! let transformer = ValueTransformer::new();
//! let values = transformer.transform_sample(&RawSample::new([331, 303, 479, 959]));
//!
//! assert_eq!(values, [1778, 1894, 1270, 1884]);
//! ```

use super::sample::{RawSample, SAMPLE_CHANNELS};
use crate::frame::protocol::{ActuatorValues, ACTUATOR_VALUE_MAX, ACTUATOR_VALUE_MIN};

/// Linear fit `slope * x + intercept` for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMap {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearMap {
    /// Applies the fit and truncates toward zero.
    #[inline]
    pub fn apply(&self, value: i32) -> i64 {
        (self.slope * f64::from(value) + self.intercept) as i64
    }
}

/// Fitted maps for channels A1..A4.
pub const CHANNEL_MAPS: [LinearMap; SAMPLE_CHANNELS] = [
    LinearMap { slope: -3.9130, intercept: 3073.913 },
    LinearMap { slope: -2.0, intercept: 2500.0 },
    LinearMap { slope: -3.333, intercept: 2866.667 },
    LinearMap { slope: 1.4286, intercept: 514.286 },
];

/// Converts raw sensor samples into actuator values.
#[derive(Debug, Clone)]
pub struct ValueTransformer {
    maps: [LinearMap; SAMPLE_CHANNELS],
}

impl Default for ValueTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueTransformer {
    /// Creates a transformer with the fitted channel maps.
    #[must_use]
    pub fn new() -> Self {
        Self { maps: CHANNEL_MAPS }
    }

    /// Transforms readings A1..A4 into actuator values.
    ///
    /// Returns `None` when fewer than four readings are given. Extra readings
    /// are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use glove_bridge::sensor::transform::ValueTransformer;
    ///
    /// let transformer = ValueTransformer::new();
    /// assert!(transformer.transform(&[331, 303, 479]).is_none());
    /// assert!(transformer.transform(&[331, 303, 479, 959]).is_some());
    /// ```
    #[must_use]
    pub fn transform(&self, readings: &[i32]) -> Option<ActuatorValues> {
        let readings: &[i32; SAMPLE_CHANNELS] = readings.get(..SAMPLE_CHANNELS)?.try_into().ok()?;
        Some(self.map_channels(readings))
    }

    /// Transforms a complete sample. Never fails.
    #[must_use]
    pub fn transform_sample(&self, sample: &RawSample) -> ActuatorValues {
        self.map_channels(sample.channels())
    }

    fn map_channels(&self, readings: &[i32; SAMPLE_CHANNELS]) -> ActuatorValues {
        let mut values = [0i32; SAMPLE_CHANNELS];
        for (channel, value) in values.iter_mut().enumerate() {
            *value = Self::clamp_actuator_value(self.maps[channel].apply(readings[channel]));
        }
        values
    }

    /// Clamps a transformed value to the servo range (1000-1900).
    #[inline]
    fn clamp_actuator_value(value: i64) -> i32 {
        value.clamp(i64::from(ACTUATOR_VALUE_MIN), i64::from(ACTUATOR_VALUE_MAX)) as i32
    }
}
