//! # Raw Sensor Samples
//!
//! The glove firmware prints one ASCII line per reading:
//!
//! ```text
//! A0,A1,A2,A3,A4\n
//! ```
//!
//! A0 is not wired to a finger and is discarded; A1..A4 form the sample.

use std::fmt;
use std::str::FromStr;

use crate::error::{GloveBridgeError, Result};

/// Number of comma-separated fields in an inbound line
pub const LINE_FIELD_COUNT: usize = 5;

/// Number of channels retained per sample (A1..A4)
pub const SAMPLE_CHANNELS: usize = 4;

/// One reading of sensor channels A1..A4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawSample {
    channels: [i32; SAMPLE_CHANNELS],
}

impl RawSample {
    /// Creates a sample from channel readings A1..A4.
    #[must_use]
    pub const fn new(channels: [i32; SAMPLE_CHANNELS]) -> Self {
        Self { channels }
    }

    /// Channel readings A1..A4
    pub fn channels(&self) -> &[i32; SAMPLE_CHANNELS] {
        &self.channels
    }

    /// Readings as floating-point features for classification
    pub fn features(&self) -> [f64; SAMPLE_CHANNELS] {
        self.channels.map(f64::from)
    }

    /// Parse one line from the glove
    ///
    /// Surrounding whitespace (including a trailing `\r`) is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GloveBridgeError::MalformedLine`] if the line does not hold
    /// exactly five integer fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use glove_bridge::sensor::sample::RawSample;
    ///
    /// let sample = RawSample::parse_line("512,331,303,479,959").unwrap();
    /// assert_eq!(sample.channels(), &[331, 303, 479, 959]);
    /// ```
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.trim().split(',').collect();
        if fields.len() != LINE_FIELD_COUNT {
            return Err(GloveBridgeError::MalformedLine(format!(
                "expected {} fields, got {}",
                LINE_FIELD_COUNT,
                fields.len()
            )));
        }

        // A0 must be numeric too, but its value is not kept
        fields[0]
            .trim()
            .parse::<i32>()
            .map_err(|_| GloveBridgeError::MalformedLine(format!("non-numeric field {:?}", fields[0])))?;

        parse_channels(&fields[1..])
    }
}

impl FromStr for RawSample {
    type Err = GloveBridgeError;

    /// Parses the four retained channels `A1,A2,A3,A4` (no A0 field).
    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim().split(',').collect();
        if fields.len() != SAMPLE_CHANNELS {
            return Err(GloveBridgeError::MalformedLine(format!(
                "expected {} channels, got {}",
                SAMPLE_CHANNELS,
                fields.len()
            )));
        }

        parse_channels(&fields)
    }
}

fn parse_channels(fields: &[&str]) -> Result<RawSample> {
    let mut channels = [0i32; SAMPLE_CHANNELS];
    for (channel, field) in channels.iter_mut().zip(fields) {
        *channel = field
            .trim()
            .parse()
            .map_err(|_| GloveBridgeError::MalformedLine(format!("non-numeric field {:?}", field)))?;
    }

    Ok(RawSample { channels })
}

impl fmt::Display for RawSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a1, a2, a3, a4] = self.channels;
        write!(f, "{},{},{},{}", a1, a2, a3, a4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_drops_a0() {
        let sample = RawSample::parse_line("100,331,303,479,959").unwrap();
        assert_eq!(sample.channels(), &[331, 303, 479, 959]);
    }

    #[test]
    fn test_parse_line_trims_crlf_and_spaces() {
        let sample = RawSample::parse_line(" 0, 1 ,2,3 ,4\r\n").unwrap();
        assert_eq!(sample.channels(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_line_four_fields_rejected() {
        let result = RawSample::parse_line("331,303,479,959");
        assert!(matches!(result, Err(GloveBridgeError::MalformedLine(_))));
    }

    #[test]
    fn test_parse_line_six_fields_rejected() {
        assert!(RawSample::parse_line("1,2,3,4,5,6").is_err());
    }

    #[test]
    fn test_parse_line_non_numeric_rejected() {
        assert!(RawSample::parse_line("1,2,x,4,5").is_err());
        assert!(RawSample::parse_line("1,2,,4,5").is_err());
        assert!(RawSample::parse_line("").is_err());
    }

    #[test]
    fn test_parse_line_non_numeric_a0_rejected() {
        assert!(matches!(
            RawSample::parse_line("abc,1,2,3,4"),
            Err(GloveBridgeError::MalformedLine(_))
        ));
        assert!(RawSample::parse_line(",1,2,3,4").is_err());
    }

    #[test]
    fn test_parse_line_negative_values() {
        let sample = RawSample::parse_line("0,-1,2,3,4").unwrap();
        assert_eq!(sample.channels()[0], -1);
    }

    #[test]
    fn test_from_str_four_channels() {
        let sample: RawSample = "331, 303, 479, 959".parse().unwrap();
        assert_eq!(sample, RawSample::new([331, 303, 479, 959]));
        assert!("1,2,3".parse::<RawSample>().is_err());
    }

    #[test]
    fn test_display() {
        let sample = RawSample::new([331, 303, 479, 959]);
        assert_eq!(sample.to_string(), "331,303,479,959");
    }

    #[test]
    fn test_features() {
        let sample = RawSample::new([1, 2, 3, 4]);
        assert_eq!(sample.features(), [1.0, 2.0, 3.0, 4.0]);
    }
}
