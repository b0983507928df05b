//! # Sensor Module
//!
//! Flex-sensor samples from the glove and their conversion to servo values.
//!
//! This module handles:
//! - Parsing `A0,A1,A2,A3,A4` lines into raw samples
//! - Mapping raw readings to clamped actuator values

pub mod sample;
pub mod transform;
