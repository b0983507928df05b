//! # Servo Frame Module
//!
//! Fixed-format binary frame sent to the actuator controller.
//!
//! This module handles:
//! - Frame layout constants and the payload channel order
//! - SUM8 checksum calculation
//! - Encoding actuator values into 14-byte frames
//! - Decoding frames back into payload values (inspection only)

pub mod protocol;
pub mod encoder;
pub mod decoder;
pub mod checksum;
