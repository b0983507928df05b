//! # Glove Bridge Library
//!
//! Recognize sign-language gestures from a flex-sensor glove and drive servos
//! over the same serial link.
//!
//! The glove's microcontroller streams `A0,A1,A2,A3,A4` lines. This library
//! keeps the newest reading, classifies it into a gesture and, on a fixed
//! cadence, converts it into a 14-byte servo frame written back to the
//! controller.

pub mod config;
pub mod console;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod logging;
pub mod recognizer;
pub mod sensor;
pub mod serial;
pub mod state;
pub mod telemetry;
