//! # Telemetry Module
//!
//! Periodic transmission of servo frames back to the glove controller.
//!
//! This module handles:
//! - Turning the latest sensor sample into a servo frame every 800 ms
//! - Reconnecting the serial link after failures
//! - Cancellation on shutdown

pub mod sender;
