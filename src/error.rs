//! # Error Types
//!
//! Custom error types for Glove Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for Glove Bridge
#[derive(Debug, Error)]
pub enum GloveBridgeError {
    /// The configured serial port could not be opened
    #[error("Serial port unavailable: {0}")]
    SerialPortUnavailable(String),

    /// Read/write failure on an open serial port
    #[error("Serial I/O error: {0}")]
    Serial(String),

    /// Inbound sensor line that does not hold five integer fields
    #[error("Malformed sensor line: {0}")]
    MalformedLine(String),

    /// Outbound frame errors (decoding only; encoding never fails)
    #[error("Frame error: {0}")]
    Frame(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Gesture model or sign mapping errors
    #[error("Gesture model error: {0}")]
    Model(String),

    /// Attempt to export a sequence with no gestures in it
    #[error("Gesture sequence is empty")]
    EmptySequence,

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Glove Bridge
pub type Result<T> = std::result::Result<T, GloveBridgeError>;
