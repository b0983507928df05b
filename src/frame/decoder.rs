//! # Servo Frame Decoder
//!
//! The actuator controller never answers with frames, so decoding is only
//! used to inspect captured bytes from the command line.

use super::checksum::sum8;
use super::protocol::*;
use crate::error::{GloveBridgeError, Result};

/// Decode a complete frame into its five payload values (wire order)
///
/// # Errors
///
/// Returns error if:
/// - Frame is not exactly 14 bytes
/// - Header is incorrect
/// - Checksum does not match
pub fn decode_frame(frame: &[u8]) -> Result<[u16; FRAME_PAYLOAD_VALUES]> {
    if frame.len() != FRAME_SIZE {
        return Err(GloveBridgeError::Frame(format!(
            "Expected {} bytes, got {}",
            FRAME_SIZE,
            frame.len()
        )));
    }

    if frame[..FRAME_HEADER_SIZE] != FRAME_HEADER {
        return Err(GloveBridgeError::Frame(format!(
            "Invalid header: {:02X} {:02X} {:02X}",
            frame[0], frame[1], frame[2]
        )));
    }

    let payload = &frame[FRAME_HEADER_SIZE..FRAME_SIZE - 1];
    let received = frame[FRAME_SIZE - 1];
    let calculated = sum8(payload);
    if received != calculated {
        return Err(GloveBridgeError::Frame(format!(
            "Checksum mismatch: expected 0x{:02X}, got 0x{:02X}",
            calculated, received
        )));
    }

    let mut values = [0u16; FRAME_PAYLOAD_VALUES];
    for (slot, value) in values.iter_mut().enumerate() {
        *value = u16::from_le_bytes([payload[slot * 2], payload[slot * 2 + 1]]);
    }

    Ok(values)
}

/// Parse a hex string such as `A55A0A...` or `A5 5A 0A ...` into bytes
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if !digits.is_ascii() {
        return Err(GloveBridgeError::Frame("Non-ASCII characters in hex string".to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(GloveBridgeError::Frame("Odd number of hex digits".to_string()));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| GloveBridgeError::Frame(format!("Invalid hex byte: {}", &digits[i..i + 2])))
        })
        .collect()
}
