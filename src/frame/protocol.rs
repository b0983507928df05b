//! # Servo Frame Constants and Types
//!
//! Wire layout of the frame understood by the actuator controller:
//!
//! ```text
//! +------+------+------+-------------------------------+--------+
//! | 0xA5 | 0x5A | 0x0A | 5 x u16 little-endian (10 B)  | SUM8   |
//! +------+------+------+-------------------------------+--------+
//!   header (3 bytes)      payload                         1 byte
//! ```

use std::fmt;

/// Fixed frame header
pub const FRAME_HEADER: [u8; 3] = [0xA5, 0x5A, 0x0A];

/// Header size in bytes
pub const FRAME_HEADER_SIZE: usize = FRAME_HEADER.len();

/// Number of 16-bit values carried in the payload
pub const FRAME_PAYLOAD_VALUES: usize = 5;

/// Payload size in bytes (5 × u16)
pub const FRAME_PAYLOAD_SIZE: usize = FRAME_PAYLOAD_VALUES * 2;

/// Complete frame size: header(3) + payload(10) + checksum(1)
pub const FRAME_SIZE: usize = FRAME_HEADER_SIZE + FRAME_PAYLOAD_SIZE + 1;

/// Optional CR LF sent after a frame for receivers that split on line endings
pub const FRAME_TERMINATOR: [u8; 2] = [0x0D, 0x0A];

/// Number of actuator (servo) channels derived from a sensor sample
pub const NUM_ACTUATOR_CHANNELS: usize = 4;

/// Actuator value range accepted by the servos
pub const ACTUATOR_VALUE_MIN: i32 = 1000;
pub const ACTUATOR_VALUE_MAX: i32 = 1900;

/// Range of a single payload slot
pub const PAYLOAD_VALUE_MIN: i32 = 0;
pub const PAYLOAD_VALUE_MAX: i32 = u16::MAX as i32;

/// Index into [`ActuatorValues`] for each payload slot.
///
/// Slots are wired on the controller as A4, A3, A2, A0, A1. The A0 slot
/// carries a copy of A2.
pub const PAYLOAD_CHANNEL_ORDER: [usize; FRAME_PAYLOAD_VALUES] = [3, 2, 1, 1, 0];

/// Payload values of the bench test pattern
pub const TEST_PATTERN_VALUES: PayloadValues = [1500, 1600, 1700, 1900, 2000];

/// Actuator values for channels A1..A4, clamped to 1000-1900
pub type ActuatorValues = [i32; NUM_ACTUATOR_CHANNELS];

/// Payload values in wire order, before clamping to u16
pub type PayloadValues = [i32; FRAME_PAYLOAD_VALUES];

/// An encoded 14-byte frame
///
/// Only the encoder constructs frames, so a `Frame` always carries a valid
/// header and checksum.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_SIZE],
}

impl Frame {
    pub(crate) fn from_bytes(bytes: [u8; FRAME_SIZE]) -> Self {
        Self { bytes }
    }

    /// Raw frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The 10 payload bytes between header and checksum
    pub fn payload(&self) -> &[u8] {
        &self.bytes[FRAME_HEADER_SIZE..FRAME_SIZE - 1]
    }

    /// Trailing SUM8 checksum byte
    pub fn checksum(&self) -> u8 {
        self.bytes[FRAME_SIZE - 1]
    }

    /// Bytes to put on the wire, optionally followed by CR LF
    pub fn to_wire(&self, append_crlf: bool) -> Vec<u8> {
        let mut wire = Vec::with_capacity(FRAME_SIZE + FRAME_TERMINATOR.len());
        wire.extend_from_slice(&self.bytes);
        if append_crlf {
            wire.extend_from_slice(&FRAME_TERMINATOR);
        }
        wire
    }

    /// Uppercase hex without separators, e.g. `A55A0A...`
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02X}", b)).collect()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Frame").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_constants() {
        assert_eq!(FRAME_HEADER_SIZE, 3);
        assert_eq!(FRAME_PAYLOAD_SIZE, 10);
        assert_eq!(FRAME_SIZE, 14);
    }

    #[test]
    fn test_payload_order_duplicates_a2() {
        // A4, A3, A2, A0(=A2), A1
        assert_eq!(PAYLOAD_CHANNEL_ORDER, [3, 2, 1, 1, 0]);
    }

    #[test]
    fn test_frame_accessors() {
        let mut bytes = [0u8; FRAME_SIZE];
        bytes[..3].copy_from_slice(&FRAME_HEADER);
        bytes[13] = 0x42;
        let frame = Frame::from_bytes(bytes);

        assert_eq!(frame.payload().len(), FRAME_PAYLOAD_SIZE);
        assert_eq!(frame.checksum(), 0x42);
        assert_eq!(frame.to_hex(), "A55A0A0000000000000000000042");
        assert_eq!(format!("{}", frame), frame.to_hex());
    }

    #[test]
    fn test_to_wire_terminator() {
        let frame = Frame::from_bytes([0u8; FRAME_SIZE]);

        assert_eq!(frame.to_wire(false).len(), FRAME_SIZE);

        let wire = frame.to_wire(true);
        assert_eq!(wire.len(), FRAME_SIZE + 2);
        assert_eq!(&wire[FRAME_SIZE..], &[0x0D, 0x0A]);
    }
}
