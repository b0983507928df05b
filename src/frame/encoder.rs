//! # Servo Frame Encoder
//!
//! Encodes actuator values into 14-byte servo frames.

use super::checksum::sum8;
use super::protocol::*;

/// Encode actuator values into a complete frame
///
/// Values are reordered into wire order (see [`PAYLOAD_CHANNEL_ORDER`]),
/// clamped to the u16 range and written little-endian. Encoding never fails.
///
/// # Arguments
///
/// * `values` - Actuator values for channels A1..A4
///
/// # Examples
///
/// ```
/// use glove_bridge::frame::encoder::encode_frame;
///
/// let frame = encode_frame(&[1778, 1894, 1270, 1884]);
/// assert_eq!(frame.to_hex(), "A55A0A5C07F60466076607F2062F");
/// ```
pub fn encode_frame(values: &ActuatorValues) -> Frame {
    encode_payload_values(&payload_order(values))
}

/// Encode five payload values, already in wire order, into a frame
pub fn encode_payload_values(values: &PayloadValues) -> Frame {
    let mut bytes = [0u8; FRAME_SIZE];
    bytes[..FRAME_HEADER_SIZE].copy_from_slice(&FRAME_HEADER);

    for (slot, &value) in values.iter().enumerate() {
        let offset = FRAME_HEADER_SIZE + slot * 2;
        bytes[offset..offset + 2].copy_from_slice(&clamp_payload_value(value).to_le_bytes());
    }

    bytes[FRAME_SIZE - 1] = sum8(&bytes[FRAME_HEADER_SIZE..FRAME_SIZE - 1]);

    Frame::from_bytes(bytes)
}

/// Arrange actuator values A1..A4 into payload wire order
pub fn payload_order(values: &ActuatorValues) -> PayloadValues {
    PAYLOAD_CHANNEL_ORDER.map(|index| values[index])
}

/// Clamp a payload value to the u16 range
pub fn clamp_payload_value(value: i32) -> u16 {
    value.clamp(PAYLOAD_VALUE_MIN, PAYLOAD_VALUE_MAX) as u16
}

/// Fixed frame used to bench-test the actuator controller without a glove
pub fn test_pattern_frame() -> Frame {
    encode_payload_values(&TEST_PATTERN_VALUES)
}
