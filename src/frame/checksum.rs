//! # SUM8 Checksum
//!
//! 8-bit additive checksum used by the servo frame: the sum of all payload
//! bytes modulo 256. Header bytes are not included.

/// Calculate the SUM8 checksum of `data`
///
/// # Examples
///
/// ```
/// use glove_bridge::frame::checksum::sum8;
///
/// assert_eq!(sum8(&[0x01, 0x02, 0x03]), 0x06);
/// assert_eq!(sum8(&[0xFF, 0x02]), 0x01);
/// ```
pub fn sum8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte))
}
