//! # DShot Checksum
//!
//! 4-bit XOR checksum over the 12 data bits of a DShot frame.
//!
//! The checksum folds the three data nibbles together. Bidirectional DShot
//! inverts it so the ESC can tell the two modes apart.

/// Mask selecting the CRC nibble inside the intermediate byte
const CRC_NIBBLE_MASK: u8 = 0xF0;

/// Calculate the DShot checksum of a packed frame word
///
/// # Arguments
///
/// * `packed` - Frame word with throttle in bits 15-5, telemetry in bit 4
///   and the CRC bits (3-0) still zero
/// * `bidirectional` - Invert the checksum (bidirectional DShot)
///
/// # Returns
///
/// * `u16` - Checksum in the low 4 bits
///
/// # Examples
///
/// ```
/// use dshot_encoder::dshot::crc::dshot_crc;
///
/// // throttle = 1046, telemetry = false
/// assert_eq!(dshot_crc(1046 << 5, false), 0b0110);
/// assert_eq!(dshot_crc(1046 << 5, true), 0b1001);
/// ```
pub fn dshot_crc(packed: u16, bidirectional: bool) -> u16 {
    let mut crc = (packed ^ (packed >> 4) ^ (packed >> 8)) as u8;
    if bidirectional {
        crc = !crc;
    }

    ((crc & CRC_NIBBLE_MASK) >> 4) as u16
}
