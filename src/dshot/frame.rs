//! # DShot Frame Builder
//!
//! Packs an ESC command into the 16-bit DShot frame.
//!
//! Natural field layout (bit 15 first on the wire):
//! ```text
//! 15                    5   4   3       0
//! [ throttle (11 bits) ] [T] [ CRC (4) ]
//! ```
//! The wire word is the natural value with its two bytes swapped, so a
//! little-endian byte buffer of it yields the high byte first and the bit
//! encoder (MSB first) emits bit 15 first.

use super::crc::dshot_crc;
use super::protocol::{EscCommand, DSHOT_THROTTLE_MASK};

/// A packed DShot frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DshotFrame {
    value: u16,
}

impl DshotFrame {
    /// Build a frame with its checksum
    ///
    /// Throttle values wider than 11 bits are truncated.
    pub fn new(throttle: u16, telemetry: bool, bidirectional: bool) -> Self {
        let packed = ((throttle & DSHOT_THROTTLE_MASK) << 5) | ((telemetry as u16) << 4);
        Self {
            value: packed | dshot_crc(packed, bidirectional),
        }
    }

    pub fn from_command(command: &EscCommand, bidirectional: bool) -> Self {
        Self::new(command.throttle, command.telemetry_request, bidirectional)
    }

    /// Wrap a natural-order value received from the wire (checksum not verified)
    pub fn from_natural(value: u16) -> Self {
        Self { value }
    }

    /// Natural-order frame value
    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn throttle(&self) -> u16 {
        self.value >> 5
    }

    pub fn telemetry(&self) -> bool {
        (self.value >> 4) & 1 == 1
    }

    pub fn crc(&self) -> u16 {
        self.value & 0x0F
    }

    /// Check the stored checksum against the data bits
    pub fn crc_valid(&self, bidirectional: bool) -> bool {
        dshot_crc(self.value & !0x0F, bidirectional) == self.crc()
    }

    /// Byte-swapped word as handed to the bit encoder
    pub fn wire_word(&self) -> u16 {
        self.value.swap_bytes()
    }

    /// Frame bytes in transmission order
    pub fn to_wire_bytes(&self) -> [u8; 2] {
        self.wire_word().to_le_bytes()
    }

    pub fn command(&self) -> EscCommand {
        EscCommand::new(self.throttle(), self.telemetry())
    }
}

/// Build the wire word for a throttle command
///
/// # Arguments
///
/// * `throttle` - Throttle value (11-bit: 0-2047)
/// * `telemetry` - Telemetry request flag
/// * `bidirectional` - Use the inverted (bidirectional DShot) checksum
///
/// # Returns
///
/// * `u16` - Frame with checksum, byte-swapped for transmission
///
/// # Examples
///
/// ```
/// use dshot_encoder::dshot::frame::build_frame;
///
/// let wire = build_frame(1046, false, false);
/// assert_eq!(wire.swap_bytes(), (1046 << 5) | 0b0110);
/// ```
pub fn build_frame(throttle: u16, telemetry: bool, bidirectional: bool) -> u16 {
    DshotFrame::new(throttle, telemetry, bidirectional).wire_word()
}
