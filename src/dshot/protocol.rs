//! # DShot Protocol Definitions
//!
//! Constants and data structures for the DShot digital ESC protocol.

/// Largest throttle value representable in the 11-bit field
pub const DSHOT_THROTTLE_MAX: u16 = 2047;

/// Mask selecting the throttle field width
pub const DSHOT_THROTTLE_MASK: u16 = 0x07FF;

/// Bits per DShot frame (11 throttle + 1 telemetry + 4 CRC)
pub const DSHOT_FRAME_BITS: usize = 16;

/// Fraction of the bit period a `1` bit holds the active level
pub const BIT1_HIGH_DUTY: f64 = 0.7485;

/// Fraction of the bit period a `0` bit holds the active level
pub const BIT0_HIGH_DUTY: f64 = 0.37425;

/// Microseconds per second, used for the inter-frame gap conversion
pub const MICROS_PER_SECOND: u64 = 1_000_000;

/// ESC command sent in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EscCommand {
    /// Throttle value (11-bit: 0-2047). Wider values are truncated.
    pub throttle: u16,

    /// Ask the ESC to reply with telemetry
    pub telemetry_request: bool,
}

impl EscCommand {
    pub fn new(throttle: u16, telemetry_request: bool) -> Self {
        Self {
            throttle,
            telemetry_request,
        }
    }
}

/// Standard DShot bit rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DshotSpeed {
    DShot150,
    DShot300,
    DShot600,
    DShot1200,
}

impl DshotSpeed {
    /// Bit rate in bits per second
    pub const fn baud_rate(self) -> u32 {
        match self {
            Self::DShot150 => 150_000,
            Self::DShot300 => 300_000,
            Self::DShot600 => 600_000,
            Self::DShot1200 => 1_200_000,
        }
    }

    /// Map a bit rate back to a standard speed, if it is one
    pub fn from_baud_rate(baud_rate: u32) -> Option<Self> {
        [Self::DShot150, Self::DShot300, Self::DShot600, Self::DShot1200]
            .into_iter()
            .find(|speed| speed.baud_rate() == baud_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_limits() {
        assert_eq!(DSHOT_THROTTLE_MAX, 2047);
        assert_eq!(DSHOT_THROTTLE_MASK, DSHOT_THROTTLE_MAX);
        assert_eq!(DSHOT_FRAME_BITS, 16);
    }

    #[test]
    fn test_duty_ratio() {
        // The 0 bit is exactly half the 1 bit
        assert_eq!(BIT1_HIGH_DUTY / 2.0, BIT0_HIGH_DUTY);
    }

    #[test]
    fn test_speed_round_trip() {
        for speed in [
            DshotSpeed::DShot150,
            DshotSpeed::DShot300,
            DshotSpeed::DShot600,
            DshotSpeed::DShot1200,
        ] {
            assert_eq!(DshotSpeed::from_baud_rate(speed.baud_rate()), Some(speed));
        }
        assert_eq!(DshotSpeed::from_baud_rate(420_000), None);
    }
}
