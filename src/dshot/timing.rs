//! # DShot Timing
//!
//! Converts peripheral resolution, bit rate and post-frame delay into the
//! three symbols the encoder emits: bit 0, bit 1 and the inter-frame gap.

use super::protocol::{BIT0_HIGH_DUTY, BIT1_HIGH_DUTY, MICROS_PER_SECOND};
use crate::error::{DshotError, Result};
use crate::rmt::{Symbol, SYMBOL_DURATION_MAX};

/// Minimum ticks per bit at which the `0` and `1` high times still differ
const MIN_PERIOD_TICKS: u32 = 3;

/// Symbol timing derived once at encoder construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DshotTiming {
    /// Peripheral ticks per protocol bit
    pub period_ticks: u32,

    /// Symbol for a `0` bit
    pub bit0: Symbol,

    /// Symbol for a `1` bit
    pub bit1: Symbol,

    /// Inter-frame delay, both phases inactive
    pub gap: Symbol,
}

impl DshotTiming {
    /// Compute bit and gap symbols
    ///
    /// # Arguments
    ///
    /// * `resolution_hz` - Peripheral tick rate
    /// * `baud_rate` - DShot bit rate (e.g. 600,000 for DShot600)
    /// * `post_delay_us` - Idle time after each frame in microseconds
    ///
    /// # Returns
    ///
    /// * `Result<DshotTiming>` - Timing symbols
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if:
    /// - `resolution_hz` or `baud_rate` is zero
    /// - a bit period is shorter than three ticks, or the `0` and `1`
    ///   bits would get the same high time
    /// - any phase duration does not fit in a symbol
    ///
    /// # Examples
    ///
    /// ```
    /// use dshot_encoder::dshot::timing::DshotTiming;
    ///
    /// let timing = DshotTiming::compute(40_000_000, 600_000, 50)?;
    /// assert_eq!(timing.period_ticks, 66);
    /// assert_eq!(timing.gap.total_ticks(), 2000);
    /// # Ok::<(), dshot_encoder::error::DshotError>(())
    /// ```
    pub fn compute(resolution_hz: u32, baud_rate: u32, post_delay_us: u32) -> Result<Self> {
        if resolution_hz == 0 {
            return Err(DshotError::InvalidArgument(
                "resolution_hz must be greater than 0".to_string(),
            ));
        }

        if baud_rate == 0 {
            return Err(DshotError::InvalidArgument(
                "baud_rate must be greater than 0".to_string(),
            ));
        }

        let period_ticks = resolution_hz / baud_rate;
        if period_ticks < MIN_PERIOD_TICKS {
            return Err(DshotError::InvalidArgument(format!(
                "bit period of {} ticks is too short ({} Hz / {} baud)",
                period_ticks, resolution_hz, baud_rate
            )));
        }

        let bit0 = bit_symbol(period_ticks, BIT0_HIGH_DUTY)?;
        let bit1 = bit_symbol(period_ticks, BIT1_HIGH_DUTY)?;
        if bit0.duration0 == bit1.duration0 {
            return Err(DshotError::InvalidArgument(format!(
                "bit period of {} ticks cannot tell 0 and 1 bits apart",
                period_ticks
            )));
        }

        let delay_ticks = resolution_hz as u64 * post_delay_us as u64 / MICROS_PER_SECOND;
        let half = to_duration(delay_ticks / 2, "post delay")?;

        Ok(Self {
            period_ticks,
            bit0,
            bit1,
            gap: Symbol::idle(half, half),
        })
    }
}

/// Split one bit period into an active and inactive phase
fn bit_symbol(period_ticks: u32, duty: f64) -> Result<Symbol> {
    let high = (period_ticks as f64 * duty).round() as u32;
    let low = period_ticks - high;

    Ok(Symbol::pulse(
        to_duration(high as u64, "bit high time")?,
        to_duration(low as u64, "bit low time")?,
    ))
}

fn to_duration(ticks: u64, what: &str) -> Result<u16> {
    if ticks > SYMBOL_DURATION_MAX as u64 {
        return Err(DshotError::InvalidArgument(format!(
            "{} of {} ticks exceeds symbol maximum {}",
            what, ticks, SYMBOL_DURATION_MAX
        )));
    }
    Ok(ticks as u16)
}
