//! # DShot Symbol Decoder
//!
//! Reads a transmitted symbol line back into ESC commands. Used to verify
//! what the encoder put on the wire.

use super::frame::DshotFrame;
use super::protocol::{EscCommand, DSHOT_FRAME_BITS};
use super::timing::DshotTiming;
use crate::error::{DshotError, Result};
use crate::rmt::Symbol;

/// Decode every frame in a symbol line
///
/// Bit symbols are classified by whichever bit pattern's high time is
/// closer. Idle symbols (the inter-frame gap) are skipped between frames.
///
/// # Arguments
///
/// * `symbols` - Transmitted symbols in order
/// * `timing` - Timing the line was encoded with
/// * `bidirectional` - Expect the inverted checksum
///
/// # Returns
///
/// * `Result<Vec<EscCommand>>` - One command per complete frame
///
/// # Errors
///
/// Returns `Protocol` error if:
/// - A gap interrupts a frame, or the line ends mid-frame
/// - A frame checksum does not match
pub fn decode_symbols(
    symbols: &[Symbol],
    timing: &DshotTiming,
    bidirectional: bool,
) -> Result<Vec<EscCommand>> {
    let mut commands = Vec::new();
    let mut value: u16 = 0;
    let mut bits = 0;

    for (index, symbol) in symbols.iter().enumerate() {
        if symbol.is_idle() {
            if bits != 0 {
                return Err(DshotError::Protocol(format!(
                    "Gap at symbol {} after {} of {} frame bits",
                    index, bits, DSHOT_FRAME_BITS
                )));
            }
            continue;
        }

        value = (value << 1) | classify_bit(symbol, timing) as u16;
        bits += 1;

        if bits == DSHOT_FRAME_BITS {
            let frame = DshotFrame::from_natural(value);
            if !frame.crc_valid(bidirectional) {
                return Err(DshotError::Protocol(format!(
                    "CRC mismatch in frame 0x{:04X} ending at symbol {}",
                    value, index
                )));
            }

            commands.push(frame.command());
            value = 0;
            bits = 0;
        }
    }

    if bits != 0 {
        return Err(DshotError::Protocol(format!(
            "Line ended after {} of {} frame bits",
            bits, DSHOT_FRAME_BITS
        )));
    }

    Ok(commands)
}

/// `1` if the active phase is nearer the `1` bit high time
fn classify_bit(symbol: &Symbol, timing: &DshotTiming) -> bool {
    let high = symbol.duration0 as i32;
    let to_one = (high - timing.bit1.duration0 as i32).abs();
    let to_zero = (high - timing.bit0.duration0 as i32).abs();
    to_one < to_zero
}
