//! # RMT Symbol Encoding Module
//!
//! Pulse-train primitives shared by every encoder in the crate.
//!
//! This module handles:
//! - The physical timing symbol (two level/duration pairs)
//! - Encoder status reporting (complete / buffer full)
//! - The transmission channel seam ([`SymbolSink`])
//! - The encoder capability interface ([`RmtEncoder`])
//!
//! Submodules provide the two general-purpose delegates (bit-pattern and
//! copy encoders) and an in-memory transmit channel.

pub mod bytes;
pub mod channel;
pub mod copy;

pub use bytes::{BytesEncoder, BytesEncoderConfig};
pub use channel::TxChannel;
pub use copy::CopyEncoder;

use serde::Serialize;

/// Largest duration representable in one symbol phase (15-bit field)
pub const SYMBOL_DURATION_MAX: u16 = 0x7FFF;

/// One physical output symbol: a first phase followed by a second phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Symbol {
    /// Output level of the first phase (0 or 1)
    pub level0: u8,

    /// Duration of the first phase in peripheral ticks
    pub duration0: u16,

    /// Output level of the second phase (0 or 1)
    pub level1: u8,

    /// Duration of the second phase in peripheral ticks
    pub duration1: u16,
}

impl Symbol {
    /// Symbol that is active for `high` ticks, then inactive for `low` ticks
    pub const fn pulse(high: u16, low: u16) -> Self {
        Self {
            level0: 1,
            duration0: high,
            level1: 0,
            duration1: low,
        }
    }

    /// Symbol that stays inactive for both phases
    pub const fn idle(first: u16, second: u16) -> Self {
        Self {
            level0: 0,
            duration0: first,
            level1: 0,
            duration1: second,
        }
    }

    /// Total length of the symbol in ticks
    pub fn total_ticks(&self) -> u32 {
        self.duration0 as u32 + self.duration1 as u32
    }

    /// True when neither phase drives the active level
    pub fn is_idle(&self) -> bool {
        self.level0 == 0 && self.level1 == 0
    }
}

/// Outcome of one encode call
///
/// The two logical flags (`complete`, `buffer full`) are folded into a
/// tagged type so "neither" and illegal mixes cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStatus {
    /// Buffer filled before the unit was finished; flush and call again
    Suspended,

    /// Unit finished and the buffer still has room
    Completed,

    /// Unit finished and the buffer is exactly full; flush before the next unit
    CompletedMemFull,
}

impl EncodeStatus {
    /// The unit being encoded has been fully emitted
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Completed | Self::CompletedMemFull)
    }

    /// The channel buffer is full and must be flushed
    pub fn is_mem_full(self) -> bool {
        matches!(self, Self::Suspended | Self::CompletedMemFull)
    }

    /// Status after a write pass, given whether the unit finished and space remains
    pub(crate) fn after_pass(finished: bool, free: usize) -> Self {
        match (finished, free) {
            (false, _) => Self::Suspended,
            (true, 0) => Self::CompletedMemFull,
            (true, _) => Self::Completed,
        }
    }
}

/// Per-call encoder output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    /// Symbols written to the channel during this call
    pub symbols: usize,

    /// Completion / flow-control status
    pub status: EncodeStatus,
}

/// Transmission channel that encoders write symbols into
#[cfg_attr(test, mockall::automock)]
pub trait SymbolSink {
    /// Number of symbols that can still be written before the buffer is full
    fn free(&self) -> usize;

    /// Append one symbol; callers check [`SymbolSink::free`] first
    fn push(&mut self, symbol: Symbol);
}

/// Capability interface shared by all symbol encoders
///
/// Encoders are resumable: when the sink fills up they report
/// [`EncodeStatus::Suspended`] and continue from the same position on the
/// next call with the same input. Dropping an encoder releases it.
pub trait RmtEncoder {
    /// Input unit accepted by [`RmtEncoder::encode`]
    type Input: ?Sized;

    /// Encode (or continue encoding) `input` into `sink`
    fn encode(&mut self, sink: &mut dyn SymbolSink, input: &Self::Input) -> Encoded;

    /// Discard any partially emitted unit
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_constructors() {
        let pulse = Symbol::pulse(50, 16);
        assert_eq!(pulse.level0, 1);
        assert_eq!(pulse.level1, 0);
        assert_eq!(pulse.total_ticks(), 66);
        assert!(!pulse.is_idle());

        let idle = Symbol::idle(100, 100);
        assert!(idle.is_idle());
        assert_eq!(idle.total_ticks(), 200);
    }

    #[test]
    fn test_status_flags() {
        assert!(!EncodeStatus::Suspended.is_complete());
        assert!(EncodeStatus::Suspended.is_mem_full());

        assert!(EncodeStatus::Completed.is_complete());
        assert!(!EncodeStatus::Completed.is_mem_full());

        assert!(EncodeStatus::CompletedMemFull.is_complete());
        assert!(EncodeStatus::CompletedMemFull.is_mem_full());
    }

    #[test]
    fn test_status_after_pass() {
        assert_eq!(EncodeStatus::after_pass(false, 0), EncodeStatus::Suspended);
        assert_eq!(EncodeStatus::after_pass(false, 3), EncodeStatus::Suspended);
        assert_eq!(EncodeStatus::after_pass(true, 0), EncodeStatus::CompletedMemFull);
        assert_eq!(EncodeStatus::after_pass(true, 1), EncodeStatus::Completed);
    }

    #[test]
    fn test_symbol_serializes_field_names() {
        let json = serde_json::to_string(&Symbol::pulse(3, 1)).unwrap();
        assert_eq!(json, r#"{"level0":1,"duration0":3,"level1":0,"duration1":1}"#);
    }
}
