//! # Bytes Encoder
//!
//! Turns a byte buffer into one symbol per bit using two fixed bit patterns.

use super::{EncodeStatus, Encoded, RmtEncoder, Symbol, SymbolSink};
use crate::error::{DshotError, Result};

/// Bit patterns and bit order for a [`BytesEncoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytesEncoderConfig {
    /// Symbol emitted for a `0` bit
    pub bit0: Symbol,

    /// Symbol emitted for a `1` bit
    pub bit1: Symbol,

    /// Emit bit 7 of each byte first
    pub msb_first: bool,
}

/// Resumable bit-pattern encoder
///
/// Keeps a byte/bit cursor so that an encode interrupted by a full sink
/// continues with the next unsent bit.
#[derive(Debug)]
pub struct BytesEncoder {
    config: BytesEncoderConfig,
    byte_index: usize,
    bit_index: u8,
}

impl BytesEncoder {
    /// Create a bytes encoder
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either bit pattern has zero total duration
    pub fn new(config: &BytesEncoderConfig) -> Result<Self> {
        for (name, symbol) in [("bit0", config.bit0), ("bit1", config.bit1)] {
            if symbol.total_ticks() == 0 {
                return Err(DshotError::InvalidArgument(format!(
                    "{} symbol has zero duration",
                    name
                )));
            }
        }

        Ok(Self {
            config: *config,
            byte_index: 0,
            bit_index: 0,
        })
    }

    fn symbol_for(&self, byte: u8, bit_index: u8) -> Symbol {
        let shift = if self.config.msb_first {
            7 - bit_index
        } else {
            bit_index
        };

        if (byte >> shift) & 1 == 1 {
            self.config.bit1
        } else {
            self.config.bit0
        }
    }
}

impl RmtEncoder for BytesEncoder {
    type Input = [u8];

    fn encode(&mut self, sink: &mut dyn SymbolSink, data: &[u8]) -> Encoded {
        let mut written = 0;

        while self.byte_index < data.len() {
            let byte = data[self.byte_index];

            while self.bit_index < 8 {
                if sink.free() == 0 {
                    return Encoded {
                        symbols: written,
                        status: EncodeStatus::Suspended,
                    };
                }

                sink.push(self.symbol_for(byte, self.bit_index));
                written += 1;
                self.bit_index += 1;
            }

            self.bit_index = 0;
            self.byte_index += 1;
        }

        // Whole buffer sent, next call starts a new unit
        self.reset();

        Encoded {
            symbols: written,
            status: EncodeStatus::after_pass(true, sink.free()),
        }
    }

    fn reset(&mut self) {
        self.byte_index = 0;
        self.bit_index = 0;
    }
}
