//! # Copy Encoder
//!
//! Copies pre-built symbols into the channel unchanged.

use super::{EncodeStatus, Encoded, RmtEncoder, Symbol, SymbolSink};

/// Resumable fixed-symbol encoder
#[derive(Debug, Default)]
pub struct CopyEncoder {
    next_symbol: usize,
}

impl CopyEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RmtEncoder for CopyEncoder {
    type Input = [Symbol];

    fn encode(&mut self, sink: &mut dyn SymbolSink, symbols: &[Symbol]) -> Encoded {
        let mut written = 0;

        while let Some(&symbol) = symbols.get(self.next_symbol) {
            if sink.free() == 0 {
                return Encoded {
                    symbols: written,
                    status: EncodeStatus::Suspended,
                };
            }

            sink.push(symbol);
            written += 1;
            self.next_symbol += 1;
        }

        self.reset();

        Encoded {
            symbols: written,
            status: EncodeStatus::after_pass(true, sink.free()),
        }
    }

    fn reset(&mut self) {
        self.next_symbol = 0;
    }
}
