//! In-memory transmit channel with a fixed-size symbol block.

use super::{Symbol, SymbolSink};
use crate::error::Result;

/// Software stand-in for a pulse-train output channel
///
/// Holds at most `mem_block_symbols` symbols. Encoders fill the block;
/// [`TxChannel::flush`] drains it the way the peripheral would transmit it.
#[derive(Debug)]
pub struct TxChannel {
    block: Vec<Symbol>,
    mem_block_symbols: usize,
}

impl TxChannel {
    /// Allocate a channel with room for `mem_block_symbols` symbols
    ///
    /// # Errors
    ///
    /// Returns `OutOfMemory` if the block cannot be allocated
    pub fn new(mem_block_symbols: usize) -> Result<Self> {
        let mut block = Vec::new();
        block.try_reserve_exact(mem_block_symbols)?;

        Ok(Self {
            block,
            mem_block_symbols,
        })
    }

    /// Change the block size; symbols already buffered are kept
    ///
    /// # Errors
    ///
    /// Returns `OutOfMemory` if the larger block cannot be allocated
    pub fn set_mem_block_symbols(&mut self, mem_block_symbols: usize) -> Result<()> {
        if mem_block_symbols > self.block.capacity() {
            self.block
                .try_reserve_exact(mem_block_symbols - self.block.len())?;
        }
        self.mem_block_symbols = mem_block_symbols;
        Ok(())
    }

    /// Configured block size in symbols
    pub fn mem_block_symbols(&self) -> usize {
        self.mem_block_symbols
    }

    /// Symbols waiting to be transmitted
    pub fn pending(&self) -> usize {
        self.block.len()
    }

    /// Drain the block, returning the symbols in transmission order
    pub fn flush(&mut self) -> Vec<Symbol> {
        self.block.drain(..).collect()
    }
}

impl SymbolSink for TxChannel {
    fn free(&self) -> usize {
        self.mem_block_symbols.saturating_sub(self.block.len())
    }

    fn push(&mut self, symbol: Symbol) {
        debug_assert!(self.free() > 0, "push into a full channel block");
        self.block.push(symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tracks_pushes() {
        let mut channel = TxChannel::new(2).unwrap();
        assert_eq!(channel.free(), 2);

        channel.push(Symbol::pulse(1, 1));
        assert_eq!(channel.free(), 1);
        assert_eq!(channel.pending(), 1);

        channel.push(Symbol::pulse(1, 1));
        assert_eq!(channel.free(), 0);
    }

    #[test]
    fn test_flush_empties_block() {
        let mut channel = TxChannel::new(4).unwrap();
        channel.push(Symbol::pulse(3, 1));
        channel.push(Symbol::idle(2, 2));

        let sent = channel.flush();
        assert_eq!(sent, vec![Symbol::pulse(3, 1), Symbol::idle(2, 2)]);
        assert_eq!(channel.pending(), 0);
        assert_eq!(channel.free(), 4);
    }

    #[test]
    fn test_shrinking_block_below_pending() {
        let mut channel = TxChannel::new(4).unwrap();
        channel.push(Symbol::pulse(1, 1));
        channel.push(Symbol::pulse(1, 1));

        channel.set_mem_block_symbols(1).unwrap();
        assert_eq!(channel.mem_block_symbols(), 1);
        assert_eq!(channel.free(), 0);
    }

    #[test]
    fn test_zero_sized_block() {
        let channel = TxChannel::new(0).unwrap();
        assert_eq!(channel.free(), 0);
    }

    #[test]
    fn test_huge_block_is_out_of_memory() {
        let result = TxChannel::new(usize::MAX);
        assert!(matches!(
            result,
            Err(crate::error::DshotError::OutOfMemory(_))
        ));
    }
}
