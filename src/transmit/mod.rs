//! # Transmit Module
//!
//! Drives a [`DshotEncoder`] against a [`TxChannel`] the way a peripheral
//! driver would: encode until the block fills, transmit (flush) the block,
//! and call the encoder again until the frame + gap cycle completes.
//!
//! This module handles:
//! - The encode / flush loop for one command
//! - Aborting a partially sent frame
//! - Capturing transmitted lines to JSON Lines files

pub mod capture;

use tracing::{debug, warn};

use crate::dshot::encoder::{DshotEncoder, DshotEncoderConfig};
use crate::dshot::protocol::EscCommand;
use crate::error::{DshotError, Result};
use crate::rmt::{RmtEncoder, Symbol, TxChannel};

/// Result of sending one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxReport {
    /// Symbols produced by the encoder
    pub symbols: usize,

    /// Number of channel blocks transmitted
    pub flushes: usize,

    /// Transmitted symbols in order
    pub line: Vec<Symbol>,
}

/// Single-channel DShot transmitter
///
/// `send` takes `&mut self`, so calls on one channel never overlap.
#[derive(Debug)]
pub struct Transmitter {
    encoder: DshotEncoder,
    channel: TxChannel,
    frames_sent: u64,
}

impl Transmitter {
    /// Create a transmitter
    ///
    /// # Arguments
    ///
    /// * `config` - Encoder construction parameters
    /// * `mem_block_symbols` - Channel block size in symbols
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `mem_block_symbols` is zero (the encoder could never make progress)
    /// - The encoder or channel cannot be created
    pub fn new(config: &DshotEncoderConfig, mem_block_symbols: usize) -> Result<Self> {
        if mem_block_symbols == 0 {
            return Err(DshotError::InvalidArgument(
                "mem_block_symbols must be greater than 0".to_string(),
            ));
        }

        let encoder = DshotEncoder::new(config)?;
        let channel = TxChannel::new(mem_block_symbols)?;

        debug!(
            "Transmitter ready: {} symbol block, {} baud",
            mem_block_symbols, config.baud_rate
        );

        Ok(Self {
            encoder,
            channel,
            frames_sent: 0,
        })
    }

    /// Send one command: frame bits followed by the inter-frame gap
    ///
    /// Yields to the runtime between block transmissions.
    pub async fn send(&mut self, command: &EscCommand) -> TxReport {
        let mut report = TxReport::default();

        loop {
            let out = self.encoder.encode(&mut self.channel, command);
            report.symbols += out.symbols;

            if out.status.is_mem_full() || out.status.is_complete() {
                report.line.extend(self.channel.flush());
                report.flushes += 1;
            }

            if out.status.is_complete() {
                break;
            }

            tokio::task::yield_now().await;
        }

        self.frames_sent += 1;
        report
    }

    /// Drop any partially sent frame and start the next send from scratch
    pub fn abort(&mut self) {
        let discarded = self.channel.flush();
        if !discarded.is_empty() {
            warn!("Aborting transmission, discarding {} buffered symbols", discarded.len());
        }
        self.encoder.reset();
    }

    pub fn encoder(&self) -> &DshotEncoder {
        &self.encoder
    }

    /// Completed sends since creation
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}
