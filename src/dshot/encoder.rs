//! # DShot Session Encoder
//!
//! Resumable encoder that turns an [`EscCommand`] into 16 bit symbols
//! followed by one inter-frame gap symbol.
//!
//! Encoding runs through a fixed phase table. Each call starts at the
//! current phase and falls through to the next one while the channel has
//! room. When a delegate reports a full channel the call returns
//! [`EncodeStatus::Suspended`] and the phase is kept, so the caller can
//! flush the channel and call again with the same command.

use serde::Deserialize;
use tracing::{debug, trace};

use super::frame::DshotFrame;
use super::protocol::EscCommand;
use super::timing::DshotTiming;
use crate::error::{DshotError, Result};
use crate::rmt::{
    BytesEncoder, BytesEncoderConfig, CopyEncoder, EncodeStatus, Encoded, RmtEncoder, Symbol,
    SymbolSink,
};

/// Construction parameters for a [`DshotEncoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DshotEncoderConfig {
    /// Peripheral tick rate in Hz
    pub resolution_hz: u32,

    /// DShot bit rate (150,000 / 300,000 / 600,000 / 1,200,000)
    pub baud_rate: u32,

    /// Idle time appended after each frame in microseconds
    pub post_delay_us: u32,

    /// Bidirectional DShot (inverted checksum)
    pub bidirectional: bool,
}

/// Position of the encoder inside one frame + gap cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncoderPhase {
    /// Emitting (or about to emit) the 16 frame bits
    #[default]
    AwaitingFrame = 0,

    /// Emitting (or about to emit) the inter-frame gap
    AwaitingGap = 1,
}

/// Phases of one cycle, in emission order
const PHASES: [EncoderPhase; 2] = [EncoderPhase::AwaitingFrame, EncoderPhase::AwaitingGap];

impl EncoderPhase {
    fn index(self) -> usize {
        self as usize
    }

    fn next(self) -> Option<Self> {
        PHASES.get(self.index() + 1).copied()
    }
}

/// Resumable DShot encoder
///
/// Owns a bit-pattern delegate for the frame bits and a copy delegate for
/// the gap symbol. Calls must be serialized by the owner (`&mut self`).
#[derive(Debug)]
pub struct DshotEncoder<B = BytesEncoder, C = CopyEncoder> {
    bytes_encoder: B,
    copy_encoder: C,
    timing: DshotTiming,
    bidirectional: bool,
    phase: EncoderPhase,
}

impl DshotEncoder {
    /// Create an encoder with the built-in delegates
    ///
    /// # Arguments
    ///
    /// * `config` - Resolution, bit rate, post delay and direction mode
    ///
    /// # Returns
    ///
    /// * `Result<DshotEncoder>` - Encoder in the `AwaitingFrame` phase
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The timing cannot be derived from `config` (`InvalidArgument`)
    /// - A delegate encoder cannot be created (`DelegateConstructionFailed`)
    ///
    /// # Examples
    ///
    /// ```
    /// use dshot_encoder::dshot::encoder::{DshotEncoder, DshotEncoderConfig};
    /// use dshot_encoder::dshot::protocol::EscCommand;
    /// use dshot_encoder::rmt::{RmtEncoder, TxChannel};
    ///
    /// let config = DshotEncoderConfig {
    ///     resolution_hz: 40_000_000,
    ///     baud_rate: 600_000,
    ///     post_delay_us: 50,
    ///     bidirectional: false,
    /// };
    /// let mut encoder = DshotEncoder::new(&config)?;
    /// let mut channel = TxChannel::new(64)?;
    ///
    /// let out = encoder.encode(&mut channel, &EscCommand::new(1046, false));
    /// assert!(out.status.is_complete());
    /// assert_eq!(out.symbols, 17);
    /// # Ok::<(), dshot_encoder::error::DshotError>(())
    /// ```
    pub fn new(config: &DshotEncoderConfig) -> Result<Self> {
        Self::with_delegates(config, BytesEncoder::new, || Ok(CopyEncoder::new()))
    }
}

impl<B, C> DshotEncoder<B, C>
where
    B: RmtEncoder<Input = [u8]>,
    C: RmtEncoder<Input = [Symbol]>,
{
    /// Create an encoder with caller-supplied delegate constructors
    ///
    /// Delegate errors are wrapped in `DelegateConstructionFailed`. A bytes
    /// delegate that was already built is dropped before the copy delegate
    /// error is returned.
    pub fn with_delegates<FB, FC>(
        config: &DshotEncoderConfig,
        make_bytes: FB,
        make_copy: FC,
    ) -> Result<Self>
    where
        FB: FnOnce(&BytesEncoderConfig) -> Result<B>,
        FC: FnOnce() -> Result<C>,
    {
        let timing =
            DshotTiming::compute(config.resolution_hz, config.baud_rate, config.post_delay_us)?;

        let bytes_config = BytesEncoderConfig {
            bit0: timing.bit0,
            bit1: timing.bit1,
            msb_first: true,
        };
        let bytes_encoder = make_bytes(&bytes_config).map_err(|e| delegate_failed("bytes", e))?;
        let copy_encoder = make_copy().map_err(|e| delegate_failed("copy", e))?;

        debug!(
            "Created DShot encoder: {} ticks/bit, bit0 {}/{}, bit1 {}/{}, gap {} ticks, \
             bidirectional={}",
            timing.period_ticks,
            timing.bit0.duration0,
            timing.bit0.duration1,
            timing.bit1.duration0,
            timing.bit1.duration1,
            timing.gap.total_ticks(),
            config.bidirectional
        );

        Ok(Self {
            bytes_encoder,
            copy_encoder,
            timing,
            bidirectional: config.bidirectional,
            phase: EncoderPhase::AwaitingFrame,
        })
    }

    /// Current phase of the frame + gap cycle
    pub fn phase(&self) -> EncoderPhase {
        self.phase
    }

    /// Symbols derived at construction
    pub fn timing(&self) -> &DshotTiming {
        &self.timing
    }

    pub fn bidirectional(&self) -> bool {
        self.bidirectional
    }

    fn encode_phase(
        &mut self,
        phase: EncoderPhase,
        sink: &mut dyn SymbolSink,
        frame: &[u8; 2],
    ) -> Encoded {
        match phase {
            EncoderPhase::AwaitingFrame => self.bytes_encoder.encode(sink, &frame[..]),
            EncoderPhase::AwaitingGap => self
                .copy_encoder
                .encode(sink, std::slice::from_ref(&self.timing.gap)),
        }
    }
}

impl<B, C> RmtEncoder for DshotEncoder<B, C>
where
    B: RmtEncoder<Input = [u8]>,
    C: RmtEncoder<Input = [Symbol]>,
{
    type Input = EscCommand;

    fn encode(&mut self, sink: &mut dyn SymbolSink, command: &EscCommand) -> Encoded {
        let frame = DshotFrame::from_command(command, self.bidirectional).to_wire_bytes();
        let mut symbols = 0;
        let mut last = EncodeStatus::Completed;

        for &phase in &PHASES[self.phase.index()..] {
            let step = self.encode_phase(phase, sink, &frame);
            symbols += step.symbols;
            last = step.status;

            if !step.status.is_complete() {
                trace!("Suspended in {:?} after {} symbols", phase, symbols);
                return Encoded {
                    symbols,
                    status: EncodeStatus::Suspended,
                };
            }

            if let Some(next) = phase.next() {
                self.phase = next;
                trace!("Advanced to {:?}", next);

                // Phase done but the block is full: the rest of the cycle waits for a flush
                if step.status.is_mem_full() {
                    return Encoded {
                        symbols,
                        status: EncodeStatus::Suspended,
                    };
                }
            }
        }

        self.phase = EncoderPhase::AwaitingFrame;
        Encoded {
            symbols,
            status: last,
        }
    }

    fn reset(&mut self) {
        self.bytes_encoder.reset();
        self.copy_encoder.reset();
        if self.phase != EncoderPhase::AwaitingFrame {
            debug!("Discarding partial DShot frame in {:?}", self.phase);
        }
        self.phase = EncoderPhase::AwaitingFrame;
    }
}

fn delegate_failed(delegate: &'static str, source: DshotError) -> DshotError {
    DshotError::DelegateConstructionFailed {
        delegate,
        source: Box::new(source),
    }
}
