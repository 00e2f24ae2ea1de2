//! # DShot Encoder
//!
//! Runs the DShot encoder against an in-memory output channel.
//!
//! The binary sends the configured throttle command at a fixed frame rate,
//! decodes every transmitted line back to verify it, and optionally
//! captures the lines to a JSON Lines file.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use dshot_encoder::config::Config;
use dshot_encoder::dshot::decoder::decode_symbols;
use dshot_encoder::dshot::protocol::DshotSpeed;
use dshot_encoder::transmit::capture::CaptureWriter;
use dshot_encoder::transmit::Transmitter;

/// Main entry point
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, or built-in defaults)
///    - Set up logging with tracing subscriber (stdout or file)
///    - Build the transmitter (timing, delegates, channel block)
///
/// 2. **Main Loop**
///    - Send one frame + gap per tick of the frame interval
///    - Verify the transmitted line with the decoder
///    - Log status every `status_interval_frames` frames
///
/// 3. **Graceful Shutdown**
///    - Stop on Ctrl+C, flush the capture file, log the frame count
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::default(),
    };

    let _log_guard = init_logging(&config)?;

    info!("DShot Encoder v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut tx = Transmitter::new(&config.encoder, config.channel.mem_block_symbols)
        .context("Failed to create DShot transmitter")?;

    let mut capture = if config.capture.enabled {
        Some(CaptureWriter::create(&config.capture.path)?)
    } else {
        None
    };

    let command = config.command();
    let speed = DshotSpeed::from_baud_rate(config.encoder.baud_rate);
    let mut frame_interval = interval(frame_period(config.transmit.frame_rate_hz));
    frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Sending throttle {} ({:?}) at {}Hz",
        command.throttle, speed, config.transmit.frame_rate_hz
    );
    info!("Press Ctrl+C to exit");

    let mut last_log_count: u64 = 0;

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                let report = tx.send(&command).await;

                let timing = tx.encoder().timing();
                match decode_symbols(&report.line, timing, config.encoder.bidirectional) {
                    Ok(decoded) if decoded == [command] => {}
                    Ok(decoded) => warn!("Line decoded to {:?}, expected {:?}", decoded, command),
                    Err(e) => warn!("Failed to verify transmitted line: {}", e),
                }

                if let Some(writer) = capture.as_mut() {
                    if let Err(e) = writer.record(&command, &report.line) {
                        warn!("Failed to capture line: {}", e);
                    }
                }

                let frames = tx.frames_sent();
                if frames - last_log_count >= config.transmit.status_interval_frames {
                    info!("Sent {} frames ({} symbols, {} blocks per frame)",
                        frames, report.symbols, report.flushes);
                    last_log_count = frames;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total frames sent: {}", tx.frames_sent());
                break;
            }
        }
    }

    if let Some(mut writer) = capture {
        writer.flush()?;
        info!("Captured {} lines", writer.records());
    }

    Ok(())
}

/// Install the tracing subscriber
///
/// A valid `RUST_LOG` replaces the configured level entirely; otherwise
/// `logging.level` applies. When `logging.file` is set, output goes through
/// a non-blocking file writer whose guard must be held until exit.
fn init_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let level = Level::from_str(&config.logging.level)
        .with_context(|| format!("Invalid log level {}", config.logging.level))?;
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(level, rust_log.as_deref());

    if config.logging.file.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    }

    let path = Path::new(&config.logging.file);
    let file_name = path.file_name().context("logging.file must name a file")?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

/// Filter from `RUST_LOG` directives when they parse, else the configured level
fn log_filter(level: Level, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()))
}

/// Interval between frames for a frame rate
fn frame_period(frame_rate_hz: u32) -> Duration {
    Duration::from_micros(1_000_000 / frame_rate_hz.max(1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_frame_period() {
        assert_eq!(frame_period(1000), Duration::from_millis(1));
        assert_eq!(frame_period(8000), Duration::from_micros(125));
        assert_eq!(frame_period(32_000), Duration::from_micros(31));
    }

    #[test]
    fn test_frame_period_zero_rate() {
        assert_eq!(frame_period(0), Duration::from_secs(1));
    }

    #[test]
    fn test_default_frame_fits_period() {
        // One DShot600 frame + 50us gap must fit in the default 1ms period
        let config = Config::default();
        let bits_us = 16.0 * 1_000_000.0 / config.encoder.baud_rate as f64;
        let frame_us = bits_us + config.encoder.post_delay_us as f64;
        assert!(frame_us < frame_period(config.transmit.frame_rate_hz).as_micros() as f64);
    }

    #[test]
    fn test_configured_level_without_rust_log() {
        let filter = log_filter(Level::DEBUG, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_rust_log_replaces_configured_level() {
        // The configured debug level must not widen a warn-only RUST_LOG
        let filter = log_filter(Level::DEBUG, Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_invalid_rust_log_falls_back_to_configured_level() {
        let filter = log_filter(Level::INFO, Some("dshot_encoder=loud"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}
