//! # Line Capture
//!
//! Appends transmitted symbol lines to a JSON Lines file, one record per
//! command sent.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::dshot::protocol::EscCommand;
use crate::error::Result;
use crate::rmt::Symbol;

/// One captured transmission
#[derive(Debug, Serialize)]
struct CaptureRecord<'a> {
    timestamp: String,
    throttle: u16,
    telemetry_request: bool,
    symbols: &'a [Symbol],
}

/// JSON Lines writer for transmitted lines
#[derive(Debug)]
pub struct CaptureWriter {
    writer: BufWriter<File>,
    records: u64,
}

impl CaptureWriter {
    /// Open `path` for appending, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns `Io` error if the file cannot be opened
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        info!("Capturing transmitted symbols to {}", path.display());

        Ok(Self {
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    /// Append one record
    pub fn record(&mut self, command: &EscCommand, symbols: &[Symbol]) -> Result<()> {
        let record = CaptureRecord {
            timestamp: Utc::now().to_rfc3339(),
            throttle: command.throttle,
            telemetry_request: command.telemetry_request,
            symbols,
        };

        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Records written since creation
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("capture.jsonl");

        let mut writer = CaptureWriter::create(&path).unwrap();
        writer
            .record(&EscCommand::new(1046, false), &[Symbol::pulse(49, 17)])
            .unwrap();
        writer
            .record(&EscCommand::new(48, true), &[Symbol::idle(1000, 1000)])
            .unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.records(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["throttle"], 1046);
        assert_eq!(first["telemetry_request"], false);
        assert_eq!(first["symbols"][0]["duration0"], 49);
        assert!(first["timestamp"].as_str().unwrap().contains('T'));

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["symbols"][0]["level0"], 0);
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("capture.jsonl");

        for _ in 0..2 {
            let mut writer = CaptureWriter::create(&path).unwrap();
            writer.record(&EscCommand::new(1, false), &[]).unwrap();
            writer.flush().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("capture.jsonl");

        assert!(matches!(
            CaptureWriter::create(&path),
            Err(crate::error::DshotError::Io(_))
        ));
    }
}
