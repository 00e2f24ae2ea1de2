//! # DShot Encoder Library
//!
//! Resumable DShot ESC protocol encoder for pulse-train output peripherals.
//!
//! This library turns throttle commands into timing symbols (bit 0, bit 1
//! and inter-frame gap) and can stop and resume mid-frame whenever the
//! output block fills up.

pub mod config;
pub mod error;
pub mod dshot;
pub mod rmt;
pub mod transmit;
