//! # DShot Protocol Module
//!
//! Implementation of the DShot digital ESC protocol on top of the symbol
//! encoders in [`crate::rmt`].
//!
//! This module handles:
//! - Frame packing (11-bit throttle, telemetry bit, 4-bit checksum)
//! - Bit and gap timing for any peripheral resolution and DShot speed
//! - The resumable frame + gap session encoder
//! - Decoding a transmitted symbol line for verification

pub mod protocol;
pub mod crc;
pub mod frame;
pub mod timing;
pub mod encoder;
pub mod decoder;
