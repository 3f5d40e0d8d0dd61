//! PixelSynth CLI library.
//!
//! This crate provides the core functionality for the PixelSynth CLI,
//! including image and settings loading and the generate, preview, and
//! validate commands.

pub mod commands;
pub mod input;
