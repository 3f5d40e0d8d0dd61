//! PixelSynth MIDI Backend - Deterministic Image-to-MIDI Generation
//!
//! This crate turns a grid of RGBA samples into a single-track Standard MIDI
//! File. Pixels brighter than a threshold become notes: horizontal position
//! maps to time, vertical position to pitch, and brightness to velocity.
//!
//! # Pipeline
//!
//! 1. [`sampler`]: walks a `resolution_x × resolution_y` grid and measures
//!    perceptual brightness at each cell center
//! 2. [`mapper`]: converts active cells to notes on a fixed tick grid, with
//!    optional scale quantization
//! 3. [`smf`]: serializes notes into a format-0 MIDI byte stream
//!
//! # Determinism
//!
//! Every stage is a pure function of the settings and the pixels. Given the
//! same inputs, the output is byte-identical, and [`GenerateResult::hash`]
//! is a BLAKE3 digest of those bytes.
//!
//! # Example
//!
//! ```
//! use pixelsynth_backend_midi::{generate_midi, RgbaImage};
//! use pixelsynth_spec::Settings;
//!
//! // 2x1 image: one white pixel, one black pixel
//! let image = RgbaImage::new(2, 1, vec![255, 255, 255, 255, 0, 0, 0, 255]).unwrap();
//! let settings = Settings::builder().resolution(2, 1).build();
//!
//! let result = generate_midi(&image, &settings).unwrap();
//! assert_eq!(result.note_count, 1);
//! assert_eq!(&result.data[0..4], b"MThd");
//! ```
//!
//! # Module Structure
//!
//! - [`sampler`]: pixel sources and grid sampling
//! - [`mapper`]: time grid, pitch, scale snapping, velocity
//! - [`smf`]: Standard MIDI File writer
//! - [`preview`]: per-cell classification for visual previews
//! - [`generate`]: main generation entry point

pub mod generate;
pub mod mapper;
pub mod preview;
pub mod sampler;
pub mod smf;

// Re-export main types
pub use generate::{generate_midi, GenerateError, GenerateResult};
pub use mapper::{map_samples, snap_to_scale, Note, TimeGrid};
pub use preview::{classify_cells, CellMap, CellState, PreviewError};
pub use sampler::{active_samples, brightness, sample_grid, PixelSource, RgbaImage, Sample};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier for reports.
pub const BACKEND_ID: &str = "pixelsynth-backend-midi";
