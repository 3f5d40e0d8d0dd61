//! PixelSynth End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the image-to-MIDI flows:
//!
//! - Generation: image file -> settings resolution -> `.mid` on disk
//! - Validation: structural checks on the written Standard MIDI File
//! - **Determinism**: byte-identical output across runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pixelsynth-tests
//! ```
//!
//! ## Determinism Testing
//!
//! ```rust,ignore
//! use pixelsynth_tests::determinism::verify_determinism;
//!
//! let result = verify_determinism(|| generate_midi(&image, &settings).unwrap().data, 3);
//! result.assert_deterministic();
//! ```

pub mod determinism;
pub mod fixtures;
pub mod format_validators;

// Re-export commonly used items
pub use determinism::{verify_determinism, DeterminismResult, DiffInfo};
pub use fixtures::ImageFixture;
pub use format_validators::{validate_smf, FormatError, SmfInfo};
