//! Canonical settings hashing.
//!
//! Settings serialize with a fixed field order, so the JSON bytes are already
//! canonical and can be hashed directly.

use crate::error::SettingsError;
use crate::settings::Settings;

/// Computes the BLAKE3 hash of a settings record.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
///
/// # Example
/// ```
/// use pixelsynth_spec::{settings_hash, Settings};
///
/// let hash = settings_hash(&Settings::default()).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn settings_hash(settings: &Settings) -> Result<String, SettingsError> {
    let bytes = serde_json::to_vec(settings)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
