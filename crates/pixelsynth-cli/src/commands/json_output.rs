//! JSON output types for machine-readable CLI output.
//!
//! These back the `--json` flag on `generate` and `validate`. Every
//! envelope has the same shape: `success`, `errors`, `warnings`, and an
//! optional `result`.

use pixelsynth_backend_midi::GenerateError;
use pixelsynth_spec::{BackendError, ValidationError, ValidationWarning};
use serde::{Deserialize, Serialize};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Settings validation errors pass through with their own `S0xx` codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Image could not be decoded
    pub const IMAGE_DECODE: &str = "CLI_002";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_003";
    /// Suggestion names an unknown scale or root
    pub const INVALID_SUGGESTION: &str = "CLI_004";
    /// Generation error (wraps backend errors)
    pub const GENERATION_ERROR: &str = "CLI_005";
    /// Output file could not be written
    pub const FILE_WRITE: &str = "CLI_006";
    /// JSON serialization error
    pub const JSON_SERIALIZE: &str = "CLI_007";
}

/// Warning codes for CLI operations.
pub mod warning_codes {
    /// Suggestion was unusable; fallback applied
    pub const SUGGESTION_FALLBACK: &str = "CLI_W001";
    /// Image was downscaled before sampling
    pub const IMAGE_DOWNSCALED: &str = "CLI_W002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "S003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    /// Sets the JSON path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "CLI_W001", "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Sets the JSON path for this warning.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Generation result details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResult {
    /// Written MIDI file
    pub output: String,
    /// BLAKE3 hash of the MIDI bytes
    pub hash: String,
    /// Number of notes written
    pub note_count: usize,
    /// Ticks per grid column
    pub ticks_per_step: u32,
    /// Pixel size the grid was sampled from
    pub sampled_width: u32,
    /// Pixel size the grid was sampled from
    pub sampled_height: u32,
    /// Title from the applied suggestion (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// JSON output for the `generate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    /// Whether generation succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Warnings from validation/generation
    pub warnings: Vec<JsonWarning>,
    /// Generation result details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerateResult>,
    /// Canonical settings hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_hash: Option<String>,
    /// BLAKE3 hash of the input image file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

impl GenerateOutput {
    /// Creates a successful generate output.
    pub fn success(
        result: GenerateResult,
        settings_hash: String,
        source_hash: String,
        warnings: Vec<JsonWarning>,
    ) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
            settings_hash: Some(settings_hash),
            source_hash: Some(source_hash),
        }
    }

    /// Creates a failed generate output.
    pub fn failure(
        errors: Vec<JsonError>,
        warnings: Vec<JsonWarning>,
        settings_hash: Option<String>,
        source_hash: Option<String>,
    ) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
            settings_hash,
            source_hash,
        }
    }
}

/// Validation result details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResult {
    /// Canonical settings hash
    pub settings_hash: String,
    /// Song length in ticks
    pub total_ticks: u64,
}

/// JSON output for the `validate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    /// Whether the settings are valid
    pub success: bool,
    /// Validation errors
    pub errors: Vec<JsonError>,
    /// Validation warnings
    pub warnings: Vec<JsonWarning>,
    /// Validation details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ValidateResult>,
}

impl ValidateOutput {
    /// Creates a successful validate output.
    pub fn success(result: ValidateResult, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    /// Creates a failed validate output.
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
        }
    }
}

/// Converts an InputError to a JsonError.
pub fn input_error_to_json(err: &InputError) -> JsonError {
    let (code, file) = match err {
        InputError::FileRead { path, .. } => (error_codes::FILE_READ, Some(path)),
        InputError::ImageDecode { path, .. } => (error_codes::IMAGE_DECODE, Some(path)),
        InputError::JsonParse { path, .. } => (error_codes::JSON_PARSE, Some(path)),
        InputError::InvalidSuggestion { .. } => (error_codes::INVALID_SUGGESTION, None),
    };

    let mut error = JsonError::new(code, err.to_string());
    if let Some(path) = file {
        error = error.with_file(path.display().to_string());
    }
    error
}

/// Converts a ValidationError to a JsonError.
pub fn validation_error_to_json(err: &ValidationError) -> JsonError {
    let mut error = JsonError::new(err.code.to_string(), &err.message);
    if let Some(ref path) = err.path {
        error = error.with_path(path);
    }
    error
}

/// Converts a ValidationWarning to a JsonWarning.
pub fn validation_warning_to_json(warn: &ValidationWarning) -> JsonWarning {
    let mut warning = JsonWarning::new(warn.code.to_string(), &warn.message);
    if let Some(ref path) = warn.path {
        warning = warning.with_path(path);
    }
    warning
}

/// Converts a GenerateError to JsonErrors.
///
/// Invalid settings expand to one entry per validation error; anything else
/// is wrapped as a generation error carrying the backend code.
pub fn generate_error_to_json(err: &GenerateError) -> Vec<JsonError> {
    match err {
        GenerateError::InvalidSettings(errors) => {
            errors.iter().map(validation_error_to_json).collect()
        }
        other => vec![JsonError::new(
            error_codes::GENERATION_ERROR,
            format!("[{}] {}", other.code(), other),
        )],
    }
}

/// Serializes an envelope for stdout.
pub fn to_json_string<T: Serialize>(output: &T) -> String {
    serde_json::to_string_pretty(output).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"errors":[{{"code":"{}","message":"{}"}}],"warnings":[]}}"#,
            error_codes::JSON_SERIALIZE,
            e.to_string().replace('"', "'")
        )
    })
}
