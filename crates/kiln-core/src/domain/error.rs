// ============================================================================
// domain/error.rs - INPUT AND INVARIANT VIOLATIONS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// Every variant is detectable before any I/O happens, so these always
/// surface as validation failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Caller input
    // ========================================================================
    #[error("Invalid input '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid template source '{locator}': {reason}")]
    InvalidSourceLocator { locator: String, reason: String },

    // ========================================================================
    // Template data
    // ========================================================================
    #[error("Template defaults must be a JSON object, found {found}")]
    InvalidDefaults { found: &'static str },

    // ========================================================================
    // Path safety
    // ========================================================================
    #[error("Path '{path}' escapes base directory '{base}'")]
    PathEscapesBase { base: PathBuf, path: PathBuf },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { field, reason } => vec![
                format!("Check the '{}' input: {}", field, reason),
            ],
            Self::InvalidSourceLocator { .. } => vec![
                "Use a local directory, a file:// URL, or a git URL".into(),
                "Select a git ref with '#', e.g. https://host/repo.git#v1.2.0".into(),
            ],
            Self::InvalidDefaults { .. } => vec![
                "The template's defaults file must contain a JSON object".into(),
                "Fix or remove the defaults file in the template".into(),
            ],
            Self::PathEscapesBase { base, .. } => vec![
                format!("Target paths must stay inside {}", base.display()),
                "Remove '..' segments or absolute paths from the target path".into(),
            ],
        }
    }
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
