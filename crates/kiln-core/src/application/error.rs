//! Application layer errors.
//!
//! These errors represent failures in orchestration, not input validation.
//! Validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while staging, rendering or copying a template.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Staging or copy I/O failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The template's defaults file could not be parsed, or the manifest
    /// could not be serialised.
    #[error("Invalid values manifest at {path}: {reason}")]
    ManifestError { path: PathBuf, reason: String },

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },

    /// Local execution was required but the engine is not on `PATH`.
    #[error("Templating engine '{command}' is not installed")]
    EngineNotInstalled { command: String },

    /// Looking for the engine failed for a reason other than absence.
    #[error("Could not determine whether '{command}' is installed: {reason}")]
    EngineProbeFailed { command: String, reason: String },

    /// The engine process or container exited abnormally or never started.
    #[error("'{command}' failed: {reason}")]
    InvocationFailed {
        command: String,
        reason: String,
        /// Tail of the engine's combined output.
        output: String,
    },

    /// The engine ran successfully but left nothing behind.
    #[error("No data generated by {engine} in {dir}")]
    NoOutputGenerated { engine: String, dir: PathBuf },

    /// More than one generated entry while exactly one was required.
    #[error("Expected exactly one generated entry in {dir}, found {}: {}", entries.len(), entries.join(", "))]
    AmbiguousOutput { dir: PathBuf, entries: Vec<String> },

    /// The template tree could not be retrieved.
    #[error("Failed to fetch template from {locator}: {reason}")]
    FetchFailed { locator: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::ManifestError { path, .. } => vec![
                format!("Check that {} contains valid JSON", path.display()),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "Install the templating engine locally, or configure a container runtime".into(),
            ],
            Self::EngineNotInstalled { command } => vec![
                format!("Install '{}' and make sure it is on your PATH", command),
                "Or allow the container fallback with --strategy auto".into(),
            ],
            Self::EngineProbeFailed { .. } => vec![
                "Check your PATH environment variable".into(),
                "Force a strategy with --strategy local or --strategy container".into(),
            ],
            Self::InvocationFailed { .. } => vec![
                "Check the engine output above for details".into(),
                "Re-run with -v to stream the engine output live".into(),
            ],
            Self::NoOutputGenerated { .. } => vec![
                "The engine ran but the template produced no files".into(),
                "Check the template's include/exclude rules and conditions".into(),
            ],
            Self::AmbiguousOutput { .. } => vec![
                "The engine produced several top-level entries".into(),
                "Set engine.output_selection = \"first-by-name\" to accept the first one".into(),
            ],
            Self::FetchFailed { .. } => vec![
                "Check that the template source exists and is reachable".into(),
                "For git sources, check the URL and the ref after '#'".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::ManifestError { .. } => ErrorCategory::Validation,
            Self::AdapterNotConfigured { .. } | Self::EngineNotInstalled { .. } => {
                ErrorCategory::Configuration
            }
            Self::EngineProbeFailed { .. } => ErrorCategory::Internal,
            Self::InvocationFailed { .. }
            | Self::NoOutputGenerated { .. }
            | Self::AmbiguousOutput { .. } => ErrorCategory::Execution,
            Self::FetchFailed { .. } => ErrorCategory::NotFound,
        }
    }
}
