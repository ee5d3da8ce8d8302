//! Input of the fetch-and-render action.

use std::path::PathBuf;

use serde_json::Value;

use crate::domain::{DomainError, entities::values::CallerValues, error::json_type_name};

/// Everything a caller supplies to materialize one template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchRequest {
    /// Template source: a local path or a git URL.
    pub source: String,
    /// Directory relative locators are resolved against.
    pub base_dir: Option<PathBuf>,
    /// Sub-path of the output root to copy the result into. Defaults to `.`.
    pub target_path: Option<String>,
    /// Values for the engine.
    pub values: CallerValues,
    /// Container image override, used only when the engine is not installed.
    pub image_name: Option<String>,
    /// Accepted for compatibility with cookiecutter-style callers; must be a list.
    pub copy_without_render: Option<Value>,
    /// Accepted for compatibility with cookiecutter-style callers; must be a list.
    pub extensions: Option<Value>,
}

impl FetchRequest {
    pub fn new(source: impl Into<String>, values: CallerValues) -> Self {
        Self {
            source: source.into(),
            values,
            ..Self::default()
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_target_path(mut self, target_path: impl Into<String>) -> Self {
        self.target_path = Some(target_path.into());
        self
    }

    pub fn with_image_name(mut self, image_name: impl Into<String>) -> Self {
        self.image_name = Some(image_name.into());
        self
    }

    pub fn with_copy_without_render(mut self, value: Value) -> Self {
        self.copy_without_render = Some(value);
        self
    }

    pub fn with_extensions(mut self, value: Value) -> Self {
        self.extensions = Some(value);
        self
    }

    /// Structural checks that must pass before any I/O.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.source.trim().is_empty() {
            return Err(DomainError::InvalidInput {
                field: "source".into(),
                reason: "cannot be empty".into(),
            });
        }
        require_array("copyWithoutRender", self.copy_without_render.as_ref())?;
        require_array("extensions", self.extensions.as_ref())?;
        Ok(())
    }
}

fn require_array(field: &str, value: Option<&Value>) -> Result<(), DomainError> {
    match value {
        None | Some(Value::Array(_)) => Ok(()),
        Some(other) => Err(DomainError::InvalidInput {
            field: field.into(),
            reason: format!("must be an Array, found {}", json_type_name(other)),
        }),
    }
}
