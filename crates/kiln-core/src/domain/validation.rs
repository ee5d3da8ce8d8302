use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{FetchRequest, common::resolve_within},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_request(request: &FetchRequest) -> Result<(), DomainError> {
        request.validate()
    }

    /// Resolve the request's target path inside `output_root`.
    pub fn validate_target_path(
        output_root: &Path,
        request: &FetchRequest,
    ) -> Result<PathBuf, DomainError> {
        let target = request.target_path.as_deref().unwrap_or(".");
        resolve_within(output_root, Path::new(target))
    }
}
