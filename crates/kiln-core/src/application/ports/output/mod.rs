//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kiln-adapters` crate provides implementations.

mod invocation;
mod log_stream;

use std::path::Path;

use crate::domain::{EngineAvailability, SourceLocator};
use crate::error::KilnResult;

pub use invocation::{ContainerInvocation, Mount, ProcessInvocation};
pub use log_stream::{LogStream, OutputStream};

/// Port for filesystem operations on the staging workspace.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Read a UTF-8 file. A missing file is `Ok(None)`, not an error.
    fn read_file(&self, path: &Path) -> KilnResult<Option<String>>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Names of the direct children of a directory.
    fn list_dir(&self, path: &Path) -> KilnResult<Vec<String>>;

    /// Move a file or directory. `to` must not exist.
    fn rename(&self, from: &Path, to: &Path) -> KilnResult<()>;

    /// Recursively copy the contents of `from` into `to`, creating `to`.
    /// Existing files in `to` are overwritten.
    fn copy_dir_all(&self, from: &Path, to: &Path) -> KilnResult<()>;
}

/// Port for detecting a locally installed engine.
///
/// Implemented by `kiln_adapters::probe::WhichProbe`.
#[cfg_attr(test, mockall::automock)]
pub trait EngineProbe: Send + Sync {
    /// Never fails: absence is [`EngineAvailability::NotFound`].
    fn probe(&self, command: &str) -> EngineAvailability;
}

/// Port for running a host executable.
///
/// Implementations stream output into `log` and fail with
/// `ApplicationError::InvocationFailed` on spawn failure or non-zero exit.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    fn execute(&self, invocation: &ProcessInvocation, log: &LogStream) -> KilnResult<()>;
}

/// Port for running a command inside a container image.
///
/// Same output and failure contract as [`ProcessRunner`].
#[cfg_attr(test, mockall::automock)]
pub trait ContainerRunner: Send + Sync {
    fn run_container(&self, invocation: &ContainerInvocation, log: &LogStream) -> KilnResult<()>;
}

/// Port for retrieving a template tree.
///
/// Implemented by:
/// - `kiln_adapters::fetcher::LocalDirFetcher`
/// - `kiln_adapters::fetcher::GitFetcher`
/// - `kiln_adapters::fetcher::SourceFetcher` (dispatches on the locator)
#[cfg_attr(test, mockall::automock)]
pub trait ContentFetcher: Send + Sync {
    /// Populate `destination` with the template's files.
    fn fetch(&self, source: &SourceLocator, destination: &Path) -> KilnResult<()>;
}
