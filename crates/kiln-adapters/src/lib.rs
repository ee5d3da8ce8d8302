//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln-core::application::ports`.
//! It contains all external dependencies and I/O operations: the filesystem,
//! child processes, the container CLI, `PATH` lookup and git.

pub mod fetcher;
pub mod filesystem;
pub mod probe;
pub mod process;

// Re-export commonly used adapters
pub use fetcher::{GitFetcher, LocalDirFetcher, SourceFetcher};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use probe::WhichProbe;
pub use process::{DockerCliRunner, LocalProcessRunner};
