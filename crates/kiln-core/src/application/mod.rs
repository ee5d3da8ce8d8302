//! Application layer for Kiln.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (FetchTemplateAction, RenderExecutor, ValueMerger)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. Merge rules and path guardrails live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    FetchOutcome, FetchTemplateAction, PreparedValues, RenderExecutor, RenderOptions,
    RenderOutcome, RenderRequest, ValueMerger,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ContainerInvocation, ContainerRunner, ContentFetcher, EngineProbe, Filesystem, LogStream,
    Mount, OutputStream, ProcessInvocation, ProcessRunner,
};

pub use error::ApplicationError;
