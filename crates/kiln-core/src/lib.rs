//! Kiln Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Kiln, a
//! runner that materializes Copier-style templates either with a locally
//! installed engine or inside a container, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             kiln-cli (CLI)              │
//! │      (Implements Driving Ports)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (FetchTemplateAction, RenderExecutor)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, EngineProbe, Runners, ...) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      kiln-adapters (Infrastructure)     │
//! │ (LocalFilesystem, DockerCliRunner, ...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Values, StagingLayout, SourceLocator)  │
//! │         No I/O, no processes            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kiln_core::prelude::*;
//! use std::path::Path;
//!
//! # fn adapters() -> (std::sync::Arc<dyn Filesystem>, std::sync::Arc<dyn EngineProbe>,
//! #     std::sync::Arc<dyn ProcessRunner>, std::sync::Arc<dyn ContentFetcher>) { unimplemented!() }
//! let (filesystem, probe, runner, fetcher) = adapters();
//!
//! // 1. Build the executor (with injected adapters)
//! let executor = RenderExecutor::new(filesystem.clone(), probe, runner);
//!
//! // 2. Describe the request
//! let values = CallerValues::try_from_value(serde_json::json!({"name": "svc"})).unwrap();
//! let request = FetchRequest::new("https://github.com/acme/tpl.git", values);
//!
//! // 3. Run the action
//! let action = FetchTemplateAction::new(fetcher, filesystem, executor);
//! action
//!     .execute(&request, Path::new("/tmp/ws"), Path::new("."), &LogStream::new())
//!     .unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        FetchOutcome, FetchTemplateAction, RenderExecutor, RenderOptions, RenderOutcome,
        RenderRequest, ValueMerger,
        ports::{
            ContainerInvocation, ContainerRunner, ContentFetcher, EngineProbe, Filesystem,
            LogStream, OutputStream, ProcessInvocation, ProcessRunner,
        },
    };
    pub use crate::domain::{
        CallerValues, EngineAvailability, EngineSpec, FetchRequest, OutputSelection,
        SourceLocator, StagingLayout, Strategy, StrategyPreference, TemplateDefaults,
    };
    pub use crate::error::{ErrorCategory, KilnError, KilnResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
