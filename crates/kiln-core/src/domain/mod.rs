// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Kiln.
//!
//! This module contains pure logic: value merging, argument flattening,
//! staging layout, source parsing and path guardrails. All I/O and process
//! execution is handled via ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Few external crates**: std, thiserror, and serde_json for template values
//! - **Immutable values**: Derived views are computed, never mutated in place
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    CallerValues, DESTINATION_KEY, FetchRequest, ManifestValues, MergedValues, RenderArgument,
    RenderArguments, SourceLocator, StagingLayout, TemplateDefaults, ValueMap, resolve_within,
};

pub use error::DomainError;

pub use value_objects::{
    CONTAINER_INPUT, CONTAINER_OUTPUT, EngineAvailability, EngineSpec, OutputPick,
    OutputSelection, Strategy, StrategyPreference,
};

pub use validation::DomainValidator;
