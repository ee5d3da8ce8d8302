//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: Staging and copy operations
//!   - `EngineProbe`: Is the engine installed?
//!   - `ProcessRunner` / `ContainerRunner`: Run the engine
//!   - `ContentFetcher`: Retrieve the template tree
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ContainerInvocation, ContainerRunner, ContentFetcher, EngineProbe, Filesystem, LogStream,
    Mount, OutputStream, ProcessInvocation, ProcessRunner,
};

#[cfg(test)]
pub use output::{
    MockContainerRunner, MockContentFetcher, MockEngineProbe, MockFilesystem, MockProcessRunner,
};
