//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "render a staged template" or "fetch a template".

pub mod fetch_action;
pub mod render_executor;
pub mod value_merger;

pub use fetch_action::{FetchOutcome, FetchTemplateAction};
pub use render_executor::{RenderExecutor, RenderOptions, RenderOutcome, RenderRequest};
pub use value_merger::{PreparedValues, ValueMerger};
