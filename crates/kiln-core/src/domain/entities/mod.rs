pub mod common;
pub mod request;
pub mod source;
pub mod staging;
pub mod values;

pub use crate::domain::DomainError;
pub use common::resolve_within;
pub use request::FetchRequest;
pub use source::SourceLocator;
pub use staging::StagingLayout;
pub use values::{
    CallerValues, DESTINATION_KEY, ManifestValues, MergedValues, RenderArgument, RenderArguments,
    TemplateDefaults, ValueMap,
};
