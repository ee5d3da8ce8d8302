//! Template content fetchers.

mod git;
mod local;

use std::path::Path;

use kiln_core::{
    application::ports::ContentFetcher, domain::SourceLocator, error::KilnResult,
};

pub use git::GitFetcher;
pub use local::LocalDirFetcher;

/// Dispatches to the local or git fetcher depending on the locator.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    local: LocalDirFetcher,
    git: GitFetcher,
}

impl SourceFetcher {
    pub fn new(local: LocalDirFetcher, git: GitFetcher) -> Self {
        Self { local, git }
    }
}

impl ContentFetcher for SourceFetcher {
    fn fetch(&self, source: &SourceLocator, destination: &Path) -> KilnResult<()> {
        match source {
            SourceLocator::Local(_) => self.local.fetch(source, destination),
            SourceLocator::Git { .. } => self.git.fetch(source, destination),
        }
    }
}
