//! Fetcher for templates already on disk.

use std::path::Path;

use kiln_core::{
    application::{
        ApplicationError,
        ports::{ContentFetcher, Filesystem},
    },
    domain::SourceLocator,
    error::{KilnError, KilnResult},
};
use tracing::{debug, instrument};

use crate::filesystem::LocalFilesystem;

/// Copies a local template directory into the staging workspace.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDirFetcher {
    filesystem: LocalFilesystem,
}

impl LocalDirFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentFetcher for LocalDirFetcher {
    #[instrument(skip_all, fields(source = %source))]
    fn fetch(&self, source: &SourceLocator, destination: &Path) -> KilnResult<()> {
        let SourceLocator::Local(path) = source else {
            return Err(KilnError::Internal {
                message: format!("local fetcher given a non-local source: {source}"),
            });
        };

        if !path.is_dir() {
            return Err(ApplicationError::FetchFailed {
                locator: source.to_string(),
                reason: "not a directory".into(),
            }
            .into());
        }

        debug!(from = %path.display(), to = %destination.display(), "Copying template");
        self.filesystem.copy_dir_all(path, destination)
    }
}
