//! Git fetcher.
//!
//! Uses the `git` CLI via `std::process::Command`: shallow clones, refs and
//! credential helpers all work the way the user's git is configured.

use std::path::Path;
use std::process::Command;

use kiln_core::{
    application::{ApplicationError, ports::ContentFetcher},
    domain::SourceLocator,
    error::{KilnError, KilnResult},
};
use tracing::{debug, instrument, warn};

/// Shallow-clones a git repository into the staging workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitFetcher {
    program: String,
}

impl GitFetcher {
    pub fn new() -> Self {
        Self {
            program: "git".into(),
        }
    }

    /// Use a different git binary.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments for `git clone`, destination last.
    pub fn clone_args(url: &str, reference: Option<&str>, destination: &Path) -> Vec<String> {
        let mut args = vec!["clone".to_string(), "--depth".into(), "1".into()];
        if let Some(reference) = reference {
            args.push("--branch".into());
            args.push(reference.into());
            args.push("--single-branch".into());
        }
        args.push(url.into());
        args.push(destination.display().to_string());
        args
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFetcher for GitFetcher {
    #[instrument(skip_all, fields(source = %source))]
    fn fetch(&self, source: &SourceLocator, destination: &Path) -> KilnResult<()> {
        let SourceLocator::Git { url, reference } = source else {
            return Err(KilnError::Internal {
                message: format!("git fetcher given a non-git source: {source}"),
            });
        };

        let fetch_failed = |reason: String| -> KilnError {
            ApplicationError::FetchFailed {
                locator: source.to_string(),
                reason,
            }
            .into()
        };

        let output = Command::new(&self.program)
            .args(Self::clone_args(url, reference.as_deref(), destination))
            .output()
            .map_err(|e| fetch_failed(format!("could not run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fetch_failed(stderr.trim().to_string()));
        }

        // Only the working tree is part of the template.
        let git_dir = destination.join(".git");
        if let Err(e) = std::fs::remove_dir_all(&git_dir) {
            warn!(path = %git_dir.display(), error = %e, "Could not remove .git from clone");
        }

        debug!(destination = %destination.display(), "Clone complete");
        Ok(())
    }
}
