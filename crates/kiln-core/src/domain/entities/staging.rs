//! Per-invocation staging directories.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::EngineSpec;

const TEMPLATE_DIR: &str = "template";
const INTERMEDIATE_DIR: &str = "intermediate";
const RESULT_DIR: &str = "result";

/// Filesystem locations scoped to one render.
///
/// ```text
/// <workspace>/
/// ├── template/
/// │   ├── <defaults file>      manifest written before the render
/// │   └── <template subdir>/   fetched template tree
/// ├── intermediate/            raw engine output, one entry expected
/// └── result/                  the entry above, renamed
/// ```
///
/// Nothing here is deleted by the core; the caller owns cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    workspace: PathBuf,
    template_dir: PathBuf,
    template_contents_dir: PathBuf,
    intermediate_dir: PathBuf,
    result_dir: PathBuf,
    template_subdir: String,
}

impl StagingLayout {
    pub fn new(workspace: impl Into<PathBuf>, engine: &EngineSpec) -> Self {
        let workspace = workspace.into();
        let template_dir = workspace.join(TEMPLATE_DIR);
        Self {
            template_contents_dir: template_dir.join(&engine.template_subdir),
            intermediate_dir: workspace.join(INTERMEDIATE_DIR),
            result_dir: workspace.join(RESULT_DIR),
            template_subdir: engine.template_subdir.clone(),
            template_dir,
            workspace,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Holds the template tree and the values manifest.
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Where the fetched template tree lives.
    pub fn template_contents_dir(&self) -> &Path {
        &self.template_contents_dir
    }

    pub fn intermediate_dir(&self) -> &Path {
        &self.intermediate_dir
    }

    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    /// Destination handed to a locally installed engine.
    pub fn local_destination(&self) -> PathBuf {
        self.intermediate_dir.join(&self.template_subdir)
    }
}
