//! Fetch Action - retrieve a template, render it and copy the result out.
//!
//! This is the top-level use case driven by the CLI:
//! 1. Validate the request
//! 2. Fetch the template tree into the staging workspace
//! 3. Render it with [`RenderExecutor`]
//! 4. Copy the rendered tree into the output root

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ports::{ContentFetcher, Filesystem, LogStream},
        services::render_executor::{RenderExecutor, RenderRequest},
    },
    domain::{
        DomainValidator as validator, FetchRequest, SourceLocator, StagingLayout, Strategy,
    },
    error::KilnResult,
};

/// What a successful fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Where the rendered files were copied to.
    pub output_dir: PathBuf,
    /// The staged render result, still inside the workspace.
    pub result_dir: PathBuf,
    pub strategy: Strategy,
    pub source: SourceLocator,
}

/// Materializes a template into a directory.
pub struct FetchTemplateAction {
    fetcher: Arc<dyn ContentFetcher>,
    filesystem: Arc<dyn Filesystem>,
    executor: RenderExecutor,
}

impl FetchTemplateAction {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        filesystem: Arc<dyn Filesystem>,
        executor: RenderExecutor,
    ) -> Self {
        Self {
            fetcher,
            filesystem,
            executor,
        }
    }

    pub fn executor(&self) -> &RenderExecutor {
        &self.executor
    }

    /// Run the whole action.
    ///
    /// `workspace` is a scratch directory owned by the caller; `output_root`
    /// is the directory the request's target path is resolved against.
    #[instrument(
        skip_all,
        fields(
            source = %request.source,
            workspace = %workspace.display(),
            output_root = %output_root.display(),
        )
    )]
    pub fn execute(
        &self,
        request: &FetchRequest,
        workspace: &Path,
        output_root: &Path,
        log: &LogStream,
    ) -> KilnResult<FetchOutcome> {
        // 1. Validate before any I/O
        validator::validate_request(request)?;
        let source = SourceLocator::parse(&request.source, request.base_dir.as_deref())?;
        let output_dir = validator::validate_target_path(output_root, request)?;

        // 2. Fetch
        let layout = StagingLayout::new(workspace, &self.executor.options().engine);
        self.filesystem.create_dir_all(layout.template_dir())?;
        info!(%source, "Fetching template");
        self.fetcher.fetch(&source, layout.template_contents_dir())?;

        // 3. Render
        let render = RenderRequest::new(layout, request.values.clone())
            .with_log(log.clone())
            .with_image_name(request.image_name.clone());
        let outcome = self.executor.run(&render)?;

        // 4. Copy out
        self.filesystem
            .copy_dir_all(&outcome.result_dir, &output_dir)?;
        info!(output = %output_dir.display(), "Template materialized");

        Ok(FetchOutcome {
            output_dir,
            result_dir: outcome.result_dir,
            strategy: outcome.strategy,
            source,
        })
    }
}
