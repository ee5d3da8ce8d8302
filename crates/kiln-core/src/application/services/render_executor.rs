//! Render Executor - runs the templating engine over a staged template.
//!
//! The workflow is strictly linear:
//! 1. Create the intermediate directory
//! 2. Write the values manifest and derive the render arguments
//! 3. Pick local or container execution
//! 4. Run the engine
//! 5. Move the single generated entry to the result directory
//!
//! Every staging path comes from [`StagingLayout`]; nothing is cleaned up
//! here, on success or on failure.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{
            ContainerInvocation, ContainerRunner, EngineProbe, Filesystem, LogStream, Mount,
            ProcessInvocation, ProcessRunner,
        },
        services::value_merger::ValueMerger,
    },
    domain::{
        CONTAINER_INPUT, CONTAINER_OUTPUT, CallerValues, EngineAvailability, EngineSpec,
        OutputPick, OutputSelection, RenderArguments, StagingLayout, Strategy,
        StrategyPreference,
    },
    error::KilnResult,
};

/// Knobs that stay the same across renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub engine: EngineSpec,
    pub strategy: StrategyPreference,
    pub output_selection: OutputSelection,
}

/// One render.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub layout: StagingLayout,
    pub values: CallerValues,
    pub log: LogStream,
    /// Replaces the engine's default container image.
    pub image_name: Option<String>,
}

impl RenderRequest {
    pub fn new(layout: StagingLayout, values: CallerValues) -> Self {
        Self {
            layout,
            values,
            log: LogStream::new(),
            image_name: None,
        }
    }

    pub fn with_log(mut self, log: LogStream) -> Self {
        self.log = log;
        self
    }

    pub fn with_image_name(mut self, image_name: Option<String>) -> Self {
        self.image_name = image_name;
        self
    }
}

/// What a successful render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub result_dir: PathBuf,
    pub strategy: Strategy,
}

/// Runs the engine locally when installed, otherwise in a container.
pub struct RenderExecutor {
    filesystem: Arc<dyn Filesystem>,
    probe: Arc<dyn EngineProbe>,
    process_runner: Arc<dyn ProcessRunner>,
    container_runner: Option<Arc<dyn ContainerRunner>>,
    options: RenderOptions,
}

impl RenderExecutor {
    /// Create an executor that can only run the engine locally.
    ///
    /// Add a container runner with [`with_container_runner`](Self::with_container_runner)
    /// to enable the fallback.
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        probe: Arc<dyn EngineProbe>,
        process_runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            filesystem,
            probe,
            process_runner,
            container_runner: None,
            options: RenderOptions::default(),
        }
    }

    pub fn with_container_runner(mut self, runner: Arc<dyn ContainerRunner>) -> Self {
        self.container_runner = Some(runner);
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render the staged template and return where the output ended up.
    ///
    /// The template tree must already be at `layout.template_contents_dir()`.
    #[instrument(
        skip_all,
        fields(
            workspace = %request.layout.workspace().display(),
            engine = %self.options.engine.command,
        )
    )]
    pub fn run(&self, request: &RenderRequest) -> KilnResult<RenderOutcome> {
        let layout = &request.layout;
        let engine = &self.options.engine;

        // 1. Stage
        self.filesystem.create_dir_all(layout.intermediate_dir())?;

        // 2. Manifest
        let merger = ValueMerger::new(self.filesystem.as_ref(), &engine.defaults_file);
        let prepared = merger.prepare(layout, &request.values)?;

        // 3. Arguments
        let arguments = prepared.merged.render_arguments(&engine.data_flag);
        debug!(count = arguments.len(), "Render arguments prepared");

        // 4. Strategy
        let strategy = self.select_strategy()?;
        info!(%strategy, "Running templating engine");

        // 5. Render
        match strategy {
            Strategy::Local => self.render_locally(layout, &arguments, &request.log)?,
            Strategy::Container => self.render_in_container(
                layout,
                &arguments,
                request.image_name.as_deref(),
                &request.log,
            )?,
        }

        // 6. Resolve
        let result_dir = self.resolve_output(layout)?;
        info!(result = %result_dir.display(), "Render completed");

        Ok(RenderOutcome {
            result_dir,
            strategy,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn select_strategy(&self) -> KilnResult<Strategy> {
        let command = &self.options.engine.command;

        if self.options.strategy == StrategyPreference::Container {
            return Ok(Strategy::Container);
        }

        match self.probe.probe(command) {
            EngineAvailability::Available(path) => {
                debug!(path = %path.display(), "Engine found locally");
                Ok(Strategy::Local)
            }
            EngineAvailability::NotFound if self.options.strategy == StrategyPreference::Local => {
                Err(ApplicationError::EngineNotInstalled {
                    command: command.clone(),
                }
                .into())
            }
            EngineAvailability::NotFound => {
                info!("Engine not installed, falling back to container");
                Ok(Strategy::Container)
            }
            EngineAvailability::ProbeError(reason) => {
                warn!(%reason, "Engine probe failed");
                Err(ApplicationError::EngineProbeFailed {
                    command: command.clone(),
                    reason,
                }
                .into())
            }
        }
    }

    fn render_locally(
        &self,
        layout: &StagingLayout,
        arguments: &RenderArguments,
        log: &LogStream,
    ) -> KilnResult<()> {
        let engine = &self.options.engine;

        let mut args = Vec::with_capacity(arguments.len() * 2 + 4);
        args.push(engine.copy_subcommand.clone());
        args.extend(arguments.to_args());
        args.push(path_arg(layout.template_contents_dir()));
        args.push(path_arg(&layout.local_destination()));
        args.push(engine.trust_flag.clone());

        let invocation = ProcessInvocation::new(engine.command.clone(), args);
        debug!(%invocation, "Invoking local engine");
        self.process_runner.execute(&invocation, log)
    }

    fn render_in_container(
        &self,
        layout: &StagingLayout,
        arguments: &RenderArguments,
        image_name: Option<&str>,
        log: &LogStream,
    ) -> KilnResult<()> {
        let engine = &self.options.engine;
        let runner = self
            .container_runner
            .as_ref()
            .ok_or(ApplicationError::AdapterNotConfigured {
                name: "container runner",
            })?;

        let mut args = arguments.to_args();
        args.push(CONTAINER_INPUT.to_string());
        args.push(CONTAINER_OUTPUT.to_string());

        let invocation = ContainerInvocation {
            image: image_name.unwrap_or(&engine.default_image).to_string(),
            command: engine.command.clone(),
            args,
            mounts: vec![
                Mount::new(layout.template_dir(), CONTAINER_INPUT),
                Mount::new(layout.intermediate_dir(), CONTAINER_OUTPUT),
            ],
            working_dir: CONTAINER_INPUT.to_string(),
            env: BTreeMap::from([("HOME".to_string(), engine.container_home.clone())]),
        };
        debug!(%invocation, "Invoking containerised engine");
        runner.run_container(&invocation, log)
    }

    fn resolve_output(&self, layout: &StagingLayout) -> KilnResult<PathBuf> {
        let intermediate = layout.intermediate_dir();
        let entries = self.filesystem.list_dir(intermediate)?;

        let chosen = match self.options.output_selection.pick(&entries) {
            OutputPick::Single(name) => name,
            OutputPick::Empty => {
                return Err(ApplicationError::NoOutputGenerated {
                    engine: self.options.engine.command.clone(),
                    dir: intermediate.to_path_buf(),
                }
                .into());
            }
            OutputPick::Ambiguous => {
                return Err(ApplicationError::AmbiguousOutput {
                    dir: intermediate.to_path_buf(),
                    entries: entries.clone(),
                }
                .into());
            }
        };

        if entries.len() > 1 {
            warn!(chosen, count = entries.len(), "Several generated entries, using the first by name");
        }

        self.filesystem
            .rename(&intermediate.join(chosen), layout.result_dir())?;
        Ok(layout.result_dir().to_path_buf())
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
