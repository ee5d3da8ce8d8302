//! Implementation of the `kiln fetch` command.
//!
//! Responsibility: translate CLI arguments into a core `FetchRequest`, wire
//! the adapters together, and display results. No business logic lives here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

use kiln_adapters::{
    DockerCliRunner, LocalFilesystem, LocalProcessRunner, SourceFetcher, WhichProbe,
};
use kiln_core::{
    application::{FetchOutcome, FetchTemplateAction, LogStream, RenderExecutor, RenderOptions},
    domain::{CallerValues, FetchRequest, StrategyPreference},
};

use crate::{
    cli::{FetchArgs, StrategyArg, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `kiln fetch` command.
///
/// Dispatch sequence:
/// 1. Parse values and build the request
/// 2. Confirm before writing into a non-empty directory
/// 3. Prepare the staging workspace
/// 4. Run the fetch action
/// 5. Keep or discard the workspace, then report
#[instrument(skip_all, fields(source = %args.source))]
pub fn execute(
    args: FetchArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Request
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read current directory")?;
    let values = parse_values(args.values.as_deref(), &args.set, &cwd)?;
    let request = build_request(&args, values, &cwd)?;
    let output_root = args
        .output
        .as_deref()
        .map_or_else(|| cwd.clone(), |dir| cwd.join(dir));
    let options = render_options(&config, args.strategy);

    debug!(
        strategy = %options.strategy,
        output_root = %output_root.display(),
        values = request.values.as_map().len(),
        "Fetch request resolved"
    );

    // 2. Confirm
    let destination = output_root.join(args.target_path.as_deref().unwrap_or("."));
    if needs_confirmation(&args, &global, &destination) && !confirm(&destination)? {
        return Err(CliError::Cancelled);
    }

    // 3. Workspace
    let workspace = Workspace::create(args.workdir.as_deref(), &cwd)?;

    // 4. Run
    let action = build_action(&config, options);
    let spinner = output.spinner(&format!("Rendering {}", args.source));
    let progress = spinner.clone();
    let log = LogStream::new().with_sink(move |_, line| progress.set_message(line.to_owned()));

    let result = action.execute(&request, workspace.path(), &output_root, &log);
    spinner.finish_and_clear();

    // 5. Workspace retention + report
    let keep = args.keep_workspace || result.is_err();
    let kept = workspace.finish(keep);
    if let Some(path) = &kept {
        info!(workspace = %path.display(), "Workspace kept");
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(path) = &kept {
                warn!(workspace = %path.display(), "Render failed; staging left in place");
                output.info(&format!("Staging directory kept at {}", path.display()))?;
            }
            return Err(CliError::Core(err));
        }
    };

    report(&outcome, kept.as_deref(), &output)
}

// ── Request construction ──────────────────────────────────────────────────────

fn build_request(args: &FetchArgs, values: CallerValues, cwd: &Path) -> CliResult<FetchRequest> {
    let mut request = FetchRequest::new(args.source.clone(), values).with_base_dir(cwd);
    if let Some(target) = &args.target_path {
        request = request.with_target_path(target.clone());
    }
    if let Some(image) = &args.image {
        request = request.with_image_name(image.clone());
    }
    if let Some(raw) = &args.copy_without_render {
        request = request.with_copy_without_render(parse_json_option("--copy-without-render", raw)?);
    }
    if let Some(raw) = &args.extensions {
        request = request.with_extensions(parse_json_option("--extensions", raw)?);
    }
    Ok(request)
}

/// Parse a JSON flag value. Whether it has the right shape is left to
/// `FetchRequest::validate`.
fn parse_json_option(flag: &str, raw: &str) -> CliResult<Value> {
    serde_json::from_str(raw).map_err(|e| CliError::InvalidInput {
        message: format!("{flag} is not valid JSON: {e}"),
        source: Some(Box::new(e)),
    })
}

fn render_options(config: &AppConfig, strategy: Option<StrategyArg>) -> RenderOptions {
    let mut options = config.render_options();
    if let Some(strategy) = strategy {
        options.strategy = match strategy {
            StrategyArg::Auto => StrategyPreference::Auto,
            StrategyArg::Local => StrategyPreference::Local,
            StrategyArg::Container => StrategyPreference::Container,
        };
    }
    options
}

fn build_action(config: &AppConfig, options: RenderOptions) -> FetchTemplateAction {
    let filesystem = Arc::new(LocalFilesystem::new());
    let runner = DockerCliRunner::new(config.container.runtime.clone())
        .with_map_user(config.container.map_user);

    let executor = RenderExecutor::new(
        filesystem.clone(),
        Arc::new(WhichProbe::new()),
        Arc::new(LocalProcessRunner::new()),
    )
    .with_container_runner(Arc::new(runner))
    .with_options(options);

    FetchTemplateAction::new(Arc::new(SourceFetcher::default()), filesystem, executor)
}

/// Build caller values from `--values` and then each `--set`.
pub fn parse_values(values: Option<&str>, sets: &[String], cwd: &Path) -> CliResult<CallerValues> {
    let mut caller = match values {
        Some(raw) => {
            let text = match raw.strip_prefix('@') {
                Some(file) => std::fs::read_to_string(cwd.join(file))
                    .with_cli_context(|| format!("Failed to read values file '{file}'"))?,
                None => raw.to_owned(),
            };
            let document: Value = serde_json::from_str(&text).map_err(|e| CliError::InvalidInput {
                message: format!("--values is not valid JSON: {e}"),
                source: Some(Box::new(e)),
            })?;
            CallerValues::try_from_value(document).map_err(|e| CliError::Core(e.into()))?
        }
        None => CallerValues::default(),
    };

    for assignment in sets {
        let (key, value) = parse_assignment(assignment)?;
        caller.insert(key, value);
    }

    Ok(caller)
}

/// `KEY=VALUE`; the value is JSON when it parses as JSON, a string otherwise.
fn parse_assignment(assignment: &str) -> CliResult<(String, Value)> {
    let Some((key, raw)) = assignment.split_once('=') else {
        return Err(CliError::InvalidInput {
            message: format!("--set expects KEY=VALUE, got '{assignment}'"),
            source: None,
        });
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidInput {
            message: format!("--set has an empty key in '{assignment}'"),
            source: None,
        });
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok((key.to_owned(), value))
}

// ── Workspace ─────────────────────────────────────────────────────────────────

/// Staging directory for one run.
enum Workspace {
    /// Supplied with `--workdir`, made absolute; never removed.
    Fixed(PathBuf),
    Temporary(TempDir),
}

impl Workspace {
    /// A relative `workdir` is taken from `cwd`. Its paths end up as
    /// container bind mounts, which must be absolute.
    fn create(workdir: Option<&Path>, cwd: &Path) -> CliResult<Self> {
        match workdir {
            Some(dir) => {
                let dir = cwd.join(dir);
                std::fs::create_dir_all(&dir).with_cli_context(|| {
                    format!("Failed to create workspace '{}'", dir.display())
                })?;
                Ok(Self::Fixed(dir))
            }
            None => tempfile::Builder::new()
                .prefix("kiln-")
                .tempdir()
                .map(Self::Temporary)
                .with_cli_context(|| "Failed to create temporary workspace"),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Fixed(path) => path,
            Self::Temporary(dir) => dir.path(),
        }
    }

    /// Remove a temporary workspace unless `keep`; returns the path left behind.
    fn finish(self, keep: bool) -> Option<PathBuf> {
        match self {
            Self::Fixed(path) => Some(path),
            Self::Temporary(dir) if keep => Some(dir.keep()),
            Self::Temporary(dir) => {
                let path = dir.path().to_path_buf();
                if let Err(e) = dir.close() {
                    warn!(workspace = %path.display(), error = %e, "Failed to remove workspace");
                }
                None
            }
        }
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn needs_confirmation(args: &FetchArgs, global: &GlobalArgs, destination: &Path) -> bool {
    !args.yes && !global.quiet && std::io::stdin().is_terminal() && is_non_empty_dir(destination)
}

fn is_non_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

#[cfg(feature = "interactive")]
fn confirm(destination: &Path) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "{} is not empty. Write the rendered files into it?",
            destination.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "Failed to read confirmation".into(),
            source: std::io::Error::other(e.to_string()),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_destination: &Path) -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

fn report(outcome: &FetchOutcome, workspace: Option<&Path>, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output.json(&json!({
            "output_dir": outcome.output_dir.display().to_string(),
            "strategy": outcome.strategy.to_string(),
            "source": outcome.source.to_string(),
            "workspace": workspace.map(|p| p.display().to_string()),
        }))?;
        return Ok(());
    }

    output.success(&format!(
        "Rendered into {} ({})",
        outcome.output_dir.display(),
        outcome.strategy,
    ))?;
    if let Some(path) = workspace {
        output.info(&format!("Staging directory kept at {}", path.display()))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
