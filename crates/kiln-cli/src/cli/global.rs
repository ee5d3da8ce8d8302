//! Flags shared by every kiln subcommand.
//!
//! Flattened into [`super::Cli`]; `main` reads them before the config is
//! loaded, so they decide logging and where the config comes from.

use clap::Args;
use std::path::PathBuf;

/// Global arguments for all commands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log level on stderr.
    ///
    /// The engine's own stdout/stderr lines are logged on the `kiln::engine`
    /// target at INFO, so `-v` is the level at which a render becomes
    /// visible line by line. Without it they only show up in the error
    /// report when the engine fails.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Show more log output (-v engine lines, -vv debug, -vvv trace)",
        long_help = "Log level on stderr:
    (none)  - warnings and errors only
    -v      - progress plus every line the engine prints
    -vv     - strategy selection, staging paths, container arguments
    -vvv    - everything"
    )]
    pub verbose: u8,

    /// Errors only.
    ///
    /// Also counts as consent for `fetch` to write into a non-empty output
    /// directory, since no prompt is shown.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print errors only; never prompt before writing"
    )]
    pub quiet: bool,

    /// Plain error reports and log lines. Set by `NO_COLOR` as well.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Replaces the per-user `config.toml` (see `kiln config path`).
    ///
    /// `.kiln.toml` in the working directory and `KILN_*` variables are
    /// still layered on top. A missing file here is an error, unlike the
    /// per-user file.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "KILN_CONFIG",
        value_name = "FILE",
        help = "Use this config file instead of the per-user one"
    )]
    pub config: Option<PathBuf>,

    /// `auto` falls back to `output.format` in the config, then to `human`
    /// on a terminal and `plain` otherwise.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Report format for fetch, probe and config"
    )]
    pub output_format: OutputFormat,
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Decided from config and whether stdout is a terminal.
    #[default]
    Auto,
    /// Coloured status lines and a spinner while the engine runs.
    Human,
    /// Status lines without colour or spinner.
    Plain,
    /// One JSON document per command on stdout; logs on stderr become JSON too.
    Json,
}
