//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Materialize Copier templates, locally or in a container",
    long_about = "Kiln fetches a Copier template, renders it with the locally \
                  installed engine (or a container image when it is missing), \
                  and copies the result into your project.",
    after_help = "EXAMPLES:\n\
        \x20 kiln fetch ./templates/service --set name=billing --target-path services/billing\n\
        \x20 kiln fetch https://github.com/acme/tpl.git#v2 --values @values.json\n\
        \x20 kiln probe\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch a template, render it and copy the result out.
    #[command(
        visible_alias = "f",
        about = "Fetch and render a template",
        after_help = "EXAMPLES:\n\
            \x20 kiln fetch ./tpl --set name=svc\n\
            \x20 kiln fetch git@github.com:acme/tpl.git#main --values '{\"name\": \"svc\"}' -o ./out\n\
            \x20 kiln fetch ./tpl --strategy container --image registry.local/copier:9"
    )]
    Fetch(FetchArgs),

    /// Report whether the engine and a container runtime are available.
    #[command(about = "Check engine and container runtime availability")]
    Probe,

    /// Initialise a Kiln configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kiln init           # per-user config\n\
            \x20 kiln init --local   # .kiln.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get engine.strategy\n\
            \x20 kiln config list\n\
            \x20 kiln config path"
    )]
    Config(ConfigCommands),
}

// ── fetch ─────────────────────────────────────────────────────────────────────

/// Arguments for `kiln fetch`.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Template location: a directory, `file://` URL or git URL (`#ref` selects a branch or tag).
    #[arg(value_name = "SOURCE", help = "Template directory or git URL")]
    pub source: String,

    /// Sub-path of the output directory to place the rendered files in.
    #[arg(
        short = 't',
        long = "target-path",
        value_name = "PATH",
        help = "Path inside the output directory (default: .)"
    )]
    pub target_path: Option<String>,

    /// Directory the target path is resolved against.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Template values as a JSON object, or `@FILE` to read one.
    #[arg(long = "values", value_name = "JSON|@FILE", help = "Values as JSON or @file")]
    pub values: Option<String>,

    /// Individual values, applied after `--values`.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        help = "Set one value (repeatable; VALUE is parsed as JSON when possible)"
    )]
    pub set: Vec<String>,

    /// Glob patterns copied verbatim instead of rendered, as a JSON array.
    #[arg(
        long = "copy-without-render",
        value_name = "JSON",
        help = "JSON array of paths to copy without rendering"
    )]
    pub copy_without_render: Option<String>,

    /// Jinja extensions to load, as a JSON array.
    #[arg(long = "extensions", value_name = "JSON", help = "JSON array of Jinja extensions")]
    pub extensions: Option<String>,

    /// Container image used when the engine is not installed.
    #[arg(long = "image", value_name = "IMAGE", help = "Container image override")]
    pub image: Option<String>,

    /// Staging directory instead of a fresh temporary one. Kept afterwards.
    #[arg(long = "workdir", value_name = "DIR", help = "Staging directory to use")]
    pub workdir: Option<PathBuf>,

    /// Keep the temporary staging directory.
    #[arg(long = "keep-workspace", help = "Keep the staging directory afterwards")]
    pub keep_workspace: bool,

    /// Override `engine.strategy` from the configuration.
    #[arg(long = "strategy", value_enum, help = "Where to run the engine")]
    pub strategy: Option<StrategyArg>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Write into a non-empty directory without asking"
    )]
    pub yes: bool,
}

/// Execution strategy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Local engine when installed, container otherwise.
    Auto,
    /// Local engine only.
    Local,
    /// Container only.
    #[value(alias = "docker")]
    Container,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.kiln.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kiln config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `engine.strategy`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the per-user configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_fetch_command() {
        let cli = Cli::parse_from([
            "kiln",
            "fetch",
            "./tpl",
            "--set",
            "name=svc",
            "--set",
            "port=8080",
            "--target-path",
            "services/svc",
        ]);
        let Commands::Fetch(args) = cli.command else {
            panic!("expected Fetch command");
        };
        assert_eq!(args.source, "./tpl");
        assert_eq!(args.set, vec!["name=svc", "port=8080"]);
        assert_eq!(args.target_path.as_deref(), Some("services/svc"));
        assert!(args.strategy.is_none());
    }

    #[test]
    fn docker_is_an_alias_for_container() {
        let cli = Cli::parse_from(["kiln", "fetch", "./tpl", "--strategy", "docker"]);
        let Commands::Fetch(args) = cli.command else {
            panic!("expected Fetch command");
        };
        assert_eq!(args.strategy, Some(StrategyArg::Container));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["kiln", "--quiet", "--verbose", "probe"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_fetch_list_options() {
        let cli = Cli::parse_from([
            "kiln",
            "fetch",
            "./tpl",
            "--copy-without-render",
            r#"["*.png"]"#,
            "--extensions",
            r#"["jinja2_time.TimeExtension"]"#,
        ]);
        let Commands::Fetch(args) = cli.command else {
            panic!("expected Fetch command");
        };
        assert_eq!(args.copy_without_render.as_deref(), Some(r#"["*.png"]"#));
        assert_eq!(args.extensions.as_deref(), Some(r#"["jinja2_time.TimeExtension"]"#));
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["kiln", "probe", "--output-format", "json", "-q", "-c", "k.toml"]);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
        assert!(cli.global.quiet);
        assert_eq!(cli.global.config, Some(PathBuf::from("k.toml")));
    }

    #[test]
    fn fetch_requires_source() {
        assert!(Cli::try_parse_from(["kiln", "fetch"]).is_err());
    }
}
