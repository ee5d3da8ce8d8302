//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the [`EngineSpec`] and
//! [`RenderOptions`] derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `KILN_<SECTION>__<KEY>`, e.g. `KILN_CONTAINER__RUNTIME=podman`
//! 3. `.kiln.toml` in the current directory
//! 4. Config file (`--config`, or the per-user config path)
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use kiln_core::{
    application::RenderOptions,
    domain::{EngineSpec, OutputSelection, StrategyPreference},
};

/// File name of the per-directory configuration.
pub const LOCAL_CONFIG_FILE: &str = ".kiln.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How to invoke the templating engine.
    pub engine: EngineConfig,
    /// Container fallback settings.
    pub container: ContainerConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub command: String,
    pub copy_subcommand: String,
    pub data_flag: String,
    pub trust_flag: String,
    pub defaults_file: String,
    pub template_subdir: String,
    pub strategy: StrategyPreference,
    pub output_selection: OutputSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// `docker` or `podman`.
    pub runtime: String,
    pub image: String,
    /// `HOME` inside the container.
    pub home: String,
    /// Run as the owner of the staging directory.
    pub map_user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let engine = EngineSpec::default();
        Self {
            command: engine.command,
            copy_subcommand: engine.copy_subcommand,
            data_flag: engine.data_flag,
            trust_flag: engine.trust_flag,
            defaults_file: engine.defaults_file,
            template_subdir: engine.template_subdir,
            strategy: StrategyPreference::default(),
            output_selection: OutputSelection::default(),
        }
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        let engine = EngineSpec::default();
        Self {
            runtime: "docker".into(),
            image: engine.default_image,
            home: engine.container_home,
            map_user: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then files, then the environment.
    ///
    /// An explicit `config_file` must exist; the per-user and local files
    /// are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                File::from(Path::new(LOCAL_CONFIG_FILE))
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("KILN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        config
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Engine description for the core.
    pub fn engine_spec(&self) -> EngineSpec {
        EngineSpec {
            command: self.engine.command.clone(),
            copy_subcommand: self.engine.copy_subcommand.clone(),
            data_flag: self.engine.data_flag.clone(),
            trust_flag: self.engine.trust_flag.clone(),
            defaults_file: self.engine.defaults_file.clone(),
            template_subdir: self.engine.template_subdir.clone(),
            default_image: self.container.image.clone(),
            container_home: self.container.home.clone(),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            engine: self.engine_spec(),
            strategy: self.engine.strategy,
            output_selection: self.engine.output_selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_describe_copier() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.engine.command, "copier");
        assert_eq!(cfg.container.image, "tobiasestefors/copier:7.0.1");
        assert_eq!(cfg.engine.strategy, StrategyPreference::Auto);
        assert_eq!(cfg.engine_spec(), EngineSpec::copier());
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kiln.toml");
        std::fs::write(
            &path,
            r#"
[engine]
strategy = "container"
output_selection = "first-by-name"

[container]
runtime = "podman"
"#,
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.engine.strategy, StrategyPreference::Container);
        assert_eq!(cfg.engine.output_selection, OutputSelection::FirstByName);
        assert_eq!(cfg.container.runtime, "podman");
        // Untouched keys keep their defaults.
        assert_eq!(cfg.engine.data_flag, "--data");
        assert!(cfg.container.map_user);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn invalid_strategy_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kiln.toml");
        std::fs::write(&path, "[engine]\nstrategy = \"sometimes\"\n").unwrap();

        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn default_config_serialises_to_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[engine]"));
        assert!(text.contains("strategy = \"auto\""));
        assert!(text.contains("output_selection = \"strict\""));
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
