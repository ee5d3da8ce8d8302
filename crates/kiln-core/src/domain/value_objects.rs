//! Value objects describing the templating engine and how a render runs.
//!
//! Everything engine-specific (binary name, flags, file names, container
//! image) lives in [`EngineSpec`] so a different engine with the same
//! invocation shape only needs different configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Mount point of the template directory inside the container.
pub const CONTAINER_INPUT: &str = "/input";

/// Mount point of the intermediate output directory inside the container.
pub const CONTAINER_OUTPUT: &str = "/output";

// ============================================================================
// EngineSpec
// ============================================================================

/// How to invoke the external templating engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSpec {
    /// Executable name, looked up on `PATH` and used as the container command.
    pub command: String,
    /// Subcommand that renders a template into a new directory.
    pub copy_subcommand: String,
    /// Flag preceding every `key=value` data argument.
    pub data_flag: String,
    /// Flag allowing template-defined hooks to run.
    pub trust_flag: String,
    /// Defaults file read from the template and rewritten as the manifest.
    pub defaults_file: String,
    /// Directory name the template tree is fetched into.
    pub template_subdir: String,
    /// Image used when the engine has to run in a container.
    pub default_image: String,
    /// Writable `HOME` inside the container.
    pub container_home: String,
}

impl EngineSpec {
    /// Copier, the default engine.
    pub fn copier() -> Self {
        Self {
            command: "copier".into(),
            copy_subcommand: "copy".into(),
            data_flag: "--data".into(),
            trust_flag: "--trust".into(),
            defaults_file: "copier.json".into(),
            template_subdir: "copier".into(),
            default_image: "tobiasestefors/copier:7.0.1".into(),
            container_home: "/tmp".into(),
        }
    }
}

impl Default for EngineSpec {
    fn default() -> Self {
        Self::copier()
    }
}

// ============================================================================
// EngineAvailability
// ============================================================================

/// Result of probing for a locally installed engine.
///
/// A missing binary is an ordinary answer, not an error. `ProbeError` is kept
/// separate so that a broken `PATH` lookup is never mistaken for "not installed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAvailability {
    Available(PathBuf),
    NotFound,
    ProbeError(String),
}

impl EngineAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

// ============================================================================
// Strategy
// ============================================================================

/// The execution path a render actually took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Local,
    Container,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Container => write!(f, "container"),
        }
    }
}

/// Which execution path the caller allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyPreference {
    /// Probe for a local engine and fall back to a container.
    #[default]
    Auto,
    /// Require the local engine.
    Local,
    /// Always use the container runner, without probing.
    #[serde(alias = "docker")]
    Container,
}

impl fmt::Display for StrategyPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Local => write!(f, "local"),
            Self::Container => write!(f, "container"),
        }
    }
}

impl FromStr for StrategyPreference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "local" => Ok(Self::Local),
            "container" | "docker" => Ok(Self::Container),
            other => Err(DomainError::InvalidInput {
                field: "strategy".into(),
                reason: format!("unknown strategy '{other}' (expected auto, local or container)"),
            }),
        }
    }
}

// ============================================================================
// OutputSelection
// ============================================================================

/// Rule for picking the rendered entry out of the intermediate directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputSelection {
    /// Exactly one entry must exist.
    #[default]
    Strict,
    /// Take the lexicographically smallest entry name.
    FirstByName,
}

/// Outcome of applying an [`OutputSelection`] to a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPick<'a> {
    Single(&'a str),
    Empty,
    Ambiguous,
}

impl OutputSelection {
    pub fn pick<'a>(self, entries: &'a [String]) -> OutputPick<'a> {
        match (self, entries) {
            (_, []) => OutputPick::Empty,
            (_, [only]) => OutputPick::Single(only),
            (Self::Strict, _) => OutputPick::Ambiguous,
            (Self::FirstByName, many) => many
                .iter()
                .min()
                .map_or(OutputPick::Empty, |name| OutputPick::Single(name)),
        }
    }
}

impl fmt::Display for OutputSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::FirstByName => write!(f, "first-by-name"),
        }
    }
}

impl FromStr for OutputSelection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "first-by-name" | "first_by_name" | "first" => Ok(Self::FirstByName),
            other => Err(DomainError::InvalidInput {
                field: "output_selection".into(),
                reason: format!("unknown selection '{other}' (expected strict or first-by-name)"),
            }),
        }
    }
}
