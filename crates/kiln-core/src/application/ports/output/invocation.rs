//! Descriptions of external invocations handed to runner ports.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A command to run on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl ProcessInvocation {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            working_dir: None,
        }
    }
}

impl fmt::Display for ProcessInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A host directory bind-mounted into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: String,
}

impl Mount {
    pub fn new(host: impl Into<PathBuf>, container: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }
}

/// A command to run inside a container image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInvocation {
    pub image: String,
    pub command: String,
    pub args: Vec<String>,
    pub mounts: Vec<Mount>,
    pub working_dir: String,
    pub env: BTreeMap<String, String>,
}

impl ContainerInvocation {
    /// Container path a host directory is mounted at, if any.
    pub fn mount_for(&self, host: &std::path::Path) -> Option<&str> {
        self.mounts
            .iter()
            .find(|m| m.host == host)
            .map(|m| m.container.as_str())
    }
}

impl fmt::Display for ContainerInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.image, self.command)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
