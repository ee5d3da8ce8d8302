//! Container runner that shells out to the docker (or podman) CLI.

use std::path::Path;
use std::process::Command;

use kiln_core::{
    application::ports::{ContainerInvocation, ContainerRunner, LogStream},
    error::KilnResult,
};
use tracing::{debug, instrument};

use super::run_streaming;

/// Runs `<runtime> run --rm ...` for each invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerCliRunner {
    runtime: String,
    map_user: bool,
}

impl DockerCliRunner {
    pub fn new(runtime: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            map_user: true,
        }
    }

    /// Run the container as the owner of the first mounted directory, so
    /// files it writes are not owned by root. Only has an effect on unix.
    pub fn with_map_user(mut self, map_user: bool) -> Self {
        self.map_user = map_user;
        self
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// Full argument list passed to the runtime binary.
    pub fn build_args(&self, invocation: &ContainerInvocation) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];

        if self.map_user {
            if let Some(user) = invocation.mounts.first().and_then(|m| owner_of(&m.host)) {
                args.push("-u".into());
                args.push(user);
            }
        }

        for mount in &invocation.mounts {
            args.push("-v".into());
            args.push(format!("{}:{}", mount.host.display(), mount.container));
        }

        args.push("-w".into());
        args.push(invocation.working_dir.clone());

        for (key, value) in &invocation.env {
            args.push("-e".into());
            args.push(format!("{key}={value}"));
        }

        args.push(invocation.image.clone());
        args.push(invocation.command.clone());
        args.extend(invocation.args.iter().cloned());
        args
    }
}

impl Default for DockerCliRunner {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl ContainerRunner for DockerCliRunner {
    #[instrument(skip_all, fields(runtime = %self.runtime, image = %invocation.image))]
    fn run_container(&self, invocation: &ContainerInvocation, log: &LogStream) -> KilnResult<()> {
        let args = self.build_args(invocation);
        debug!(args = ?args, "Starting container");

        let mut command = Command::new(&self.runtime);
        command.args(&args);

        let label = format!("{} run {}", self.runtime, invocation.image);
        run_streaming(command, &label, log)
    }
}

#[cfg(unix)]
fn owner_of(path: &Path) -> Option<String> {
    use std::os::unix::fs::MetadataExt;

    let metadata = std::fs::metadata(path).ok()?;
    Some(format!("{}:{}", metadata.uid(), metadata.gid()))
}

#[cfg(not(unix))]
fn owner_of(_path: &Path) -> Option<String> {
    None
}
