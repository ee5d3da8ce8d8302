//! Host process runner using std::process.

use std::process::Command;

use kiln_core::{
    application::ports::{LogStream, ProcessInvocation, ProcessRunner},
    error::KilnResult,
};
use tracing::instrument;

use super::run_streaming;

/// Runs executables found on the host `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProcessRunner;

impl LocalProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for LocalProcessRunner {
    #[instrument(skip_all, fields(command = %invocation.command))]
    fn execute(&self, invocation: &ProcessInvocation, log: &LogStream) -> KilnResult<()> {
        let mut command = Command::new(&invocation.command);
        command.args(&invocation.args);
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        run_streaming(command, &invocation.command, log)
    }
}
