//! Process runner adapters.
//!
//! Both the host runner and the container runner spawn a child process and
//! stream its output through [`run_streaming`].

mod container;
mod local;

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::thread;

use kiln_core::{
    application::{
        ApplicationError,
        ports::{LogStream, OutputStream},
    },
    error::KilnResult,
};
use tracing::debug;

pub use container::DockerCliRunner;
pub use local::LocalProcessRunner;

/// Spawn `command`, forward each stdout/stderr line into `log`, and wait.
///
/// `label` names the invocation in errors. Spawn failures and non-zero exits
/// both become `InvocationFailed`, carrying the log's current tail.
pub(crate) fn run_streaming(mut command: Command, label: &str, log: &LogStream) -> KilnResult<()> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|e| invocation_failed(label, format!("failed to start: {e}"), log))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    thread::scope(|scope| {
        if let Some(out) = stdout {
            scope.spawn(move || pump(out, OutputStream::Stdout, log));
        }
        if let Some(err) = stderr {
            scope.spawn(move || pump(err, OutputStream::Stderr, log));
        }
    });

    let status = child
        .wait()
        .map_err(|e| invocation_failed(label, format!("failed to wait: {e}"), log))?;
    debug!(command = label, %status, "Process exited");

    if status.success() {
        Ok(())
    } else {
        Err(invocation_failed(label, status.to_string(), log))
    }
}

fn pump(reader: impl Read, stream: OutputStream, log: &LogStream) {
    for line in BufReader::new(reader).lines() {
        match line {
            Ok(line) => log.line(stream, &line),
            Err(e) => {
                debug!(%stream, error = %e, "Stopped reading process output");
                break;
            }
        }
    }
}

fn invocation_failed(
    label: &str,
    reason: String,
    log: &LogStream,
) -> kiln_core::error::KilnError {
    ApplicationError::InvocationFailed {
        command: label.to_string(),
        reason,
        output: log.tail_text(),
    }
    .into()
}
