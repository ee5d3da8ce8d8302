//! Explicit channel for engine output.
//!
//! Runners push every line they read from the engine into a [`LogStream`].
//! Each line becomes a `tracing` event under the `kiln::engine` target, is
//! handed to an optional caller sink, and is kept in a bounded tail that
//! runners attach to failures.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

/// Which pipe a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::Stderr => write!(f, "stderr"),
        }
    }
}

type Sink = dyn Fn(OutputStream, &str) + Send + Sync;

/// Cloneable handle; clones share the same tail buffer and sink.
#[derive(Clone)]
pub struct LogStream {
    tail: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
    sink: Option<Arc<Sink>>,
}

impl LogStream {
    /// Lines kept for error reports by default.
    pub const DEFAULT_TAIL: usize = 200;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_TAIL)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tail: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
            sink: None,
        }
    }

    /// Forward every line to `sink` as well.
    pub fn with_sink(mut self, sink: impl Fn(OutputStream, &str) + Send + Sync + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Record one line of engine output.
    pub fn line(&self, stream: OutputStream, text: &str) {
        info!(target: "kiln::engine", %stream, "{text}");

        if let Some(sink) = &self.sink {
            sink(stream, text);
        }

        if self.capacity == 0 {
            return;
        }
        let mut tail = self.lock();
        if tail.len() == self.capacity {
            tail.pop_front();
        }
        tail.push_back(text.to_string());
    }

    /// The most recent lines, oldest first.
    pub fn tail(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn tail_text(&self) -> String {
        self.tail().join("\n")
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A panicking sink cannot leave the buffer half-written.
        self.tail.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for LogStream {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStream")
            .field("capacity", &self.capacity)
            .field("buffered", &self.lock().len())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_is_bounded() {
        let log = LogStream::with_capacity(2);
        log.line(OutputStream::Stdout, "one");
        log.line(OutputStream::Stderr, "two");
        log.line(OutputStream::Stdout, "three");

        assert_eq!(log.tail(), vec!["two", "three"]);
        assert_eq!(log.tail_text(), "two\nthree");
    }

    #[test]
    fn clones_share_the_buffer() {
        let log = LogStream::new();
        let clone = log.clone();
        clone.line(OutputStream::Stdout, "shared");
        assert_eq!(log.tail(), vec!["shared"]);
    }

    #[test]
    fn sink_sees_every_line() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let log = LogStream::with_capacity(0).with_sink(move |stream, line| {
            captured.lock().unwrap().push(format!("{stream}: {line}"));
        });

        log.line(OutputStream::Stdout, "copying");
        log.line(OutputStream::Stderr, "warning");

        assert_eq!(*seen.lock().unwrap(), vec!["stdout: copying", "stderr: warning"]);
        assert!(log.tail().is_empty());
    }
}
