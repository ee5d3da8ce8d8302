//! Engine probe backed by the `which` crate.

use kiln_core::{application::ports::EngineProbe, domain::EngineAvailability};
use tracing::debug;

/// Looks the engine up on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhichProbe;

impl WhichProbe {
    pub fn new() -> Self {
        Self
    }
}

impl EngineProbe for WhichProbe {
    fn probe(&self, command: &str) -> EngineAvailability {
        let availability = match which::which(command) {
            Ok(path) => EngineAvailability::Available(path),
            Err(which::Error::CannotFindBinaryPath) => EngineAvailability::NotFound,
            Err(e) => EngineAvailability::ProbeError(e.to_string()),
        };
        debug!(command, ?availability, "Probed engine");
        availability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_binary_is_not_found() {
        assert_eq!(
            WhichProbe::new().probe("kiln-definitely-not-installed"),
            EngineAvailability::NotFound
        );
    }

    #[cfg(unix)]
    #[test]
    fn shell_is_available() {
        assert!(WhichProbe::new().probe("sh").is_available());
    }
}
