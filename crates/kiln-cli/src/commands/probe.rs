//! `kiln probe`: report what a fetch would run on.

use serde_json::json;

use kiln_adapters::WhichProbe;
use kiln_core::{application::EngineProbe, domain::EngineAvailability};

use crate::{config::AppConfig, error::CliResult, output::OutputManager};

/// Look up the engine and the container runtime on `PATH`.
pub fn execute(config: AppConfig, output: OutputManager) -> CliResult<()> {
    let probe = WhichProbe::new();
    let engine = probe.probe(&config.engine.command);
    let runtime = probe.probe(&config.container.runtime);

    if output.is_json() {
        output.json(&json!({
            "engine": { "command": config.engine.command, "status": describe(&engine) },
            "container": {
                "runtime": config.container.runtime,
                "image": config.container.image,
                "status": describe(&runtime),
            },
            "strategy": config.engine.strategy.to_string(),
        }))?;
        return Ok(());
    }

    output.header("Environment")?;
    output.print(&format!("  Engine:    {} ({})", config.engine.command, describe(&engine)))?;
    output.print(&format!("  Container: {} ({})", config.container.runtime, describe(&runtime)))?;
    output.print(&format!("  Image:     {}", config.container.image))?;
    output.print(&format!("  Strategy:  {}", config.engine.strategy))?;

    match (&engine, &runtime) {
        (EngineAvailability::Available(_), _) => output.success("Templates will render locally")?,
        (EngineAvailability::NotFound, EngineAvailability::Available(_)) => {
            output.info("Templates will render in a container")?
        }
        _ => output.warning("No usable engine or container runtime found")?,
    }

    Ok(())
}

fn describe(availability: &EngineAvailability) -> String {
    match availability {
        EngineAvailability::Available(path) => path.display().to_string(),
        EngineAvailability::NotFound => "not found".into(),
        EngineAvailability::ProbeError(reason) => format!("probe failed: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn describes_each_availability() {
        assert_eq!(
            describe(&EngineAvailability::Available(PathBuf::from("/usr/bin/copier"))),
            "/usr/bin/copier"
        );
        assert_eq!(describe(&EngineAvailability::NotFound), "not found");
        assert_eq!(
            describe(&EngineAvailability::ProbeError("bad PATH".into())),
            "probe failed: bad PATH"
        );
    }
}
