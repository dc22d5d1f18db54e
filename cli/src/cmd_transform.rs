//! `statelens transform`: run the engine over one simulator trace.

use anyhow::{Context, Result};
use statelens_core::SimulationTrace;
use statelens_engine::{Engine, EngineConfig};
use statelens_registry::SlotRegistry;
use std::{path::Path, sync::Arc};
use tracing::info;

pub fn run(
    trace_path: &Path,
    registry_path: &Path,
    chain_id: u64,
    output: Option<&Path>,
    sequential: bool,
) -> Result<()> {
    let registry = SlotRegistry::load_path(registry_path)
        .with_context(|| format!("loading slot registry from '{}'", registry_path.display()))?;
    let trace = SimulationTrace::from_file(trace_path)
        .with_context(|| format!("reading trace '{}'", trace_path.display()))?;

    let engine = Engine::new(
        Arc::new(registry),
        EngineConfig {
            parallel_decode: !sequential,
        },
    );
    let result = engine
        .transform(&trace, chain_id)
        .context("transforming trace")?;
    let json = result.to_canonical_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("writing '{}'", path.display()))?;
            info!(path = %path.display(), entries = result.entry_count(), "artifact written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
