//! `statelens check-registry`: load slot metadata and list it.
//!
//! Loading is the check: unresolved layout references, bad keys and
//! duplicate contracts all fail here, before any trace is transformed.

use anyhow::{Context, Result};
use statelens_core::primitives;
use statelens_registry::SlotRegistry;
use std::path::Path;

pub fn run(registry_path: &Path, chain_id: Option<u64>) -> Result<()> {
    let registry = SlotRegistry::load_path(registry_path)
        .with_context(|| format!("loading slot registry from '{}'", registry_path.display()))?;

    let chains = match chain_id {
        Some(id) => vec![id],
        None => registry.chain_ids(),
    };

    println!(
        "Registry OK: {} contract(s) on {} chain(s)",
        registry.contract_count(),
        registry.chain_ids().len()
    );
    for id in chains {
        let contracts = registry.contracts(id);
        println!("\nChain {id} ({} contract(s))", contracts.len());
        for (address, contract) in contracts {
            println!(
                "  {}  {:<24} {} slot(s)",
                primitives::checksum(&address),
                contract.name,
                contract.slots.len()
            );
        }
    }
    Ok(())
}
