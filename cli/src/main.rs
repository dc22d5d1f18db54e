//! statelens CLI: review what a Safe transaction will do before signing it.
//!
//! # Commands
//! ```text
//! statelens transform      --trace <trace.json> --registry <file|dir> --chain-id <n>
//! statelens check-registry --registry <file|dir> [--chain-id <n>]
//! statelens digest         --data-to-sign <hex>
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use statelens_core::primitives;
use statelens_evm::SigningPayload;
use statelens_observability::{init_tracing, LogConfig};
use std::path::PathBuf;

mod cmd_check;
mod cmd_transform;

#[derive(Parser)]
#[command(
    name = "statelens",
    about = "statelens: state-diff review for Safe transactions",
    long_about = "
statelens CLI: turn a simulator trace into a deterministic, annotated review
artifact (storage overrides, storage changes, native balance changes and the
EIP-712 hashes the signer will see).

Logs go to stderr; the artifact goes to stdout unless --output is given.
",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a simulator trace into a review artifact
    Transform {
        /// Simulator trace JSON (targetSafe, dataToSign, stateDiff, preimages, overrides)
        #[arg(long)]
        trace: PathBuf,
        /// Slot metadata: a YAML file or a directory of them
        #[arg(long)]
        registry: PathBuf,
        /// Chain the simulation ran against
        #[arg(long)]
        chain_id: u64,
        /// Write the artifact here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Decode the trace blobs on the calling thread
        #[arg(long)]
        sequential: bool,
    },

    /// Load a slot metadata registry and list what it describes
    #[command(name = "check-registry")]
    CheckRegistry {
        /// A YAML file or a directory of them
        #[arg(long)]
        registry: PathBuf,
        /// Only list this chain
        #[arg(long)]
        chain_id: Option<u64>,
    },

    /// Split a signing payload into its hashes and print the signed digest
    Digest {
        /// `0x1901 ‖ domainHash ‖ messageHash`
        #[arg(long)]
        data_to_sign: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&LogConfig {
        level: if cli.verbose { "debug" } else { "warn" }.into(),
        json: cli.json_logs,
        ..LogConfig::default()
    });

    match cli.command {
        Commands::Transform {
            trace,
            registry,
            chain_id,
            output,
            sequential,
        } => cmd_transform::run(&trace, &registry, chain_id, output.as_deref(), sequential),

        Commands::CheckRegistry { registry, chain_id } => cmd_check::run(&registry, chain_id),

        Commands::Digest { data_to_sign } => cmd_digest(&data_to_sign),
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_digest(data_to_sign: &str) -> Result<()> {
    let payload = SigningPayload::parse(data_to_sign).context("parsing dataToSign")?;
    println!("Domain hash:  {}", primitives::word_hex(&payload.domain_hash));
    println!("Message hash: {}", primitives::word_hex(&payload.message_hash));
    println!("Digest:       {}", primitives::word_hex(&payload.digest()));
    Ok(())
}
