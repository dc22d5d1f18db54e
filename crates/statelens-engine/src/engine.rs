//! `Engine`: one trace in, one review artifact out.

use serde::{Deserialize, Serialize};
use statelens_core::{
    error::TransformError,
    input::SimulationTrace,
    output::TransformResult,
    primitives,
    trace::{AccountAccess, OverridePayload, PreimageEntry},
    DecodeError,
};
use statelens_evm::{SigningPayload, TraceDecoder};
use statelens_registry::{ParentMap, SlotRegistry};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{assembler::Assembler, balance::reconcile_balances, diff::build_state_diff};

/// Engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Decode the three ABI blobs on the Rayon pool
    #[serde(default = "default_parallel_decode")]
    pub parallel_decode: bool,
}

fn default_parallel_decode() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_decode: true,
        }
    }
}

/// Stateless transform engine. Cheap to clone; the registry is shared.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<SlotRegistry>,
    decoder: TraceDecoder,
    config: EngineConfig,
}

struct Decoded {
    accesses: Vec<AccountAccess>,
    preimages: Vec<PreimageEntry>,
    overrides: OverridePayload,
}

impl Engine {
    pub fn new(registry: Arc<SlotRegistry>, config: EngineConfig) -> Self {
        Self {
            registry,
            decoder: TraceDecoder::new(),
            config,
        }
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Transform one simulator trace recorded on `chain_id`.
    ///
    /// # Errors
    /// The first fatal error encountered; no partial result is returned.
    pub fn transform(
        &self,
        trace: &SimulationTrace,
        chain_id: u64,
    ) -> Result<TransformResult, TransformError> {
        let target = primitives::parse_address(&trace.target_safe)
            .map_err(|e| TransformError::Input(format!("targetSafe: {e}")))?;
        let signing = SigningPayload::parse(&trace.data_to_sign)?;

        let decoded = self.decode(trace)?;
        debug!(
            frames = decoded.accesses.len(),
            preimages = decoded.preimages.len(),
            override_contracts = decoded.overrides.state_overrides.len(),
            "trace decoded"
        );

        let diff = build_state_diff(&decoded.accesses);
        let balances = reconcile_balances(&decoded.accesses)?;
        let parents = ParentMap::from_entries(&decoded.preimages);

        let result = Assembler::new(&self.registry, chain_id, &parents).assemble(
            signing.expected_hashes(&target),
            &decoded.overrides,
            &diff,
            &balances,
        );

        info!(
            chain_id,
            target = %primitives::checksum(&target),
            overrides = result.state_overrides.len(),
            changed_contracts = result.state_changes.len(),
            balance_changes = result.balance_changes.len(),
            "transform complete"
        );
        Ok(result)
    }

    fn decode(&self, trace: &SimulationTrace) -> Result<Decoded, DecodeError> {
        let dec = &self.decoder;
        let (accesses, (preimages, overrides)) = if self.config.parallel_decode {
            rayon::join(
                || dec.decode_account_accesses_hex(&trace.state_diff),
                || {
                    rayon::join(
                        || dec.decode_preimages_hex(&trace.preimages),
                        || dec.decode_overrides_hex(&trace.overrides),
                    )
                },
            )
        } else {
            (
                dec.decode_account_accesses_hex(&trace.state_diff),
                (
                    dec.decode_preimages_hex(&trace.preimages),
                    dec.decode_overrides_hex(&trace.overrides),
                ),
            )
        };

        // Errors surface in blob order: state diff, preimages, overrides.
        Ok(Decoded {
            accesses: accesses?,
            preimages: preimages?,
            overrides: overrides?,
        })
    }
}
