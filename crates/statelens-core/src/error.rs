//! Error types for the statelens transform pipeline.
//!
//! Every error here is fatal for the run that raised it: the engine never
//! returns a partial diff.

use thiserror::Error;

/// Errors raised while turning raw simulator bytes into typed records.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed {what} encoding: {reason}")]
    MalformedEncoding { what: &'static str, reason: String },

    #[error("Signing payload format error: {reason}")]
    SigningPayloadFormat { reason: String },
}

impl DecodeError {
    pub fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::MalformedEncoding {
            what,
            reason: reason.into(),
        }
    }

    pub fn signing(reason: impl Into<String>) -> Self {
        DecodeError::SigningPayloadFormat {
            reason: reason.into(),
        }
    }
}

/// Errors from loading the slot metadata registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Contract {contract} references unknown layout '{layout}'")]
    UnresolvedLayoutReference { contract: String, layout: String },

    #[error("Contract {contract} has an invalid layout reference '{value}'")]
    InvalidLayoutReference { contract: String, value: String },

    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Parse error in slot metadata: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from native balance reconciliation.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("Balance reconciliation failed for {account}: {reason}")]
    Reconciliation { account: String, reason: String },
}

/// Top-level error for a full transform run.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Balance(#[from] BalanceError),

    #[error("Invalid simulation input: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
