//! Error type shared by every contract client in this crate.

use alloy::primitives::{B256, TxHash};
use thiserror::Error;

/// Errors from contract client operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),
    #[error("pending transaction failed: {0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),
    #[error("transport error: {0}")]
    Transport(#[from] alloy::transports::TransportError),
    #[error("abi decode error: {0}")]
    AbiDecode(#[from] alloy::sol_types::Error),
    /// The attestation was not issued under the schema of the contract it was read through.
    #[error("unsupported attestation schema: expected {expected}, found {found}")]
    UnsupportedSchema { expected: B256, found: B256 },
    #[error("no `{0}` event in transaction receipt")]
    MissingEvent(&'static str),
    /// Logical demands nested deeper than the decoder follows.
    #[error("demand nesting exceeds {max} levels")]
    DemandTooDeep { max: usize },
    #[error("mismatched lengths for `{field}`: expected {expected}, found {found}")]
    MismatchedLengths {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("unsupported chain `{0}` and no contract addresses supplied")]
    UnsupportedChain(String),
    #[error("`{operation}` is not supported by {contract}")]
    UnsupportedOperation {
        contract: &'static str,
        operation: &'static str,
    },
    #[error("log watch closed before a matching `{0}` event arrived")]
    WatchClosed(&'static str),
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for contract client operations.
pub type Result<T> = std::result::Result<T, Error>;
