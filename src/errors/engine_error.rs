//! Engine error taxonomy
//!
//! Per-venue quote failures are absorbed at the aggregator boundary and
//! never escalate. Circuit-breaker and liquidity vetoes travel as structured
//! `Rejection` outcomes, not through this enum. Only nonce conflicts and
//! signer-credential failures are fatal to the current operation.

use alloy::primitives::Address;
use thiserror::Error;

/// Venue-local quote failure. `NoRoute` is a normal outcome for a venue that
/// simply cannot serve the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteFailure {
    Unreachable,
    NoRoute,
    StaleChainState,
}

impl std::fmt::Display for QuoteFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteFailure::Unreachable => write!(f, "venue unreachable"),
            QuoteFailure::NoRoute => write!(f, "no route for pair"),
            QuoteFailure::StaleChainState => write!(f, "stale chain state"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Quote unavailable from {venue}: {failure}")]
    QuoteUnavailable {
        venue: String,
        failure: QuoteFailure,
    },

    #[error("Insufficient quotes for {pair}: {got} venue(s) responded, need 2")]
    InsufficientQuotes {
        pair: String,
        got: usize,
    },

    #[error("Stale price: opportunity {opportunity_id} is {age_secs}s old (max {max_secs}s)")]
    StalePrice {
        opportunity_id: String,
        age_secs: i64,
        max_secs: i64,
    },

    #[error("Liquidity unconfirmed for {asset}: {reason}")]
    LiquidityUnconfirmed {
        asset: String,
        reason: String,
    },

    #[error("Circuit breaker open for {key}: {failures} consecutive failures")]
    CircuitOpen {
        key: String,
        failures: u32,
    },

    #[error("Gas price unavailable: refusing to estimate fees without a live snapshot")]
    GasPriceUnavailable,

    #[error("Transaction reverted: {tx_hash}")]
    TransactionReverted {
        tx_hash: String,
    },

    #[error("Transaction timed out after {waited_secs}s: {tx_hash}")]
    TransactionTimedOut {
        tx_hash: String,
        waited_secs: u64,
    },

    #[error("Nonce conflict for signer {signer}: {message}")]
    NonceConflict {
        signer: Address,
        message: String,
    },

    #[error("Signer error: {message}")]
    Signer {
        message: String,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        retry_count: u32,
    },

    #[error("Contract interaction failed: {contract} - {message}")]
    Contract {
        contract: Address,
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Data parsing error: {context}")]
    DataParsing {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl EngineError {
    /// Fatal errors indicate a broken invariant that automated retry could
    /// make worse; they must halt the current signer operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::NonceConflict { .. } | EngineError::Signer { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
