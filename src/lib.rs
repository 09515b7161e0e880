//! Flash-Arb Engine - arbitrage decision-and-execution core
//!
//! Turns per-venue price quotes into ranked arbitrage opportunities, vets
//! them against liquidity, risk, and profit-target constraints, and drives a
//! single flash-loan borrow/swap/repay transaction through signing,
//! submission, confirmation, and failure recovery.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod quotes;
pub mod fees;
pub mod scoring;
pub mod scanner;
pub mod liquidity;
pub mod execution;
pub mod pipeline;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use config::{Config, CONFIG};
pub use errors::{EngineError, EngineResult};
pub use types::*;

// Type alias for our concrete provider
pub type ConcreteProvider = alloy::providers::RootProvider<alloy::transports::BoxTransport>;
