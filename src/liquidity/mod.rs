//! Loan-liquidity gatekeeper
//!
//! Confirms the loan provider can actually fund a trade before any
//! transaction is built. Fail-closed: an unreachable provider or a parse
//! failure vetoes the trade exactly as a confirmed shortfall would.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use alloy::primitives::Address;

use crate::{
    errors::{EngineError, EngineResult},
    quotes::ILoanProvider,
    types::AssetDescriptor,
    utils::from_raw,
    ConcreteProvider,
};

/// Source of loan-provider headroom, abstracted so the pipeline can be
/// exercised without a chain.
#[async_trait]
pub trait LoanLiquidity: Send + Sync {
    /// Liquidity the provider could extend in `asset`, in whole asset units.
    async fn available(&self, asset: &AssetDescriptor) -> EngineResult<Decimal>;
}

/// On-chain gate backed by the loan provider contract.
pub struct LoanProviderGate {
    provider: Arc<ConcreteProvider>,
    loan_provider: Address,
}

impl LoanProviderGate {
    pub fn new(provider: Arc<ConcreteProvider>, loan_provider: Address) -> Self {
        Self { provider, loan_provider }
    }
}

#[async_trait]
impl LoanLiquidity for LoanProviderGate {
    async fn available(&self, asset: &AssetDescriptor) -> EngineResult<Decimal> {
        let contract = ILoanProvider::new(self.loan_provider, self.provider.as_ref().clone());
        let raw = contract
            .availableLiquidity(asset.address)
            .call()
            .await
            .map_err(|e| {
                warn!("⚠️ Loan provider query failed for {}: {}", asset.symbol, e);
                EngineError::Contract {
                    contract: self.loan_provider,
                    message: format!("availableLiquidity({}) failed", asset.symbol),
                    source: e.into(),
                }
            })?;

        from_raw(raw.amount, asset.decimals).map_err(|e| EngineError::DataParsing {
            context: format!("liquidity response for {}", asset.symbol),
            source: e,
        })
    }
}

/// Confirm the provider holds at least `required` of `asset` right now.
/// Returns the observed headroom on success. Fail-closed boundary: any
/// read failure vetoes the trade exactly as a confirmed shortfall would.
pub async fn confirm_loan_liquidity(
    source: &dyn LoanLiquidity,
    asset: &AssetDescriptor,
    required: Decimal,
) -> EngineResult<Decimal> {
    let available = match source.available(asset).await {
        Ok(available) => available,
        Err(e) => {
            return Err(EngineError::LiquidityUnconfirmed {
                asset: asset.symbol.to_string(),
                reason: format!("liquidity read failed: {e}"),
            });
        }
    };
    if available < required {
        return Err(EngineError::LiquidityUnconfirmed {
            asset: asset.symbol.to_string(),
            reason: format!("available {available} below required {required}"),
        });
    }
    debug!(
        "Loan liquidity confirmed: {} {} available, {} required",
        available, asset.symbol, required
    );
    Ok(available)
}
