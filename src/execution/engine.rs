//! Live transaction executor
//!
//! Drives one flash-loan arbitrage transaction from nonce reservation
//! through terminal classification, holding the signer lock the whole way.
//! The private key never appears in logs or in any persisted record.

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{keccak256, Address},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::{settings::{GAS_BUFFER_DEN, GAS_BUFFER_NUM}, Config},
    errors::{BreakerKey, EngineError, EngineResult},
    execution::{encode_route, is_nonce_conflict, Executor, SignerState},
    quotes::IArbExecutor,
    types::{
        registry::ARB_EXECUTOR, ArbitrageOpportunity, AssetDescriptor, ExecutionOutcome,
        ExecutionResult,
    },
    utils::to_raw,
    ConcreteProvider,
};
use alloy::sol_types::SolCall;

pub struct TransactionExecutor {
    provider: Arc<ConcreteProvider>,
    wallet: EthereumWallet,
    signer: Arc<Mutex<SignerState>>,
    chain_id: u64,
    executor_contract: Address,
    fallback_gas_limit: u64,
    receipt_timeout: Duration,
    max_fee_per_gas: u128,
}

impl TransactionExecutor {
    pub async fn connect(provider: Arc<ConcreteProvider>, config: &Config) -> EngineResult<Self> {
        let key = config.private_key.as_ref().ok_or_else(|| EngineError::Signer {
            message: "PRIVATE_KEY is required for live execution".into(),
        })?;
        let signer_key = PrivateKeySigner::from_str(key).map_err(|e| EngineError::Signer {
            message: format!("private key rejected: {e}"),
        })?;
        let address = signer_key.address();
        let wallet = EthereumWallet::from(signer_key);

        let chain_id = provider.get_chain_id().await.map_err(|e| EngineError::Network {
            message: "failed to read chain id".into(),
            source: Some(e.into()),
            retry_count: 0,
        })?;
        let nonce = provider
            .get_transaction_count(address)
            .await
            .map_err(|e| EngineError::Network {
                message: format!("failed to read nonce for {address}"),
                source: Some(e.into()),
                retry_count: 0,
            })?;

        info!("🔑 Signer {} ready on chain {}, next nonce {}", address, chain_id, nonce);

        Ok(Self {
            provider,
            wallet,
            signer: SignerState::shared(address, nonce),
            chain_id,
            executor_contract: ARB_EXECUTOR,
            fallback_gas_limit: config.fallback_gas_limit,
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
            max_fee_per_gas: config.max_gas_price_gwei as u128 * 1_000_000_000,
        })
    }

    fn result_shell(&self, opportunity: &ArbitrageOpportunity) -> ExecutionResult {
        ExecutionResult {
            id: Uuid::new_v4().to_string(),
            opportunity_id: opportunity.id.clone(),
            outcome: ExecutionOutcome::TimedOut,
            tx_hash: None,
            gas_used: None,
            expected_profit: opportunity.net_profit,
            realized_profit: None,
            error: None,
            submitted_at: Utc::now(),
            confirmed_at: None,
            dry_run: false,
        }
    }
}

#[async_trait]
impl Executor for TransactionExecutor {
    fn is_dry_run(&self) -> bool {
        false
    }

    async fn execute(
        &self,
        opportunity: &ArbitrageOpportunity,
        asset: &AssetDescriptor,
    ) -> EngineResult<ExecutionResult> {
        let route = encode_route(opportunity, asset)?;
        let amount =
            to_raw(opportunity.loan_amount, asset.decimals).map_err(|e| EngineError::DataParsing {
                context: format!("loan amount for {}", opportunity.id),
                source: e,
            })?;
        let calldata = IArbExecutor::executeArbitrageCall {
            asset: asset.address,
            amount,
            route,
        }
        .abi_encode();

        // The signer lock is held from nonce reservation until the attempt
        // reaches a terminal classification.
        let mut signer = self.signer.lock().await;
        let nonce = signer.begin()?;

        let tx = TransactionRequest::default()
            .from(signer.address)
            .to(self.executor_contract)
            .input(calldata.into())
            .nonce(nonce)
            .with_chain_id(self.chain_id)
            .max_fee_per_gas(self.max_fee_per_gas)
            .max_priority_fee_per_gas(1_000_000_000);

        let gas_limit = match self.provider.estimate_gas(&tx).await {
            Ok(estimate) => estimate * GAS_BUFFER_NUM / GAS_BUFFER_DEN,
            Err(e) => {
                warn!(
                    "⚠️ Gas estimation failed for {}, using fallback limit {}: {}",
                    opportunity.id, self.fallback_gas_limit, e
                );
                self.fallback_gas_limit
            }
        };
        let tx = tx.gas_limit(gas_limit);

        let envelope = match tx.build(&self.wallet).await {
            Ok(envelope) => envelope,
            Err(e) => {
                signer.finish_unsent();
                return Err(EngineError::Signer { message: format!("signing failed: {e}") });
            }
        };

        let mut result = self.result_shell(opportunity);
        result.submitted_at = Utc::now();

        let pending = match self.provider.send_tx_envelope(envelope).await {
            Ok(pending) => pending,
            Err(e) => {
                let message = e.to_string();
                if is_nonce_conflict(&message) {
                    // Local accounting diverged from the chain. Do not touch
                    // the nonce; the operator path resyncs it.
                    signer.finish_unsent();
                    return Err(EngineError::NonceConflict { signer: signer.address, message });
                }
                signer.finish_unsent();
                return Err(EngineError::Network {
                    message: format!("transaction submission failed: {message}"),
                    source: Some(e.into()),
                    retry_count: 0,
                });
            }
        };

        let tx_hash = format!("{:?}", pending.tx_hash());
        result.tx_hash = Some(tx_hash.clone());
        info!("📡 Submitted {} for opportunity {} (nonce {})", tx_hash, opportunity.id, nonce);

        tokio::select! {
            receipt = pending.get_receipt() => match receipt {
                Ok(receipt) => {
                    result.confirmed_at = Some(Utc::now());
                    result.gas_used = Some(receipt.gas_used as u64);
                    // Mined either way, so the nonce is consumed.
                    signer.finish_mined();
                    if receipt.status() {
                        info!("✅ Confirmed {} in block {:?}", tx_hash, receipt.block_number);
                        result.outcome = ExecutionOutcome::Success;
                    } else {
                        warn!("❌ Reverted on-chain: {}", tx_hash);
                        result.outcome = ExecutionOutcome::Reverted;
                        result.error = Some("execution reverted on-chain".into());
                    }
                    Ok(result)
                }
                Err(e) => {
                    // Unknown terminal state. The nonce stays reserved until
                    // an explicit resync; resubmitting now could double-fire.
                    warn!("⏳ Receipt unavailable for {}: {}", tx_hash, e);
                    result.outcome = ExecutionOutcome::TimedOut;
                    result.error = Some(format!("receipt unavailable: {e}"));
                    Ok(result)
                }
            },
            _ = tokio::time::sleep(self.receipt_timeout) => {
                warn!(
                    "⏳ No receipt for {} after {}s, leaving nonce reserved",
                    tx_hash,
                    self.receipt_timeout.as_secs()
                );
                result.outcome = ExecutionOutcome::TimedOut;
                result.error = Some(format!(
                    "no receipt after {}s",
                    self.receipt_timeout.as_secs()
                ));
                Ok(result)
            }
        }
    }

    /// Re-read the chain's nonce for our signer and drop any in-flight
    /// reservation left by a timed-out submission.
    async fn resync(&self) -> EngineResult<()> {
        let mut signer = self.signer.lock().await;
        let chain_nonce = self
            .provider
            .get_transaction_count(signer.address)
            .await
            .map_err(|e| EngineError::Network {
                message: format!("failed to resync nonce for {}", signer.address),
                source: Some(e.into()),
                retry_count: 0,
            })?;
        info!("🔄 Nonce resynced to {} for {}", chain_nonce, signer.address);
        signer.resync(chain_nonce);
        Ok(())
    }
}

/// Carry the executor contract's breaker reset on-chain, signed with the
/// owner key. The contract enforces ownership independently; this waits for
/// a definitive receipt so a failed reset never clears local state.
pub async fn submit_breaker_reset(
    provider: &ConcreteProvider,
    owner: &PrivateKeySigner,
    key: &BreakerKey,
    max_gas_price_gwei: u64,
) -> EngineResult<()> {
    let chain_id = provider.get_chain_id().await.map_err(|e| EngineError::Network {
        message: "failed to read chain id".into(),
        source: Some(e.into()),
        retry_count: 0,
    })?;
    let nonce = provider
        .get_transaction_count(owner.address())
        .await
        .map_err(|e| EngineError::Network {
            message: format!("failed to read nonce for {}", owner.address()),
            source: Some(e.into()),
            retry_count: 0,
        })?;

    let key_hash = keccak256(key.to_string().as_bytes());
    let calldata = IArbExecutor::resetBreakerCall { key: key_hash }.abi_encode();
    let wallet = EthereumWallet::from(owner.clone());

    let tx = TransactionRequest::default()
        .from(owner.address())
        .to(ARB_EXECUTOR)
        .input(calldata.into())
        .nonce(nonce)
        .with_chain_id(chain_id)
        .gas_limit(150_000)
        .max_fee_per_gas(max_gas_price_gwei as u128 * 1_000_000_000)
        .max_priority_fee_per_gas(1_000_000_000);

    let envelope = tx.build(&wallet).await.map_err(|e| EngineError::Signer {
        message: format!("breaker reset signing failed: {e}"),
    })?;
    let pending = provider.send_tx_envelope(envelope).await.map_err(|e| EngineError::Network {
        message: format!("breaker reset submission failed: {e}"),
        source: Some(e.into()),
        retry_count: 0,
    })?;

    let tx_hash = format!("{:?}", pending.tx_hash());
    info!("🔓 Breaker reset submitted for {}: {}", key, tx_hash);

    let receipt = tokio::time::timeout(Duration::from_secs(120), pending.get_receipt())
        .await
        .map_err(|_| EngineError::TransactionTimedOut {
            tx_hash: tx_hash.clone(),
            waited_secs: 120,
        })?
        .map_err(|e| EngineError::Network {
            message: format!("breaker reset receipt unavailable: {e}"),
            source: Some(e.into()),
            retry_count: 0,
        })?;

    if !receipt.status() {
        return Err(EngineError::TransactionReverted { tx_hash });
    }
    info!("✅ Breaker reset confirmed for {}", key);
    Ok(())
}
