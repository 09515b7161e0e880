//! Network provider setup and the native-asset price feed

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{Context, Result};
use rust_decimal::prelude::*;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use crate::{
    config::{Config, NATIVE_PRICE_MAX, NATIVE_PRICE_MIN},
    errors::{EngineError, EngineResult},
    network::retry::{retry_with_backoff, RetryConfig},
    ConcreteProvider,
};

pub async fn setup_provider(config: &Config) -> Result<Arc<ConcreteProvider>> {
    let provider: Arc<ConcreteProvider> = Arc::new(
        ProviderBuilder::new()
            .on_http(config.rpc_url.parse()?)
            .boxed()
    );

    info!("🔗 Testing RPC connection...");
    let block = retry_with_backoff(
        || async {
            provider.get_block_number().await
                .context("Failed to get block number")
        },
        &RetryConfig {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 10000,
            exponential_base: 2.0,
        },
        "RPC connection",
    ).await
    .map_err(|e| {
        warn!("⚠️ RPC connection attempt failed: {}", e);
        anyhow::anyhow!("RPC connection failed: {}", e)
    })?;

    info!("✅ Connected at block {}", block);
    Ok(provider)
}

/// Fetch the native asset's USD price from the configured ticker endpoint.
/// Used only by the gas model to convert gas cost into reference currency.
pub async fn fetch_native_usd_price(symbol: &str) -> EngineResult<Decimal> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| EngineError::Network {
            message: "Failed to build HTTP client".to_string(),
            source: Some(e.into()),
            retry_count: 0,
        })?;

    let url = format!("https://api.binance.com/api/v3/ticker/price?symbol={symbol}");

    let operation = || async {
        let response = client
            .get(&url)
            .send()
            .await
            .context("HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Price API error: {} - {}", status, body));
        }

        let json: serde_json::Value = response.json().await
            .context("Failed to parse JSON response")?;

        let price_str = json["price"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'price' field in response"))?;

        let price = Decimal::from_str(price_str)
            .context("Failed to parse price string")?;

        Ok(price)
    };

    let price = retry_with_backoff(
        operation,
        &RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 200,
            ..Default::default()
        },
        "native price fetch",
    ).await?;

    if price < NATIVE_PRICE_MIN || price > NATIVE_PRICE_MAX {
        warn!("⚠️ Native price outside sanity bounds: {}", price);
        return Err(EngineError::DataParsing {
            context: format!("native price {price} outside [{NATIVE_PRICE_MIN}, {NATIVE_PRICE_MAX}]"),
            source: anyhow::anyhow!("price validation failed"),
        });
    }

    Ok(price)
}
