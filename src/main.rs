//! Flash-Arb Engine - Main Entry Point
//!
//! Scans configured pairs on an interval, queues ranked opportunities, and
//! drains the queue through the execution pipeline.

use flash_arb_engine::*;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    let config = CONFIG.clone();

    info!("⚡ Flash-Arb Engine v0.3.0");
    info!("📋 Configuration:");
    info!("   Mode: {}", if config.dry_run { "DRY RUN" } else { "LIVE" });
    info!("   Trial amount: {}", config.trial_amount);
    info!("   Max trade size: {}", config.max_trade_size);
    info!("   Depth cap fraction: {}", config.cap_fraction);
    info!("   Profit band: ${} - ${}", config.min_profit_usd, config.max_profit_usd);
    info!("   Quote freshness: {}s", config.quote_freshness_secs);
    info!("   Breaker threshold: {}", config.breaker_threshold);
    info!("   Scan interval: {}s", config.scan_interval_secs);
    if !config.dry_run {
        info!("   Max gas price: {} gwei", config.max_gas_price_gwei);
        info!("   Receipt timeout: {}s", config.receipt_timeout_secs);
        warn!("   ⚠️  LIVE MODE - transactions will be signed and submitted");
    }

    let provider = network::setup_provider(&config).await?;

    // Gas snapshot refresh runs on its own schedule; fee math refuses to run
    // whenever the snapshot has aged out.
    let gas_oracle = Arc::new(network::GasOracle::new());
    if let Err(e) = gas_oracle.refresh(&provider, &config.native_price_symbol).await {
        warn!("Initial gas snapshot failed, scans will skip until one lands: {}", e);
    }
    {
        let gas_oracle = Arc::clone(&gas_oracle);
        let provider = Arc::clone(&provider);
        let symbol = config.native_price_symbol.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(10));
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = gas_oracle.refresh(&provider, &symbol).await {
                    warn!("Gas snapshot refresh failed: {}", e);
                }
            }
        });
    }

    let executor: Arc<dyn execution::Executor> = if config.dry_run {
        info!("🧪 Dry-run executor active; nothing will be signed");
        Arc::new(execution::DryRunExecutor::new(config.slippage_tolerance_bps))
    } else {
        Arc::new(execution::TransactionExecutor::connect(Arc::clone(&provider), &config).await?)
    };

    let gatekeeper = Arc::new(liquidity::LoanProviderGate::new(
        Arc::clone(&provider),
        types::LOAN_PROVIDER,
    ));
    let aggregators = pipeline::venue_aggregators(Arc::clone(&provider), &config);
    info!("✅ Initialized aggregators for {} pair(s)", aggregators.len());

    let pipeline = pipeline::ExecutionPipeline::new(
        config.clone(),
        aggregators,
        Arc::clone(&gas_oracle),
        gatekeeper,
        executor,
    )
    .with_provider(Arc::clone(&provider));

    // Shutdown handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
    let shutdown_tx = Arc::new(tokio::sync::Mutex::new(Some(shutdown_tx)));
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("\n📛 Received shutdown signal (Ctrl+C)...");
        if let Some(tx) = shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }
    });

    info!("\n🚀 Starting scan loop...\n");

    let start_time = Instant::now();
    let mut stats = SessionStats::new();
    let mut interval = time::interval(Duration::from_secs(config.scan_interval_secs));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_scan_cycle(&pipeline, &mut stats, start_time).await {
                    error!("🛑 Fatal error, shutting down: {}", e);
                    break;
                }
            }
            _ = &mut shutdown_rx => {
                info!("Shutdown signal received, exiting scan loop...");
                break;
            }
        }
    }

    info!("\n🛑 Shutting down gracefully...");
    utils::print_session_stats(
        start_time,
        stats.cycles,
        stats.opportunities,
        stats.executed,
        stats.successful,
        stats.rejected,
        &stats.error_counts,
    );

    Ok(())
}

struct SessionStats {
    cycles: u64,
    opportunities: u64,
    executed: u64,
    successful: u64,
    rejected: u64,
    error_counts: HashMap<String, u32>,
}

impl SessionStats {
    fn new() -> Self {
        Self {
            cycles: 0,
            opportunities: 0,
            executed: 0,
            successful: 0,
            rejected: 0,
            error_counts: HashMap::new(),
        }
    }
}

/// One scan cycle: refresh every pair's ranking, queue the survivors, then
/// drain the queue through the pipeline's vet-and-execute path. Only fatal
/// signer errors escape.
async fn run_scan_cycle(
    pipeline: &pipeline::ExecutionPipeline,
    stats: &mut SessionStats,
    start_time: Instant,
) -> Result<()> {
    stats.cycles += 1;

    for pair in types::PAIRS {
        match pipeline.scan(pair).await {
            Ok(ranked) => {
                stats.opportunities += ranked.len() as u64;
                for opportunity in &ranked {
                    utils::print_opportunity(opportunity);
                }
                pipeline.enqueue(ranked).await;
            }
            Err(EngineError::InsufficientQuotes { pair, got }) => {
                warn!("Skipping {}: only {} venue(s) answered", pair, got);
                *stats.error_counts.entry("insufficient_quotes".to_string()).or_insert(0) += 1;
            }
            Err(EngineError::GasPriceUnavailable) => {
                warn!("No live gas snapshot; skipping scan for {}", pair);
                *stats.error_counts.entry("gas_snapshot".to_string()).or_insert(0) += 1;
            }
            Err(e) => {
                error!("Scan failed for {}: {}", pair, e);
                *stats.error_counts.entry(format!("scan_{pair}")).or_insert(0) += 1;
            }
        }
    }

    while let Some(result) = pipeline.execute_next().await {
        match result {
            Ok(disposition) => {
                utils::print_disposition(&disposition);
                match &disposition {
                    types::ExecuteDisposition::Completed(record) => {
                        stats.executed += 1;
                        if record.outcome == types::ExecutionOutcome::Success {
                            stats.successful += 1;
                        }
                    }
                    types::ExecuteDisposition::Rejected(_) => {
                        stats.rejected += 1;
                    }
                }
            }
            Err(e) if e.is_fatal() => {
                error!("Fatal execution error: {}", e);
                return Err(e.into());
            }
            Err(e) => {
                error!("Execution error: {}", e);
                *stats.error_counts.entry("execution".to_string()).or_insert(0) += 1;
            }
        }
    }

    if stats.cycles % 12 == 0 {
        utils::print_session_stats(
            start_time,
            stats.cycles,
            stats.opportunities,
            stats.executed,
            stats.successful,
            stats.rejected,
            &stats.error_counts,
        );
    }

    Ok(())
}
