// =============================================================================
// Basket Scanner — Main Entry Point
// =============================================================================
//
// Scans a fixed basket of USDT pairs every two minutes, scores each symbol
// from RSI, EMA trend, volume and momentum, and prints the best buy signals.
// Read-only: nothing here places orders.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod binance;
mod error;
mod indicators;
mod market_data;
mod report;
mod runtime_config;
mod scanner;
mod scheduler;
mod signals;
mod types;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::binance::BinanceClient;
use crate::runtime_config::RuntimeConfig;
use crate::scanner::Scanner;
use crate::scheduler::Scheduler;

const CONFIG_PATH: &str = "scanner_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Basket Scanner — Starting Up                      ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    // ── 2. Configuration ─────────────────────────────────────────────────
    let mut config = RuntimeConfig::load_or_init(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides();

    if config.symbols.is_empty() {
        anyhow::bail!("symbol basket is empty, nothing to scan");
    }

    info!(
        symbols = ?config.symbols,
        interval = %config.interval,
        history_len = config.history_len,
        scan_interval_secs = config.scan_interval_secs,
        threshold = config.scoring.threshold,
        "Configuration"
    );

    // ── 3. Exchange client & scanner ─────────────────────────────────────
    let client = BinanceClient::new(&config.base_url, config.request_timeout())?;
    let scanner = Scanner::new(client, &config);
    let scheduler = Scheduler::from_config(&config);

    info!("Scanner running. Press Ctrl+C to stop.");

    // ── 4. Run until Ctrl+C ──────────────────────────────────────────────
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => warn!("Shutdown signal received — stopping"),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl+C, running until killed");
                std::future::pending::<()>().await;
            }
        }
    };

    let stats = scheduler.run(&scanner, shutdown).await;

    info!(
        cycles = stats.cycles,
        total_signals = stats.total_signals,
        mean_per_cycle = format!("{:.2}", stats.mean_signals_per_cycle()),
        "Basket Scanner shut down complete."
    );
    Ok(())
}
