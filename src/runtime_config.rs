// =============================================================================
// Runtime Configuration — scanner settings with atomic save
// =============================================================================
//
// Every tunable parameter lives here: the symbol basket, the candle request,
// indicator look-backs, scoring thresholds and the cycle timing.
//
// All fields carry a serde default so that a partial (or empty) JSON file
// still loads.  A handful of environment variables override the file, which
// is how the basket is usually changed for a one-off run.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::binance::DEFAULT_BASE_URL;
use crate::indicators::IndicatorParams;
use crate::signals::ScoringRules;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    [
        "BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT", "ADAUSDT", "DOGEUSDT",
        "AVAXUSDT", "DOTUSDT", "LINKUSDT", "MATICUSDT", "LTCUSDT", "UNIUSDT", "ATOMUSDT",
        "FILUSDT", "NEARUSDT", "ALGOUSDT", "VETUSDT", "ICPUSDT", "ETCUSDT",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_interval() -> String {
    "5m".to_string()
}

fn default_history_len() -> u32 {
    50
}

fn default_scan_interval_secs() -> u64 {
    120
}

fn default_check_interval_secs() -> u64 {
    5
}

fn default_symbol_pause_ms() -> u64 {
    200
}

fn default_top_signals() -> usize {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Basket & candle request --------------------------------------------

    /// Symbols scanned every cycle, in scan order.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Candle interval requested from the exchange.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Number of candles requested per symbol.
    #[serde(default = "default_history_len")]
    pub history_len: u32,

    // --- Scoring ------------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub scoring: ScoringRules,

    // --- Timing -------------------------------------------------------------

    /// Seconds between two full basket scans.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    /// Seconds between two checks of the scan timer (countdown cadence).
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// Pause between two symbols within a scan, for the exchange rate limits.
    #[serde(default = "default_symbol_pause_ms")]
    pub symbol_pause_ms: u64,

    // --- Reporting & transport ----------------------------------------------

    /// How many of the best signals are printed in detail per cycle.
    #[serde(default = "default_top_signals")]
    pub top_signals: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            interval: default_interval(),
            history_len: default_history_len(),
            indicators: IndicatorParams::default(),
            scoring: ScoringRules::default(),
            scan_interval_secs: default_scan_interval_secs(),
            check_interval_secs: default_check_interval_secs(),
            symbol_pause_ms: default_symbol_pause_ms(),
            top_signals: default_top_signals(),
            request_timeout_secs: default_request_timeout_secs(),
            base_url: default_base_url(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = config.symbols.len(),
            interval = %config.interval,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Load `path`, or write the defaults there on first run so the file can
    /// be edited afterwards.  An existing but unreadable file is an error and
    /// is left untouched.
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let config = Self::default();
        config.save(path)?;
        info!(path = %path.display(), "no runtime config found, wrote defaults");
        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Apply `SCANNER_*` / `BINANCE_BASE_URL` overrides from the process
    /// environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(syms) = lookup("SCANNER_SYMBOLS") {
            let symbols: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if symbols.is_empty() {
                warn!("SCANNER_SYMBOLS is set but empty, keeping configured basket");
            } else {
                self.symbols = symbols;
            }
        }

        if let Some(interval) = lookup("SCANNER_INTERVAL") {
            let interval = interval.trim();
            if !interval.is_empty() {
                self.interval = interval.to_string();
            }
        }

        if let Some(raw) = lookup("SCANNER_SCAN_INTERVAL_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.scan_interval_secs = secs,
                _ => warn!(value = %raw, "ignoring invalid SCANNER_SCAN_INTERVAL_SECS"),
            }
        }

        if let Some(url) = lookup("BINANCE_BASE_URL") {
            let url = url.trim();
            if !url.is_empty() {
                self.base_url = url.to_string();
            }
        }
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    pub fn check_interval(&self) -> Duration {
        // A zero cadence would spin the scheduler loop.
        Duration::from_secs(self.check_interval_secs.max(1))
    }

    pub fn symbol_pause(&self) -> Duration {
        Duration::from_millis(self.symbol_pause_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
