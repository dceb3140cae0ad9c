// =============================================================================
// Basket Scanner — one full pass over the configured symbols
// =============================================================================
//
// Pipeline per symbol:
//   1. Fetch the most recent `history_len` candles
//   2. Check the history is usable (>= 2 candles, finite positive closes)
//   3. Compute the indicator snapshot
//   4. Score it into an optional Signal
//
// Symbols are processed one at a time with a fixed pause in between.  A
// failure anywhere in the pipeline skips that symbol for this cycle only;
// the rest of the basket is unaffected.  Signals are sorted once every symbol
// has been processed.
// =============================================================================

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::indicators::{IndicatorParams, IndicatorSnapshot};
use crate::market_data::{Candle, CandleSource, PriceHistory};
use crate::runtime_config::RuntimeConfig;
use crate::signals::{sort_by_confidence, Signal, SignalScorer};

/// Price change needs the newest close and the one before it.
pub const MIN_CANDLES: usize = 2;

// =============================================================================
// Cycle report
// =============================================================================

/// A symbol that produced no analysis this cycle, and why.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub kind: &'static str,
    pub reason: String,
}

/// Everything one basket scan produced.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub scanned: usize,
    /// Sorted by confidence, highest first.
    pub signals: Vec<Signal>,
    pub skipped: Vec<SkippedSymbol>,
}

// =============================================================================
// Scanner
// =============================================================================

pub struct Scanner<S> {
    source: S,
    symbols: Vec<String>,
    interval: String,
    history_len: u32,
    params: IndicatorParams,
    scorer: SignalScorer,
    symbol_pause: Duration,
}

impl<S: CandleSource> Scanner<S> {
    pub fn new(source: S, config: &RuntimeConfig) -> Self {
        Self {
            source,
            symbols: config.symbols.clone(),
            interval: config.interval.clone(),
            history_len: config.history_len,
            params: config.indicators,
            scorer: SignalScorer::new(config.scoring),
            symbol_pause: config.symbol_pause(),
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Fetch, compute and score a single symbol.
    ///
    /// `Ok(None)` means the analysis ran but the score stayed below the
    /// emission threshold.
    pub async fn analyze_symbol(&self, symbol: &str) -> Result<Option<Signal>, AnalysisError> {
        let candles = self
            .source
            .fetch_candles(symbol, &self.interval, self.history_len)
            .await?;

        let history = validated_history(symbol, &candles)?;
        let price = history
            .current_price()
            .ok_or_else(|| AnalysisError::InsufficientHistory {
                symbol: symbol.to_string(),
                have: 0,
                need: MIN_CANDLES,
            })?;

        let snapshot = IndicatorSnapshot::compute(&history, &self.params);
        debug!(
            symbol,
            price,
            rsi = snapshot.rsi,
            ema_short = snapshot.ema_short,
            ema_long = snapshot.ema_long,
            volume_ratio = snapshot.volume_ratio,
            price_change_pct = snapshot.price_change_pct,
            "indicators computed"
        );

        Ok(self.scorer.score(symbol, &snapshot, price))
    }

    /// Scan the whole basket once.
    pub async fn run_cycle(&self, cycle: u64) -> CycleReport {
        let started_at = Utc::now();
        info!(cycle, symbols = self.symbols.len(), "analysis cycle started");

        let mut signals = Vec::new();
        let mut skipped = Vec::new();

        for (i, symbol) in self.symbols.iter().enumerate() {
            match self.analyze_symbol(symbol).await {
                Ok(Some(signal)) => {
                    info!(
                        symbol = %symbol,
                        tier = %signal.tier,
                        confidence = signal.confidence,
                        "signal"
                    );
                    signals.push(signal);
                }
                Ok(None) => {
                    info!(symbol = %symbol, "no signal");
                }
                Err(e) => {
                    warn!(symbol = %symbol, kind = e.kind(), error = %e, "symbol skipped this cycle");
                    skipped.push(SkippedSymbol {
                        symbol: symbol.clone(),
                        kind: e.kind(),
                        reason: e.to_string(),
                    });
                }
            }

            if i + 1 < self.symbols.len() && !self.symbol_pause.is_zero() {
                tokio::time::sleep(self.symbol_pause).await;
            }
        }

        sort_by_confidence(&mut signals);

        CycleReport {
            cycle,
            started_at,
            scanned: self.symbols.len(),
            signals,
            skipped,
        }
    }
}

/// Reject histories the indicators cannot read meaningfully.
fn validated_history(symbol: &str, candles: &[Candle]) -> Result<PriceHistory, AnalysisError> {
    if candles.len() < MIN_CANDLES {
        return Err(AnalysisError::InsufficientHistory {
            symbol: symbol.to_string(),
            have: candles.len(),
            need: MIN_CANDLES,
        });
    }

    if let Some(bad) = candles
        .iter()
        .find(|c| !(c.close.is_finite() && c.close > 0.0 && c.volume.is_finite() && c.volume >= 0.0))
    {
        return Err(AnalysisError::parse(
            symbol,
            format!(
                "candle at {} has close={} volume={}",
                bad.open_time, bad.close, bad.volume
            ),
        ));
    }

    Ok(PriceHistory::from_candles(candles))
}
