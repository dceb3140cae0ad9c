// =============================================================================
// Indicator Snapshot — every reading the scorer needs for one (symbol, cycle)
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::{ema, roc, rsi, volume};
use crate::market_data::PriceHistory;

/// Look-back parameters for the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub ema_short_span: usize,
    pub ema_long_span: usize,
    pub volume_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: rsi::DEFAULT_PERIOD,
            ema_short_span: ema::SHORT_SPAN,
            ema_long_span: ema::LONG_SPAN,
            volume_window: volume::DEFAULT_WINDOW,
        }
    }
}

/// Read-only indicator values computed from one [`PriceHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// RSI in [0, 100]; 50 when the history is too short.
    pub rsi: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    /// Newest volume over the trailing average; 0 when undefined.
    pub volume_ratio: f64,
    /// Newest close vs the previous one, in percent; 0 when undefined.
    pub price_change_pct: f64,
}

impl IndicatorSnapshot {
    pub fn compute(history: &PriceHistory, params: &IndicatorParams) -> Self {
        let closes = history.closes();

        // An empty or non-finite history leaves both EMAs at 0.0, which never
        // reads as an uptrend.
        let ema_short = ema::current_ema(closes, params.ema_short_span).unwrap_or(0.0);
        let ema_long = ema::current_ema(closes, params.ema_long_span).unwrap_or(0.0);

        Self {
            rsi: rsi::calculate_rsi(closes, params.rsi_period),
            ema_short,
            ema_long,
            volume_ratio: volume::volume_ratio(history.volumes(), params.volume_window),
            price_change_pct: roc::price_change_pct(closes),
        }
    }

    /// Fast EMA strictly above slow EMA.
    pub fn is_uptrend(&self) -> bool {
        self.ema_short > self.ema_long
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Candle;

    fn history(closes: &[f64], volumes: &[f64]) -> PriceHistory {
        let candles: Vec<Candle> = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, &v))| {
                let t = i as i64 * 300_000;
                Candle::new(t, c, c, c, c, v, t + 299_999)
            })
            .collect();
        PriceHistory::from_candles(&candles)
    }

    #[test]
    fn rising_series_with_volume_spike() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let mut volumes = vec![10.0; 49];
        volumes.push(100.0);

        let snap = IndicatorSnapshot::compute(&history(&closes, &volumes), &IndicatorParams::default());
        assert_eq!(snap.rsi, 100.0);
        assert!(snap.is_uptrend());
        // mean of last 20 = (19*10 + 100) / 20 = 14.5
        assert!((snap.volume_ratio - 100.0 / 14.5).abs() < 1e-12);
        assert!((snap.price_change_pct - (1.0 / 148.0) * 100.0).abs() < 1e-12);
    }

    #[test]
    fn falling_series_is_not_uptrend() {
        let closes: Vec<f64> = (0..50).map(|i| 200.0 - i as f64).collect();
        let volumes = vec![5.0; 50];
        let snap = IndicatorSnapshot::compute(&history(&closes, &volumes), &IndicatorParams::default());
        assert!(snap.rsi < 1e-10);
        assert!(!snap.is_uptrend());
        assert!(snap.price_change_pct < 0.0);
    }

    #[test]
    fn single_candle_uses_fallbacks() {
        let snap = IndicatorSnapshot::compute(&history(&[100.0], &[0.0]), &IndicatorParams::default());
        assert_eq!(snap.rsi, rsi::NEUTRAL_RSI);
        assert_eq!(snap.volume_ratio, 0.0);
        assert_eq!(snap.price_change_pct, 0.0);
        assert!(!snap.is_uptrend());
    }

    #[test]
    fn empty_history_uses_fallbacks() {
        let snap = IndicatorSnapshot::compute(&PriceHistory::default(), &IndicatorParams::default());
        assert_eq!(snap.rsi, rsi::NEUTRAL_RSI);
        assert_eq!(snap.ema_short, 0.0);
        assert_eq!(snap.ema_long, 0.0);
    }
}
