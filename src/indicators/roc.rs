// =============================================================================
// Rate of Change (ROC) — Momentum Indicator
// =============================================================================
//
// ROC measures the percentage change in price over a look-back period:
//   ROC = ((close - close_n) / close_n) * 100
//
// The scanner only looks one candle back (`price_change_pct`).

/// Calculate the ROC series for the given closing prices and period.
///
/// One value per close starting at index `period`.  A zero base close yields
/// 0.0 for that element.
pub fn calculate_roc(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period);
    for i in period..closes.len() {
        let prev = closes[i - period];
        if prev == 0.0 {
            result.push(0.0);
        } else {
            result.push(((closes[i] - prev) / prev) * 100.0);
        }
    }
    result
}

/// Percentage change of the newest close against the one before it.
///
/// Fewer than two closes (or a zero previous close) reads as 0.0, which never
/// awards momentum points.
pub fn price_change_pct(closes: &[f64]) -> f64 {
    calculate_roc(closes, 1).last().copied().unwrap_or(0.0)
}
