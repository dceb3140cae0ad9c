// =============================================================================
// Relative Strength Index (RSI) — simple-average form
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split into gains (positive deltas) and losses (|negative deltas|),
//          zero elsewhere.
// Step 3 — Average each over the most recent `period` deltas, i.e. the window
//          of `period + 1` closes ending at the newest close.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// No Wilder smoothing: every reading depends only on the last `period` deltas.
// =============================================================================

/// Neutral reading returned when the history is too short to say anything.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Default look-back period.
pub const DEFAULT_PERIOD: usize = 14;

/// Compute the RSI of the newest close.
///
/// # Edge cases
/// - `period == 0` or `closes.len() < period + 1` => [`NEUTRAL_RSI`]
/// - Average loss exactly zero => 100.0 (this includes a perfectly flat window)
pub fn calculate_rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let window = &closes[closes.len() - (period + 1)..];
    let (sum_gain, sum_loss) = window
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0_f64, 0.0_f64), |(g, l), d| {
            if d > 0.0 {
                (g + d, l)
            } else if d < 0.0 {
                (g, l - d)
            } else {
                (g, l)
            }
        });

    let period_f = period as f64;
    let avg_gain = sum_gain / period_f;
    let avg_loss = sum_loss / period_f;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
