// =============================================================================
// Exponential Moving Average (EMA) — span-parameterised, adjusted weighting
// =============================================================================
//
// Formula:
//   alpha = 2 / (span + 1)
//   EMA_t = sum_i (1 - alpha)^i * close_{t-i}  /  sum_i (1 - alpha)^i
//
// Every close in the series contributes, the newest with weight 1.  There is
// no SMA seed, so the series starts at the first close and is defined for any
// non-empty input.  Computed recursively:
//   num_t = close_t + (1 - alpha) * num_{t-1}
//   den_t = 1       + (1 - alpha) * den_{t-1}
//   EMA_t = num_t / den_t
// =============================================================================

/// Default fast span.
pub const SHORT_SPAN: usize = 8;
/// Default slow span.
pub const LONG_SPAN: usize = 21;

/// Compute the EMA series for `closes` with the given `span`.
///
/// One output element per input close.  Returns an empty `Vec` when `span` is
/// zero.  Stops at the first non-finite value.
pub fn calculate_ema(closes: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut result = Vec::with_capacity(closes.len());
    let mut num = 0.0_f64;
    let mut den = 0.0_f64;

    for &close in closes {
        num = close + decay * num;
        den = 1.0 + decay * den;
        let ema = num / den;
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
    }

    result
}

/// EMA evaluated at the newest close.
///
/// `None` on empty input, zero span, or when a non-finite value cut the
/// series short of the newest close.
pub fn current_ema(closes: &[f64], span: usize) -> Option<f64> {
    let series = calculate_ema(closes, span);
    if series.len() != closes.len() {
        return None;
    }
    series.last().copied()
}
