// =============================================================================
// Volume Ratio — current volume against its trailing average
// =============================================================================
//
//   ratio = volume_t / mean(volume_{t-window+1} ..= volume_t)
//
// The window ends at, and includes, the newest candle.  With fewer than
// `window` samples the mean covers all of them.
// =============================================================================

/// Default trailing window.
pub const DEFAULT_WINDOW: usize = 20;

/// Ratio of the newest volume to the trailing mean.
///
/// # Edge cases
/// - empty input or `window == 0` => 0.0
/// - zero or non-finite trailing mean => 0.0 (never awards volume points)
pub fn volume_ratio(volumes: &[f64], window: usize) -> f64 {
    let Some(&current) = volumes.last() else {
        return 0.0;
    };
    if window == 0 {
        return 0.0;
    }

    let start = volumes.len().saturating_sub(window);
    let trailing = &volumes[start..];
    let avg = trailing.iter().sum::<f64>() / trailing.len() as f64;

    if avg == 0.0 || !avg.is_finite() {
        return 0.0;
    }

    let ratio = current / avg;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}
