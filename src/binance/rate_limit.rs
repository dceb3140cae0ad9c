// =============================================================================
// Rate-Limit Tracker — monitors Binance request weight to avoid 429s
// =============================================================================
//
// Binance caps request weight at 1200 per minute per IP (we hard-cap
// ourselves at 1000).  The tracker reads the `X-MBX-USED-WEIGHT-1M` response
// header after every request and keeps atomic counters that any task may
// query lock-free.
//
// The exchange window is the calendar minute, so a reading taken in an
// earlier minute no longer counts.  That keeps the tracker from latching shut
// once it refuses a request (a refused request never brings a fresh header).
// =============================================================================

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Hard ceiling at which we refuse to send additional requests.
const WEIGHT_HARD_LIMIT: u32 = 1000;
/// Soft warning threshold.
const WEIGHT_WARN_THRESHOLD: u32 = 800;

const USED_WEIGHT_HEADER: &str = "X-MBX-USED-WEIGHT-1M";

/// Request weight of one `GET /api/v3/klines` call.
pub const KLINES_WEIGHT: u32 = 2;

/// Thread-safe request-weight tracker backed by atomic counters.
pub struct RateLimitTracker {
    used_weight_1m: AtomicU32,
    /// UNIX minute in which `used_weight_1m` was observed.
    observed_minute: AtomicU64,
}

/// Immutable snapshot of the current rate-limit state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    pub used_weight_1m: u32,
}

impl RateLimitTracker {
    /// Create a new tracker with the counter at zero.
    pub fn new() -> Self {
        Self {
            used_weight_1m: AtomicU32::new(0),
            observed_minute: AtomicU64::new(0),
        }
    }

    // -------------------------------------------------------------------------
    // Header-based updates
    // -------------------------------------------------------------------------

    /// Update the weight counter from the HTTP response headers returned by
    /// Binance.
    pub fn update_from_headers(&self, headers: &reqwest::header::HeaderMap) {
        let Some(w) = headers
            .get(USED_WEIGHT_HEADER)
            .and_then(|val| val.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())
        else {
            return;
        };
        self.record_weight(w, current_minute());
    }

    fn record_weight(&self, w: u32, minute: u64) {
        let prev = self.weight_at(minute);
        self.used_weight_1m.store(w, Ordering::Relaxed);
        self.observed_minute.store(minute, Ordering::Relaxed);

        if w >= WEIGHT_WARN_THRESHOLD && prev < WEIGHT_WARN_THRESHOLD {
            warn!(
                used_weight = w,
                hard_limit = WEIGHT_HARD_LIMIT,
                "rate-limit weight crossed warning threshold"
            );
        }
        debug!(used_weight_1m = w, "rate-limit weight updated from header");
    }

    /// Weight used in `minute`; readings from earlier minutes count as zero.
    fn weight_at(&self, minute: u64) -> u32 {
        if self.observed_minute.load(Ordering::Relaxed) == minute {
            self.used_weight_1m.load(Ordering::Relaxed)
        } else {
            0
        }
    }

    // -------------------------------------------------------------------------
    // Pre-flight checks
    // -------------------------------------------------------------------------

    /// Return `true` if we can afford to spend `weight` more request weight
    /// without exceeding the hard limit.
    pub fn can_send_request(&self, weight: u32) -> bool {
        self.can_send_at(weight, current_minute())
    }

    fn can_send_at(&self, weight: u32, minute: u64) -> bool {
        let current = self.weight_at(minute);
        let allowed = current + weight <= WEIGHT_HARD_LIMIT;
        if !allowed {
            warn!(
                current_weight = current,
                requested_weight = weight,
                hard_limit = WEIGHT_HARD_LIMIT,
                "request blocked — would exceed rate-limit"
            );
        }
        allowed
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    pub fn snapshot(&self) -> RateLimitSnapshot {
        RateLimitSnapshot {
            used_weight_1m: self.weight_at(current_minute()),
        }
    }
}

impl Default for RateLimitTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RateLimitTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitTracker")
            .field("used_weight_1m", &self.used_weight_1m.load(Ordering::Relaxed))
            .field("observed_minute", &self.observed_minute.load(Ordering::Relaxed))
            .finish()
    }
}

fn current_minute() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() / 60)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn fresh_tracker_allows_requests() {
        let tracker = RateLimitTracker::new();
        assert!(tracker.can_send_request(KLINES_WEIGHT));
        assert_eq!(tracker.snapshot().used_weight_1m, 0);
    }

    #[test]
    fn blocks_near_hard_limit_within_same_minute() {
        let tracker = RateLimitTracker::new();
        tracker.record_weight(999, 42);
        assert!(tracker.can_send_at(1, 42));
        assert!(!tracker.can_send_at(2, 42));
    }

    #[test]
    fn stale_minute_reading_is_ignored() {
        let tracker = RateLimitTracker::new();
        tracker.record_weight(1000, 42);
        assert!(!tracker.can_send_at(2, 42));
        assert!(tracker.can_send_at(2, 43));
    }

    #[test]
    fn reads_used_weight_header() {
        let tracker = RateLimitTracker::new();
        let mut headers = HeaderMap::new();
        headers.insert("x-mbx-used-weight-1m", HeaderValue::from_static("123"));
        tracker.update_from_headers(&headers);
        assert_eq!(tracker.used_weight_1m.load(Ordering::Relaxed), 123);
    }

    #[test]
    fn ignores_garbage_header() {
        let tracker = RateLimitTracker::new();
        let mut headers = HeaderMap::new();
        headers.insert("x-mbx-used-weight-1m", HeaderValue::from_static("lots"));
        tracker.update_from_headers(&headers);
        assert_eq!(tracker.used_weight_1m.load(Ordering::Relaxed), 0);
    }
}
