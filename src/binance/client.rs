// =============================================================================
// Binance REST API Client — public market data only
// =============================================================================
//
// The scanner never trades, so nothing here signs requests or carries an API
// key.  Every call goes through the shared `RateLimitTracker`: the budget is
// checked before sending and refreshed from the response headers afterwards.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::binance::rate_limit::{RateLimitTracker, KLINES_WEIGHT};
use crate::error::AnalysisError;
use crate::market_data::{Candle, CandleSource};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Minimum array length of a kline entry: openTime .. closeTime.
const KLINE_MIN_FIELDS: usize = 7;

/// Binance REST API client for the public klines endpoint.
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
    rate_limits: RateLimitTracker,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `BinanceClient`.
    ///
    /// # Arguments
    /// * `base_url` — REST root, e.g. `https://api.binance.com` (no trailing slash needed).
    /// * `timeout`  — per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "BinanceClient initialised");

        Ok(Self {
            base_url,
            client,
            rate_limits: RateLimitTracker::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v3/klines (public — no signature required).
    ///
    /// Array indices:
    ///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
    ///   [6] closeTime, [7] quoteAssetVolume, [8] numberOfTrades,
    ///   [9] takerBuyBaseVolume, [10] takerBuyQuoteVolume
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, AnalysisError> {
        if !self.rate_limits.can_send_request(KLINES_WEIGHT) {
            return Err(AnalysisError::RateLimited {
                symbol: symbol.to_string(),
            });
        }

        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = limit.to_string();

        let fetch_err = |source: reqwest::Error| AnalysisError::Fetch {
            symbol: symbol.to_string(),
            source,
        };

        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("interval", interval), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(fetch_err)?;

        self.rate_limits.update_from_headers(resp.headers());

        let status = resp.status();
        let body = resp.text().await.map_err(fetch_err)?;

        if !status.is_success() {
            return Err(AnalysisError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| AnalysisError::parse(symbol, format!("invalid JSON: {e}")))?;
        let candles = parse_klines(symbol, &value)?;

        debug!(
            symbol,
            interval,
            count = candles.len(),
            used_weight_1m = self.rate_limits.snapshot().used_weight_1m,
            "klines fetched"
        );
        Ok(candles)
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, AnalysisError> {
        self.get_klines(symbol, interval, limit).await
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .field("rate_limits", &self.rate_limits)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Parsing
// -----------------------------------------------------------------------------

/// Parse Binance's array-of-arrays klines body.
///
/// Entries shorter than seven fields are skipped with a warning; a field that
/// is present but not numeric fails the whole payload.
fn parse_klines(symbol: &str, body: &serde_json::Value) -> Result<Vec<Candle>, AnalysisError> {
    let raw = body
        .as_array()
        .ok_or_else(|| AnalysisError::parse(symbol, "klines response is not an array"))?;

    let mut candles = Vec::with_capacity(raw.len());

    for entry in raw {
        let arr = entry
            .as_array()
            .ok_or_else(|| AnalysisError::parse(symbol, "kline entry is not an array"))?;

        if arr.len() < KLINE_MIN_FIELDS {
            warn!(symbol, fields = arr.len(), "skipping malformed kline entry");
            continue;
        }

        let open_time = arr[0]
            .as_i64()
            .ok_or_else(|| AnalysisError::parse(symbol, "kline openTime is not an integer"))?;
        let open = parse_str_f64(symbol, &arr[1], "open")?;
        let high = parse_str_f64(symbol, &arr[2], "high")?;
        let low = parse_str_f64(symbol, &arr[3], "low")?;
        let close = parse_str_f64(symbol, &arr[4], "close")?;
        let volume = parse_str_f64(symbol, &arr[5], "volume")?;
        let close_time = arr[6].as_i64().unwrap_or(0);

        candles.push(Candle::new(open_time, open, high, low, close, volume, close_time));
    }

    Ok(candles)
}

/// Binance sends prices and volumes as JSON strings; accept numbers too.
fn parse_str_f64(symbol: &str, val: &serde_json::Value, field: &str) -> Result<f64, AnalysisError> {
    match val {
        serde_json::Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| AnalysisError::parse(symbol, format!("failed to parse {field} '{s}' as f64"))),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AnalysisError::parse(symbol, format!("{field} is not a valid f64"))),
        _ => Err(AnalysisError::parse(
            symbol,
            format!("{field} has unexpected JSON type: {val}"),
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn kline(open_time: i64, close: &str, volume: &str) -> serde_json::Value {
        json!([
            open_time, "100.0", "101.0", "99.0", close, volume,
            open_time + 299_999, "1000.0", 42, "10.0", "1000.0", "0"
        ])
    }

    fn client_for(server: &MockServer) -> BinanceClient {
        BinanceClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn parse_klines_ok() {
        let body = json!([kline(0, "100.5", "12.0"), kline(300_000, "101.5", "13.5")]);
        let candles = parse_klines("BTCUSDT", &body).unwrap();
        assert_eq!(candles.len(), 2);
        assert!((candles[1].close - 101.5).abs() < f64::EPSILON);
        assert!((candles[1].volume - 13.5).abs() < f64::EPSILON);
        assert_eq!(candles[1].close_time, 599_999);
    }

    #[test]
    fn parse_klines_skips_short_entries() {
        let body = json!([[0, "1.0", "1.0"], kline(0, "100.0", "1.0")]);
        assert_eq!(parse_klines("BTCUSDT", &body).unwrap().len(), 1);
    }

    #[test]
    fn parse_klines_rejects_non_array() {
        let body = json!({ "code": -1121, "msg": "Invalid symbol." });
        let err = parse_klines("NOPE", &body).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn parse_klines_rejects_bad_number() {
        let body = json!([kline(0, "abc", "1.0")]);
        let err = parse_klines("BTCUSDT", &body).unwrap_err();
        assert!(err.to_string().contains("close"));
    }

    #[tokio::test]
    async fn get_klines_round_trip_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/klines"))
            .and(query_param("symbol", "BTCUSDT"))
            .and(query_param("interval", "5m"))
            .and(query_param("limit", "50"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-mbx-used-weight-1m", "12")
                    .set_body_json(json!([kline(0, "100.0", "5.0"), kline(300_000, "102.0", "6.0")])),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let candles = client.get_klines("BTCUSDT", "5m", 50).await.unwrap();
        assert_eq!(candles.len(), 2);
        assert!((candles[1].close - 102.0).abs() < f64::EPSILON);
        assert_eq!(client.rate_limits.snapshot().used_weight_1m, 12);
    }

    #[tokio::test]
    async fn get_klines_maps_http_error_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/klines"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "code": -1121, "msg": "Invalid symbol." })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_klines("NOPEUSDT", "5m", 50)
            .await
            .unwrap_err();
        match err {
            AnalysisError::Status { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid symbol"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_klines_maps_garbage_body_to_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/klines"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_klines("BTCUSDT", "5m", 50)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[tokio::test]
    async fn get_klines_unreachable_host_is_fetch_error() {
        // Port 9 (discard) on localhost is not listening in test environments.
        let client = BinanceClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.get_klines("BTCUSDT", "5m", 50).await.unwrap_err();
        assert_eq!(err.kind(), "fetch");
    }
}
