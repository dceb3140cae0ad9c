use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV candle from the Binance klines endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub close_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time: i64,
    ) -> Self {
        Self {
            open_time,
            close_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// ---------------------------------------------------------------------------
// PriceHistory -- closes and volumes, index-aligned, oldest first
// ---------------------------------------------------------------------------

/// The slice of a candle series the indicators actually read.
///
/// Built fresh for one analysis and dropped afterwards.  `closes[i]` and
/// `volumes[i]` always describe the same candle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    closes: Vec<f64>,
    volumes: Vec<f64>,
}

impl PriceHistory {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let (closes, volumes) = candles.iter().map(|c| (c.close, c.volume)).unzip();
        Self { closes, volumes }
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    /// Newest close, if any.
    pub fn current_price(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
