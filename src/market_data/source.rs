//! Candle source seam between the scanner and the exchange.

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::market_data::Candle;

/// Anything that can return the most recent `limit` candles for a symbol,
/// oldest first.
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, AnalysisError>;
}
