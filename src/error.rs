// =============================================================================
// Per-symbol analysis errors
// =============================================================================
//
// Every variant currently resolves to the same outcome (the symbol is skipped
// for this cycle), but the causes stay distinct so that a retry policy can
// tell a flaky network apart from a bad symbol or a thin history.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Transport-level failure: connect error, timeout, body read error.
    #[error("kline request for {symbol} failed: {source}")]
    Fetch {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    /// The exchange answered with a non-success HTTP status.
    #[error("exchange returned {status} for {symbol}: {body}")]
    Status {
        symbol: String,
        status: u16,
        body: String,
    },

    /// The payload could not be interpreted as klines.
    #[error("malformed kline payload for {symbol}: {reason}")]
    Parse { symbol: String, reason: String },

    /// Fewer candles than the analysis needs.
    #[error("insufficient history for {symbol}: {have} candles, need {need}")]
    InsufficientHistory {
        symbol: String,
        have: usize,
        need: usize,
    },

    /// Local request-weight budget exhausted; the request was never sent.
    #[error("request weight budget exhausted, {symbol} not fetched")]
    RateLimited { symbol: String },
}

impl AnalysisError {
    /// Short, stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Status { .. } => "status",
            Self::Parse { .. } => "parse",
            Self::InsufficientHistory { .. } => "insufficient_history",
            Self::RateLimited { .. } => "rate_limited",
        }
    }

    pub(crate) fn parse(symbol: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}
