// =============================================================================
// Signals Module
// =============================================================================
//
// Turns an indicator snapshot into a graded buy signal:
// - Fixed point table over RSI, EMA trend, volume ratio and momentum
// - Configurable emission threshold and tier boundaries

pub mod scorer;

pub use scorer::{sort_by_confidence, ScoringRules, Signal, SignalScorer};
