// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the scanner scores.
// None of them fail: short or degenerate inputs map to documented neutral
// readings so a thin history degrades the score instead of aborting it.

pub mod ema;
pub mod roc;
pub mod rsi;
pub mod snapshot;
pub mod volume;

pub use snapshot::{IndicatorParams, IndicatorSnapshot};
