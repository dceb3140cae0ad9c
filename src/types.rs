// =============================================================================
// Shared types used across the scanner
// =============================================================================

use serde::{Deserialize, Serialize};

/// Grade of a buy signal, derived purely from its confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalTier {
    WeakBuy,
    MediumBuy,
    StrongBuy,
}

impl std::fmt::Display for SignalTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "strong buy"),
            Self::MediumBuy => write!(f, "medium buy"),
            Self::WeakBuy => write!(f, "weak buy"),
        }
    }
}
