// =============================================================================
// Signal Scorer — point accumulation over one indicator snapshot
// =============================================================================
//
// | Condition                        | Points | Label                 |
// |----------------------------------|--------|-----------------------|
// | RSI < 25                         |   +30  | severe oversold RSI   |
// | else RSI < 35                    |   +20  | oversold RSI          |
// | short EMA > long EMA             |   +25  | uptrend               |
// | volume ratio > 2.5               |   +20  | high volume           |
// | else volume ratio > 1.5          |   +15  | good volume           |
// | price change > 0.5 %             |   +15  | positive momentum     |
//
// Labels are appended in table order.  The tier is a pure function of the
// final total.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSnapshot;
use crate::types::SignalTier;

const RSI_SEVERE_OVERSOLD: f64 = 25.0;
const RSI_OVERSOLD: f64 = 35.0;
const VOLUME_HIGH: f64 = 2.5;
const VOLUME_GOOD: f64 = 1.5;
const MOMENTUM_MIN_PCT: f64 = 0.5;

const POINTS_SEVERE_OVERSOLD: u32 = 30;
const POINTS_OVERSOLD: u32 = 20;
const POINTS_UPTREND: u32 = 25;
const POINTS_HIGH_VOLUME: u32 = 20;
const POINTS_GOOD_VOLUME: u32 = 15;
const POINTS_MOMENTUM: u32 = 15;

pub const LABEL_SEVERE_OVERSOLD: &str = "severe oversold RSI";
pub const LABEL_OVERSOLD: &str = "oversold RSI";
pub const LABEL_UPTREND: &str = "uptrend";
pub const LABEL_HIGH_VOLUME: &str = "high volume";
pub const LABEL_GOOD_VOLUME: &str = "good volume";
pub const LABEL_MOMENTUM: &str = "positive momentum";

// =============================================================================
// Rules
// =============================================================================

/// Emission threshold and tier boundaries (all inclusive lower bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub threshold: u32,
    pub weak_min: u32,
    pub medium_min: u32,
    pub strong_min: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            threshold: 60,
            weak_min: 60,
            medium_min: 70,
            strong_min: 80,
        }
    }
}

impl ScoringRules {
    pub fn tier_for(&self, confidence: u32) -> Option<SignalTier> {
        if confidence >= self.strong_min {
            Some(SignalTier::StrongBuy)
        } else if confidence >= self.medium_min {
            Some(SignalTier::MediumBuy)
        } else if confidence >= self.weak_min {
            Some(SignalTier::WeakBuy)
        } else {
            None
        }
    }
}

// =============================================================================
// Output types
// =============================================================================

/// Raw point total and the conditions that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreCard {
    pub confidence: u32,
    pub conditions: Vec<&'static str>,
}

impl ScoreCard {
    fn award(&mut self, points: u32, label: &'static str) {
        self.confidence += points;
        self.conditions.push(label);
    }
}

/// A buy signal for one symbol in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub tier: SignalTier,
    pub confidence: u32,
    pub price: f64,
    /// RSI rounded to one decimal.
    pub rsi: f64,
    /// Volume ratio rounded to one decimal.
    pub volume_ratio: f64,
    /// Price change (%) rounded to two decimals.
    pub price_change_pct: f64,
    pub conditions: Vec<String>,
}

// =============================================================================
// Scorer
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct SignalScorer {
    pub rules: ScoringRules,
}

impl SignalScorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    /// Apply the point table to a snapshot.
    pub fn score_snapshot(snapshot: &IndicatorSnapshot) -> ScoreCard {
        let mut card = ScoreCard::default();

        if snapshot.rsi < RSI_SEVERE_OVERSOLD {
            card.award(POINTS_SEVERE_OVERSOLD, LABEL_SEVERE_OVERSOLD);
        } else if snapshot.rsi < RSI_OVERSOLD {
            card.award(POINTS_OVERSOLD, LABEL_OVERSOLD);
        }

        if snapshot.is_uptrend() {
            card.award(POINTS_UPTREND, LABEL_UPTREND);
        }

        if snapshot.volume_ratio > VOLUME_HIGH {
            card.award(POINTS_HIGH_VOLUME, LABEL_HIGH_VOLUME);
        } else if snapshot.volume_ratio > VOLUME_GOOD {
            card.award(POINTS_GOOD_VOLUME, LABEL_GOOD_VOLUME);
        }

        if snapshot.price_change_pct > MOMENTUM_MIN_PCT {
            card.award(POINTS_MOMENTUM, LABEL_MOMENTUM);
        }

        card
    }

    /// Score one symbol.  `None` when the total stays below the threshold.
    pub fn score(&self, symbol: &str, snapshot: &IndicatorSnapshot, price: f64) -> Option<Signal> {
        let card = Self::score_snapshot(snapshot);
        if card.confidence < self.rules.threshold {
            return None;
        }
        let tier = self.rules.tier_for(card.confidence)?;

        Some(Signal {
            symbol: symbol.to_string(),
            tier,
            confidence: card.confidence,
            price,
            rsi: round_to(snapshot.rsi, 1),
            volume_ratio: round_to(snapshot.volume_ratio, 1),
            price_change_pct: round_to(snapshot.price_change_pct, 2),
            conditions: card.conditions.into_iter().map(String::from).collect(),
        })
    }
}

/// Order a cycle's signals by confidence, highest first.  Stable: equal
/// confidences keep their scan order.
pub fn sort_by_confidence(signals: &mut [Signal]) {
    signals.sort_by(|a, b| b.confidence.cmp(&a.confidence));
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rsi: f64, uptrend: bool, volume_ratio: f64, price_change_pct: f64) -> IndicatorSnapshot {
        let (ema_short, ema_long) = if uptrend { (101.0, 100.0) } else { (99.0, 100.0) };
        IndicatorSnapshot {
            rsi,
            ema_short,
            ema_long,
            volume_ratio,
            price_change_pct,
        }
    }

    #[test]
    fn full_house_is_strong_buy() {
        let scorer = SignalScorer::default();
        let signal = scorer
            .score("BTCUSDT", &snapshot(20.0, true, 3.0, 1.0), 50_000.0)
            .expect("90 points must emit");
        assert_eq!(signal.confidence, 90);
        assert_eq!(signal.tier, SignalTier::StrongBuy);
        assert_eq!(
            signal.conditions,
            vec![LABEL_SEVERE_OVERSOLD, LABEL_UPTREND, LABEL_HIGH_VOLUME, LABEL_MOMENTUM]
        );
    }

    #[test]
    fn nothing_fires_no_signal() {
        let card = SignalScorer::score_snapshot(&snapshot(40.0, false, 1.0, 0.1));
        assert_eq!(card.confidence, 0);
        assert!(card.conditions.is_empty());
        assert!(SignalScorer::default()
            .score("BTCUSDT", &snapshot(40.0, false, 1.0, 0.1), 1.0)
            .is_none());
    }

    #[test]
    fn exactly_sixty_is_weak_buy() {
        // oversold 20 + uptrend 25 + momentum 15 = 60
        let signal = SignalScorer::default()
            .score("ETHUSDT", &snapshot(30.0, true, 1.0, 0.6), 3000.0)
            .expect("60 is inclusive");
        assert_eq!(signal.confidence, 60);
        assert_eq!(signal.tier, SignalTier::WeakBuy);
    }

    #[test]
    fn below_threshold_is_dropped() {
        // severe 30 + good volume 15 = 45
        let snap = snapshot(10.0, false, 2.0, 0.0);
        assert_eq!(SignalScorer::score_snapshot(&snap).confidence, 45);
        assert!(SignalScorer::default().score("X", &snap, 1.0).is_none());
    }

    #[test]
    fn lowered_rules_emit_below_sixty() {
        let rules = ScoringRules {
            threshold: 45,
            weak_min: 45,
            ..ScoringRules::default()
        };
        let signal = SignalScorer::new(rules)
            .score("X", &snapshot(10.0, false, 2.0, 0.0), 1.0)
            .unwrap();
        assert_eq!(signal.tier, SignalTier::WeakBuy);
        assert_eq!(ScoringRules::default().tier_for(59), None);
    }

    #[test]
    fn medium_tier_band() {
        // severe 30 + uptrend 25 + good volume 15 = 70
        let signal = SignalScorer::default()
            .score("SOLUSDT", &snapshot(24.9, true, 1.6, 0.0), 150.0)
            .unwrap();
        assert_eq!(signal.confidence, 70);
        assert_eq!(signal.tier, SignalTier::MediumBuy);
        assert_eq!(signal.conditions, vec![LABEL_SEVERE_OVERSOLD, LABEL_UPTREND, LABEL_GOOD_VOLUME]);
    }

    #[test]
    fn tier_boundaries() {
        let rules = ScoringRules::default();
        assert_eq!(rules.tier_for(80), Some(SignalTier::StrongBuy));
        assert_eq!(rules.tier_for(79), Some(SignalTier::MediumBuy));
        assert_eq!(rules.tier_for(70), Some(SignalTier::MediumBuy));
        assert_eq!(rules.tier_for(69), Some(SignalTier::WeakBuy));
        assert_eq!(rules.tier_for(60), Some(SignalTier::WeakBuy));
        assert_eq!(rules.tier_for(59), None);
    }

    #[test]
    fn rsi_branches_are_exclusive() {
        assert_eq!(SignalScorer::score_snapshot(&snapshot(24.99, false, 0.0, 0.0)).confidence, 30);
        assert_eq!(SignalScorer::score_snapshot(&snapshot(25.0, false, 0.0, 0.0)).confidence, 20);
        assert_eq!(SignalScorer::score_snapshot(&snapshot(34.99, false, 0.0, 0.0)).confidence, 20);
        assert_eq!(SignalScorer::score_snapshot(&snapshot(35.0, false, 0.0, 0.0)).confidence, 0);
    }

    #[test]
    fn volume_branches_are_exclusive() {
        assert_eq!(SignalScorer::score_snapshot(&snapshot(50.0, false, 2.51, 0.0)).confidence, 20);
        assert_eq!(SignalScorer::score_snapshot(&snapshot(50.0, false, 2.5, 0.0)).confidence, 15);
        assert_eq!(SignalScorer::score_snapshot(&snapshot(50.0, false, 1.5, 0.0)).confidence, 0);
    }

    #[test]
    fn momentum_is_strictly_greater() {
        assert_eq!(SignalScorer::score_snapshot(&snapshot(50.0, false, 0.0, 0.5)).confidence, 0);
        assert_eq!(SignalScorer::score_snapshot(&snapshot(50.0, false, 0.0, 0.51)).confidence, 15);
    }

    #[test]
    fn equal_emas_are_not_uptrend() {
        let snap = IndicatorSnapshot {
            rsi: 50.0,
            ema_short: 100.0,
            ema_long: 100.0,
            volume_ratio: 0.0,
            price_change_pct: 0.0,
        };
        assert_eq!(SignalScorer::score_snapshot(&snap).confidence, 0);
    }

    #[test]
    fn display_values_are_rounded() {
        let signal = SignalScorer::default()
            .score("BNBUSDT", &snapshot(21.26, true, 3.04, 1.234), 600.0)
            .unwrap();
        assert_eq!(signal.rsi, 21.3);
        assert_eq!(signal.volume_ratio, 3.0);
        assert_eq!(signal.price_change_pct, 1.23);
    }

    #[test]
    fn sorting_is_descending_and_stable() {
        let scorer = SignalScorer::default();
        let mut signals = vec![
            scorer.score("A", &snapshot(30.0, true, 1.0, 0.6), 1.0).unwrap(),
            scorer.score("B", &snapshot(20.0, true, 3.0, 1.0), 1.0).unwrap(),
            scorer.score("C", &snapshot(30.0, true, 1.0, 0.6), 1.0).unwrap(),
            scorer.score("D", &snapshot(24.0, true, 1.6, 0.0), 1.0).unwrap(),
        ];
        sort_by_confidence(&mut signals);
        let order: Vec<&str> = signals.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(order, vec!["B", "D", "A", "C"]);
        assert!(signals.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }
}
