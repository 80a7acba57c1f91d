//! Strategy registry.
//!
//! Maps fixed strategy identifiers to their safety policy, feature family,
//! and weight preset. Strategies are selected by name from configuration;
//! nothing is constructed dynamically beyond this table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::agent::AgentError;
use crate::eval::features::{Feature, FeatureSet};
use crate::eval::safety::SafetyPolicy;
use crate::eval::scoring::WeightTable;

/// A named evaluation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Weighs what we can capture against what we leave exposed, with a
    /// one-step head start required on offense.
    #[default]
    Symmetric,
    /// Defensive: tracks only the opponent's threats, with ties going to
    /// the attacker, and guards capsules heavily.
    Sentinel,
    /// Maximises banked score plus predicted gains minus predicted losses.
    Ledger,
}

pub const ALL_STRATEGIES: [Strategy; 3] = [Strategy::Symmetric, Strategy::Sentinel, Strategy::Ledger];

/// Everything an agent needs to evaluate actions under a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyProfile {
    pub policy: SafetyPolicy,
    pub feature_set: FeatureSet,
    pub weights: WeightTable,
}

impl Strategy {
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Symmetric => "symmetric",
            Strategy::Sentinel => "sentinel",
            Strategy::Ledger => "ledger",
        }
    }

    /// The preset policy and weights for this strategy.
    pub fn profile(self) -> StrategyProfile {
        match self {
            Strategy::Symmetric => StrategyProfile {
                policy: SafetyPolicy::symmetric(),
                feature_set: FeatureSet::Tactical,
                weights: WeightTable::new([
                    (Feature::UnguardedFood, -20.0),
                    (Feature::CapturableFood, 10.0),
                    (Feature::UnguardedCapsules, -200.0),
                    (Feature::ClosestOpponentDistance, -10.0),
                    (Feature::CertainDeath, -5000.0),
                    (Feature::ClosestFoodDistance, -1.0),
                    (Feature::EatsFood, 100.0),
                    (Feature::CapturesOpponent, 200.0),
                    (Feature::ClosestBorder, -1.0),
                ]),
            },
            Strategy::Sentinel => StrategyProfile {
                policy: SafetyPolicy::sentinel(),
                feature_set: FeatureSet::Tactical,
                weights: WeightTable::new([
                    (Feature::UnguardedFood, -10.0),
                    (Feature::UnguardedCapsules, -1000.0),
                    (Feature::ClosestOpponentDistance, -10.0),
                    (Feature::CertainDeath, -5000.0),
                    (Feature::ClosestFoodDistance, -1.0),
                    (Feature::EatsFood, 100.0),
                    (Feature::CapturesOpponent, 200.0),
                    (Feature::ClosestBorder, -1.0),
                ]),
            },
            Strategy::Ledger => StrategyProfile {
                policy: SafetyPolicy::ledger(),
                feature_set: FeatureSet::Ledger,
                weights: WeightTable::new([
                    (Feature::Score, 1.0),
                    (Feature::CapturableFood, 1.0),
                    (Feature::UnguardedFood, -1.0),
                ]),
            },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STRATEGIES
            .iter()
            .copied()
            .find(|st| st.name() == s)
            .ok_or_else(|| AgentError::UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_through_registry() {
        for st in ALL_STRATEGIES {
            assert_eq!(st.name().parse::<Strategy>().unwrap(), st);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "SafeAgent".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, AgentError::UnknownStrategy(ref s) if s == "SafeAgent"));
    }

    #[test]
    fn default_is_symmetric() {
        assert_eq!(Strategy::default(), Strategy::Symmetric);
    }

    #[test]
    fn presets_match_feature_families() {
        let sym = Strategy::Symmetric.profile();
        assert_eq!(sym.feature_set, FeatureSet::Tactical);
        assert_eq!(sym.weights.weight(Feature::CapturableFood), 10.0);
        assert_eq!(sym.weights.weight(Feature::UnguardedCapsules), -200.0);

        let sentinel = Strategy::Sentinel.profile();
        assert_eq!(sentinel.weights.weight(Feature::CapturableFood), 0.0);
        assert_eq!(sentinel.weights.weight(Feature::UnguardedCapsules), -1000.0);

        let ledger = Strategy::Ledger.profile();
        assert_eq!(ledger.feature_set, FeatureSet::Ledger);
        assert_eq!(ledger.weights.weight(Feature::Score), 1.0);
        assert_eq!(ledger.weights.weight(Feature::CertainDeath), 0.0);
    }

    #[test]
    fn strategy_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Strategy::Sentinel).unwrap(), r#""sentinel""#);
    }
}
