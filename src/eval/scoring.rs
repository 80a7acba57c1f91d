//! Linear scoring and tie-breaking action selection.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::features::{Feature, FeatureVector};

/// Fixed per-feature weights. Missing weights count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<Feature, f64>);

impl WeightTable {
    pub fn new(weights: impl IntoIterator<Item = (Feature, f64)>) -> Self {
        WeightTable(weights.into_iter().collect())
    }

    pub fn weight(&self, feature: Feature) -> f64 {
        self.0.get(&feature).copied().unwrap_or(0.0)
    }

    /// Overrides entries with those from `other`.
    pub fn merge(&mut self, other: &WeightTable) {
        for (&k, &v) in other.0.iter() {
            self.0.insert(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }
}

/// Weighted sum over the features present in `features`.
pub fn score(features: &FeatureVector, weights: &WeightTable) -> f64 {
    features
        .iter()
        .map(|(f, v)| v * weights.weight(f))
        .sum()
}

/// Picks uniformly among the candidates with the highest score. `None` when
/// there are no candidates.
pub fn select_best<T: Copy, R: Rng + ?Sized>(scored: &[(T, f64)], rng: &mut R) -> Option<T> {
    let max = scored
        .iter()
        .map(|&(_, s)| s)
        .fold(f64::NEG_INFINITY, f64::max);
    let best: Vec<T> = scored
        .iter()
        .filter(|&&(_, s)| s == max)
        .map(|&(t, _)| t)
        .collect();
    best.choose(rng).copied()
}
