//! One-step lookahead feature extraction.
//!
//! For a candidate action, resolves the successor state and describes it as
//! a sparse vector of named features. Absent features score zero. The
//! extractor is a pure function of `(state, action)`: it never mutates the
//! engine state and keeps nothing between calls.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::agent::AgentError;
use crate::board::cell::{Cell, Direction};
use crate::board::distance::{DistanceOracle, UNREACHABLE};
use crate::board::state::{AgentIndex, AgentView, CaptureState};
use crate::board::territory::Territory;

use super::safety::{
    closest_cell_and_distance, count_capturable, count_unguarded, count_unguarded_capsules,
    has_safe_escape, min_distance, positions, BorderChoice, Participant, SafetyPolicy,
};

/// A named evaluation feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// Own banked score minus the opponent's.
    Score,
    CapturableFood,
    UnguardedFood,
    UnguardedCapsules,
    CapturesOpponent,
    ClosestOpponentDistance,
    CertainDeath,
    ClosestFoodDistance,
    EatsFood,
    ClosestBorder,
}

pub const ALL_FEATURES: [Feature; 10] = [
    Feature::Score,
    Feature::CapturableFood,
    Feature::UnguardedFood,
    Feature::UnguardedCapsules,
    Feature::CapturesOpponent,
    Feature::ClosestOpponentDistance,
    Feature::CertainDeath,
    Feature::ClosestFoodDistance,
    Feature::EatsFood,
    Feature::ClosestBorder,
];

impl Feature {
    pub const fn name(self) -> &'static str {
        match self {
            Feature::Score => "score",
            Feature::CapturableFood => "capturableFood",
            Feature::UnguardedFood => "unguardedFood",
            Feature::UnguardedCapsules => "unguardedCapsules",
            Feature::CapturesOpponent => "capturesOpponent",
            Feature::ClosestOpponentDistance => "closestOpponentDistance",
            Feature::CertainDeath => "certainDeath",
            Feature::ClosestFoodDistance => "closestFoodDistance",
            Feature::EatsFood => "eatsFood",
            Feature::ClosestBorder => "closestBorder",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_FEATURES
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown feature '{}'", s))
    }
}

/// Sparse feature values for one candidate action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(BTreeMap<Feature, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        FeatureVector(BTreeMap::new())
    }

    pub fn set(&mut self, feature: Feature, value: impl Into<f64>) {
        self.0.insert(feature, value.into());
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.0.get(&feature).copied()
    }

    /// Value of a feature, zero when absent.
    pub fn value(&self, feature: Feature) -> f64 {
        self.get(feature).unwrap_or(0.0)
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains_key(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Feature, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (Feature, f64)>>(iter: I) -> Self {
        FeatureVector(iter.into_iter().collect())
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", k, v)?;
            first = false;
        }
        Ok(())
    }
}

/// Which family of features a strategy evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// Safety, proximity, and resource races for every action.
    Tactical,
    /// Banked score plus predicted gains and losses.
    Ledger,
}

impl From<AgentView> for Participant {
    fn from(view: AgentView) -> Self {
        Participant {
            position: view.cell(),
            carrying: view.carrying,
        }
    }
}

/// Everything needed to describe one agent's candidate actions.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    pub index: AgentIndex,
    pub oracle: &'a DistanceOracle,
    pub territory: &'a Territory,
    pub policy: &'a SafetyPolicy,
    pub feature_set: FeatureSet,
}

impl<'a> Extractor<'a> {
    /// The state after `action`, stepping twice if the first step leaves
    /// the agent between cells.
    pub fn successor<S: CaptureState>(&self, state: &S, action: Direction) -> S {
        let next = state.successor(self.index, action);
        match next.agent(self.index).position {
            Some(p) if !p.is_on_cell() => next.successor(self.index, action),
            _ => next,
        }
    }

    fn defense_border(&self) -> &'a [Cell] {
        match self.policy.defense_border {
            BorderChoice::Home => self.territory.home_border(),
            BorderChoice::Enemy => self.territory.enemy_border(),
        }
    }

    /// Builds the feature vector for `action` in `state`.
    pub fn extract<S: CaptureState>(
        &self,
        state: &S,
        action: Direction,
    ) -> Result<FeatureVector, AgentError> {
        let successor = self.successor(state, action);
        match self.feature_set {
            FeatureSet::Tactical => self.tactical(state, &successor),
            FeatureSet::Ledger => Ok(self.ledger(&successor)),
        }
    }

    fn participants<S: CaptureState>(&self, state: &S, home: bool) -> Vec<Participant> {
        let side = if home {
            self.territory.home_side()
        } else {
            self.territory.home_side().opponent()
        };
        state
            .team(side)
            .into_iter()
            .map(|i| Participant::from(state.agent(i)))
            .collect()
    }

    fn tactical<S: CaptureState>(&self, state: &S, successor: &S) -> Result<FeatureVector, AgentError> {
        let oracle = self.oracle;
        let home_side = self.territory.home_side();
        let away_side = home_side.opponent();
        let home_border = self.territory.home_border();

        let me = successor.agent(self.index);
        let pos = me.cell().ok_or(AgentError::Unobserved(self.index))?;

        let team = self.participants(successor, true);
        let enemies = self.participants(successor, false);
        let team_cells = positions(&team);
        let enemy_cells = positions(&enemies);
        let food = successor.food(away_side);
        let defend_food = successor.food(home_side);
        let defend_capsules = successor.capsules(home_side);

        let mut fv = FeatureVector::new();

        fv.set(
            Feature::UnguardedCapsules,
            count_unguarded_capsules(
                oracle,
                &team_cells,
                &enemy_cells,
                &defend_capsules,
                self.policy.capsule_margin,
            ),
        );

        fv.set(
            Feature::UnguardedFood,
            count_unguarded(
                oracle,
                &team_cells,
                &enemies,
                self.defense_border(),
                &defend_food,
                self.policy.defense,
            ),
        );

        if let Some(rule) = self.policy.capture {
            fv.set(
                Feature::CapturableFood,
                count_capturable(oracle, &team, &enemy_cells, home_border, &food, rule),
            );
        }

        let closest_enemy = min_distance(oracle, pos, &enemy_cells);
        if self.territory.is_home(pos) && !me.is_scared() {
            // Compare against where opponents stood before the move; a
            // captured opponent is already back at its start afterwards.
            let before: Vec<Cell> = state
                .team(away_side)
                .into_iter()
                .filter_map(|i| state.agent(i).cell())
                .collect();
            if before.contains(&pos) {
                fv.set(Feature::CapturesOpponent, 1.0);
            } else if closest_enemy != UNREACHABLE {
                fv.set(Feature::ClosestOpponentDistance, closest_enemy);
            }
        } else if closest_enemy < 2 {
            fv.set(Feature::CertainDeath, 1.0);
        } else if self.territory.is_enemy(pos)
            && !home_border.is_empty()
            && !has_safe_escape(
                oracle,
                pos,
                &enemy_cells,
                home_border,
                self.policy.escape_margin,
            )
        {
            fv.set(Feature::CertainDeath, 1.0);
        }

        if food.len() >= state.food(away_side).len() {
            if let Some((_, d)) = closest_cell_and_distance(oracle, pos, &food) {
                if d != UNREACHABLE {
                    fv.set(Feature::ClosestFoodDistance, d);
                }
            }
        } else {
            fv.set(Feature::EatsFood, 1.0);
        }

        if me.carrying > 0 {
            if let Some((_, d)) = closest_cell_and_distance(oracle, pos, home_border) {
                if d != UNREACHABLE {
                    fv.set(Feature::ClosestBorder, d);
                }
            }
        }

        Ok(fv)
    }

    fn ledger<S: CaptureState>(&self, successor: &S) -> FeatureVector {
        let oracle = self.oracle;
        let home_side = self.territory.home_side();
        let away_side = home_side.opponent();

        let team = self.participants(successor, true);
        let enemies = self.participants(successor, false);
        let team_cells = positions(&team);
        let enemy_cells = positions(&enemies);

        let mut fv = FeatureVector::new();
        fv.set(
            Feature::Score,
            successor.score(home_side) - successor.score(away_side),
        );
        if let Some(rule) = self.policy.capture {
            fv.set(
                Feature::CapturableFood,
                count_capturable(
                    oracle,
                    &team,
                    &enemy_cells,
                    self.territory.home_border(),
                    &successor.food(away_side),
                    rule,
                ),
            );
        }
        fv.set(
            Feature::UnguardedFood,
            count_unguarded(
                oracle,
                &team_cells,
                &enemies,
                self.defense_border(),
                &successor.food(home_side),
                self.policy.defense,
            ),
        );
        fv
    }
}
