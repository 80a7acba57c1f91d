//! Agent and team configuration.
//!
//! Configuration is plain JSON. Every field is optional; an empty object
//! gives two symmetric agents seeded from entropy.
//!
//! ```json
//! {
//!   "first":  { "strategy": "symmetric", "seed": 7 },
//!   "second": { "strategy": "sentinel", "weights": { "unguardedCapsules": -500 } }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::scoring::WeightTable;
use crate::strategy::{Strategy, StrategyProfile};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for one agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub strategy: Strategy,
    /// Tie-break RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Weight overrides layered over the strategy preset.
    pub weights: Option<WeightTable>,
}

impl AgentConfig {
    pub fn new(strategy: Strategy) -> Self {
        AgentConfig {
            strategy,
            ..AgentConfig::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The strategy preset with any weight overrides applied.
    pub fn profile(&self) -> StrategyProfile {
        let mut profile = self.strategy.profile();
        if let Some(w) = &self.weights {
            profile.weights.merge(w);
        }
        profile
    }
}

/// Settings for the two agents of a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeamConfig {
    pub first: AgentConfig,
    pub second: AgentConfig,
}

impl TeamConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Settings for both teams of a local match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub left: TeamConfig,
    pub right: TeamConfig,
}

impl MatchConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
