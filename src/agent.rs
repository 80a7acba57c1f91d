//! Capture agents and teams.
//!
//! A [`CaptureAgent`] is registered once with the initial game state, which
//! precomputes the distance oracle and territory borders, and is then asked
//! for one action per turn. A [`Team`] shares a single oracle between its
//! two agents.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

use crate::board::cell::Direction;
use crate::board::distance::DistanceOracle;
use crate::board::state::{AgentIndex, CaptureState};
use crate::board::territory::{Side, Territory};
use crate::config::{AgentConfig, TeamConfig};
use crate::eval::features::{Extractor, FeatureVector};
use crate::eval::scoring::{score, select_best};
use crate::strategy::{Strategy, StrategyProfile};

/// Errors raised while choosing or evaluating actions.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {0} has no legal actions")]
    NoLegalActions(AgentIndex),

    #[error("agent {0} has not been registered with a game")]
    NotRegistered(AgentIndex),

    #[error("agent {0} is not a member of this team")]
    NotOnTeam(AgentIndex),

    #[error("agent {0} is not observed in the current state")]
    Unobserved(AgentIndex),

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
}

/// Per-game data built at registration.
#[derive(Debug, Clone)]
struct Registration {
    oracle: Arc<DistanceOracle>,
    territory: Territory,
}

/// A heuristic agent that scores each legal action and plays the best.
#[derive(Debug, Clone)]
pub struct CaptureAgent<R = SmallRng> {
    index: AgentIndex,
    side: Side,
    strategy: Strategy,
    profile: StrategyProfile,
    registration: Option<Registration>,
    rng: R,
}

impl CaptureAgent<SmallRng> {
    /// Creates an agent with the preset profile for `strategy`, seeded from
    /// entropy.
    pub fn new(index: AgentIndex, side: Side, strategy: Strategy) -> Self {
        Self::with_rng(index, side, strategy, strategy.profile(), SmallRng::from_entropy())
    }

    /// Creates an agent from configuration.
    pub fn from_config(index: AgentIndex, side: Side, config: &AgentConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(index, side, config.strategy, config.profile(), rng)
    }
}

impl<R: Rng> CaptureAgent<R> {
    pub fn with_rng(
        index: AgentIndex,
        side: Side,
        strategy: Strategy,
        profile: StrategyProfile,
        rng: R,
    ) -> Self {
        CaptureAgent {
            index,
            side,
            strategy,
            profile,
            registration: None,
            rng,
        }
    }

    pub fn index(&self) -> AgentIndex {
        self.index
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn profile(&self) -> &StrategyProfile {
        &self.profile
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    pub fn oracle(&self) -> Option<&Arc<DistanceOracle>> {
        self.registration.as_ref().map(|r| &r.oracle)
    }

    pub fn territory(&self) -> Option<&Territory> {
        self.registration.as_ref().map(|r| &r.territory)
    }

    /// Precomputes all-pairs distances and borders for a new game.
    pub fn register_initial_state<S: CaptureState>(&mut self, state: &S) {
        let oracle = Arc::new(DistanceOracle::precompute(state.grid()));
        self.register_with_oracle(state, oracle);
    }

    /// Registers with an oracle computed elsewhere, typically by a teammate.
    pub fn register_with_oracle<S: CaptureState>(&mut self, state: &S, oracle: Arc<DistanceOracle>) {
        let start = Instant::now();
        let territory = Territory::new(state.grid(), self.side);
        info!(
            agent = self.index,
            strategy = %self.strategy,
            side = ?self.side,
            home_border = territory.home_border().len(),
            enemy_border = territory.enemy_border().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "agent registered"
        );
        self.registration = Some(Registration { oracle, territory });
    }

    fn extractor(&self) -> Result<Extractor<'_>, AgentError> {
        let reg = self
            .registration
            .as_ref()
            .ok_or(AgentError::NotRegistered(self.index))?;
        Ok(Extractor {
            index: self.index,
            oracle: &reg.oracle,
            territory: &reg.territory,
            policy: &self.profile.policy,
            feature_set: self.profile.feature_set,
        })
    }

    /// Feature vector for `action` in `state`.
    pub fn features<S: CaptureState>(
        &self,
        state: &S,
        action: Direction,
    ) -> Result<FeatureVector, AgentError> {
        self.extractor()?.extract(state, action)
    }

    /// Weighted score of `action` in `state`.
    pub fn evaluate<S: CaptureState>(&self, state: &S, action: Direction) -> Result<f64, AgentError> {
        let fv = self.features(state, action)?;
        Ok(score(&fv, &self.profile.weights))
    }

    /// Scores every legal action and returns one of the highest-scoring,
    /// breaking ties uniformly at random.
    pub fn choose_action<S: CaptureState>(&mut self, state: &S) -> Result<Direction, AgentError> {
        let actions = state.legal_actions(self.index);
        if actions.is_empty() {
            return Err(AgentError::NoLegalActions(self.index));
        }

        let scored = {
            let extractor = self.extractor()?;
            let mut scored = Vec::with_capacity(actions.len());
            for action in actions {
                let fv = extractor.extract(state, action)?;
                let value = score(&fv, &self.profile.weights);
                debug!(agent = self.index, %action, value, features = %fv, "scored action");
                scored.push((action, value));
            }
            scored
        };

        select_best(&scored, &mut self.rng).ok_or(AgentError::NoLegalActions(self.index))
    }
}

/// The two agents of one side, sharing a distance oracle.
#[derive(Debug, Clone)]
pub struct Team {
    side: Side,
    agents: Vec<CaptureAgent>,
}

/// Creates an agent from configuration.
pub fn create_agent(index: AgentIndex, side: Side, config: &AgentConfig) -> CaptureAgent {
    CaptureAgent::from_config(index, side, config)
}

/// Creates the two agents of a team.
pub fn create_team(
    first_index: AgentIndex,
    second_index: AgentIndex,
    side: Side,
    config: &TeamConfig,
) -> Team {
    Team {
        side,
        agents: vec![
            create_agent(first_index, side, &config.first),
            create_agent(second_index, side, &config.second),
        ],
    }
}

impl Team {
    pub fn side(&self) -> Side {
        self.side
    }

    pub fn agents(&self) -> &[CaptureAgent] {
        &self.agents
    }

    pub fn indices(&self) -> impl Iterator<Item = AgentIndex> + '_ {
        self.agents.iter().map(|a| a.index())
    }

    pub fn agent(&self, index: AgentIndex) -> Option<&CaptureAgent> {
        self.agents.iter().find(|a| a.index() == index)
    }

    pub fn agent_mut(&mut self, index: AgentIndex) -> Option<&mut CaptureAgent> {
        self.agents.iter_mut().find(|a| a.index() == index)
    }

    /// Registers both agents, computing the distance oracle once.
    pub fn register_initial_state<S: CaptureState>(&mut self, state: &S) {
        let oracle = Arc::new(DistanceOracle::precompute(state.grid()));
        for agent in &mut self.agents {
            agent.register_with_oracle(state, Arc::clone(&oracle));
        }
    }

    /// Chooses an action for the team member with the given index.
    pub fn choose_action<S: CaptureState>(
        &mut self,
        index: AgentIndex,
        state: &S,
    ) -> Result<Direction, AgentError> {
        self.agent_mut(index)
            .ok_or(AgentError::NotOnTeam(index))?
            .choose_action(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cell::Cell;
    use crate::board::grid::Grid;
    use crate::board::snapshot::Snapshot;
    use crate::eval::features::Feature;

    fn duel() -> Snapshot {
        Snapshot::new(Grid::open(8, 3))
            .with_agent(0, Side::Left, Cell::new(1, 1))
            .with_agent(1, Side::Right, Cell::new(6, 1))
            .with_food([Cell::new(5, 2), Cell::new(2, 0)])
    }

    fn seeded(index: AgentIndex, side: Side, strategy: Strategy) -> CaptureAgent {
        CaptureAgent::from_config(index, side, &AgentConfig::new(strategy).with_seed(3))
    }

    // --- registration ---

    #[test]
    fn unregistered_agent_refuses_to_act() {
        let snap = duel();
        let mut agent = seeded(0, Side::Left, Strategy::Symmetric);
        assert!(!agent.is_registered());
        assert!(matches!(agent.choose_action(&snap), Err(AgentError::NotRegistered(0))));
        assert!(matches!(agent.features(&snap, Direction::Stop), Err(AgentError::NotRegistered(0))));
    }

    #[test]
    fn registration_builds_oracle_and_borders() {
        let snap = duel();
        let mut agent = seeded(0, Side::Left, Strategy::Symmetric);
        agent.register_initial_state(&snap);
        let oracle = agent.oracle().unwrap();
        assert_eq!(oracle.cell_count(), 24);
        let territory = agent.territory().unwrap();
        assert!(territory.home_border().iter().all(|c| c.x == 3));
        assert!(territory.enemy_border().iter().all(|c| c.x == 4));
    }

    #[test]
    fn team_shares_one_oracle() {
        let snap = duel()
            .with_agent(2, Side::Left, Cell::new(1, 0))
            .with_agent(3, Side::Right, Cell::new(6, 0));
        let mut team = create_team(0, 2, Side::Left, &TeamConfig::default());
        team.register_initial_state(&snap);
        let a = team.agent(0).unwrap().oracle().unwrap();
        let b = team.agent(2).unwrap().oracle().unwrap();
        assert!(Arc::ptr_eq(a, b));
        assert_eq!(team.indices().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn team_rejects_foreign_agent() {
        let snap = duel()
            .with_agent(2, Side::Left, Cell::new(1, 0))
            .with_agent(3, Side::Right, Cell::new(6, 0));
        let mut team = create_team(0, 2, Side::Left, &TeamConfig::default());
        team.register_initial_state(&snap);
        assert!(matches!(team.choose_action(1, &snap), Err(AgentError::NotOnTeam(1))));
        assert!(team.choose_action(2, &snap).is_ok());
    }

    // --- choosing ---

    #[test]
    fn chosen_action_is_legal() {
        let snap = duel();
        for strategy in crate::strategy::ALL_STRATEGIES {
            let mut agent = seeded(0, Side::Left, strategy);
            agent.register_initial_state(&snap);
            let legal = snap.legal_actions(0);
            for _ in 0..20 {
                let action = agent.choose_action(&snap).unwrap();
                assert!(legal.contains(&action), "{} chose {}", strategy, action);
            }
        }
    }

    #[test]
    fn chosen_action_has_maximal_score() {
        let snap = duel();
        let mut agent = seeded(0, Side::Left, Strategy::Symmetric);
        agent.register_initial_state(&snap);
        let best = snap
            .legal_actions(0)
            .into_iter()
            .map(|a| agent.evaluate(&snap, a).unwrap())
            .fold(f64::NEG_INFINITY, f64::max);
        for _ in 0..20 {
            let action = agent.choose_action(&snap).unwrap();
            assert_eq!(agent.evaluate(&snap, action).unwrap(), best);
        }
    }

    #[test]
    fn evaluation_does_not_mutate_state() {
        let snap = duel();
        let mut agent = seeded(0, Side::Left, Strategy::Symmetric);
        agent.register_initial_state(&snap);
        let before = snap.clone();
        let first = agent.features(&snap, Direction::East).unwrap();
        agent.choose_action(&snap).unwrap();
        let second = agent.features(&snap, Direction::East).unwrap();
        assert_eq!(first, second);
        assert_eq!(snap, before);
    }

    #[test]
    fn same_seed_same_choices() {
        let snap = duel();
        let mut a = seeded(0, Side::Left, Strategy::Symmetric);
        let mut b = seeded(0, Side::Left, Strategy::Symmetric);
        a.register_initial_state(&snap);
        b.register_initial_state(&snap);
        for _ in 0..20 {
            assert_eq!(a.choose_action(&snap).unwrap(), b.choose_action(&snap).unwrap());
        }
    }

    #[test]
    fn unobserved_self_is_an_error() {
        let mut snap = duel();
        snap.set_observed(0, false);
        let mut agent = seeded(0, Side::Left, Strategy::Symmetric);
        agent.register_initial_state(&snap);
        assert!(matches!(agent.choose_action(&snap), Err(AgentError::Unobserved(0))));
    }

    #[test]
    fn weight_overrides_reach_the_agent() {
        let mut cfg = AgentConfig::new(Strategy::Symmetric);
        cfg.weights = Some(crate::eval::scoring::WeightTable::new([(Feature::ClosestBorder, -7.0)]));
        let agent = create_agent(0, Side::Left, &cfg);
        assert_eq!(agent.profile().weights.weight(Feature::ClosestBorder), -7.0);
        assert_eq!(agent.profile().weights.weight(Feature::EatsFood), 100.0);
    }
}
