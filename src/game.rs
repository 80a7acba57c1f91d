//! Local matches on the reference engine.
//!
//! Sets up both teams on a layout, then cycles through the agents in index
//! order, one move per turn, until the turn limit is reached or one side's
//! food is gone. Cargo held by an eliminated invader is lost, not returned
//! to the board, so food can run out without ever being banked.

use std::time::Instant;

use tracing::info;

use crate::agent::{create_team, AgentError, Team};
use crate::board::cell::Direction;
use crate::board::layout::Layout;
use crate::board::snapshot::Snapshot;
use crate::board::state::{AgentIndex, CaptureState};
use crate::board::territory::Side;
use crate::config::{MatchConfig, TeamConfig};

/// Default number of single-agent turns in a match.
pub const DEFAULT_TURNS: usize = 1200;

/// Settings for one local match.
#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub turns: usize,
    /// Seeds every agent whose configuration leaves the seed unset, offset
    /// by agent index.
    pub seed: Option<u64>,
    pub config: MatchConfig,
}

impl Default for MatchSettings {
    fn default() -> Self {
        MatchSettings {
            turns: DEFAULT_TURNS,
            seed: None,
            config: MatchConfig::default(),
        }
    }
}

/// One move of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRecord {
    pub turn: usize,
    pub agent: AgentIndex,
    pub action: Direction,
}

/// Outcome of a finished match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub turns: Vec<TurnRecord>,
    pub final_state: Snapshot,
}

impl MatchResult {
    pub fn score(&self, side: Side) -> i32 {
        self.final_state.score(side)
    }
}

fn with_base_seed(config: &TeamConfig, seed: Option<u64>, first: AgentIndex, second: AgentIndex) -> TeamConfig {
    let mut config = config.clone();
    if let Some(base) = seed {
        for (agent, index) in [(&mut config.first, first), (&mut config.second, second)] {
            if agent.seed.is_none() {
                agent.seed = Some(base.wrapping_add(index as u64));
            }
        }
    }
    config
}

/// Whether either side has run out of food to defend.
pub fn is_over(state: &Snapshot) -> bool {
    state.food(Side::Left).is_empty() || state.food(Side::Right).is_empty()
}

/// Plays a match, calling `on_turn` after every move.
pub fn play_match<F>(layout: &Layout, settings: &MatchSettings, mut on_turn: F) -> Result<MatchResult, AgentError>
where
    F: FnMut(&TurnRecord),
{
    let start = Instant::now();
    let mut state = Snapshot::from_layout(layout);

    let mut left = create_team(0, 2, Side::Left, &with_base_seed(&settings.config.left, settings.seed, 0, 2));
    let mut right = create_team(1, 3, Side::Right, &with_base_seed(&settings.config.right, settings.seed, 1, 3));
    left.register_initial_state(&state);
    right.register_initial_state(&state);

    let order: Vec<AgentIndex> = state.agent_indices().collect();
    let mut turns = Vec::new();

    if !order.is_empty() {
        for turn in 0..settings.turns {
            if is_over(&state) {
                break;
            }
            let agent = order[turn % order.len()];
            let team: &mut Team = match Side::for_agent(agent) {
                Side::Left => &mut left,
                Side::Right => &mut right,
            };
            let action = team.choose_action(agent, &state)?;
            state = state.successor(agent, action);
            let record = TurnRecord { turn, agent, action };
            on_turn(&record);
            turns.push(record);
        }
    }

    info!(
        turns = turns.len(),
        left = state.score(Side::Left),
        right = state.score(Side::Right),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "match finished"
    );

    Ok(MatchResult {
        turns,
        final_state: state,
    })
}
