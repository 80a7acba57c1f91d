//! Reference engine.
//!
//! A small, fully observed implementation of `CaptureState` with just the
//! rules the heuristics reason about: moving, eating enemy-side food,
//! eating capsules, banking cargo at home, and collisions at the seam.
//! Used by the command-line driver, the scenario tests, and the benches.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::cell::{Cell, Direction, Position, ALL_DIRECTIONS};
use super::grid::Grid;
use super::layout::Layout;
use super::state::{AgentIndex, AgentView, CaptureState};
use super::territory::Side;

/// Moves an agent stays scared after an opponent eats a capsule.
pub const SCARED_TIME: u32 = 40;

/// Full engine-side state of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentState {
    pub side: Side,
    pub start: Cell,
    pub position: Cell,
    pub carrying: u32,
    pub scared_timer: u32,
    /// Unobserved agents report no position through `CaptureState`.
    pub observed: bool,
}

impl AgentState {
    pub fn new(side: Side, start: Cell) -> Self {
        AgentState {
            side,
            start,
            position: start,
            carrying: 0,
            scared_timer: 0,
            observed: true,
        }
    }

    fn respawn(&mut self) {
        self.position = self.start;
        self.carrying = 0;
        self.scared_timer = 0;
    }
}

/// A complete game position for the reference engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    grid: Arc<Grid>,
    agents: Vec<Option<AgentState>>,
    food: BTreeSet<Cell>,
    capsules: BTreeSet<Cell>,
    /// Banked score, indexed left then right.
    scores: [i32; 2],
}

const fn side_slot(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

impl Snapshot {
    /// Creates a position with no agents or items.
    pub fn new(grid: Grid) -> Self {
        Snapshot {
            grid: Arc::new(grid),
            agents: Vec::new(),
            food: BTreeSet::new(),
            capsules: BTreeSet::new(),
            scores: [0, 0],
        }
    }

    /// Builds the starting position of a layout. Even agent indices play left.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut snap = Snapshot::new(layout.grid.clone())
            .with_food(layout.food.iter().copied())
            .with_capsules(layout.capsules.iter().copied());
        for (index, start) in layout.agents() {
            snap = snap.with_agent(index, Side::for_agent(index), start);
        }
        snap
    }

    /// Places an agent, replacing any previous agent with the same index.
    pub fn with_agent(mut self, index: AgentIndex, side: Side, cell: Cell) -> Self {
        if self.agents.len() <= index {
            self.agents.resize(index + 1, None);
        }
        self.agents[index] = Some(AgentState::new(side, cell));
        self
    }

    pub fn with_food(mut self, cells: impl IntoIterator<Item = Cell>) -> Self {
        self.food.extend(cells);
        self
    }

    pub fn with_capsules(mut self, cells: impl IntoIterator<Item = Cell>) -> Self {
        self.capsules.extend(cells);
        self
    }

    pub fn agent_state(&self, index: AgentIndex) -> Option<&AgentState> {
        self.agents.get(index).and_then(|a| a.as_ref())
    }

    pub fn agent_state_mut(&mut self, index: AgentIndex) -> Option<&mut AgentState> {
        self.agents.get_mut(index).and_then(|a| a.as_mut())
    }

    /// Indices of all agents present.
    pub fn agent_indices(&self) -> impl Iterator<Item = AgentIndex> + '_ {
        self.agents
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.as_ref().map(|_| i))
    }

    pub fn set_carrying(&mut self, index: AgentIndex, carrying: u32) {
        if let Some(a) = self.agent_state_mut(index) {
            a.carrying = carrying;
        }
    }

    pub fn set_scared(&mut self, index: AgentIndex, timer: u32) {
        if let Some(a) = self.agent_state_mut(index) {
            a.scared_timer = timer;
        }
    }

    pub fn set_observed(&mut self, index: AgentIndex, observed: bool) {
        if let Some(a) = self.agent_state_mut(index) {
            a.observed = observed;
        }
    }

    pub fn set_position(&mut self, index: AgentIndex, cell: Cell) {
        if let Some(a) = self.agent_state_mut(index) {
            a.position = cell;
        }
    }

    /// True when a cell is in enemy territory for the given side.
    fn is_invading(&self, side: Side, c: Cell) -> bool {
        Side::of_cell(self.grid.width(), c) != side
    }

    /// Applies one move in place.
    fn apply(&mut self, index: AgentIndex, action: Direction) {
        let Some(mut me) = self.agent_state(index).copied() else {
            return;
        };

        let target = me.position.step(action);
        if self.grid.is_open(target) {
            me.position = target;
        }
        me.scared_timer = me.scared_timer.saturating_sub(1);

        if self.is_invading(me.side, me.position) {
            if self.food.remove(&me.position) {
                me.carrying += 1;
            }
            if self.capsules.remove(&me.position) {
                for other in self.agents.iter_mut().flatten() {
                    if other.side != me.side {
                        other.scared_timer = SCARED_TIME;
                    }
                }
            }
        } else if me.carrying > 0 {
            self.scores[side_slot(me.side)] += me.carrying as i32;
            me.carrying = 0;
        }

        let me_invading = self.is_invading(me.side, me.position);
        let width = self.grid.width();
        for (j, slot) in self.agents.iter_mut().enumerate() {
            let Some(other) = slot.as_mut() else {
                continue;
            };
            if j == index || other.side == me.side || other.position != me.position {
                continue;
            }
            let other_invading = Side::of_cell(width, other.position) != other.side;
            if me_invading && !other_invading {
                if other.scared_timer > 0 {
                    other.respawn();
                } else {
                    me.respawn();
                    break;
                }
            } else if other_invading && !me_invading {
                if me.scared_timer > 0 {
                    me.respawn();
                    break;
                } else {
                    other.respawn();
                }
            }
        }

        self.agents[index] = Some(me);
    }
}

impl CaptureState for Snapshot {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn legal_actions(&self, agent: AgentIndex) -> Vec<Direction> {
        let Some(a) = self.agent_state(agent) else {
            return Vec::new();
        };
        ALL_DIRECTIONS
            .iter()
            .copied()
            .filter(|&d| self.grid.is_open(a.position.step(d)))
            .collect()
    }

    fn successor(&self, agent: AgentIndex, action: Direction) -> Self {
        let mut next = self.clone();
        next.apply(agent, action);
        next
    }

    fn agent(&self, agent: AgentIndex) -> AgentView {
        match self.agent_state(agent) {
            Some(a) => AgentView {
                position: a.observed.then(|| Position::from(a.position)),
                carrying: a.carrying,
                scared_timer: a.scared_timer,
            },
            None => AgentView {
                position: None,
                carrying: 0,
                scared_timer: 0,
            },
        }
    }

    fn team(&self, side: Side) -> Vec<AgentIndex> {
        self.agents
            .iter()
            .enumerate()
            .filter_map(|(i, a)| match a {
                Some(a) if a.side == side => Some(i),
                _ => None,
            })
            .collect()
    }

    fn food(&self, side: Side) -> Vec<Cell> {
        let width = self.grid.width();
        self.food
            .iter()
            .copied()
            .filter(|&c| Side::of_cell(width, c) == side)
            .collect()
    }

    fn capsules(&self, side: Side) -> Vec<Cell> {
        let width = self.grid.width();
        self.capsules
            .iter()
            .copied()
            .filter(|&c| Side::of_cell(width, c) == side)
            .collect()
    }

    fn score(&self, side: Side) -> i32 {
        self.scores[side_slot(side)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 6x3 open board, agent 0 on the left at (1,1), agent 1 on the right at (4,1).
    fn duel() -> Snapshot {
        Snapshot::new(Grid::open(6, 3))
            .with_agent(0, Side::Left, Cell::new(1, 1))
            .with_agent(1, Side::Right, Cell::new(4, 1))
    }

    #[test]
    fn legal_actions_exclude_walls() {
        let snap = Snapshot::new(Grid::open(3, 1)).with_agent(0, Side::Left, Cell::new(0, 0));
        let actions = snap.legal_actions(0);
        assert_eq!(actions, vec![Direction::East, Direction::Stop]);
        assert!(snap.legal_actions(5).is_empty());
    }

    #[test]
    fn eating_enemy_food_increments_carrying() {
        let snap = duel().with_food([Cell::new(3, 1)]);
        let snap = snap.successor(0, Direction::East).successor(0, Direction::East);
        assert_eq!(snap.agent(0).carrying, 1);
        assert!(snap.food(Side::Right).is_empty());
    }

    #[test]
    fn own_food_is_not_eaten() {
        let snap = duel().with_food([Cell::new(2, 1)]);
        let next = snap.successor(0, Direction::East);
        assert_eq!(next.agent(0).carrying, 0);
        assert_eq!(next.food(Side::Left), vec![Cell::new(2, 1)]);
    }

    #[test]
    fn returning_home_banks_cargo() {
        let mut snap = duel();
        snap.set_position(0, Cell::new(3, 0));
        snap.set_carrying(0, 3);
        let next = snap.successor(0, Direction::West);
        assert_eq!(next.agent(0).carrying, 0);
        assert_eq!(next.score(Side::Left), 3);
        assert_eq!(next.score(Side::Right), 0);
    }

    #[test]
    fn invader_is_eliminated_by_defender() {
        let mut snap = duel();
        snap.set_position(0, Cell::new(3, 1));
        snap.set_carrying(0, 2);
        let next = snap.successor(0, Direction::East);
        let me = next.agent_state(0).unwrap();
        assert_eq!(me.position, Cell::new(1, 1));
        assert_eq!(me.carrying, 0);
    }

    #[test]
    fn scared_defender_is_eliminated() {
        let mut snap = Snapshot::new(Grid::open(6, 3))
            .with_agent(0, Side::Left, Cell::new(3, 1))
            .with_agent(1, Side::Right, Cell::new(5, 2));
        snap.set_position(1, Cell::new(4, 1));
        snap.set_scared(1, 5);
        let next = snap.successor(0, Direction::East);
        assert_eq!(next.agent_state(0).unwrap().position, Cell::new(4, 1));
        let defender = next.agent_state(1).unwrap();
        assert_eq!(defender.position, Cell::new(5, 2));
        assert_eq!(defender.scared_timer, 0);
    }

    #[test]
    fn capsule_scares_opponents() {
        let snap = duel().with_capsules([Cell::new(3, 2)]);
        let next = snap
            .successor(0, Direction::East)
            .successor(0, Direction::East)
            .successor(0, Direction::North);
        assert!(next.capsules(Side::Right).is_empty());
        assert_eq!(next.agent(1).scared_timer, SCARED_TIME);
        assert_eq!(next.agent(0).scared_timer, 0);
    }

    #[test]
    fn unobserved_agent_has_no_position() {
        let mut snap = duel();
        snap.set_observed(1, false);
        assert!(snap.agent(1).position.is_none());
        assert_eq!(snap.agent(0).cell(), Some(Cell::new(1, 1)));
    }

    #[test]
    fn teams_split_by_side() {
        let snap = duel().with_agent(2, Side::Left, Cell::new(0, 0));
        assert_eq!(snap.team(Side::Left), vec![0, 2]);
        assert_eq!(snap.team(Side::Right), vec![1]);
    }
}
