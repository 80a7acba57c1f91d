//! The engine-facing game state interface.
//!
//! The game engine is an external collaborator: it owns the rules, the
//! legal-move generator, and successor generation. The heuristic core only
//! reads state through `CaptureState`, which any engine can implement.
//! `Snapshot` in the sibling module is the in-crate reference engine.

use super::cell::{Cell, Direction, Position};
use super::grid::Grid;
use super::territory::Side;

/// Index of an agent within a game.
pub type AgentIndex = usize;

/// What the core may observe about one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    /// `None` when the agent is not currently observed.
    pub position: Option<Position>,
    /// Resources the agent holds and will lose if eliminated away from home.
    pub carrying: u32,
    /// Moves remaining during which the agent cannot eliminate invaders.
    pub scared_timer: u32,
}

impl AgentView {
    /// Observed position snapped to a cell.
    pub fn cell(&self) -> Option<Cell> {
        self.position.map(Position::nearest_cell)
    }

    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }
}

/// Read-only access to an engine's state plus one-step lookahead.
pub trait CaptureState: Sized {
    /// The fixed board.
    fn grid(&self) -> &Grid;

    /// Legal actions for an agent. May be empty in a stalled state.
    fn legal_actions(&self, agent: AgentIndex) -> Vec<Direction>;

    /// The state after `agent` plays `action`.
    fn successor(&self, agent: AgentIndex, action: Direction) -> Self;

    fn agent(&self, agent: AgentIndex) -> AgentView;

    /// Agent indices playing for a side.
    fn team(&self, side: Side) -> Vec<AgentIndex>;

    /// Food cells lying in a side's territory.
    fn food(&self, side: Side) -> Vec<Cell>;

    /// Power capsules lying in a side's territory.
    fn capsules(&self, side: Side) -> Vec<Cell>;

    /// Banked score for a side.
    fn score(&self, side: Side) -> i32;
}
