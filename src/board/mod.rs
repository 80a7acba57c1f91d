//! Board representation and the engine-facing state interface.
//!
//! Contains the grid, layout parsing, the all-pairs distance oracle, the
//! territory split, and the reference engine used for local play.

pub mod cell;
pub mod distance;
pub mod grid;
pub mod layout;
pub mod snapshot;
pub mod state;
pub mod territory;

pub use cell::{Cell, Direction, Position, ALL_DIRECTIONS};
pub use distance::{Distance, DistanceOracle, UNREACHABLE};
pub use grid::Grid;
pub use layout::{load_layout, parse_layout, Layout, LayoutError};
pub use snapshot::{AgentState, Snapshot, SCARED_TIME};
pub use state::{AgentIndex, AgentView, CaptureState};
pub use territory::{compute_borders, Side, Territory};
