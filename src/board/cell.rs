//! Grid coordinates, engine positions, and movement directions.
//!
//! A `Cell` is an integer grid coordinate. The engine may report an agent
//! between two cells while a move is in flight, so agent positions are
//! carried as `Position` and snapped to a `Cell` for distance lookups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An integer grid coordinate. `y = 0` is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Returns the cell one step away in the given direction.
    pub const fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance, ignoring walls.
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An agent position as reported by the engine. May be fractional while a
/// two-phase move is only half complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Rounds to the closest cell.
    pub fn nearest_cell(self) -> Cell {
        Cell {
            x: (self.x + 0.5).floor() as i32,
            y: (self.y + 0.5).floor() as i32,
        }
    }

    /// True when the position sits exactly on a cell.
    pub fn is_on_cell(self) -> bool {
        let c = self.nearest_cell();
        c.x as f64 == self.x && c.y as f64 == self.y
    }
}

impl From<Cell> for Position {
    fn from(c: Cell) -> Self {
        Position {
            x: c.x as f64,
            y: c.y as f64,
        }
    }
}

/// A movement action for a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stop,
}

/// All directions in canonical order. `Stop` is last.
pub const ALL_DIRECTIONS: [Direction; 5] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
    Direction::Stop,
];

impl Direction {
    /// Unit offset for one step. North increases `y`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Stop => (0, 0),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Stop => "Stop",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_DIRECTIONS
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown direction '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_one_cell() {
        let c = Cell::new(3, 3);
        assert_eq!(c.step(Direction::North), Cell::new(3, 4));
        assert_eq!(c.step(Direction::South), Cell::new(3, 2));
        assert_eq!(c.step(Direction::East), Cell::new(4, 3));
        assert_eq!(c.step(Direction::West), Cell::new(2, 3));
        assert_eq!(c.step(Direction::Stop), c);
    }

    #[test]
    fn half_step_position_is_not_on_cell() {
        let p = Position::new(2.5, 1.0);
        assert!(!p.is_on_cell());
        assert!(Position::from(Cell::new(2, 1)).is_on_cell());
    }

    #[test]
    fn nearest_cell_rounds() {
        assert_eq!(Position::new(1.4, 2.6).nearest_cell(), Cell::new(1, 3));
        assert_eq!(Position::new(0.0, 0.0).nearest_cell(), Cell::new(0, 0));
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("north".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("Stop".parse::<Direction>(), Ok(Direction::Stop));
        assert!("up".parse::<Direction>().is_err());
    }
}
