//! Capture layout text parsing.
//!
//! Layouts use the classic capture-the-flag tile alphabet:
//!
//! - `%` wall
//! - `.` food
//! - `o` power capsule
//! - `1`..`4` agent start cell (agent index = digit - 1)
//! - space: open floor
//!
//! The first text row is the top of the board (`y = height - 1`).

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::cell::Cell;
use super::grid::Grid;

/// Errors that can occur during layout parsing.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile '{tile}' at row {row}, column {col}")]
    UnknownTile { tile: char, row: usize, col: usize },

    #[error("agent {0} appears more than once")]
    DuplicateAgent(usize),

    #[error("failed to read layout: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed layout: the grid plus initial item and agent placement.
#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: Grid,
    pub food: Vec<Cell>,
    pub capsules: Vec<Cell>,
    /// Start cells indexed by agent index. Missing agents are `None`.
    pub agent_starts: Vec<Option<Cell>>,
}

impl Layout {
    /// Start cells of the agents present in the layout, in index order.
    pub fn agents(&self) -> impl Iterator<Item = (usize, Cell)> + '_ {
        self.agent_starts
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|c| (i, c)))
    }
}

/// Parses a layout from text. Trailing blank lines are ignored.
pub fn parse_layout(text: &str) -> Result<Layout, LayoutError> {
    let mut rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    while rows.last().is_some_and(|l| l.trim().is_empty()) {
        rows.pop();
    }

    if rows.is_empty() {
        return Err(LayoutError::Empty);
    }

    let width = rows[0].chars().count();
    let height = rows.len();
    let mut grid = Grid::open(width as i32, height as i32);
    let mut food = Vec::new();
    let mut capsules = Vec::new();
    let mut agent_starts: Vec<Option<Cell>> = Vec::new();

    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }
        let y = (height - 1 - row) as i32;
        for (col, tile) in line.chars().enumerate() {
            let cell = Cell::new(col as i32, y);
            match tile {
                '%' => grid.set_wall(cell, true),
                '.' => food.push(cell),
                'o' => capsules.push(cell),
                ' ' => {}
                '1'..='4' => {
                    let idx = tile as usize - '1' as usize;
                    if agent_starts.len() <= idx {
                        agent_starts.resize(idx + 1, None);
                    }
                    if agent_starts[idx].is_some() {
                        return Err(LayoutError::DuplicateAgent(idx));
                    }
                    agent_starts[idx] = Some(cell);
                }
                other => {
                    return Err(LayoutError::UnknownTile {
                        tile: other,
                        row,
                        col,
                    })
                }
            }
        }
    }

    food.sort();
    capsules.sort();

    Ok(Layout {
        grid,
        food,
        capsules,
        agent_starts,
    })
}

/// Reads and parses a layout file.
pub fn load_layout(path: &Path) -> Result<Layout, LayoutError> {
    let text = fs::read_to_string(path)?;
    parse_layout(&text)
}
