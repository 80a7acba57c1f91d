//! Home and enemy territory.
//!
//! The board is split by a vertical seam. The left team owns columns
//! `x < width / 2`; the right team owns the rest. Each side's border is the
//! column of its own cells touching the seam, so every path between the two
//! territories passes through both border columns.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::cell::Cell;
use super::grid::Grid;

/// Which half of the board a team defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// The side that owns a cell on a board of the given width.
    pub const fn of_cell(width: i32, c: Cell) -> Side {
        if c.x < width / 2 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// The border column this side owns.
    pub const fn border_column(self, width: i32) -> i32 {
        match self {
            Side::Left => width / 2 - 1,
            Side::Right => width / 2,
        }
    }

    /// Conventional side for an agent index: even indices play left.
    pub const fn for_agent(index: usize) -> Side {
        if index % 2 == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Open cells of a column, bottom to top.
fn border_cells(grid: &Grid, x: i32) -> Vec<Cell> {
    (0..grid.height())
        .map(|y| Cell::new(x, y))
        .filter(|&c| grid.is_open(c))
        .collect()
}

/// Returns `(home_border, enemy_border)` for a team on `home_side`.
pub fn compute_borders(grid: &Grid, home_side: Side) -> (Vec<Cell>, Vec<Cell>) {
    let home = border_cells(grid, home_side.border_column(grid.width()));
    let enemy = border_cells(grid, home_side.opponent().border_column(grid.width()));
    (home, enemy)
}

/// A team's view of the board split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    home_side: Side,
    width: i32,
    home_border: Vec<Cell>,
    enemy_border: Vec<Cell>,
}

impl Territory {
    pub fn new(grid: &Grid, home_side: Side) -> Self {
        let (home_border, enemy_border) = compute_borders(grid, home_side);
        if home_border.is_empty() || enemy_border.is_empty() {
            warn!(
                ?home_side,
                home = home_border.len(),
                enemy = enemy_border.len(),
                "border column has no open cells; border features disabled"
            );
        }
        Territory {
            home_side,
            width: grid.width(),
            home_border,
            enemy_border,
        }
    }

    pub fn home_side(&self) -> Side {
        self.home_side
    }

    pub fn home_border(&self) -> &[Cell] {
        &self.home_border
    }

    pub fn enemy_border(&self) -> &[Cell] {
        &self.enemy_border
    }

    pub fn is_home(&self, c: Cell) -> bool {
        Side::of_cell(self.width, c) == self.home_side
    }

    pub fn is_enemy(&self, c: Cell) -> bool {
        !self.is_home(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::parse_layout;

    #[test]
    fn open_seam_borders_span_full_height() {
        let grid = Grid::open(6, 4);
        let (home, enemy) = compute_borders(&grid, Side::Left);
        assert_eq!(home.len(), 4);
        assert_eq!(enemy.len(), 4);
        assert!(home.iter().all(|c| c.x == 2));
        assert!(enemy.iter().all(|c| c.x == 3));
    }

    #[test]
    fn right_side_swaps_columns() {
        let grid = Grid::open(6, 4);
        let (left_home, left_enemy) = compute_borders(&grid, Side::Left);
        let (right_home, right_enemy) = compute_borders(&grid, Side::Right);
        assert_eq!(left_home, right_enemy);
        assert_eq!(left_enemy, right_home);
    }

    #[test]
    fn borders_are_open_and_disjoint() {
        let layout = parse_layout(
            "\
%%%%%%%%
%  %   %
%   %  %
%%%%%%%%
",
        )
        .unwrap();
        let (home, enemy) = compute_borders(&layout.grid, Side::Left);
        for c in home.iter().chain(enemy.iter()) {
            assert!(layout.grid.is_open(*c));
        }
        assert!(home.iter().all(|c| !enemy.contains(c)));
        assert_eq!(home, vec![Cell::new(3, 1)]);
        assert_eq!(enemy, vec![Cell::new(4, 2)]);
    }

    #[test]
    fn walled_column_gives_empty_border() {
        let mut grid = Grid::open(6, 4);
        grid.wall_column(2);
        let territory = Territory::new(&grid, Side::Left);
        assert!(territory.home_border().is_empty());
        assert_eq!(territory.enemy_border().len(), 4);
    }

    #[test]
    fn odd_width_split() {
        let grid = Grid::open(5, 3);
        let left = Territory::new(&grid, Side::Left);
        assert!(left.home_border().iter().all(|c| c.x == 1));
        assert!(left.enemy_border().iter().all(|c| c.x == 2));
        assert!(left.is_home(Cell::new(1, 1)));
        assert!(left.is_enemy(Cell::new(2, 1)));

        let right = Territory::new(&grid, Side::Right);
        assert!(right.is_enemy(Cell::new(1, 1)));
        assert!(right.is_home(Cell::new(4, 0)));
    }

    #[test]
    fn agent_index_parity_picks_side() {
        assert_eq!(Side::for_agent(0), Side::Left);
        assert_eq!(Side::for_agent(3), Side::Right);
    }
}
