//! Walled grid representation.
//!
//! The grid is owned by the engine and fixed for the duration of a game.
//! Walls are stored row-major; anything outside the bounds reads as a wall.

use super::cell::{Cell, Direction};

/// Width, height, and wall layout of the playing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    walls: Vec<bool>,
}

impl Grid {
    /// Creates a grid with no walls.
    pub fn open(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Grid {
            width,
            height,
            walls: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, c: Cell) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    /// Row-major index of an in-bounds cell.
    #[inline]
    pub fn index(&self, c: Cell) -> Option<usize> {
        if self.in_bounds(c) {
            Some((c.y * self.width + c.x) as usize)
        } else {
            None
        }
    }

    /// Inverse of `index`.
    #[inline]
    pub fn cell_at(&self, idx: usize) -> Cell {
        let idx = idx as i32;
        Cell::new(idx % self.width, idx / self.width)
    }

    pub fn set_wall(&mut self, c: Cell, wall: bool) {
        if let Some(i) = self.index(c) {
            self.walls[i] = wall;
        }
    }

    /// Out-of-bounds cells are walls.
    #[inline]
    pub fn is_wall(&self, c: Cell) -> bool {
        match self.index(c) {
            Some(i) => self.walls[i],
            None => true,
        }
    }

    #[inline]
    pub fn is_open(&self, c: Cell) -> bool {
        !self.is_wall(c)
    }

    /// All open cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.walls.len())
            .filter(|&i| !self.walls[i])
            .map(|i| self.cell_at(i))
    }

    /// Open orthogonal neighbours of a cell.
    pub fn neighbors(&self, c: Cell) -> impl Iterator<Item = Cell> + '_ {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
        .into_iter()
        .map(move |d| c.step(d))
        .filter(|n| self.is_open(*n))
    }

    /// Walls every cell of a column.
    pub fn wall_column(&mut self, x: i32) {
        for y in 0..self.height {
            self.set_wall(Cell::new(x, y), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_wall() {
        let g = Grid::open(3, 2);
        assert!(g.is_wall(Cell::new(-1, 0)));
        assert!(g.is_wall(Cell::new(3, 0)));
        assert!(g.is_wall(Cell::new(0, 2)));
        assert!(g.is_open(Cell::new(2, 1)));
    }

    #[test]
    fn index_roundtrip() {
        let g = Grid::open(4, 3);
        for c in g.open_cells() {
            assert_eq!(g.cell_at(g.index(c).unwrap()), c);
        }
        assert_eq!(g.open_cells().count(), 12);
    }

    #[test]
    fn neighbors_skip_walls() {
        let mut g = Grid::open(3, 3);
        g.set_wall(Cell::new(1, 2), true);
        let mut n: Vec<Cell> = g.neighbors(Cell::new(1, 1)).collect();
        n.sort();
        assert_eq!(n, vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(2, 1)]);
        assert_eq!(g.neighbors(Cell::new(0, 0)).count(), 2);
    }

    #[test]
    fn wall_column_closes_whole_column() {
        let mut g = Grid::open(4, 3);
        g.wall_column(2);
        assert!((0..3).all(|y| g.is_wall(Cell::new(2, y))));
        assert_eq!(g.open_cells().count(), 9);
    }
}
