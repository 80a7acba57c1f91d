//! All-pairs maze distances.
//!
//! Runs one BFS per open cell and stores the result in a flat square
//! matrix indexed by open-cell slot. Built once per grid at registration;
//! lookups afterwards are O(1). Rows are independent, so they are filled
//! in parallel.

use std::collections::VecDeque;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use super::cell::Cell;
use super::grid::Grid;

/// Hop count between two cells.
pub type Distance = u32;

/// Returned for pairs with no connecting path. Compares greater than every
/// real distance, so it loses every minimisation naturally.
pub const UNREACHABLE: Distance = Distance::MAX;

const NO_SLOT: u32 = u32::MAX;

/// Precomputed shortest-path distances between every pair of open cells.
#[derive(Debug, Clone)]
pub struct DistanceOracle {
    width: i32,
    height: i32,
    /// Grid index -> open-cell slot, or `NO_SLOT` for walls.
    slots: Vec<u32>,
    cells: Vec<Cell>,
    dist: Vec<Distance>,
}

impl DistanceOracle {
    /// Builds the full table for a grid. Walls and isolated pockets are
    /// tolerated; pairs across disconnected regions read as `UNREACHABLE`.
    pub fn precompute(grid: &Grid) -> Self {
        let start = Instant::now();

        let mut slots = vec![NO_SLOT; (grid.width() * grid.height()) as usize];
        let cells: Vec<Cell> = grid.open_cells().collect();
        for (slot, &c) in cells.iter().enumerate() {
            if let Some(i) = grid.index(c) {
                slots[i] = slot as u32;
            }
        }

        // Neighbour slots per open cell, so BFS never touches the grid.
        let adjacency: Vec<Vec<u32>> = cells
            .iter()
            .map(|&c| {
                grid.neighbors(c)
                    .filter_map(|n| grid.index(n).map(|i| slots[i]))
                    .collect()
            })
            .collect();

        let n = cells.len();
        let mut dist = vec![UNREACHABLE; n * n];
        if n > 0 {
            dist.par_chunks_mut(n)
                .enumerate()
                .for_each(|(src, row)| bfs_row(src, &adjacency, row));
        }

        info!(
            open_cells = n,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "distance table built"
        );

        DistanceOracle {
            width: grid.width(),
            height: grid.height(),
            slots,
            cells,
            dist,
        }
    }

    #[inline]
    fn slot(&self, c: Cell) -> Option<usize> {
        if c.x < 0 || c.y < 0 || c.x >= self.width || c.y >= self.height {
            return None;
        }
        match self.slots[(c.y * self.width + c.x) as usize] {
            NO_SLOT => None,
            s => Some(s as usize),
        }
    }

    /// Maze distance between two cells, or `UNREACHABLE` if either cell is a
    /// wall or no path connects them.
    #[inline]
    pub fn distance(&self, a: Cell, b: Cell) -> Distance {
        match (self.slot(a), self.slot(b)) {
            (Some(i), Some(j)) => self.dist[i * self.cells.len() + j],
            _ => UNREACHABLE,
        }
    }

    /// Number of open cells covered by the table.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The open cells, in slot order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Fills one row of the matrix with BFS distances from `src`.
fn bfs_row(src: usize, adjacency: &[Vec<u32>], row: &mut [Distance]) {
    let mut queue = VecDeque::with_capacity(adjacency.len());
    row[src] = 0;
    queue.push_back(src);

    while let Some(cur) = queue.pop_front() {
        let d = row[cur] + 1;
        for &next in adjacency[cur].iter() {
            let next = next as usize;
            if row[next] == UNREACHABLE {
                row[next] = d;
                queue.push_back(next);
            }
        }
    }
}
