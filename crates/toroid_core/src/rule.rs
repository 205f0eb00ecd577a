//! # Life Rule (B3/S23)
//!
//! | current | live neighbors | next  |
//! |---------|----------------|-------|
//! | dead    | 3              | alive |
//! | dead    | otherwise      | dead  |
//! | alive   | 2 or 3         | alive |
//! | alive   | ≤1 or ≥4       | dead  |

use crate::board::{Board, Cell, Grid};

/// Successor of a cell with `live_neighbors` live neighbors.
#[inline]
#[must_use]
pub const fn next_state(current: Cell, live_neighbors: u8) -> Cell {
    match (current, live_neighbors) {
        (Cell::Alive, 2 | 3) | (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}

/// Single-threaded generation step, used as the baseline the parallel
/// engine is checked against. Counts neighbors straight off the grid with
/// modular arithmetic and shares no code with the worker path.
#[must_use]
pub fn step_grid(grid: &Grid) -> Grid {
    let width = grid.width();
    let cells = grid
        .cells()
        .iter()
        .enumerate()
        .map(|(i, &cell)| next_state(cell, wrapped_neighbors(grid, i / width, i % width)))
        .collect();
    grid.with_cells(cells)
}

/// Live cells among the 8 toroidal neighbors of `(row, col)`. On a board one
/// row (or column) wide, the cell's own row (column) is its neighbor twice.
fn wrapped_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let (w, h) = (grid.width(), grid.height());
    let mut live = 0;
    for (i, dr) in [h - 1, 0, 1].into_iter().enumerate() {
        for (j, dc) in [w - 1, 0, 1].into_iter().enumerate() {
            if (i, j) == (1, 1) {
                continue;
            }
            let r = (row + dr) % h;
            let c = (col + dc) % w;
            live += u8::from(grid.cells()[r * w + c].is_alive());
        }
    }
    live
}

/// Applies [`step_grid`] `generations` times.
#[must_use]
pub fn evolve_grid(grid: &Grid, generations: usize) -> Grid {
    (0..generations).fold(grid.clone(), |g, _| step_grid(&g))
}

/// Convenience wrapper over [`evolve_grid`] for boards.
#[must_use]
pub fn evolve_board(board: &Board, generations: usize) -> Grid {
    evolve_grid(&board.to_grid(), generations)
}
