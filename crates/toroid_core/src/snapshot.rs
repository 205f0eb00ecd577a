//! # Per-Worker Snapshots
//!
//! Every worker reads neighbors from a private copy taken before anyone
//! writes. Two strategies produce identical generations:
//!
//! ```text
//! FullBoard: copy all H rows               O(N × W × H) per generation
//! Halo:      copy own rows + 1 above/below  O(W × H + 2 × N × W)
//!
//!   worker owning rows 3..6 on a 10-row board (Halo):
//!     slot 0 ← row 2   (halo above)
//!     slot 1 ← row 3
//!     slot 2 ← row 4
//!     slot 3 ← row 5
//!     slot 4 ← row 6   (halo below)
//! ```
//!
//! Halo rows wrap toroidally: the worker owning row 0 copies row `H-1`
//! above it.

use crate::board::{BoardView, Cell};
use crate::partition::RowRange;

/// How much of the board each worker copies per generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SnapshotStrategy {
    /// Copy the entire board.
    FullBoard,
    /// Copy the owned rows plus one wrapped row on each side.
    #[default]
    Halo,
}

/// Private copy of the cells a worker needs to compute its rows.
///
/// The buffer is allocated once and overwritten by every [`capture`](Self::capture).
#[derive(Clone, Debug)]
pub struct Snapshot {
    strategy: SnapshotStrategy,
    width: usize,
    height: usize,
    owned: RowRange,
    cells: Vec<Cell>,
}

impl Snapshot {
    /// Allocates a snapshot buffer for the worker owning `owned`.
    #[must_use]
    pub fn new(strategy: SnapshotStrategy, width: usize, height: usize, owned: RowRange) -> Self {
        let rows = match strategy {
            SnapshotStrategy::FullBoard => height,
            SnapshotStrategy::Halo => owned.len() + 2,
        };
        Self {
            strategy,
            width,
            height,
            owned,
            cells: vec![Cell::Dead; rows * width],
        }
    }

    /// Column count.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of cells copied per capture.
    #[inline]
    #[must_use]
    pub fn footprint(&self) -> usize {
        self.cells.len()
    }

    /// Copies the current board state into the buffer.
    pub fn capture(&mut self, view: BoardView<'_>) {
        debug_assert_eq!(view.width(), self.width);
        debug_assert_eq!(view.height(), self.height);
        match self.strategy {
            SnapshotStrategy::FullBoard => view.copy_into(&mut self.cells),
            SnapshotStrategy::Halo => {
                let above = (self.owned.start() + self.height - 1) % self.height;
                let below = self.owned.end() % self.height;
                let rows = std::iter::once(above)
                    .chain(self.owned.iter())
                    .chain(std::iter::once(below));
                for (slot, row) in self.cells.chunks_exact_mut(self.width).zip(rows) {
                    view.copy_row_into(row, slot);
                }
            }
        }
    }

    /// Buffer slot holding board row `row + offset` (offset in `-1..=1`),
    /// where `row` is an owned row.
    #[inline]
    fn slot(&self, row: usize, offset: isize) -> usize {
        debug_assert!(self.owned.contains(row));
        match self.strategy {
            SnapshotStrategy::FullBoard => match offset {
                -1 if row == 0 => self.height - 1,
                -1 => row - 1,
                1 if row + 1 == self.height => 0,
                1 => row + 1,
                _ => row,
            },
            SnapshotStrategy::Halo => {
                let local = row - self.owned.start() + 1;
                local.wrapping_add_signed(offset)
            }
        }
    }

    /// Captured state of owned cell `(row, col)`.
    #[inline]
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[self.slot(row, 0) * self.width + col]
    }

    /// Live cells among the 8 toroidally wrapped neighbors of owned cell
    /// `(row, col)`.
    #[inline]
    #[must_use]
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        let w = self.width;
        let left = if col == 0 { w - 1 } else { col - 1 };
        let right = if col + 1 == w { 0 } else { col + 1 };

        let up = self.slot(row, -1) * w;
        let mid = self.slot(row, 0) * w;
        let down = self.slot(row, 1) * w;

        [
            up + left,
            up + col,
            up + right,
            mid + left,
            mid + right,
            down + left,
            down + col,
            down + right,
        ]
        .iter()
        .map(|&i| self.cells[i] as u8)
        .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::partition::Partition;

    fn both() -> [SnapshotStrategy; 2] {
        [SnapshotStrategy::FullBoard, SnapshotStrategy::Halo]
    }

    #[test]
    fn test_footprint() {
        let owned = RowRange::new(3, 6);
        assert_eq!(Snapshot::new(SnapshotStrategy::FullBoard, 8, 10, owned).footprint(), 80);
        assert_eq!(Snapshot::new(SnapshotStrategy::Halo, 8, 10, owned).footprint(), 40);
    }

    #[test]
    fn test_corner_wraparound_neighbor() {
        for strategy in both() {
            let (w, h) = (6, 5);
            let mut board = Board::new(w, h).unwrap();
            board.set(h - 1, w - 1, Cell::Alive).unwrap();
            let partition = Partition::new(h, 2).unwrap();
            let (view, _) = board.split(&partition);

            let mut snap = Snapshot::new(strategy, w, h, partition.get(0).unwrap());
            snap.capture(view);
            assert_eq!(snap.live_neighbors(0, 0), 1, "{strategy:?}");
            assert_eq!(snap.live_neighbors(0, 1), 0, "{strategy:?}");
        }
    }

    #[test]
    fn test_bottom_row_sees_top_row() {
        for strategy in both() {
            let mut board = Board::new(4, 6).unwrap();
            board.set(0, 1, Cell::Alive).unwrap();
            let partition = Partition::new(6, 3).unwrap();
            let (view, _) = board.split(&partition);

            let mut snap = Snapshot::new(strategy, 4, 6, partition.get(2).unwrap());
            snap.capture(view);
            assert_eq!(snap.live_neighbors(5, 0), 1);
            assert_eq!(snap.live_neighbors(5, 1), 1);
            assert_eq!(snap.live_neighbors(5, 2), 1);
            assert_eq!(snap.live_neighbors(5, 3), 0);
        }
    }

    #[test]
    fn test_strategies_agree_on_random_board() {
        let mut board = Board::random(13, 11, 0.4, 99).unwrap();
        let partition = Partition::new(11, 4).unwrap();
        let (view, _) = board.split(&partition);

        for owned in partition.iter() {
            let mut full = Snapshot::new(SnapshotStrategy::FullBoard, 13, 11, owned);
            let mut halo = Snapshot::new(SnapshotStrategy::Halo, 13, 11, owned);
            full.capture(view);
            halo.capture(view);
            for row in owned.iter() {
                for col in 0..13 {
                    assert_eq!(full.cell(row, col), halo.cell(row, col));
                    assert_eq!(full.live_neighbors(row, col), halo.live_neighbors(row, col));
                }
            }
        }
    }

    #[test]
    fn test_single_row_board_wraps_onto_itself() {
        // Row above and below are both row 0.
        for strategy in both() {
            let mut board = Board::new(5, 1).unwrap();
            board.set(0, 1, Cell::Alive).unwrap();
            board.set(0, 3, Cell::Alive).unwrap();
            let partition = Partition::new(1, 1).unwrap();
            let (view, _) = board.split(&partition);

            let mut snap = Snapshot::new(strategy, 5, 1, RowRange::new(0, 1));
            snap.capture(view);
            // (0,2): cols 1 and 3 alive, each counted in 3 rows.
            assert_eq!(snap.live_neighbors(0, 2), 6);
            // (0,1): itself counted above and below, col 0 and 2 dead.
            assert_eq!(snap.live_neighbors(0, 1), 2);
        }
    }

    /// Neighbor count by signed offsets and `rem_euclid`, cell by cell.
    fn modular_count(grid: &crate::board::Grid, row: usize, col: usize) -> u8 {
        let (h, w) = (grid.height() as isize, grid.width() as isize);
        let mut live = 0;
        for dr in -1..=1_isize {
            for dc in -1..=1_isize {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = (row as isize + dr).rem_euclid(h) as usize;
                let c = (col as isize + dc).rem_euclid(w) as usize;
                live += u8::from(grid.get(r, c).is_some_and(Cell::is_alive));
            }
        }
        live
    }

    #[test]
    fn test_neighbor_counts_match_modular_arithmetic() {
        for (w, h, workers, seed) in [(13, 11, 4, 1), (1, 7, 3, 2), (9, 1, 1, 3), (2, 2, 2, 4), (3, 5, 5, 5)] {
            let mut board = Board::random(w, h, 0.5, seed).unwrap();
            let grid = board.to_grid();
            let partition = Partition::new(h, workers).unwrap();
            let (view, _) = board.split(&partition);

            for strategy in both() {
                for owned in partition.iter() {
                    let mut snap = Snapshot::new(strategy, w, h, owned);
                    snap.capture(view);
                    for row in owned.iter() {
                        for col in 0..w {
                            assert_eq!(
                                snap.live_neighbors(row, col),
                                modular_count(&grid, row, col),
                                "{w}x{h} {strategy:?} ({row}, {col})"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_capture_is_a_copy() {
        let mut board = Board::new(3, 3).unwrap();
        let partition = Partition::new(3, 1).unwrap();
        let (view, mut writers) = board.split(&partition);

        let mut snap = Snapshot::new(SnapshotStrategy::Halo, 3, 3, RowRange::new(0, 3));
        snap.capture(view);
        writers[0].set(1, 1, Cell::Alive);
        assert_eq!(snap.cell(1, 1), Cell::Dead);
        assert_eq!(snap.live_neighbors(0, 0), 0);
    }
}
