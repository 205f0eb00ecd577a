//! # The Board
//!
//! Flat `width × height` grid of cells, indexed `row * width + col`.
//!
//! ## Access Model
//!
//! ```text
//!              Board (owned by the Simulation)
//!                        │
//!             split(&mut self, &Partition)
//!                        │
//!         ┌──────────────┴──────────────┐
//!         ▼                             ▼
//!   BoardView (Copy)            RowWriter × N
//!   read any cell               write rows of ONE range
//! ```
//!
//! `split` consumes the exclusive borrow, so while the views exist nobody
//! else can touch the cells. Writers never overlap because the partition's
//! ranges never overlap. Cells are relaxed atomics: cross-thread ordering
//! comes from the phase barrier, not from the cells themselves.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{EngineError, EngineResult};
use crate::partition::{Partition, RowRange};

/// State of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    /// Dead cell.
    #[default]
    Dead = 0,
    /// Live cell.
    Alive = 1,
}

impl Cell {
    /// Decodes a stored byte. Anything non-zero is alive.
    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        if value == 0 {
            Self::Dead
        } else {
            Self::Alive
        }
    }

    /// True for [`Cell::Alive`].
    #[inline]
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

impl From<bool> for Cell {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive {
            Self::Alive
        } else {
            Self::Dead
        }
    }
}

/// The shared toroidal grid.
pub struct Board {
    width: usize,
    height: usize,
    cells: Box<[AtomicU8]>,
}

impl Board {
    /// Creates an all-dead board.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimensions`] if either dimension is zero
    /// or the cell count overflows `usize`.
    pub fn new(width: usize, height: usize) -> EngineResult<Self> {
        let len = Self::checked_len(width, height)?;
        let cells = (0..len).map(|_| AtomicU8::new(0)).collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a board from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimensions`] for a zero dimension and
    /// [`EngineError::CellCountMismatch`] if `cells` has the wrong length.
    pub fn from_cells(width: usize, height: usize, cells: &[Cell]) -> EngineResult<Self> {
        let expected = Self::checked_len(width, height)?;
        if cells.len() != expected {
            return Err(EngineError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        let cells = cells.iter().map(|&c| AtomicU8::new(c as u8)).collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a random soup where each cell is alive with probability
    /// `density` (clamped to `[0, 1]`). Same seed, same board.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimensions`] for a zero dimension.
    pub fn random(width: usize, height: usize, density: f64, seed: u64) -> EngineResult<Self> {
        let len = Self::checked_len(width, height)?;
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cells = (0..len)
            .map(|_| AtomicU8::new(u8::from(rng.gen_bool(density))))
            .collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    fn checked_len(width: usize, height: usize) -> EngineResult<usize> {
        match width.checked_mul(height) {
            Some(len) if len > 0 => Ok(len),
            _ => Err(EngineError::InvalidDimensions { width, height }),
        }
    }

    /// Column count.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Row count.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Flat index of `(row, col)`.
    #[inline]
    #[must_use]
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Cell at `(row, col)`, or `None` outside the board.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        (row < self.height && col < self.width).then(|| self.load(self.index(row, col)))
    }

    /// Sets the cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CellOutOfBounds`] outside the board.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> EngineResult<()> {
        if row >= self.height || col >= self.width {
            return Err(EngineError::CellOutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        let idx = self.index(row, col);
        *self.cells[idx].get_mut() = cell as u8;
        Ok(())
    }

    /// Number of live cells.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.load(Ordering::Relaxed) != 0)
            .count()
    }

    /// Copies the board into a plain [`Grid`].
    #[must_use]
    pub fn to_grid(&self) -> Grid {
        BoardView { board: self }.to_grid()
    }

    #[inline]
    fn load(&self, idx: usize) -> Cell {
        Cell::from_u8(self.cells[idx].load(Ordering::Relaxed))
    }

    /// Splits the board into one read view and one writer per partition range.
    ///
    /// # Panics
    ///
    /// Panics if the partition was built for a different row count.
    #[must_use]
    pub fn split(&mut self, partition: &Partition) -> (BoardView<'_>, Vec<RowWriter<'_>>) {
        assert_eq!(
            partition.height(),
            self.height,
            "partition height does not match board height"
        );
        let board: &Board = self;
        let writers = partition
            .iter()
            .map(|rows| RowWriter { board, rows })
            .collect();
        (BoardView { board }, writers)
    }
}

impl Clone for Board {
    fn clone(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|c| AtomicU8::new(c.load(Ordering::Relaxed)))
            .collect();
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("live", &self.live_count())
            .finish()
    }
}

/// Shared read access to a split board.
#[derive(Clone, Copy)]
pub struct BoardView<'a> {
    board: &'a Board,
}

impl BoardView<'_> {
    /// Column count.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.board.width
    }

    /// Row count.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.board.height
    }

    /// Copies row `row` into `dst`, which must be exactly `width` long.
    #[inline]
    pub fn copy_row_into(&self, row: usize, dst: &mut [Cell]) {
        let start = self.board.index(row, 0);
        let src = &self.board.cells[start..start + self.board.width];
        for (d, s) in dst.iter_mut().zip(src) {
            *d = Cell::from_u8(s.load(Ordering::Relaxed));
        }
    }

    /// Copies the whole board into `dst`, which must be `width * height` long.
    #[inline]
    pub fn copy_into(&self, dst: &mut [Cell]) {
        for (d, s) in dst.iter_mut().zip(self.board.cells.iter()) {
            *d = Cell::from_u8(s.load(Ordering::Relaxed));
        }
    }

    /// Copies the board into a plain [`Grid`].
    #[must_use]
    pub fn to_grid(&self) -> Grid {
        let mut cells = vec![Cell::Dead; self.board.cells.len()];
        self.copy_into(&mut cells);
        Grid {
            width: self.board.width,
            height: self.board.height,
            cells,
        }
    }
}

/// Write access restricted to one partition range.
pub struct RowWriter<'a> {
    board: &'a Board,
    rows: RowRange,
}

impl RowWriter<'_> {
    /// The rows this writer may touch.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> RowRange {
        self.rows
    }

    /// Writes `cell` at `(row, col)`. Returns true if the state changed.
    ///
    /// # Panics
    ///
    /// Panics if `row` is outside this writer's range or `col` is off the board.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        assert!(self.rows.contains(row), "row {row} outside writer range {:?}", self.rows);
        assert!(col < self.board.width, "column {col} off the board");
        let idx = self.board.index(row, col);
        self.board.cells[idx].swap(cell as u8, Ordering::Relaxed) != cell as u8
    }
}

/// Owned, plain copy of a board's cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Column count.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Row count.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Row-major cells.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `(row, col)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        (row < self.height && col < self.width).then(|| self.cells[row * self.width + col])
    }

    /// Iterates rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Number of live cells.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Coordinates `(row, col)` of every live cell, row-major.
    #[must_use]
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, _)| (i / self.width, i % self.width))
            .collect()
    }

    /// Same dimensions, new contents. `cells` must be `width * height` long.
    pub(crate) fn with_cells(&self, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), self.cells.len());
        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Turns the grid back into a board.
    #[must_use]
    pub fn into_board(self) -> Board {
        let cells = self.cells.into_iter().map(|c| AtomicU8::new(c as u8)).collect();
        Board {
            width: self.width,
            height: self.height,
            cells,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                f.write_str(if cell.is_alive() { "@" } else { "-" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_dead() {
        let board = Board::new(4, 3).unwrap();
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 3);
        assert_eq!(board.live_count(), 0);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            Board::new(0, 3).unwrap_err(),
            EngineError::InvalidDimensions { width: 0, height: 3 }
        );
        assert!(Board::new(3, 0).is_err());
        assert!(Board::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new(5, 4).unwrap();
        board.set(2, 3, Cell::Alive).unwrap();
        assert_eq!(board.get(2, 3), Some(Cell::Alive));
        assert_eq!(board.get(3, 2), Some(Cell::Dead));
        assert_eq!(board.get(4, 0), None);
        assert_eq!(board.index(2, 3), 13);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut board = Board::new(5, 4).unwrap();
        assert_eq!(
            board.set(4, 0, Cell::Alive),
            Err(EngineError::CellOutOfBounds { row: 4, col: 0, height: 4, width: 5 })
        );
    }

    #[test]
    fn test_from_cells_length_checked() {
        let err = Board::from_cells(2, 2, &[Cell::Alive; 3]).unwrap_err();
        assert_eq!(err, EngineError::CellCountMismatch { expected: 4, actual: 3 });
    }

    #[test]
    fn test_random_is_seeded() {
        let a = Board::random(32, 32, 0.3, 7).unwrap().to_grid();
        let b = Board::random(32, 32, 0.3, 7).unwrap().to_grid();
        let c = Board::random(32, 32, 0.3, 8).unwrap().to_grid();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.live_count() > 0);
        assert_eq!(Board::random(8, 8, 0.0, 1).unwrap().live_count(), 0);
        assert_eq!(Board::random(8, 8, 1.0, 1).unwrap().live_count(), 64);
    }

    #[test]
    fn test_split_writers_follow_partition() {
        let mut board = Board::new(3, 5).unwrap();
        let partition = Partition::new(5, 2).unwrap();
        let (view, mut writers) = board.split(&partition);
        assert_eq!(writers.len(), 2);
        assert_eq!(writers[0].rows(), RowRange::new(0, 3));
        assert_eq!(writers[1].rows(), RowRange::new(3, 5));

        assert!(writers[1].set(4, 2, Cell::Alive));
        assert!(!writers[1].set(4, 2, Cell::Alive));
        let grid = view.to_grid();
        assert_eq!(grid.get(4, 2), Some(Cell::Alive));
        assert_eq!(grid.live_count(), 1);
    }

    #[test]
    #[should_panic(expected = "outside writer range")]
    fn test_writer_rejects_foreign_rows() {
        let mut board = Board::new(3, 4).unwrap();
        let partition = Partition::new(4, 2).unwrap();
        let (_, mut writers) = board.split(&partition);
        writers[0].set(3, 0, Cell::Alive);
    }

    #[test]
    fn test_grid_display_and_round_trip() {
        let mut board = Board::new(3, 2).unwrap();
        board.set(0, 0, Cell::Alive).unwrap();
        board.set(1, 2, Cell::Alive).unwrap();
        let grid = board.to_grid();
        assert_eq!(grid.to_string(), "@--\n--@\n");
        assert_eq!(grid.live_cells(), vec![(0, 0), (1, 2)]);
        assert_eq!(grid.clone().into_board().to_grid(), grid);
    }
}
