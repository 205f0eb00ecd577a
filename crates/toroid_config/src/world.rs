//! # World Configuration
//!
//! Two on-disk formats describe the same thing.
//!
//! Legacy text (whitespace separated integers):
//!
//! ```text
//! 5          rows
//! 5          cols
//! 2          iterations
//! 3          number of (x, y) pairs
//! 1 1        x = column, y = row
//! 2 1
//! 3 1
//! ```
//!
//! TOML:
//!
//! ```toml
//! rows = 5
//! cols = 5
//! iterations = 2
//! live = [[1, 1], [2, 1], [3, 1]]   # [x, y]
//! ```

use std::path::Path;
use std::str::SplitWhitespace;

use serde::Deserialize;
use toroid_core::{Board, Cell};

use crate::error::{ConfigError, ConfigResult};

/// A live cell position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord {
    /// Board row (`y` in the file).
    pub row: usize,
    /// Board column (`x` in the file).
    pub col: usize,
}

/// Everything a world file declares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub cols: usize,
    /// Generations to run.
    pub iterations: usize,
    /// Initially live cells.
    pub live_cells: Vec<CellCoord>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlWorld {
    rows: usize,
    cols: usize,
    iterations: usize,
    #[serde(default)]
    live: Vec<[usize; 2]>,
}

/// Upper bound on pairs reserved up front.
const PREALLOCATED_PAIRS: usize = 1024;

/// Reads non-negative integers from the legacy format.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl Tokens<'_> {
    fn next_usize(&mut self, field: &str) -> ConfigResult<usize> {
        let token = self.inner.next().ok_or_else(|| ConfigError::UnexpectedEof {
            expected: field.to_owned(),
        })?;
        let value: i64 = token.parse().map_err(|_| ConfigError::InvalidInteger {
            token: token.to_owned(),
            field: field.to_owned(),
        })?;
        usize::try_from(value).map_err(|_| ConfigError::Negative {
            field: field.to_owned(),
            value,
        })
    }
}

impl WorldConfig {
    /// Parses the legacy whitespace-separated format.
    ///
    /// # Errors
    ///
    /// Fails on missing, non-integer or negative values, an empty world, or
    /// a pair outside the world.
    pub fn parse_text(text: &str) -> ConfigResult<Self> {
        let mut tokens = Tokens {
            inner: text.split_whitespace(),
        };
        let rows = tokens.next_usize("row count")?;
        let cols = tokens.next_usize("column count")?;
        let iterations = tokens.next_usize("iteration count")?;
        let pairs = tokens.next_usize("live pair count")?;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyWorld { rows, cols });
        }

        // The declared count is untrusted until the pairs are actually read.
        let mut live_cells = Vec::with_capacity(pairs.min(PREALLOCATED_PAIRS));
        for i in 0..pairs {
            let col = tokens.next_usize(&format!("x of pair {}", i + 1))?;
            let row = tokens.next_usize(&format!("y of pair {}", i + 1))?;
            live_cells.push(CellCoord { row, col });
        }

        if tokens.inner.next().is_some() {
            tracing::warn!(pairs, "ignoring trailing data after the declared pairs");
        }

        let config = Self {
            rows,
            cols,
            iterations,
            live_cells,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses the TOML format.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, unknown keys, an empty world, or a pair
    /// outside the world.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let world: TomlWorld = toml::from_str(text)?;
        let config = Self {
            rows: world.rows,
            cols: world.cols,
            iterations: world.iterations,
            live_cells: world
                .live
                .into_iter()
                .map(|[x, y]| CellCoord { row: y, col: x })
                .collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads a world file. `.toml` files use the TOML format, anything else
    /// the legacy format.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::from_toml_str(&text)?
        } else {
            Self::parse_text(&text)?
        };

        tracing::debug!(
            path = %path.display(),
            rows = config.rows,
            cols = config.cols,
            iterations = config.iterations,
            live = config.live_cells.len(),
            "loaded world"
        );
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyWorld {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if let Some(bad) = self
            .live_cells
            .iter()
            .find(|c| c.row >= self.rows || c.col >= self.cols)
        {
            return Err(ConfigError::OutOfBounds {
                x: bad.col,
                y: bad.row,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Allocates an all-dead board and marks the live cells.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions or a coordinate are invalid, which only
    /// happens for hand-built configs.
    pub fn build_board(&self) -> ConfigResult<Board> {
        let mut board = Board::new(self.cols, self.rows)?;
        for cell in &self.live_cells {
            board.set(cell.row, cell.col, Cell::Alive)?;
        }
        Ok(board)
    }
}
