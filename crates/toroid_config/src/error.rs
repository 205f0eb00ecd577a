//! # Config Error Types

use std::path::PathBuf;

use thiserror::Error;
use toroid_core::EngineError;

/// Errors raised while loading a world file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read.
    #[error("cannot open {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File ended before a required value.
    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof {
        /// Description of the missing value.
        expected: String,
    },

    /// Token is not an integer.
    #[error("invalid integer {token:?} for {field}")]
    InvalidInteger {
        /// Offending token.
        token: String,
        /// Field being read.
        field: String,
    },

    /// Value must not be negative.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Field being read.
        field: String,
        /// Value found.
        value: i64,
    },

    /// World has no rows or no columns.
    #[error("world must have at least one row and one column (got {rows}x{cols})")]
    EmptyWorld {
        /// Rows declared.
        rows: usize,
        /// Columns declared.
        cols: usize,
    },

    /// Live cell outside the declared world.
    #[error("live cell (x={x}, y={y}) is outside a {rows}x{cols} world")]
    OutOfBounds {
        /// Column of the pair.
        x: usize,
        /// Row of the pair.
        y: usize,
        /// Rows declared.
        rows: usize,
        /// Columns declared.
        cols: usize,
    },

    /// TOML document is malformed.
    #[error("invalid TOML world: {0}")]
    Toml(#[from] toml::de::Error),

    /// Board could not be built.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
