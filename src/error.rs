//! Error types
//!
//! In-game failures (aliens reaching the ship, the ship being hit) are phase
//! transitions, not errors. These types cover setup problems and broken
//! invariants only.

use std::path::PathBuf;

/// Errors raised by the simulation core
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Malformed or missing difficulty parameters (fatal at session start)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A programming error, such as resolving collisions outside of Play
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Borders were queried before the viewport was known
    #[error("playfield bounds requested before initialization")]
    MissingBounds,
}

/// Errors raised while reading or writing JSON files
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
