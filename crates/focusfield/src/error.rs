//! Error types for the puzzle crate.
//!
//! Most "failures" in a puzzle session are normal outcomes (rotating a locked tile,
//! undoing with nothing to undo) and are reported through return values, not here.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("level data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no level {index} (campaign has {count})")]
    UnknownLevel { index: usize, count: usize },

    #[error("level {index} is locked (unlocked up to {max_unlocked})")]
    LevelLocked { index: usize, max_unlocked: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
