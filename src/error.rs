//! Error types for the game core

use thiserror::Error;

use crate::sim::border::Side;

/// Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;

/// Recoverable conditions the core reports to its host.
///
/// Every variant is returned before any round state has been mutated, so a
/// failed call never leaves a round half-updated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Side/lane combination that does not exist on this board
    #[error("no {side:?} border slot at lane {lane}")]
    InvalidSlot { side: Side, lane: u8 },

    /// Configured board edge outside the supported range
    #[error("grid size {requested} outside {min}..={max}")]
    GridSizeOutOfBounds { requested: i32, min: i32, max: i32 },

    /// Requested hidden-marker count outside `[MIN_MARKER_COUNT, 2 * N]`
    #[error("marker count {requested} outside {min}..={max}")]
    MarkerCountOutOfBounds {
        requested: usize,
        min: usize,
        max: usize,
    },

    /// Every pairing token of the round has been handed out
    #[error("token pool exhausted")]
    PoolExhausted,

    /// Guess placement attempted past the round's marker count
    #[error("all {max} guess markers already placed")]
    AlreadyMaxGuesses { max: usize },

    /// Guess toggle aimed outside the board
    #[error("cell ({x}, {y}) is outside the board")]
    CellOutOfBounds { x: i32, y: i32 },

    /// The slot already carries a paint from an earlier ray
    #[error("a ray was already fired from {side:?} lane {lane}")]
    SlotAlreadyFired { side: Side, lane: u8 },
}
