// Errors raised while accepting a turn's input
//
// None of these escape `Bot::decide`: a rejected turn is logged and answered with Halt.

use crate::types::{Bounds, Coord};

/// Reasons a turn snapshot cannot be used
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TurnError {
    /// The driver placed the bot outside the dimensions it was created with.
    #[error("position {position} is outside the map {bounds:?}")]
    PositionOutOfBounds { position: Coord, bounds: Bounds },

    /// The grid snapshot has no cells at all.
    #[error("empty grid snapshot")]
    EmptyGrid,
}
