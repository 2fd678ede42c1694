//! Error types shared by the grid and the tile pool

use crate::tile::TileId;
use thiserror::Error;

/// Structural errors raised by grid and pool operations.
///
/// These are raised synchronously, before any mutation takes place, so a
/// failed call never leaves a layer or pool partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinate outside a layer's valid extent. Never silently clamped.
    #[error("coordinate ({x}, {y}) is outside the layer bounds")]
    OutOfBounds { x: i32, y: i32 },

    /// A tile's dimensions disagree with the configured tile size.
    #[error("tile is {actual_width}x{actual_height} but {expected_width}x{expected_height} was expected")]
    TileDimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// A pixel buffer's length does not match the tile dimensions.
    #[error("pixel buffer holds {actual} values but {expected} were expected")]
    PixelBufferMismatch { expected: usize, actual: usize },

    /// The referenced tile is not registered in the pool.
    #[error("tile {0} is not in the pool")]
    UnknownTile(TileId),

    /// A dependent tile was given another dependent as its base.
    #[error("tile {0} is not a physical tile and cannot serve as a base")]
    NotAPhysicalTile(TileId),
}
