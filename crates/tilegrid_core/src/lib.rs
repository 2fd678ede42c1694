//! Core data structures for the tilegrid map model
//!
//! This crate provides the editable tile-map primitives:
//! - `TilePool` / `Tile` - tile identity, pixel storage and dependent-tile
//!   propagation (rotated/flipped variants stay in sync with their base)
//! - `TileStack` - the ordered multiset of tiles occupying one grid cell
//! - `TileGridLayer` - a bounded, originable, resizable grid of tile stacks
//! - `LayerEvent` / `LayerObserver` - synchronous change notifications
//! - `TileCoord` / `TileRegion` - tile-space coordinates and rectangles

mod coord;
mod error;
mod events;
mod layer;
mod pool;
mod stack;
mod tile;

pub use coord::{TileCoord, TileRegion};
pub use error::GridError;
pub use events::{LayerEvent, LayerObserver, ObserverList};
pub use layer::TileGridLayer;
pub use pool::TilePool;
pub use stack::TileStack;
pub use tile::{Tile, TileId, TileTransform};
