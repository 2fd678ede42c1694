//! Tile brushes for the tilegrid map model
//!
//! Two brush kinds write into a `TileGridLayer`:
//! - `StaticTileBrush` - a fixed-pattern stamp
//! - `DynamicTileBrush` - a context-sensitive autotile brush driven by a
//!   `BrushClass` rule table over the eight compass neighbors
//!
//! `TileBrush` wraps both behind a single apply/preview surface. Brush
//! classes live in an explicit `BrushClassRegistry` owned by the editing
//! session; there is no global registry.

mod class;
mod dynamic_brush;
mod preview;
mod static_brush;

pub use class::{
    BrushClass, BrushClassRegistry, SlotRule, NEIGHBOR_COUNT, NEIGHBOR_E, NEIGHBOR_N,
    NEIGHBOR_OFFSETS, NEIGHBOR_S, NEIGHBOR_W,
};
pub use dynamic_brush::DynamicTileBrush;
pub use preview::{dynamic_brush_preview, static_brush_preview, BrushPreview};
pub use static_brush::StaticTileBrush;

use tilegrid_core::{GridError, TileGridLayer, TilePool};
use uuid::Uuid;

/// A brush of either kind, exposing the shared apply/preview surface.
#[derive(Debug, Clone)]
pub enum TileBrush {
    Static(StaticTileBrush),
    Dynamic(DynamicTileBrush),
}

impl TileBrush {
    pub fn id(&self) -> Uuid {
        match self {
            TileBrush::Static(brush) => brush.id(),
            TileBrush::Dynamic(brush) => brush.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TileBrush::Static(brush) => brush.name(),
            TileBrush::Dynamic(brush) => brush.name(),
        }
    }

    pub fn tile_width(&self) -> u32 {
        match self {
            TileBrush::Static(brush) => brush.tile_width(),
            TileBrush::Dynamic(brush) => brush.tile_width(),
        }
    }

    pub fn tile_height(&self) -> u32 {
        match self {
            TileBrush::Static(brush) => brush.tile_height(),
            TileBrush::Dynamic(brush) => brush.tile_height(),
        }
    }

    /// Apply the brush to the layer at (x, y)
    pub fn apply(&self, layer: &mut TileGridLayer, x: i32, y: i32) -> Result<(), GridError> {
        match self {
            TileBrush::Static(brush) => brush.apply(layer, x, y),
            TileBrush::Dynamic(brush) => brush.apply(layer, x, y),
        }
    }

    /// Render a thumbnail of the brush from the pool's pixel data
    pub fn make_preview(&self, pool: &TilePool) -> BrushPreview {
        self.make_preview_scaled(pool, None)
    }

    /// Render a thumbnail clipped to a maximum pixel extent
    pub fn make_preview_scaled(&self, pool: &TilePool, max_size: Option<(u32, u32)>) -> BrushPreview {
        match self {
            TileBrush::Static(brush) => static_brush_preview(brush, pool, max_size),
            TileBrush::Dynamic(brush) => dynamic_brush_preview(brush, pool, max_size),
        }
    }
}

impl From<StaticTileBrush> for TileBrush {
    fn from(brush: StaticTileBrush) -> Self {
        TileBrush::Static(brush)
    }
}

impl From<DynamicTileBrush> for TileBrush {
    fn from(brush: DynamicTileBrush) -> Self {
        TileBrush::Dynamic(brush)
    }
}
