//! # tilegrid
//!
//! An editable tile-map model for 2D map authoring tools.
//!
//! A map is a stack of [`TileGridLayer`]s whose cells hold ordered
//! [`TileStack`]s of tiles from a shared [`TilePool`]. Editing happens
//! through brushes (fixed stamps or rule-driven autotile brushes) and
//! through commands, so every mutation is undoable.
//!
//! ## Quick Start
//!
//! ```rust
//! use tilegrid::prelude::*;
//!
//! let mut pool = TilePool::new(16, 16);
//! let grass = pool.create_tile(vec![0xff00aa00; 256]).unwrap();
//!
//! let mut document = MapDocument::new();
//! document.push_layer(TileGridLayer::new("Ground", 32, 32, 16, 16));
//!
//! let mut history = CommandHistory::new();
//! history
//!     .execute(
//!         Box::new(AddTileCommand::new(0, TileCoord::new(4, 4), grass)),
//!         &mut document,
//!     )
//!     .unwrap();
//! history.undo(&mut document).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! This umbrella crate re-exports the tilegrid_* sub-crates:
//!
//! - [`core`] - Layers, tile stacks, the tile pool and change events
//! - [`brush`] - Static stamps, autotile brushes and brush previews
//! - [`commands`] - The command engine, undo history and selections

// =============================================================================
// Core module - the map model itself
// =============================================================================

/// Core data types for the tile grid.
///
/// This module provides the fundamental types:
/// - [`TileGridLayer`] - A resizable grid of tile stacks
/// - [`TileStack`] - The ordered tiles occupying one cell
/// - [`TilePool`] - Shared pixel storage with dependent-tile propagation
/// - [`LayerEvent`] - Change notifications for observers
pub mod core {
    pub use tilegrid_core::*;
}

pub use tilegrid_core::{
    GridError, LayerEvent, LayerObserver, ObserverList, Tile, TileCoord, TileGridLayer, TileId,
    TilePool, TileRegion, TileStack, TileTransform,
};

// =============================================================================
// Brush module - stamps and autotiling
// =============================================================================

/// Brushes that write into a layer.
///
/// Provides:
/// - [`StaticTileBrush`] - A fixed-pattern stamp
/// - [`DynamicTileBrush`] - A rule-driven autotile brush
/// - [`BrushClass`] - The neighbor rule table shared by dynamic brushes
/// - [`BrushPreview`] - Composited thumbnails for brush palettes
pub mod brush {
    pub use tilegrid_brush::*;
}

pub use tilegrid_brush::{
    dynamic_brush_preview, static_brush_preview, BrushClass, BrushClassRegistry, BrushPreview,
    DynamicTileBrush, SlotRule, StaticTileBrush, TileBrush, NEIGHBOR_COUNT, NEIGHBOR_E,
    NEIGHBOR_N, NEIGHBOR_OFFSETS, NEIGHBOR_S, NEIGHBOR_W,
};

// =============================================================================
// Commands module - undoable editing
// =============================================================================

/// Command-based editing with linear undo/redo.
///
/// Provides:
/// - [`MapDocument`] - The layers and selection commands operate on
/// - [`Command`] - The undoable edit trait
/// - [`CommandHistory`] - Undo and redo stacks
/// - [`TileSelection`] - Floating selections for move, cut and paste
pub mod commands {
    pub use tilegrid_commands::*;
}

pub use tilegrid_commands::{
    cut_selection, AddTileCommand, ApplyBrushCommand, ClearCellCommand, Command, CommandError,
    CommandHistory, CompoundCommand, CreateTileSelectionCommand, DefloatTileSelectionCommand,
    DeleteTileSelectionCommand, EraseBrushCommand, FloatTileSelectionCommand, HistoryObserver,
    MapDocument, MoveTileSelectionCommand, PasteSelectionCommand, RemoveTileCommand,
    ResizeLayerCommand, SelectionSnapshot, TileSelection,
};

// =============================================================================
// Prelude
// =============================================================================

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use tilegrid_brush::{
        BrushClass, BrushClassRegistry, DynamicTileBrush, StaticTileBrush, TileBrush,
    };
    pub use tilegrid_commands::{
        AddTileCommand, ApplyBrushCommand, ClearCellCommand, Command, CommandHistory,
        CompoundCommand, MapDocument, TileSelection,
    };
    pub use tilegrid_core::{
        Tile, TileCoord, TileGridLayer, TilePool, TileRegion, TileStack, TileTransform,
    };
}
