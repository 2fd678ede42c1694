//! Tile selections and floating overlays
//!
//! A selection is a set of cells on one layer. While *anchored* it merely
//! marks cells; *floating* it owns copies of their stacks and the cells on
//! the layer are cleared. A floating selection carries an offset so moving
//! it is O(1) regardless of how many cells it covers; the content is only
//! written back on defloat.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tilegrid_core::{GridError, Tile, TileCoord, TileGridLayer, TileRegion, TileStack};

/// A selection on a single layer, possibly floating.
#[derive(Debug, Clone)]
pub struct TileSelection {
    layer_index: usize,
    tiles: HashMap<TileCoord, TileStack>,
    offset: TileCoord,
    floating: bool,
}

impl TileSelection {
    /// Select the occupied cells of `layer` inside `region`.
    pub fn from_region(layer: &TileGridLayer, layer_index: usize, region: TileRegion) -> Self {
        let tiles = layer
            .tiles_in_region(region)
            .map(|(coord, stack)| (coord, stack.clone()))
            .collect();
        Self {
            layer_index,
            tiles,
            offset: TileCoord::ZERO,
            floating: false,
        }
    }

    /// Select an arbitrary set of cells; unoccupied coordinates are dropped.
    pub fn from_coords(
        layer: &TileGridLayer,
        layer_index: usize,
        coords: impl IntoIterator<Item = TileCoord>,
    ) -> Self {
        let tiles = coords
            .into_iter()
            .filter_map(|coord| layer.tiles_at(coord).map(|stack| (coord, stack.clone())))
            .collect();
        Self {
            layer_index,
            tiles,
            offset: TileCoord::ZERO,
            floating: false,
        }
    }

    /// Reconstitute a snapshot as a floating selection, ready to be placed
    /// and defloated (the paste path).
    pub fn from_snapshot(snapshot: &SelectionSnapshot, layer_index: usize) -> Self {
        let tiles = snapshot
            .tiles
            .iter()
            .map(|(coord, tiles)| (*coord, tiles.iter().copied().collect()))
            .collect();
        Self {
            layer_index,
            tiles,
            offset: TileCoord::ZERO,
            floating: true,
        }
    }

    pub fn layer_index(&self) -> usize {
        self.layer_index
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn offset(&self) -> TileCoord {
        self.offset
    }

    /// Move the selection. While floating this repositions the overlay
    /// without touching the layer.
    pub fn set_offset(&mut self, offset: TileCoord) {
        self.offset = offset;
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.offset = self.offset.offset(dx, dy);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate the selected cells in their original (un-offset) coordinates
    pub fn cells(&self) -> impl Iterator<Item = (TileCoord, &TileStack)> + '_ {
        self.tiles.iter().map(|(coord, stack)| (*coord, stack))
    }

    /// Bounding box of the selected cells, before the offset is applied
    pub fn bounds(&self) -> Option<TileRegion> {
        let mut coords = self.tiles.keys();
        let first = *coords.next()?;
        let (mut min, mut max) = (first, first);
        for &coord in coords {
            min.x = min.x.min(coord.x);
            min.y = min.y.min(coord.y);
            max.x = max.x.max(coord.x);
            max.y = max.y.max(coord.y);
        }
        Some(TileRegion::from_corners(min, max))
    }

    /// Lift the selected cells off the layer.
    ///
    /// The selection re-reads each cell so edits made after the selection
    /// was created are picked up; cells that are empty or out of bounds by
    /// now fall out of the selection. Returns false if already floating.
    pub fn float(&mut self, layer: &mut TileGridLayer) -> Result<bool, GridError> {
        if self.floating {
            return Ok(false);
        }
        let mut lifted = HashMap::with_capacity(self.tiles.len());
        for &coord in self.tiles.keys() {
            if !layer.contains(coord) {
                continue;
            }
            if let Some(stack) = layer.tiles_at(coord).cloned() {
                layer.clear_tile(coord.x, coord.y)?;
                lifted.insert(coord, stack);
            }
        }
        self.tiles = lifted;
        self.floating = true;
        Ok(true)
    }

    /// Put a floating selection back at its original coordinates,
    /// discarding any offset. The inverse of [`TileSelection::float`].
    pub fn anchor(&mut self, layer: &mut TileGridLayer) -> Result<bool, GridError> {
        if !self.floating {
            return Ok(false);
        }
        for (coord, stack) in &self.tiles {
            if !layer.contains(*coord) {
                continue;
            }
            for tile in stack.iter() {
                layer.add_tile(coord.x, coord.y, tile)?;
            }
        }
        self.offset = TileCoord::ZERO;
        self.floating = false;
        Ok(true)
    }

    /// Stamp a floating selection onto the layer at its offset position.
    ///
    /// Cells that would land outside the layer are clipped away. The
    /// selection stays behind as an anchored selection of the target cells.
    /// Returns false if the selection is not floating.
    pub fn defloat(&mut self, layer: &mut TileGridLayer) -> Result<bool, GridError> {
        if !self.floating {
            return Ok(false);
        }
        let mut placed = HashMap::with_capacity(self.tiles.len());
        for (coord, stack) in &self.tiles {
            let target = coord.offset(self.offset.x, self.offset.y);
            if !layer.contains(target) {
                continue;
            }
            for tile in stack.iter() {
                layer.add_tile(target.x, target.y, tile)?;
            }
            placed.insert(target, stack.clone());
        }
        self.tiles = placed;
        self.offset = TileCoord::ZERO;
        self.floating = false;
        Ok(true)
    }

    /// Serializable copy of the selected content, ordered by coordinate.
    pub fn snapshot(&self) -> SelectionSnapshot {
        let mut tiles: Vec<(TileCoord, Vec<Tile>)> = self
            .tiles
            .iter()
            .map(|(coord, stack)| (*coord, stack.iter().collect()))
            .collect();
        tiles.sort_by_key(|(coord, _)| *coord);
        SelectionSnapshot { tiles }
    }

    pub(crate) fn overlay_clone(&self) -> HashMap<TileCoord, TileStack> {
        self.tiles.clone()
    }

    pub(crate) fn restore_overlay(
        &mut self,
        tiles: HashMap<TileCoord, TileStack>,
        offset: TileCoord,
        floating: bool,
    ) {
        self.tiles = tiles;
        self.offset = offset;
        self.floating = floating;
    }
}

/// The portable form of a selection's content, used for copy and paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    tiles: Vec<(TileCoord, Vec<Tile>)>,
}

impl SelectionSnapshot {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
