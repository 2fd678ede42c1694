//! The resizable tile grid layer

use crate::coord::{TileCoord, TileRegion};
use crate::error::GridError;
use crate::events::{LayerEvent, LayerObserver, ObserverList};
use crate::stack::TileStack;
use crate::tile::Tile;
use std::cell::RefCell;
use std::rc::Rc;

/// A rectangular, originable, resizable grid of tile stacks.
///
/// Cells are `None` until a tile is added and go back to `None` when the
/// last tile is removed. The origin describes where the array's (0, 0)
/// cell sits in world tile space, so valid x coordinates satisfy
/// `origin_x <= x < origin_x + width` (and analogously for y).
///
/// All mutations validate bounds and tile dimensions before touching any
/// cell; a failed call leaves the layer unchanged.
#[derive(Debug, Clone)]
pub struct TileGridLayer {
    pub name: String,
    pub visible: bool,
    origin_x: i32,
    origin_y: i32,
    tiles_wide: u32,
    tiles_high: u32,
    tile_width: u32,
    tile_height: u32,
    cells: Vec<Option<TileStack>>,
    observers: ObserverList,
}

impl TileGridLayer {
    /// Create an empty layer of `tiles_wide x tiles_high` cells at origin
    /// (0, 0), holding tiles of `tile_width x tile_height` pixels.
    pub fn new(
        name: impl Into<String>,
        tiles_wide: u32,
        tiles_high: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Self {
            name: name.into(),
            visible: true,
            origin_x: 0,
            origin_y: 0,
            tiles_wide,
            tiles_high,
            tile_width,
            tile_height,
            cells: vec![None; (tiles_wide * tiles_high) as usize],
            observers: ObserverList::new(),
        }
    }

    pub fn tiles_wide(&self) -> u32 {
        self.tiles_wide
    }

    pub fn tiles_high(&self) -> u32 {
        self.tiles_high
    }

    pub fn origin(&self) -> TileCoord {
        TileCoord::new(self.origin_x, self.origin_y)
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// The layer's extent in world tile space
    pub fn bounds(&self) -> TileRegion {
        TileRegion::new(self.origin_x, self.origin_y, self.tiles_wide, self.tiles_high)
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.bounds().contains(coord)
    }

    /// Register an observer for this layer's change events
    pub fn add_observer(&mut self, observer: &Rc<RefCell<dyn LayerObserver>>) {
        self.observers.add(observer);
    }

    fn check_bounds(&self, x: i32, y: i32) -> Result<(), GridError> {
        if !self.contains(TileCoord::new(x, y)) {
            return Err(GridError::OutOfBounds { x, y });
        }
        Ok(())
    }

    fn check_tile(&self, tile: Tile) -> Result<(), GridError> {
        if tile.width() != self.tile_width || tile.height() != self.tile_height {
            return Err(GridError::TileDimensionMismatch {
                expected_width: self.tile_width,
                expected_height: self.tile_height,
                actual_width: tile.width(),
                actual_height: tile.height(),
            });
        }
        Ok(())
    }

    fn index(&self, coord: TileCoord) -> usize {
        let cx = (coord.x - self.origin_x) as u32;
        let cy = (coord.y - self.origin_y) as u32;
        (cy * self.tiles_wide + cx) as usize
    }

    /// Add a tile to the top of the stack at (x, y).
    ///
    /// Idempotent per (cell, tile identity): re-adding a tile that is
    /// already present moves it to the top of the stack.
    pub fn add_tile(&mut self, x: i32, y: i32, tile: Tile) -> Result<(), GridError> {
        self.check_bounds(x, y)?;
        self.check_tile(tile)?;
        let coord = TileCoord::new(x, y);
        self.observers.notify(&LayerEvent::TileAdding { coord, tile });
        let idx = self.index(coord);
        self.cells[idx].get_or_insert_with(TileStack::new).add(tile);
        self.observers.notify(&LayerEvent::TileAdded { coord, tile });
        Ok(())
    }

    /// Remove a tile by identity from the stack at (x, y).
    ///
    /// Removing a tile that is not present is a no-op. A stack that
    /// becomes empty is dropped from its cell.
    pub fn remove_tile(&mut self, x: i32, y: i32, tile: Tile) -> Result<(), GridError> {
        self.check_bounds(x, y)?;
        let coord = TileCoord::new(x, y);
        let idx = self.index(coord);
        let present = self.cells[idx]
            .as_ref()
            .is_some_and(|stack| stack.contains(tile));
        if !present {
            return Ok(());
        }
        self.observers.notify(&LayerEvent::TileRemoving { coord, tile });
        if let Some(stack) = self.cells[idx].as_mut() {
            stack.remove(tile);
            if stack.is_empty() {
                self.cells[idx] = None;
            }
        }
        self.observers.notify(&LayerEvent::TileRemoved { coord, tile });
        Ok(())
    }

    /// Drop the entire stack at (x, y), if any.
    pub fn clear_tile(&mut self, x: i32, y: i32) -> Result<(), GridError> {
        self.check_bounds(x, y)?;
        let coord = TileCoord::new(x, y);
        let idx = self.index(coord);
        if self.cells[idx].is_none() {
            return Ok(());
        }
        self.observers.notify(&LayerEvent::CellClearing { coord });
        self.cells[idx] = None;
        self.observers.notify(&LayerEvent::CellCleared { coord });
        Ok(())
    }

    /// Replace a cell's stack wholesale.
    ///
    /// Used to replay captured cell states (command undo/redo). Events
    /// fire as a clear followed by adds, so observers see the same pairs
    /// they would for the equivalent individual mutations.
    pub fn set_cell(&mut self, x: i32, y: i32, stack: Option<TileStack>) -> Result<(), GridError> {
        self.check_bounds(x, y)?;
        self.clear_tile(x, y)?;
        if let Some(stack) = stack {
            for tile in stack.iter() {
                self.add_tile(x, y, tile)?;
            }
        }
        Ok(())
    }

    /// The stack at a coordinate, if the coordinate is in bounds and the
    /// cell is occupied.
    pub fn tiles_at(&self, coord: TileCoord) -> Option<&TileStack> {
        if !self.contains(coord) {
            return None;
        }
        self.cells[self.index(coord)].as_ref()
    }

    /// Iterate the occupied cells inside a region, row-major.
    pub fn tiles_in_region(
        &self,
        region: TileRegion,
    ) -> impl Iterator<Item = (TileCoord, &TileStack)> + '_ {
        let clipped = self.bounds().intersect(&region);
        clipped
            .into_iter()
            .flat_map(|r| r.coords().collect::<Vec<_>>())
            .filter_map(move |coord| self.tiles_at(coord).map(|stack| (coord, stack)))
    }

    /// Iterate every occupied cell of the layer
    pub fn occupied_cells(&self) -> impl Iterator<Item = (TileCoord, &TileStack)> + '_ {
        self.tiles_in_region(self.bounds())
    }

    /// Resize the layer to a new origin and extent.
    ///
    /// Cells inside the overlap of the old and new rectangles are kept;
    /// everything else is silently dropped. This is lossy and one-way: the
    /// layer itself provides no undo (wrap it in a command for that).
    pub fn resize(&mut self, origin_x: i32, origin_y: i32, tiles_wide: u32, tiles_high: u32) {
        let old_bounds = self.bounds();
        let new_bounds = TileRegion::new(origin_x, origin_y, tiles_wide, tiles_high);
        let mut cells = vec![None; (tiles_wide * tiles_high) as usize];

        if let Some(overlap) = old_bounds.intersect(&new_bounds) {
            for coord in overlap.coords() {
                let old_idx = self.index(coord);
                let new_idx = ((coord.y - origin_y) as u32 * tiles_wide
                    + (coord.x - origin_x) as u32) as usize;
                cells[new_idx] = self.cells[old_idx].take();
            }
        }

        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self.tiles_wide = tiles_wide;
        self.tiles_high = tiles_high;
        self.cells = cells;
        self.observers
            .notify(&LayerEvent::LayerResized { bounds: new_bounds });
    }
}
