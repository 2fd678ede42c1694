//! Context-sensitive autotile brushes
//!
//! A dynamic brush selects which of its template slots to place by looking
//! at the eight neighboring cells of the target: a neighbor counts when it
//! holds one of this brush's own slot tiles (a "member"). Placing a tile
//! changes the neighbors' rule inputs, so the brush re-evaluates the one
//! ring of adjacent member cells - and only that ring, which bounds every
//! application at nine cell writes.

use crate::class::{BrushClass, NEIGHBOR_OFFSETS};
use std::collections::HashSet;
use std::rc::Rc;
use tilegrid_core::{GridError, Tile, TileCoord, TileGridLayer, TileId, TileStack};
use tracing::debug;
use uuid::Uuid;

/// An autotile brush: a slot array driven by a [`BrushClass`] rule table.
#[derive(Debug, Clone)]
pub struct DynamicTileBrush {
    id: Uuid,
    name: String,
    tile_width: u32,
    tile_height: u32,
    class: Rc<BrushClass>,
    slots: Vec<Option<Tile>>,
    members: HashSet<TileId>,
}

impl DynamicTileBrush {
    pub fn new(
        name: impl Into<String>,
        tile_width: u32,
        tile_height: u32,
        class: Rc<BrushClass>,
    ) -> Self {
        let slots = vec![None; class.slot_count()];
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tile_width,
            tile_height,
            class,
            slots,
            members: HashSet::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn class(&self) -> &Rc<BrushClass> {
        &self.class
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<Tile> {
        self.slots.get(index).copied().flatten()
    }

    /// Assign a tile to a template slot. Out-of-range indices are ignored.
    pub fn set_slot(&mut self, index: usize, tile: Option<Tile>) -> Result<(), GridError> {
        if let Some(tile) = tile {
            if tile.width() != self.tile_width || tile.height() != self.tile_height {
                return Err(GridError::TileDimensionMismatch {
                    expected_width: self.tile_width,
                    expected_height: self.tile_height,
                    actual_width: tile.width(),
                    actual_height: tile.height(),
                });
            }
        }
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = tile;
            self.members = self.slots.iter().flatten().map(|t| t.id()).collect();
        }
        Ok(())
    }

    /// Whether a tile is one of this brush's slot tiles
    pub fn is_member(&self, tile: Tile) -> bool {
        self.members.contains(&tile.id())
    }

    fn stack_has_member(&self, stack: Option<&TileStack>) -> bool {
        stack.is_some_and(|s| s.iter().any(|t| self.is_member(t)))
    }

    /// Membership bitmask over the 8 compass neighbors of (x, y).
    ///
    /// Bit i corresponds to [`NEIGHBOR_OFFSETS`]\[i\]; out-of-bounds
    /// neighbors read as empty.
    pub fn neighbor_mask(&self, layer: &TileGridLayer, x: i32, y: i32) -> u8 {
        let mut mask = 0u8;
        for (i, &(dx, dy)) in NEIGHBOR_OFFSETS.iter().enumerate() {
            let coord = TileCoord::new(x + dx, y + dy);
            if self.stack_has_member(layer.tiles_at(coord)) {
                mask |= 1 << i;
            }
        }
        mask
    }

    /// Apply the brush at (x, y).
    ///
    /// Selects a slot from the current neighborhood, replaces any member
    /// tiles at the target cell, then re-evaluates each in-bounds neighbor
    /// that currently holds a member tile. The cascade never recurses past
    /// the immediate ring, which guarantees termination.
    pub fn apply(&self, layer: &mut TileGridLayer, x: i32, y: i32) -> Result<(), GridError> {
        if !layer.contains(TileCoord::new(x, y)) {
            return Err(GridError::OutOfBounds { x, y });
        }
        self.apply_cell(layer, x, y)?;

        for &(dx, dy) in NEIGHBOR_OFFSETS.iter() {
            let (nx, ny) = (x + dx, y + dy);
            let coord = TileCoord::new(nx, ny);
            if layer.contains(coord) && self.stack_has_member(layer.tiles_at(coord)) {
                self.apply_cell(layer, nx, ny)?;
            }
        }
        Ok(())
    }

    /// Remove this brush's member tiles at (x, y) and re-evaluate the
    /// surrounding ring, healing the pattern around the gap.
    pub fn erase(&self, layer: &mut TileGridLayer, x: i32, y: i32) -> Result<(), GridError> {
        if !layer.contains(TileCoord::new(x, y)) {
            return Err(GridError::OutOfBounds { x, y });
        }
        self.remove_members(layer, x, y)?;

        for &(dx, dy) in NEIGHBOR_OFFSETS.iter() {
            let (nx, ny) = (x + dx, y + dy);
            let coord = TileCoord::new(nx, ny);
            if layer.contains(coord) && self.stack_has_member(layer.tiles_at(coord)) {
                self.apply_cell(layer, nx, ny)?;
            }
        }
        Ok(())
    }

    /// Rewrite one cell from its current neighborhood.
    ///
    /// An out-of-range selected slot, or a slot with no tile assigned,
    /// selects nothing: the member tiles are still removed but no tile is
    /// added. Inconsistent templates must not abort a cascade mid-way.
    fn apply_cell(&self, layer: &mut TileGridLayer, x: i32, y: i32) -> Result<(), GridError> {
        let mask = self.neighbor_mask(layer, x, y);
        let slot = self.class.select_slot(mask);
        let chosen = self.slot(slot);
        debug!(x, y, mask, slot, "autotile cell evaluation");

        self.remove_members(layer, x, y)?;
        if let Some(tile) = chosen {
            layer.add_tile(x, y, tile)?;
        }
        Ok(())
    }

    fn remove_members(&self, layer: &mut TileGridLayer, x: i32, y: i32) -> Result<(), GridError> {
        let existing: Vec<Tile> = layer
            .tiles_at(TileCoord::new(x, y))
            .map(|stack| stack.iter().filter(|&t| self.is_member(t)).collect())
            .unwrap_or_default();
        for tile in existing {
            layer.remove_tile(x, y, tile)?;
        }
        Ok(())
    }
}
