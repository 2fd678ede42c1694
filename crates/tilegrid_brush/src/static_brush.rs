//! Fixed-pattern stamp brushes

use std::collections::HashMap;
use tilegrid_core::{GridError, Tile, TileCoord, TileGridLayer, TileRegion, TileStack};
use uuid::Uuid;

/// A stamp brush: a sparse pattern of tile stacks written verbatim.
///
/// The pattern is kept normalized so its minimum occupied coordinate is
/// (0, 0); call [`StaticTileBrush::normalize`] after editing the pattern.
#[derive(Debug, Clone)]
pub struct StaticTileBrush {
    id: Uuid,
    name: String,
    tile_width: u32,
    tile_height: u32,
    tiles: HashMap<TileCoord, TileStack>,
}

impl StaticTileBrush {
    pub fn new(name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tile_width,
            tile_height,
            tiles: HashMap::new(),
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

    /// Add a tile to the pattern cell at `coord`.
    pub fn add_tile(&mut self, coord: TileCoord, tile: Tile) -> Result<(), GridError> {
        if tile.width() != self.tile_width || tile.height() != self.tile_height {
            return Err(GridError::TileDimensionMismatch {
                expected_width: self.tile_width,
                expected_height: self.tile_height,
                actual_width: tile.width(),
                actual_height: tile.height(),
            });
        }
        self.tiles.entry(coord).or_default().add(tile);
        Ok(())
    }

    /// Remove a tile from the pattern cell at `coord`.
    pub fn remove_tile(&mut self, coord: TileCoord, tile: Tile) {
        if let Some(stack) = self.tiles.get_mut(&coord) {
            stack.remove(tile);
            if stack.is_empty() {
                self.tiles.remove(&coord);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate the pattern's occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (TileCoord, &TileStack)> + '_ {
        self.tiles.iter().map(|(coord, stack)| (*coord, stack))
    }

    /// Bounding box of the occupied pattern cells
    pub fn extent(&self) -> Option<TileRegion> {
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

    /// Rebase the pattern so its minimum occupied coordinate is (0, 0).
    pub fn normalize(&mut self) {
        let Some(extent) = self.extent() else { return };
        if extent.x == 0 && extent.y == 0 {
            return;
        }
        self.tiles = self
            .tiles
            .drain()
            .map(|(coord, stack)| (coord.offset(-extent.x, -extent.y), stack))
            .collect();
    }

    /// Stamp the pattern into the layer with its (0, 0) cell at (x, y).
    ///
    /// Every target cell is validated first; if any falls outside the
    /// layer the whole application fails without mutating anything.
    pub fn apply(&self, layer: &mut TileGridLayer, x: i32, y: i32) -> Result<(), GridError> {
        for coord in self.tiles.keys() {
            let target = coord.offset(x, y);
            if !layer.contains(target) {
                return Err(GridError::OutOfBounds {
                    x: target.x,
                    y: target.y,
                });
            }
        }
        for (coord, stack) in &self.tiles {
            let target = coord.offset(x, y);
            for tile in stack.iter() {
                layer.add_tile(target.x, target.y, tile)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilegrid_core::TilePool;

    fn setup() -> (TilePool, TileGridLayer, Vec<Tile>) {
        let mut pool = TilePool::new(16, 16);
        let tiles = (0..3)
            .map(|i| pool.create_tile(vec![i as u32; 256]).unwrap())
            .collect();
        let layer = TileGridLayer::new("Ground", 10, 10, 16, 16);
        (pool, layer, tiles)
    }

    #[test]
    fn test_apply_writes_pattern_offsets() {
        let (_pool, mut layer, tiles) = setup();
        let mut brush = StaticTileBrush::new("stamp", 16, 16);
        brush.add_tile(TileCoord::new(0, 0), tiles[0]).unwrap();
        brush.add_tile(TileCoord::new(1, 0), tiles[1]).unwrap();
        brush.add_tile(TileCoord::new(0, 1), tiles[2]).unwrap();

        brush.apply(&mut layer, 3, 3).unwrap();
        assert_eq!(
            layer.tiles_at(TileCoord::new(3, 3)).unwrap().top(),
            Some(tiles[0])
        );
        assert_eq!(
            layer.tiles_at(TileCoord::new(4, 3)).unwrap().top(),
            Some(tiles[1])
        );
        assert_eq!(
            layer.tiles_at(TileCoord::new(3, 4)).unwrap().top(),
            Some(tiles[2])
        );
    }

    #[test]
    fn test_apply_out_of_bounds_aborts_without_mutation() {
        let (_pool, mut layer, tiles) = setup();
        let mut brush = StaticTileBrush::new("stamp", 16, 16);
        brush.add_tile(TileCoord::new(0, 0), tiles[0]).unwrap();
        brush.add_tile(TileCoord::new(1, 0), tiles[1]).unwrap();

        // (9, 0) is fine but (10, 0) is outside the 10x10 layer
        assert!(matches!(
            brush.apply(&mut layer, 9, 0),
            Err(GridError::OutOfBounds { x: 10, y: 0 })
        ));
        assert!(layer.occupied_cells().next().is_none());
    }

    #[test]
    fn test_normalize_rebases_to_origin() {
        let (_pool, _layer, tiles) = setup();
        let mut brush = StaticTileBrush::new("stamp", 16, 16);
        brush.add_tile(TileCoord::new(2, 3), tiles[0]).unwrap();
        brush.add_tile(TileCoord::new(4, 5), tiles[1]).unwrap();

        brush.normalize();
        assert_eq!(brush.extent(), Some(TileRegion::new(0, 0, 3, 3)));
        assert!(brush
            .cells()
            .any(|(coord, _)| coord == TileCoord::new(0, 0)));
        assert!(brush
            .cells()
            .any(|(coord, _)| coord == TileCoord::new(2, 2)));
    }

    #[test]
    fn test_stack_order_preserved_on_apply() {
        let (_pool, mut layer, tiles) = setup();
        let mut brush = StaticTileBrush::new("stamp", 16, 16);
        brush.add_tile(TileCoord::new(0, 0), tiles[0]).unwrap();
        brush.add_tile(TileCoord::new(0, 0), tiles[1]).unwrap();

        brush.apply(&mut layer, 5, 5).unwrap();
        let stack = layer.tiles_at(TileCoord::new(5, 5)).unwrap();
        let order: Vec<_> = stack.iter().collect();
        assert_eq!(order, vec![tiles[0], tiles[1]]);
    }
}
