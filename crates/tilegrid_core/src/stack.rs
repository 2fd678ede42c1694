//! Ordered tile stacks occupying a single grid cell

use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// An ordered multiset of tiles occupying one grid cell.
///
/// The top of the stack is the most recently added tile. Adding a tile
/// that is already present moves it to the top instead of duplicating it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileStack {
    tiles: Vec<Tile>,
}

impl TileStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack holding a single tile
    pub fn single(tile: Tile) -> Self {
        Self { tiles: vec![tile] }
    }

    /// Add a tile to the top of the stack.
    ///
    /// If the same tile identity is already present it is moved to the top
    /// rather than added a second time.
    pub fn add(&mut self, tile: Tile) {
        if let Some(pos) = self.tiles.iter().position(|t| t.id() == tile.id()) {
            self.tiles.remove(pos);
        }
        self.tiles.push(tile);
    }

    /// Remove a tile by identity. Returns whether the tile was present.
    pub fn remove(&mut self, tile: Tile) -> bool {
        if let Some(pos) = self.tiles.iter().position(|t| t.id() == tile.id()) {
            self.tiles.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles.iter().any(|t| t.id() == tile.id())
    }

    /// The most recently added tile
    pub fn top(&self) -> Option<Tile> {
        self.tiles.last().copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Iterate bottom-to-top
    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        self.tiles.iter().copied()
    }
}

impl FromIterator<Tile> for TileStack {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut stack = TileStack::new();
        for tile in iter {
            stack.add(tile);
        }
        stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::TilePool;

    fn pool_with_tiles(n: usize) -> (TilePool, Vec<Tile>) {
        let mut pool = TilePool::new(2, 2);
        let tiles = (0..n)
            .map(|i| pool.create_tile(vec![i as u32; 4]).unwrap())
            .collect();
        (pool, tiles)
    }

    #[test]
    fn test_add_orders_top_last() {
        let (_pool, tiles) = pool_with_tiles(3);
        let mut stack = TileStack::new();
        stack.add(tiles[0]);
        stack.add(tiles[1]);
        stack.add(tiles[2]);

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.top(), Some(tiles[2]));
    }

    #[test]
    fn test_readd_moves_to_top_without_duplicating() {
        let (_pool, tiles) = pool_with_tiles(2);
        let mut stack = TileStack::new();
        stack.add(tiles[0]);
        stack.add(tiles[1]);
        stack.add(tiles[0]);

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top(), Some(tiles[0]));
        let order: Vec<_> = stack.iter().collect();
        assert_eq!(order, vec![tiles[1], tiles[0]]);
    }

    #[test]
    fn test_remove() {
        let (_pool, tiles) = pool_with_tiles(2);
        let mut stack = TileStack::new();
        stack.add(tiles[0]);

        assert!(!stack.remove(tiles[1]));
        assert!(stack.remove(tiles[0]));
        assert!(stack.is_empty());
    }
}
