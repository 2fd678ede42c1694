//! Tile pool - sole owner of tile pixel storage
//!
//! Every [`Tile`] handed out by the pool is a lightweight handle; the pool
//! owns the pixel buffers and the dependency graph between physical tiles
//! and their derived (rotated/flipped) variants.

use crate::error::GridError;
use crate::tile::{Tile, TileId, TileTransform};
use std::collections::HashMap;
use tracing::trace;

enum TileKind {
    /// Owns its pixels outright; knows which dependents to push updates to
    Physical { dependents: Vec<TileId> },
    /// Pixels are derived from a base tile through a transform
    Dependent {
        base: TileId,
        transform: TileTransform,
    },
}

struct TileRecord {
    pixels: Vec<u32>,
    kind: TileKind,
}

/// A table mapping tile identities to pixel data.
///
/// All tiles in a pool share the same dimensions. Updates flow one
/// direction per call: base to all dependents, or dependent to base to all
/// dependents. The forward lists are owned here; dependents hold only the
/// base's id, so there are no shared mutable cycles.
pub struct TilePool {
    tile_width: u32,
    tile_height: u32,
    tiles: HashMap<TileId, TileRecord>,
}

impl TilePool {
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width,
            tile_height,
            tiles: HashMap::new(),
        }
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles.contains_key(&tile.id())
    }

    fn check_buffer(&self, pixels: &[u32]) -> Result<(), GridError> {
        let expected = (self.tile_width * self.tile_height) as usize;
        if pixels.len() != expected {
            return Err(GridError::PixelBufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(())
    }

    /// Register a new physical tile owning the given pixels.
    pub fn create_tile(&mut self, pixels: Vec<u32>) -> Result<Tile, GridError> {
        self.check_buffer(&pixels)?;
        let id = TileId::generate();
        self.tiles.insert(
            id,
            TileRecord {
                pixels,
                kind: TileKind::Physical {
                    dependents: Vec::new(),
                },
            },
        );
        Ok(Tile::new(id, self.tile_width, self.tile_height))
    }

    /// Register a dependent tile derived from `base` through `transform`.
    ///
    /// The base must be a physical tile (the dependency graph is one hop
    /// deep). 90/270 degree rotations require a square tile size, since
    /// every tile in the pool must keep the pool's dimensions.
    pub fn create_dependent(
        &mut self,
        base: Tile,
        transform: TileTransform,
    ) -> Result<Tile, GridError> {
        if transform.swaps_dimensions() && self.tile_width != self.tile_height {
            return Err(GridError::TileDimensionMismatch {
                expected_width: self.tile_width,
                expected_height: self.tile_height,
                actual_width: self.tile_height,
                actual_height: self.tile_width,
            });
        }
        let record = self
            .tiles
            .get(&base.id())
            .ok_or(GridError::UnknownTile(base.id()))?;
        if !matches!(record.kind, TileKind::Physical { .. }) {
            return Err(GridError::NotAPhysicalTile(base.id()));
        }

        let pixels = transform.apply(&record.pixels, self.tile_width, self.tile_height);
        let id = TileId::generate();
        self.tiles.insert(
            id,
            TileRecord {
                pixels,
                kind: TileKind::Dependent {
                    base: base.id(),
                    transform,
                },
            },
        );
        if let Some(TileRecord {
            kind: TileKind::Physical { dependents },
            ..
        }) = self.tiles.get_mut(&base.id())
        {
            dependents.push(id);
        }
        Ok(Tile::new(id, self.tile_width, self.tile_height))
    }

    /// Replace a tile's pixels.
    ///
    /// Updating a physical tile pushes the change forward into every
    /// dependent. Updating a dependent applies the inverse transform and
    /// updates the base instead; the base then re-propagates to all of its
    /// dependents, including the one that triggered the update. Either way
    /// `transform(base) == dependent` holds afterwards.
    pub fn update_tile(&mut self, tile: Tile, pixels: Vec<u32>) -> Result<(), GridError> {
        self.check_buffer(&pixels)?;
        let record = self
            .tiles
            .get(&tile.id())
            .ok_or(GridError::UnknownTile(tile.id()))?;

        match &record.kind {
            TileKind::Physical { .. } => self.update_physical(tile.id(), pixels),
            TileKind::Dependent { base, transform } => {
                // The base is authoritative: write through it, then let the
                // forward propagation rewrite this dependent (and siblings).
                let base = *base;
                let base_pixels =
                    transform
                        .inverse()
                        .apply(&pixels, self.tile_width, self.tile_height);
                self.update_physical(base, base_pixels)
            }
        }
    }

    fn update_physical(&mut self, id: TileId, pixels: Vec<u32>) -> Result<(), GridError> {
        let record = self.tiles.get_mut(&id).ok_or(GridError::UnknownTile(id))?;
        record.pixels = pixels;
        let dependents = match &record.kind {
            TileKind::Physical { dependents } => dependents.clone(),
            // Only reachable through update_tile, which resolves to the base
            TileKind::Dependent { .. } => return Err(GridError::NotAPhysicalTile(id)),
        };

        let base_pixels = self.tiles[&id].pixels.clone();
        for dep_id in dependents {
            let Some(dep) = self.tiles.get_mut(&dep_id) else {
                continue;
            };
            let TileKind::Dependent { transform, .. } = &dep.kind else {
                continue;
            };
            let transform = *transform;
            let derived = transform.apply(&base_pixels, self.tile_width, self.tile_height);
            // Skip redundant writes: the triggering dependent usually
            // already holds exactly this data.
            if dep.pixels != derived {
                trace!(%dep_id, "propagating base tile update to dependent");
                dep.pixels = derived;
            }
        }
        Ok(())
    }

    /// Pixel data for a tile, if it is in the pool
    pub fn pixels(&self, tile: Tile) -> Option<&[u32]> {
        self.tiles.get(&tile.id()).map(|r| r.pixels.as_slice())
    }
}
