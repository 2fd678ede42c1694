//! Tile-space coordinates and rectangular regions

use serde::{Deserialize, Serialize};

/// An (x, y) position in tile space.
///
/// Used both as a key into sparse maps (brushes, selections) and as an
/// index into the dense cell array of a [`crate::TileGridLayer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const ZERO: TileCoord = TileCoord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This coordinate shifted by (dx, dy)
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::ops::Add for TileCoord {
    type Output = TileCoord;

    fn add(self, rhs: TileCoord) -> TileCoord {
        TileCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in tile space: origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl TileRegion {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region spanning the two corner coordinates, inclusive
    pub fn from_corners(a: TileCoord, b: TileCoord) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        let max_x = a.x.max(b.x);
        let max_y = a.y.max(b.y);
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= self.x && coord.x < self.right() && coord.y >= self.y && coord.y < self.bottom()
    }

    /// The overlapping rectangle of two regions, if any
    pub fn intersect(&self, other: &TileRegion) -> Option<TileRegion> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > x && bottom > y {
            Some(TileRegion::new(x, y, (right - x) as u32, (bottom - y) as u32))
        } else {
            None
        }
    }

    /// Iterate every coordinate in the region, row-major
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let (x, right) = (self.x, self.right());
        (self.y..self.bottom()).flat_map(move |y| (x..right).map(move |x| TileCoord::new(x, y)))
    }
}
