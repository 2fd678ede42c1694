//! Tile identity and geometric transforms

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, stable identity of a tile definition.
///
/// A `TileId` references a tile's pixel data in a [`crate::TilePool`]
/// without owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(Uuid);

impl TileId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A lightweight handle to a pooled tile.
///
/// Carries the identity plus the pool's tile dimensions so layers and
/// brushes can validate sizes without reaching back into the pool. The
/// dimensions always equal the owning pool's configured tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    width: u32,
    height: u32,
}

impl Tile {
    pub(crate) fn new(id: TileId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// A geometric transform relating a dependent tile to its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileTransform {
    /// 90 degrees clockwise
    Rotate90,
    Rotate180,
    /// 90 degrees counter-clockwise
    Rotate270,
    /// Mirror across the vertical axis
    FlipHorizontal,
    /// Mirror across the horizontal axis
    FlipVertical,
}

impl TileTransform {
    /// The transform that maps the output back onto the input.
    pub fn inverse(self) -> Self {
        match self {
            TileTransform::Rotate90 => TileTransform::Rotate270,
            TileTransform::Rotate270 => TileTransform::Rotate90,
            // 180 and the flips are their own inverse
            other => other,
        }
    }

    /// Whether applying this transform swaps the buffer's width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, TileTransform::Rotate90 | TileTransform::Rotate270)
    }

    /// Apply the transform to a row-major pixel buffer of the given size.
    ///
    /// The output buffer is `height x width` for the 90/270 rotations and
    /// `width x height` otherwise.
    pub fn apply(self, pixels: &[u32], width: u32, height: u32) -> Vec<u32> {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        let (w, h) = (width as usize, height as usize);
        let mut out = vec![0u32; w * h];
        match self {
            TileTransform::Rotate90 => {
                // output is h wide, w tall
                for yo in 0..w {
                    for xo in 0..h {
                        out[yo * h + xo] = pixels[(h - 1 - xo) * w + yo];
                    }
                }
            }
            TileTransform::Rotate270 => {
                for yo in 0..w {
                    for xo in 0..h {
                        out[yo * h + xo] = pixels[xo * w + (w - 1 - yo)];
                    }
                }
            }
            TileTransform::Rotate180 => {
                for y in 0..h {
                    for x in 0..w {
                        out[y * w + x] = pixels[(h - 1 - y) * w + (w - 1 - x)];
                    }
                }
            }
            TileTransform::FlipHorizontal => {
                for y in 0..h {
                    for x in 0..w {
                        out[y * w + x] = pixels[y * w + (w - 1 - x)];
                    }
                }
            }
            TileTransform::FlipVertical => {
                for y in 0..h {
                    for x in 0..w {
                        out[y * w + x] = pixels[(h - 1 - y) * w + x];
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x2 buffer:
    //   1 2
    //   3 4
    const SQUARE: [u32; 4] = [1, 2, 3, 4];

    #[test]
    fn test_rotate90() {
        // clockwise: top row becomes right column
        assert_eq!(TileTransform::Rotate90.apply(&SQUARE, 2, 2), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_rotate180() {
        assert_eq!(
            TileTransform::Rotate180.apply(&SQUARE, 2, 2),
            vec![4, 3, 2, 1]
        );
    }

    #[test]
    fn test_rotate270() {
        assert_eq!(
            TileTransform::Rotate270.apply(&SQUARE, 2, 2),
            vec![2, 4, 1, 3]
        );
    }

    #[test]
    fn test_flips() {
        assert_eq!(
            TileTransform::FlipHorizontal.apply(&SQUARE, 2, 2),
            vec![2, 1, 4, 3]
        );
        assert_eq!(
            TileTransform::FlipVertical.apply(&SQUARE, 2, 2),
            vec![3, 4, 1, 2]
        );
    }

    #[test]
    fn test_non_square_rotation_swaps_dimensions() {
        // 3x1 row: 1 2 3 -> rotated clockwise becomes a 1x3 column
        let row = [1u32, 2, 3];
        assert_eq!(TileTransform::Rotate90.apply(&row, 3, 1), vec![1, 2, 3]);
        assert_eq!(TileTransform::Rotate270.apply(&row, 3, 1), vec![3, 2, 1]);
    }

    #[test]
    fn test_inverse_round_trips() {
        let transforms = [
            TileTransform::Rotate90,
            TileTransform::Rotate180,
            TileTransform::Rotate270,
            TileTransform::FlipHorizontal,
            TileTransform::FlipVertical,
        ];
        for t in transforms {
            let forward = t.apply(&SQUARE, 2, 2);
            let back = t.inverse().apply(&forward, 2, 2);
            assert_eq!(back, SQUARE.to_vec(), "{t:?} inverse failed");
        }
    }
}
