//! Brush thumbnails
//!
//! Previews are composed from the pool's pixel data: each cell's stack is
//! blitted bottom-to-top with source-over alpha, clipped to an optional
//! maximum extent. Pixels are packed 0xAARRGGBB.

use crate::dynamic_brush::DynamicTileBrush;
use crate::static_brush::StaticTileBrush;
use tilegrid_core::{TileCoord, TilePool, TileStack};

/// A composed RGBA thumbnail of a brush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrushPreview {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl BrushPreview {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    /// Blit a tile's pixels at (dst_x, dst_y), source-over
    fn blit(&mut self, pixels: &[u32], tile_w: u32, tile_h: u32, dst_x: u32, dst_y: u32) {
        for sy in 0..tile_h {
            let dy = dst_y + sy;
            if dy >= self.height {
                break;
            }
            for sx in 0..tile_w {
                let dx = dst_x + sx;
                if dx >= self.width {
                    break;
                }
                let src = pixels[(sy * tile_w + sx) as usize];
                let dst = &mut self.pixels[(dy * self.width + dx) as usize];
                *dst = over(src, *dst);
            }
        }
    }
}

/// Source-over blend of two 0xAARRGGBB pixels
fn over(src: u32, dst: u32) -> u32 {
    let sa = (src >> 24) & 0xff;
    if sa == 0xff {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = (dst >> 24) & 0xff;
    let inv = 0xff - sa;
    let blend = |shift: u32| {
        let s = (src >> shift) & 0xff;
        let d = (dst >> shift) & 0xff;
        (s * sa + d * inv + 0x7f) / 0xff
    };
    let a = (sa * 0xff + da * inv + 0x7f) / 0xff;
    (a << 24) | (blend(16) << 16) | (blend(8) << 8) | blend(0)
}

fn blit_stack(
    preview: &mut BrushPreview,
    pool: &TilePool,
    stack: &TileStack,
    dst_x: u32,
    dst_y: u32,
) {
    for tile in stack.iter() {
        if let Some(pixels) = pool.pixels(tile) {
            preview.blit(pixels, tile.width(), tile.height(), dst_x, dst_y);
        }
    }
}

/// Render a static brush's pattern, clipped to `max_width x max_height`
/// pixels if given.
pub fn static_brush_preview(
    brush: &StaticTileBrush,
    pool: &TilePool,
    max_size: Option<(u32, u32)>,
) -> BrushPreview {
    let Some(extent) = brush.extent() else {
        return BrushPreview::new(0, 0);
    };
    let (tw, th) = (brush.tile_width(), brush.tile_height());
    let mut width = extent.width * tw;
    let mut height = extent.height * th;
    if let Some((max_w, max_h)) = max_size {
        width = width.min(max_w);
        height = height.min(max_h);
    }

    let mut preview = BrushPreview::new(width, height);
    for (coord, stack) in brush.cells() {
        let cell = TileCoord::new(coord.x - extent.x, coord.y - extent.y);
        let (dst_x, dst_y) = (cell.x as u32 * tw, cell.y as u32 * th);
        if dst_x >= width || dst_y >= height {
            continue;
        }
        blit_stack(&mut preview, pool, stack, dst_x, dst_y);
    }
    preview
}

/// Render a dynamic brush's slots laid out in a square template grid,
/// clipped to `max_width x max_height` pixels if given.
pub fn dynamic_brush_preview(
    brush: &DynamicTileBrush,
    pool: &TilePool,
    max_size: Option<(u32, u32)>,
) -> BrushPreview {
    let slots = brush.slot_count() as u32;
    if slots == 0 {
        return BrushPreview::new(0, 0);
    }
    let columns = (slots as f64).sqrt().ceil() as u32;
    let rows = slots.div_ceil(columns);
    let (tw, th) = (brush.tile_width(), brush.tile_height());
    let mut width = columns * tw;
    let mut height = rows * th;
    if let Some((max_w, max_h)) = max_size {
        width = width.min(max_w);
        height = height.min(max_h);
    }

    let mut preview = BrushPreview::new(width, height);
    for index in 0..brush.slot_count() {
        let Some(tile) = brush.slot(index) else {
            continue;
        };
        let (col, row) = (index as u32 % columns, index as u32 / columns);
        let (dst_x, dst_y) = (col * tw, row * th);
        if dst_x >= width || dst_y >= height {
            continue;
        }
        if let Some(pixels) = pool.pixels(tile) {
            preview.blit(pixels, tile.width(), tile.height(), dst_x, dst_y);
        }
    }
    preview
}
