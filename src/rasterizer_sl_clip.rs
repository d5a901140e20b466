//! Viewport clipping for the scanline rasterizer.
//!
//! Segments are clipped against a box in 24.8 fixed point before they reach
//! the cell rasterizer. Parts left or right of the box are folded onto its
//! vertical edges so the winding inside the box is unchanged; parts above
//! or below are dropped. Cell work therefore scales with the clip box, not
//! with the size of the geometry.

use crate::basics::{iround, RectI};
use crate::rasterizer_cells_aa::RasterizerCellsAa;

// ============================================================================
// Clipping flags (Cohen-Sutherland outcodes)
// ============================================================================

pub const CLIPPING_FLAGS_X1_CLIPPED: u32 = 4;
pub const CLIPPING_FLAGS_X2_CLIPPED: u32 = 1;
pub const CLIPPING_FLAGS_Y1_CLIPPED: u32 = 8;
pub const CLIPPING_FLAGS_Y2_CLIPPED: u32 = 2;
pub const CLIPPING_FLAGS_X_CLIPPED: u32 = CLIPPING_FLAGS_X1_CLIPPED | CLIPPING_FLAGS_X2_CLIPPED;
pub const CLIPPING_FLAGS_Y_CLIPPED: u32 = CLIPPING_FLAGS_Y1_CLIPPED | CLIPPING_FLAGS_Y2_CLIPPED;

/// Outcode of (x, y) against `clip_box`.
///
/// ```text
///  0110 | 0010 | 0011
/// ------+------+------ y2
///  0100 | 0000 | 0001
/// ------+------+------ y1
///  1100 | 1000 | 1001
///      x1     x2
/// ```
#[inline]
pub fn clipping_flags(x: i32, y: i32, clip_box: &RectI) -> u32 {
    (x > clip_box.x2) as u32
        | (((y > clip_box.y2) as u32) << 1)
        | (((x < clip_box.x1) as u32) << 2)
        | (((y < clip_box.y1) as u32) << 3)
}

#[inline]
pub fn clipping_flags_y(y: i32, clip_box: &RectI) -> u32 {
    (((y > clip_box.y2) as u32) << 1) | (((y < clip_box.y1) as u32) << 3)
}

/// The `b` coordinate where segment (a1, b1)-(a2, b2) crosses `a == at`.
///
/// Computed in f64: saturated far-away coordinates would overflow the
/// integer differences.
#[inline]
fn cross_at(at: i32, a1: i32, b1: i32, a2: i32, b2: i32) -> i32 {
    let (a1, b1) = (a1 as f64, b1 as f64);
    iround(b1 + (at as f64 - a1) * (b2 as f64 - b1) / (a2 as f64 - a1))
}

// ============================================================================
// RasterizerSlClipInt
// ============================================================================

/// Segment clipper sitting between `RasterizerScanlineAa` and the cells.
///
/// Clipping is off until `clip_box` is called.
#[derive(Debug, Clone)]
pub struct RasterizerSlClipInt {
    clip_box: RectI,
    x1: i32,
    y1: i32,
    f1: u32,
    clipping: bool,
}

impl RasterizerSlClipInt {
    pub fn new() -> Self {
        Self {
            clip_box: RectI::new(0, 0, 0, 0),
            x1: 0,
            y1: 0,
            f1: 0,
            clipping: false,
        }
    }

    pub fn reset_clipping(&mut self) {
        self.clipping = false;
    }

    /// Set the clipping rectangle in 24.8 fixed-point coordinates.
    pub fn clip_box(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.clip_box = RectI::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2));
        self.clipping = true;
    }

    pub fn is_clipping(&self) -> bool {
        self.clipping
    }

    pub fn move_to(&mut self, x1: i32, y1: i32) {
        self.x1 = x1;
        self.y1 = y1;
        if self.clipping {
            self.f1 = clipping_flags(x1, y1, &self.clip_box);
        }
    }

    /// Clip the segment from the current point to (x2, y2) and emit it.
    pub fn line_to(&mut self, ras: &mut RasterizerCellsAa, x2: i32, y2: i32) {
        if !self.clipping {
            ras.line(self.x1, self.y1, x2, y2);
            self.x1 = x2;
            self.y1 = y2;
            return;
        }

        let f2 = clipping_flags(x2, y2, &self.clip_box);
        let (x1, y1, f1) = (self.x1, self.y1, self.f1);
        self.x1 = x2;
        self.y1 = y2;
        self.f1 = f2;

        // Both ends beyond the same horizontal edge.
        if (f1 & CLIPPING_FLAGS_Y_CLIPPED) == (f2 & CLIPPING_FLAGS_Y_CLIPPED)
            && (f1 & CLIPPING_FLAGS_Y_CLIPPED) != 0
        {
            return;
        }

        let (left, right) = (self.clip_box.x1, self.clip_box.x2);
        match ((f1 & CLIPPING_FLAGS_X_CLIPPED) << 1) | (f2 & CLIPPING_FLAGS_X_CLIPPED) {
            0 => self.line_clip_y(ras, x1, y1, x2, y2, f1, f2),
            // x2 right of the box
            1 => {
                let y3 = cross_at(right, x1, y1, x2, y2);
                let f3 = clipping_flags_y(y3, &self.clip_box);
                self.line_clip_y(ras, x1, y1, right, y3, f1, f3);
                self.line_clip_y(ras, right, y3, right, y2, f3, f2);
            }
            // x1 right of the box
            2 => {
                let y3 = cross_at(right, x1, y1, x2, y2);
                let f3 = clipping_flags_y(y3, &self.clip_box);
                self.line_clip_y(ras, right, y1, right, y3, f1, f3);
                self.line_clip_y(ras, right, y3, x2, y2, f3, f2);
            }
            3 => self.line_clip_y(ras, right, y1, right, y2, f1, f2),
            // x2 left of the box
            4 => {
                let y3 = cross_at(left, x1, y1, x2, y2);
                let f3 = clipping_flags_y(y3, &self.clip_box);
                self.line_clip_y(ras, x1, y1, left, y3, f1, f3);
                self.line_clip_y(ras, left, y3, left, y2, f3, f2);
            }
            // x1 right, x2 left
            6 => {
                let y3 = cross_at(right, x1, y1, x2, y2);
                let y4 = cross_at(left, x1, y1, x2, y2);
                let f3 = clipping_flags_y(y3, &self.clip_box);
                let f4 = clipping_flags_y(y4, &self.clip_box);
                self.line_clip_y(ras, right, y1, right, y3, f1, f3);
                self.line_clip_y(ras, right, y3, left, y4, f3, f4);
                self.line_clip_y(ras, left, y4, left, y2, f4, f2);
            }
            // x1 left of the box
            8 => {
                let y3 = cross_at(left, x1, y1, x2, y2);
                let f3 = clipping_flags_y(y3, &self.clip_box);
                self.line_clip_y(ras, left, y1, left, y3, f1, f3);
                self.line_clip_y(ras, left, y3, x2, y2, f3, f2);
            }
            // x1 left, x2 right
            9 => {
                let y3 = cross_at(left, x1, y1, x2, y2);
                let y4 = cross_at(right, x1, y1, x2, y2);
                let f3 = clipping_flags_y(y3, &self.clip_box);
                let f4 = clipping_flags_y(y4, &self.clip_box);
                self.line_clip_y(ras, left, y1, left, y3, f1, f3);
                self.line_clip_y(ras, left, y3, right, y4, f3, f4);
                self.line_clip_y(ras, right, y4, right, y2, f4, f2);
            }
            12 => self.line_clip_y(ras, left, y1, left, y2, f1, f2),
            // 5, 7, 10, 11: a point cannot be both left and right of the box.
            _ => {}
        }
    }

    /// Clip a segment that is inside the box horizontally against its
    /// top and bottom edges.
    #[allow(clippy::too_many_arguments)]
    fn line_clip_y(
        &self,
        ras: &mut RasterizerCellsAa,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        f1: u32,
        f2: u32,
    ) {
        let f1 = f1 & CLIPPING_FLAGS_Y_CLIPPED;
        let f2 = f2 & CLIPPING_FLAGS_Y_CLIPPED;

        if (f1 | f2) == 0 {
            ras.line(x1, y1, x2, y2);
            return;
        }
        if f1 == f2 {
            return;
        }

        let (top, bottom) = (self.clip_box.y1, self.clip_box.y2);
        let (mut tx1, mut ty1, mut tx2, mut ty2) = (x1, y1, x2, y2);
        if f1 & CLIPPING_FLAGS_Y1_CLIPPED != 0 {
            tx1 = cross_at(top, y1, x1, y2, x2);
            ty1 = top;
        }
        if f1 & CLIPPING_FLAGS_Y2_CLIPPED != 0 {
            tx1 = cross_at(bottom, y1, x1, y2, x2);
            ty1 = bottom;
        }
        if f2 & CLIPPING_FLAGS_Y1_CLIPPED != 0 {
            tx2 = cross_at(top, y1, x1, y2, x2);
            ty2 = top;
        }
        if f2 & CLIPPING_FLAGS_Y2_CLIPPED != 0 {
            tx2 = cross_at(bottom, y1, x1, y2, x2);
            ty2 = bottom;
        }
        ras.line(tx1, ty1, tx2, ty2);
    }
}

impl Default for RasterizerSlClipInt {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
