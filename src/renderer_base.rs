//! Base renderer with clipping.
//!
//! Wraps a pixel format with a clip rectangle so every blend stays inside
//! the canvas. Dots and glyphs that straddle the edge are cut here.

use crate::basics::{CoverType, RectI};
use crate::pixfmt_rgba::PixelFormat;

/// Clip-and-delegate renderer.
pub struct RendererBase<PF: PixelFormat> {
    ren: PF,
    clip_box: RectI,
}

impl<PF: PixelFormat> RendererBase<PF> {
    /// Wrap a pixel format; the clip box covers the full buffer.
    pub fn new(ren: PF) -> Self {
        let w = ren.width() as i32;
        let h = ren.height() as i32;
        Self {
            ren,
            clip_box: RectI::new(0, 0, w - 1, h - 1),
        }
    }

    pub fn width(&self) -> u32 {
        self.ren.width()
    }

    pub fn height(&self) -> u32 {
        self.ren.height()
    }

    pub fn clip_box(&self) -> &RectI {
        &self.clip_box
    }

    #[inline]
    pub fn inbox(&self, x: i32, y: i32) -> bool {
        self.clip_box.hit_test(x, y)
    }

    pub fn ren(&self) -> &PF {
        &self.ren
    }

    /// Overwrite the whole clip box with `c`.
    pub fn clear(&mut self, c: &PF::ColorType) {
        let cb = self.clip_box;
        if !cb.is_valid() {
            return;
        }
        for y in cb.y1..=cb.y2 {
            self.ren.copy_hline(cb.x1, y, (cb.x2 - cb.x1 + 1) as u32, c);
        }
    }

    /// Blend a single pixel (clipped).
    pub fn blend_pixel(&mut self, x: i32, y: i32, c: &PF::ColorType, cover: CoverType) {
        if self.inbox(x, y) {
            self.ren.blend_pixel(x, y, c, cover);
        }
    }

    /// Blend a horizontal line (clipped). `x1`, `x2` are inclusive.
    pub fn blend_hline(
        &mut self,
        mut x1: i32,
        y: i32,
        mut x2: i32,
        c: &PF::ColorType,
        cover: CoverType,
    ) {
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
        }
        let cb = self.clip_box;
        if y > cb.y2 || y < cb.y1 || x1 > cb.x2 || x2 < cb.x1 {
            return;
        }
        x1 = x1.max(cb.x1);
        x2 = x2.min(cb.x2);
        self.ren.blend_hline(x1, y, (x2 - x1 + 1) as u32, c, cover);
    }

    /// Blend a span with per-pixel coverage (clipped).
    pub fn blend_solid_hspan(
        &mut self,
        mut x: i32,
        y: i32,
        mut len: i32,
        c: &PF::ColorType,
        covers: &[CoverType],
    ) {
        let cb = self.clip_box;
        if y > cb.y2 || y < cb.y1 {
            return;
        }

        let mut covers_offset = 0usize;
        if x < cb.x1 {
            let d = cb.x1 - x;
            len -= d;
            if len <= 0 {
                return;
            }
            covers_offset = d as usize;
            x = cb.x1;
        }
        if x + len > cb.x2 + 1 {
            len = cb.x2 - x + 1;
            if len <= 0 {
                return;
            }
        }
        self.ren
            .blend_solid_hspan(x, y, len as u32, c, &covers[covers_offset..]);
    }
}

// ============================================================================
// Tests
// ============================================================================
