//! RGBA pixel format with alpha blending.
//!
//! Reads and writes straight-alpha RGBA32 pixels in a [`RenderedImage`].
//! Blending is the "plain" source-over: the destination is premultiplied
//! on the fly, composited, and divided back out, so translucent color over
//! a transparent widget canvas keeps its hue instead of darkening toward
//! black.

use crate::basics::CoverType;
use crate::color::Rgba8;
use crate::rendering_buffer::{RenderedImage, BPP};

// ============================================================================
// PixelFormat trait
// ============================================================================

/// A pixel layout that colors can be blended into.
///
/// Coordinates passed to these methods are already clipped by the caller.
pub trait PixelFormat {
    type ColorType;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Blend a single pixel with color `c` and coverage `cover`.
    fn blend_pixel(&mut self, x: i32, y: i32, c: &Self::ColorType, cover: CoverType);

    /// Blend `len` pixels with uniform color and coverage.
    fn blend_hline(&mut self, x: i32, y: i32, len: u32, c: &Self::ColorType, cover: CoverType);

    /// Blend `len` pixels with per-pixel coverage values.
    fn blend_solid_hspan(
        &mut self,
        x: i32,
        y: i32,
        len: u32,
        c: &Self::ColorType,
        covers: &[CoverType],
    );

    /// Overwrite `len` pixels with color `c`.
    fn copy_hline(&mut self, x: i32, y: i32, len: u32, c: &Self::ColorType);

    fn pixel(&self, x: i32, y: i32) -> Self::ColorType;
}

// ============================================================================
// PixfmtRgba32
// ============================================================================

/// Straight-alpha RGBA32 pixel format over a borrowed image.
pub struct PixfmtRgba32<'a> {
    img: &'a mut RenderedImage,
}

impl<'a> PixfmtRgba32<'a> {
    pub fn new(img: &'a mut RenderedImage) -> Self {
        Self { img }
    }

    /// Overwrite every pixel with `c`.
    pub fn clear(&mut self, c: &Rgba8) {
        for y in 0..self.img.height() {
            for p in self.img.row_mut(y).chunks_exact_mut(BPP) {
                p.copy_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
    }

    #[inline]
    fn span_mut(&mut self, x: i32, y: i32, len: u32) -> &mut [u8] {
        let start = x as usize * BPP;
        &mut self.img.row_mut(y as u32)[start..start + len as usize * BPP]
    }

    /// Source-over of straight color (cr, cg, cb) at `alpha` onto `p`.
    #[inline]
    fn blend_pix(p: &mut [u8], cr: u8, cg: u8, cb: u8, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            p.copy_from_slice(&[cr, cg, cb, 255]);
            return;
        }
        let alpha = alpha as i64;
        let dst_a = p[3] as i64;
        let out_a = ((alpha + dst_a) << Rgba8::BASE_SHIFT) - alpha * dst_a;
        for (ch, src) in p[..3].iter_mut().zip([cr, cg, cb]) {
            let pre = *ch as i64 * dst_a;
            *ch = ((((src as i64) << Rgba8::BASE_SHIFT) - pre) * alpha + (pre << Rgba8::BASE_SHIFT))
                .div_euclid(out_a) as u8;
        }
        p[3] = (out_a >> Rgba8::BASE_SHIFT) as u8;
    }
}

impl<'a> PixelFormat for PixfmtRgba32<'a> {
    type ColorType = Rgba8;

    fn width(&self) -> u32 {
        self.img.width()
    }

    fn height(&self) -> u32 {
        self.img.height()
    }

    fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        self.img.pixel(x as u32, y as u32)
    }

    fn copy_hline(&mut self, x: i32, y: i32, len: u32, c: &Rgba8) {
        for p in self.span_mut(x, y, len).chunks_exact_mut(BPP) {
            p.copy_from_slice(&[c.r, c.g, c.b, c.a]);
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, c: &Rgba8, cover: CoverType) {
        let alpha = Rgba8::mult_cover(c.a, cover);
        Self::blend_pix(self.span_mut(x, y, 1), c.r, c.g, c.b, alpha);
    }

    fn blend_hline(&mut self, x: i32, y: i32, len: u32, c: &Rgba8, cover: CoverType) {
        let alpha = Rgba8::mult_cover(c.a, cover);
        for p in self.span_mut(x, y, len).chunks_exact_mut(BPP) {
            Self::blend_pix(p, c.r, c.g, c.b, alpha);
        }
    }

    fn blend_solid_hspan(&mut self, x: i32, y: i32, len: u32, c: &Rgba8, covers: &[CoverType]) {
        let span = self.span_mut(x, y, len);
        for (p, &cov) in span.chunks_exact_mut(BPP).zip(covers) {
            Self::blend_pix(p, c.r, c.g, c.b, Rgba8::mult_cover(c.a, cov));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::COVER_FULL;

    fn image(w: u32, h: u32) -> RenderedImage {
        RenderedImage::new(w, h).unwrap()
    }

    #[test]
    fn test_clear_and_copy_hline() {
        let mut img = image(20, 4);
        let mut pf = PixfmtRgba32::new(&mut img);
        pf.clear(&Rgba8::BLACK);
        let green = Rgba8::new_opaque(0, 255, 0);
        pf.copy_hline(5, 3, 10, &green);
        assert_eq!(pf.pixel(4, 3), Rgba8::BLACK);
        assert_eq!(pf.pixel(5, 3), green);
        assert_eq!(pf.pixel(14, 3), green);
        assert_eq!(pf.pixel(15, 3), Rgba8::BLACK);
    }

    #[test]
    fn test_blend_opaque_full_cover_replaces() {
        let mut img = image(4, 4);
        let mut pf = PixfmtRgba32::new(&mut img);
        pf.clear(&Rgba8::BLACK);
        let c = Rgba8::from_argb(0xFF9E_D9A3);
        pf.blend_pixel(1, 1, &c, COVER_FULL);
        assert_eq!(pf.pixel(1, 1), c);
    }

    #[test]
    fn test_blend_half_over_black() {
        let mut img = image(4, 4);
        let mut pf = PixfmtRgba32::new(&mut img);
        pf.clear(&Rgba8::BLACK);
        pf.blend_hline(0, 0, 4, &Rgba8::WHITE, 128);
        let p = pf.pixel(2, 0);
        assert_eq!(p.a, 255);
        assert!((127..=129).contains(&p.r), "r = {}", p.r);
        assert_eq!(p.r, p.g);
    }

    #[test]
    fn test_blend_over_transparent_keeps_hue() {
        let mut img = image(2, 1);
        let mut pf = PixfmtRgba32::new(&mut img);
        let c = Rgba8::new(200, 100, 50, 255);
        pf.blend_pixel(0, 0, &c, 128);
        let p = pf.pixel(0, 0);
        assert_eq!((p.r, p.g, p.b), (200, 100, 50));
        assert_eq!(p.a, 128);
        // Untouched neighbour stays transparent.
        assert_eq!(pf.pixel(1, 0), Rgba8::TRANSPARENT);
    }

    #[test]
    fn test_zero_cover_is_noop() {
        let mut img = image(3, 1);
        let mut pf = PixfmtRgba32::new(&mut img);
        pf.blend_solid_hspan(0, 0, 3, &Rgba8::WHITE, &[0, 255, 0]);
        assert_eq!(pf.pixel(0, 0), Rgba8::TRANSPARENT);
        assert_eq!(pf.pixel(1, 0), Rgba8::WHITE);
        assert_eq!(pf.pixel(2, 0), Rgba8::TRANSPARENT);
    }
}
