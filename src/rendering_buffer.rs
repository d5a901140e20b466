//! Owned pixel buffer.
//!
//! `RenderedImage` is the output of every render call: a row-major,
//! top-to-bottom RGBA8 buffer with no stride padding. It is created once
//! per render and handed to the caller, who owns it from then on.

use crate::color::Rgba8;
use crate::error::{RenderError, Result};

/// Bytes per pixel.
pub const BPP: usize = 4;

/// A `width × height` RGBA8 pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RenderedImage {
    /// Allocate a fully transparent buffer.
    ///
    /// Fails with `InvalidCanvas` for an empty canvas, for a side beyond
    /// the rasterizer's `i32` pixel range, and for a byte size that
    /// overflows or cannot be allocated.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let invalid = || RenderError::InvalidCanvas { width, height };
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(invalid());
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BPP))
            .ok_or_else(invalid)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| invalid())?;
        data.resize(len, 0u8);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * BPP
    }

    /// Color of the pixel at (x, y).
    ///
    /// Panics if the coordinate is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let off = y as usize * self.stride() + x as usize * BPP;
        let p = &self.data[off..off + BPP];
        Rgba8::new(p[0], p[1], p[2], p[3])
    }

    /// One row of RGBA bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride();
        &self.data[start..start + self.stride()]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// The raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image, returning its RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixels as packed `0xAARRGGBB` words, the layout of an ARGB_8888 bitmap.
    pub fn to_argb_words(&self) -> Vec<u32> {
        self.data
            .chunks_exact(BPP)
            .map(|p| Rgba8::new(p[0], p[1], p[2], p[3]).to_argb())
            .collect()
    }
}

impl std::fmt::Debug for RenderedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let img = RenderedImage::new(3, 2).unwrap();
        assert_eq!(img.as_bytes().len(), 3 * 2 * BPP);
        assert_eq!(img.pixel(2, 1), Rgba8::TRANSPARENT);
        assert_eq!(img.stride(), 12);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            RenderedImage::new(0, 10),
            Err(RenderError::InvalidCanvas {
                width: 0,
                height: 10
            })
        );
        assert!(RenderedImage::new(10, 0).is_err());
    }

    #[test]
    fn test_oversized_rejected() {
        assert_eq!(
            RenderedImage::new(u32::MAX, u32::MAX),
            Err(RenderError::InvalidCanvas {
                width: u32::MAX,
                height: u32::MAX
            })
        );
        assert!(RenderedImage::new(u32::MAX, 1).is_err());
        assert!(RenderedImage::new(1, i32::MAX as u32 + 1).is_err());
    }

    #[test]
    fn test_row_mut_and_argb_words() {
        let mut img = RenderedImage::new(2, 2).unwrap();
        img.row_mut(1)[4..8].copy_from_slice(&[0x9E, 0xD9, 0xA3, 0xFF]);
        assert_eq!(img.pixel(1, 1), Rgba8::from_argb(0xFF9E_D9A3));
        let words = img.to_argb_words();
        assert_eq!(words, vec![0, 0, 0, 0xFF9E_D9A3]);
        assert_eq!(img.row(1)[4], 0x9E);
        assert_eq!(img.into_raw().len(), 16);
    }
}
