//! Unpacked scanline container.
//!
//! Stores one coverage byte per pixel with spans indexing into that array.
//! This is the scanline every dot and glyph is rendered through.

use crate::rasterizer_scanline_aa::Scanline;

/// A horizontal run within a scanline.
///
/// `cover_offset` indexes the first coverage byte of the run in
/// [`ScanlineU8::covers`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineSpan {
    pub x: i32,
    pub len: i32,
    pub cover_offset: usize,
}

/// Unpacked scanline with per-pixel u8 coverage values.
///
/// Usage protocol:
/// 1. `reset(min_x, max_x)` sizes the arrays for the rasterizer's x range
/// 2. the rasterizer calls `add_cell()` / `add_span()` with increasing x
/// 3. `finalize(y)` records the row
/// 4. renderers iterate `spans()` and slice `covers()`
pub struct ScanlineU8 {
    min_x: i32,
    last_x: i32,
    y_val: i32,
    covers: Vec<u8>,
    spans: Vec<ScanlineSpan>,
}

/// Sentinel for "no previous cell".
const NO_LAST_X: i32 = 0x7FFF_FFF0;

impl ScanlineU8 {
    pub fn new() -> Self {
        Self {
            min_x: 0,
            last_x: NO_LAST_X,
            y_val: 0,
            covers: Vec::new(),
            spans: Vec::new(),
        }
    }

    /// Prepare for scanlines spanning `min_x..=max_x`.
    pub fn reset(&mut self, min_x: i32, max_x: i32) {
        let max_len = (max_x - min_x + 2).max(0) as usize;
        if max_len > self.covers.len() {
            self.covers.resize(max_len, 0);
        }
        self.last_x = NO_LAST_X;
        self.min_x = min_x;
        self.spans.clear();
    }

    /// Active spans, ordered by x.
    pub fn spans(&self) -> &[ScanlineSpan] {
        &self.spans
    }

    /// Coverage bytes the spans index into.
    pub fn covers(&self) -> &[u8] {
        &self.covers
    }

    #[inline]
    fn extend_or_push(&mut self, x: i32, xi: usize, len: i32) {
        match self.spans.last_mut() {
            Some(span) if xi as i32 == self.last_x + 1 => span.len += len,
            _ => self.spans.push(ScanlineSpan {
                x,
                len,
                cover_offset: xi,
            }),
        }
        self.last_x = xi as i32 + len - 1;
    }
}

impl Scanline for ScanlineU8 {
    fn reset_spans(&mut self) {
        self.last_x = NO_LAST_X;
        self.spans.clear();
    }

    fn add_cell(&mut self, x: i32, cover: u32) {
        let xi = (x - self.min_x) as usize;
        self.covers[xi] = cover as u8;
        self.extend_or_push(x, xi, 1);
    }

    fn add_span(&mut self, x: i32, len: u32, cover: u32) {
        let xi = (x - self.min_x) as usize;
        self.covers[xi..xi + len as usize].fill(cover as u8);
        self.extend_or_push(x, xi, len as i32);
    }

    fn finalize(&mut self, y: i32) {
        self.y_val = y;
    }

    fn num_spans(&self) -> u32 {
        self.spans.len() as u32
    }

    fn y(&self) -> i32 {
        self.y_val
    }
}

impl Default for ScanlineU8 {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
