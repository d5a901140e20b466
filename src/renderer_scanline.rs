//! Scanline rendering driver.
//!
//! Ties the pipeline together: rasterizer → scanline → clipped renderer.

use crate::pixfmt_rgba::PixelFormat;
use crate::rasterizer_scanline_aa::{RasterizerScanlineAa, Scanline};
use crate::renderer_base::RendererBase;
use crate::scanline_u::ScanlineU8;

/// Render everything accumulated in `ras` as one solid color.
pub fn render_scanlines_aa_solid<PF: PixelFormat>(
    ras: &mut RasterizerScanlineAa,
    sl: &mut ScanlineU8,
    ren: &mut RendererBase<PF>,
    color: &PF::ColorType,
) {
    if !ras.rewind_scanlines() {
        return;
    }

    sl.reset(ras.min_x(), ras.max_x());
    while ras.sweep_scanline(sl) {
        let y = sl.y();
        let covers = sl.covers();
        for span in sl.spans() {
            let start = span.cover_offset;
            ren.blend_solid_hspan(
                span.x,
                y,
                span.len,
                color,
                &covers[start..start + span.len as usize],
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
