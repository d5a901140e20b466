//! Polygon scanline rasterizer with anti-aliasing.
//!
//! Accepts polygon contours (move_to/line_to/close), accumulates them into
//! coverage cells, and sweeps the result out one anti-aliased scanline at a
//! time. Coverage values are linear (0..=255), no gamma.
//!
//! With a `clip_box` set, segments are clipped before they become cells, so
//! geometry far outside the canvas costs no more than the canvas itself.

use crate::basics::{
    is_close, is_move_to, is_stop, is_vertex, poly_coord, FillingRule, VertexSource,
    POLY_SUBPIXEL_SHIFT,
};
use crate::rasterizer_cells_aa::RasterizerCellsAa;
use crate::rasterizer_sl_clip::RasterizerSlClipInt;

const AA_SHIFT: u32 = 8;
const AA_SCALE: u32 = 1 << AA_SHIFT;
const AA_MASK: u32 = AA_SCALE - 1;
const AA_SCALE2: u32 = AA_SCALE * 2;
const AA_MASK2: u32 = AA_SCALE2 - 1;

// ============================================================================
// Scanline trait
// ============================================================================

/// A container that `sweep_scanline` feeds coverage data into.
pub trait Scanline {
    /// Prepare for a new scanline, clearing all span data.
    fn reset_spans(&mut self);

    /// Add a single cell at `x` with coverage `cover`.
    fn add_cell(&mut self, x: i32, cover: u32);

    /// Add `len` pixels starting at `x`, all with coverage `cover`.
    fn add_span(&mut self, x: i32, len: u32, cover: u32);

    /// Finalize the scanline at row `y`.
    fn finalize(&mut self, y: i32);

    /// Number of spans in this scanline (0 means empty).
    fn num_spans(&self) -> u32;

    /// Row of this scanline.
    fn y(&self) -> i32;
}

// ============================================================================
// RasterizerScanlineAa
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    MoveTo,
    LineTo,
    Closed,
}

/// Polygon rasterizer with anti-aliased output.
///
/// Usage:
/// 1. Optionally set `filling_rule()` and `clip_box()`
/// 2. Define contours with `move_to_d()` / `line_to_d()` or `add_path()`
/// 3. Call `rewind_scanlines()` then repeatedly `sweep_scanline()`
pub struct RasterizerScanlineAa {
    outline: RasterizerCellsAa,
    clipper: RasterizerSlClipInt,
    filling_rule: FillingRule,
    start_x: i32,
    start_y: i32,
    status: Status,
    scan_y: i32,
}

impl RasterizerScanlineAa {
    pub fn new() -> Self {
        Self {
            outline: RasterizerCellsAa::new(),
            clipper: RasterizerSlClipInt::new(),
            filling_rule: FillingRule::NonZero,
            start_x: 0,
            start_y: 0,
            status: Status::Initial,
            scan_y: 0,
        }
    }

    /// Discard all polygon data.
    pub fn reset(&mut self) {
        self.outline.reset();
        self.status = Status::Initial;
    }

    pub fn filling_rule(&mut self, rule: FillingRule) {
        self.filling_rule = rule;
    }

    /// Clip all following geometry to this rectangle (pixel coordinates).
    pub fn clip_box(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.reset();
        self.clipper
            .clip_box(poly_coord(x1), poly_coord(y1), poly_coord(x2), poly_coord(y2));
    }

    pub fn reset_clipping(&mut self) {
        self.reset();
        self.clipper.reset_clipping();
    }

    /// Close the current contour back to its start point.
    pub fn close_polygon(&mut self) {
        if self.status == Status::LineTo {
            self.clipper
                .line_to(&mut self.outline, self.start_x, self.start_y);
            self.status = Status::Closed;
        }
    }

    /// Start a new contour at a floating-point position. Closes any open one.
    pub fn move_to_d(&mut self, x: f64, y: f64) {
        if self.outline.sorted() {
            self.reset();
        }
        self.close_polygon();
        self.start_x = poly_coord(x);
        self.start_y = poly_coord(y);
        self.clipper.move_to(self.start_x, self.start_y);
        self.status = Status::MoveTo;
    }

    /// Line to a floating-point position.
    pub fn line_to_d(&mut self, x: f64, y: f64) {
        if self.status == Status::Initial {
            self.move_to_d(x, y);
            return;
        }
        self.clipper
            .line_to(&mut self.outline, poly_coord(x), poly_coord(y));
        self.status = Status::LineTo;
    }

    /// Dispatch a vertex to move_to, line_to, or close based on its command.
    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        if is_move_to(cmd) {
            self.move_to_d(x, y);
        } else if is_vertex(cmd) {
            self.line_to_d(x, y);
        } else if is_close(cmd) {
            self.close_polygon();
        }
    }

    /// Add all vertices from a vertex source.
    pub fn add_path(&mut self, vs: &mut dyn VertexSource, path_id: u32) {
        let mut x = 0.0;
        let mut y = 0.0;

        vs.rewind(path_id);
        if self.outline.sorted() {
            self.reset();
        }
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            self.add_vertex(x, y, cmd);
        }
    }

    pub fn min_x(&self) -> i32 {
        self.outline.min_x()
    }
    pub fn min_y(&self) -> i32 {
        self.outline.min_y()
    }
    pub fn max_x(&self) -> i32 {
        self.outline.max_x()
    }
    pub fn max_y(&self) -> i32 {
        self.outline.max_y()
    }

    /// Sort cells and prepare for sweeping.
    /// Returns `false` if there is nothing to render.
    pub fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        if self.outline.total_cells() == 0 {
            return false;
        }
        self.scan_y = self.outline.min_y();
        true
    }

    /// Coverage (0..=255) from an accumulated area.
    #[inline]
    pub fn calculate_alpha(&self, area: i32) -> u32 {
        let mut cover = (area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT)).abs();
        if self.filling_rule == FillingRule::EvenOdd {
            cover &= AA_MASK2 as i32;
            if cover > AA_SCALE as i32 {
                cover = AA_SCALE2 as i32 - cover;
            }
        }
        cover.min(AA_MASK as i32) as u32
    }

    /// Extract the next non-empty scanline.
    ///
    /// Walks the sorted cells of the current row, accumulating winding, and
    /// emits partial cells and solid runs. Returns `false` when every row
    /// has been consumed.
    pub fn sweep_scanline<SL: Scanline>(&mut self, sl: &mut SL) -> bool {
        loop {
            if self.scan_y > self.outline.max_y() {
                return false;
            }
            sl.reset_spans();

            let cells = self.outline.scanline_cells(self.scan_y);
            let mut idx = 0;
            let mut cover: i32 = 0;

            while idx < cells.len() {
                let cur = self.outline.cell(cells[idx]);
                let x = cur.x;
                let mut area = cur.area;
                cover += cur.cover;
                idx += 1;

                // Merge every cell sharing this x.
                while idx < cells.len() {
                    let next = self.outline.cell(cells[idx]);
                    if next.x != x {
                        break;
                    }
                    area += next.area;
                    cover += next.cover;
                    idx += 1;
                }

                let mut span_x = x;
                if area != 0 {
                    let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                    if alpha != 0 {
                        sl.add_cell(x, alpha);
                    }
                    span_x = x + 1;
                }

                if let Some(&next_idx) = cells.get(idx) {
                    let next_x = self.outline.cell(next_idx).x;
                    if next_x > span_x {
                        let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                        if alpha != 0 {
                            sl.add_span(span_x, (next_x - span_x) as u32, alpha);
                        }
                    }
                }
            }

            if sl.num_spans() > 0 {
                break;
            }
            self.scan_y += 1;
        }

        sl.finalize(self.scan_y);
        self.scan_y += 1;
        true
    }
}

impl Default for RasterizerScanlineAa {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
