//! Anti-aliased cell rasterizer engine.
//!
//! Converts edges (line segments in 24.8 fixed-point coordinates) into
//! pixel cells carrying a winding `cover` and a signed `area`. The
//! scanline rasterizer turns accumulated cells into coverage values.

use crate::basics::{POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

const SUBPIXEL_SCALE: i32 = POLY_SUBPIXEL_SCALE as i32;
const SUBPIXEL_MASK: i32 = POLY_SUBPIXEL_MASK as i32;

/// Limit for dx magnitude before recursive subdivision in `line()`.
const DX_LIMIT: i64 = 16384 << POLY_SUBPIXEL_SHIFT;

/// A pixel cell storing accumulated coverage and area from edges.
///
/// - `cover`: net winding contribution (sum of dy across this cell)
/// - `area`: twice the signed area of edge fragments inside the cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAa {
    pub x: i32,
    pub y: i32,
    pub cover: i32,
    pub area: i32,
}

impl CellAa {
    const EMPTY: CellAa = CellAa {
        x: i32::MAX,
        y: i32::MAX,
        cover: 0,
        area: 0,
    };

    #[inline]
    fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }
}

impl Default for CellAa {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SortedY {
    start: u32,
    num: u32,
}

/// Edge-to-cell conversion engine.
///
/// Cells live in a flat `Vec`; after `sort_cells()` each scanline is a
/// contiguous slice of indices ordered by x.
pub struct RasterizerCellsAa {
    cells: Vec<CellAa>,
    sorted_cells: Vec<u32>,
    sorted_y: Vec<SortedY>,
    curr_cell: CellAa,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
    sorted: bool,
}

impl RasterizerCellsAa {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            sorted_cells: Vec::new(),
            sorted_y: Vec::new(),
            curr_cell: CellAa::EMPTY,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
            sorted: false,
        }
    }

    /// Discard all cells.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.sorted_cells.clear();
        self.sorted_y.clear();
        self.curr_cell = CellAa::EMPTY;
        self.min_x = i32::MAX;
        self.min_y = i32::MAX;
        self.max_x = i32::MIN;
        self.max_y = i32::MIN;
        self.sorted = false;
    }

    #[inline]
    pub fn min_x(&self) -> i32 {
        self.min_x
    }
    #[inline]
    pub fn min_y(&self) -> i32 {
        self.min_y
    }
    #[inline]
    pub fn max_x(&self) -> i32 {
        self.max_x
    }
    #[inline]
    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    #[inline]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Cell indices on scanline `y`, ordered by x. Only valid after `sort_cells()`.
    #[inline]
    pub fn scanline_cells(&self, y: i32) -> &[u32] {
        match self.sorted_y.get((y - self.min_y) as usize) {
            Some(sy) => &self.sorted_cells[sy.start as usize..(sy.start + sy.num) as usize],
            None => &[],
        }
    }

    #[inline]
    pub fn cell(&self, idx: u32) -> &CellAa {
        &self.cells[idx as usize]
    }

    #[inline]
    fn add_curr_cell(&mut self) {
        if self.curr_cell.area | self.curr_cell.cover != 0 {
            self.cells.push(self.curr_cell);
        }
    }

    #[inline]
    fn set_curr_cell(&mut self, x: i32, y: i32) {
        if !self.curr_cell.is_at(x, y) {
            self.add_curr_cell();
            self.curr_cell = CellAa {
                x,
                y,
                cover: 0,
                area: 0,
            };
        }
    }

    #[inline]
    fn extend_bounds(&mut self, ex: i32, ey: i32) {
        self.min_x = self.min_x.min(ex);
        self.max_x = self.max_x.max(ex);
        self.min_y = self.min_y.min(ey);
        self.max_y = self.max_y.max(ey);
    }

    /// Accumulate a segment that stays within scanline row `ey`.
    ///
    /// `x1`, `x2` are 24.8 fixed point; `y1`, `y2` are the fractional y
    /// within the row (0..=POLY_SUBPIXEL_SCALE).
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & SUBPIXEL_MASK;
        let fx2 = x2 & SUBPIXEL_MASK;

        if y1 == y2 {
            self.set_curr_cell(ex2, ey);
            return;
        }

        if ex1 == ex2 {
            let delta = y2 - y1;
            self.curr_cell.cover += delta;
            self.curr_cell.area += (fx1 + fx2) * delta;
            return;
        }

        // The segment crosses several cells of this row.
        let mut dx = x2 as i64 - x1 as i64;
        let (mut p, first, incr) = if dx < 0 {
            dx = -dx;
            (fx1 as i64 * (y2 - y1) as i64, 0, -1)
        } else {
            ((SUBPIXEL_SCALE - fx1) as i64 * (y2 - y1) as i64, SUBPIXEL_SCALE, 1)
        };

        let mut delta = (p / dx) as i32;
        let mut modulo = p % dx;
        if modulo < 0 {
            delta -= 1;
            modulo += dx;
        }

        self.curr_cell.cover += delta;
        self.curr_cell.area += (fx1 + first) * delta;

        let mut ex = ex1 + incr;
        self.set_curr_cell(ex, ey);
        let mut y = y1 + delta;

        if ex != ex2 {
            p = SUBPIXEL_SCALE as i64 * (y2 - y + delta) as i64;
            let mut lift = (p / dx) as i32;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            modulo -= dx;

            while ex != ex2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dx;
                    delta += 1;
                }
                self.curr_cell.cover += delta;
                self.curr_cell.area += SUBPIXEL_SCALE * delta;
                y += delta;
                ex += incr;
                self.set_curr_cell(ex, ey);
            }
        }
        delta = y2 - y;
        self.curr_cell.cover += delta;
        self.curr_cell.area += (fx2 + SUBPIXEL_SCALE - first) * delta;
    }

    /// Add a line segment in 24.8 fixed-point coordinates.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = x2 as i64 - x1 as i64;
        if dx >= DX_LIMIT || dx <= -DX_LIMIT {
            let cx = ((x1 as i64 + x2 as i64) >> 1) as i32;
            let cy = ((y1 as i64 + y2 as i64) >> 1) as i32;
            self.line(x1, y1, cx, cy);
            self.line(cx, cy, x2, y2);
            return;
        }

        let dy = y2 as i64 - y1 as i64;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let mut ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & SUBPIXEL_MASK;
        let fy2 = y2 & SUBPIXEL_MASK;

        self.extend_bounds(ex1, ey1);
        self.extend_bounds(ex2, ey2);
        self.set_curr_cell(ex1, ey1);

        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            return;
        }

        // Vertical edge: one cell per row, no hline walks.
        if dx == 0 {
            let two_fx = (x1 - (ex1 << POLY_SUBPIXEL_SHIFT)) << 1;
            let (first, incr) = if dy < 0 { (0, -1) } else { (SUBPIXEL_SCALE, 1) };

            let mut delta = first - fy1;
            self.curr_cell.cover += delta;
            self.curr_cell.area += two_fx * delta;

            ey1 += incr;
            self.set_curr_cell(ex1, ey1);

            delta = first + first - SUBPIXEL_SCALE;
            let area = two_fx * delta;
            while ey1 != ey2 {
                self.curr_cell.cover = delta;
                self.curr_cell.area = area;
                ey1 += incr;
                self.set_curr_cell(ex1, ey1);
            }
            delta = fy2 - SUBPIXEL_SCALE + first;
            self.curr_cell.cover += delta;
            self.curr_cell.area += two_fx * delta;
            return;
        }

        // General case: walk the rows the edge crosses.
        let (mut p, first, incr, dy_abs) = if dy < 0 {
            (fy1 as i64 * dx, 0, -1, -dy)
        } else {
            ((SUBPIXEL_SCALE - fy1) as i64 * dx, SUBPIXEL_SCALE, 1, dy)
        };

        let mut delta = (p / dy_abs) as i32;
        let mut modulo = p % dy_abs;
        if modulo < 0 {
            delta -= 1;
            modulo += dy_abs;
        }

        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);

        ey1 += incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);

        if ey1 != ey2 {
            p = SUBPIXEL_SCALE as i64 * dx;
            let mut lift = (p / dy_abs) as i32;
            let mut rem = p % dy_abs;
            if rem < 0 {
                lift -= 1;
                rem += dy_abs;
            }
            modulo -= dy_abs;

            while ey1 != ey2 {
                delta = lift;
                modulo += rem;
                if modulo >= 0 {
                    modulo -= dy_abs;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, SUBPIXEL_SCALE - first, x_to, first);
                x_from = x_to;

                ey1 += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, SUBPIXEL_SCALE - first, x2, fy2);
    }

    /// Sort accumulated cells by y, then x, for scanline access.
    pub fn sort_cells(&mut self) {
        if self.sorted {
            return;
        }

        self.add_curr_cell();
        self.curr_cell = CellAa::EMPTY;

        if self.cells.is_empty() {
            return;
        }

        let y_range = (self.max_y - self.min_y + 1) as usize;
        self.sorted_y.clear();
        self.sorted_y.resize(y_range, SortedY::default());
        self.sorted_cells.clear();
        self.sorted_cells.resize(self.cells.len(), 0);

        // Row histogram, then prefix sums for start offsets.
        for cell in &self.cells {
            self.sorted_y[(cell.y - self.min_y) as usize].start += 1;
        }
        let mut start = 0u32;
        for sy in &mut self.sorted_y {
            let count = sy.start;
            sy.start = start;
            start += count;
        }

        for (i, cell) in self.cells.iter().enumerate() {
            let sy = &mut self.sorted_y[(cell.y - self.min_y) as usize];
            self.sorted_cells[(sy.start + sy.num) as usize] = i as u32;
            sy.num += 1;
        }

        let cells = &self.cells;
        for sy in &self.sorted_y {
            let row = &mut self.sorted_cells[sy.start as usize..(sy.start + sy.num) as usize];
            row.sort_unstable_by_key(|&idx| cells[idx as usize].x);
        }

        self.sorted = true;
    }
}

impl Default for RasterizerCellsAa {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const S: i32 = SUBPIXEL_SCALE;

    fn square(r: &mut RasterizerCellsAa, x1: i32, y1: i32, x2: i32, y2: i32) {
        r.line(x1, y1, x2, y1);
        r.line(x2, y1, x2, y2);
        r.line(x2, y2, x1, y2);
        r.line(x1, y2, x1, y1);
    }

    #[test]
    fn test_new_is_empty() {
        let mut r = RasterizerCellsAa::new();
        assert_eq!(r.min_x(), i32::MAX);
        assert_eq!(r.max_y(), i32::MIN);
        r.sort_cells();
        assert_eq!(r.total_cells(), 0);
        assert!(!r.sorted());
    }

    #[test]
    fn test_square_bounds_and_rows() {
        let mut r = RasterizerCellsAa::new();
        square(&mut r, 2 * S, 3 * S, 6 * S, 7 * S);
        r.sort_cells();
        assert!(r.sorted());
        assert_eq!(r.min_x(), 2);
        assert_eq!(r.max_x(), 6);
        assert_eq!(r.min_y(), 3);
        assert_eq!(r.max_y(), 7);
        // Pixel-aligned vertical edges leave two cells per covered row.
        for y in 3..7 {
            assert_eq!(r.scanline_cells(y).len(), 2);
        }
        assert!(r.scanline_cells(7).is_empty());
    }

    #[test]
    fn test_cover_sums_to_zero_per_row() {
        let mut r = RasterizerCellsAa::new();
        r.line(S / 2, 0, 9 * S + 37, 5 * S + 11);
        r.line(9 * S + 37, 5 * S + 11, 3 * S, 8 * S);
        r.line(3 * S, 8 * S, S / 2, 0);
        r.sort_cells();
        for y in r.min_y()..=r.max_y() {
            let total: i32 = r.scanline_cells(y).iter().map(|&i| r.cell(i).cover).sum();
            assert_eq!(total, 0, "row {y} winding must close");
        }
    }

    #[test]
    fn test_cells_sorted_by_x() {
        let mut r = RasterizerCellsAa::new();
        square(&mut r, 10 * S + 40, 10 * S, 2 * S + 100, 14 * S);
        r.sort_cells();
        for y in r.min_y()..=r.max_y() {
            let xs: Vec<i32> = r.scanline_cells(y).iter().map(|&i| r.cell(i).x).collect();
            assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_reset_clears() {
        let mut r = RasterizerCellsAa::new();
        square(&mut r, 0, 0, 4 * S, 4 * S);
        r.reset();
        r.sort_cells();
        assert_eq!(r.total_cells(), 0);
        assert_eq!(r.min_y(), i32::MAX);
    }
}
