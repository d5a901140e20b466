//! Text drawing over glyph outlines.
//!
//! A [`GlyphSource`] supplies scaled, flattened outlines; this module lays
//! them out along a baseline, optionally emboldens them, and rasterizes a
//! whole string in one pass so overlapping glyphs never double-blend.
//!
//! Coordinates are screen space: x to the right, y down, glyph origin on
//! the baseline at the pen position.

use log::trace;

use crate::basics::FillingRule;
use crate::color::Rgba8;
use crate::path_storage::PathStorage;
use crate::pixfmt_rgba::PixelFormat;
use crate::rasterizer_scanline_aa::RasterizerScanlineAa;
use crate::renderer_base::RendererBase;
use crate::renderer_scanline::render_scanlines_aa_solid;
use crate::scanline_u::ScanlineU8;

// ============================================================================
// Glyphs
// ============================================================================

/// One scaled glyph.
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    /// Pen advance in pixels.
    pub advance: f64,
    /// Outline relative to the pen position, y down. Empty for blanks.
    pub outline: PathStorage,
}

/// Anything that can produce glyph outlines at a pixel size.
pub trait GlyphSource {
    /// Glyph for `ch` at an em size of `size` pixels, or `None` if the
    /// character has no mapping.
    fn glyph(&self, ch: char, size: f64) -> Option<Glyph>;

    /// Horizontal kerning between two characters at `size`, in pixels.
    fn kerning(&self, _left: char, _right: char, _size: f64) -> f64 {
        0.0
    }
}

/// A face made of solid boxes.
///
/// Every printable character is a rectangle of cap height; spaces are
/// blank. Metrics are exact fractions of the size, which makes text
/// placement predictable without a font file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockGlyphs;

impl BlockGlyphs {
    pub const ADVANCE: f64 = 0.6;
    pub const SPACE_ADVANCE: f64 = 0.3;
    pub const INK_LEFT: f64 = 0.05;
    pub const INK_RIGHT: f64 = 0.55;
    pub const CAP_HEIGHT: f64 = 0.7;
}

impl GlyphSource for BlockGlyphs {
    fn glyph(&self, ch: char, size: f64) -> Option<Glyph> {
        if ch.is_control() {
            return None;
        }
        let mut outline = PathStorage::new();
        if ch.is_whitespace() {
            return Some(Glyph {
                advance: size * Self::SPACE_ADVANCE,
                outline,
            });
        }
        let (x1, x2) = (size * Self::INK_LEFT, size * Self::INK_RIGHT);
        let top = -size * Self::CAP_HEIGHT;
        outline.move_to(x1, top);
        outline.line_to(x2, top);
        outline.line_to(x2, 0.0);
        outline.line_to(x1, 0.0);
        outline.close_polygon();
        Some(Glyph {
            advance: size * Self::ADVANCE,
            outline,
        })
    }
}

// ============================================================================
// Styles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is where the first glyph's pen starts.
    Left,
    /// `x` is where the last glyph's advance ends.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Em size in pixels.
    pub size: f64,
    pub color: Rgba8,
    pub bold: bool,
}

impl TextStyle {
    pub fn new(size: f64, color: Rgba8) -> Self {
        Self {
            size,
            color,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

// ============================================================================
// Fake bold
// ============================================================================

const BOLD_SIZE_SMALL: f64 = 9.0;
const BOLD_SIZE_LARGE: f64 = 36.0;
const BOLD_SCALE_SMALL: f64 = 1.0 / 24.0;
const BOLD_SCALE_LARGE: f64 = 1.0 / 32.0;

/// Stroke width added around glyphs drawn bold at `size`.
///
/// `size / 24` up to 9px, `size / 32` from 36px, interpolated in between.
pub fn fake_bold_width(size: f64) -> f64 {
    let scale = if size <= BOLD_SIZE_SMALL {
        BOLD_SCALE_SMALL
    } else if size >= BOLD_SIZE_LARGE {
        BOLD_SCALE_LARGE
    } else {
        let t = (size - BOLD_SIZE_SMALL) / (BOLD_SIZE_LARGE - BOLD_SIZE_SMALL);
        BOLD_SCALE_SMALL + (BOLD_SCALE_LARGE - BOLD_SCALE_SMALL) * t
    };
    size * scale
}

fn signed_area(pts: &[(f64, f64)]) -> f64 {
    let mut a = 0.0;
    for (i, &(x0, y0)) in pts.iter().enumerate() {
        let (x1, y1) = pts[(i + 1) % pts.len()];
        a += x0 * y1 - x1 * y0;
    }
    a * 0.5
}

/// Drop repeated points, including a closing point equal to the first.
fn dedup_contour(c: &[(f64, f64)]) -> Vec<(f64, f64)> {
    const EPS: f64 = 1e-9;
    let same = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS;
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(c.len());
    for &p in c {
        if out.last().map_or(true, |&q| !same(p, q)) {
            out.push(p);
        }
    }
    while out.len() > 1 && same(out[0], out[out.len() - 1]) {
        out.pop();
    }
    out
}

/// Push every contour of `path` outward by `amount` pixels.
///
/// Outward is decided once per glyph from the orientation of its largest
/// contour, so counters (holes) shrink while the ink grows.
pub fn embolden(path: &mut PathStorage, amount: f64) {
    if amount <= 0.0 {
        return;
    }
    let contours: Vec<Vec<(f64, f64)>> = path
        .contours()
        .iter()
        .map(|c| dedup_contour(c))
        .filter(|c| c.len() >= 3)
        .collect();
    let outer = contours
        .iter()
        .map(|c| signed_area(c))
        .fold(0.0f64, |best, a| if a.abs() > best.abs() { a } else { best });
    if outer == 0.0 {
        return;
    }
    let sign = outer.signum();

    let shifted: Vec<Vec<(f64, f64)>> = contours
        .iter()
        .map(|c| offset_contour(c, amount, sign))
        .collect();
    path.set_contours(&shifted);
}

fn offset_contour(c: &[(f64, f64)], amount: f64, sign: f64) -> Vec<(f64, f64)> {
    let n = c.len();
    // Outward unit normal of the edge leaving point i.
    let normal = |i: usize| {
        let (x0, y0) = c[i];
        let (x1, y1) = c[(i + 1) % n];
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len = (dx * dx + dy * dy).sqrt();
        (dy / len * sign, -dx / len * sign)
    };

    (0..n)
        .map(|i| {
            let n_in = normal((i + n - 1) % n);
            let n_out = normal(i);
            let d = 1.0 + n_in.0 * n_out.0 + n_in.1 * n_out.1;
            let (mx, my) = if d > 0.0625 {
                ((n_in.0 + n_out.0) / d, (n_in.1 + n_out.1) / d)
            } else {
                // Near-reversal spike: move along the outgoing edge normal only.
                n_out
            };
            (c[i].0 + mx * amount, c[i].1 + my * amount)
        })
        .collect()
}

// ============================================================================
// Layout and drawing
// ============================================================================

/// Advance width of `text` at `size`, kerning included.
///
/// Bold text measures the same as regular text.
pub fn measure_text(glyphs: &dyn GlyphSource, text: &str, size: f64) -> f64 {
    let mut width = 0.0;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(g) = glyphs.glyph(ch, size) {
            if let Some(p) = prev {
                width += glyphs.kerning(p, ch, size);
            }
            width += g.advance;
            prev = Some(ch);
        }
    }
    width
}

/// Draw `text` with its baseline at `baseline`.
///
/// Returns the x where the first glyph's pen started.
pub fn draw_text<PF>(
    ren: &mut RendererBase<PF>,
    glyphs: &dyn GlyphSource,
    text: &str,
    x: f64,
    baseline: f64,
    align: Align,
    style: &TextStyle,
) -> f64
where
    PF: PixelFormat<ColorType = Rgba8>,
{
    let start_x = match align {
        Align::Left => x,
        Align::Right => x - measure_text(glyphs, text, style.size),
    };
    let bold = if style.bold {
        fake_bold_width(style.size) * 0.5
    } else {
        0.0
    };

    let clip = *ren.clip_box();
    let mut ras = RasterizerScanlineAa::new();
    ras.filling_rule(FillingRule::NonZero);
    ras.clip_box(
        clip.x1 as f64,
        clip.y1 as f64,
        (clip.x2 + 1) as f64,
        (clip.y2 + 1) as f64,
    );
    let mut pen = start_x;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        let Some(mut g) = glyphs.glyph(ch, style.size) else {
            trace!("no glyph for {ch:?}, skipped");
            continue;
        };
        if let Some(p) = prev {
            pen += glyphs.kerning(p, ch, style.size);
        }
        if g.outline.total_vertices() > 0 {
            embolden(&mut g.outline, bold);
            g.outline.translate(pen, baseline);
            ras.add_path(&mut g.outline, 0);
        }
        pen += g.advance;
        prev = Some(ch);
    }
    trace!(
        "text {text:?} size {:.1} at ({start_x:.1}, {baseline:.1}) width {:.1}",
        style.size,
        pen - start_x
    );

    let mut sl = ScanlineU8::new();
    render_scanlines_aa_solid(&mut ras, &mut sl, ren, &style.color);
    start_x
}

// ============================================================================
// Tests
// ============================================================================
