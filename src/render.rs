//! The year-progress rasterizer.
//!
//! One dot per day, colored by its relation to today, drawn through the
//! anti-aliased scanline pipeline. Wallpaper mode puts the grid on black
//! and adds the summary text underneath; dot-grid mode draws only the dots
//! onto a transparent canvas for a widget to frame.

use chrono::{DateTime, TimeZone};
use log::debug;

use crate::calendar::{compute_calendar_info, CalendarInfo};
use crate::color::Rgba8;
use crate::config::RenderConfig;
use crate::ellipse::Ellipse;
use crate::error::Result;
use crate::layout::{compute_layout, DayClass, GridLayout};
use crate::pixfmt_rgba::{PixelFormat, PixfmtRgba32};
use crate::rasterizer_scanline_aa::RasterizerScanlineAa;
use crate::renderer_base::RendererBase;
use crate::renderer_scanline::render_scanlines_aa_solid;
use crate::rendering_buffer::RenderedImage;
use crate::scanline_u::ScanlineU8;
use crate::summary::{YearSummary, REMAINING_LABEL};
use crate::text::{draw_text, Align, GlyphSource, TextStyle};

/// Wallpaper background.
pub const BACKGROUND_COLOR: Rgba8 = Rgba8::BLACK;
/// Days after today.
pub const FUTURE_COLOR: Rgba8 = Rgba8::from_argb(0xFF3A_3A3A);
/// The remaining-days number.
pub const NUMBER_COLOR: Rgba8 = Rgba8::WHITE;
/// Captions.
pub const LABEL_COLOR: Rgba8 = Rgba8::from_argb(0xFF88_8888);

/// Text sizes and positions, as fractions of the canvas.
pub const NUMBER_SIZE: f32 = 0.12;
pub const LABEL_SIZE: f32 = 0.04;
pub const PERCENT_SIZE: f32 = 0.08;
pub const BASELINE_Y: f32 = 0.80;
pub const TEXT_PADDING: f32 = 0.08;
pub const LINE_GAP: f32 = 0.05;

// ============================================================================
// Modes and palette
// ============================================================================

/// What to draw besides the dots.
#[derive(Clone, Copy)]
pub enum RenderMode<'a> {
    /// Black background, dots, and summary text set in the given face.
    Wallpaper(&'a dyn GlyphSource),
    /// Dots only, on a transparent canvas.
    DotGrid,
}

impl RenderMode<'_> {
    pub fn include_background_and_text(&self) -> bool {
        matches!(self, RenderMode::Wallpaper(_))
    }
}

impl std::fmt::Debug for RenderMode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Wallpaper(_) => f.write_str("Wallpaper"),
            RenderMode::DotGrid => f.write_str("DotGrid"),
        }
    }
}

/// Dot colors for each day class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPalette {
    pub past: Rgba8,
    pub today: Rgba8,
    pub future: Rgba8,
}

impl DayPalette {
    pub fn from_primary(primary: Rgba8) -> Self {
        Self {
            past: primary,
            today: primary.today_highlight(),
            future: FUTURE_COLOR,
        }
    }

    pub fn color(&self, class: DayClass) -> Rgba8 {
        match class {
            DayClass::Past => self.past,
            DayClass::Today => self.today,
            DayClass::Future => self.future,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render one image for `calendar` using a precomputed `layout`.
///
/// The canvas is `config.width × config.height`.
pub fn render(
    calendar: &CalendarInfo,
    layout: &GridLayout,
    config: &RenderConfig,
    mode: RenderMode<'_>,
) -> Result<RenderedImage> {
    config.validate()?;
    let mut img = RenderedImage::new(config.width, config.height)?;
    debug!(
        "render {:?} {}x{} year {} day {}/{}",
        mode,
        config.width,
        config.height,
        calendar.year(),
        calendar.current_day(),
        calendar.total_days()
    );

    {
        let mut rb = RendererBase::new(PixfmtRgba32::new(&mut img));
        if mode.include_background_and_text() {
            rb.clear(&BACKGROUND_COLOR);
        }

        draw_dots(&mut rb, calendar, layout, &DayPalette::from_primary(config.primary_color));

        if let RenderMode::Wallpaper(glyphs) = mode {
            let summary = YearSummary::from_calendar(calendar);
            draw_summary(&mut rb, glyphs, &summary, config);
        }
    }
    Ok(img)
}

/// Wallpaper for the instant `now`, in `now`'s time zone.
pub fn render_wallpaper<Tz: TimeZone>(
    now: &DateTime<Tz>,
    config: &RenderConfig,
    glyphs: &dyn GlyphSource,
) -> Result<RenderedImage> {
    let calendar = compute_calendar_info(now);
    let layout = compute_layout(
        calendar.total_days(),
        calendar.current_day(),
        config.width,
        config.height,
        config,
    )?;
    render(&calendar, &layout, config, RenderMode::Wallpaper(glyphs))
}

/// Dots only, for a given calendar position.
pub fn render_dot_grid(calendar: &CalendarInfo, config: &RenderConfig) -> Result<RenderedImage> {
    let layout = compute_layout(
        calendar.total_days(),
        calendar.current_day(),
        config.width,
        config.height,
        config,
    )?;
    render(calendar, &layout, config, RenderMode::DotGrid)
}

fn draw_dots<PF>(
    rb: &mut RendererBase<PF>,
    calendar: &CalendarInfo,
    layout: &GridLayout,
    palette: &DayPalette,
) where
    PF: PixelFormat<ColorType = Rgba8>,
{
    let clip = *rb.clip_box();
    let (left, top) = (clip.x1 as f64, clip.y1 as f64);
    let (right, bottom) = ((clip.x2 + 1) as f64, (clip.y2 + 1) as f64);

    let mut ras = RasterizerScanlineAa::new();
    ras.clip_box(left, top, right, bottom);
    let mut sl = ScanlineU8::new();
    let mut culled = 0u32;
    for cell in layout.cells(calendar.total_days(), calendar.current_day()) {
        let r = layout.radius_for(cell.class) as f64;
        let (cx, cy) = (cell.cx as f64, cell.cy as f64);
        if cx + r < left || cx - r > right || cy + r < top || cy - r > bottom {
            culled += 1;
            continue;
        }
        let mut dot = Ellipse::circle(cx, cy, r);
        ras.reset();
        ras.add_path(&mut dot, 0);
        render_scanlines_aa_solid(&mut ras, &mut sl, rb, &palette.color(cell.class));
    }
    if culled > 0 {
        debug!("{culled} dots fall outside the canvas");
    }
}

fn draw_summary<PF>(
    rb: &mut RendererBase<PF>,
    glyphs: &dyn GlyphSource,
    summary: &YearSummary,
    config: &RenderConfig,
) where
    PF: PixelFormat<ColorType = Rgba8>,
{
    let w = config.width as f32;
    let h = config.height as f32;
    let baseline = (h * BASELINE_Y) as f64;
    let second_line = (h * BASELINE_Y + w * LINE_GAP) as f64;
    let left = (w * TEXT_PADDING) as f64;
    let right = (w - w * TEXT_PADDING) as f64;

    let number = TextStyle::new((w * NUMBER_SIZE) as f64, NUMBER_COLOR).bold();
    let label = TextStyle::new((w * LABEL_SIZE) as f64, LABEL_COLOR);
    let percent = TextStyle::new((w * PERCENT_SIZE) as f64, config.primary_color).bold();

    draw_text(rb, glyphs, &summary.remaining_text(), left, baseline, Align::Left, &number);
    draw_text(rb, glyphs, REMAINING_LABEL, left, second_line, Align::Left, &label);
    draw_text(rb, glyphs, &summary.percent_text(), right, baseline, Align::Right, &percent);
    draw_text(rb, glyphs, &summary.lived_text(), right, second_line, Align::Right, &label);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::BlockGlyphs;
    use chrono::Utc;

    fn day_100() -> CalendarInfo {
        CalendarInfo::new(2023, 100).unwrap()
    }

    fn center(layout: &GridLayout, index: u32) -> (u32, u32) {
        let (x, y) = layout.cell_center(index);
        (x as u32, y as u32)
    }

    #[test]
    fn test_palette() {
        let primary = Rgba8::from_argb(0x809E_D9A3);
        let p = DayPalette::from_primary(primary);
        assert_eq!(p.color(DayClass::Past), primary);
        assert_eq!(p.color(DayClass::Today).to_argb(), 0xB39E_D9A3);
        assert_eq!(p.color(DayClass::Future).to_argb(), 0xFF3A_3A3A);
    }

    #[test]
    fn test_mode_flag() {
        assert!(RenderMode::Wallpaper(&BlockGlyphs).include_background_and_text());
        assert!(!RenderMode::DotGrid.include_background_and_text());
    }

    #[test]
    fn test_dot_grid_colors_and_transparency() {
        let config = RenderConfig::new(300, 400);
        let cal = day_100();
        let img = render_dot_grid(&cal, &config).unwrap();
        let layout = compute_layout(365, 100, 300, 400, &config).unwrap();

        let (x, y) = center(&layout, 0);
        assert_eq!(img.pixel(x, y), config.primary_color);
        let (x, y) = center(&layout, 99);
        assert_eq!(img.pixel(x, y), config.primary_color.today_highlight());
        let (x, y) = center(&layout, 200);
        assert_eq!(img.pixel(x, y), FUTURE_COLOR);
        // Corners are outside the grid and stay transparent.
        assert_eq!(img.pixel(0, 0), Rgba8::TRANSPARENT);
        assert_eq!(img.pixel(299, 399), Rgba8::TRANSPARENT);
    }

    #[test]
    fn test_wallpaper_background_is_black() {
        let config = RenderConfig::new(200, 400);
        let cal = day_100();
        let layout = compute_layout(365, 100, 200, 400, &config).unwrap();
        let img = render(&cal, &layout, &config, RenderMode::Wallpaper(&BlockGlyphs)).unwrap();
        assert_eq!(img.pixel(0, 0), BACKGROUND_COLOR);
        assert!(img.to_argb_words().iter().all(|w| w >> 24 == 0xFF));
    }

    #[test]
    fn test_wallpaper_text_regions() {
        let (w, h) = (500u32, 1000u32);
        let config = RenderConfig::new(w, h);
        let cal = day_100();
        let layout = compute_layout(365, 100, w, h, &config).unwrap();
        let img = render(&cal, &layout, &config, RenderMode::Wallpaper(&BlockGlyphs)).unwrap();

        // "265" at size 60 starts at x = 40, baseline 800; first box is
        // x 43..73, y 758..800 before emboldening.
        assert_eq!(img.pixel(55, 780), NUMBER_COLOR);
        // "27.1%" at size 40 is right-aligned to x = 460.
        assert_eq!(img.pixel(455, 790), config.primary_color);
        // Label line sits 25px lower in gray.
        assert_eq!(img.pixel(45, 820), LABEL_COLOR);
        assert_eq!(img.pixel(458, 820), LABEL_COLOR);
        // Between two dot rows, right of the number: background.
        assert_eq!(img.pixel(250, 760), BACKGROUND_COLOR);
    }

    #[test]
    fn test_render_wallpaper_from_timestamp() {
        let now = Utc.with_ymd_and_hms(2023, 4, 10, 9, 30, 0).unwrap();
        let config = RenderConfig::new(120, 240);
        let a = render_wallpaper(&now, &config, &BlockGlyphs).unwrap();
        let layout = compute_layout(365, 100, 120, 240, &config).unwrap();
        let b = render(&day_100(), &layout, &config, RenderMode::Wallpaper(&BlockGlyphs)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let cal = day_100();
        assert!(render_dot_grid(&cal, &RenderConfig::new(0, 10)).is_err());
        assert!(render_dot_grid(&cal, &RenderConfig::new(10, 10).with_columns(0)).is_err());
    }

    #[test]
    fn test_huge_scales_render_quickly() {
        let cal = day_100();
        for scale in [1.0e5f32, 1.0e6] {
            let config = RenderConfig::new(100, 100).with_grid_scale(scale);
            let start = std::time::Instant::now();
            let img = render_dot_grid(&cal, &config).unwrap();
            assert_eq!((img.width(), img.height()), (100, 100));
            assert!(
                start.elapsed() < std::time::Duration::from_secs(5),
                "grid_scale {scale} took {:?}",
                start.elapsed()
            );
        }
    }

    #[test]
    fn test_dots_larger_than_canvas_fill_it() {
        // A single column on a tiny canvas: every dot is centered near the
        // middle and tens of thousands of pixels wide, so the last (future)
        // dot paints the whole image.
        let cal = CalendarInfo::new(2023, 1).unwrap();
        let config = RenderConfig::new(40, 40)
            .with_columns(1)
            .with_dot_scale(1.0e6);
        let layout = compute_layout(365, 1, 40, 40, &config).unwrap();
        assert!(layout.dot_radius > 1.0e4);
        let img = render(&cal, &layout, &config, RenderMode::DotGrid).unwrap();
        for (x, y) in [(0, 0), (39, 0), (0, 39), (39, 39), (20, 20)] {
            assert_eq!(img.pixel(x, y), FUTURE_COLOR, "pixel ({x}, {y})");
        }
    }
}
