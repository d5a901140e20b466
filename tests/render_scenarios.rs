//! End-to-end scenarios through the public API.

use chrono::{TimeZone, Utc};
use yeargrid::render::{FUTURE_COLOR, LABEL_COLOR, NUMBER_COLOR};
use yeargrid::{
    compute_calendar_info, compute_layout, render, render_dot_grid, render_wallpaper,
    BlockGlyphs, CalendarInfo, DayClass, PreferenceMap, RenderConfig, RenderError, RenderMode,
    Rgba8, WallpaperSettings, WidgetSnapshot, YearSummary,
};

fn pixel_at(img: &yeargrid::RenderedImage, (x, y): (f32, f32)) -> Rgba8 {
    img.pixel(x as u32, y as u32)
}

#[test]
fn test_day_100_of_365() {
    let now = Utc.with_ymd_and_hms(2023, 4, 10, 8, 0, 0).unwrap();
    let cal = compute_calendar_info(&now);
    assert_eq!((cal.year(), cal.total_days(), cal.current_day()), (2023, 365, 100));

    let config = RenderConfig::new(1080, 2400);
    let layout = compute_layout(365, 100, 1080, 2400, &config).unwrap();
    assert_eq!(layout.rows, 31);
    assert_eq!(layout.today_radius, layout.dot_radius * 1.12);

    let classes: Vec<DayClass> = layout.cells(365, 100).map(|c| c.class).collect();
    assert_eq!(classes[98], DayClass::Past);
    assert_eq!(classes[99], DayClass::Today);
    assert_eq!(classes[100], DayClass::Future);
    assert_eq!(classes.iter().filter(|&&c| c == DayClass::Today).count(), 1);

    let s = YearSummary::from_calendar(&cal);
    assert_eq!((s.days_lived, s.days_remaining), (99, 265));
    assert_eq!(s.days_lived + s.days_remaining + 1, 365);
    assert_eq!(s.percent_text(), "27.1%");
}

#[test]
fn test_year_boundaries() {
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(compute_calendar_info(&first).current_day(), 1);
    let last = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
    let cal = compute_calendar_info(&last);
    assert_eq!((cal.total_days(), cal.current_day()), (366, 366));
    assert_eq!(YearSummary::from_calendar(&cal).days_remaining, 0);
}

#[test]
fn test_render_is_deterministic() {
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
    let config = RenderConfig::new(360, 800)
        .with_dot_scale(1.3)
        .with_grid_scale(0.9)
        .with_vertical_offset(-0.2);
    let a = render_wallpaper(&now, &config, &BlockGlyphs).unwrap();
    let b = render_wallpaper(&now, &config, &BlockGlyphs).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn test_dot_grid_day_colors() {
    let cal = CalendarInfo::new(2023, 100).unwrap();
    let primary = Rgba8::from_argb(0x80FF_0000);
    let config = RenderConfig::new(600, 600).with_primary_color(primary);
    let img = render_dot_grid(&cal, &config).unwrap();
    let layout = compute_layout(365, 100, 600, 600, &config).unwrap();

    // Translucent primary over a transparent canvas keeps its exact value.
    assert_eq!(pixel_at(&img, layout.cell_center(0)), primary);
    // Today's alpha is OR-ed with 0x33.
    assert_eq!(pixel_at(&img, layout.cell_center(99)).to_argb(), 0xB3FF_0000);
    assert_eq!(pixel_at(&img, layout.cell_center(364)), FUTURE_COLOR);
}

#[test]
fn test_wallpaper_has_text_and_grid() {
    let cal = CalendarInfo::new(2023, 100).unwrap();
    let config = RenderConfig::new(500, 1000);
    let layout = compute_layout(365, 100, 500, 1000, &config).unwrap();
    let img = render(&cal, &layout, &config, RenderMode::Wallpaper(&BlockGlyphs)).unwrap();

    assert_eq!(img.pixel(0, 0), Rgba8::BLACK);
    assert_eq!(pixel_at(&img, layout.cell_center(10)), config.primary_color);
    // Remaining-days number, left of the grid.
    assert_eq!(img.pixel(50, 790), NUMBER_COLOR);
    // "Days remaining" caption.
    assert_eq!(img.pixel(45, 822), LABEL_COLOR);

    // Grid mode draws the same dots without any of that.
    let grid = render(&cal, &layout, &config, RenderMode::DotGrid).unwrap();
    assert_eq!(grid.pixel(50, 790), Rgba8::TRANSPARENT);
    assert_eq!(pixel_at(&grid, layout.cell_center(10)), config.primary_color);
}

#[test]
fn test_settings_to_image() {
    let prefs = PreferenceMap::from_json(
        r##"{"primary_color_hex": "#FF2060A0", "grid_columns": 20, "dot_scale": 0.8}"##,
    )
    .unwrap();
    let config = WallpaperSettings::from_provider(&prefs)
        .render_config(400, 300)
        .unwrap();
    assert_eq!(config.columns, 20);

    let cal = CalendarInfo::new(2024, 200).unwrap();
    let img = render_dot_grid(&cal, &config).unwrap();
    assert_eq!((img.width(), img.height()), (400, 300));
    let layout = compute_layout(366, 200, 400, 300, &config).unwrap();
    assert_eq!(layout.rows, 19);
    assert_eq!(pixel_at(&img, layout.cell_center(0)).to_argb(), 0xFF20_60A0);
}

#[test]
fn test_invalid_inputs() {
    let bad_color = WallpaperSettings {
        color: "#12345".into(),
        ..Default::default()
    };
    assert!(matches!(
        bad_color.render_config(100, 100),
        Err(RenderError::InvalidColorFormat(_))
    ));

    let no_columns = WallpaperSettings {
        grid_columns: 0,
        ..Default::default()
    };
    assert!(matches!(
        no_columns.render_config(100, 100),
        Err(RenderError::InvalidConfiguration(_))
    ));

    let cal = CalendarInfo::new(2023, 1).unwrap();
    assert!(matches!(
        render_dot_grid(&cal, &RenderConfig::new(100, 0)),
        Err(RenderError::InvalidCanvas { .. })
    ));
    assert!(render_dot_grid(&cal, &RenderConfig::new(100, 100).with_spacing_scale(-1.0)).is_err());
    assert!(matches!(
        render_dot_grid(&cal, &RenderConfig::new(u32::MAX, u32::MAX)),
        Err(RenderError::InvalidCanvas { .. })
    ));
}

#[test]
fn test_widget_snapshot() {
    let cal = CalendarInfo::new(2023, 100).unwrap();
    let snap = WidgetSnapshot::new(&cal, &RenderConfig::new(1, 1)).unwrap();
    assert_eq!((snap.image.width(), snap.image.height()), (1024, 1024));
    assert_eq!(snap.days_remaining_text, "265");
    assert_eq!(snap.percent_text, "27.1%");
    assert_eq!(snap.days_lived_text, "99 days lived");
    assert_eq!(snap.image.to_argb_words().len(), 1024 * 1024);
}
