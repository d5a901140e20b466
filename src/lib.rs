//! # yeargrid
//!
//! Year-progress dot grids: one anti-aliased dot per day of the year,
//! colored by whether the day is past, today, or still to come, rendered
//! into an RGBA pixel buffer ready for a wallpaper or a home-screen widget.
//!
//! Rendering is a pure function of a timestamp, a [`RenderConfig`] and a
//! canvas size. There is no global state and nothing is cached, so calls
//! may run concurrently on independent inputs.
//!
//! ## Architecture
//!
//! Three stages compose in order:
//!
//! 1. **Calendar math** ([`calendar`]) finds the year, its length and
//!    today's ordinal
//! 2. **Layout** ([`layout`]) sizes and centers a row-major grid
//! 3. **Rasterizer** ([`render`]) draws the dots, plus summary text in
//!    wallpaper mode
//!
//! The rasterizer sits on a compact scanline pipeline: a vertex source
//! (circle or glyph outline) feeds the cell rasterizer, whose coverage
//! scanlines are blended through a clipping renderer into the image.
//!
//! ```no_run
//! use yeargrid::{compute_calendar_info_local, render_dot_grid, WallpaperSettings};
//!
//! let config = WallpaperSettings::default().render_config(1080, 2400)?;
//! let image = render_dot_grid(&compute_calendar_info_local(), &config)?;
//! assert_eq!(image.width(), 1080);
//! # Ok::<(), yeargrid::RenderError>(())
//! ```

// Phase 1: Foundation types
pub mod basics;
pub mod color;
pub mod error;

// Phase 2: Geometry
pub mod ellipse;
pub mod path_storage;

// Phase 3: Scanline rasterizer
pub mod rasterizer_cells_aa;
pub mod rasterizer_scanline_aa;
pub mod rasterizer_sl_clip;
pub mod scanline_u;

// Phase 4: Pixel formats & renderers
pub mod pixfmt_rgba;
pub mod renderer_base;
pub mod renderer_scanline;
pub mod rendering_buffer;

// Phase 5: Text
#[cfg(feature = "font")]
pub mod font_engine;
pub mod text;

// Phase 6: Year grid
pub mod calendar;
pub mod config;
pub mod layout;
pub mod render;
pub mod summary;
pub mod widget;

pub use calendar::{
    compute_calendar_info, compute_calendar_info_local, days_in_year, is_leap_year, CalendarInfo,
};
pub use color::Rgba8;
pub use config::{ConfigProvider, PreferenceMap, RenderConfig, WallpaperSettings, WallpaperTarget};
pub use error::{RenderError, Result};
#[cfg(feature = "font")]
pub use font_engine::TrueTypeFont;
pub use layout::{compute_layout, DayCell, DayClass, GridLayout};
pub use render::{render, render_dot_grid, render_wallpaper, RenderMode};
pub use rendering_buffer::RenderedImage;
pub use summary::YearSummary;
pub use text::{BlockGlyphs, GlyphSource};
pub use widget::WidgetSnapshot;
