//! Home-screen widget snapshot.
//!
//! The widget shows the dot grid as an image and the summary numbers as
//! separate text views, so it renders in dot-grid mode and hands the
//! strings over alongside the picture.

use crate::calendar::CalendarInfo;
use crate::color::Rgba8;
use crate::config::RenderConfig;
use crate::error::Result;
use crate::render::render_dot_grid;
use crate::rendering_buffer::RenderedImage;
use crate::summary::YearSummary;

/// Edge length of the square widget image.
pub const WIDGET_SIZE: u32 = 1024;

/// Everything a widget needs for one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshot {
    pub image: RenderedImage,
    pub summary: YearSummary,
    /// `"265"`.
    pub days_remaining_text: String,
    /// `"27.1%"`.
    pub percent_text: String,
    /// Color of the percent text view.
    pub percent_color: Rgba8,
    /// `"99 days lived"`.
    pub days_lived_text: String,
}

impl WidgetSnapshot {
    /// Render the grid at [`WIDGET_SIZE`] whatever size `config` names;
    /// every other parameter is taken from `config`.
    pub fn new(calendar: &CalendarInfo, config: &RenderConfig) -> Result<Self> {
        let config = config.with_size(WIDGET_SIZE, WIDGET_SIZE);
        let image = render_dot_grid(calendar, &config)?;
        let summary = YearSummary::from_calendar(calendar);
        Ok(Self {
            image,
            days_remaining_text: summary.remaining_text(),
            percent_text: summary.percent_text(),
            percent_color: config.primary_color,
            days_lived_text: summary.lived_text(),
            summary,
        })
    }
}
