//! Layout engine.
//!
//! Places one cell per day of the year in row-major order on a fixed
//! column count, sized to fit 85% of the canvas width and 70% of its height
//! (before `grid_scale`). Geometry is computed in `f32`; the rasterizer
//! widens it to `f64`.

use log::debug;

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};

/// Share of the canvas width the unscaled grid may occupy.
pub const GRID_WIDTH_FRACTION: f32 = 0.85;
/// Share of the canvas height the unscaled grid may occupy.
pub const GRID_HEIGHT_FRACTION: f32 = 0.70;
/// Dot radius as a fraction of the base spacing.
pub const DOT_RADIUS_FRACTION: f32 = 0.35;
/// Today's dot is this much larger than the others.
pub const TODAY_RADIUS_FACTOR: f32 = 1.12;

// ============================================================================
// Classification
// ============================================================================

/// How a day relates to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayClass {
    Past,
    Today,
    Future,
}

impl DayClass {
    /// Classify the 0-based day `index` against the 1-based `current_day`.
    #[inline]
    pub fn classify(index: u32, current_day: u32) -> Self {
        let day = index + 1;
        if day < current_day {
            DayClass::Past
        } else if day == current_day {
            DayClass::Today
        } else {
            DayClass::Future
        }
    }
}

/// One day's position in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCell {
    /// 0-based day index.
    pub index: u32,
    pub class: DayClass,
    pub cx: f32,
    pub cy: f32,
}

// ============================================================================
// GridLayout
// ============================================================================

/// Grid geometry for one canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub rows: u32,
    pub columns: u32,
    pub spacing: f32,
    pub dot_radius: f32,
    pub today_radius: f32,
    /// Center of the first cell.
    pub offset_x: f32,
    pub offset_y: f32,
}

impl GridLayout {
    /// Center of the cell for 0-based day `index`.
    pub fn cell_center(&self, index: u32) -> (f32, f32) {
        let row = index / self.columns;
        let col = index % self.columns;
        (
            self.offset_x + col as f32 * self.spacing,
            self.offset_y + row as f32 * self.spacing,
        )
    }

    pub fn radius_for(&self, class: DayClass) -> f32 {
        match class {
            DayClass::Today => self.today_radius,
            DayClass::Past | DayClass::Future => self.dot_radius,
        }
    }

    /// Every day of the year, positioned and classified.
    pub fn cells(&self, total_days: u32, current_day: u32) -> impl Iterator<Item = DayCell> + '_ {
        (0..total_days).map(move |index| {
            let (cx, cy) = self.cell_center(index);
            DayCell {
                index,
                class: DayClass::classify(index, current_day),
                cx,
                cy,
            }
        })
    }
}

/// Compute the grid for `total_days` cells on a `width × height` canvas.
///
/// `config` is validated first, so a layout is never built from zero
/// columns or non-positive scales.
pub fn compute_layout(
    total_days: u32,
    current_day: u32,
    width: u32,
    height: u32,
    config: &RenderConfig,
) -> Result<GridLayout> {
    config.validate()?;
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidCanvas { width, height });
    }
    if total_days == 0 {
        return Err(RenderError::InvalidConfiguration(
            "a year needs at least one day".into(),
        ));
    }

    let columns = config.columns;
    let rows = total_days / columns + u32::from(total_days % columns != 0);
    let w = width as f32;
    let h = height as f32;

    let base_width = w * GRID_WIDTH_FRACTION * config.grid_scale;
    let base_height = h * GRID_HEIGHT_FRACTION * config.grid_scale;
    let base_spacing = (base_width / columns as f32).min(base_height / rows as f32);

    let spacing = base_spacing * config.spacing_scale;
    let dot_radius = base_spacing * DOT_RADIUS_FRACTION * config.dot_scale;
    let today_radius = dot_radius * TODAY_RADIUS_FACTOR;

    let grid_width = columns as f32 * spacing;
    let grid_height = rows as f32 * spacing;
    let offset_x = (w - grid_width) / 2.0 + spacing / 2.0;
    let offset_y = (h - grid_height) / 2.0 + spacing / 2.0 + config.vertical_offset * h / 2.0;

    let layout = GridLayout {
        rows,
        columns,
        spacing,
        dot_radius,
        today_radius,
        offset_x,
        offset_y,
    };
    debug!(
        "layout {width}x{height} day {current_day}/{total_days}: {rows}x{columns}, \
         spacing {spacing:.2}, radius {dot_radius:.2}, origin ({offset_x:.1}, {offset_y:.1})"
    );
    Ok(layout)
}

// ============================================================================
// Tests
// ============================================================================
