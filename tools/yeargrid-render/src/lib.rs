// Support code for the yeargrid-render command-line tool.
//
// Settings and timestamp resolution, PNG output, and pixel comparison of
// rendered images.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use image::{Rgba, RgbaImage};
use log::info;
use yeargrid::{PreferenceMap, RenderedImage, WallpaperSettings};

// ============================================================================
// Inputs
// ============================================================================

/// Load settings from a JSON preferences file, or the defaults without one.
///
/// The file is read as a preference bag, so both the documented keys and
/// their persisted aliases (`wallpaper_target`, `primary_color_hex`) work.
pub fn load_settings(path: Option<&Path>) -> Result<WallpaperSettings> {
    let Some(path) = path else {
        return Ok(WallpaperSettings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings {}", path.display()))?;
    let prefs = PreferenceMap::from_json(&text)
        .with_context(|| format!("parsing settings {}", path.display()))?;
    Ok(WallpaperSettings::from_provider(&prefs))
}

/// The instant to render for: now, or local `date` at `time` (midnight by
/// default).
pub fn resolve_timestamp(
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<DateTime<Local>> {
    let Some(date) = date else {
        if time.is_some() {
            bail!("--time needs --date");
        }
        return Ok(Local::now());
    };
    let time = time.unwrap_or(NaiveTime::MIN);
    match Local.from_local_datetime(&date.and_time(time)).earliest() {
        Some(t) => Ok(t),
        None => bail!("{date} {time} does not exist in the local time zone"),
    }
}

// ============================================================================
// Output
// ============================================================================

pub fn to_rgba_image(img: RenderedImage) -> Result<RgbaImage> {
    let (w, h) = (img.width(), img.height());
    RgbaImage::from_raw(w, h, img.into_raw()).context("pixel buffer does not match its size")
}

pub fn save_png(path: &Path, img: RenderedImage) -> Result<()> {
    let (w, h) = (img.width(), img.height());
    to_rgba_image(img)?
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {} ({w}x{h})", path.display());
    Ok(())
}

pub fn load_png(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(img.to_rgba8())
}

// ============================================================================
// Comparison
// ============================================================================

/// Information about a single pixel difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    pub x: u32,
    pub y: u32,
    pub pixel_a: [u8; 4],
    pub pixel_b: [u8; 4],
}

/// Result of comparing two images.
#[derive(Debug, Clone)]
pub struct CompareResult {
    pub total_pixels: u64,
    /// Pixels that differ by at least 1 in any channel.
    pub different_pixels: u64,
    /// Largest absolute difference of any single channel.
    pub max_channel_diff: u8,
    /// Mean absolute difference over the differing channels.
    pub mean_channel_diff: f64,
    /// First difference in row-major order.
    pub first_diff: Option<DiffInfo>,
}

impl CompareResult {
    pub fn identical(&self) -> bool {
        self.different_pixels == 0
    }
}

impl std::fmt::Display for CompareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.identical() {
            return write!(f, "IDENTICAL: {} pixels match", self.total_pixels);
        }
        write!(
            f,
            "DIFFERENT: {}/{} pixels differ ({:.2}%), max_diff={}, mean_diff={:.4}",
            self.different_pixels,
            self.total_pixels,
            self.different_pixels as f64 / self.total_pixels as f64 * 100.0,
            self.max_channel_diff,
            self.mean_channel_diff,
        )?;
        if let Some(d) = &self.first_diff {
            write!(
                f,
                "\n  first diff at ({}, {}): A={:?} B={:?}",
                d.x, d.y, d.pixel_a, d.pixel_b
            )?;
        }
        Ok(())
    }
}

fn check_same_size(a: &RgbaImage, b: &RgbaImage) -> Result<()> {
    if a.dimensions() != b.dimensions() {
        bail!(
            "size mismatch: {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        );
    }
    Ok(())
}

/// Compare two same-sized images channel by channel.
pub fn compare_images(a: &RgbaImage, b: &RgbaImage) -> Result<CompareResult> {
    check_same_size(a, b)?;

    let mut different_pixels = 0u64;
    let mut max_channel_diff = 0u8;
    let mut diff_sum = 0u64;
    let mut diff_channels = 0u64;
    let mut first_diff = None;

    for ((x, y, pa), pb) in a.enumerate_pixels().zip(b.pixels()) {
        let mut differs = false;
        for (ca, cb) in pa.0.iter().zip(pb.0) {
            let d = ca.abs_diff(cb);
            if d > 0 {
                differs = true;
                max_channel_diff = max_channel_diff.max(d);
                diff_sum += d as u64;
                diff_channels += 1;
            }
        }
        if differs {
            different_pixels += 1;
            first_diff.get_or_insert(DiffInfo {
                x,
                y,
                pixel_a: pa.0,
                pixel_b: pb.0,
            });
        }
    }

    Ok(CompareResult {
        total_pixels: a.width() as u64 * a.height() as u64,
        different_pixels,
        max_channel_diff,
        mean_channel_diff: if diff_channels > 0 {
            diff_sum as f64 / diff_channels as f64
        } else {
            0.0
        },
        first_diff,
    })
}

/// Visual diff: matching pixels dark gray, differing pixels red scaled by
/// the largest color-channel difference (amplified 10x).
pub fn diff_image(a: &RgbaImage, b: &RgbaImage) -> Result<RgbaImage> {
    check_same_size(a, b)?;
    Ok(RgbaImage::from_fn(a.width(), a.height(), |x, y| {
        let (pa, pb) = (a.get_pixel(x, y), b.get_pixel(x, y));
        let max_diff = (0..3).map(|c| pa.0[c].abs_diff(pb.0[c])).max().unwrap_or(0);
        if max_diff == 0 {
            Rgba([40, 40, 40, 255])
        } else {
            Rgba([(max_diff as u16 * 10).min(255) as u8, 0, 0, 255])
        }
    }))
}

// ============================================================================
// Tests
// ============================================================================
