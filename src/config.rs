//! Render configuration.
//!
//! Preferences arrive as a loosely-typed key/value bag. They are resolved
//! once into [`WallpaperSettings`], then into a validated [`RenderConfig`]
//! that the layout and rasterizer consume. Nothing past this module ever
//! sees a missing key or a malformed value.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgba8;
use crate::error::{RenderError, Result};

/// Default primary color, a pale green.
pub const DEFAULT_COLOR_HEX: &str = "#FF9ED9A3";
pub const DEFAULT_COLUMNS: u32 = 12;

// ============================================================================
// RenderConfig
// ============================================================================

/// Fully resolved parameters for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub primary_color: Rgba8,
    pub dot_scale: f32,
    pub spacing_scale: f32,
    /// Shift of the grid as a fraction of half the canvas height, in [-1, 1].
    pub vertical_offset: f32,
    pub grid_scale: f32,
    pub columns: u32,
}

impl RenderConfig {
    /// A `width × height` config with every other parameter at its default.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            primary_color: Rgba8::from_argb(0xFF9E_D9A3),
            dot_scale: 1.0,
            spacing_scale: 1.0,
            vertical_offset: 0.0,
            grid_scale: 1.0,
            columns: DEFAULT_COLUMNS,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_primary_color(mut self, c: Rgba8) -> Self {
        self.primary_color = c;
        self
    }

    pub fn with_dot_scale(mut self, v: f32) -> Self {
        self.dot_scale = v;
        self
    }

    pub fn with_spacing_scale(mut self, v: f32) -> Self {
        self.spacing_scale = v;
        self
    }

    pub fn with_vertical_offset(mut self, v: f32) -> Self {
        self.vertical_offset = v;
        self
    }

    pub fn with_grid_scale(mut self, v: f32) -> Self {
        self.grid_scale = v;
        self
    }

    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = columns;
        self
    }

    /// Reject anything that would give a degenerate or NaN layout.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if self.columns < 1 {
            return Err(RenderError::InvalidConfiguration(
                "grid_columns must be at least 1".into(),
            ));
        }
        for (name, v) in [
            ("dot_scale", self.dot_scale),
            ("spacing_scale", self.spacing_scale),
            ("grid_scale", self.grid_scale),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(RenderError::InvalidConfiguration(format!(
                    "{name} must be a positive number, got {v}"
                )));
            }
        }
        if !self.vertical_offset.is_finite() || !(-1.0..=1.0).contains(&self.vertical_offset) {
            return Err(RenderError::InvalidConfiguration(format!(
                "vertical_offset must be within [-1, 1], got {}",
                self.vertical_offset
            )));
        }
        Ok(())
    }
}

// ============================================================================
// WallpaperTarget
// ============================================================================

/// Which wallpaper slot the image is meant for.
///
/// Only the wallpaper-setting collaborator reads this; the renderer does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WallpaperTarget {
    Home,
    Lock,
    #[default]
    Both,
}

impl WallpaperTarget {
    /// Parse a stored target name. Unknown names mean `Both`.
    pub fn parse(s: &str) -> Self {
        match s {
            "home" => WallpaperTarget::Home,
            "lock" => WallpaperTarget::Lock,
            _ => WallpaperTarget::Both,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WallpaperTarget::Home => "home",
            WallpaperTarget::Lock => "lock",
            WallpaperTarget::Both => "both",
        }
    }

    pub fn includes_home(&self) -> bool {
        matches!(self, WallpaperTarget::Home | WallpaperTarget::Both)
    }

    pub fn includes_lock(&self) -> bool {
        matches!(self, WallpaperTarget::Lock | WallpaperTarget::Both)
    }
}

impl From<String> for WallpaperTarget {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<WallpaperTarget> for String {
    fn from(t: WallpaperTarget) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for WallpaperTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ConfigProvider
// ============================================================================

/// Typed read access to a preference store.
///
/// Each lookup returns `None` when the key is absent or holds a value of
/// another type, so callers can fall back to defaults.
pub trait ConfigProvider {
    fn string(&self, key: &str) -> Option<String>;
    fn float(&self, key: &str) -> Option<f32>;
    fn int(&self, key: &str) -> Option<i64>;
}

/// In-memory preference store backed by JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceMap {
    values: BTreeMap<String, Value>,
}

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object such as `{"dot_scale": 1.2}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn typed<T>(&self, key: &str, kind: &str, f: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        let v = self.values.get(key)?;
        let out = f(v);
        if out.is_none() {
            warn!("preference {key:?} is not a {kind} ({v}); using default");
        }
        out
    }
}

impl ConfigProvider for PreferenceMap {
    fn string(&self, key: &str) -> Option<String> {
        self.typed(key, "string", |v| v.as_str().map(str::to_string))
    }

    fn float(&self, key: &str) -> Option<f32> {
        self.typed(key, "number", |v| v.as_f64().map(|f| f as f32))
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.typed(key, "integer", Value::as_i64)
    }
}

// ============================================================================
// WallpaperSettings
// ============================================================================

/// User-facing parameters, each with its documented default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallpaperSettings {
    pub target: WallpaperTarget,
    /// `#RRGGBB` or `#AARRGGBB`.
    pub color: String,
    pub dot_scale: f32,
    pub spacing_scale: f32,
    pub vertical_offset: f32,
    pub grid_scale: f32,
    pub grid_columns: i64,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            target: WallpaperTarget::Both,
            color: DEFAULT_COLOR_HEX.to_string(),
            dot_scale: 1.0,
            spacing_scale: 1.0,
            vertical_offset: 0.0,
            grid_scale: 1.0,
            grid_columns: DEFAULT_COLUMNS as i64,
        }
    }
}

impl WallpaperSettings {
    /// Read every parameter from `p`, defaulting whatever is missing.
    ///
    /// `wallpaper_target` and `primary_color_hex` are accepted as the
    /// persisted names of `target` and `color`.
    pub fn from_provider<P: ConfigProvider + ?Sized>(p: &P) -> Self {
        let d = Self::default();
        Self {
            target: p
                .string("target")
                .or_else(|| p.string("wallpaper_target"))
                .map(|s| WallpaperTarget::parse(&s))
                .unwrap_or(d.target),
            color: p
                .string("color")
                .or_else(|| p.string("primary_color_hex"))
                .unwrap_or(d.color),
            dot_scale: p.float("dot_scale").unwrap_or(d.dot_scale),
            spacing_scale: p.float("spacing_scale").unwrap_or(d.spacing_scale),
            vertical_offset: p.float("vertical_offset").unwrap_or(d.vertical_offset),
            grid_scale: p.float("grid_scale").unwrap_or(d.grid_scale),
            grid_columns: p.int("grid_columns").unwrap_or(d.grid_columns),
        }
    }

    /// Resolve into a validated config for a `width × height` canvas.
    pub fn render_config(&self, width: u32, height: u32) -> Result<RenderConfig> {
        let primary_color = Rgba8::parse_hex(&self.color)?;
        let columns = u32::try_from(self.grid_columns)
            .ok()
            .filter(|&c| c >= 1)
            .ok_or_else(|| {
                RenderError::InvalidConfiguration(format!(
                    "grid_columns must be at least 1, got {}",
                    self.grid_columns
                ))
            })?;

        let config = RenderConfig::new(width, height)
            .with_primary_color(primary_color)
            .with_dot_scale(self.dot_scale)
            .with_spacing_scale(self.spacing_scale)
            .with_vertical_offset(self.vertical_offset)
            .with_grid_scale(self.grid_scale)
            .with_columns(columns);
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = RenderConfig::new(1080, 2400);
        assert_eq!(c.primary_color, Rgba8::parse_hex(DEFAULT_COLOR_HEX).unwrap());
        assert_eq!(c.columns, 12);
        assert_eq!(c.dot_scale, 1.0);
        assert_eq!(c.vertical_offset, 0.0);
        assert!(c.validate().is_ok());

        let s = WallpaperSettings::default();
        assert_eq!(s.target, WallpaperTarget::Both);
        assert_eq!(s.render_config(1080, 2400).unwrap(), c);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = RenderConfig::new(100, 100);
        assert!(matches!(
            base.with_columns(0).validate(),
            Err(RenderError::InvalidConfiguration(_))
        ));
        assert!(base.with_dot_scale(-1.0).validate().is_err());
        assert!(base.with_spacing_scale(0.0).validate().is_err());
        assert!(base.with_grid_scale(f32::NAN).validate().is_err());
        assert!(base.with_vertical_offset(1.5).validate().is_err());
        assert!(base.with_vertical_offset(-1.0).validate().is_ok());
        assert_eq!(
            base.with_size(0, 10).validate(),
            Err(RenderError::InvalidCanvas {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_target_parse() {
        assert_eq!(WallpaperTarget::parse("home"), WallpaperTarget::Home);
        assert_eq!(WallpaperTarget::parse("lock"), WallpaperTarget::Lock);
        assert_eq!(WallpaperTarget::parse("both"), WallpaperTarget::Both);
        assert_eq!(WallpaperTarget::parse("garage"), WallpaperTarget::Both);
        assert!(WallpaperTarget::Both.includes_home());
        assert!(WallpaperTarget::Both.includes_lock());
        assert!(!WallpaperTarget::Home.includes_lock());
    }

    #[test]
    fn test_settings_from_json_with_missing_keys() {
        let s: WallpaperSettings =
            serde_json::from_str(r#"{"target": "lock", "grid_columns": 7, "dot_scale": 0.5}"#)
                .unwrap();
        assert_eq!(s.target, WallpaperTarget::Lock);
        assert_eq!(s.grid_columns, 7);
        assert_eq!(s.dot_scale, 0.5);
        assert_eq!(s.color, DEFAULT_COLOR_HEX);
        assert_eq!(s.grid_scale, 1.0);

        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""target":"lock""#), "{json}");
    }

    #[test]
    fn test_from_provider_reads_aliases() {
        let prefs = PreferenceMap::from_json(
            r##"{"wallpaper_target": "home", "primary_color_hex": "#FF112233",
                "spacing_scale": 1.25, "grid_columns": 10}"##,
        )
        .unwrap();
        let s = WallpaperSettings::from_provider(&prefs);
        assert_eq!(s.target, WallpaperTarget::Home);
        assert_eq!(s.color, "#FF112233");
        assert_eq!(s.spacing_scale, 1.25);
        assert_eq!(s.grid_columns, 10);
        assert_eq!(s.dot_scale, 1.0);
    }

    #[test]
    fn test_wrong_type_falls_back_to_default() {
        let mut prefs = PreferenceMap::new();
        prefs.insert("dot_scale", "big");
        prefs.insert("grid_columns", 2.5);
        let s = WallpaperSettings::from_provider(&prefs);
        assert_eq!(s.dot_scale, 1.0);
        assert_eq!(s.grid_columns, 12);
        assert_eq!(prefs.len(), 2);
    }

    #[test]
    fn test_render_config_errors() {
        let s = WallpaperSettings {
            color: "green".into(),
            ..Default::default()
        };
        assert!(matches!(
            s.render_config(10, 10),
            Err(RenderError::InvalidColorFormat(_))
        ));

        let s = WallpaperSettings {
            grid_columns: -3,
            ..Default::default()
        };
        assert!(matches!(
            s.render_config(10, 10),
            Err(RenderError::InvalidConfiguration(_))
        ));

        let s = WallpaperSettings {
            dot_scale: -0.5,
            ..Default::default()
        };
        assert!(s.render_config(10, 10).is_err());
    }

    #[test]
    fn test_six_digit_color_is_opaque() {
        let s = WallpaperSettings {
            color: "#9ED9A3".into(),
            ..Default::default()
        };
        let c = s.render_config(10, 10).unwrap();
        assert_eq!(c.primary_color.to_argb(), 0xFF9E_D9A3);
    }
}
