//! TrueType glyph source using `ttf-parser`.
//!
//! Loads a TTF/OTF face from raw bytes and turns glyph outlines into
//! flattened, screen-space paths (y down, origin on the baseline) scaled to
//! the requested pixel size. No hinting is applied.

use std::path::Path;

use crate::error::{RenderError, Result};
use crate::path_storage::PathStorage;
use crate::text::{Glyph, GlyphSource};

/// A parsed TrueType/OpenType face.
pub struct TrueTypeFont {
    /// Owned font data bytes.
    face_data: Vec<u8>,
    /// Face index within a collection; 0 for single fonts.
    face_index: u32,
}

impl TrueTypeFont {
    /// Create from raw TTF/OTF data, checking that the face parses.
    pub fn from_data(data: Vec<u8>, face_index: u32) -> Result<Self> {
        ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| RenderError::Font(format!("failed to parse font: {e}")))?;
        Ok(Self {
            face_data: data,
            face_index,
        })
    }

    /// Read and parse a font file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
        Self::from_data(data, 0)
    }

    // The bytes were validated in `from_data`, so this only fails if the
    // parser itself changes its mind.
    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.face_data, self.face_index).ok()
    }
}

fn scale(face: &ttf_parser::Face<'_>, size: f64) -> f64 {
    size / face.units_per_em() as f64
}

impl GlyphSource for TrueTypeFont {
    /// Characters without an outline (spaces) still yield their advance.
    fn glyph(&self, ch: char, size: f64) -> Option<Glyph> {
        let face = self.face()?;
        let glyph_id = face.glyph_index(ch)?;
        let scale = scale(&face, size);

        let advance = face
            .glyph_hor_advance(glyph_id)
            .map_or(0.0, |a| a as f64 * scale);

        let mut collector = OutlineCollector::new(scale);
        if face.outline_glyph(glyph_id, &mut collector).is_none() {
            collector.path.remove_all();
        }
        Some(Glyph {
            advance,
            outline: collector.path,
        })
    }

    fn kerning(&self, left: char, right: char, size: f64) -> f64 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let (Some(first), Some(second)) = (face.glyph_index(left), face.glyph_index(right)) else {
            return 0.0;
        };
        let Some(kern) = face.tables().kern else {
            return 0.0;
        };
        for subtable in kern.subtables {
            if subtable.horizontal && !subtable.has_cross_stream {
                if let Some(value) = subtable.glyphs_kerning(first, second) {
                    return value as f64 * scale(&face, size);
                }
            }
        }
        0.0
    }
}

// ============================================================================
// OutlineCollector
// ============================================================================

/// Feeds `ttf_parser` outline commands into a [`PathStorage`], scaling to
/// pixels and flipping y so that it grows downward.
struct OutlineCollector {
    path: PathStorage,
    scale: f64,
}

impl OutlineCollector {
    fn new(scale: f64) -> Self {
        Self {
            path: PathStorage::new(),
            scale,
        }
    }

    #[inline]
    fn sx(&self, v: f32) -> f64 {
        v as f64 * self.scale
    }

    #[inline]
    fn sy(&self, v: f32) -> f64 {
        -(v as f64) * self.scale
    }
}

impl ttf_parser::OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.sx(x), self.sy(y));
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.sx(x), self.sy(y));
        self.path.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.sx(x1), self.sy(y1), self.sx(x), self.sy(y));
        self.path.curve3(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.sx(x1), self.sy(y1));
        let (x2, y2) = (self.sx(x2), self.sy(y2));
        let (x, y) = (self.sx(x), self.sy(y));
        self.path.curve4(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.path.close_polygon();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{
        is_end_poly, is_move_to, VertexSource, PATH_CMD_LINE_TO, PATH_CMD_STOP,
    };

    #[test]
    fn test_collector_scales_and_flips() {
        let c = OutlineCollector::new(0.5);
        assert!((c.sx(10.0) - 5.0).abs() < 1e-12);
        assert!((c.sy(10.0) + 5.0).abs() < 1e-12);
        assert!((c.sy(-4.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_collector_builds_closed_flat_path() {
        let mut c = OutlineCollector::new(1.0);
        ttf_parser::OutlineBuilder::move_to(&mut c, 0.0, 0.0);
        ttf_parser::OutlineBuilder::line_to(&mut c, 100.0, 0.0);
        ttf_parser::OutlineBuilder::quad_to(&mut c, 100.0, 100.0, 50.0, 100.0);
        ttf_parser::OutlineBuilder::curve_to(&mut c, 30.0, 100.0, 0.0, 80.0, 0.0, 50.0);
        ttf_parser::OutlineBuilder::close(&mut c);

        let mut path = c.path;
        let (mut x, mut y) = (0.0, 0.0);
        path.rewind(0);
        assert!(is_move_to(path.vertex(&mut x, &mut y)));
        assert_eq!(path.vertex(&mut x, &mut y), PATH_CMD_LINE_TO);
        assert_eq!((x, y), (100.0, 0.0));

        let mut last = (0.0, 0.0);
        let mut closed = false;
        loop {
            let cmd = path.vertex(&mut x, &mut y);
            if cmd == PATH_CMD_STOP {
                break;
            }
            if is_end_poly(cmd) {
                closed = true;
            } else {
                assert_eq!(cmd, PATH_CMD_LINE_TO);
                last = (x, y);
            }
        }
        assert!(closed);
        // Font y = 50 lands at screen y = -50.
        assert!((last.0 - 0.0).abs() < 1e-9 && (last.1 + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_data_rejects_garbage() {
        let err = TrueTypeFont::from_data(vec![0u8; 16], 0).err();
        assert!(matches!(err, Some(RenderError::Font(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let err = TrueTypeFont::from_file("/nonexistent/face.ttf").err();
        assert!(matches!(err, Some(RenderError::Font(_))));
    }
}
