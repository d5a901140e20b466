//! Foundation types, constants, and path command utilities.
//!
//! Everything the rasterizer pipeline shares: rounding helpers, the
//! coverage and subpixel constants, path command encoding, and the
//! `VertexSource` trait that dots and glyph outlines are fed through.

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Round to the nearest integer, half away from zero.
#[inline]
pub fn iround(v: f64) -> i32 {
    if v < 0.0 {
        (v - 0.5) as i32
    } else {
        (v + 0.5) as i32
    }
}

/// Round to the nearest unsigned integer, half up.
#[inline]
pub fn uround(v: f64) -> u32 {
    (v + 0.5) as u32
}

/// Floor toward negative infinity.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    let i = v as i32;
    i - (i as f64 > v) as i32
}

// ============================================================================
// Cover (anti-aliasing) constants
// ============================================================================

/// The type used for anti-aliasing coverage values.
pub type CoverType = u8;

pub const COVER_SHIFT: u32 = 8;
pub const COVER_SIZE: u32 = 1 << COVER_SHIFT;
pub const COVER_MASK: u32 = COVER_SIZE - 1;
pub const COVER_NONE: CoverType = 0;
pub const COVER_FULL: CoverType = COVER_MASK as CoverType;

// ============================================================================
// Subpixel constants
// ============================================================================

/// Subpixel accuracy of rasterized coordinates (24.8 fixed point).
pub const POLY_SUBPIXEL_SHIFT: u32 = 8;
pub const POLY_SUBPIXEL_SCALE: u32 = 1 << POLY_SUBPIXEL_SHIFT;
pub const POLY_SUBPIXEL_MASK: u32 = POLY_SUBPIXEL_SCALE - 1;

/// Convert a floating-point coordinate to 24.8 fixed point.
#[inline]
pub fn poly_coord(v: f64) -> i32 {
    iround(v * POLY_SUBPIXEL_SCALE as f64)
}

// ============================================================================
// Filling rule
// ============================================================================

/// Filling rule for polygon rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillingRule {
    NonZero,
    EvenOdd,
}

pub const PI: f64 = std::f64::consts::PI;

// ============================================================================
// Path commands
// ============================================================================

pub const PATH_CMD_STOP: u32 = 0;
pub const PATH_CMD_MOVE_TO: u32 = 1;
pub const PATH_CMD_LINE_TO: u32 = 2;
pub const PATH_CMD_CURVE3: u32 = 3;
pub const PATH_CMD_CURVE4: u32 = 4;
pub const PATH_CMD_END_POLY: u32 = 0x0F;
pub const PATH_CMD_MASK: u32 = 0x0F;

pub const PATH_FLAGS_NONE: u32 = 0;
pub const PATH_FLAGS_CCW: u32 = 0x10;
pub const PATH_FLAGS_CW: u32 = 0x20;
pub const PATH_FLAGS_CLOSE: u32 = 0x40;

#[inline]
pub fn is_vertex(c: u32) -> bool {
    (PATH_CMD_MOVE_TO..PATH_CMD_END_POLY).contains(&c)
}

#[inline]
pub fn is_stop(c: u32) -> bool {
    c == PATH_CMD_STOP
}

#[inline]
pub fn is_move_to(c: u32) -> bool {
    c == PATH_CMD_MOVE_TO
}

#[inline]
pub fn is_curve3(c: u32) -> bool {
    c == PATH_CMD_CURVE3
}

#[inline]
pub fn is_curve4(c: u32) -> bool {
    c == PATH_CMD_CURVE4
}

#[inline]
pub fn is_end_poly(c: u32) -> bool {
    (c & PATH_CMD_MASK) == PATH_CMD_END_POLY
}

#[inline]
pub fn is_close(c: u32) -> bool {
    (c & !(PATH_FLAGS_CW | PATH_FLAGS_CCW)) == (PATH_CMD_END_POLY | PATH_FLAGS_CLOSE)
}

// ============================================================================
// VertexSource
// ============================================================================

/// A generator of path vertices.
///
/// `rewind` restarts iteration; `vertex` writes the next coordinate and
/// returns its command, ending with `PATH_CMD_STOP`.
pub trait VertexSource {
    fn rewind(&mut self, path_id: u32);
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32;
}

// ============================================================================
// Rect
// ============================================================================

/// An integer rectangle defined by two inclusive corner points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectI {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RectI {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Returns `true` if the rectangle is non-empty.
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn hit_test(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iround() {
        assert_eq!(iround(0.5), 1);
        assert_eq!(iround(0.49), 0);
        assert_eq!(iround(-0.5), -1);
        assert_eq!(iround(-0.49), 0);
    }

    #[test]
    fn test_ifloor() {
        assert_eq!(ifloor(1.7), 1);
        assert_eq!(ifloor(-1.2), -2);
        assert_eq!(ifloor(-2.0), -2);
    }

    #[test]
    fn test_poly_coord() {
        assert_eq!(poly_coord(1.0), 256);
        assert_eq!(poly_coord(0.5), 128);
        assert_eq!(poly_coord(-1.0), -256);
    }

    #[test]
    fn test_path_command_predicates() {
        assert!(is_vertex(PATH_CMD_MOVE_TO));
        assert!(is_vertex(PATH_CMD_CURVE4));
        assert!(!is_vertex(PATH_CMD_STOP));
        assert!(!is_vertex(PATH_CMD_END_POLY));
        assert!(is_close(PATH_CMD_END_POLY | PATH_FLAGS_CLOSE | PATH_FLAGS_CCW));
        assert!(!is_close(PATH_CMD_END_POLY));
        assert!(is_end_poly(PATH_CMD_END_POLY | PATH_FLAGS_CLOSE));
    }

    #[test]
    fn test_rect_hit_test() {
        let r = RectI::new(0, 0, 9, 9);
        assert!(r.is_valid());
        assert!(r.hit_test(0, 9));
        assert!(!r.hit_test(10, 0));
        assert!(!RectI::new(1, 1, 0, 0).is_valid());
    }
}
