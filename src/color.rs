//! Color type and fixed-point blend arithmetic.
//!
//! `Rgba8` is a straight (non-premultiplied) 8-bit-per-channel color. It
//! converts to and from the packed `0xAARRGGBB` words the platform bitmap
//! APIs use, parses `#RRGGBB` / `#AARRGGBB` strings, and carries the
//! fixed-point helpers the pixel format blends with.

use crate::basics::CoverType;
use crate::error::{RenderError, Result};

/// RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Alpha bits OR-ed into the primary color for the current-day dot.
pub const TODAY_ALPHA_BITS: u32 = 0x3300_0000;

impl Rgba8 {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_MSB: u32 = 1 << (Self::BASE_SHIFT - 1);

    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn new_opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Unpack a `0xAARRGGBB` word.
    pub const fn from_argb(v: u32) -> Self {
        Self {
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
            a: (v >> 24) as u8,
        }
    }

    /// Pack into a `0xAARRGGBB` word.
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn red(self) -> u8 {
        self.r
    }

    #[inline]
    pub const fn green(self) -> u8 {
        self.g
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.b
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        self.a
    }

    /// Parse `#RRGGBB` (opaque) or `#AARRGGBB`.
    ///
    /// The leading `#` is required and hex digits are case-insensitive.
    pub fn parse_hex(s: &str) -> Result<Self> {
        let invalid = || RenderError::InvalidColorFormat(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Self::from_argb(0xFF00_0000 | value)),
            8 => Ok(Self::from_argb(value)),
            _ => Err(invalid()),
        }
    }

    /// The current-day highlight: `argb | 0x33000000`.
    ///
    /// This is a bitwise OR on the packed word, not a blend. Color channels
    /// are untouched; alpha only ever gains bits, so an opaque primary
    /// color stays opaque.
    pub const fn today_highlight(self) -> Self {
        Self::from_argb(self.to_argb() | TODAY_ALPHA_BITS)
    }

    /// Fixed-point multiply, exact over u8.
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        let t: u32 = a as u32 * b as u32 + Self::BASE_MSB;
        (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT) as u8
    }

    /// Multiply a color component by a cover.
    #[inline]
    pub fn mult_cover(a: u8, b: CoverType) -> u8 {
        Self::multiply(a, b)
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl std::fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.to_argb())
    }
}

impl std::str::FromStr for Rgba8 {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_round_trip_channels() {
        let c = Rgba8::from_argb(0xFF9E_D9A3);
        assert_eq!(c.red(), 0x9E);
        assert_eq!(c.green(), 0xD9);
        assert_eq!(c.blue(), 0xA3);
        assert_eq!(c.alpha(), 0xFF);
        assert_eq!(c.to_argb(), 0xFF9E_D9A3);
    }

    #[test]
    fn test_parse_hex_eight_digits() {
        let c = Rgba8::parse_hex("#809ed9a3").unwrap();
        assert_eq!(c, Rgba8::new(0x9E, 0xD9, 0xA3, 0x80));
    }

    #[test]
    fn test_parse_hex_six_digits_is_opaque() {
        let c = Rgba8::parse_hex("#3A3A3A").unwrap();
        assert_eq!(c.to_argb(), 0xFF3A_3A3A);
    }

    #[test]
    fn test_parse_hex_rejects_malformed() {
        for bad in ["", "#", "FF9ED9A3", "#FF9ED9A", "#GG9ED9A3", "#+F9ED9A3", "#FF9ED9A3FF"] {
            match Rgba8::parse_hex(bad) {
                Err(RenderError::InvalidColorFormat(s)) => assert_eq!(s, bad),
                other => panic!("expected InvalidColorFormat for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_today_highlight_is_bitwise_or() {
        // Opaque colors are unchanged.
        let opaque = Rgba8::from_argb(0xFF9E_D9A3);
        assert_eq!(opaque.today_highlight(), opaque);

        // Translucent colors gain the 0x33 bits, not a blend.
        let translucent = Rgba8::from_argb(0x409E_D9A3);
        assert_eq!(translucent.today_highlight().to_argb(), 0x739E_D9A3);

        let clear = Rgba8::from_argb(0x0012_3456);
        assert_eq!(clear.today_highlight().to_argb(), 0x3312_3456);
    }

    #[test]
    fn test_display_formats_as_argb_hex() {
        assert_eq!(Rgba8::from_argb(0xFF3A_3A3A).to_string(), "#FF3A3A3A");
    }

    #[test]
    fn test_multiply() {
        assert_eq!(Rgba8::multiply(255, 255), 255);
        assert_eq!(Rgba8::multiply(255, 0), 0);
        assert_eq!(Rgba8::multiply(128, 255), 128);
    }
}
