//! Error types for the renderer.

use thiserror::Error;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised before any geometry is computed.
///
/// The renderer never recovers on its own; callers decide whether to retry,
/// fall back to defaults, or surface the failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The color string is not `#RRGGBB` or `#AARRGGBB`.
    #[error("invalid color format: {0:?}")]
    InvalidColorFormat(String),

    /// A scale factor, offset, or column count is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The target canvas is empty or too large to allocate.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    /// A font face could not be parsed.
    #[error("font error: {0}")]
    Font(String),
}
