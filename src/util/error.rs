//! Error types for wheelmatch.
//!
//! Per-template conditions (a template too large for a target, a degenerate
//! template buffer) are absorbed by callers as skipped entries; only
//! whole-pass conditions surface to the user as an `Err`.

use thiserror::Error;

/// Result alias for wheelmatch operations.
pub type WheelMatchResult<T> = std::result::Result<T, WheelMatchError>;

/// Errors that can occur when building libraries or running a pass.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WheelMatchError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the image width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer cannot hold the described image.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Outcome label outside the supported 0..=36 range.
    #[error("label {label} is outside the supported range 0..=36")]
    InvalidLabel { label: u8 },
    /// A library may hold at most one template per label.
    #[error("duplicate template for label {label}")]
    DuplicateLabel { label: u8 },
    /// The template cannot be placed anywhere inside the target.
    #[error("template {tpl_width}x{tpl_height} exceeds target {img_width}x{img_height}")]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template carries no usable signal for correlation.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Every placement window in the target fell below the variance floor.
    #[error("no target window with variance above the floor")]
    FlatTarget,
    /// A classification pass needs at least one usable template.
    #[error("no usable templates for this classification pass")]
    NoTemplatesAvailable,
    /// Image decoding or file access failed (unreadable target, missing
    /// template directory).
    #[cfg(feature = "image-io")]
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
}
