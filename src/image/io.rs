//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Color input is accepted
//! and converted to grayscale; matching itself is always grayscale.

use crate::image::OwnedImage;
use crate::util::{WheelMatchError, WheelMatchResult};
use std::path::Path;

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> WheelMatchResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> WheelMatchResult<OwnedImage> {
    let gray = img.to_luma8();
    owned_from_gray_image(&gray)
}

/// Loads an image from disk and converts it to a grayscale owned image.
///
/// This is the entry point for classification targets and negative-control
/// images; a decode failure here is fatal for the pass that needed the image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> WheelMatchResult<OwnedImage> {
    let img = image::open(path).map_err(|err| WheelMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}
