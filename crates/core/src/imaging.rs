//! Decode → filter → resize → encode pipeline for stored avatars.

use std::io::Cursor;

use image::imageops::FilterType as ResampleFilter;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::CoreError;
use crate::filter::FilterType;

/// Smallest edge length a client may request.
pub const MIN_SIZE: u32 = 16;

/// Largest edge length a client may request.
pub const MAX_SIZE: u32 = 1024;

/// Content type of every buffer produced by this module.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Validate a requested output edge length.
pub fn validate_size(size: u32) -> Result<(), CoreError> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        return Err(CoreError::Validation(format!(
            "Size must be between {MIN_SIZE} and {MAX_SIZE} (got {size})"
        )));
    }
    Ok(())
}

/// Decode an encoded image, guessing the format from its magic bytes.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, CoreError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Encode an image as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Width and height of an encoded image.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32), CoreError> {
    Ok(decode(bytes)?.dimensions())
}

/// Apply an optional filter and an optional square resize to an encoded image.
///
/// With neither requested the input is returned untouched, without a
/// decode/encode round trip.
pub fn process(
    bytes: &[u8],
    filter: Option<FilterType>,
    size: Option<u32>,
) -> Result<Vec<u8>, CoreError> {
    if filter.is_none() && size.is_none() {
        return Ok(bytes.to_vec());
    }
    if let Some(size) = size {
        validate_size(size)?;
    }

    let mut img = decode(bytes)?;
    if let Some(filter) = filter {
        img = filter.apply(img);
    }
    if let Some(size) = size {
        if img.dimensions() != (size, size) {
            img = img.resize_exact(size, size, ResampleFilter::Lanczos3);
        }
    }
    encode_png(&img)
}
