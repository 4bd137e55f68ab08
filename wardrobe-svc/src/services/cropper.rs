//! Local garment crop geometry
//!
//! Converts a normalized 0-1000 detection box to absolute pixel coordinates
//! against the source image's actual dimensions, extracts the region, and
//! re-encodes it as PNG. Deterministic and local; the only non-trivial rule
//! is the 1x1 pixel floor for degenerate boxes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

use wardrobe_common::garment::Box2D;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("Invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Decode a base64-encoded image (bare or data-URL form)
pub fn decode_image(image_b64: &str) -> Result<DynamicImage, CropError> {
    let b64 = match image_b64.split_once(',') {
        Some((_, data)) => data,
        None => image_b64,
    };
    let bytes = BASE64.decode(b64)?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Compute the absolute pixel rectangle for a normalized box
///
/// Origin `(xmin/1000*W, ymin/1000*H)`, size `((xmax-xmin)/1000*W,
/// (ymax-ymin)/1000*H)`, floored to at least 1x1 and clamped to the image
/// bounds. Returns `(x, y, width, height)`.
pub fn crop_rect(width: u32, height: u32, box2d: &Box2D) -> (u32, u32, u32, u32) {
    let scale = |v: i64, extent: u32| (v as f64 / 1000.0 * extent as f64) as u32;

    let x = scale(box2d.xmin, width).min(width.saturating_sub(1));
    let y = scale(box2d.ymin, height).min(height.saturating_sub(1));

    let w = scale(box2d.xmax - box2d.xmin, width).max(1).min(width - x);
    let h = scale(box2d.ymax - box2d.ymin, height).max(1).min(height - y);

    (x, y, w, h)
}

/// Crop a garment region out of the source image and re-encode it as
/// base64 PNG. No padding.
pub fn crop_to_box(source: &DynamicImage, box2d: &Box2D) -> Result<String, CropError> {
    let (x, y, w, h) = crop_rect(source.width(), source.height(), box2d);
    let region = source.crop_imm(x, y, w, h);
    encode_png(&region)
}

/// Encode an image as base64 PNG
pub fn encode_png(image: &DynamicImage) -> Result<String, CropError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(BASE64.encode(&buf))
}
