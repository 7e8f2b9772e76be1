use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::BezelResult;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode any format the `image` crate understands (WebP and PNG included) into premultiplied
/// RGBA8.
pub fn decode_image(bytes: &[u8]) -> BezelResult<PreparedImage> {
    let rgba = image::load_from_memory(bytes)
        .context("decode texture bytes")?
        .into_rgba8();
    let (width, height) = rgba.dimensions();
    let rgba8_premul: Vec<u8> = rgba
        .pixels()
        .flat_map(|&image::Rgba([r, g, b, a])| {
            Rgba8Premul::from_straight_rgba(r, g, b, a).to_array()
        })
        .collect();

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}
