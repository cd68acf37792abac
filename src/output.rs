// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes rasters to disk in the format named by the file extension.

use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat};

use crate::error::RenderError;

/// Picks PNG, JPEG, or GIF from the extension of `path`.  Anything else,
/// including no extension at all, is an error.
pub fn format_for(path: &Path) -> Result<ImageFormat, RenderError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "gif" => Ok(ImageFormat::Gif),
        _ => Err(RenderError::UnknownFormat(ext)),
    }
}

/// Saves `raster` to `path`.  GIF has no grayscale mode, so the raster is
/// expanded to opaque RGBA first.
pub fn write_image(path: &Path, raster: &GrayImage) -> Result<(), RenderError> {
    let format = format_for(path)?;
    match format {
        ImageFormat::Gif => DynamicImage::ImageLuma8(raster.clone())
            .to_rgba8()
            .save_with_format(path, format)?,
        _ => raster.save_with_format(path, format)?,
    }
    Ok(())
}
