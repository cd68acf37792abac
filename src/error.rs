// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a render can fail.  Only `OutOfBounds` is routine; the
//! plotting paths throw it away on every orbit point that wanders off
//! the canvas.  Everything else stops the render.

/// Errors produced while configuring, sampling, or saving a render.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A pixel or complex coordinate lies outside the canvas.
    #[fail(display = "coordinate lies outside the canvas")]
    OutOfBounds,

    /// The render parameters cannot produce an image.
    #[fail(display = "invalid configuration: {}", _0)]
    Configuration(String),

    /// The output path names a format we cannot write.
    #[fail(display = "unrecognized output format: {:?}", _0)]
    UnknownFormat(String),

    /// The encoder refused the raster or the file could not be written.
    #[fail(display = "could not save image: {}", _0)]
    Image(#[cause] image::ImageError),

    /// One of the scoped render threads panicked.
    #[fail(display = "a render thread panicked")]
    WorkerPanicked,
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Image(err)
    }
}
