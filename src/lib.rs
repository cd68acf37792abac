#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Buddhabrot renderer
//!
//! The Buddhabrot is a variant of the Mandelbrot set that plots where
//! escaping points *go* rather than how fast they leave.  Every point
//! `c` of the complex plane seeds the recurrence `z ← z² + c`; for the
//! seeds whose orbit eventually leaves the circle of radius two, each
//! value the orbit visited on the way out is mapped to its nearest
//! pixel and that pixel's count goes up by one.  The counts, suitably
//! brightened, are the image.
//!
//! Most seeds are dull: far from the set they escape at once, and inside
//! it they never escape at all.  This renderer therefore works in three
//! phases:
//!
//! 1. scan every pixel once and keep the ones whose distance estimate
//!    puts them within a pixel of the set's boundary;
//! 2. for a fixed wall-clock budget, cycle through those candidates,
//!    nudge each by a random sub-pixel offset, and trace the orbits of
//!    the results on a pool of worker threads, each filling a private
//!    histogram;
//! 3. sum the histograms and gamma-map the counts to 8-bit gray.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate rand;

pub mod candidates;
pub mod config;
pub mod error;
pub mod histogram;
pub mod orbit;
pub mod output;
pub mod planes;
pub mod renderer;
pub mod seeds;
pub mod tone;

pub use config::RenderConfig;
pub use error::RenderError;
pub use histogram::Histogram;
pub use planes::{Pixel, PlaneMapper};
pub use renderer::BuddhaRenderer;

/// Renders a Buddhabrot with the given parameters.
pub fn render(config: RenderConfig) -> Result<image::GrayImage, RenderError> {
    BuddhaRenderer::new(config)?.render()
}
