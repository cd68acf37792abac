// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finds the "interesting points" of the canvas: pixels whose complex
//! coordinate sits within one pixel of the Mandelbrot boundary.  Seeds
//! near the boundary take a long time to escape, and it is their long
//! trajectories that paint the Buddhabrot; seeds far outside escape in
//! a step or two and only add haze.
//!
//! The scan estimates the distance to the boundary from the orbit and
//! its derivative, so a single pass of `min_iterations` per pixel is
//! enough; there is no need to probe random points around each cell.

use std::ops::Range;

use crossbeam::thread::ScopedJoinHandle;
use image::{GrayImage, Luma};
use num::Complex;

use crate::error::RenderError;
use crate::orbit::boundary_distance;
use crate::planes::{Pixel, PlaneMapper};

/// True if the distance estimate for `c` is positive and smaller than
/// `threshold`.
pub fn is_candidate(c: Complex<f64>, min_iterations: usize, threshold: f64) -> bool {
    let dist = boundary_distance(c, min_iterations);
    dist > 0.0 && dist < threshold
}

/// Splits the columns of the canvas into at most `threads` contiguous
/// bands, left to right.
fn make_bands(width: usize, threads: usize) -> Vec<Range<usize>> {
    let threads = threads.max(1);
    let size = (width + threads - 1) / threads;
    (0..width)
        .step_by(size.max(1))
        .map(|start| start..(start + size).min(width))
        .collect()
}

fn scan_band(plane: &PlaneMapper, columns: Range<usize>, min_iterations: usize) -> Vec<Complex<f64>> {
    let threshold = plane.units_per_pixel();
    let mut points: Vec<Complex<f64>> = vec![];
    for column in columns {
        for row in 0..plane.height() {
            if let Ok(c) = plane.pixel_to_point(&Pixel(column, row)) {
                if is_candidate(c, min_iterations, threshold) {
                    points.push(c);
                }
            }
        }
    }
    points
}

/// Scans every pixel of the canvas and returns the candidates in the
/// order `PlaneMapper::points()` visits them.  The columns are split
/// into bands, one per thread, and the bands are stitched back together
/// in order, so the result does not depend on the thread count.
///
/// An empty result means the viewport misses the boundary or
/// `min_iterations` is too small to resolve it; that is reported as a
/// configuration error rather than handed on to the sampler.
pub fn find_candidates(
    plane: &PlaneMapper,
    min_iterations: usize,
    threads: usize,
) -> Result<Vec<Complex<f64>>, RenderError> {
    info!("Calculating candidates for trajectory tracing...");
    let bands = make_bands(plane.width(), threads.max(1));

    let scanned = crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<Vec<Complex<f64>>>> = bands
            .into_iter()
            .map(|band| spawner.spawn(move |_| scan_band(plane, band, min_iterations)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<Vec<Complex<f64>>>, _>>()
    })
    .map_err(|_| RenderError::WorkerPanicked)?
    .map_err(|_| RenderError::WorkerPanicked)?;

    let candidates: Vec<Complex<f64>> = scanned.into_iter().flatten().collect();
    if candidates.is_empty() {
        return Err(RenderError::Configuration(format!(
            "no boundary candidates found with {} minimum iterations",
            min_iterations
        )));
    }
    info!(
        "Found {} candidates based on {} minimum iterations.",
        candidates.len(),
        min_iterations
    );
    Ok(candidates)
}

/// A debugging view of the scan: a black canvas with every candidate
/// pixel painted white.
pub fn candidate_map(plane: &PlaneMapper, candidates: &[Complex<f64>]) -> GrayImage {
    let mut img = GrayImage::new(plane.width() as u32, plane.height() as u32);
    for c in candidates {
        if let Ok(Pixel(x, y)) = plane.point_to_pixel(c) {
            img.put_pixel(x as u32, y as u32, Luma([255]));
        }
    }
    img
}
