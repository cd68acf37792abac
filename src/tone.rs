// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gamma-corrected conversion of the density matrix to an 8-bit
//! grayscale raster.
//!
//! The raster is the histogram turned a quarter: raster pixel `(x, y)`
//! shows histogram column `y` of row `x`, so a `width × height` canvas
//! yields a `height × width` image.

use image::{GrayImage, Luma};

use crate::histogram::Histogram;

/// Maps counts to intensities with `(count - min)^(1/gamma)`, scaled so
/// that the largest count is white.
#[derive(Copy, Clone, Debug)]
pub struct ToneMapper {
    gamma: f64,
}

impl ToneMapper {
    /// A mapper with the given gamma; values above one brighten faint
    /// cells.
    pub fn new(gamma: f64) -> Self {
        ToneMapper { gamma }
    }

    fn color(&self, count: u32, min: u32) -> f64 {
        f64::from(count - min).powf(1.0 / self.gamma)
    }

    /// The intensity of every cell, row-major like the histogram.  A
    /// histogram with no contrast at all is black.
    pub fn levels(&self, histogram: &Histogram) -> Vec<u8> {
        let (min, max) = histogram.bounds();
        if max <= min {
            return vec![0; histogram.counts().len()];
        }
        let scale = 255.0 / self.color(max, min);
        histogram
            .counts()
            .iter()
            .map(|&count| (scale * self.color(count, min)).round().max(0.0).min(255.0) as u8)
            .collect()
    }

    /// Renders the raster, rotated as described in the module notes.
    pub fn map(&self, histogram: &Histogram) -> GrayImage {
        let levels = self.levels(histogram);
        let width = histogram.width();
        GrayImage::from_fn(histogram.height() as u32, width as u32, |x, y| {
            // x walks the histogram rows, y its columns.
            Luma([levels[(x as usize) * width + (y as usize)]])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::{Pixel, PlaneMapper};
    use num::Complex;

    fn histogram_with(plane: &PlaneMapper, points: &[(f64, f64)]) -> Histogram {
        let mut histogram = Histogram::for_plane(plane);
        let orbit: Vec<Complex<f64>> = points.iter().map(|&(re, im)| Complex::new(re, im)).collect();
        histogram.plot(plane, &orbit);
        histogram
    }

    #[test]
    fn extremes_map_to_black_and_white() {
        let plane = PlaneMapper::centered(3, 1, 1.5).unwrap();
        let histogram = histogram_with(&plane, &[(-1.4, 0.0), (-0.5, 0.0), (-0.5, 0.0)]);
        assert_eq!(histogram.counts(), &[1, 2, 0]);
        let levels = ToneMapper::new(1.0).levels(&histogram);
        assert_eq!(levels, vec![128, 255, 0]);
    }

    #[test]
    fn gamma_lifts_faint_cells() {
        let plane = PlaneMapper::centered(3, 1, 1.5).unwrap();
        let mut points = vec![(-1.4, 0.0)];
        points.extend(std::iter::repeat((-0.5, 0.0)).take(9));
        let histogram = histogram_with(&plane, &points);
        let linear = ToneMapper::new(1.0).levels(&histogram);
        let lifted = ToneMapper::new(1.1).levels(&histogram);
        assert_eq!(linear[0], 28);
        assert!(lifted[0] > linear[0]);
        assert_eq!(lifted[1], 255);
        assert_eq!(lifted[2], 0);
    }

    #[test]
    fn mapping_is_monotonic() {
        let plane = PlaneMapper::centered(16, 16, 2.0).unwrap();
        let mut histogram = Histogram::for_plane(&plane);
        let mut path = Vec::new();
        for i in 0..300 {
            let t = (i as f64) * 0.021;
            let c = Complex::new(-0.75 + 0.62 * t.cos(), 0.66 * t.sin());
            histogram.trace(&plane, c, 400, &mut path);
        }
        let levels = ToneMapper::new(1.1).levels(&histogram);
        let counts = histogram.counts();
        for a in 0..counts.len() {
            for b in 0..counts.len() {
                if counts[a] > counts[b] {
                    assert!(levels[a] >= levels[b]);
                }
            }
        }
    }

    #[test]
    fn flat_histogram_is_black() {
        let histogram = Histogram::new(4, 3);
        let raster = ToneMapper::new(1.1).map(&histogram);
        assert!(raster.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn raster_is_the_histogram_turned() {
        let plane = PlaneMapper::centered(4, 2, 2.0).unwrap();
        // Lands on column 3, row 0.
        let histogram = histogram_with(&plane, &[(1.2, -1.5)]);
        assert_eq!(histogram.get(Pixel(3, 0)), Some(1));

        let raster = ToneMapper::new(1.1).map(&histogram);
        assert_eq!(raster.dimensions(), (2, 4));
        assert_eq!(raster.get_pixel(0, 3), &Luma([255]));
        assert_eq!(raster.pixels().filter(|p| p.0[0] == 255).count(), 1);
    }
}
