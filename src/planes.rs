// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane with an arbitrary pair of
//! corners defining the leftlower and rightupper corners of the
//! viewport.
use itertools::iproduct;
use num::Complex;

use crate::error::RenderError;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.  The viewport is closed: both corners belong to it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

impl ComplexPlane {
    /// A square viewport centered on the origin that reaches `radius`
    /// along both axes.
    pub fn centered(radius: f64) -> Self {
        ComplexPlane(Complex::new(-radius, -radius), Complex::new(radius, radius))
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.1.re - self.0.re
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.1.im - self.0.im
    }

    /// True if the point lies inside the closed viewport.  NaN
    /// coordinates are never contained.
    pub fn contains(&self, point: &Complex<f64>) -> bool {
        point.re >= self.0.re && point.re <= self.1.re && point.im >= self.0.im && point.im <= self.1.im
    }
}

/// Describes the x, y of a pixel on the integral plane: the column
/// first, then the row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex cartesian plane.  Maps points from one to the other.
#[derive(Clone, Debug)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex cartesian plane,
    /// left-lower and right-upper
    pub complex_plane: ComplexPlane,
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane, and two
    /// points describing the complex plane.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
    ) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Configuration(format!(
                "the canvas must not be empty (got {}x{})",
                width, height
            )));
        }

        // Negated so that NaN corners are refused too.
        if !(rightupper.re > leftlower.re) {
            return Err(RenderError::Configuration(
                "The left lower corner is not to the left of the right upper corner.".to_string(),
            ));
        }

        if !(rightupper.im > leftlower.im) {
            return Err(RenderError::Configuration(
                "The left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(leftlower, rightupper),
        })
    }

    /// A canvas over the square viewport `[-radius, radius]²`.
    pub fn centered(width: usize, height: usize, radius: f64) -> Result<PlaneMapper, RenderError> {
        let plane = ComplexPlane::centered(radius);
        PlaneMapper::new(width, height, plane.0, plane.1)
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The real-axis distance covered by one pixel.  Sizes both the
    /// seed jitter and the boundary threshold of the candidate scan.
    pub fn units_per_pixel(&self) -> f64 {
        self.complex_plane.width() / (self.integral_plane.0 as f64)
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number at the equivalent location on the complex plane.
    /// The far edges (`width`, `height`) are accepted so that the
    /// closed viewport boundary stays reachable.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Result<Complex<f64>, RenderError> {
        let IntegralPlane(width, height) = self.integral_plane;
        if pixel.0 > width || pixel.1 > height {
            return Err(RenderError::OutOfBounds);
        }
        let ComplexPlane(ll, _) = self.complex_plane;
        Ok(Complex::new(
            (pixel.0 as f64) / (width as f64) * self.complex_plane.width() + ll.re,
            (pixel.1 as f64) / (height as f64) * self.complex_plane.height() + ll.im,
        ))
    }

    /// Given a complex number inside the viewport, map it to the
    /// nearest pixel, rounding halves away from zero.  A point on the
    /// far edge of the viewport rounds to `width` or `height`; it is
    /// folded back onto the last column or row.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Result<Pixel, RenderError> {
        if !self.complex_plane.contains(point) {
            return Err(RenderError::OutOfBounds);
        }
        let IntegralPlane(width, height) = self.integral_plane;
        let ComplexPlane(ll, _) = self.complex_plane;
        let left = ((point.re - ll.re) / self.complex_plane.width() * (width as f64)).round();
        let top = ((point.im - ll.im) / self.complex_plane.height() * (height as f64)).round();
        Ok(Pixel(
            (left as usize).min(width - 1),
            (top as usize).min(height - 1),
        ))
    }

    /// Since the Buddhabrot tracks the progress of a complex number
    /// as it orbits, we have to map those complex numbers back to the
    /// pixel plane, and then increment those points on the pixel plane
    /// as the orbit passes through them.  This function takes a point,
    /// maps it to pixel coordinates, then returns the linear (row-major)
    /// offset from the root of the histogram buffer.
    pub fn point_to_offset(&self, point: &Complex<f64>) -> Option<usize> {
        self.point_to_pixel(point)
            .ok()
            .map(|Pixel(left, top)| top * self.integral_plane.0 + left)
    }

    /// Every pixel of the canvas, column by column.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        iproduct!(0..self.integral_plane.0, 0..self.integral_plane.1)
            .map(|(column, row)| Pixel(column, row))
    }

    /// The complex coordinate of every pixel, in the same order as
    /// `pixels()`.  Each call starts a fresh, identical enumeration.
    pub fn points<'a>(&'a self) -> impl Iterator<Item = Complex<f64>> + 'a {
        self.pixels()
            .filter_map(move |pixel| self.pixel_to_point(&pixel).ok())
    }
}
