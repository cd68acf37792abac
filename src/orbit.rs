// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Mandelbrot recurrence, `z ← z² + c` starting at `z = 0`, and the
//! cheap tests that let us skip it.  Nothing in here holds state; every
//! function is safe to call from any number of threads at once.

use num::Complex;

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// An orbit has escaped once it leaves the circle of radius two; from
/// there it is guaranteed to run off to infinity.
#[inline]
pub fn has_escaped(z: Complex<f64>) -> bool {
    z.norm_sqr() >= 4.0
}

/// Closed-form membership tests for the main cardioid and the
/// period-2 bulb.  A `true` answer is a guarantee that the point never
/// escapes; `false` promises nothing.
pub fn is_known_interior(c: Complex<f64>) -> bool {
    let y = c.im * c.im;
    if (c.re + 1.0) * (c.re + 1.0) + y < D16 {
        return true;
    }
    let q = (c.re - D4) * (c.re - D4) + y;
    4.0 * q * (q + c.re - D4) < y
}

/// Iterates the recurrence for at most `max_iterations` steps.  Returns
/// the number of steps taken and whether the last of them left the
/// escape circle.
pub fn escape_iteration(c: Complex<f64>, max_iterations: usize) -> (usize, bool) {
    let mut z = Complex::new(0.0, 0.0);
    for i in 0..max_iterations {
        z = z * z + c;
        if has_escaped(z) {
            return (i + 1, true);
        }
    }
    (max_iterations, false)
}

/// Iterates the recurrence, writing every visited `z` (but not the
/// starting zero) into `path`.  The path is kept only if the orbit
/// escapes in fewer than `max_iterations` steps; otherwise `path` is
/// left empty and `false` is returned.  Callers reuse one buffer for
/// many seeds to keep allocation out of the sampling loop.
pub fn record_orbit(c: Complex<f64>, max_iterations: usize, path: &mut Vec<Complex<f64>>) -> bool {
    path.clear();
    let mut z = Complex::new(0.0, 0.0);
    while path.len() < max_iterations {
        z = z * z + c;
        path.push(z);
        if has_escaped(z) {
            break;
        }
    }
    if path.len() < max_iterations {
        true
    } else {
        path.clear();
        false
    }
}

/// Allocating convenience over `record_orbit`: the visited sequence of
/// an escaping orbit, or an empty vector for a bounded one.
pub fn recorded_orbit(c: Complex<f64>, max_iterations: usize) -> Vec<Complex<f64>> {
    let mut path = Vec::with_capacity(max_iterations);
    record_orbit(c, max_iterations, &mut path);
    path
}

/// Distance estimate from `c` to the boundary of the Mandelbrot set,
/// computed from the orbit and its derivative with respect to `c` over
/// at most `iterations` steps.  Points that stay small enough give a
/// negative or NaN estimate; only positive values are meaningful.
pub fn boundary_distance(c: Complex<f64>, iterations: usize) -> f64 {
    let mut z = Complex::new(0.0, 0.0);
    let mut dz = Complex::new(1.0, 0.0);
    for _ in 0..iterations {
        dz = z * dz * 2.0 + 1.0;
        z = z * z + c;
        if has_escaped(z) {
            break;
        }
    }
    let (mz, mdz) = (z.norm(), dz.norm());
    (mz * mz).ln() * mz / mdz
}
