// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The density matrix of the Buddhabrot, and the worker pool that fills
//! it.  Every worker owns a private histogram; the pool's histograms are
//! summed once all of them have finished, so no cell is ever shared
//! between threads while the render is running.

use crossbeam::channel::Receiver;
use crossbeam::thread::ScopedJoinHandle;
use num::Complex;

use crate::error::RenderError;
use crate::orbit::record_orbit;
use crate::planes::{Pixel, PlaneMapper};

/// Per-pixel visit counts, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl Histogram {
    /// A zero-filled histogram.
    pub fn new(width: usize, height: usize) -> Self {
        Histogram {
            width,
            height,
            counts: vec![0 as u32; width * height],
        }
    }

    /// A zero-filled histogram covering the canvas of `plane`.
    pub fn for_plane(plane: &PlaneMapper) -> Self {
        Histogram::new(plane.width(), plane.height())
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw counts, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// The count at a pixel, or `None` off the canvas.
    pub fn get(&self, pixel: Pixel) -> Option<u32> {
        if pixel.0 < self.width && pixel.1 < self.height {
            Some(self.counts[pixel.1 * self.width + pixel.0])
        } else {
            None
        }
    }

    /// Smallest and largest count.
    pub fn bounds(&self) -> (u32, u32) {
        self.counts
            .iter()
            .fold((u32::max_value(), 0), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&v| u64::from(v)).sum()
    }

    /// Increments the pixel under every point of `orbit` that lands on
    /// the canvas.  Points off the canvas are skipped.
    pub fn plot(&mut self, plane: &PlaneMapper, orbit: &[Complex<f64>]) {
        for z in orbit {
            if let Some(offset) = plane.point_to_offset(z) {
                self.counts[offset] = self.counts[offset].saturating_add(1);
            }
        }
    }

    /// Traces the orbit of `c` into `path` and, if it escapes within
    /// `max_iterations`, plots every point after the seed itself.
    /// Returns whether the orbit escaped.
    pub fn trace(
        &mut self,
        plane: &PlaneMapper,
        c: Complex<f64>,
        max_iterations: usize,
        path: &mut Vec<Complex<f64>>,
    ) -> bool {
        if record_orbit(c, max_iterations, path) {
            self.plot(plane, path.get(1..).unwrap_or(&[]));
            true
        } else {
            false
        }
    }

    /// Adds another histogram of the same shape, cell by cell.
    pub fn merge(&mut self, other: &Histogram) {
        debug_assert!(self.width == other.width && self.height == other.height);
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine = mine.saturating_add(*theirs);
        }
    }
}

/// Drains `seeds` with a pool of `workers` threads, each tracing into a
/// histogram of its own, and returns their sum.  Returns once the
/// channel has been closed and emptied.  The receiver is consumed so
/// that, should the pool fail, the producer sees the channel hang up
/// instead of blocking forever.
pub fn accumulate(
    plane: &PlaneMapper,
    seeds: Receiver<Complex<f64>>,
    workers: usize,
    max_iterations: usize,
) -> Result<Histogram, RenderError> {
    let seeds = &seeds;
    let regions = crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<(Histogram, usize)>> = (0..workers.max(1))
            .map(|worker| {
                spawner.spawn(move |_| {
                    let mut region = Histogram::for_plane(plane);
                    let mut path: Vec<Complex<f64>> = Vec::with_capacity(max_iterations);
                    let mut traced = 0;
                    for c in seeds.iter() {
                        if region.trace(plane, c, max_iterations, &mut path) {
                            traced += 1;
                        }
                    }
                    debug!("worker {} plotted {} escaping orbits", worker, traced);
                    (region, traced)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<(Histogram, usize)>, _>>()
    })
    .map_err(|_| RenderError::WorkerPanicked)?
    .map_err(|_| RenderError::WorkerPanicked)?;

    let mut histogram = Histogram::for_plane(plane);
    let mut traced = 0;
    for (region, count) in &regions {
        histogram.merge(region);
        traced += count;
    }
    info!("Plotted {} escaping trajectories.", traced);
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::recorded_orbit;
    use crossbeam::channel::unbounded;

    fn seeds() -> Vec<Complex<f64>> {
        (0..200)
            .map(|i| {
                let t = (i as f64) * 0.031;
                Complex::new(-0.75 + 0.6 * t.cos(), 0.65 * t.sin())
            })
            .collect()
    }

    fn run(plane: &PlaneMapper, seeds: &[Complex<f64>], workers: usize) -> Histogram {
        let (sender, receiver) = unbounded();
        for c in seeds {
            sender.send(*c).unwrap();
        }
        drop(sender);
        accumulate(plane, receiver, workers, 500).unwrap()
    }

    #[test]
    fn plot_counts_every_point_on_the_canvas() {
        let plane = PlaneMapper::centered(4, 4, 2.0).unwrap();
        let mut histogram = Histogram::for_plane(&plane);
        histogram.plot(
            &plane,
            &[
                Complex::new(0.0, 0.0),
                Complex::new(0.1, -0.1),
                Complex::new(-2.0, -2.0),
                Complex::new(5.0, 0.0),
            ],
        );
        assert_eq!(histogram.get(Pixel(2, 2)), Some(2));
        assert_eq!(histogram.get(Pixel(0, 0)), Some(1));
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.get(Pixel(4, 0)), None);
    }

    #[test]
    fn bounded_orbits_plot_nothing() {
        let plane = PlaneMapper::centered(8, 8, 2.0).unwrap();
        let mut histogram = Histogram::for_plane(&plane);
        let mut path = Vec::new();
        assert!(!histogram.trace(&plane, Complex::new(-1.0, 0.0), 100, &mut path));
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn trace_plots_each_visited_point_once() {
        let plane = PlaneMapper::centered(16, 16, 2.0).unwrap();
        let c = Complex::new(0.4, 0.6);
        let orbit = recorded_orbit(c, 100);
        let on_canvas = orbit[1..]
            .iter()
            .filter(|z| plane.point_to_offset(z).is_some())
            .count();

        let mut histogram = Histogram::for_plane(&plane);
        let mut path = Vec::new();
        assert!(histogram.trace(&plane, c, 100, &mut path));
        assert_eq!(histogram.total(), on_canvas as u64);
    }

    #[test]
    fn the_seed_is_not_plotted() {
        let plane = PlaneMapper::centered(16, 16, 2.0).unwrap();
        let c = Complex::new(1.5, 0.0);
        let mut histogram = Histogram::for_plane(&plane);
        let mut path = Vec::new();
        assert!(histogram.trace(&plane, c, 100, &mut path));
        assert_eq!(path, vec![Complex::new(1.5, 0.0), Complex::new(3.75, 0.0)]);
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn orbits_escaping_at_once_plot_nothing() {
        let plane = PlaneMapper::centered(16, 16, 2.0).unwrap();
        let mut histogram = Histogram::for_plane(&plane);
        let mut path = Vec::new();
        assert!(histogram.trace(&plane, Complex::new(1.9, 1.9), 100, &mut path));
        assert_eq!(path.len(), 1);
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn escape_on_the_last_step_plots_nothing() {
        let plane = PlaneMapper::centered(16, 16, 2.0).unwrap();
        let c = Complex::new(0.5, 0.5);
        let mut histogram = Histogram::for_plane(&plane);
        let mut path = Vec::new();
        for budget in 1..6 {
            assert!(!histogram.trace(&plane, c, budget, &mut path));
        }
        assert_eq!(histogram.total(), 0);
        assert!(histogram.trace(&plane, c, 6, &mut path));
        assert!(histogram.total() > 0);
    }

    #[test]
    fn merge_sums_cells() {
        let mut a = Histogram::new(2, 1);
        let mut b = Histogram::new(2, 1);
        let plane = PlaneMapper::centered(2, 1, 1.0).unwrap();
        a.plot(&plane, &[Complex::new(-0.9, 0.0)]);
        b.plot(&plane, &[Complex::new(-0.9, 0.0), Complex::new(0.9, 0.0)]);
        a.merge(&b);
        assert_eq!(a.counts(), &[2, 1]);
        assert_eq!(a.bounds(), (1, 2));
    }

    #[test]
    fn accumulation_is_order_independent() {
        let plane = PlaneMapper::centered(32, 32, 2.0).unwrap();
        let forward = seeds();
        let mut backward = forward.clone();
        backward.reverse();

        let serial = run(&plane, &forward, 1);
        let parallel = run(&plane, &backward, 7);
        assert!(serial.total() > 0);
        assert_eq!(serial, parallel);

        let mut expected = Histogram::for_plane(&plane);
        let mut path = Vec::new();
        for c in &forward {
            expected.trace(&plane, *c, 500, &mut path);
        }
        assert_eq!(serial, expected);
    }
}
