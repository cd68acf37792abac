// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The BuddhaRenderer ties the phases of a render together: the
//! boundary scan, the timed sampling run, and the tone mapping.  The
//! phases never overlap; each one hands an owned result to the next.

use crossbeam::channel::bounded;
use image::GrayImage;
use num::Complex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::candidates::find_candidates;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::histogram::{accumulate, Histogram};
use crate::planes::PlaneMapper;
use crate::seeds::{JitterSource, SeedStream, UniformJitter};
use crate::tone::ToneMapper;

/// The BuddhaRenderer contains the parameters by which a buddhabrot is
/// generated.  Once set, this object should not be mutable.
pub struct BuddhaRenderer {
    config: RenderConfig,
    plane: PlaneMapper,
}

impl BuddhaRenderer {
    /// Builds the canvas described by `config`.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let plane = PlaneMapper::centered(config.width, config.height, config.radius)?;
        Ok(BuddhaRenderer { config, plane })
    }

    /// The mapping between the canvas and the complex plane.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Phase one: the boundary scan, spread over every available core.
    pub fn candidates(&self) -> Result<Vec<Complex<f64>>, RenderError> {
        find_candidates(&self.plane, self.config.min_iterations, num_cpus::get())
    }

    /// Phase two, with freshly seeded uniform jitter.
    pub fn sample(&self, candidates: &[Complex<f64>]) -> Result<Histogram, RenderError> {
        self.sample_with(candidates, UniformJitter::new(StdRng::from_entropy()))
    }

    /// Phase two: streams jittered seeds from `candidates` to the worker
    /// pool until the time budget runs out, then returns the summed
    /// histogram once every in-flight seed has been traced.
    pub fn sample_with<J>(
        &self,
        candidates: &[Complex<f64>],
        jitter: J,
    ) -> Result<Histogram, RenderError>
    where
        J: JitterSource + Send,
    {
        if candidates.is_empty() {
            return Err(RenderError::Configuration(
                "cannot sample without boundary candidates".to_string(),
            ));
        }
        let (sender, receiver) = bounded(self.config.workers);
        let units_per_pixel = self.plane.units_per_pixel();
        let time_limit = self.config.time_limit;

        info!("Rendering for the next {:?}...", time_limit);
        let (histogram, sampled) = crossbeam::scope(|spawner| {
            let producer = spawner.spawn(move |_| {
                SeedStream::new(candidates, units_per_pixel, time_limit, jitter).feed(sender)
            });
            let histogram = accumulate(
                &self.plane,
                receiver,
                self.config.workers,
                self.config.max_iterations,
            );
            (histogram, producer.join())
        })
        .map_err(|_| RenderError::WorkerPanicked)?;

        let sampled = sampled.map_err(|_| RenderError::WorkerPanicked)?;
        info!("Recorded {} trajectories!", sampled);
        histogram
    }

    /// Phase three: the gamma-corrected raster.
    pub fn tone_map(&self, histogram: &Histogram) -> GrayImage {
        ToneMapper::new(self.config.gamma).map(histogram)
    }

    /// All three phases, in order.
    pub fn render(&self) -> Result<GrayImage, RenderError> {
        let candidates = self.candidates()?;
        let histogram = self.sample(&candidates)?;
        Ok(self.tone_map(&histogram))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::recorded_orbit;
    use std::time::{Duration, Instant};

    fn config(min_iterations: usize, max_iterations: usize) -> RenderConfig {
        RenderConfig::new(10, 10, 2.0, Duration::from_secs(1), min_iterations, max_iterations)
            .unwrap()
    }

    #[test]
    fn small_render_fills_the_histogram_in_time() {
        let renderer = BuddhaRenderer::new(config(5, 100)).unwrap();
        let start = Instant::now();
        let candidates = renderer.candidates().unwrap();
        let histogram = renderer.sample(&candidates).unwrap();
        let elapsed = start.elapsed();

        assert!(histogram.counts().iter().any(|&v| v > 0));
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(4), "took {:?}", elapsed);
    }

    #[test]
    fn render_produces_a_turned_raster() {
        let config = RenderConfig::new(12, 8, 2.0, Duration::from_secs(1), 5, 100)
            .unwrap()
            .with_workers(4)
            .unwrap();
        let raster = BuddhaRenderer::new(config).unwrap().render().unwrap();
        assert_eq!(raster.dimensions(), (8, 12));
        assert!(raster.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn equal_budgets_still_render() {
        let renderer = BuddhaRenderer::new(config(20, 20)).unwrap();
        let candidates = renderer.candidates().unwrap();
        let histogram = renderer
            .sample_with(&candidates, UniformJitter::new(StdRng::seed_from_u64(5)))
            .unwrap();
        assert_eq!(histogram.counts().len(), 100);

        // Unjittered, the candidates themselves trace exactly the orbits
        // that escape in under twenty steps, minus their seeds.
        let plane = renderer.plane();
        let mut traced = Histogram::for_plane(plane);
        let mut path = Vec::new();
        let mut expected = 0;
        for c in &candidates {
            let orbit = recorded_orbit(*c, 20);
            assert!(orbit.len() < 20);
            expected += orbit
                .iter()
                .skip(1)
                .filter(|z| plane.point_to_offset(z).is_some())
                .count() as u64;
            assert_eq!(traced.trace(plane, *c, 20, &mut path), !orbit.is_empty());
        }
        assert_eq!(traced.total(), expected);
    }

    #[test]
    fn sampling_without_candidates_is_refused() {
        let renderer = BuddhaRenderer::new(config(5, 100)).unwrap();
        assert!(renderer.sample(&[]).is_err());
    }
}
