// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render parameters.  Built once, checked once, and never touched
//! again while a render is running.

use std::time::Duration;

use crate::error::RenderError;

/// Size of the worker pool that traces orbits.
pub const DEFAULT_WORKERS: usize = 16;

/// Gamma exponent used to lift faint trajectories out of the dark.
pub const DEFAULT_GAMMA: f64 = 1.1;

/// Everything a single render needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: usize,
    /// Canvas height in pixels.
    pub height: usize,
    /// Half-width of the square viewport centered on the origin.
    pub radius: f64,
    /// Wall-clock time spent sampling seeds.
    pub time_limit: Duration,
    /// Iterations of the boundary scan that picks candidates.
    pub min_iterations: usize,
    /// Iterations after which an orbit is considered bounded.
    pub max_iterations: usize,
    /// Number of orbit-tracing threads.
    pub workers: usize,
    /// Tone-mapping gamma.
    pub gamma: f64,
}

impl RenderConfig {
    /// Checks the parameters and fills in the defaults for the worker
    /// pool and gamma.  A `max_iterations` below `min_iterations` is
    /// replaced by ten times the minimum.
    pub fn new(
        width: usize,
        height: usize,
        radius: f64,
        time_limit: Duration,
        min_iterations: usize,
        max_iterations: usize,
    ) -> Result<RenderConfig, RenderError> {
        RenderConfig {
            width,
            height,
            radius,
            time_limit,
            min_iterations,
            max_iterations,
            workers: DEFAULT_WORKERS,
            gamma: DEFAULT_GAMMA,
        }
        .validated()
    }

    /// Replaces the worker count.
    pub fn with_workers(self, workers: usize) -> Result<RenderConfig, RenderError> {
        RenderConfig { workers, ..self }.validated()
    }

    /// Replaces the tone-mapping gamma.
    pub fn with_gamma(self, gamma: f64) -> Result<RenderConfig, RenderError> {
        RenderConfig { gamma, ..self }.validated()
    }

    fn validated(mut self) -> Result<RenderConfig, RenderError> {
        let complain = |msg: String| Err(RenderError::Configuration(msg));
        if self.width == 0 || self.height == 0 {
            return complain(format!(
                "the canvas must not be empty (got {}x{})",
                self.width, self.height
            ));
        }
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return complain(format!("the radius must be positive (got {})", self.radius));
        }
        if self.time_limit == Duration::from_secs(0) {
            return complain("the time budget must be positive".to_string());
        }
        if self.min_iterations == 0 || self.max_iterations == 0 {
            return complain("iteration budgets must be positive".to_string());
        }
        if self.workers == 0 {
            return complain("at least one worker is required".to_string());
        }
        if !(self.gamma > 0.0) || !self.gamma.is_finite() {
            return complain(format!("gamma must be positive (got {})", self.gamma));
        }
        if self.max_iterations < self.min_iterations {
            let derived = self.min_iterations.saturating_mul(10);
            warn!(
                "maximum iterations {} is below the minimum {}; using {}",
                self.max_iterations, self.min_iterations, derived
            );
            self.max_iterations = derived;
        }
        Ok(self)
    }

    /// The file name used when the caller gives no output path; it
    /// records the settings that produced the image.
    pub fn default_output_name(&self) -> String {
        format!(
            "-s {} -t {} -i {} -I {}.png",
            self.width,
            self.time_limit.as_secs(),
            self.min_iterations,
            self.max_iterations
        )
    }
}
