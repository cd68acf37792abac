// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns the candidate list into a stream of seeds.  The stream walks
//! the candidates round-robin, nudges each one by a random sub-pixel
//! offset so that no orbit is traced twice, and drops anything that is
//! already outside the escape circle or provably inside the set.  It
//! stops at a wall-clock deadline and at nothing else.

use std::time::{Duration, Instant};

use crossbeam::channel::Sender;
use num::Complex;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::orbit::{has_escaped, is_known_interior};

/// A source of jitter vectors with both components in `[0, 1)`.
pub trait JitterSource {
    /// The next vector.
    fn next_vector(&mut self) -> Complex<f64>;
}

/// Uniformly distributed jitter drawn from any random number generator.
pub struct UniformJitter<R: Rng> {
    range: Uniform<f64>,
    rng: R,
}

impl<R: Rng> UniformJitter<R> {
    /// Wraps `rng`.
    pub fn new(rng: R) -> Self {
        UniformJitter {
            range: Uniform::new(0.0_f64, 1.0),
            rng,
        }
    }
}

impl<R: Rng> JitterSource for UniformJitter<R> {
    fn next_vector(&mut self) -> Complex<f64> {
        Complex::new(self.range.sample(&mut self.rng), self.range.sample(&mut self.rng))
    }
}

/// Produces seeds until its deadline passes.
pub struct SeedStream<'a, J: JitterSource> {
    candidates: &'a [Complex<f64>],
    cursor: usize,
    units_per_pixel: f64,
    deadline: Instant,
    jitter: J,
    emitted: usize,
}

impl<'a, J: JitterSource> SeedStream<'a, J> {
    /// A stream over `candidates` that runs for `time_limit` from now.
    /// Jitter is scaled so that a seed stays within about one pixel of
    /// the candidate it came from.
    pub fn new(
        candidates: &'a [Complex<f64>],
        units_per_pixel: f64,
        time_limit: Duration,
        jitter: J,
    ) -> Self {
        SeedStream {
            candidates,
            cursor: 0,
            units_per_pixel,
            deadline: Instant::now() + time_limit,
            jitter,
            emitted: 0,
        }
    }

    /// The number of seeds handed out so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Offers each seed to `sender` until the deadline passes or every
    /// receiver has hung up.  The channel bounds how far the stream can
    /// run ahead of the workers.  Returns the number of seeds delivered.
    pub fn feed(mut self, sender: Sender<Complex<f64>>) -> usize {
        while let Some(seed) = self.next() {
            if sender.send(seed).is_err() {
                break;
            }
        }
        self.emitted
    }
}

impl<'a, J: JitterSource> Iterator for SeedStream<'a, J> {
    type Item = Complex<f64>;

    fn next(&mut self) -> Option<Complex<f64>> {
        if self.candidates.is_empty() {
            return None;
        }
        while Instant::now() < self.deadline {
            let candidate = self.candidates[self.cursor];
            self.cursor = (self.cursor + 1) % self.candidates.len();

            let fuzz = (self.jitter.next_vector() - Complex::new(0.5, 0.5)) * self.units_per_pixel;
            let c = candidate + fuzz;
            if has_escaped(c) || is_known_interior(c) {
                continue;
            }
            self.emitted += 1;
            return Some(c);
        }
        None
    }
}
