// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate buddhatrace;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use buddhatrace::candidates::candidate_map;
use buddhatrace::output::write_image;
use buddhatrace::{render, BuddhaRenderer, RenderConfig, RenderError};
use clap::{App, Arg, ArgMatches};

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive_float(s: &str, what: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v > 0.0 && v.is_finite() => Ok(()),
        Ok(_) => Err(format!("{} must be positive", what)),
        Err(_) => Err(format!("Could not parse {}", what)),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const RADIUS: &str = "radius";
const TIME: &str = "time";
const MIN_ITERATIONS: &str = "min-iterations";
const MAX_ITERATIONS: &str = "max-iterations";
const WORKERS: &str = "workers";
const GAMMA: &str = "gamma";
const CANDIDATES: &str = "candidates";

fn args<'a>() -> ArgMatches<'a> {
    App::new("buddha")
        .version("0.1.0")
        .about("Buddhabrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (.png, .jpg, .jpeg or .gif); named after the settings if omitted"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        1,
                        "Could not parse output image size",
                        "Image size must be at least 1",
                    )
                })
                .help("Width and height of the output image in pixels"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .long(RADIUS)
                .short("r")
                .takes_value(true)
                .default_value("2.0")
                .validator(|s| validate_positive_float(&s, "radius"))
                .help("Largest real and imaginary value shown"),
        )
        .arg(
            Arg::with_name(TIME)
                .long(TIME)
                .short("t")
                .takes_value(true)
                .default_value("10")
                .validator(|s| {
                    validate_range::<u64>(
                        &s,
                        1,
                        "Could not parse time limit",
                        "Time limit must be at least one second",
                    )
                })
                .help("Number of seconds to spend rendering the Buddhabrot"),
        )
        .arg(
            Arg::with_name(MIN_ITERATIONS)
                .long(MIN_ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("10")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        1,
                        "Could not parse minimum iteration count",
                        "Minimum iteration count must be at least 1",
                    )
                })
                .help(
                    "Iterations used to find the boundary of the Mandelbrot set. \
                     Larger values reduce haziness due to quickly escaping points",
                ),
        )
        .arg(
            Arg::with_name(MAX_ITERATIONS)
                .long(MAX_ITERATIONS)
                .short("I")
                .takes_value(true)
                .default_value("10000")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        1,
                        "Could not parse maximum iteration count",
                        "Maximum iteration count must be at least 1",
                    )
                })
                .help(
                    "Iterations before a point is considered inside the Mandelbrot set. \
                     Larger values add finer detail but take longer to trace",
                ),
        )
        .arg(
            Arg::with_name(WORKERS)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value("16")
                .validator(|s| {
                    validate_range::<usize>(
                        &s,
                        1,
                        "Could not parse worker count",
                        "Worker count must be at least 1",
                    )
                })
                .help("Number of threads tracing orbits"),
        )
        .arg(
            Arg::with_name(GAMMA)
                .long(GAMMA)
                .short("g")
                .takes_value(true)
                .default_value("1.1")
                .validator(|s| validate_positive_float(&s, "gamma"))
                .help("Gamma correction applied to the counts"),
        )
        .arg(
            Arg::with_name(CANDIDATES)
                .long(CANDIDATES)
                .short("c")
                .takes_value(true)
                .help("Also save a map of the boundary candidates to this file"),
        )
        .get_matches()
}

/// Clap has already validated every value, so a parse failure here can
/// only mean the argument table and this function disagree.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, RenderError> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| RenderError::Configuration(format!("could not read --{}", name)))
}

fn run(matches: &ArgMatches) -> Result<(), RenderError> {
    let size: usize = value(matches, SIZE)?;
    let config = RenderConfig::new(
        size,
        size,
        value(matches, RADIUS)?,
        Duration::from_secs(value(matches, TIME)?),
        value(matches, MIN_ITERATIONS)?,
        value(matches, MAX_ITERATIONS)?,
    )?
    .with_workers(value(matches, WORKERS)?)?
    .with_gamma(value(matches, GAMMA)?)?;

    let output = match matches.value_of(OUTPUT) {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(config.default_output_name()),
    };

    let raster = match matches.value_of(CANDIDATES) {
        None => render(config)?,
        Some(path) => {
            let renderer = BuddhaRenderer::new(config)?;
            let candidates = renderer.candidates()?;
            info!("Saving candidate map to {}", path);
            write_image(Path::new(path), &candidate_map(renderer.plane(), &candidates))?;
            renderer.tone_map(&renderer.sample(&candidates)?)
        }
    };

    info!("Saving results to {}", output.display());
    write_image(&output, &raster)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
