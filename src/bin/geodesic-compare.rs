// Copyright (c) 2024-2026 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! Compare the Vincenty and Karney solutions of the inverse geodesic problem
//! for pairs of points read from files, or for a built-in sample of pairs.
use anyhow::Context;
use clap::{Parser, ValueEnum};
use geodesic_inverse::batch::{
    compare_batch, parse_quadruples, BatchOutcome, Comparison, SAMPLE_PAIRS,
};
use geodesic_inverse::{
    Ellipsoid, GeodesicError, InverseOptions, Metres, Radians, DEFAULT_MAX_ITERATIONS,
    DEFAULT_SERIES_ORDER,
};
use log::{debug, info};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Model {
    Wgs84,
    Grs80,
}

/// geodesic-compare: the distances between pairs of points calculated by the
/// Vincenty and Karney methods, and the difference between them.
///
/// Each line of the input is a pair of points: lon1 lat1 lon2 lat2 in degrees,
/// separated by whitespace or commas. Lines starting with '#' are ignored.
#[derive(Parser, Debug)]
#[clap(name = "geodesic-compare")]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The reference ellipsoid
    #[clap(long, value_enum, default_value = "wgs84")]
    ellipsoid: Model,

    /// Override the semi-major axis of the ellipsoid, in metres
    #[clap(short = 'a', long)]
    semi_major: Option<f64>,

    /// Override the flattening of the ellipsoid
    #[clap(short = 'f', long)]
    flattening: Option<f64>,

    /// The convergence tolerance, in radians
    #[clap(long, default_value_t = 1e-12)]
    tolerance: f64,

    /// The maximum number of iterations of the solvers
    #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: u32,

    /// The order of the Karney series expansions, 1 to 6
    #[clap(long, default_value_t = DEFAULT_SERIES_ORDER)]
    series_order: usize,

    /// Decimal places of the distances
    #[clap(short = 'd', long, default_value_t = 6)]
    decimals: usize,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// The files to read, the built-in sample pairs if none
    args: Vec<PathBuf>,
}

fn ellipsoid(options: &Cli) -> Result<Ellipsoid, GeodesicError> {
    let model = match options.ellipsoid {
        Model::Wgs84 => Ellipsoid::wgs84(),
        Model::Grs80 => Ellipsoid::grs80(),
    };
    if options.semi_major.is_none() && options.flattening.is_none() {
        return Ok(model);
    }

    let a = options.semi_major.map_or(model.a(), Metres);
    let f = options.flattening.unwrap_or_else(|| model.f());
    Ellipsoid::new(a, f)
}

fn format_outcome(outcome: &BatchOutcome, decimals: usize) -> String {
    match outcome {
        Ok(result) => format!("{:.decimals$}", result.distance().0),
        Err(error) => error.kind().to_string(),
    }
}

fn print_comparison(comparison: &Comparison, decimals: usize) {
    let [lon1, lat1, lon2, lat2] = comparison.pair;
    let difference = comparison
        .difference()
        .map_or_else(|| String::from("-"), |d| format!("{:.decimals$}", d.0));
    println!(
        "{lon1} {lat1} {lon2} {lat2}  vincenty: {}  karney: {}  difference: {difference}",
        format_outcome(&comparison.vincenty, decimals),
        format_outcome(&comparison.karney, decimals),
    );
}

fn main() -> Result<(), anyhow::Error> {
    let options = Cli::parse();
    env_logger::Builder::new()
        .filter_level(options.verbose.log_level_filter())
        .init();
    debug!("{options:#?}");

    let ellipsoid = ellipsoid(&options)?;
    let inverse_options = InverseOptions::new(
        Radians(options.tolerance),
        options.max_iterations,
        options.series_order,
    )?;
    info!("ellipsoid a: {} f: {}", ellipsoid.a().0, ellipsoid.f());

    let mut pairs = Vec::new();
    for path in &options.args {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let file_pairs =
            parse_quadruples(&text).with_context(|| format!("parsing {}", path.display()))?;
        debug!("{}: {} pairs", path.display(), file_pairs.len());
        pairs.extend(file_pairs);
    }
    if options.args.is_empty() {
        pairs.extend_from_slice(&SAMPLE_PAIRS);
    }

    for comparison in compare_batch(&ellipsoid, &pairs, &inverse_options) {
        print_comparison(&comparison, options.decimals);
    }

    Ok(())
}
