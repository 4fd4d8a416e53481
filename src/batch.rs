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

//! The batch module runs the solvers over sequences of point pairs.
//!
//! A pair of points is a `Quadruple`: `[lon1, lat1, lon2, lat2]` in degrees.
//! Every pair is solved independently: a pair that fails is logged and
//! reported in its place in the output, the rest of the batch continues.

use crate::{
    Degrees, Ellipsoid, GeoPoint, GeodesicError, InverseOptions, InverseResult, InverseSolver,
    Karney, Metres, ParseError, Vincenty,
};
use log::{debug, warn};

/// A pair of points: `[lon1, lat1, lon2, lat2]` in degrees.
pub type Quadruple = [f64; 4];

/// The outcome of solving a `Quadruple`.
pub type BatchOutcome = Result<InverseResult, GeodesicError>;

/// A sample of point pairs from Madrid, Lisbon, Tokyo, Manaus, Calgary,
/// Miami and London.
pub const SAMPLE_PAIRS: [Quadruple; 7] = [
    [-3.6, 40.5, -118.4, 33.9],
    [-6.0, 37.0, -145.0, 11.0],
    [-150.0, 37.0, 140.0, 11.0],
    [-50.0, 7.0, 40.0, 11.0],
    [-100.0, 80.0, -140.0, 30.0],
    [-3.6, 40.5, -80.38, 25.78],
    [-3.6, 40.5, -0.5, 51.5],
];

/// Convert a `Quadruple` into a pair of `GeoPoint`s.
///
/// # Errors
///
/// `GeodesicError::InvalidCoordinate` if either point is invalid.
pub fn to_points(pair: &Quadruple) -> Result<(GeoPoint, GeoPoint), GeodesicError> {
    let a = GeoPoint::from_degrees(pair[0], pair[1])?;
    let b = GeoPoint::from_degrees(pair[2], pair[3])?;
    Ok((a, b))
}

/// Solve a single pair of points.
///
/// # Errors
///
/// `GeodesicError::InvalidCoordinate` if either point is invalid, or the
/// solver's error.
pub fn solve_pair<S: InverseSolver + ?Sized>(
    solver: &S,
    ellipsoid: &Ellipsoid,
    pair: &Quadruple,
    options: &InverseOptions,
) -> Result<InverseResult, GeodesicError> {
    let (a, b) = to_points(pair)?;
    solver.inverse(ellipsoid, &a, &b, options)
}

/// Log the outcome of solving a pair of points.
fn log_outcome(name: &str, pair: &Quadruple, outcome: &BatchOutcome) {
    match outcome {
        Ok(result) => {
            if let Some(warning) = result.warning() {
                warn!("{name} {pair:?}: {warning}");
            }
            debug!(
                "{name} {pair:?}: {} m in {} iterations",
                result.distance().0,
                result.iterations()
            );
        }
        Err(error) => warn!("{name} {pair:?}: {}, skipped: {error}", error.kind()),
    }
}

/// Solve a batch of point pairs, in order.
/// * `solver` - the solver.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `pairs` - the point pairs.
/// * `options` - the solver options.
///
/// returns the outcome of each pair, in the same order as `pairs`.
#[must_use]
pub fn solve_batch<S: InverseSolver + ?Sized>(
    solver: &S,
    ellipsoid: &Ellipsoid,
    pairs: &[Quadruple],
    options: &InverseOptions,
) -> Vec<BatchOutcome> {
    pairs
        .iter()
        .map(|pair| {
            let outcome = solve_pair(solver, ellipsoid, pair, options);
            log_outcome(solver.name(), pair, &outcome);
            outcome
        })
        .collect()
}

/// The distance, azimuth and back azimuth of the successful outcomes,
/// skipping failures.
#[must_use]
pub fn triples(outcomes: &[BatchOutcome]) -> Vec<(Metres, Degrees, Degrees)> {
    outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().ok().map(InverseResult::triple))
        .collect()
}

/// The `Vincenty` and `Karney` solutions for a pair of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    pub pair: Quadruple,
    pub vincenty: BatchOutcome,
    pub karney: BatchOutcome,
}

impl Comparison {
    /// The absolute difference between the distances, if both solvers
    /// succeeded.
    #[must_use]
    pub fn difference(&self) -> Option<Metres> {
        match (&self.vincenty, &self.karney) {
            (Ok(vincenty), Ok(karney)) => Some(Metres(libm::fabs(
                vincenty.distance().0 - karney.distance().0,
            ))),
            _ => None,
        }
    }
}

/// Solve a batch of point pairs with both the `Vincenty` and `Karney`
/// solvers.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `pairs` - the point pairs.
/// * `options` - the solver options.
#[must_use]
pub fn compare_batch(
    ellipsoid: &Ellipsoid,
    pairs: &[Quadruple],
    options: &InverseOptions,
) -> Vec<Comparison> {
    let vincenty = solve_batch(&Vincenty, ellipsoid, pairs, options);
    let karney = solve_batch(&Karney, ellipsoid, pairs, options);
    pairs
        .iter()
        .zip(vincenty.into_iter().zip(karney))
        .map(|(pair, (vincenty, karney))| Comparison {
            pair: *pair,
            vincenty,
            karney,
        })
        .collect()
}

/// Parse point pairs from text: one `Quadruple` per line, the values
/// separated by whitespace or commas.
/// Blank lines and lines starting with `#` are ignored.
///
/// # Errors
///
/// `ParseError` naming the first line that is not four numbers.
///
/// # Examples
/// ```
/// use geodesic_inverse::batch::parse_quadruples;
///
/// let text = "# lon1 lat1 lon2 lat2\n-3.6, 40.5, -118.4, 33.9\n\n0 0 180 0\n";
/// let pairs = parse_quadruples(text).unwrap();
/// assert_eq!(vec![[-3.6, 40.5, -118.4, 33.9], [0.0, 0.0, 180.0, 0.0]], pairs);
/// ```
pub fn parse_quadruples(text: &str) -> Result<Vec<Quadruple>, ParseError> {
    let mut pairs = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect();
        if fields.len() != 4 {
            return Err(ParseError::FieldCount {
                line: index + 1,
                found: fields.len(),
            });
        }

        let mut pair = [0.0; 4];
        for (value, field) in pair.iter_mut().zip(fields) {
            *value = field.parse().map_err(|_| ParseError::InvalidNumber {
                line: index + 1,
                text: field.to_string(),
            })?;
        }
        pairs.push(pair);
    }
    Ok(pairs)
}
