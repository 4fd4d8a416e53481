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

//! geodesic-inverse
//!
//! A library for solving the inverse geodesic problem: given two points on
//! the surface of an ellipsoid, find the length of the shortest path between
//! them (the [geodesic](https://en.wikipedia.org/wiki/Geodesics_on_an_ellipsoid))
//! and the azimuths of the path at each end.
//!
//! The library provides two solvers that share the same interface, the
//! [`InverseSolver`] trait:
//!
//! - [`Vincenty`] - T. Vincenty's
//!   [iterative method](https://www.ngs.noaa.gov/PUBS_LIB/inverse.pdf).
//!   It is simple and accurate to a fraction of a millimetre, but it fails to
//!   converge for nearly antipodal points, in which case it returns
//!   [`GeodesicError::ConvergenceFailure`].
//! - [`Karney`] - Charles Karney's
//!   [algorithm](https://arxiv.org/pdf/1109.4448.pdf), as used in
//!   [GeographicLib](https://geographiclib.sourceforge.io/).
//!   It converges for all pairs of points, including antipodal points, to
//!   within a few nanometres.
//!
//! Both solvers map the points onto an auxiliary sphere using their
//! parametric latitudes, solve the problem on the sphere and then correct the
//! solution for the flattening of the ellipsoid.
//!
//! ## Design
//!
//! The `Ellipsoid` class represents an ellipsoid of revolution.
//! It is always passed to the solvers explicitly; the static
//! `WGS84_ELLIPSOID` is a convenience for the common case.
//!
//! A `GeoPoint` is a longitude and latitude in degrees, its latitude is
//! validated on construction so the solvers only ever see valid points.
//!
//! The solvers are pure functions: they return an `InverseResult` or a
//! `GeodesicError` and never log. Exactly antipodal points are reported by
//! the `InverseResult` degenerate flag, since the azimuths between them are
//! not unique.
//!
//! The library depends upon the following crates:
//!
//! - [angle-sc](https://crates.io/crates/angle-sc) - to define `Angle`,
//!   `Degrees` and `Radians` and perform trigonometric calculations;
//! - [icao_units](https://crates.io/crates/icao-units) - to define `Metres`;
//! - [libm](https://crates.io/crates/libm) - so that the transcendental
//!   functions, and hence the results, are the same on every platform;
//! - [thiserror](https://crates.io/crates/thiserror) and
//!   [log](https://crates.io/crates/log) - for errors and for logging in the
//!   `batch` module.
//!
//! ## Example
//!
//! ```
//! use geodesic_inverse::*;
//!
//! let istanbul = GeoPoint::from_degrees(29.0, 42.0).unwrap();
//! let washington = GeoPoint::from_degrees(-77.0, 39.0).unwrap();
//! let options = InverseOptions::default();
//!
//! let result = inverse(&WGS84_ELLIPSOID, &istanbul, &washington, &options).unwrap();
//! assert!(is_within_tolerance(8_339_863.136_005, result.distance().0, 1e-3));
//!
//! let vincenty = Vincenty.inverse(&WGS84_ELLIPSOID, &istanbul, &washington, &options).unwrap();
//! assert!(is_within_tolerance(result.distance().0, vincenty.distance().0, 1e-3));
//! ```

pub mod batch;
pub mod ellipsoid;
pub mod error;
pub mod geodesic;

pub use angle_sc::{is_within_tolerance, Angle, Degrees, Radians, Validate};
pub use error::{GeodesicError, GeodesicWarning, ParseError};
pub use icao_units::si::Metres;

use ellipsoid::coefficients::{evaluate_coeffs_a3, evaluate_coeffs_c3x, evaluate_coeffs_c3y};
use ellipsoid::coefficients::{evaluate_polynomial, MAX_SERIES_ORDER};
use lazy_static::lazy_static;

/// The parameters of an `Ellipsoid`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// The Semimajor axis of the ellipsoid.
    a: Metres,
    /// The flattening of the ellipsoid, a ratio.
    f: f64,

    /// The Semiminor axis of the ellipsoid.
    b: Metres,
    /// One minus the flattening ratio.
    one_minus_f: f64,
    /// The square of the Eccentricity of the ellipsoid.
    e_2: f64,
    /// The square of the second Eccentricity of the ellipsoid.
    ep_2: f64,
    /// The second flattening of the ellipsoid.
    f_2: f64,
    /// The third flattening of the ellipsoid.
    n: f64,

    /// The A3 series `coefficients` of the ellipsoid.
    a3: [f64; 6],
    /// The C3x series `coefficients` of the ellipsoid.
    c3x: [f64; 15],
}

impl Ellipsoid {
    /// Constructor.
    /// * `a` - the Semimajor axis of the `Ellipsoid`, greater than zero.
    /// * `f` - the flattening of the `Ellipsoid`, a ratio in [0, 1).
    ///
    /// # Errors
    ///
    /// `GeodesicError::InvalidParameter` if `a` or `f` are out of range or
    /// not finite.
    pub fn new(a: Metres, f: f64) -> Result<Self, GeodesicError> {
        if !(a.0.is_finite() && 0.0 < a.0) {
            return Err(GeodesicError::InvalidParameter {
                name: "a",
                value: a.0,
            });
        }
        if !(0.0..1.0).contains(&f) {
            return Err(GeodesicError::InvalidParameter {
                name: "f",
                value: f,
            });
        }
        Ok(Self::from_parameters(a, f))
    }

    /// Construct an `Ellipsoid` from parameters that are known to be valid.
    fn from_parameters(a: Metres, f: f64) -> Self {
        let n = ellipsoid::calculate_3rd_flattening(f);
        Self {
            a,
            f,
            b: ellipsoid::calculate_minor_axis(a, f),
            one_minus_f: 1.0 - f,
            e_2: ellipsoid::calculate_sq_eccentricity(f),
            ep_2: ellipsoid::calculate_sq_2nd_eccentricity(f),
            f_2: ellipsoid::calculate_2nd_flattening(f),
            n,
            a3: evaluate_coeffs_a3(n),
            c3x: evaluate_coeffs_c3x(n),
        }
    }

    /// Construct an `Ellipsoid` with the WGS-84 parameters.
    #[must_use]
    pub fn wgs84() -> Self {
        Self::from_parameters(ellipsoid::wgs84::A, ellipsoid::wgs84::F)
    }

    /// Construct an `Ellipsoid` with the GRS-80 parameters.
    #[must_use]
    pub fn grs80() -> Self {
        Self::from_parameters(ellipsoid::grs80::A, ellipsoid::grs80::F)
    }

    /// The Semimajor axis of the ellipsoid.
    #[must_use]
    pub const fn a(&self) -> Metres {
        self.a
    }

    /// The flattening of the ellipsoid, a ratio.
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }

    /// The Semiminor axis of the ellipsoid.
    #[must_use]
    pub const fn b(&self) -> Metres {
        self.b
    }

    /// One minus the flattening ratio.
    #[must_use]
    pub const fn one_minus_f(&self) -> f64 {
        self.one_minus_f
    }

    /// The square of the Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn e_2(&self) -> f64 {
        self.e_2
    }

    /// The square of the second Eccentricity of the ellipsoid.
    #[must_use]
    pub const fn ep_2(&self) -> f64 {
        self.ep_2
    }

    /// The second flattening of the ellipsoid.
    #[must_use]
    pub const fn f_2(&self) -> f64 {
        self.f_2
    }

    /// The third flattening of the ellipsoid.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }

    /// Calculate epsilon, the variable used in series expansions.
    /// * `cos_alpha0` - the cosine of the azimuth at the Equator crossing.
    #[must_use]
    pub fn calculate_epsilon(&self, cos_alpha0: f64) -> f64 {
        ellipsoid::calculate_epsilon(cos_alpha0, self.ep_2)
    }

    /// Calculate a3f from the first `order` A3 series `coefficients` of the
    /// ellipsoid.
    /// * `eps` - epsilon
    /// * `order` - the series order, at most 6.
    #[must_use]
    pub fn calculate_a3f(&self, eps: f64, order: usize) -> f64 {
        evaluate_polynomial(&self.a3[..order.min(MAX_SERIES_ORDER)], eps)
    }

    /// Calculate the coefficients `C3[l]` in the Fourier expansion of `I3`.
    /// * `eps` - epsilon
    /// * `order` - the series order, at most 5 coefficients are non-zero.
    #[must_use]
    pub fn calculate_c3y(&self, eps: f64, order: usize) -> [f64; 6] {
        evaluate_coeffs_c3y(&self.c3x, eps, order)
    }

    /// Convert a geodetic Latitude to a parametric Latitude on the
    /// auxiliary sphere.
    /// * `lat` - the geodetic Latitude
    #[must_use]
    pub fn calculate_parametric_latitude(&self, lat: Angle) -> Angle {
        ellipsoid::calculate_parametric_latitude(lat, self.one_minus_f)
    }
}

lazy_static! {
    /// A static instance of the WGS-84 `Ellipsoid`.
    pub static ref WGS84_ELLIPSOID: Ellipsoid = Ellipsoid::wgs84();
}

/// A position on the surface of an ellipsoid: a geodetic longitude and
/// latitude in degrees.
///
/// The latitude is in the range [-90, 90], the longitude may be any finite
/// value; the solvers reduce longitude differences modulo 360°.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    lon: Degrees,
    lat: Degrees,
}

impl Validate for GeoPoint {
    /// Test whether a `GeoPoint` is valid.
    /// Whether the longitude is finite and -90° <= `latitude` <= 90°.
    fn is_valid(&self) -> bool {
        self.lon.0.is_finite() && (-90.0..=90.0).contains(&self.lat.0)
    }
}

impl GeoPoint {
    /// Constructor.
    /// * `lon` - the longitude.
    /// * `lat` - the latitude.
    ///
    /// # Errors
    ///
    /// `GeodesicError::InvalidCoordinate` if the longitude is not finite or
    /// the latitude is not in [-90, 90].
    pub fn new(lon: Degrees, lat: Degrees) -> Result<Self, GeodesicError> {
        let point = Self { lon, lat };
        if point.is_valid() {
            Ok(point)
        } else if lon.0.is_finite() {
            Err(GeodesicError::InvalidCoordinate {
                name: "lat",
                value: lat.0,
            })
        } else {
            Err(GeodesicError::InvalidCoordinate {
                name: "lon",
                value: lon.0,
            })
        }
    }

    /// Construct a `GeoPoint` from a longitude and latitude in degrees.
    ///
    /// # Errors
    ///
    /// See [`GeoPoint::new`].
    pub fn from_degrees(lon: f64, lat: f64) -> Result<Self, GeodesicError> {
        Self::new(Degrees(lon), Degrees(lat))
    }

    /// The longitude.
    #[must_use]
    pub const fn lon(&self) -> Degrees {
        self.lon
    }

    /// The latitude.
    #[must_use]
    pub const fn lat(&self) -> Degrees {
        self.lat
    }
}

/// The default convergence tolerance, in Radians.
pub const DEFAULT_TOLERANCE: Radians = Radians(1e-12);

/// The default maximum number of iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

/// The default order of the series expansions used by the `Karney` solver.
pub const DEFAULT_SERIES_ORDER: usize = MAX_SERIES_ORDER;

/// The options of an inverse geodesic calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseOptions {
    /// The convergence tolerance.
    tolerance: Radians,
    /// The maximum number of iterations.
    max_iterations: u32,
    /// The order of the series expansions, `Karney` only.
    series_order: usize,
}

impl Default for InverseOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            series_order: DEFAULT_SERIES_ORDER,
        }
    }
}

impl InverseOptions {
    /// Constructor.
    /// * `tolerance` - the convergence tolerance, greater than zero.
    /// * `max_iterations` - the maximum number of iterations, at least one.
    /// * `series_order` - the order of the series expansions, in 1..=6.
    ///
    /// # Errors
    ///
    /// `GeodesicError::InvalidParameter` if any option is out of range.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        tolerance: Radians,
        max_iterations: u32,
        series_order: usize,
    ) -> Result<Self, GeodesicError> {
        if !(tolerance.0.is_finite() && 0.0 < tolerance.0) {
            return Err(GeodesicError::InvalidParameter {
                name: "tolerance",
                value: tolerance.0,
            });
        }
        if max_iterations == 0 {
            return Err(GeodesicError::InvalidParameter {
                name: "max_iterations",
                value: 0.0,
            });
        }
        if !(1..=MAX_SERIES_ORDER).contains(&series_order) {
            return Err(GeodesicError::InvalidParameter {
                name: "series_order",
                value: series_order as f64,
            });
        }
        Ok(Self {
            tolerance,
            max_iterations,
            series_order,
        })
    }

    /// The convergence tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> Radians {
        self.tolerance
    }

    /// The maximum number of iterations.
    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The order of the series expansions.
    #[must_use]
    pub const fn series_order(&self) -> usize {
        self.series_order
    }
}

/// The solution of an inverse geodesic calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseResult {
    /// The length of the geodesic.
    distance: Metres,
    /// The azimuth at the start point.
    azimuth: Degrees,
    /// The azimuth from the end point back towards the start point.
    back_azimuth: Degrees,
    /// The great circle length on the auxiliary sphere.
    arc_length: Radians,
    /// The number of iterations used.
    iterations: u32,
    /// Whether the points are antipodal.
    degenerate: bool,
}

impl InverseResult {
    /// Constructor.
    #[must_use]
    pub(crate) const fn new(
        distance: Metres,
        azimuth: Degrees,
        back_azimuth: Degrees,
        arc_length: Radians,
        iterations: u32,
        degenerate: bool,
    ) -> Self {
        Self {
            distance,
            azimuth,
            back_azimuth,
            arc_length,
            iterations,
            degenerate,
        }
    }

    /// The length of the geodesic, in metres.
    #[must_use]
    pub const fn distance(&self) -> Metres {
        self.distance
    }

    /// The azimuth at the start point, in the range [0, 360).
    #[must_use]
    pub const fn azimuth(&self) -> Degrees {
        self.azimuth
    }

    /// The azimuth at the end point towards the start point, in the range
    /// [0, 360).
    #[must_use]
    pub const fn back_azimuth(&self) -> Degrees {
        self.back_azimuth
    }

    /// The great circle length of the geodesic on the auxiliary sphere.
    #[must_use]
    pub const fn arc_length(&self) -> Radians {
        self.arc_length
    }

    /// The number of iterations that the solver used.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether the points are antipodal, so the azimuths are not unique.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// The warning associated with the result, if any.
    #[must_use]
    pub const fn warning(&self) -> Option<GeodesicWarning> {
        if self.degenerate {
            Some(GeodesicWarning::DegenerateInput)
        } else {
            None
        }
    }

    /// The distance, azimuth and back azimuth.
    #[must_use]
    pub const fn triple(&self) -> (Metres, Degrees, Degrees) {
        (self.distance, self.azimuth, self.back_azimuth)
    }
}

/// A solver for the inverse geodesic problem.
pub trait InverseSolver {
    /// The name of the solver.
    fn name(&self) -> &'static str;

    /// Calculate the geodesic between a pair of points on an ellipsoid.
    /// * `ellipsoid` - the `Ellipsoid`.
    /// * `a`, `b` - the start and finish points.
    /// * `options` - the tolerance, iteration limit and series order.
    ///
    /// # Errors
    ///
    /// `GeodesicError::ConvergenceFailure` if the solver does not converge
    /// within `options.max_iterations()`.
    fn inverse(
        &self,
        ellipsoid: &Ellipsoid,
        a: &GeoPoint,
        b: &GeoPoint,
        options: &InverseOptions,
    ) -> Result<InverseResult, GeodesicError>;
}

/// Vincenty's iterative inverse solver, see [`geodesic::vincenty`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vincenty;

impl InverseSolver for Vincenty {
    fn name(&self) -> &'static str {
        "Vincenty"
    }

    fn inverse(
        &self,
        ellipsoid: &Ellipsoid,
        a: &GeoPoint,
        b: &GeoPoint,
        options: &InverseOptions,
    ) -> Result<InverseResult, GeodesicError> {
        geodesic::vincenty::inverse(ellipsoid, a, b, options)
    }
}

/// Karney's inverse solver, see [`geodesic::karney`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Karney;

impl InverseSolver for Karney {
    fn name(&self) -> &'static str {
        "Karney"
    }

    fn inverse(
        &self,
        ellipsoid: &Ellipsoid,
        a: &GeoPoint,
        b: &GeoPoint,
        options: &InverseOptions,
    ) -> Result<InverseResult, GeodesicError> {
        geodesic::karney::inverse(ellipsoid, a, b, options)
    }
}

/// Calculate the geodesic between a pair of points on an ellipsoid with
/// the `Karney` solver, which converges for all pairs of points.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `a`, `b` - the start and finish points.
/// * `options` - the tolerance, iteration limit and series order.
///
/// # Errors
///
/// `GeodesicError::ConvergenceFailure` if the solver does not converge
/// within `options.max_iterations()`.
pub fn inverse(
    ellipsoid: &Ellipsoid,
    a: &GeoPoint,
    b: &GeoPoint,
    options: &InverseOptions,
) -> Result<InverseResult, GeodesicError> {
    geodesic::karney::inverse(ellipsoid, a, b, options)
}
