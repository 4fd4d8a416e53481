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

//! T. Vincenty's solution of the inverse geodesic problem.
//!
//! See [Direct and Inverse Solutions of Geodesics on the Ellipsoid with
//! application of nested equations](https://www.ngs.noaa.gov/PUBS_LIB/inverse.pdf),
//! Survey Review, 1975.
//!
//! The series coefficients `A` and `B` use Vincenty's later formulation in
//! terms of `k1`, see [Geodetic inverse solution between antipodal points](https://geographiclib.sourceforge.io/geodesic-papers/vincenty75b.pdf).
//!
//! The method iterates on the longitude difference on the auxiliary sphere,
//! `lambda`. It fails to converge for nearly antipodal points, where
//! `lambda` overshoots past π.

#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]

use super::{azimuth_from_sin_cos, is_antipodal, longitude_difference};
use crate::{Angle, Degrees, Ellipsoid, GeoPoint, GeodesicError, InverseOptions, InverseResult};
use crate::{Metres, Radians};

/// The sine and cosine of a parametric latitude.
#[derive(Clone, Copy, Debug)]
struct Reduced {
    sin_u: f64,
    cos_u: f64,
}

impl Reduced {
    fn new(ellipsoid: &Ellipsoid, lat: Degrees) -> Self {
        let beta = ellipsoid.calculate_parametric_latitude(Angle::from(lat));
        Self {
            sin_u: beta.sin().0,
            cos_u: beta.cos().0,
        }
    }
}

/// The great circle between the points on the auxiliary sphere for a given
/// longitude difference, `lambda`.
#[derive(Clone, Copy, Debug)]
struct AuxiliaryArc {
    sin_lambda: f64,
    cos_lambda: f64,
    sin_sigma: f64,
    cos_sigma: f64,
    sigma: f64,
    sin_alpha: f64,
    sq_cos_alpha: f64,
    cos_2sigma_m: f64,
}

impl AuxiliaryArc {
    fn new(u1: Reduced, u2: Reduced, lambda: f64) -> Self {
        let sin_lambda = libm::sin(lambda);
        let cos_lambda = libm::cos(lambda);

        let sin_sigma = libm::hypot(
            u2.cos_u * sin_lambda,
            u1.cos_u * u2.sin_u - u1.sin_u * u2.cos_u * cos_lambda,
        );
        let cos_sigma = u1.sin_u * u2.sin_u + u1.cos_u * u2.cos_u * cos_lambda;
        let sigma = libm::atan2(sin_sigma, cos_sigma);

        // sin_sigma is only zero at coincident points or opposite poles,
        // where the arc is a meridian
        let sin_alpha = if sin_sigma == 0.0 {
            0.0
        } else {
            u1.cos_u * u2.cos_u * sin_lambda / sin_sigma
        };
        let sq_cos_alpha = (1.0 - sin_alpha) * (1.0 + sin_alpha);

        // cos_2sigma_m is zero on the Equator
        let cos_2sigma_m = if sq_cos_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * u1.sin_u * u2.sin_u / sq_cos_alpha
        };

        Self {
            sin_lambda,
            cos_lambda,
            sin_sigma,
            cos_sigma,
            sigma,
            sin_alpha,
            sq_cos_alpha,
            cos_2sigma_m,
        }
    }

    /// Vincenty eq. 11: the difference between the longitude difference on
    /// the auxiliary sphere and on the ellipsoid.
    fn lambda_correction(&self, f: f64) -> f64 {
        let c = f / 16.0 * self.sq_cos_alpha * (4.0 + f * (4.0 - 3.0 * self.sq_cos_alpha));
        let sq_cos_2sigma_m = self.cos_2sigma_m * self.cos_2sigma_m;
        (1.0 - c)
            * f
            * self.sin_alpha
            * (self.sigma
                + c * self.sin_sigma
                    * (self.cos_2sigma_m + c * self.cos_sigma * (2.0 * sq_cos_2sigma_m - 1.0)))
    }

    /// Vincenty eqs. 3, 6 & 19: the length of the geodesic.
    fn geodesic_length(&self, ellipsoid: &Ellipsoid) -> Metres {
        let sq_u = self.sq_cos_alpha * ellipsoid.ep_2();
        let sqrt_1_u2 = libm::sqrt(1.0 + sq_u);
        let k1 = (sqrt_1_u2 - 1.0) / (sqrt_1_u2 + 1.0);
        let big_a = (1.0 + k1 * k1 / 4.0) / (1.0 - k1);
        let big_b = k1 * (1.0 - 3.0 * k1 * k1 / 8.0);

        let sq_cos_2sigma_m = self.cos_2sigma_m * self.cos_2sigma_m;
        let delta_sigma = big_b
            * self.sin_sigma
            * (self.cos_2sigma_m
                + big_b / 4.0
                    * (self.cos_sigma * (2.0 * sq_cos_2sigma_m - 1.0)
                        - big_b / 6.0
                            * self.cos_2sigma_m
                            * (4.0 * self.sin_sigma * self.sin_sigma - 3.0)
                            * (4.0 * sq_cos_2sigma_m - 3.0)));

        Metres(ellipsoid.b().0 * big_a * (self.sigma - delta_sigma))
    }
}

/// Calculate the geodesic between a pair of points using Vincenty's method.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `a`, `b` - the start and finish points.
/// * `options` - the convergence tolerance and the maximum number of
///   iterations; the series order is not used.
///
/// returns the distance between the points with the azimuth at `a` and the
/// azimuth at `b` back towards `a`.
///
/// # Errors
///
/// `GeodesicError::ConvergenceFailure` if the iteration does not converge
/// within `options.max_iterations()` or it leaves the range (-π, π]. That
/// happens for nearly antipodal points.
///
/// # Examples
/// ```
/// use geodesic_inverse::*;
/// use geodesic_inverse::geodesic::vincenty;
///
/// let options = InverseOptions::default();
/// let a = GeoPoint::from_degrees(0.0, 0.0).unwrap();
///
/// let b = GeoPoint::from_degrees(0.5, 0.5).unwrap();
/// let result = vincenty::inverse(&WGS84_ELLIPSOID, &a, &b, &options).unwrap();
/// assert!(is_within_tolerance(
///     78_451.248_031,
///     result.distance().0,
///     1e-5
/// ));
///
/// // Antipodal points
/// let b = GeoPoint::from_degrees(180.0, 0.0).unwrap();
/// let result = vincenty::inverse(&WGS84_ELLIPSOID, &a, &b, &options);
/// assert!(matches!(result, Err(GeodesicError::ConvergenceFailure { .. })));
/// ```
pub fn inverse(
    ellipsoid: &Ellipsoid,
    a: &GeoPoint,
    b: &GeoPoint,
    options: &InverseOptions,
) -> Result<InverseResult, GeodesicError> {
    let f = ellipsoid.f();
    let u1 = Reduced::new(ellipsoid, a.lat());
    let u2 = Reduced::new(ellipsoid, b.lat());

    let big_l = longitude_difference(a.lon(), b.lon()).0.to_radians();
    let tolerance = options.tolerance().0;

    let mut lambda = big_l;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let arc = AuxiliaryArc::new(u1, u2, lambda);

        // Coincident points
        if arc.sin_sigma == 0.0 && 0.0 < arc.cos_sigma {
            return Ok(InverseResult::new(
                Metres(0.0),
                Degrees(0.0),
                Degrees(0.0),
                Radians(0.0),
                iterations,
                false,
            ));
        }

        let next_lambda = big_l + arc.lambda_correction(f);
        if core::f64::consts::PI < libm::fabs(next_lambda) {
            return Err(GeodesicError::ConvergenceFailure { iterations });
        }

        let converged = libm::fabs(next_lambda - lambda) < tolerance;
        lambda = next_lambda;
        if converged {
            break;
        }
        if options.max_iterations() <= iterations {
            return Err(GeodesicError::ConvergenceFailure { iterations });
        }
    }

    // Recalculate the arc with the final lambda
    let arc = AuxiliaryArc::new(u1, u2, lambda);
    let distance = arc.geodesic_length(ellipsoid);

    // Vincenty eq. 20
    let azimuth = azimuth_from_sin_cos(
        u2.cos_u * arc.sin_lambda,
        u1.cos_u * u2.sin_u - u1.sin_u * u2.cos_u * arc.cos_lambda,
    );
    let back_azimuth = azimuth_from_sin_cos(
        -u1.cos_u * arc.sin_lambda,
        u1.sin_u * u2.cos_u - u1.cos_u * u2.sin_u * arc.cos_lambda,
    );

    Ok(InverseResult::new(
        distance,
        azimuth,
        back_azimuth,
        Radians(arc.sigma),
        iterations,
        is_antipodal(a, b),
    ))
}
