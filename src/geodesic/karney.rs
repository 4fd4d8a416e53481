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

//! Charles Karney's solution of the inverse geodesic problem.
//!
//! See CFF Karney [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf),
//! as used in [GeographicLib](https://geographiclib.sourceforge.io/).
//!
//! The points are mapped onto the auxiliary sphere. Meridional, equatorial
//! and very short lines are solved directly, otherwise the start azimuth is
//! found with Newton's method on the longitude difference. When a Newton
//! step does not reduce the longitude error, the azimuth is bisected within
//! a bracket that shrinks on every iteration, so the solver converges for
//! all pairs of points, including antipodal points.

#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::too_many_arguments)]

use super::{azimuth_from_sin_cos, is_antipodal, longitude_difference, TINY};
use crate::ellipsoid::coefficients::{
    evaluate_a1, evaluate_a2, evaluate_coeffs_c1, evaluate_coeffs_c2, sin_cos_series,
    MAX_SERIES_ORDER,
};
use crate::{Angle, Degrees, Ellipsoid, GeoPoint, GeodesicError, InverseOptions, InverseResult};
use crate::{Metres, Radians};

/// The square root of `f64::EPSILON`.
const SQRT_EPSILON: f64 = 1.490_116_119_384_765_6e-8;

/// Newton's method is only used for this many iterations, then the solver
/// just bisects.
const MAX_NEWTON_ITERATIONS: u32 = 20;

/// Normalise a sine and cosine pair.
#[must_use]
fn normalise(y: f64, x: f64) -> (f64, f64) {
    let r = libm::hypot(y, x);
    (y / r, x / r)
}

/// Estimate omega12 by solving the astroid problem.
/// Solve k^4+2*k^3-(x^2+y^2-1)*k^2-2*y^2*k-y^2 = 0 for positive root k.
/// * `x`, `y` - astroid parameters, see Karney section 7.
///
/// returns the solution to the astroid problem.
#[must_use]
fn calculate_astroid(x: f64, y: f64) -> f64 {
    let p = x * x;
    let q = y * y;
    let r = (p + q - 1.0) / 6.0;

    // y = 0 with |x| <= 1
    if (q <= 0.0) && (r <= 0.0) {
        0.0
    } else {
        let s = p * q / 4.0;
        let r2 = r * r;
        let r3 = r * r2;
        let mut u = r;

        // The discriminant of the quadratic equation for T3.
        // This is zero on the evolute curve p^(1/3)+q^(1/3) = 1
        let discriminant = s * (s + 2.0 * r3);
        if 0.0 <= discriminant {
            let mut t3 = s + r3;
            // Pick the sign on the sqrt to maximize abs(T3), to minimise loss
            // of precision due to cancellation.
            t3 += if t3 < 0.0 {
                -libm::sqrt(discriminant)
            } else {
                libm::sqrt(discriminant)
            };
            let t = libm::cbrt(t3);
            u += if t == 0.0 { 0.0 } else { t + r2 / t };
        } else {
            // T is complex, but the way u is defined the result is real.
            let angle = libm::atan2(libm::sqrt(-discriminant), -(s + r3));
            // Choose the cube root which avoids cancellation.
            // Note: discriminant < 0 implies that r < 0.
            u += 2.0 * r * libm::cos(angle / 3.0);
        }

        let v = libm::sqrt(u * u + q); // guaranteed positive
        let uv = if u < 0.0 { q / (v - u) } else { u + v }; // u+v, guaranteed positive
        let w = (uv - q) / (2.0 * v); // positive?

        // Rearrange expression for k to avoid loss of accuracy due to subtraction.
        // Division by 0 not possible because uv > 0, w >= 0.
        uv / (libm::sqrt(uv + w * w) + w) // guaranteed positive
    }
}

/// Calculate the reduced length of a geodesic divided by the Semiminor axis,
/// CFF Karney, Eq. 38.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// * `sigma12` - the great circle length on the auxiliary sphere.
/// * `sigma1`, `sigma2` - the arc lengths from the Equator crossing.
/// * `dn1`, `dn2` - `sqrt(1 + ep_2 * sin(beta)^2)` at the start and finish.
#[must_use]
fn calculate_reduced_length(
    eps: f64,
    sigma12: f64,
    sigma1: Angle,
    dn1: f64,
    sigma2: Angle,
    dn2: f64,
) -> f64 {
    let a1 = evaluate_a1(eps);
    let a2 = evaluate_a2(eps);
    let m0x = a1 - a2;

    let a1p1 = 1.0 + a1;
    let a2p1 = 1.0 + a2;

    let ca = evaluate_coeffs_c1(eps, MAX_SERIES_ORDER);
    let mut cb = evaluate_coeffs_c2(eps, MAX_SERIES_ORDER);

    // ca.len() == cb.len()
    for i in 1..cb.len() {
        cb[i] = a1p1 * ca[i] - a2p1 * cb[i];
    }

    let j12 = m0x * sigma12 + (sin_cos_series(&cb, sigma2) - sin_cos_series(&cb, sigma1)).0;
    dn2 * (sigma1.cos().0 * sigma2.sin().0)
        - dn1 * (sigma1.sin().0 * sigma2.cos().0)
        - sigma1.cos().0 * sigma2.cos().0 * j12
}

/// Convert a great circle length on the auxiliary sphere to a geodesic
/// length on the ellipsoid, CFF Karney, Eqs. 7, 15 & 17.
/// * `order` - the order of the `C1` series.
#[must_use]
fn convert_radians_to_metres(
    ellipsoid: &Ellipsoid,
    eps: f64,
    sigma12: f64,
    sigma1: Angle,
    sigma2: Angle,
    order: usize,
) -> Metres {
    let c1 = evaluate_coeffs_c1(eps, order);
    let b12 = sin_cos_series(&c1, sigma2) - sin_cos_series(&c1, sigma1);
    Metres(ellipsoid.b().0 * (1.0 + evaluate_a1(eps)) * (sigma12 + b12.0))
}

/// A parametric latitude on the auxiliary sphere.
#[derive(Clone, Copy, Debug)]
struct Beta {
    sin: f64,
    cos: f64,
    /// `sqrt(1 + ep_2 * sin(beta)^2)`
    dn: f64,
}

impl Beta {
    fn new(ellipsoid: &Ellipsoid, lat: Degrees) -> Self {
        let beta = ellipsoid.calculate_parametric_latitude(Angle::from(lat));
        let sin = beta.sin().0;
        Self {
            sin,
            // keep away from the poles
            cos: TINY.max(beta.cos().0),
            dn: libm::sqrt(1.0 + ellipsoid.ep_2() * sin * sin),
        }
    }
}

/// The start and finish azimuths and the length of a geodesic in
/// canonical form: the start latitude is not North of the Equator and the
/// longitude difference is not negative.
#[derive(Clone, Copy, Debug)]
struct Solution {
    sin_alpha1: f64,
    cos_alpha1: f64,
    sin_alpha2: f64,
    cos_alpha2: f64,
    sigma12: f64,
    distance: Metres,
    iterations: u32,
}

/// The geodesic leaving `beta1` with azimuth `alpha1`.
#[derive(Clone, Copy, Debug)]
struct Lambda12 {
    /// The difference between the longitude difference of the geodesic and
    /// the required longitude difference.
    v: f64,
    /// The derivative of `v` with respect to `alpha1`.
    dv: f64,
    sin_alpha2: f64,
    cos_alpha2: f64,
    sigma12: f64,
    sigma1: Angle,
    sigma2: Angle,
    eps: f64,
}

/// Calculate the longitude difference error of the geodesic leaving `beta1`
/// with azimuth `alpha1` when it reaches the latitude of `beta2`.
/// * `slam12`, `clam12` - the sine and cosine of the required longitude
///   difference.
/// * `order` - the order of the longitude series.
#[must_use]
fn calculate_lambda12(
    ellipsoid: &Ellipsoid,
    beta1: Beta,
    beta2: Beta,
    sin_alpha1: f64,
    cos_alpha1: f64,
    slam12: f64,
    clam12: f64,
    order: usize,
) -> Lambda12 {
    // Break the degeneracy of an equatorial line
    let cos_alpha1 = if beta1.sin == 0.0 && cos_alpha1 == 0.0 {
        -TINY
    } else {
        cos_alpha1
    };

    // Clairaut's constant and the azimuth at the Equator crossing
    let sin_alpha0 = sin_alpha1 * beta1.cos;
    let cos_alpha0 = libm::hypot(cos_alpha1, sin_alpha1 * beta1.sin);

    // The arc and longitude from the Equator crossing to the start
    let sin_omega1 = sin_alpha0 * beta1.sin;
    let cos_omega1 = cos_alpha1 * beta1.cos;
    let sigma1 = Angle::from_y_x(beta1.sin, cos_omega1);

    // The azimuth at the finish
    let sin_alpha2 = if beta2.cos == beta1.cos {
        sin_alpha1
    } else {
        sin_alpha0 / beta2.cos
    };
    let cos_alpha2 = if beta2.cos != beta1.cos || libm::fabs(beta2.sin) != -beta1.sin {
        let t = if beta1.cos < -beta1.sin {
            (beta2.cos - beta1.cos) * (beta1.cos + beta2.cos)
        } else {
            (beta1.sin - beta2.sin) * (beta1.sin + beta2.sin)
        };
        let cos_alpha1_beta1 = cos_alpha1 * beta1.cos;
        libm::sqrt(cos_alpha1_beta1 * cos_alpha1_beta1 + t) / beta2.cos
    } else {
        libm::fabs(cos_alpha1)
    };

    // The arc and longitude from the Equator crossing to the finish
    let sin_omega2 = sin_alpha0 * beta2.sin;
    let cos_omega2 = cos_alpha2 * beta2.cos;
    let sigma2 = Angle::from_y_x(beta2.sin, cos_omega2);

    let sigma12 = libm::atan2(
        0.0_f64.max(sigma1.cos().0 * sigma2.sin().0 - sigma1.sin().0 * sigma2.cos().0),
        sigma1.cos().0 * sigma2.cos().0 + sigma1.sin().0 * sigma2.sin().0,
    );

    // The longitude difference on the auxiliary sphere, less the required
    // longitude difference
    let sin_omega12 = 0.0_f64.max(cos_omega1 * sin_omega2 - sin_omega1 * cos_omega2);
    let cos_omega12 = cos_omega1 * cos_omega2 + sin_omega1 * sin_omega2;
    let eta = libm::atan2(
        sin_omega12 * clam12 - cos_omega12 * slam12,
        cos_omega12 * clam12 + sin_omega12 * slam12,
    );

    // The difference between the longitudes on the sphere and the ellipsoid
    let eps = ellipsoid.calculate_epsilon(cos_alpha0);
    let c3 = ellipsoid.calculate_c3y(eps, order);
    let b312 = sin_cos_series(&c3, sigma2) - sin_cos_series(&c3, sigma1);
    let domega12 =
        -ellipsoid.f() * ellipsoid.calculate_a3f(eps, order) * sin_alpha0 * (sigma12 + b312.0);

    let dv = if cos_alpha2 == 0.0 {
        -2.0 * ellipsoid.one_minus_f() * beta1.dn / beta1.sin
    } else {
        calculate_reduced_length(eps, sigma12, sigma1, beta1.dn, sigma2, beta2.dn)
            * ellipsoid.one_minus_f()
            / (cos_alpha2 * beta2.cos)
    };

    Lambda12 {
        v: eta + domega12,
        dv,
        sin_alpha2,
        cos_alpha2,
        sigma12,
        sigma1,
        sigma2,
        eps,
    }
}

/// Solve a geodesic that runs along a meridian, or over a pole.
///
/// returns None if the meridian is not the shortest path, i.e. the points
/// are nearly antipodal and on opposite sides of the Equator.
#[must_use]
fn solve_meridian(
    ellipsoid: &Ellipsoid,
    beta1: Beta,
    beta2: Beta,
    slam12: f64,
    clam12: f64,
    order: usize,
) -> Option<Solution> {
    let (sin_alpha1, cos_alpha1) = (slam12, clam12);
    let (sin_alpha2, cos_alpha2) = (0.0, 1.0);

    let sigma1 = Angle::from_y_x(beta1.sin, cos_alpha1 * beta1.cos);
    let sigma2 = Angle::from_y_x(beta2.sin, cos_alpha2 * beta2.cos);
    let sigma12 = libm::atan2(
        0.0_f64.max(sigma1.cos().0 * sigma2.sin().0 - sigma1.sin().0 * sigma2.cos().0),
        sigma1.cos().0 * sigma2.cos().0 + sigma1.sin().0 * sigma2.sin().0,
    );

    // eps is the third flattening on a meridian
    let eps = ellipsoid.n();
    let m12 = calculate_reduced_length(eps, sigma12, sigma1, beta1.dn, sigma2, beta2.dn);
    if sigma12 < 1.0 || 0.0 <= m12 {
        let (sigma12, distance) = if sigma12 < 3.0 * TINY {
            (0.0, Metres(0.0))
        } else {
            (
                sigma12,
                convert_radians_to_metres(ellipsoid, eps, sigma12, sigma1, sigma2, order),
            )
        };
        Some(Solution {
            sin_alpha1,
            cos_alpha1,
            sin_alpha2,
            cos_alpha2,
            sigma12,
            distance,
            iterations: 0,
        })
    } else {
        None
    }
}

/// The first estimate of the start azimuth, or the solution of a short line.
#[derive(Clone, Copy, Debug)]
enum InitialEstimate {
    Solved(Solution),
    Azimuth { sin_alpha1: f64, cos_alpha1: f64 },
}

/// Estimate the start azimuth of a geodesic from a great circle on the
/// auxiliary sphere, or for nearly antipodal points from the solution of the
/// astroid problem, CFF Karney section 7.
/// * `lam12` - the longitude difference in radians.
#[must_use]
fn estimate_initial_azimuth(
    ellipsoid: &Ellipsoid,
    beta1: Beta,
    beta2: Beta,
    lam12: f64,
    slam12: f64,
    clam12: f64,
) -> InitialEstimate {
    let f = ellipsoid.f();
    let n = ellipsoid.n();

    let sbet12 = beta2.sin * beta1.cos - beta2.cos * beta1.sin;
    let cbet12 = beta2.cos * beta1.cos + beta2.sin * beta1.sin;
    let sbet12a = beta2.sin * beta1.cos + beta2.cos * beta1.sin;

    // Short lines use the longitude scale at the mid point
    let short_line = 0.0 <= cbet12 && sbet12 < 0.5 && beta2.cos * lam12 < 0.5;
    let (somg12, comg12, dnm) = if short_line {
        let mut sbetm2 = (beta1.sin + beta2.sin) * (beta1.sin + beta2.sin);
        sbetm2 /= sbetm2 + (beta1.cos + beta2.cos) * (beta1.cos + beta2.cos);
        let dnm = libm::sqrt(1.0 + ellipsoid.ep_2() * sbetm2);
        let omg12 = lam12 / (ellipsoid.one_minus_f() * dnm);
        (libm::sin(omg12), libm::cos(omg12), dnm)
    } else {
        (slam12, clam12, 1.0)
    };

    // The great circle azimuth on the auxiliary sphere
    let mut sin_alpha1 = beta2.cos * somg12;
    let mut cos_alpha1 = if 0.0 <= comg12 {
        sbet12 + beta2.cos * beta1.sin * somg12 * somg12 / (1.0 + comg12)
    } else {
        sbet12a - beta2.cos * beta1.sin * somg12 * somg12 / (1.0 - comg12)
    };

    let ssig12 = libm::hypot(sin_alpha1, cos_alpha1);
    let csig12 = beta1.sin * beta2.sin + beta1.cos * beta2.cos * comg12;

    let etol2 = 0.1 * SQRT_EPSILON / libm::sqrt(f.max(0.001) * 1.0_f64.min(1.0 - f / 2.0) / 2.0);
    if short_line && ssig12 < etol2 {
        // The great circle is accurate enough
        let sin_alpha2 = beta1.cos * somg12;
        let cos_alpha2 = sbet12
            - beta1.cos
                * beta2.sin
                * if 0.0 <= comg12 {
                    somg12 * somg12 / (1.0 + comg12)
                } else {
                    1.0 - comg12
                };
        let (sin_alpha2, cos_alpha2) = normalise(sin_alpha2, cos_alpha2);
        let (sin_alpha1, cos_alpha1) = normalise(sin_alpha1, cos_alpha1);
        let sigma12 = libm::atan2(ssig12, csig12);
        return InitialEstimate::Solved(Solution {
            sin_alpha1,
            cos_alpha1,
            sin_alpha2,
            cos_alpha2,
            sigma12,
            distance: Metres(sigma12 * ellipsoid.b().0 * dnm),
            iterations: 0,
        });
    }

    let nearly_antipodal = libm::fabs(n) <= 0.1
        && csig12 < 0.0
        && ssig12 < 6.0 * libm::fabs(n) * core::f64::consts::PI * beta1.cos * beta1.cos;
    if nearly_antipodal {
        // Scale the longitude and latitude differences about the antipode
        let lam12x = libm::atan2(-slam12, -clam12);
        let eps = ellipsoid.calculate_epsilon(beta1.sin);
        let lamscale = f
            * beta1.cos
            * ellipsoid.calculate_a3f(eps, MAX_SERIES_ORDER)
            * core::f64::consts::PI;
        let betscale = lamscale * beta1.cos;

        let x = lam12x / lamscale;
        let y = sbet12a / betscale;

        if -200.0 * f64::EPSILON < y && -1.0 - 1000.0 * SQRT_EPSILON < x {
            sin_alpha1 = 1.0_f64.min(-x);
            cos_alpha1 = -libm::sqrt((1.0 - sin_alpha1) * (1.0 + sin_alpha1));
        } else {
            let k = calculate_astroid(x, y);
            let omg12a = lamscale * (-x * k / (1.0 + k));
            let somg12 = libm::sin(omg12a);
            let comg12 = -libm::cos(omg12a);
            sin_alpha1 = beta2.cos * somg12;
            cos_alpha1 = sbet12a - beta2.cos * beta1.sin * somg12 * somg12 / (1.0 - comg12);
        }
    }

    let (sin_alpha1, cos_alpha1) = if 0.0 < sin_alpha1 {
        normalise(sin_alpha1, cos_alpha1)
    } else {
        (1.0, 0.0)
    };
    InitialEstimate::Azimuth {
        sin_alpha1,
        cos_alpha1,
    }
}

/// Find the start azimuth of the geodesic with Newton's method, falling
/// back to bisection.
///
/// The solution is bracketed by azimuths in [0, π]: the bracket is narrowed
/// on every iteration, and bisection is used whenever a Newton step fails to
/// reduce the longitude error or leaves the bracket.
///
/// # Errors
///
/// `GeodesicError::ConvergenceFailure` if it does not converge within
/// `options.max_iterations()`.
fn find_azimuth_and_aux_length(
    ellipsoid: &Ellipsoid,
    beta1: Beta,
    beta2: Beta,
    slam12: f64,
    clam12: f64,
    estimate: (f64, f64),
    options: &InverseOptions,
) -> Result<Solution, GeodesicError> {
    let tolerance = options.tolerance().0;
    let order = options.series_order();
    let bisection_tolerance = f64::EPSILON * SQRT_EPSILON;

    let (mut sin_alpha1, mut cos_alpha1) = estimate;

    // The bracket: alpha1 in [0, pi]
    let (mut sin_alpha1a, mut cos_alpha1a) = (TINY, 1.0);
    let (mut sin_alpha1b, mut cos_alpha1b) = (TINY, -1.0);

    let mut newton_converging = false;
    let mut bisection_converged = false;
    let mut previous_error = f64::INFINITY;

    for i in 0..options.max_iterations() {
        let lambda12 = calculate_lambda12(
            ellipsoid, beta1, beta2, sin_alpha1, cos_alpha1, slam12, clam12, order,
        );
        let v = lambda12.v;
        let abs_v = libm::fabs(v);

        if bisection_converged
            || abs_v < 2.0 * f64::EPSILON
            || (newton_converging && abs_v <= tolerance)
        {
            let distance = convert_radians_to_metres(
                ellipsoid,
                lambda12.eps,
                lambda12.sigma12,
                lambda12.sigma1,
                lambda12.sigma2,
                order,
            );
            return Ok(Solution {
                sin_alpha1,
                cos_alpha1,
                sin_alpha2: lambda12.sin_alpha2,
                cos_alpha2: lambda12.cos_alpha2,
                sigma12: lambda12.sigma12,
                distance,
                iterations: i + 1,
            });
        }

        // Narrow the bracket
        if 0.0 < v
            && (MAX_NEWTON_ITERATIONS < i || cos_alpha1 / sin_alpha1 > cos_alpha1b / sin_alpha1b)
        {
            sin_alpha1b = sin_alpha1;
            cos_alpha1b = cos_alpha1;
        } else if v < 0.0
            && (MAX_NEWTON_ITERATIONS < i || cos_alpha1 / sin_alpha1 < cos_alpha1a / sin_alpha1a)
        {
            sin_alpha1a = sin_alpha1;
            cos_alpha1a = cos_alpha1;
        }

        let mut newton_step = false;
        if i < MAX_NEWTON_ITERATIONS && 0.0 < lambda12.dv && abs_v < previous_error {
            let dalpha1 = -v / lambda12.dv;
            let sin_dalpha1 = libm::sin(dalpha1);
            let cos_dalpha1 = libm::cos(dalpha1);
            let next_sin_alpha1 = sin_alpha1 * cos_dalpha1 + cos_alpha1 * sin_dalpha1;
            if 0.0 < next_sin_alpha1 && libm::fabs(dalpha1) < core::f64::consts::PI {
                let next_cos_alpha1 = cos_alpha1 * cos_dalpha1 - sin_alpha1 * sin_dalpha1;
                (sin_alpha1, cos_alpha1) = normalise(next_sin_alpha1, next_cos_alpha1);
                newton_converging = abs_v <= tolerance;
                newton_step = true;
            }
        }
        previous_error = abs_v;

        if !newton_step {
            // Bisect the bracket
            (sin_alpha1, cos_alpha1) = normalise(
                f64::midpoint(sin_alpha1a, sin_alpha1b),
                f64::midpoint(cos_alpha1a, cos_alpha1b),
            );
            newton_converging = false;
            bisection_converged = libm::fabs(sin_alpha1a - sin_alpha1) + (cos_alpha1a - cos_alpha1)
                < bisection_tolerance
                || libm::fabs(sin_alpha1 - sin_alpha1b) + (cos_alpha1 - cos_alpha1b)
                    < bisection_tolerance;
        }
    }

    Err(GeodesicError::ConvergenceFailure {
        iterations: options.max_iterations(),
    })
}

/// Calculate the geodesic between a pair of points using Karney's method.
/// * `ellipsoid` - the `Ellipsoid`.
/// * `a`, `b` - the start and finish points.
/// * `options` - the convergence tolerance, the maximum number of
///   iterations and the order of the series expansions.
///
/// returns the distance between the points with the azimuth at `a` and the
/// azimuth at `b` back towards `a`. The result is flagged as degenerate if
/// the points are antipodal.
///
/// # Errors
///
/// `GeodesicError::ConvergenceFailure` if the iteration does not converge
/// within `options.max_iterations()`; with the default options that does not
/// happen.
///
/// # Examples
/// ```
/// use geodesic_inverse::*;
/// use geodesic_inverse::geodesic::karney;
///
/// let options = InverseOptions::default();
///
/// let wellington = GeoPoint::from_degrees(174.81, -41.32).unwrap();
/// let salamanca = GeoPoint::from_degrees(-5.50, 40.96).unwrap();
/// let result = karney::inverse(&WGS84_ELLIPSOID, &wellington, &salamanca, &options).unwrap();
/// assert!(is_within_tolerance(
///     19_959_679.267_353,
///     result.distance().0,
///     1e-6
/// ));
/// assert!(is_within_tolerance(
///     161.067_669_986,
///     result.azimuth().0,
///     1e-9
/// ));
///
/// // Antipodal points
/// let a = GeoPoint::from_degrees(0.0, 0.0).unwrap();
/// let b = GeoPoint::from_degrees(180.0, 0.0).unwrap();
/// let result = karney::inverse(&WGS84_ELLIPSOID, &a, &b, &options).unwrap();
/// assert!(is_within_tolerance(
///     20_003_931.458_625,
///     result.distance().0,
///     1e-6
/// ));
/// assert!(result.is_degenerate());
/// ```
pub fn inverse(
    ellipsoid: &Ellipsoid,
    a: &GeoPoint,
    b: &GeoPoint,
    options: &InverseOptions,
) -> Result<InverseResult, GeodesicError> {
    let order = options.series_order();
    let line = CanonicalLine::new(ellipsoid, a, b);

    let meridian = if line.lat1 == -90.0 || line.slam12 == 0.0 {
        solve_meridian(
            ellipsoid,
            line.beta1,
            line.beta2,
            line.slam12,
            line.clam12,
            order,
        )
    } else {
        None
    };

    let solution = if let Some(solution) = meridian {
        solution
    } else if line.beta1.sin == 0.0
        && (ellipsoid.f() <= 0.0 || ellipsoid.f() * 180.0 <= line.lon12s)
    {
        // Along the Equator
        Solution {
            sin_alpha1: 1.0,
            cos_alpha1: 0.0,
            sin_alpha2: 1.0,
            cos_alpha2: 0.0,
            sigma12: line.lam12 / ellipsoid.one_minus_f(),
            distance: Metres(ellipsoid.a().0 * line.lam12),
            iterations: 0,
        }
    } else {
        match estimate_initial_azimuth(
            ellipsoid,
            line.beta1,
            line.beta2,
            line.lam12,
            line.slam12,
            line.clam12,
        ) {
            InitialEstimate::Solved(solution) => solution,
            InitialEstimate::Azimuth {
                sin_alpha1,
                cos_alpha1,
            } => find_azimuth_and_aux_length(
                ellipsoid,
                line.beta1,
                line.beta2,
                line.slam12,
                line.clam12,
                (sin_alpha1, cos_alpha1),
                options,
            )?,
        }
    };

    let (azimuth, back_azimuth) = line.restore_azimuths(&solution);
    Ok(InverseResult::new(
        Metres(solution.distance.0 + 0.0),
        azimuth,
        back_azimuth,
        Radians(solution.sigma12),
        solution.iterations,
        is_antipodal(a, b),
    ))
}

/// A pair of points transformed so that the longitude difference is
/// positive and the first point is the one furthest from the Equator,
/// South of it.
struct CanonicalLine {
    lon12s: f64,
    lam12: f64,
    slam12: f64,
    clam12: f64,
    lat1: f64,
    beta1: Beta,
    beta2: Beta,
    swap_points: bool,
    lon_sign: f64,
    lat_sign: f64,
}

impl CanonicalLine {
    fn new(ellipsoid: &Ellipsoid, a: &GeoPoint, b: &GeoPoint) -> Self {
        // Make the longitude difference positive
        let lon12 = longitude_difference(a.lon(), b.lon()).0;
        let mut lon_sign = if 0.0 <= lon12 { 1.0 } else { -1.0 };
        let lon12 = libm::fabs(lon12);
        let lon12s = 180.0 - lon12;
        let (slam12, clam12) = if 90.0 < lon12 {
            let lam12s = Angle::from(Degrees(lon12s));
            (lam12s.sin().0, -lam12s.cos().0)
        } else {
            let lam12 = Angle::from(Degrees(lon12));
            (lam12.sin().0, lam12.cos().0)
        };

        // Start at the latitude furthest from the Equator
        let swap_points = libm::fabs(a.lat().0) < libm::fabs(b.lat().0);
        let (mut lat1, mut lat2) = if swap_points {
            lon_sign = -lon_sign;
            (b.lat().0, a.lat().0)
        } else {
            (a.lat().0, b.lat().0)
        };

        // Start South of the Equator
        let lat_sign = if lat1 < 0.0 { 1.0 } else { -1.0 };
        lat1 *= lat_sign;
        lat2 *= lat_sign;

        let beta1 = Beta::new(ellipsoid, Degrees(lat1));
        let mut beta2 = Beta::new(ellipsoid, Degrees(lat2));

        // Make the parametric latitudes of points at the same or opposite
        // geodetic latitudes exactly the same or opposite
        if beta1.cos < -beta1.sin {
            if beta2.cos == beta1.cos {
                beta2.sin = if beta2.sin < 0.0 {
                    beta1.sin
                } else {
                    -beta1.sin
                };
            }
        } else if libm::fabs(beta2.sin) == -beta1.sin {
            beta2.cos = beta1.cos;
        }

        Self {
            lon12s,
            lam12: lon12.to_radians(),
            slam12,
            clam12,
            lat1,
            beta1,
            beta2,
            swap_points,
            lon_sign,
            lat_sign,
        }
    }

    /// The azimuth at the start and the back azimuth at the finish of the
    /// original points.
    fn restore_azimuths(&self, solution: &Solution) -> (Degrees, Degrees) {
        if solution.sigma12 == 0.0 {
            return (Degrees(0.0), Degrees(0.0));
        }

        let (sin_alpha1, cos_alpha1, sin_alpha2, cos_alpha2) = if self.swap_points {
            (
                solution.sin_alpha2,
                solution.cos_alpha2,
                solution.sin_alpha1,
                solution.cos_alpha1,
            )
        } else {
            (
                solution.sin_alpha1,
                solution.cos_alpha1,
                solution.sin_alpha2,
                solution.cos_alpha2,
            )
        };
        let swap_sign = if self.swap_points { -1.0 } else { 1.0 };
        let sin_sign = swap_sign * self.lon_sign;
        let cos_sign = swap_sign * self.lat_sign;
        (
            azimuth_from_sin_cos(sin_alpha1 * sin_sign, cos_alpha1 * cos_sign),
            azimuth_from_sin_cos(-sin_alpha2 * sin_sign, -cos_alpha2 * cos_sign),
        )
    }
}
