// Copyright (c) 2024 Ken Barker

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

//! The ellipsoid module contains the reference ellipsoid parameters and the
//! functions that derive the other parameters of an ellipsoid of revolution
//! from its Semimajor axis and flattening.

#![allow(clippy::suboptimal_flops)]

pub mod coefficients;

use crate::Metres;
use angle_sc::Angle;

/// WGS 84, the ellipsoid of GPS.
///
/// See the ICAO [WGS 84 Implementation Manual](https://www.icao.int/safety/pbn/Documentation/EUROCONTROL/Eurocontrol%20WGS%2084%20Implementation%20Manual.pdf).
pub mod wgs84 {
    use crate::Metres;

    /// The equatorial radius.
    pub const A: Metres = Metres(6_378_137.0);
    /// The flattening.
    pub const F: f64 = 1.0 / 298.257_223_563;
}

/// GRS 80.
///
/// See Moritz, [Geodetic Reference System 1980](https://geodesy.geology.ohio-state.edu/course/refpapers/00740128.pdf).
/// It has the same radius as WGS 84, the flattening differs in the ninth
/// significant figure.
pub mod grs80 {
    use crate::Metres;

    /// The equatorial radius.
    pub const A: Metres = Metres(6_378_137.0);
    /// The flattening.
    pub const F: f64 = 1.0 / 298.257_222_101;
}

/// The polar radius, b = a(1 - f).
/// # Examples
/// ```
/// use geodesic_inverse::Metres;
/// use geodesic_inverse::ellipsoid::{calculate_minor_axis, wgs84};
///
/// assert_eq!(Metres(6_356_752.314_245_179), calculate_minor_axis(wgs84::A, wgs84::F));
/// ```
#[must_use]
pub fn calculate_minor_axis(a: Metres, f: f64) -> Metres {
    Metres(a.0 * (1.0 - f))
}

/// e², the square of the eccentricity: f(2 - f).
#[must_use]
pub fn calculate_sq_eccentricity(f: f64) -> f64 {
    f * (2.0 - f)
}

/// e'², the square of the second eccentricity: e² / (1 - f)².
#[must_use]
pub fn calculate_sq_2nd_eccentricity(f: f64) -> f64 {
    let one_minus_f = 1.0 - f;
    calculate_sq_eccentricity(f) / (one_minus_f * one_minus_f)
}

/// f', the second flattening: (a - b) / b.
#[must_use]
pub fn calculate_2nd_flattening(f: f64) -> f64 {
    f / (1.0 - f)
}

/// n, the third flattening: (a - b) / (a + b).
/// # Examples
/// ```
/// use geodesic_inverse::ellipsoid::{calculate_3rd_flattening, grs80, wgs84};
///
/// assert_eq!(0.0016792203863837047, calculate_3rd_flattening(wgs84::F));
/// assert!(calculate_3rd_flattening(grs80::F) > calculate_3rd_flattening(wgs84::F));
/// assert_eq!(0.0, calculate_3rd_flattening(0.0));
/// ```
#[must_use]
pub fn calculate_3rd_flattening(f: f64) -> f64 {
    f / (2.0 - f)
}

/// The expansion variable of the Karney series, CFF Karney,
/// [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf), Eqs. 9 & 16.
/// It is small and not negative.
/// * `cos_alpha0` - the cosine of the azimuth where the geodesic crosses the
///   Equator.
/// * `ep_2` - e'², the square of the second eccentricity.
#[must_use]
pub fn calculate_epsilon(cos_alpha0: f64, ep_2: f64) -> f64 {
    // k^2
    let k2 = ep_2 * cos_alpha0 * cos_alpha0;
    let denominator = libm::sqrt(1.0 + k2) + 1.0;
    k2 / (denominator * denominator)
}

/// The parametric (reduced) latitude: tan(beta) = (1 - f) tan(lat).
/// The result is a normalised sine and cosine pair, so the poles stay exact.
#[must_use]
pub fn calculate_parametric_latitude(lat: Angle, one_minus_f: f64) -> Angle {
    Angle::from_y_x(one_minus_f * lat.sin().0, lat.cos().0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::{is_within_tolerance, Degrees, Radians};

    #[test]
    fn test_derived_parameters() {
        assert_eq!(0.0066943799901413165, calculate_sq_eccentricity(wgs84::F));
        assert_eq!(0.006739496742276434, calculate_sq_2nd_eccentricity(wgs84::F));
        assert!(is_within_tolerance(
            1.0 / 297.257_223_563,
            calculate_2nd_flattening(wgs84::F),
            f64::EPSILON
        ));

        // A sphere
        assert_eq!(0.0, calculate_sq_eccentricity(0.0));
        assert_eq!(0.0, calculate_sq_2nd_eccentricity(0.0));
        assert_eq!(0.0, calculate_2nd_flattening(0.0));
        assert_eq!(wgs84::A, calculate_minor_axis(wgs84::A, 0.0));

        // e'^2 = e^2 / (1 - e^2)
        let e_2 = calculate_sq_eccentricity(grs80::F);
        assert!(is_within_tolerance(
            e_2 / (1.0 - e_2),
            calculate_sq_2nd_eccentricity(grs80::F),
            f64::EPSILON
        ));
    }

    #[test]
    fn test_calculate_epsilon() {
        let wgs84_ep2 = calculate_sq_2nd_eccentricity(wgs84::F);
        assert_eq!(0.0016792203863837047, calculate_epsilon(1.0, wgs84_ep2));
        assert_eq!(0.0016792203863837047, calculate_epsilon(-1.0, wgs84_ep2));
        assert!(is_within_tolerance(
            0.0012604720416530619,
            calculate_epsilon(libm::sqrt(0.75), wgs84_ep2),
            8.0 * f64::EPSILON
        ));
        assert_eq!(0.0, calculate_epsilon(0.0, wgs84_ep2));
    }

    #[test]
    fn test_calculate_parametric_latitude() {
        let one_minus_f = 1.0 - wgs84::F;

        // The poles and the Equator map onto themselves
        let north = calculate_parametric_latitude(Angle::from(Degrees(90.0)), one_minus_f);
        assert_eq!(1.0, north.sin().0);
        assert_eq!(0.0, north.cos().0);

        let equator = calculate_parametric_latitude(Angle::from(Degrees(0.0)), one_minus_f);
        assert_eq!(0.0, equator.sin().0);
        assert_eq!(1.0, equator.cos().0);

        for i in -89..90 {
            let latitude = f64::from(i);
            let lat = Angle::from(Degrees(latitude));
            let beta = calculate_parametric_latitude(lat, one_minus_f);

            // tan(beta) = (1 - f) tan(lat)
            let expected = libm::atan(one_minus_f * libm::tan(Radians::from(lat).0));
            assert!(is_within_tolerance(
                expected,
                Radians::from(beta).0,
                32.0 * f64::EPSILON
            ));
        }
    }
}
