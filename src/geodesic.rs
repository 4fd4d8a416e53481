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

//! The geodesic module contains the solvers for the inverse geodesic problem
//! on the surface of an ellipsoid and the functions that they share.
//!
//! - [`vincenty`] uses Vincenty's iteration on the longitude of the
//!   auxiliary sphere. It is simple and fast but fails to converge for
//!   nearly antipodal points.
//! - [`karney`] uses Karney's method: Newton's method on the start azimuth
//!   with a bisection fallback. It converges for all pairs of points.

pub mod karney;
pub mod vincenty;

use crate::GeoPoint;
use angle_sc::{Angle, Degrees};

/// The square root of the smallest positive normal `f64`.
/// Used to keep cosines of latitude and azimuth away from zero.
pub const TINY: f64 = 1.491_668_146_240_041_3e-154;

/// Calculate the longitude difference from `lon1` to `lon2`, reduced to
/// the range [-180, 180] degrees.
///
/// Each longitude is reduced before the subtraction, so that the difference
/// of any pair of finite longitudes is finite.
/// * `lon1`, `lon2` - the longitudes.
/// # Examples
/// ```
/// use geodesic_inverse::Degrees;
/// use geodesic_inverse::geodesic::longitude_difference;
///
/// assert_eq!(Degrees(10.0), longitude_difference(Degrees(-175.0), Degrees(-165.0)));
/// assert_eq!(Degrees(-20.0), longitude_difference(Degrees(170.0), Degrees(-210.0)));
/// assert_eq!(Degrees(0.0), longitude_difference(Degrees(0.0), Degrees(720.0)));
/// ```
#[must_use]
pub fn longitude_difference(lon1: Degrees, lon2: Degrees) -> Degrees {
    let lon1 = libm::remainder(lon1.0, 360.0);
    let lon2 = libm::remainder(lon2.0, 360.0);
    Degrees(libm::remainder(lon2 - lon1, 360.0) + 0.0)
}

/// Normalise an azimuth into the range [0, 360) degrees.
/// * `azimuth` - the azimuth.
/// # Examples
/// ```
/// use geodesic_inverse::Degrees;
/// use geodesic_inverse::geodesic::normalise_azimuth;
///
/// assert_eq!(Degrees(270.0), normalise_azimuth(Degrees(-90.0)));
/// assert_eq!(Degrees(0.0), normalise_azimuth(Degrees(360.0)));
/// ```
#[must_use]
pub fn normalise_azimuth(azimuth: Degrees) -> Degrees {
    let mut value = libm::fmod(azimuth.0, 360.0);
    if value < 0.0 {
        value += 360.0;
    }
    // a tiny negative value rounds up to 360
    if 360.0 <= value {
        value = 0.0;
    }
    Degrees(value + 0.0)
}

/// Calculate a normalised azimuth from its sine and cosine.
/// * `sin_alpha`, `cos_alpha` - the (unnormalised) sine and cosine.
#[must_use]
pub fn azimuth_from_sin_cos(sin_alpha: f64, cos_alpha: f64) -> Degrees {
    normalise_azimuth(Degrees::from(Angle::from_y_x(sin_alpha, cos_alpha)))
}

/// Whether a pair of points are exactly antipodal: on opposite sides of the
/// Equator 180° of longitude apart, or at opposite poles.
///
/// The geodesic between antipodal points is not unique, so the azimuths are
/// not unique either.
/// * `a`, `b` - the points.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_antipodal(a: &GeoPoint, b: &GeoPoint) -> bool {
    let lat1 = a.lat().0;
    let lat2 = b.lat().0;
    lat1 == -lat2
        && (libm::fabs(longitude_difference(a.lon(), b.lon()).0) == 180.0
            || libm::fabs(lat1) == 90.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use angle_sc::is_within_tolerance;

    #[test]
    fn test_longitude_difference() {
        assert_eq!(Degrees(0.0), longitude_difference(Degrees(0.0), Degrees(0.0)));
        assert_eq!(Degrees(0.0), longitude_difference(Degrees(-180.0), Degrees(180.0)));
        assert_eq!(Degrees(180.0), longitude_difference(Degrees(0.0), Degrees(180.0)));
        assert_eq!(
            180.0,
            libm::fabs(longitude_difference(Degrees(0.0), Degrees(-180.0)).0)
        );
        assert!(is_within_tolerance(
            -114.8,
            longitude_difference(Degrees(-3.6), Degrees(-118.4)).0,
            1e-12
        ));
        assert_eq!(Degrees(70.0), longitude_difference(Degrees(-150.0), Degrees(-80.0)));
        assert_eq!(Degrees(-70.0), longitude_difference(Degrees(150.0), Degrees(80.0)));
        assert_eq!(Degrees(-70.0), longitude_difference(Degrees(-150.0), Degrees(140.0)));

        // Huge longitudes of opposite sign: 1e308 = -64 (mod 360)
        assert_eq!(
            Degrees(128.0),
            longitude_difference(Degrees(1e308), Degrees(-1e308))
        );
        assert_eq!(
            Degrees(-128.0),
            longitude_difference(Degrees(-1e308), Degrees(1e308))
        );
        assert_eq!(Degrees(0.0), longitude_difference(Degrees(f64::MAX), Degrees(f64::MAX)));
        assert_eq!(
            Degrees(10.0),
            longitude_difference(Degrees(1e20 * 360.0), Degrees(10.0))
        );
    }

    #[test]
    fn test_normalise_azimuth() {
        assert_eq!(Degrees(0.0), normalise_azimuth(Degrees(0.0)));
        assert_eq!(Degrees(0.0), normalise_azimuth(Degrees(-0.0)));
        assert_eq!(Degrees(180.0), normalise_azimuth(Degrees(-180.0)));
        assert_eq!(Degrees(359.0), normalise_azimuth(Degrees(-1.0)));
        assert_eq!(Degrees(90.0), normalise_azimuth(Degrees(450.0)));
        assert_eq!(Degrees(0.0), normalise_azimuth(Degrees(-1e-20)));
        assert_eq!(Degrees(0.0), normalise_azimuth(Degrees(720.0)));
    }

    #[test]
    fn test_azimuth_from_sin_cos() {
        assert_eq!(Degrees(0.0), azimuth_from_sin_cos(0.0, 1.0));
        assert!(is_within_tolerance(
            90.0,
            azimuth_from_sin_cos(1.0, 0.0).0,
            f64::EPSILON
        ));
        assert!(is_within_tolerance(
            180.0,
            azimuth_from_sin_cos(0.0, -1.0).0,
            f64::EPSILON
        ));
        assert!(is_within_tolerance(
            315.0,
            azimuth_from_sin_cos(-2.0, 2.0).0,
            1e-12
        ));
    }

    #[test]
    fn test_is_antipodal() {
        let point = |lon, lat| GeoPoint::from_degrees(lon, lat).unwrap();

        assert!(is_antipodal(&point(0.0, 0.0), &point(180.0, 0.0)));
        assert!(is_antipodal(&point(0.0, 30.0), &point(-180.0, -30.0)));
        assert!(is_antipodal(&point(10.0, -90.0), &point(-35.0, 90.0)));
        assert!(is_antipodal(&point(-170.0, 45.0), &point(10.0, -45.0)));

        assert!(!is_antipodal(&point(0.0, 0.0), &point(179.5, 0.0)));
        assert!(!is_antipodal(&point(0.0, 30.0), &point(180.0, 30.0)));
        assert!(!is_antipodal(&point(0.0, 90.0), &point(0.0, 90.0)));
    }
}
