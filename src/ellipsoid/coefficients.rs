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

//! The series expansions of the Karney solver.
//!
//! From CFF Karney [Algorithms for geodesics](https://arxiv.org/pdf/1109.4448.pdf) and, for
//! `A2`, [Geodesics on an arbitrary ellipsoid of revolution](https://arxiv.org/pdf/2208.00492.pdf).
//!
//! Each coefficient is a polynomial in `eps` (or in the third flattening `n`)
//! held in a table of ascending powers with an integer divisor.
//! The Fourier series can be truncated to a lower `order`: the higher
//! coefficients are left as zero, which adds nothing to a Clenshaw sum.

use angle_sc::{Angle, Radians};

/// The highest order of the series expansions.
/// The `C1` and `C2` arrays hold `MAX_SERIES_ORDER + 1` terms, the first of
/// which is always zero.
pub const MAX_SERIES_ORDER: usize = 6;

/// A polynomial, in ascending powers, divided by an integer.
struct Polynomial {
    coeffs: &'static [f64],
    divisor: f64,
}

impl Polynomial {
    const fn new(coeffs: &'static [f64], divisor: f64) -> Self {
        Self { coeffs, divisor }
    }

    fn evaluate(&self, x: f64) -> f64 {
        evaluate_polynomial(self.coeffs, x) / self.divisor
    }
}

/// `C1[l] = eps^l * P(eps^2)`, Eq. 18.
const C1: [Polynomial; MAX_SERIES_ORDER] = [
    Polynomial::new(&[-16.0, 6.0, -1.0], 32.0),
    Polynomial::new(&[-128.0, 64.0, -9.0], 2048.0),
    Polynomial::new(&[-16.0, 9.0], 768.0),
    Polynomial::new(&[-5.0, 3.0], 512.0),
    Polynomial::new(&[-7.0], 1280.0),
    Polynomial::new(&[-7.0], 2048.0),
];

/// `C2[l] = eps^l * P(eps^2)`, Eq. 42.
const C2: [Polynomial; MAX_SERIES_ORDER] = [
    Polynomial::new(&[16.0, 2.0, 1.0], 32.0),
    Polynomial::new(&[384.0, 64.0, 35.0], 2048.0),
    Polynomial::new(&[80.0, 15.0], 768.0),
    Polynomial::new(&[35.0, 7.0], 512.0),
    Polynomial::new(&[63.0], 1280.0),
    Polynomial::new(&[77.0], 2048.0),
];

/// `A3[l] = P(n)`, Eq. 24.
const A3: [Polynomial; 6] = [
    Polynomial::new(&[1.0], 1.0),
    Polynomial::new(&[-1.0, 1.0], 2.0),
    Polynomial::new(&[-2.0, -1.0, 3.0], 8.0),
    Polynomial::new(&[-1.0, -3.0, -1.0], 16.0),
    Polynomial::new(&[-3.0, -2.0], 64.0),
    Polynomial::new(&[-3.0], 128.0),
];

/// `C3[l, m] = P(n)`, Eq. 25, grouped by `l`: 5, 4, 3, 2 and 1 terms in `m`.
const C3X: [Polynomial; 15] = [
    Polynomial::new(&[1.0, -1.0], 4.0),
    Polynomial::new(&[1.0, 0.0, -1.0], 8.0),
    Polynomial::new(&[3.0, 3.0, -1.0, -5.0], 64.0),
    Polynomial::new(&[5.0, 2.0, 2.0, -2.0], 128.0),
    Polynomial::new(&[12.0, 11.0, 3.0], 512.0),
    Polynomial::new(&[2.0, -3.0, 1.0], 32.0),
    Polynomial::new(&[3.0, -2.0, -3.0, 2.0], 64.0),
    Polynomial::new(&[6.0, 2.0, -9.0, -6.0], 256.0),
    Polynomial::new(&[5.0, 1.0, -2.0], 256.0),
    Polynomial::new(&[5.0, -9.0, 5.0, -1.0], 192.0),
    Polynomial::new(&[9.0, -10.0, -6.0, 10.0], 384.0),
    Polynomial::new(&[42.0, -8.0, -77.0], 3072.0),
    Polynomial::new(&[14.0, -28.0, 20.0, -7.0], 1024.0),
    Polynomial::new(&[28.0, -40.0, -7.0], 2048.0),
    Polynomial::new(&[42.0, -90.0, 75.0], 5120.0),
];

/// Evaluate the polynomial in x using
/// [Horner's method](https://en.wikipedia.org/wiki/Horner%27s_method).
/// * `coeffs` - the polynomial coefficients, in ascending powers of x.
/// * `x` - the variable.
///
/// returns zero if there are no coefficients.
#[must_use]
pub fn evaluate_polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .fold(0.0, |result, coeff| result.mul_add(x, *coeff))
}

/// The scale factor `A1`, less one.
/// CFF Karney, Eq. 17.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// # Examples
/// ```
/// use geodesic_inverse::is_within_tolerance;
/// use geodesic_inverse::ellipsoid::{calculate_sq_2nd_eccentricity, wgs84};
/// use geodesic_inverse::ellipsoid::coefficients::evaluate_a1;
///
/// // evaluate_a1 for WGS 84 latitude 45.0
/// let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
/// let a1 = evaluate_a1(eps45);
///
/// assert!(is_within_tolerance(0.003_383_990_370_212_087_5, a1, 1e-18));
/// ```
#[must_use]
pub fn evaluate_a1(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * evaluate_polynomial(&[64.0, 4.0, 1.0], eps2) / 256.0;
    (t + eps) / (1.0 - eps)
}

/// The scale factor `A2`, less one.
///
/// CFF Karney [Geodesics on an arbitrary ellipsoid of revolution](https://arxiv.org/pdf/2208.00492.pdf),
/// Eq. A1.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
#[must_use]
pub fn evaluate_a2(eps: f64) -> f64 {
    let eps2 = eps * eps;
    let t = eps2 * evaluate_polynomial(&[-192.0, -28.0, -11.0], eps2) / 256.0;
    (t - eps) / (1.0 + eps)
}

/// The coefficients of the `A3` polynomial in `eps` for an ellipsoid.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_a3(n: f64) -> [f64; 6] {
    A3.each_ref().map(|p| p.evaluate(n))
}

/// The coefficients of the `C3` polynomials in `eps` for an ellipsoid.
/// * `n` - the third flattening of the ellipsoid.
#[must_use]
pub fn evaluate_coeffs_c3x(n: f64) -> [f64; 15] {
    C3X.each_ref().map(|p| p.evaluate(n))
}

/// Evaluate Fourier coefficients of the form `eps^l * P(eps^2)` up to `order`.
fn evaluate_fourier_coeffs(
    polynomials: &[Polynomial; MAX_SERIES_ORDER],
    eps: f64,
    order: usize,
) -> [f64; MAX_SERIES_ORDER + 1] {
    let eps2 = eps * eps;
    let mut coeffs = [0.0; MAX_SERIES_ORDER + 1];
    let mut eps_l = 1.0;
    for (coeff, polynomial) in coeffs[1..].iter_mut().zip(polynomials).take(order) {
        eps_l *= eps;
        *coeff = eps_l * polynomial.evaluate(eps2);
    }
    coeffs
}

/// The coefficients `C1[l]` in the Fourier expansion of `B1`, CFF Karney, Eq. 18.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// * `order` - the order of the series, the coefficients above it are zero.
#[must_use]
pub fn evaluate_coeffs_c1(eps: f64, order: usize) -> [f64; MAX_SERIES_ORDER + 1] {
    evaluate_fourier_coeffs(&C1, eps, order)
}

/// The coefficients `C2[l]` in the Fourier expansion of `B2`, CFF Karney, Eq. 42.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// * `order` - the order of the series, the coefficients above it are zero.
#[must_use]
pub fn evaluate_coeffs_c2(eps: f64, order: usize) -> [f64; MAX_SERIES_ORDER + 1] {
    evaluate_fourier_coeffs(&C2, eps, order)
}

/// The coefficients `C3[l]` in the Fourier expansion of `I3`, CFF Karney, Eq. 26.
/// * `coeffs` - the polynomial coefficients from `evaluate_coeffs_c3x`.
/// * `eps` - epsilon the integration variable derived from Clairaut's constant.
/// * `order` - the order of the series, at most 5 terms are used.
#[must_use]
pub fn evaluate_coeffs_c3y(coeffs: &[f64; 15], eps: f64, order: usize) -> [f64; 6] {
    let mut result = [0.0; 6];
    let mut eps_l = 1.0;
    let mut start = 0;
    for l in 1..=order.min(5) {
        let end = start + 6 - l;
        eps_l *= eps;
        result[l] = eps_l * evaluate_polynomial(&coeffs[start..end], eps);
        start = end;
    }
    result
}

/// Evaluate the following:
///   `y = sum(c[i] * sin(2*i * angle), i, 1, n)`
/// using [Clenshaw summation](https://en.wikipedia.org/wiki/Clenshaw_algorithm).
/// * `coeffs` - the series coefficients, `coeffs[0]` is ignored.
/// * `angle` - the Angle.
#[must_use]
pub fn sin_cos_series(coeffs: &[f64], angle: Angle) -> Radians {
    let angle2x = angle.double();
    let sin_2x = angle2x.sin().0;
    if sin_2x.abs() < f64::EPSILON {
        return Radians(0.0);
    }

    // b[k] = c[k] + ar * b[k + 1] - b[k + 2]
    let ar = 2.0 * angle2x.cos().0;
    let (b1, _) = coeffs
        .iter()
        .skip(1)
        .rev()
        .fold((0.0, 0.0), |(b1, b2), coeff| {
            (coeff + ar.mul_add(b1, -b2), b1)
        });
    Radians(sin_2x * b1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::{calculate_3rd_flattening, calculate_sq_2nd_eccentricity, wgs84};
    use angle_sc::{is_within_tolerance, Angle, Radians};

    fn assert_coeffs(expected: &[f64], actual: &[f64]) {
        assert_eq!(expected.len(), actual.len());
        for (e, a) in expected.iter().zip(actual) {
            assert!(
                is_within_tolerance(*e, *a, 4.0 * f64::EPSILON * e.abs()),
                "expected: {e:?} actual: {a:?}"
            );
        }
    }

    #[test]
    fn test_evaluate_polynomial() {
        assert_eq!(0.0, evaluate_polynomial(&[], 0.5));
        assert_eq!(3.0, evaluate_polynomial(&[3.0], 0.5));
        assert_eq!(2.0, evaluate_polynomial(&[1.0, 2.0], 0.5));
        // 1 - 2x + 3x^2
        assert_eq!(2.0, evaluate_polynomial(&[1.0, -2.0, 3.0], 1.0));
        assert_eq!(0.75, evaluate_polynomial(&[1.0, -2.0, 3.0], 0.5));
    }

    #[test]
    fn test_evaluate_a1_a2() {
        let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
        assert_coeffs(&[0.003_383_990_370_212_087_5], &[evaluate_a1(eps45)]);
        assert_coeffs(&[-0.003_366_919_118_090_816], &[evaluate_a2(eps45)]);
        assert_eq!(0.0, evaluate_a1(0.0));
        assert_eq!(0.0, evaluate_a2(0.0));
    }

    #[test]
    fn test_evaluate_coeffs_a3() {
        // evaluate_coeffs_a3 for WGS 84 flattening
        let n = calculate_3rd_flattening(wgs84::F);
        let a3 = evaluate_coeffs_a3(n);

        assert_coeffs(
            &[
                1.0,
                -0.499_160_389_806_808_16,
                -0.250_208_845_130_383_2,
                -0.062_815_030_058_766_07,
                -0.046_927_475_637_074_494,
                -0.023_437_5,
            ],
            &a3,
        );

        // On a sphere
        assert_eq!([1.0, -0.5, -0.25, -0.0625, -0.046_875, -0.023_437_5], evaluate_coeffs_a3(0.0));
    }

    #[test]
    fn test_evaluate_coeffs_c1() {
        // evaluate_coeffs_c1 for WGS 84 latitude 45.0
        let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
        let c1 = evaluate_coeffs_c1(eps45, MAX_SERIES_ORDER);

        assert_coeffs(
            &[
                0.0,
                -0.001_684_867_011_048_848_5,
                -7.096_962_259_101_07e-7,
                -7.971_653_346_618_919e-10,
                -1.259_177_551_940_401e-12,
                -2.376_158_631_649_705_6e-15,
                -5.004_410_424_104_756e-18,
            ],
            &c1,
        );

        // Truncated
        let c1_2 = evaluate_coeffs_c1(eps45, 2);
        assert_eq!(c1[1], c1_2[1]);
        assert_eq!(c1[2], c1_2[2]);
        assert_eq!([0.0; 4], c1_2[3..]);
        assert_eq!([0.0; 7], evaluate_coeffs_c1(eps45, 0));
    }

    #[test]
    fn test_evaluate_coeffs_c2() {
        // evaluate_coeffs_c2 for WGS 84 latitude 45.0
        let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
        let c2 = evaluate_coeffs_c2(eps45, MAX_SERIES_ORDER);

        assert_coeffs(
            &[
                0.0,
                0.001_684_876_577_093_965_8,
                2.129_104_795_318_516e-6,
                3.985_860_618_432_769e-9,
                8.814_322_934_149_593e-12,
                2.138_542_768_484_735e-14,
                5.504_851_466_515_231_5e-17,
            ],
            &c2,
        );
    }

    #[test]
    fn test_evaluate_coeffs_c3() {
        // evaluate_coeffs_c3x for WGS 84 flattening
        let n = calculate_3rd_flattening(wgs84::F);
        let c3x = evaluate_coeffs_c3x(n);

        assert_coeffs(
            &[
                0.249_580_194_903_404_08,
                0.124_999_647_527_361_74,
                0.046_953_669_026_607_43,
                0.039_088_781_803_632_12,
                0.023_473_593_522_643_63,
                0.062_342_661_206_936_094,
                0.046_822_392_333_655_975,
                0.023_450_519_665_361_755,
                0.019_537_787_425_094_42,
                0.025_963_026_618_192_93,
                0.023_393_726_366_666_315,
                0.013_667_431_352_136_642,
                0.013_626_013_859_041_152,
                0.013_639_068_088_904_74,
                0.008_173_648_759_532_895,
            ],
            &c3x,
        );

        let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
        let c3y = evaluate_coeffs_c3y(&c3x, eps45, MAX_SERIES_ORDER);
        assert_coeffs(
            &[
                0.0,
                0.000_842_443_653_446_302_3,
                7.097_082_938_784_26e-7,
                9.964_762_770_100_143e-10,
                1.762_873_359_582_534_2e-12,
                3.551_430_592_372_479_5e-15,
            ],
            &c3y,
        );

        // The C3 series has at most 5 terms
        assert_eq!(c3y, evaluate_coeffs_c3y(&c3x, eps45, 5));
        let c3y_1 = evaluate_coeffs_c3y(&c3x, eps45, 1);
        assert_eq!(c3y[1], c3y_1[1]);
        assert_eq!([0.0; 4], c3y_1[2..]);
    }

    #[test]
    fn test_sin_cos_series() {
        let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
        let angle = Angle::from(Radians(0.1 * std::f64::consts::PI));

        let c1 = evaluate_coeffs_c1(eps45, MAX_SERIES_ORDER);
        assert!(is_within_tolerance(
            -0.000_991_015_701_278_263_4,
            sin_cos_series(&c1, angle).0,
            1e-18
        ));

        let n = calculate_3rd_flattening(wgs84::F);
        let c3y = evaluate_coeffs_c3y(&evaluate_coeffs_c3x(n), eps45, MAX_SERIES_ORDER);
        assert!(is_within_tolerance(
            0.000_495_851_876_822_136_88,
            sin_cos_series(&c3y, angle).0,
            1e-18
        ));
    }

    #[test]
    fn test_sin_cos_series_truncated() {
        let eps45 = calculate_sq_2nd_eccentricity(wgs84::F) / 2.0;
        let angle = Angle::from(Radians(0.1 * std::f64::consts::PI));

        // First order: c1[1] * sin(2 * angle)
        let c1 = evaluate_coeffs_c1(eps45, 1);
        let first = sin_cos_series(&c1, angle);
        let expected = c1[1] * libm::sin(0.2 * std::f64::consts::PI);
        assert!(is_within_tolerance(expected, first.0, f64::EPSILON));

        // Zero coefficients add nothing to the sum
        assert_eq!(first, sin_cos_series(&c1[..2], angle));

        // Each extra order only adds a smaller correction
        let second = sin_cos_series(&evaluate_coeffs_c1(eps45, 2), angle);
        let full = sin_cos_series(&evaluate_coeffs_c1(eps45, MAX_SERIES_ORDER), angle);
        assert!(libm::fabs(full.0 - second.0) < libm::fabs(full.0 - first.0));
        assert!(libm::fabs(full.0 - first.0) < 1e-6);
    }

    #[test]
    fn test_sin_cos_series_zero_angle() {
        let c2 = evaluate_coeffs_c2(0.001, MAX_SERIES_ORDER);
        assert_eq!(0.0, sin_cos_series(&c2, Angle::from(Radians(0.0))).0);
        assert_eq!(
            0.0,
            sin_cos_series(&c2, Angle::from(Radians(std::f64::consts::FRAC_PI_2))).0
        );
        assert_eq!(0.0, sin_cos_series(&[], Angle::from(Radians(0.5))).0);
    }
}
