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

// extern crate we're testing, same as any other code would do.
extern crate geodesic_inverse;

use csv::ReaderBuilder;
use geodesic_inverse::{
    Ellipsoid, GeoPoint, GeodesicError, InverseOptions, InverseSolver, Karney, Vincenty,
};
use std::env;
use std::path::Path;

/// The difference between a pair of azimuths, in degrees.
fn azimuth_difference(a: f64, b: f64) -> f64 {
    libm::fabs(libm::remainder(a - b, 360.0))
}

#[test]
#[ignore]
fn test_geodesic_examples() {
    // Read GEODTEST_DIR/GeodTest.dat file and run tests
    let geoid = Ellipsoid::wgs84();
    let options = InverseOptions::default();

    let filename = "GeodTest.dat";
    let dir_key = "GEODTEST_DIR";

    let p = env::var(dir_key).expect("Environment variable not found: GEODTEST_DIR");
    let path = Path::new(&p);
    let file_path = path.join(filename);
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .from_path(file_path)
        .expect("Could not read file: GeodTest.dat");
    let mut line_number = 1;
    let mut vincenty_failures = 0;
    for result in csv_reader.records() {
        let record = result.unwrap();

        let lat1 = record[0].parse::<f64>().unwrap();
        let lon1 = record[1].parse::<f64>().unwrap();
        let azi1 = record[2].parse::<f64>().unwrap();
        let lat2 = record[3].parse::<f64>().unwrap();
        let lon2 = record[4].parse::<f64>().unwrap();
        let azi2 = record[5].parse::<f64>().unwrap();
        let d_metres = record[6].parse::<f64>().unwrap();
        let d_degrees = record[7].parse::<f64>().unwrap();

        let a = GeoPoint::from_degrees(lon1, lat1).unwrap();
        let b = GeoPoint::from_degrees(lon2, lat2).unwrap();
        let result = Karney.inverse(&geoid, &a, &b, &options).unwrap();

        // Azimuths are not unique between antipodal points
        if !result.is_degenerate() {
            let delta_azimuth = azimuth_difference(azi1, result.azimuth().0);
            if 5.5e-5 < delta_azimuth {
                panic!(
                    "azimuth, line: {:?} delta: {:?} azimuth: {:?} lon2: {:?} ",
                    line_number, delta_azimuth, azi1, lon2
                );
            }

            let delta_azimuth = azimuth_difference(azi2 + 180.0, result.back_azimuth().0);
            if 5.5e-5 < delta_azimuth {
                panic!(
                    "back azimuth, line: {:?} delta: {:?} azimuth: {:?} lon2: {:?} ",
                    line_number, delta_azimuth, azi2, lon2
                );
            }
        }

        let delta_length = libm::fabs(d_degrees.to_radians() - result.arc_length().0);
        if 2.0e-11 < delta_length {
            panic!(
                "arc length, line: {:?} delta: {:?} length: {:?} lon2: {:?} ",
                line_number, delta_length, d_degrees, lon2
            );
        }

        let delta_length_m = libm::fabs(d_metres - result.distance().0);
        if line_number <= 150000 {
            let delta_length_m_ratio = delta_length_m / d_metres;
            if 1.7e-11 < delta_length_m_ratio {
                panic!(
                    "length, line: {:?} delta: {:?} length: {:?} result: {:?} ",
                    line_number, delta_length_m_ratio, d_metres, result.distance()
                );
            }
        } else if 9.0e-5 < delta_length_m {
            panic!(
                "length, line: {:?} delta: {:?} length: {:?} result: {:?} ",
                line_number, delta_length_m, d_metres, result.distance()
            );
        }

        // Vincenty either fails or agrees with the reference
        match Vincenty.inverse(&geoid, &a, &b, &options) {
            Ok(vincenty) => {
                let delta_length_m = libm::fabs(d_metres - vincenty.distance().0);
                if 1.0e-2 < delta_length_m {
                    panic!(
                        "vincenty length, line: {:?} delta: {:?} length: {:?} result: {:?} ",
                        line_number, delta_length_m, d_metres, vincenty.distance()
                    );
                }
            }
            Err(GeodesicError::ConvergenceFailure { .. }) => vincenty_failures += 1,
            Err(error) => panic!("vincenty, line: {line_number:?} error: {error}"),
        }

        //  random_df = tests_df[:100000]
        //  antipodal_df = tests_df[100000:150000]
        //  short_df = tests_df[150000:200000]
        line_number += 1;
        if 200000 < line_number {
            break;
        }
    }

    // Vincenty only fails near antipodal points
    assert!(vincenty_failures < 50000);
}
