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

//! The error module contains the failure and warning kinds reported by the
//! geodesic solvers.

use thiserror::Error;

/// The ways in which an inverse geodesic calculation can fail.
///
/// All of them are returned to the caller: the solvers never retry beyond
/// their own bounded iteration and never log.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum GeodesicError {
    /// An ellipsoid or solver parameter is outside of its valid range.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A coordinate is outside of its valid range or not finite.
    #[error("invalid coordinate {name}: {value}")]
    InvalidCoordinate { name: &'static str, value: f64 },

    /// The solver did not meet its tolerance within the iteration limit.
    #[error("failed to converge after {iterations} iterations")]
    ConvergenceFailure { iterations: u32 },
}

impl GeodesicError {
    /// A short name for the kind of error, for reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::InvalidCoordinate { .. } => "InvalidCoordinate",
            Self::ConvergenceFailure { .. } => "ConvergenceFailure",
        }
    }
}

/// Conditions where a result is returned but should be treated with care.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeodesicWarning {
    /// The points are antipodal: the distance is well defined but the
    /// azimuths are not unique.
    #[error("antipodal points, azimuths are not unique")]
    DegenerateInput,
}

/// The ways in which a text of coordinate quadruples can be invalid.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A line does not contain four values.
    #[error("line {line}: expected 4 values, found {found}")]
    FieldCount { line: usize, found: usize },

    /// A value is not a number.
    #[error("line {line}: invalid number {text:?}")]
    InvalidNumber { line: usize, text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geodesic_error_display() {
        let error = GeodesicError::InvalidParameter {
            name: "a",
            value: -1.0,
        };
        assert_eq!("invalid parameter a: -1", error.to_string());
        assert_eq!("InvalidParameter", error.kind());

        let error = GeodesicError::InvalidCoordinate {
            name: "lat",
            value: 91.0,
        };
        assert_eq!("invalid coordinate lat: 91", error.to_string());
        assert_eq!("InvalidCoordinate", error.kind());

        let error = GeodesicError::ConvergenceFailure { iterations: 200 };
        assert_eq!("failed to converge after 200 iterations", error.to_string());
        assert_eq!("ConvergenceFailure", error.kind());
    }

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::FieldCount { line: 3, found: 5 };
        assert_eq!("line 3: expected 4 values, found 5", error.to_string());

        let error = ParseError::InvalidNumber {
            line: 7,
            text: String::from("4O.5"),
        };
        assert_eq!("line 7: invalid number \"4O.5\"", error.to_string());
    }

    #[test]
    fn test_geodesic_warning_display() {
        assert_eq!(
            "antipodal points, azimuths are not unique",
            GeodesicWarning::DegenerateInput.to_string()
        );
    }
}
