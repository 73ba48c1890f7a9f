/*
    slr-tracking, sun-safe pass planning for satellite laser ranging
    Copyright (C) 2024-onwards slr-tracking contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::PredictionError;

/// Evaluates the Lagrange interpolating polynomial through `(xs, ys)` at `x`
/// using Neville's scheme.
///
/// The abscissas must be strictly increasing; callers pass offsets from the
/// start of the sample window rather than raw day-scale values to keep the
/// divided differences well conditioned.
pub fn lagrange_eval(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, PredictionError> {
    if xs.is_empty() {
        return Err(PredictionError::InvalidInterpolationData {
            msg: "no abscissas to interpolate".to_string(),
        });
    }
    if xs.len() != ys.len() {
        return Err(PredictionError::InvalidInterpolationData {
            msg: format!("{} abscissas for {} ordinates", xs.len(), ys.len()),
        });
    }

    let mut work = ys.to_vec();
    let n = xs.len();
    for order in 1..n {
        for i in 0..n - order {
            let denom = xs[i] - xs[i + order];
            if denom.abs() < f64::EPSILON {
                return Err(PredictionError::InvalidInterpolationData {
                    msg: format!("coincident abscissas at index {i}"),
                });
            }
            work[i] = ((x - xs[i + order]) * work[i] - (x - xs[i]) * work[i + 1]) / denom;
        }
    }

    if work[0].is_nan() {
        return Err(PredictionError::InvalidInterpolationData {
            msg: "interpolation produced NaN".to_string(),
        });
    }
    Ok(work[0])
}

/// First-order interpolation between the two samples bracketing `x`.
pub fn linear_eval(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x: f64,
) -> Result<f64, PredictionError> {
    if (x1 - x0).abs() < f64::EPSILON {
        return Err(PredictionError::InvalidInterpolationData {
            msg: "coincident bracketing samples".to_string(),
        });
    }
    Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

#[cfg(test)]
mod ut_lagrange {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reproduces_polynomials_exactly() {
        // A cubic is exactly represented by any 4+ point Lagrange interpolation.
        let cubic = |x: f64| 2.0 * x * x * x - 3.0 * x * x + x - 7.0;
        let xs: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| cubic(x)).collect();
        for x in [0.5, 2.25, 3.99, 6.5] {
            assert_abs_diff_eq!(lagrange_eval(&xs, &ys, x).unwrap(), cubic(x), epsilon = 1e-8);
        }
    }

    #[test]
    fn interpolates_smooth_motion() {
        // One minute of a 7.5 km/s circular arc sampled every 10 s.
        let omega = 7500.0 / 7.0e6;
        let xs: Vec<f64> = (0..7).map(|i| i as f64 * 10.0).collect();
        let ys: Vec<f64> = xs.iter().map(|&t| 7.0e6 * (omega * t).cos()).collect();
        let t = 33.3;
        let expected = 7.0e6 * (omega * t).cos();
        assert_abs_diff_eq!(lagrange_eval(&xs, &ys, t).unwrap(), expected, epsilon = 1e-3);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(lagrange_eval(&[], &[], 0.0).is_err());
        assert!(lagrange_eval(&[0.0, 1.0], &[1.0], 0.5).is_err());
        assert!(lagrange_eval(&[1.0, 1.0], &[0.0, 1.0], 1.0).is_err());
        assert!(linear_eval(2.0, 0.0, 2.0, 1.0, 2.0).is_err());
    }

    #[test]
    fn linear_is_exact_on_lines() {
        assert_abs_diff_eq!(
            linear_eval(10.0, 5.0, 20.0, 25.0, 12.5).unwrap(),
            10.0,
            epsilon = 1e-12
        );
    }
}
