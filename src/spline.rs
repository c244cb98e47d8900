//! Natural cubic spline over strictly increasing samples.
//!
//! Setup solves the tridiagonal system for the second derivatives with one
//! forward sweep and one back substitution, with y'' pinned to zero at both
//! ends. Queries outside the sampled range are not rejected: the first or
//! last interval's cubic is extrapolated.

use crate::error::{validate_samples, SetupError};

/// Single-dimension natural cubic spline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplineInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    y2: Vec<f64>,
}

impl SplineInterpolator {
    /// Builds and sets up a spline in one go.
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, SetupError> {
        let mut spline = Self::default();
        spline.setup(xs, ys)?;
        Ok(spline)
    }

    /// (Re)computes the spline for new samples. `xs` must be strictly
    /// increasing with at least two entries; on error the previous state is kept.
    pub fn setup(&mut self, xs: &[f64], ys: &[f64]) -> Result<(), SetupError> {
        validate_samples(xs, ys, 2)?;

        let n = xs.len();
        let mut y2 = vec![0.0; n];
        let mut u = vec![0.0; n];

        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2[i - 1] + 2.0;
            y2[i] = (sig - 1.0) / p;
            let slope_diff = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * slope_diff / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }

        y2[n - 1] = 0.0;
        for k in (0..n - 1).rev() {
            y2[k] = y2[k] * y2[k + 1] + u[k];
        }
        y2[0] = 0.0;

        self.xs = xs.to_vec();
        self.ys = ys.to_vec();
        self.y2 = y2;
        Ok(())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// True before a successful setup.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Sample abscissae.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Sample values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Second derivative at each sample; zero at both ends.
    pub fn second_derivatives(&self) -> &[f64] {
        &self.y2
    }

    /// Index `i` of the interval `[xs[i], xs[i + 1]]` used for `x`.
    /// Values below/above the range map to the first/last interval.
    pub fn find_interval(&self, x: f64) -> usize {
        find_interval(&self.xs, x)
    }

    /// Interpolated value at `x`. An unset spline yields `0.0`.
    pub fn interpolate(&self, x: f64) -> f64 {
        if self.xs.len() < 2 {
            return 0.0;
        }
        self.evaluate(x, self.find_interval(x))
    }

    /// Like [`interpolate`](Self::interpolate) but skips the search, using the
    /// caller's interval index (clamped to a valid interval).
    pub fn interpolate_with_hint(&self, x: f64, index: usize) -> f64 {
        if self.xs.len() < 2 {
            return 0.0;
        }
        self.evaluate(x, index.min(self.xs.len() - 2))
    }

    fn evaluate(&self, x: f64, lo: usize) -> f64 {
        let hi = lo + 1;
        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;
        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2[lo] + (b * b * b - b) * self.y2[hi]) * (h * h) / 6.0
    }
}

/// Binary search for the bracketing interval of `x` in strictly increasing
/// `knots` (at least two). Out-of-range values clamp to the end intervals.
pub fn find_interval(knots: &[f64], x: f64) -> usize {
    let n = knots.len();
    if n < 2 {
        return 0;
    }
    // partition_point: number of knots <= x
    let above = knots.partition_point(|&k| k <= x);
    above.saturating_sub(1).min(n - 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_spline() -> SplineInterpolator {
        let xs = [-2.0, -0.5, 0.0, 1.0, 2.5, 4.0, 7.0];
        let ys = [3.0, -1.0, 0.5, 2.0, 2.2, -0.7, 1.0];
        SplineInterpolator::new(&xs, &ys).unwrap()
    }

    #[test]
    fn test_passes_through_knots() {
        let spline = sample_spline();
        for (x, y) in spline.xs().iter().zip(spline.ys()) {
            assert_relative_eq!(spline.interpolate(*x), *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_natural_end_conditions() {
        let spline = sample_spline();
        let y2 = spline.second_derivatives();
        assert_eq!(y2[0], 0.0);
        assert_eq!(y2[y2.len() - 1], 0.0);
    }

    #[test]
    fn test_reproduces_straight_line() {
        let xs = [0.0, 1.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x - 1.0).collect();
        let spline = SplineInterpolator::new(&xs, &ys).unwrap();
        for x in [-1.0, 0.5, 2.2, 3.9, 6.0] {
            assert_relative_eq!(spline.interpolate(x), 2.0 * x - 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_extrapolates_end_intervals() {
        let spline = sample_spline();
        let below = spline.interpolate(-3.0);
        let above = spline.interpolate(9.0);
        assert!(below.is_finite() && above.is_finite());
        assert_relative_eq!(spline.interpolate_with_hint(9.0, 5), above);
        assert_relative_eq!(spline.interpolate_with_hint(-3.0, 0), below);
    }

    #[test]
    fn test_hint_matches_search() {
        let spline = sample_spline();
        for x in [-1.2, 0.3, 1.7, 3.3, 6.1] {
            let idx = spline.find_interval(x);
            assert!(spline.xs()[idx] <= x && x <= spline.xs()[idx + 1]);
            assert_eq!(spline.interpolate_with_hint(x, idx), spline.interpolate(x));
        }
    }

    #[test]
    fn test_find_interval_edges() {
        let knots = [0.0, 1.0, 2.0];
        assert_eq!(find_interval(&knots, -5.0), 0);
        assert_eq!(find_interval(&knots, 0.0), 0);
        assert_eq!(find_interval(&knots, 1.0), 1);
        assert_eq!(find_interval(&knots, 2.0), 1);
        assert_eq!(find_interval(&knots, 10.0), 1);
    }

    #[test]
    fn test_setup_rejects_non_increasing() {
        let mut spline = sample_spline();
        let before = spline.clone();
        assert!(spline.setup(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
        assert_eq!(spline, before);
    }

    #[test]
    fn test_two_point_spline_is_linear() {
        let spline = SplineInterpolator::new(&[1.0, 3.0], &[10.0, 20.0]).unwrap();
        assert_relative_eq!(spline.interpolate(2.0), 15.0);
        assert_relative_eq!(spline.interpolate(5.0), 30.0);
    }
}
