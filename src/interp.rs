//! Multi-dimension interpolation over shared knots.
//!
//! Several co-indexed curves (rows of an `ndarray::Array2`) are sampled at the
//! same parameter knots. A [`SplineCalculator`] primes a set of weights for a
//! parameter value once; evaluating every row is then a short dot product.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{validate_knots, SetupError};
use crate::math::safe_ratio;
use crate::spline::find_interval;

/// Weights primed for one parameter value: `value = Σ weights[i] * p[first + i]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Primed {
    /// Index of the first knot value the weights apply to.
    pub first: usize,
    /// Number of weights in use, at most 4.
    pub count: usize,
    /// Weights for `first..first + count`; unused slots are zero.
    pub weights: [f64; 4],
}

impl Primed {
    /// Primed context returning `values[index]` exactly.
    pub fn exact(index: usize) -> Self {
        Self { first: index, count: 1, weights: [1.0, 0.0, 0.0, 0.0] }
    }
}

/// One-dimensional interpolation strategy.
pub trait SplineCalculator {
    /// Prepares weights for parameter `t`. `base_index` is the interval
    /// `[knots[base_index], knots[base_index + 1]]` that brackets (or is
    /// nearest to) `t`.
    fn prime(&self, t: f64, knots: &[f64], base_index: usize) -> Primed;

    /// Applies primed weights to the knot values of one curve.
    fn evaluate(&self, primed: &Primed, values: ArrayView1<'_, f64>) -> f64 {
        (0..primed.count).map(|i| primed.weights[i] * values[primed.first + i]).sum()
    }
}

/// Two-point linear weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearCalculator;

impl SplineCalculator for LinearCalculator {
    fn prime(&self, t: f64, knots: &[f64], base_index: usize) -> Primed {
        if knots.len() < 2 {
            return Primed::exact(0);
        }
        let lo = base_index.min(knots.len() - 2);
        let f = safe_ratio(t - knots[lo], knots[lo + 1] - knots[lo]);
        Primed { first: lo, count: 2, weights: [1.0 - f, f, 0.0, 0.0] }
    }
}

/// Catmull-Rom through the knots, evaluated with the Barry–Goldman pyramid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CatmullRomCalculator;

/// Weight pair for blending from knot `a` to knot `b` at `t`.
#[inline(always)]
fn blend(t: f64, a: f64, b: f64) -> (f64, f64) {
    let f = safe_ratio(t - a, b - a);
    (1.0 - f, f)
}

impl CatmullRomCalculator {
    fn quadratic(t: f64, k: &[f64]) -> [f64; 3] {
        let (a1p0, a1p1) = blend(t, k[0], k[1]);
        let (a2p1, a2p2) = blend(t, k[1], k[2]);
        let (c1, c2) = blend(t, k[0], k[2]);
        [c1 * a1p0, c1 * a1p1 + c2 * a2p1, c2 * a2p2]
    }

    /// Pyramid weights over a 4-knot window. `segment` is the window
    /// interval holding `t`; the outer intervals use the 3-knot level.
    fn cubic(t: f64, k: &[f64], segment: usize) -> [f64; 4] {
        // first level: A1 = P0..P1, A2 = P1..P2, A3 = P2..P3
        let (a1p0, a1p1) = blend(t, k[0], k[1]);
        let (a2p1, a2p2) = blend(t, k[1], k[2]);
        let (a3p2, a3p3) = blend(t, k[2], k[3]);
        // second level: B1 = A1..A2 over [k0, k2], B2 = A2..A3 over [k1, k3]
        let (b1a1, b1a2) = blend(t, k[0], k[2]);
        let (b2a2, b2a3) = blend(t, k[1], k[3]);

        let b1 = [b1a1 * a1p0, b1a1 * a1p1 + b1a2 * a2p1, b1a2 * a2p2, 0.0];
        let b2 = [0.0, b2a2 * a2p1, b2a2 * a2p2 + b2a3 * a3p2, b2a3 * a3p3];
        match segment {
            0 => b1,
            2 => b2,
            _ => {
                // final level: C = B1..B2 over [k1, k2]
                let (cb1, cb2) = blend(t, k[1], k[2]);
                [
                    cb1 * b1[0] + cb2 * b2[0],
                    cb1 * b1[1] + cb2 * b2[1],
                    cb1 * b1[2] + cb2 * b2[2],
                    cb1 * b1[3] + cb2 * b2[3],
                ]
            }
        }
    }
}

impl SplineCalculator for CatmullRomCalculator {
    fn prime(&self, t: f64, knots: &[f64], base_index: usize) -> Primed {
        match knots.len() {
            0 => Primed::default(),
            1 => Primed::exact(0),
            2 => LinearCalculator.prime(t, knots, 0),
            3 => {
                let w = Self::quadratic(t, knots);
                Primed { first: 0, count: 3, weights: [w[0], w[1], w[2], 0.0] }
            }
            n => {
                // window [i-1, i+2], shifted back inside the array near the ends
                let base = base_index.min(n - 2);
                let first = base.saturating_sub(1).min(n - 4);
                let w = Self::cubic(t, &knots[first..first + 4], base - first);
                Primed { first, count: 4, weights: w }
            }
        }
    }
}

/// Closed set of strategies, picked when the interpolator is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Calculator {
    /// Two-point linear blend.
    Linear,
    /// Four-point Catmull-Rom.
    #[default]
    CatmullRom,
}

impl SplineCalculator for Calculator {
    fn prime(&self, t: f64, knots: &[f64], base_index: usize) -> Primed {
        match self {
            Calculator::Linear => LinearCalculator.prime(t, knots, base_index),
            Calculator::CatmullRom => CatmullRomCalculator.prime(t, knots, base_index),
        }
    }
}

/// Several curves sampled at common knots, interpolated together.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDimInterpolator {
    knots: Vec<f64>,
    /// One row per output dimension, one column per knot.
    values: Array2<f64>,
    calculator: Calculator,
    /// Clamp parameters below the first knot to the first knot's values.
    pub pin_to_lower: bool,
    /// Clamp parameters above the last knot to the last knot's values.
    pub pin_to_upper: bool,
}

impl MultiDimInterpolator {
    /// `rows[d][k]` is output dimension `d` at knot `k`.
    pub fn new(knots: &[f64], rows: &[Vec<f64>], calculator: Calculator) -> Result<Self, SetupError> {
        validate_knots(knots, 2)?;
        let dims = rows.len();
        let mut values = Array2::zeros((dims, knots.len()));
        for (d, row) in rows.iter().enumerate() {
            if row.len() != knots.len() {
                return Err(SetupError::LengthMismatch { xs: knots.len(), ys: row.len() });
            }
            if let Some(index) = row.iter().position(|v| !v.is_finite()) {
                return Err(SetupError::NonFinite { index });
            }
            values.row_mut(d).assign(&ArrayView1::from(row.as_slice()));
        }
        Ok(Self { knots: knots.to_vec(), values, calculator, pin_to_lower: true, pin_to_upper: true })
    }

    /// Builder-style pinning configuration.
    pub fn with_pinning(mut self, pin_to_lower: bool, pin_to_upper: bool) -> Self {
        self.pin_to_lower = pin_to_lower;
        self.pin_to_upper = pin_to_upper;
        self
    }

    /// Number of output dimensions (rows).
    pub fn dimensions(&self) -> usize {
        self.values.nrows()
    }

    /// Parameter knots, strictly increasing.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Strategy chosen at construction.
    pub fn calculator(&self) -> Calculator {
        self.calculator
    }

    /// Weights for `t`, honouring the pinning flags.
    pub fn prime(&self, t: f64) -> Primed {
        let n = self.knots.len();
        if t < self.knots[0] && self.pin_to_lower {
            return Primed::exact(0);
        }
        if t > self.knots[n - 1] && self.pin_to_upper {
            return Primed::exact(n - 1);
        }
        self.calculator.prime(t, &self.knots, find_interval(&self.knots, t))
    }

    /// Writes every dimension at `t` into `out` (extra slots are left alone).
    pub fn interpolate_into(&self, t: f64, out: &mut [f64]) {
        let primed = self.prime(t);
        for (d, slot) in out.iter_mut().enumerate().take(self.dimensions()) {
            *slot = self.calculator.evaluate(&primed, self.values.row(d));
        }
    }

    /// All dimensions at `t`.
    pub fn interpolate(&self, t: f64) -> Vec<f64> {
        let mut out = vec![0.0; self.dimensions()];
        self.interpolate_into(t, &mut out);
        out
    }

    /// One dimension at `t`; `0.0` when `dim` is not below [`Self::dimensions`].
    pub fn interpolate_dim(&self, t: f64, dim: usize) -> f64 {
        if dim >= self.dimensions() {
            return 0.0;
        }
        let primed = self.prime(t);
        self.calculator.evaluate(&primed, self.values.row(dim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn knots() -> Vec<f64> {
        vec![0.0, 1.0, 2.5, 3.0, 5.0]
    }

    fn rows() -> Vec<Vec<f64>> {
        vec![vec![0.0, 2.0, -1.0, 4.0, 3.0], vec![1.0, 1.0, 1.0, 1.0, 1.0]]
    }

    #[test]
    fn test_both_strategies_hit_knots() {
        for calc in [Calculator::Linear, Calculator::CatmullRom] {
            let interp = MultiDimInterpolator::new(&knots(), &rows(), calc).unwrap();
            for (k, t) in knots().iter().enumerate() {
                let v = interp.interpolate(*t);
                assert_relative_eq!(v[0], rows()[0][k], epsilon = 1e-12);
                assert_relative_eq!(v[1], 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let k = knots();
        for t in [0.2, 1.7, 2.7, 4.4, -1.0, 7.0] {
            let base = find_interval(&k, t);
            for primed in [LinearCalculator.prime(t, &k, base), CatmullRomCalculator.prime(t, &k, base)] {
                let sum: f64 = primed.weights[..primed.count].iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
                assert!(primed.first + primed.count <= k.len());
            }
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let interp = MultiDimInterpolator::new(&[0.0, 2.0], &[vec![0.0, 4.0]], Calculator::Linear).unwrap();
        assert_relative_eq!(interp.interpolate_dim(0.5, 0), 1.0);
    }

    #[test]
    fn test_unknown_dimension_is_zero() {
        let interp = MultiDimInterpolator::new(&knots(), &rows(), Calculator::CatmullRom).unwrap();
        assert_eq!(interp.dimensions(), 2);
        assert_eq!(interp.interpolate_dim(1.5, 2), 0.0);
        assert_eq!(interp.interpolate_dim(1.5, usize::MAX), 0.0);
    }

    #[test]
    fn test_catmull_rom_small_knot_counts() {
        // two knots degrade to linear
        let two = MultiDimInterpolator::new(&[0.0, 2.0], &[vec![0.0, 4.0]], Calculator::CatmullRom).unwrap();
        assert_relative_eq!(two.interpolate_dim(1.5, 0), 3.0);

        // three knots blend quadratically: reproduces a parabola exactly
        let three =
            MultiDimInterpolator::new(&[0.0, 1.0, 3.0], &[vec![0.0, 1.0, 9.0]], Calculator::CatmullRom).unwrap();
        assert_relative_eq!(three.interpolate_dim(2.0, 0), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_catmull_rom_reproduces_linear_data() {
        let k = knots();
        let row: Vec<f64> = k.iter().map(|t| 3.0 * t - 2.0).collect();
        let interp = MultiDimInterpolator::new(&k, &[row], Calculator::CatmullRom).unwrap();
        for t in [0.3, 1.2, 2.9, 4.1] {
            assert_relative_eq!(interp.interpolate_dim(t, 0), 3.0 * t - 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_window_recenters_at_boundaries() {
        let k = knots();
        let first = CatmullRomCalculator.prime(0.5, &k, 0);
        assert_eq!(first.first, 0);
        let last = CatmullRomCalculator.prime(4.5, &k, 3);
        assert_eq!(last.first, 1);
        assert_eq!(last.first + last.count, k.len());
    }

    #[test]
    fn test_pinning_versus_extrapolation() {
        let k = [0.0, 1.0, 2.0];
        let row = vec![0.0, 1.0, 2.0];
        let pinned = MultiDimInterpolator::new(&k, &[row.clone()], Calculator::Linear).unwrap();
        assert_eq!(pinned.interpolate_dim(-3.0, 0), 0.0);
        assert_eq!(pinned.interpolate_dim(9.0, 0), 2.0);

        let free = pinned.clone().with_pinning(false, false);
        assert_relative_eq!(free.interpolate_dim(-3.0, 0), -3.0);
        assert_relative_eq!(free.interpolate_dim(9.0, 0), 9.0);
    }

    #[test]
    fn test_rejects_bad_rows() {
        assert!(MultiDimInterpolator::new(&[0.0, 1.0], &[vec![1.0]], Calculator::Linear).is_err());
        assert!(MultiDimInterpolator::new(&[1.0, 0.0], &[vec![1.0, 2.0]], Calculator::Linear).is_err());
    }
}
