//! Published regressions used by the hull model.
//!
//! * Delft Systematic Yacht Hull Series residuary resistance, nine
//!   coefficients over Froude number 0.10..0.60.
//! * Delft heeled wetted-surface correction, four coefficients over heel
//!   5°..35°.
//! * ITTC-1957 friction line, with a fully-rough Schlichting table for hulls
//!   whose roughness exceeds the permissible value.
//!
//! Every coefficient column is a natural cubic spline over its knots; one
//! interval search is shared by all columns of a table.

use crate::error::SetupError;
use crate::math::{EPSILON, is_like_zero};
use crate::spline::SplineInterpolator;

use super::HullParameters;

/// Froude numbers at which the residuary coefficients are tabulated.
pub const FROUDE_KNOTS: [f64; 11] = [0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40, 0.45, 0.50, 0.55, 0.60];
/// Lower end of the residuary regression.
pub const MIN_FROUDE: f64 = 0.10;
/// Upper end of the residuary regression.
pub const MAX_FROUDE: f64 = 0.60;

/// a0..a8 per Froude knot.
#[rustfmt::skip]
const RESIDUARY_COEFFICIENTS: [[f64; 9]; 11] = [
    [-0.0014,  0.0403,  0.0470, -0.0227, -0.0119,  0.0061, -0.0086, -0.0307, -0.0553],
    [ 0.0004, -0.1808,  0.1793, -0.0004,  0.0097,  0.0118, -0.0055,  0.1721, -0.1728],
    [ 0.0014, -0.1071,  0.0637,  0.0090,  0.0153,  0.0011,  0.0012,  0.1021, -0.0648],
    [ 0.0027,  0.0463, -0.1263,  0.0150,  0.0274, -0.0299,  0.0110, -0.0595,  0.1220],
    [ 0.0056, -0.8005,  0.4891,  0.0269,  0.0519, -0.0313,  0.0292,  0.7314, -0.3619],
    [ 0.0032, -0.1011, -0.0813, -0.0382,  0.0320, -0.1481,  0.0837,  0.0233,  0.1587],
    [-0.0064,  2.3095, -1.5152,  0.0751, -0.0858, -0.5349,  0.1715, -2.4550,  1.1865],
    [-0.0171,  3.4017, -1.9862,  0.3242, -0.1450, -0.8043,  0.2952, -3.5284,  1.3756],
    [-0.0201,  7.1576, -6.3304,  0.5829,  0.1630, -0.3966,  0.5023, -7.1579,  5.2704],
    [ 0.0495,  1.5618, -6.0661,  0.8641,  1.1702,  1.7610,  0.9176, -2.1191,  5.4281],
    [ 0.0808, -5.3233, -1.1513,  0.9663,  1.6084,  2.7459,  0.8491,  4.7129,  1.1089],
];

/// Heel angles at which the wetted-surface coefficients are tabulated.
pub const HEEL_KNOTS_DEG: [f64; 7] = [5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0];

/// s0..s3 per heel knot.
#[rustfmt::skip]
const HEELED_WETTED_SURFACE: [[f64; 4]; 7] = [
    [-4.112,  0.054, -0.027, 6.329],
    [-4.522, -0.132, -0.077, 8.738],
    [-3.291, -0.389, -0.118, 8.949],
    [ 1.850, -1.200, -0.109, 5.364],
    [ 6.510, -2.305, -0.066, 3.443],
    [12.334, -3.911,  0.024, 1.767],
    [14.648, -5.182,  0.102, 3.497],
];

/// log10(0.7·LWL / k) knots of the fully-rough friction table.
pub const ROUGHNESS_RATIO_KNOTS: [f64; 6] = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0];

const ROUGH_CF: [f64; 6] = [
    0.016776701879337913,
    0.00844774056427436,
    0.004933854693972209,
    0.0031701972100645808,
    0.002177305906220576,
    0.0015707258441933344,
];

fn column_splines<const N: usize, const M: usize>(
    knots: &[f64],
    table: &[[f64; M]; N],
) -> Result<Vec<SplineInterpolator>, SetupError> {
    (0..M)
        .map(|col| {
            let ys: Vec<f64> = table.iter().map(|row| row[col]).collect();
            SplineInterpolator::new(knots, &ys)
        })
        .collect()
}

/// Splines of a table, all evaluated at one parameter with a shared search.
#[derive(Debug, Clone, PartialEq)]
struct CoefficientSplines {
    columns: Vec<SplineInterpolator>,
}

impl CoefficientSplines {
    fn evaluate<const M: usize>(&self, x: f64) -> [f64; M] {
        let mut out = [0.0; M];
        let Some(first) = self.columns.first() else {
            return out;
        };
        let hint = first.find_interval(x);
        for (slot, spline) in out.iter_mut().zip(&self.columns) {
            *slot = spline.interpolate_with_hint(x, hint);
        }
        out
    }
}

/// Residuary resistance of the bare canoe body.
#[derive(Debug, Clone, PartialEq)]
pub struct ResiduaryRegression {
    splines: CoefficientSplines,
}

impl ResiduaryRegression {
    /// Fits one spline per coefficient column.
    pub fn new() -> Result<Self, SetupError> {
        let columns = column_splines(&FROUDE_KNOTS, &RESIDUARY_COEFFICIENTS).map_err(|e| e.in_curve("residuary"))?;
        Ok(Self { splines: CoefficientSplines { columns } })
    }

    /// a0..a8 at `froude`, clamped to the regression range.
    pub fn coefficients(&self, froude: f64) -> [f64; 9] {
        self.splines.evaluate::<9>(froude.clamp(MIN_FROUDE, MAX_FROUDE))
    }

    /// Rr / (∇·ρ·g), never negative. Zero for degenerate hull dimensions.
    pub fn resistance_ratio(&self, froude: f64, p: &HullParameters) -> f64 {
        if p.lwl <= EPSILON
            || p.waterplane_area <= EPSILON
            || p.wetted_surface <= EPSILON
            || p.displacement <= EPSILON
            || is_like_zero(p.lcf)
        {
            return 0.0;
        }
        let [a0, a1, a2, a3, a4, a5, a6, a7, a8] = self.coefficients(froude);
        let vol_23 = p.displacement.powf(2.0 / 3.0);
        let lcb_lwl = p.lcb / p.lwl;
        let polynomial = a1 * lcb_lwl
            + a2 * p.prismatic
            + a3 * vol_23 / p.waterplane_area
            + a4 * p.bwl / p.lwl
            + a5 * vol_23 / p.wetted_surface
            + a6 * p.lcb / p.lcf
            + a7 * lcb_lwl * lcb_lwl
            + a8 * p.prismatic * p.prismatic;
        (a0 + polynomial * p.displacement.cbrt() / p.lwl).max(0.0)
    }

    /// Residuary resistance in newtons.
    pub fn resistance(&self, froude: f64, p: &HullParameters, rho: f64, g: f64) -> f64 {
        self.resistance_ratio(froude, p) * p.displacement * rho * g
    }
}

/// Wetted-surface change with heel.
#[derive(Debug, Clone, PartialEq)]
pub struct HeeledWettedSurface {
    splines: CoefficientSplines,
}

impl HeeledWettedSurface {
    /// Fits one spline per coefficient column.
    pub fn new() -> Result<Self, SetupError> {
        let columns =
            column_splines(&HEEL_KNOTS_DEG, &HEELED_WETTED_SURFACE).map_err(|e| e.in_curve("heeled_wetted_surface"))?;
        Ok(Self { splines: CoefficientSplines { columns } })
    }

    /// Ratio Sc(φ)/Sc(0). Heel outside 5°..35° extrapolates the end splines.
    pub fn factor(&self, heel_deg: f64, p: &HullParameters) -> f64 {
        if is_like_zero(p.draft) {
            return 1.0;
        }
        let [s0, s1, s2, s3] = self.splines.evaluate::<4>(heel_deg.abs());
        let b_t = p.bwl / p.draft;
        1.0 + (s0 + s1 * b_t + s2 * b_t * b_t + s3 * p.midship_coefficient) / 100.0
    }

    /// Heeled wetted surface; a configured heeled value wins over the regression.
    pub fn wetted_surface(&self, heel_deg: f64, p: &HullParameters) -> f64 {
        match p.heeled_wetted_surface {
            Some(sc) => sc,
            None => p.wetted_surface * self.factor(heel_deg, p),
        }
    }
}

/// Frictional regime at one speed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Friction {
    /// Reynolds number over 0.7·LWL.
    pub reynolds: f64,
    /// Friction coefficient.
    pub cf: f64,
    /// Set when the hull roughness exceeded the permissible value.
    pub rough: bool,
}

/// ITTC-1957 line with the fully-rough override.
#[derive(Debug, Clone, PartialEq)]
pub struct FrictionLine {
    rough: SplineInterpolator,
}

impl FrictionLine {
    /// Fits the rough-hull table.
    pub fn new() -> Result<Self, SetupError> {
        let rough = SplineInterpolator::new(&ROUGHNESS_RATIO_KNOTS, &ROUGH_CF).map_err(|e| e.in_curve("rough_cf"))?;
        Ok(Self { rough })
    }

    /// Reynolds number is taken over 0.7·LWL. Zero speed yields zero Cf.
    pub fn evaluate(&self, speed: f64, lwl: f64, nu: f64, roughness: f64) -> Friction {
        let length = 0.7 * lwl;
        if speed <= EPSILON || length <= EPSILON || nu <= EPSILON {
            return Friction::default();
        }
        let reynolds = speed * length / nu;
        let log_term = reynolds.log10() - 2.0;
        if log_term <= 0.0 {
            return Friction { reynolds, ..Default::default() };
        }
        let permissible = 100.0 * nu / speed;
        if roughness > 0.0 && roughness > permissible {
            let ratio = (length / roughness).log10().clamp(ROUGHNESS_RATIO_KNOTS[0], ROUGHNESS_RATIO_KNOTS[5]);
            return Friction { reynolds, cf: self.rough.interpolate(ratio), rough: true };
        }
        Friction { reynolds, cf: 0.075 / (log_term * log_term), rough: false }
    }
}
