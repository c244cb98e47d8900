//! Lift, drag and pitching-moment coefficients as functions of angle of attack.
//!
//! A [`LiftDragCurve`] holds the co-indexed Cl/Cd/Cm samples of one profile in a
//! [`MultiDimInterpolator`], plus an optional post-stall table. Past the stall
//! start angle the coefficients blend toward the stalled table with a cubic
//! smoothstep, and the raw blend fraction is reported for diagnostics.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::interp::{Calculator, MultiDimInterpolator};
use crate::math::smoothstep3;

/// Coefficient samples over angle of attack in degrees. An empty `cm` means
/// the profile has no pitching moment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoefficientTable {
    /// Angle-of-attack samples, strictly increasing.
    pub alpha_deg: Vec<f64>,
    /// Lift coefficient per sample.
    pub cl: Vec<f64>,
    /// Drag coefficient per sample.
    pub cd: Vec<f64>,
    /// Pitching-moment coefficient per sample; may be empty.
    pub cm: Vec<f64>,
}

impl CoefficientTable {
    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.alpha_deg.is_empty()
    }

    fn build(&self, calculator: Calculator) -> Result<MultiDimInterpolator, SetupError> {
        let mut rows = vec![self.cl.clone(), self.cd.clone()];
        if !self.cm.is_empty() {
            rows.push(self.cm.clone());
        }
        MultiDimInterpolator::new(&self.alpha_deg, &rows, calculator)
    }
}

/// Load-time description of a lift/drag curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftDragDescriptor {
    /// Unstalled coefficients.
    pub curve: CoefficientTable,
    /// Span²/area; used for induced drag when the foil geometry has none.
    pub aspect_ratio: Option<f64>,
    /// Angle where stall blending starts.
    pub stall_start_deg: Option<f64>,
    /// Angle where the stalled curve takes over completely.
    pub lift_end_deg: Option<f64>,
    /// Fully-stalled coefficients; an empty table disables stall blending.
    pub stalled: CoefficientTable,
    /// Interpolation strategy for both tables.
    pub calculator: Calculator,
}

/// Coefficients at one angle of attack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Coefficients {
    /// Lift coefficient.
    pub cl: f64,
    /// Drag coefficient.
    pub cd: f64,
    /// Pitching-moment coefficient.
    pub cm: f64,
    /// Unsmoothed stall blend fraction in `[0, 1]`; 0 when unstalled.
    pub stall_fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct StallRegion {
    start_deg: f64,
    end_deg: f64,
    curve: MultiDimInterpolator,
}

/// Coefficient lookup with optional stall blending.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftDragCurve {
    curve: MultiDimInterpolator,
    stall: Option<StallRegion>,
    aspect_ratio: Option<f64>,
    /// Samples only cover α ≥ 0; negative angles mirror Cl and Cm.
    symmetric: bool,
}

impl LiftDragCurve {
    /// Builds both tables. Incomplete stall settings are ignored with a warning.
    pub fn from_descriptor(desc: &LiftDragDescriptor) -> Result<Self, SetupError> {
        let curve = desc.curve.build(desc.calculator).map_err(|e| e.in_curve("coefficients"))?;

        let stall = match (desc.stall_start_deg, desc.lift_end_deg) {
            (Some(start), Some(end)) if desc.stalled.is_empty() => {
                warn!("stall angles {start}..{end} deg given without a stalled curve; stall blending disabled");
                None
            }
            (Some(start), Some(end)) if end <= start => {
                warn!("ignoring stall region: lift end {end} deg is not past stall start {start} deg");
                None
            }
            (Some(start), Some(end)) => {
                let stalled = desc.stalled.build(desc.calculator).map_err(|e| e.in_curve("stalled"))?;
                Some(StallRegion { start_deg: start, end_deg: end, curve: stalled })
            }
            (None, None) => None,
            (start, end) => {
                warn!("incomplete stall region ({start:?}, {end:?}); stall blending disabled");
                None
            }
        };

        let non_negative = |t: &CoefficientTable| t.alpha_deg.iter().all(|a| *a >= 0.0);
        let symmetric = non_negative(&desc.curve) && (stall.is_none() || non_negative(&desc.stalled));

        Ok(Self { curve, stall, aspect_ratio: desc.aspect_ratio, symmetric })
    }

    /// Aspect ratio from the descriptor.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    /// True when stall blending is active.
    pub fn has_stall(&self) -> bool {
        self.stall.is_some()
    }

    /// True when every alpha sample is non-negative and negative angles are mirrored.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Coefficients at `alpha_deg`. Angles outside the samples clamp to the end values.
    pub fn evaluate(&self, alpha_deg: f64) -> Coefficients {
        let (alpha, sign) =
            if self.symmetric && alpha_deg < 0.0 { (-alpha_deg, -1.0) } else { (alpha_deg, 1.0) };

        let mut coeffs = sample(&self.curve, alpha);

        if let Some(stall) = &self.stall {
            let abs_alpha = alpha_deg.abs();
            if abs_alpha > stall.start_deg {
                let f = ((abs_alpha - stall.start_deg) / (stall.end_deg - stall.start_deg)).clamp(0.0, 1.0);
                let w = smoothstep3(f);
                let stalled = sample(&stall.curve, alpha);
                coeffs.cl += (stalled.cl - coeffs.cl) * w;
                coeffs.cd += (stalled.cd - coeffs.cd) * w;
                coeffs.cm += (stalled.cm - coeffs.cm) * w;
                coeffs.stall_fraction = f;
            }
        }

        coeffs.cl *= sign;
        coeffs.cm *= sign;
        coeffs
    }
}

fn sample(curve: &MultiDimInterpolator, alpha: f64) -> Coefficients {
    let mut out = [0.0; 3];
    curve.interpolate_into(alpha, &mut out);
    Coefficients { cl: out[0], cd: out[1], cm: out[2], stall_fraction: 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn thin_plate() -> CoefficientTable {
        CoefficientTable {
            alpha_deg: vec![-20.0, -10.0, 0.0, 10.0, 20.0],
            cl: vec![-0.9, -1.0, 0.0, 1.0, 0.9],
            cd: vec![0.2, 0.05, 0.01, 0.05, 0.2],
            cm: vec![],
        }
    }

    fn flat_stalled() -> CoefficientTable {
        CoefficientTable {
            alpha_deg: vec![-90.0, 90.0],
            cl: vec![0.5, 0.5],
            cd: vec![1.2, 1.2],
            cm: vec![-0.1, -0.1],
        }
    }

    #[test]
    fn test_samples_hit() {
        let curve = LiftDragCurve::from_descriptor(&LiftDragDescriptor { curve: thin_plate(), ..Default::default() })
            .unwrap();
        let c = curve.evaluate(10.0);
        assert_relative_eq!(c.cl, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.cd, 0.05, epsilon = 1e-12);
        assert_eq!(c.cm, 0.0);
        assert_eq!(c.stall_fraction, 0.0);
        assert!(!curve.has_stall());
    }

    #[test]
    fn test_stall_blend_fraction() {
        let desc = LiftDragDescriptor {
            curve: thin_plate(),
            stall_start_deg: Some(10.0),
            lift_end_deg: Some(20.0),
            stalled: flat_stalled(),
            ..Default::default()
        };
        let curve = LiftDragCurve::from_descriptor(&desc).unwrap();
        assert!(curve.has_stall());

        let below = curve.evaluate(5.0);
        assert_eq!(below.stall_fraction, 0.0);

        let mid = curve.evaluate(15.0);
        assert_relative_eq!(mid.stall_fraction, 0.5);
        let unstalled = LiftDragCurve::from_descriptor(&LiftDragDescriptor { curve: thin_plate(), ..Default::default() })
            .unwrap()
            .evaluate(15.0);
        // smoothstep3(0.5) == 0.5
        assert_relative_eq!(mid.cd, 0.5 * unstalled.cd + 0.5 * 1.2, epsilon = 1e-12);

        let deep = curve.evaluate(-40.0);
        assert_eq!(deep.stall_fraction, 1.0);
        assert_relative_eq!(deep.cl, 0.5);
        assert_relative_eq!(deep.cm, -0.1);
    }

    #[test]
    fn test_empty_stalled_curve_disables_stall() {
        let desc = LiftDragDescriptor {
            curve: thin_plate(),
            stall_start_deg: Some(10.0),
            lift_end_deg: Some(20.0),
            ..Default::default()
        };
        let curve = LiftDragCurve::from_descriptor(&desc).unwrap();
        assert!(!curve.has_stall());
        assert_eq!(curve.evaluate(18.0).stall_fraction, 0.0);
    }

    #[test]
    fn test_inverted_stall_angles_ignored() {
        let desc = LiftDragDescriptor {
            curve: thin_plate(),
            stall_start_deg: Some(20.0),
            lift_end_deg: Some(10.0),
            stalled: flat_stalled(),
            ..Default::default()
        };
        assert!(!LiftDragCurve::from_descriptor(&desc).unwrap().has_stall());
    }

    #[test]
    fn test_symmetric_curve_mirrors_lift() {
        let desc = LiftDragDescriptor {
            curve: CoefficientTable {
                alpha_deg: vec![0.0, 10.0, 20.0],
                cl: vec![0.0, 1.0, 1.1],
                cd: vec![0.01, 0.03, 0.1],
                cm: vec![0.0, -0.05, -0.08],
            },
            ..Default::default()
        };
        let curve = LiftDragCurve::from_descriptor(&desc).unwrap();
        assert!(curve.is_symmetric());
        let pos = curve.evaluate(7.0);
        let neg = curve.evaluate(-7.0);
        assert_relative_eq!(neg.cl, -pos.cl);
        assert_relative_eq!(neg.cd, pos.cd);
        assert_relative_eq!(neg.cm, -pos.cm);
    }

    #[test]
    fn test_bad_samples_name_the_curve() {
        let desc = LiftDragDescriptor {
            curve: CoefficientTable { alpha_deg: vec![0.0, 0.0], cl: vec![0.0, 1.0], cd: vec![0.0, 1.0], cm: vec![] },
            ..Default::default()
        };
        let err = LiftDragCurve::from_descriptor(&desc).unwrap_err();
        assert!(matches!(err, SetupError::Curve { curve: "coefficients", .. }));
    }

    #[test]
    fn test_descriptor_from_json() {
        let desc: LiftDragDescriptor = serde_json::from_str(
            r#"{
                "curve": {"alpha_deg": [0, 10], "cl": [0, 1], "cd": [0.01, 0.02]},
                "aspect_ratio": 5.0,
                "calculator": "linear"
            }"#,
        )
        .unwrap();
        assert_eq!(desc.calculator, Calculator::Linear);
        let curve = LiftDragCurve::from_descriptor(&desc).unwrap();
        assert_eq!(curve.aspect_ratio(), Some(5.0));
        assert_relative_eq!(curve.evaluate(5.0).cl, 0.5);
    }
}
