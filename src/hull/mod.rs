//! Hull hydrodynamics: friction, residuary resistance, buoyancy and gravity.
//!
//! Per tick the hull sees the apparent current (water velocity minus hull
//! velocity). Resistance acts along its horizontal part at the centre of
//! buoyancy; buoyancy acts at the immersed centroid returned by the host's
//! [`HullVolume`]; gravity and buoyancy damping act at the centre of mass.
//! The five contributions are superposed into one [`Resultant`].

pub mod delft;
pub mod wake;

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::body::{HullVolume, RigidBody, TelemetrySink};
use crate::constants::Constants;
use crate::error::SetupError;
use crate::math::{EPSILON, is_like_zero};
use crate::resultant::Resultant;
use crate::vector::{Plane, Vec3};

use delft::{FrictionLine, HeeledWettedSurface, ResiduaryRegression};
use wake::{WakeEdgeDescriptor, WakeEdgeStrategy, WakeEdges};

/// Canoe-body dimensions. Lengths in metres, areas in m², volume in m³;
/// LCB and LCF are measured aft of the forward perpendicular.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullParameters {
    /// Waterline length.
    pub lwl: f64,
    /// Waterline beam.
    pub bwl: f64,
    /// Canoe body draft Tc.
    pub draft: f64,
    /// Displaced volume ∇.
    pub displacement: f64,
    /// Prismatic coefficient Cp.
    pub prismatic: f64,
    /// Longitudinal centre of buoyancy.
    pub lcb: f64,
    /// Longitudinal centre of flotation.
    pub lcf: f64,
    /// Waterplane area Aw.
    pub waterplane_area: f64,
    /// Unheeled wetted surface Sc.
    pub wetted_surface: f64,
    /// Fixed heeled wetted surface; replaces the heel regression when set.
    pub heeled_wetted_surface: Option<f64>,
    /// Midship section coefficient Cm.
    pub midship_coefficient: f64,
    /// Equivalent sand roughness k (m). Zero is a smooth hull.
    pub roughness: f64,
    /// Fraction of vertical velocity removed per second by buoyancy damping.
    pub buoyancy_damping: f64,
}

impl Default for HullParameters {
    fn default() -> Self {
        Self {
            lwl: 10.0,
            bwl: 3.0,
            draft: 0.6,
            displacement: 7.0,
            prismatic: 0.55,
            lcb: 5.3,
            lcf: 5.6,
            waterplane_area: 22.0,
            wetted_surface: 25.0,
            heeled_wetted_surface: None,
            midship_coefficient: 0.75,
            roughness: 0.0,
            buoyancy_damping: 0.5,
        }
    }
}

impl HullParameters {
    /// Copy with unusable values replaced: negative or non-finite lengths,
    /// areas and volumes become zero, which turns the affected terms off, and
    /// the buoyancy damping fraction is clamped to `[0, 1]`.
    pub fn sanitized(&self) -> Self {
        let non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                v
            } else {
                warn!("hull {name} {v} is not a non-negative number, using 0");
                0.0
            }
        };
        let finite = |name: &str, v: f64| {
            if v.is_finite() {
                v
            } else {
                warn!("hull {name} {v} is not finite, using 0");
                0.0
            }
        };
        let buoyancy_damping = if self.buoyancy_damping.is_finite() {
            let clamped = self.buoyancy_damping.clamp(0.0, 1.0);
            if clamped != self.buoyancy_damping {
                warn!("hull buoyancy damping {} outside [0, 1], using {clamped}", self.buoyancy_damping);
            }
            clamped
        } else {
            warn!("hull buoyancy damping {} is not finite, using 0", self.buoyancy_damping);
            0.0
        };
        Self {
            lwl: non_negative("lwl", self.lwl),
            bwl: non_negative("bwl", self.bwl),
            draft: non_negative("draft", self.draft),
            displacement: non_negative("displacement", self.displacement),
            prismatic: finite("prismatic coefficient", self.prismatic),
            lcb: finite("lcb", self.lcb),
            lcf: finite("lcf", self.lcf),
            waterplane_area: non_negative("waterplane area", self.waterplane_area),
            wetted_surface: non_negative("wetted surface", self.wetted_surface),
            heeled_wetted_surface: self.heeled_wetted_surface.map(|sc| non_negative("heeled wetted surface", sc)),
            midship_coefficient: finite("midship coefficient", self.midship_coefficient),
            roughness: non_negative("roughness", self.roughness),
            buoyancy_damping,
        }
    }
}

/// Load-time description of a hull.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullDescriptor {
    /// Canoe-body dimensions.
    pub parameters: HullParameters,
    /// Wake-edge strategy.
    pub wake: WakeEdgeDescriptor,
}

/// Per-tick hull outputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullDetails {
    /// Heel angle, positive with the port side up (degrees).
    pub heel_deg: f64,
    /// Horizontal apparent current speed.
    pub speed: f64,
    /// Froude number over LWL.
    pub froude: f64,
    /// Reynolds number over 0.7·LWL.
    pub reynolds: f64,
    /// ½ρV²
    pub dynamic_pressure: f64,
    /// Friction coefficient.
    pub cf: f64,
    /// True when the rough-hull table was used.
    pub rough_friction: bool,
    /// Heeled wetted surface (m²).
    pub wetted_surface: f64,
    /// Frictional resistance (N).
    pub frictional: f64,
    /// Residuary resistance (N).
    pub residuary: f64,
    /// Unit direction of the resistance; zero at rest.
    pub drag_direction: Vec3,
    /// Submerged volume (m³).
    pub immersed_volume: f64,
    /// Where buoyancy and resistance act.
    pub center_of_buoyancy: Vec3,
    /// Buoyant force (N, up).
    pub buoyancy: f64,
    /// Vertical damping force (N).
    pub damping: f64,
    /// Weight (N, negative).
    pub gravity: f64,
    /// Wake origins; `None` at rest.
    pub wake: Option<WakeEdges>,
    /// Sum of every hull force.
    pub total: Resultant,
}

impl HullDetails {
    /// Records every field under `prefix`.
    pub fn publish(&self, sink: &mut dyn TelemetrySink, prefix: &str) {
        sink.record(&format!("{prefix}.heel_deg"), self.heel_deg);
        sink.record(&format!("{prefix}.speed"), self.speed);
        sink.record(&format!("{prefix}.froude"), self.froude);
        sink.record(&format!("{prefix}.reynolds"), self.reynolds);
        sink.record(&format!("{prefix}.q"), self.dynamic_pressure);
        sink.record(&format!("{prefix}.cf"), self.cf);
        sink.record(&format!("{prefix}.wetted_surface"), self.wetted_surface);
        sink.record(&format!("{prefix}.frictional"), self.frictional);
        sink.record(&format!("{prefix}.residuary"), self.residuary);
        sink.record(&format!("{prefix}.buoyancy"), self.buoyancy);
        sink.record(&format!("{prefix}.damping"), self.damping);
        sink.record(&format!("{prefix}.immersed_volume"), self.immersed_volume);
        sink.record_vec(&format!("{prefix}.center_of_buoyancy"), &self.center_of_buoyancy);
        sink.record_vec(&format!("{prefix}.force"), &self.total.force);
        sink.record_vec(&format!("{prefix}.moment"), &self.total.moment);
        if let Some(wake) = &self.wake {
            sink.record_vec(&format!("{prefix}.wake.port"), &wake.port);
            sink.record_vec(&format!("{prefix}.wake.starboard"), &wake.starboard);
        }
    }
}

/// Hull hydrodynamics for one vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    parameters: HullParameters,
    constants: Constants,
    friction: FrictionLine,
    residuary: ResiduaryRegression,
    heeled: HeeledWettedSurface,
    wake: WakeEdgeStrategy,
}

impl Hull {
    /// Builds a hull; `parameters` are passed through [`HullParameters::sanitized`].
    pub fn new(parameters: HullParameters, wake: WakeEdgeStrategy, constants: Constants) -> Result<Self, SetupError> {
        Ok(Self {
            parameters: parameters.sanitized(),
            constants,
            friction: FrictionLine::new()?,
            residuary: ResiduaryRegression::new()?,
            heeled: HeeledWettedSurface::new()?,
            wake,
        })
    }

    /// Builds the wake strategy then the hull.
    pub fn from_descriptor(desc: &HullDescriptor, constants: Constants) -> Result<Self, SetupError> {
        Self::new(desc.parameters.clone(), WakeEdgeStrategy::from_descriptor(&desc.wake)?, constants)
    }

    /// Validated dimensions.
    pub fn parameters(&self) -> &HullParameters {
        &self.parameters
    }

    /// Fluid constants.
    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    /// Delft residuary regression.
    pub fn residuary_regression(&self) -> &ResiduaryRegression {
        &self.residuary
    }

    /// All hull forces for this tick. `current` is the world water velocity.
    pub fn compute_forces<B, V>(&self, dt: f64, body: &B, current: Vec3, volume: &V) -> (Resultant, HullDetails)
    where
        B: RigidBody + ?Sized,
        V: HullVolume + ?Sized,
    {
        let p = &self.parameters;
        let c = &self.constants;
        let frame = body.coord_system();
        let com = body.center_of_mass();
        let mass = body.total_mass();
        let velocity = body.linear_velocity();

        let mut details = HullDetails::default();

        let up = frame.up_axis();
        let port = frame.to_world_vector(&Vec3::new(0.0, 1.0, 0.0));
        details.heel_deg = port.z.atan2(up.z).to_degrees();

        let apparent = current - velocity;
        let speed = apparent.horizontal().magnitude();
        details.speed = speed;
        details.drag_direction = apparent.horizontal().normalized_or_zero();
        let gl = c.g * p.lwl;
        details.froude = if gl > EPSILON { speed / gl.sqrt() } else { 0.0 };
        details.dynamic_pressure = c.water_dynamic_pressure(speed);

        let friction = self.friction.evaluate(speed, p.lwl, c.nu_water, p.roughness);
        details.reynolds = friction.reynolds;
        details.cf = friction.cf;
        details.rough_friction = friction.rough;
        details.wetted_surface = self.heeled.wetted_surface(details.heel_deg, p);
        details.frictional = details.dynamic_pressure * friction.cf * details.wetted_surface;
        details.residuary = self.residuary.resistance(details.froude, p, c.rho_water, c.g);

        let immersed = volume.immersed(&Plane::horizontal(0.0), &frame);
        details.immersed_volume = immersed.volume;
        details.center_of_buoyancy = if is_like_zero(immersed.volume) { com } else { immersed.centroid };
        details.buoyancy = immersed.volume * c.specific_weight();

        if dt > EPSILON {
            let damped = velocity.z * ((1.0 - p.buoyancy_damping).powf(dt) - 1.0);
            details.damping = mass * damped / dt;
        }
        details.gravity = -mass * c.g;

        let mut total = Resultant::zero_at(com);
        total.add_force(details.drag_direction * (details.frictional + details.residuary), details.center_of_buoyancy);
        total.add_force(Vec3::new(0.0, 0.0, details.buoyancy), details.center_of_buoyancy);
        total.add_force(Vec3::new(0.0, 0.0, details.damping), com);
        total.add_force(Vec3::new(0.0, 0.0, details.gravity), com);
        details.total = total;

        details.wake = self.wake.edges(&velocity, &frame, &immersed.waterline_vertices);

        trace!(
            "hull: V={:.3} Fn={:.3} Rf={:.1} Rr={:.1} B={:.1} heel={:.1}",
            speed, details.froude, details.frictional, details.residuary, details.buoyancy, details.heel_deg
        );
        (total, details)
    }

    /// Computes this tick's forces and applies them to `body`.
    pub fn update<B, V>(&self, dt: f64, body: &mut B, current: Vec3, volume: &V) -> HullDetails
    where
        B: RigidBody + ?Sized,
        V: HullVolume + ?Sized,
    {
        let (total, details) = self.compute_forces(dt, body, current, volume);
        body.apply_resultant(&total);
        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{ImmersedVolume, TelemetryLog};
    use crate::vector::{CoordSystem, Quaternion};
    use approx::assert_relative_eq;

    struct Block {
        frame: CoordSystem,
        velocity: Vec3,
        mass: f64,
        applied: Resultant,
    }

    impl Block {
        fn moving(velocity: Vec3) -> Self {
            Self { frame: CoordSystem::identity(), velocity, mass: 7000.0, applied: Resultant::default() }
        }
    }

    impl RigidBody for Block {
        fn total_mass(&self) -> f64 {
            self.mass
        }
        fn center_of_mass(&self) -> Vec3 {
            self.frame.origin
        }
        fn coord_system(&self) -> CoordSystem {
            self.frame
        }
        fn linear_velocity(&self) -> Vec3 {
            self.velocity
        }
        fn angular_velocity(&self) -> Vec3 {
            Vec3::zero()
        }
        fn apply_resultant(&mut self, resultant: &Resultant) {
            self.applied += resultant;
        }
    }

    /// Fixed immersed volume below the origin.
    struct FixedVolume(f64);

    impl HullVolume for FixedVolume {
        fn immersed(&self, _water: &Plane, frame: &CoordSystem) -> ImmersedVolume {
            ImmersedVolume {
                volume: self.0,
                centroid: frame.to_world_point(&Vec3::new(0.0, 0.0, -0.3)),
                waterline_vertices: vec![
                    frame.to_world_point(&Vec3::new(5.0, 0.0, 0.0)),
                    frame.to_world_point(&Vec3::new(0.0, 1.5, 0.0)),
                    frame.to_world_point(&Vec3::new(-5.0, 0.0, 0.0)),
                    frame.to_world_point(&Vec3::new(0.0, -1.5, 0.0)),
                ],
            }
        }
    }

    fn hull() -> Hull {
        Hull::from_descriptor(&HullDescriptor::default(), Constants::new()).unwrap()
    }

    #[test]
    fn test_zero_speed_hull() {
        let hull = hull();
        let (_, d) = hull.compute_forces(0.05, &Block::moving(Vec3::zero()), Vec3::zero(), &FixedVolume(7.0));
        assert_eq!(d.frictional, 0.0);
        assert_eq!(d.speed, 0.0);
        assert_eq!(d.drag_direction, Vec3::zero());
        let floor = hull.residuary_regression().resistance(0.1, hull.parameters(), 1025.9, 9.81);
        assert_eq!(d.residuary, floor);
        assert!(d.wake.is_none());
    }

    #[test]
    fn test_resistance_opposes_motion() {
        let hull = hull();
        let (r, d) = hull.compute_forces(0.05, &Block::moving(Vec3::new(3.0, 0.0, 0.0)), Vec3::zero(), &FixedVolume(7.0));
        assert!(d.frictional > 0.0);
        assert!(r.force.x < 0.0);
        assert_relative_eq!(d.drag_direction, Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(d.froude, 3.0 / (9.81f64 * 10.0).sqrt());
    }

    #[test]
    fn test_current_is_apparent_flow() {
        let hull = hull();
        let still = Block::moving(Vec3::zero());
        let (_, drifting) = hull.compute_forces(0.05, &still, Vec3::new(0.0, 2.0, 0.0), &FixedVolume(7.0));
        assert_relative_eq!(drifting.drag_direction, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(drifting.speed, 2.0);
    }

    #[test]
    fn test_buoyancy_balances_gravity_at_rest() {
        let hull = hull();
        let c = Constants::new();
        let mut block = Block::moving(Vec3::zero());
        block.mass = 7.0 * c.rho_water;
        let (r, d) = hull.compute_forces(0.05, &block, Vec3::zero(), &FixedVolume(7.0));
        assert_relative_eq!(d.buoyancy, -d.gravity, epsilon = 1e-6);
        // residuary is horizontal and zero-direction at rest
        assert_relative_eq!(r.force, Vec3::zero(), epsilon = 1e-6);
    }

    #[test]
    fn test_damping_opposes_heave() {
        let hull = hull();
        let (_, rising) = hull.compute_forces(0.05, &Block::moving(Vec3::new(0.0, 0.0, 1.0)), Vec3::zero(), &FixedVolume(7.0));
        assert!(rising.damping < 0.0);
        let (_, sinking) =
            hull.compute_forces(0.05, &Block::moving(Vec3::new(0.0, 0.0, -1.0)), Vec3::zero(), &FixedVolume(7.0));
        assert!(sinking.damping > 0.0);
        let (_, frozen) = hull.compute_forces(0.0, &Block::moving(Vec3::new(0.0, 0.0, -1.0)), Vec3::zero(), &FixedVolume(7.0));
        assert_eq!(frozen.damping, 0.0);
    }

    #[test]
    fn test_damping_value() {
        let hull = hull();
        let (dt, vz) = (0.05, 0.8);
        let (r, d) = hull.compute_forces(dt, &Block::moving(Vec3::new(0.0, 0.0, vz)), Vec3::zero(), &FixedVolume(0.0));
        let expected = 7000.0 * vz * (0.5f64.powf(dt) - 1.0) / dt;
        assert_relative_eq!(d.damping, expected, epsilon = 1e-9);
        assert_relative_eq!(r.force.z, expected - 7000.0 * 9.81, epsilon = 1e-6);
    }

    #[test]
    fn test_out_of_range_parameters_stay_finite() {
        let desc = HullDescriptor {
            parameters: HullParameters {
                lwl: -10.0,
                displacement: -7.0,
                wetted_surface: f64::NAN,
                roughness: -0.001,
                buoyancy_damping: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        let hull = Hull::from_descriptor(&desc, Constants::new()).unwrap();
        let p = hull.parameters();
        assert_eq!(p.buoyancy_damping, 1.0);
        assert_eq!(p.lwl, 0.0);
        assert_eq!(p.displacement, 0.0);
        assert_eq!(p.wetted_surface, 0.0);
        assert_eq!(p.roughness, 0.0);

        let block = Block::moving(Vec3::new(3.0, 0.4, 0.5));
        let (r, d) = hull.compute_forces(0.05, &block, Vec3::zero(), &FixedVolume(7.0));
        for v in [r.force, r.moment, r.application_point] {
            assert!(v.to_array().iter().all(|x| x.is_finite()), "{v:?}");
        }
        assert_eq!(d.froude, 0.0);
        assert_eq!(d.frictional, 0.0);
        assert_eq!(d.residuary, 0.0);
        // full damping removes all vertical velocity within the tick
        assert_relative_eq!(d.damping, -7000.0 * 0.5 / 0.05, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_dt_has_no_damping() {
        let hull = hull();
        let (_, d) = hull.compute_forces(-0.05, &Block::moving(Vec3::new(0.0, 0.0, 1.0)), Vec3::zero(), &FixedVolume(7.0));
        assert_eq!(d.damping, 0.0);
    }

    #[test]
    fn test_heel_changes_wetted_surface() {
        let hull = hull();
        let mut block = Block::moving(Vec3::new(3.0, 0.0, 0.0));
        let (_, upright) = hull.compute_forces(0.05, &block, Vec3::zero(), &FixedVolume(7.0));
        block.frame = CoordSystem::new(Vec3::zero(), Quaternion::from_rpy_deg(20.0, 0.0, 0.0));
        let (_, heeled) = hull.compute_forces(0.05, &block, Vec3::zero(), &FixedVolume(7.0));
        assert_relative_eq!(heeled.heel_deg.abs(), 20.0, epsilon = 1e-9);
        let p = hull.parameters();
        let factor = hull.heeled.factor(20.0, p);
        assert_relative_eq!(heeled.wetted_surface, p.wetted_surface * factor, epsilon = 1e-9);
        assert!(heeled.wetted_surface != upright.wetted_surface);
    }

    #[test]
    fn test_update_applies_and_publishes() {
        let hull = hull();
        let mut block = Block::moving(Vec3::new(2.0, 0.5, 0.0));
        let details = hull.update(0.05, &mut block, Vec3::zero(), &FixedVolume(6.0));
        assert_eq!(block.applied.force, details.total.force);
        assert!(details.wake.is_some());

        let mut log = TelemetryLog::new();
        details.publish(&mut log, "hull");
        assert_eq!(log.get("hull.frictional"), Some(details.frictional));
        assert!(log.get("hull.wake.port.x").is_some());
    }
}
