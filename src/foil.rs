//! Sail, keel and rudder force model.
//!
//! A foil is evaluated in its own chord plane: the chord runs from the
//! leading reference point to the trailing point in local x/y, and the span
//! runs along local z. Lift and profile drag act at the quarter chord; the
//! returned resultant is anchored at the leading reference point at the
//! slice height.

use serde::{Deserialize, Serialize};

use crate::body::TelemetrySink;
use crate::error::SetupError;
use crate::lift_drag::{Coefficients, LiftDragCurve, LiftDragDescriptor};
use crate::math::is_like_zero;
use crate::resultant::Resultant;
use crate::vector::{CoordSystem, Quaternion, Vec2, Vec3};

/// Planform and mounting of one foil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoilGeometry {
    /// Leading reference point in the chord plane.
    pub leading_edge: Vec2,
    /// Aft end of the chord.
    pub trailing_edge: Vec2,
    /// Span-wise (local z) position of the evaluated slice.
    pub slice_z: f64,
    /// Planform area (m²).
    pub area: f64,
    /// Overrides the curve's aspect ratio when set.
    pub aspect_ratio: Option<f64>,
    /// Mount position in the parent frame.
    pub mount_offset: Vec3,
    /// Roll, pitch, yaw of the chord plane in the parent frame (degrees).
    pub rotation_deg: Vec3,
}

impl Default for FoilGeometry {
    fn default() -> Self {
        Self {
            leading_edge: Vec2::new(0.5, 0.0),
            trailing_edge: Vec2::new(-0.5, 0.0),
            slice_z: 0.0,
            area: 1.0,
            aspect_ratio: None,
            mount_offset: Vec3::zero(),
            rotation_deg: Vec3::zero(),
        }
    }
}

impl FoilGeometry {
    /// Vector from the leading to the trailing edge.
    pub fn chord(&self) -> Vec2 {
        self.trailing_edge - self.leading_edge
    }

    /// Point 25% of the chord behind the leading reference point.
    pub fn quarter_chord(&self) -> Vec2 {
        self.leading_edge + self.chord() * 0.25
    }
}

/// Load-time description of one sail or appendage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoilDescriptor {
    /// Name used for telemetry and trimming.
    pub name: String,
    /// Shape and mounting.
    pub geometry: FoilGeometry,
    /// Section coefficients.
    pub lift_drag: LiftDragDescriptor,
}

/// Diagnostics for one foil evaluation. Returned by value from every call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FoilDetails {
    /// Angle of attack, degrees.
    pub alpha_deg: f64,
    /// Unit chord vector.
    pub chord_direction: Vec2,
    /// Chord length (m).
    pub chord_length: f64,
    /// Quarter-chord point in the chord plane.
    pub quarter_chord: Vec2,
    /// Coefficients at `alpha_deg`.
    pub coefficients: Coefficients,
    /// ½ρV²
    pub dynamic_pressure: f64,
    /// Lift, perpendicular to the flow.
    pub lift: Vec2,
    /// Profile drag, along the flow.
    pub drag: Vec2,
    /// Induced drag, along the flow; zero without an aspect ratio.
    pub induced_drag: Vec2,
    /// Resultant in the chord plane.
    pub local: Resultant,
    /// Resultant in world coordinates.
    pub world: Resultant,
}

impl FoilDetails {
    /// Records every field under `prefix`.
    pub fn publish(&self, sink: &mut dyn TelemetrySink, prefix: &str) {
        sink.record(&format!("{prefix}.alpha_deg"), self.alpha_deg);
        sink.record(&format!("{prefix}.cl"), self.coefficients.cl);
        sink.record(&format!("{prefix}.cd"), self.coefficients.cd);
        sink.record(&format!("{prefix}.cm"), self.coefficients.cm);
        sink.record(&format!("{prefix}.stall_fraction"), self.coefficients.stall_fraction);
        sink.record(&format!("{prefix}.q"), self.dynamic_pressure);
        sink.record(&format!("{prefix}.lift"), self.lift.magnitude());
        sink.record(&format!("{prefix}.drag"), self.drag.magnitude() + self.induced_drag.magnitude());
        sink.record_vec(&format!("{prefix}.chord"), &self.chord_direction.extend(0.0));
        sink.record_vec(&format!("{prefix}.force"), &self.world.force);
        sink.record_vec(&format!("{prefix}.moment"), &self.world.moment);
        sink.record_vec(&format!("{prefix}.point"), &self.world.application_point);
    }
}

/// A lifting surface with its coefficient curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Foil {
    name: String,
    geometry: FoilGeometry,
    curve: LiftDragCurve,
    /// Rotation about local z set by the host (rudder angle, sheeting), degrees.
    pub trim_deg: f64,
}

impl Foil {
    /// Untrimmed foil.
    pub fn new(name: impl Into<String>, geometry: FoilGeometry, curve: LiftDragCurve) -> Self {
        Self { name: name.into(), geometry, curve, trim_deg: 0.0 }
    }

    /// Builds the coefficient curve; fails on malformed tables.
    pub fn from_descriptor(desc: &FoilDescriptor) -> Result<Self, SetupError> {
        let curve = LiftDragCurve::from_descriptor(&desc.lift_drag)?;
        Ok(Self::new(desc.name.clone(), desc.geometry.clone(), curve))
    }

    /// Name from the descriptor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape and mounting.
    pub fn geometry(&self) -> &FoilGeometry {
        &self.geometry
    }

    /// Coefficient curve.
    pub fn curve(&self) -> &LiftDragCurve {
        &self.curve
    }

    fn aspect_ratio(&self) -> Option<f64> {
        self.geometry.aspect_ratio.or(self.curve.aspect_ratio()).filter(|ar| *ar > 0.0)
    }

    /// Frame of the chord plane inside `parent`.
    pub fn frame(&self, parent: &CoordSystem) -> CoordSystem {
        let r = &self.geometry.rotation_deg;
        let mount = Quaternion::from_rpy_deg(r.x, r.y, r.z);
        let trim = Quaternion::from_axis_angle(&Vec3::up(), self.trim_deg.to_radians());
        parent.child(&self.geometry.mount_offset, &mount.mul(&trim))
    }

    /// Force of a planar flow (fluid velocity relative to the foil) in the chord plane.
    pub fn compute_local_force(&self, density: f64, flow: Vec2) -> (Resultant, FoilDetails) {
        let g = &self.geometry;
        let chord = g.chord();
        let chord_length = chord.magnitude();
        let reference = g.leading_edge.extend(g.slice_z);

        let mut details = FoilDetails {
            chord_length,
            quarter_chord: g.quarter_chord(),
            local: Resultant::zero_at(reference),
            ..Default::default()
        };

        let speed = flow.magnitude();
        if is_like_zero(speed) || is_like_zero(chord_length) {
            return (details.local, details);
        }
        let chord_dir = chord / chord_length;
        let flow_dir = flow / speed;
        details.chord_direction = chord_dir;

        details.alpha_deg = chord_dir.cross(&flow).atan2(chord_dir.dot(&flow)).to_degrees();
        let c = self.curve.evaluate(details.alpha_deg);
        details.coefficients = c;

        let q = 0.5 * density * speed * speed;
        let qa = q * g.area;
        details.dynamic_pressure = q;
        details.lift = flow_dir.perp() * (qa * c.cl);
        details.drag = flow_dir * (qa * c.cd);
        if let Some(ar) = self.aspect_ratio() {
            details.induced_drag = flow_dir * (qa * c.cl * c.cl / (std::f64::consts::PI * ar));
        }

        let profile = details.lift + details.drag;
        let moment_z = (details.quarter_chord - g.leading_edge).cross(&profile) + qa * chord_length * c.cm;
        details.local = Resultant::new(
            (profile + details.induced_drag).extend(0.0),
            Vec3::new(0.0, 0.0, moment_z),
            reference,
        );
        (details.local, details)
    }

    /// Force of a world flow on the foil mounted in `parent` (world frame of the hull or rig).
    pub fn compute_world_force(&self, density: f64, flow: Vec3, parent: &CoordSystem) -> (Resultant, FoilDetails) {
        let frame = self.frame(parent);
        let local_flow = frame.to_local_vector(&flow).xy();
        let (local, mut details) = self.compute_local_force(density, local_flow);
        details.world = Resultant::new(
            frame.to_world_vector(&local.force),
            frame.to_world_vector(&local.moment),
            frame.to_world_point(&local.application_point),
        );
        (details.world, details)
    }
}
