//! Capabilities the force model needs from its host.
//!
//! The rigid-body integrator, the hull mesh and any diagnostics display live
//! outside this crate. They are reached only through these traits.

use std::collections::BTreeMap;

use crate::resultant::Resultant;
use crate::vector::{CoordSystem, Plane, Vec3};

/// A rigid body the force components read kinematics from and push forces into.
pub trait RigidBody {
    /// Total mass (kg).
    fn total_mass(&self) -> f64;

    /// Centre of mass in world coordinates.
    fn center_of_mass(&self) -> Vec3;

    /// Local-to-world frame of the body.
    fn coord_system(&self) -> CoordSystem;

    /// World velocity of the centre of mass.
    fn linear_velocity(&self) -> Vec3;

    /// World angular velocity (rad/s).
    fn angular_velocity(&self) -> Vec3;

    /// World velocity of a world point rigidly attached to the body.
    fn point_velocity(&self, point: &Vec3) -> Vec3 {
        self.linear_velocity() + self.angular_velocity().cross(&(*point - self.center_of_mass()))
    }

    /// Accumulates a world-space resultant for the current step.
    fn apply_resultant(&mut self, resultant: &Resultant);
}

/// Part of a hull below a plane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImmersedVolume {
    /// Submerged volume (m³).
    pub volume: f64,
    /// World centroid of the submerged volume.
    pub centroid: Vec3,
    /// World positions of hull vertices lying on or below the plane.
    pub waterline_vertices: Vec<Vec3>,
}

/// Plane-vs-volume intersection for a hull shape.
pub trait HullVolume {
    /// Immersed part of the hull below `water` with the hull placed in `frame`.
    fn immersed(&self, water: &Plane, frame: &CoordSystem) -> ImmersedVolume;
}

/// Write-only sink for per-tick diagnostic values.
pub trait TelemetrySink {
    /// Stores one named value.
    fn record(&mut self, name: &str, value: f64);

    /// Stores a vector as `name.x`, `name.y` and `name.z`.
    fn record_vec(&mut self, name: &str, value: &Vec3) {
        self.record(&format!("{name}.x"), value.x);
        self.record(&format!("{name}.y"), value.y);
        self.record(&format!("{name}.z"), value.z);
    }
}

/// Sink that keeps the latest value per name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryLog {
    values: BTreeMap<String, f64>,
}

impl TelemetryLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Forgets every value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl TelemetrySink for TelemetryLog {
    fn record(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }
}
