//! Port/starboard wake origins on the waterline.
//!
//! Two interchangeable strategies: scan the submerged waterline vertices each
//! tick, or look the local origin up in a table over leeway angle.

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::interp::{Calculator, MultiDimInterpolator};
use crate::math::{is_like_zero, wrap_degrees};
use crate::vector::{CoordSystem, Vec3};

/// Where the wake leaves the hull on either side of the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WakeEdges {
    /// Leftmost point relative to the direction of travel.
    pub port: Vec3,
    /// Rightmost point relative to the direction of travel.
    pub starboard: Vec3,
    /// Angle of the velocity in the hull frame, degrees (0 = straight ahead).
    pub leeway_deg: f64,
}

/// Load-time choice of strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WakeEdgeDescriptor {
    /// Scan the waterline vertices every tick.
    #[default]
    BruteForce,
    /// Local (x, y) of the port origin sampled over leeway; the starboard
    /// origin is read at leeway + 180°.
    Table {
        /// Leeway samples, degrees, strictly increasing.
        leeway_deg: Vec<f64>,
        /// Local x of the port origin per sample.
        x: Vec<f64>,
        /// Local y of the port origin per sample.
        y: Vec<f64>,
    },
}

/// Runtime wake-edge lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum WakeEdgeStrategy {
    /// Scan the waterline vertices every tick.
    BruteForce,
    /// Port origin over leeway; rows are local x and y.
    Table(MultiDimInterpolator),
}

impl WakeEdgeStrategy {
    /// Resolves the descriptor; fails on a malformed table.
    pub fn from_descriptor(desc: &WakeEdgeDescriptor) -> Result<Self, SetupError> {
        match desc {
            WakeEdgeDescriptor::BruteForce => Ok(Self::BruteForce),
            WakeEdgeDescriptor::Table { leeway_deg, x, y } => {
                let table = MultiDimInterpolator::new(leeway_deg, &[x.clone(), y.clone()], Calculator::Linear)
                    .map_err(|e| e.in_curve("wake_table"))?;
                Ok(Self::Table(table))
            }
        }
    }

    /// Wake origins for a hull in `frame` moving at world `velocity`.
    /// `None` when the hull is not moving horizontally or nothing is submerged.
    pub fn edges(&self, velocity: &Vec3, frame: &CoordSystem, waterline: &[Vec3]) -> Option<WakeEdges> {
        let heading = velocity.horizontal().normalized()?;
        let local = frame.to_local_vector(velocity);
        if is_like_zero(local.x) && is_like_zero(local.y) {
            return None;
        }
        let leeway_deg = local.y.atan2(local.x).to_degrees();

        match self {
            Self::BruteForce => {
                let lateral = Vec3::up().cross(&heading);
                let mut vertices = waterline.iter();
                let first = *vertices.next()?;
                let (mut port, mut starboard) = (first, first);
                let (mut max, mut min) = (first.dot(&lateral), first.dot(&lateral));
                for v in vertices {
                    let d = v.dot(&lateral);
                    if d > max {
                        max = d;
                        port = *v;
                    }
                    if d < min {
                        min = d;
                        starboard = *v;
                    }
                }
                Some(WakeEdges { port, starboard, leeway_deg })
            }
            Self::Table(table) => {
                let lookup = |angle: f64| {
                    let mut xy = [0.0; 2];
                    table.interpolate_into(angle, &mut xy);
                    frame.to_world_point(&Vec3::new(xy[0], xy[1], 0.0))
                };
                Some(WakeEdges {
                    port: lookup(leeway_deg),
                    starboard: lookup(wrap_degrees(leeway_deg + 180.0)),
                    leeway_deg,
                })
            }
        }
    }
}
