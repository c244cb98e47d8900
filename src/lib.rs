//! Per-tick force model for a simulated sailing vessel.
//!
//! This library provides:
//! - Natural cubic splines and multi-curve interpolation (linear, Catmull-Rom)
//! - Lift/drag/moment curves with stall blending
//! - Foil (sail, keel, rudder) forces in local and world frames
//! - Hull resistance (ITTC-1957 friction, Delft residuary regression),
//!   buoyancy, gravity and wake-edge tracking
//! - A steady wind with travelling gusts
//! - No-sail-zone boundaries that push stray vessels back
//!
//! Everything runs synchronously inside one `update(dt)` per tick. The rigid
//! body, the hull mesh and any telemetry display belong to the host and are
//! reached through the traits in [`body`].
//!
//! # Conventions
//!
//! World x points east, y north, z up. Vessel x points to the bow, y to port,
//! z up. Angles in descriptors are degrees.

#![warn(missing_docs)]
#![warn(clippy::doc_markdown)]

pub mod body;
pub mod boundary;
pub mod constants;
pub mod error;
pub mod foil;
pub mod hull;
pub mod interp;
pub mod lift_drag;
pub mod math;
pub mod resultant;
pub mod spline;
pub mod vector;
pub mod vessel;
pub mod wind;

// Re-export key types for easy use
pub use body::{HullVolume, ImmersedVolume, RigidBody, TelemetryLog, TelemetrySink};
pub use boundary::{BoundaryDescriptor, BoundaryField, BoundaryProbe};
pub use constants::Constants;
pub use error::SetupError;
pub use foil::{Foil, FoilDescriptor, FoilDetails, FoilGeometry};
pub use hull::{Hull, HullDescriptor, HullDetails, HullParameters};
pub use interp::{Calculator, MultiDimInterpolator, SplineCalculator};
pub use lift_drag::{Coefficients, LiftDragCurve, LiftDragDescriptor};
pub use resultant::Resultant;
pub use spline::SplineInterpolator;
pub use vector::{CoordSystem, Plane, Quaternion, Vec2, Vec3};
pub use vessel::{Environment, Vessel, VesselDescriptor, VesselDetails};
pub use wind::{SteadyWind, WindField, WindPuff, WindPuffDescriptor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
