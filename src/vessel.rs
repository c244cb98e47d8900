//! One vessel: a hull, its sails and its underwater appendages.
//!
//! `update` gathers every force for one tick and applies the sum to the
//! rigid body once. Sails see the wind field plus the boundary's resisting
//! wind; the hull and appendages see the water current plus the boundary's
//! resisting current. Both boundary queries are made at the centre of mass
//! so the second one is served from the probe cache.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::body::{HullVolume, RigidBody, TelemetrySink};
use crate::boundary::{BoundaryField, BoundaryProbe};
use crate::constants::Constants;
use crate::error::SetupError;
use crate::foil::{Foil, FoilDescriptor, FoilDetails};
use crate::hull::{Hull, HullDescriptor, HullDetails};
use crate::resultant::Resultant;
use crate::vector::{CoordSystem, Vec3};
use crate::wind::WindField;

/// Load-time description of a whole vessel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselDescriptor {
    /// Fluid constants.
    pub constants: Constants,
    /// Hull.
    pub hull: HullDescriptor,
    /// Sails, in the air.
    pub sails: Vec<FoilDescriptor>,
    /// Keel, rudder and other foils in the water.
    pub appendages: Vec<FoilDescriptor>,
}

/// Shared, read-only surroundings of every vessel for one tick.
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    /// Wind over the water.
    pub wind: &'a WindField,
    /// No-sail zones.
    pub boundary: &'a BoundaryField,
    /// World water velocity.
    pub current: Vec3,
}

/// Everything computed for one vessel in one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VesselDetails {
    /// Hull outputs.
    pub hull: HullDetails,
    /// Per-sail outputs, in descriptor order.
    pub sails: Vec<FoilDetails>,
    /// Per-appendage outputs, in descriptor order.
    pub appendages: Vec<FoilDetails>,
    /// Boundary velocity added to the wind.
    pub boundary_wind: Vec3,
    /// Boundary velocity added to the current.
    pub boundary_current: Vec3,
    /// Force applied to the body.
    pub total: Resultant,
}

impl VesselDetails {
    /// Records every component under its own prefix.
    pub fn publish(&self, sink: &mut dyn TelemetrySink, vessel: &Vessel) {
        self.hull.publish(sink, "hull");
        for (foil, details) in vessel.sails.iter().zip(&self.sails) {
            details.publish(sink, &format!("sail.{}", foil.name()));
        }
        for (foil, details) in vessel.appendages.iter().zip(&self.appendages) {
            details.publish(sink, &format!("appendage.{}", foil.name()));
        }
        sink.record_vec("boundary.wind", &self.boundary_wind);
        sink.record_vec("boundary.current", &self.boundary_current);
        sink.record_vec("total.force", &self.total.force);
        sink.record_vec("total.moment", &self.total.moment);
    }
}

/// Hull, sails and appendages of one boat.
#[derive(Debug, Clone, PartialEq)]
pub struct Vessel {
    constants: Constants,
    hull: Hull,
    sails: Vec<Foil>,
    appendages: Vec<Foil>,
}

impl Vessel {
    /// Builds every component; the first malformed curve fails the whole vessel.
    pub fn from_descriptor(desc: &VesselDescriptor) -> Result<Self, SetupError> {
        let foils = |list: &[FoilDescriptor]| list.iter().map(Foil::from_descriptor).collect::<Result<Vec<_>, _>>();
        Ok(Self {
            constants: desc.constants,
            hull: Hull::from_descriptor(&desc.hull, desc.constants)?,
            sails: foils(&desc.sails)?,
            appendages: foils(&desc.appendages)?,
        })
    }

    /// The hull.
    pub fn hull(&self) -> &Hull {
        &self.hull
    }

    /// Sails in descriptor order.
    pub fn sails(&self) -> &[Foil] {
        &self.sails
    }

    /// Appendages in descriptor order.
    pub fn appendages(&self) -> &[Foil] {
        &self.appendages
    }

    /// Sail or appendage by name, for trimming.
    pub fn foil_mut(&mut self, name: &str) -> Option<&mut Foil> {
        self.sails.iter_mut().chain(self.appendages.iter_mut()).find(|f| f.name() == name)
    }

    /// Point at which a foil samples the flow: its quarter chord at the slice height.
    fn sample_point(foil: &Foil, frame: &CoordSystem) -> Vec3 {
        let g = foil.geometry();
        foil.frame(frame).to_world_point(&g.quarter_chord().extend(g.slice_z))
    }

    /// Sums every force on the vessel for this tick and applies it to `body`.
    pub fn update<B, V>(
        &self,
        dt: f64,
        body: &mut B,
        env: &Environment<'_>,
        probe: &mut BoundaryProbe,
        volume: &V,
        sink: Option<&mut dyn TelemetrySink>,
    ) -> VesselDetails
    where
        B: RigidBody + ?Sized,
        V: HullVolume + ?Sized,
    {
        let frame = body.coord_system();
        let com = body.center_of_mass();

        let boundary_wind = env.boundary.resisting_wind_velocity(&com, probe);
        let boundary_current = env.boundary.resisting_current_velocity(&com, probe);
        let water = env.current + boundary_current;

        let mut total = Resultant::zero_at(com);

        let (hull_force, hull) = self.hull.compute_forces(dt, &*body, water, volume);
        total += &hull_force;

        let mut sails = Vec::with_capacity(self.sails.len());
        for sail in &self.sails {
            let p = Self::sample_point(sail, &frame);
            let apparent = env.wind.get_flow_velocity(&p) + boundary_wind - body.point_velocity(&p);
            let (force, details) = sail.compute_world_force(self.constants.rho_air, apparent, &frame);
            total += &force;
            sails.push(details);
        }

        let mut appendages = Vec::with_capacity(self.appendages.len());
        for foil in &self.appendages {
            let p = Self::sample_point(foil, &frame);
            let apparent = water - body.point_velocity(&p);
            let (force, details) = foil.compute_world_force(self.constants.rho_water, apparent, &frame);
            total += &force;
            appendages.push(details);
        }

        body.apply_resultant(&total);
        trace!("vessel: F=({:.1}, {:.1}, {:.1})", total.force.x, total.force.y, total.force.z);

        let details = VesselDetails { hull, sails, appendages, boundary_wind, boundary_current, total };
        if let Some(sink) = sink {
            details.publish(sink, self);
        }
        details
    }
}
