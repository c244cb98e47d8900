/// Demo run: a small keelboat reaching across a steady breeze while a puff
/// passes over it, with a no-sail boundary to the south.
///
/// Run with `RUST_LOG=debug` to see puff lifecycle and per-step forces.
use log::{error, info};

use sailforce::body::{HullVolume, ImmersedVolume, RigidBody, TelemetryLog};
use sailforce::boundary::{BoundaryField, BoundaryProbe};
use sailforce::foil::{FoilDescriptor, FoilGeometry};
use sailforce::hull::HullDescriptor;
use sailforce::lift_drag::{CoefficientTable, LiftDragDescriptor};
use sailforce::vector::{CoordSystem, Plane, Quaternion, Vec2, Vec3};
use sailforce::vessel::{Environment, Vessel, VesselDescriptor};
use sailforce::wind::{SteadyWind, WindField, WindPuffDescriptor};
use sailforce::{Constants, Resultant};

/// Rectangular box hull used in place of a real mesh.
struct BoxHull {
    length: f64,
    beam: f64,
    height: f64,
}

impl HullVolume for BoxHull {
    fn immersed(&self, water: &Plane, frame: &CoordSystem) -> ImmersedVolume {
        let bottom = frame.origin.z - self.height / 2.0;
        let depth = (water.point.z - bottom).clamp(0.0, self.height);
        let (hl, hb) = (self.length / 2.0, self.beam / 2.0);
        let z = -self.height / 2.0 + depth;
        let corners = [(hl, 0.0), (0.0, hb), (-hl, hb), (-hl, -hb), (0.0, -hb)];
        ImmersedVolume {
            volume: self.length * self.beam * depth,
            centroid: Vec3::new(frame.origin.x, frame.origin.y, bottom + depth / 2.0),
            waterline_vertices: corners.iter().map(|(x, y)| frame.to_world_point(&Vec3::new(*x, *y, z))).collect(),
        }
    }
}

/// Point mass that keeps its heading and integrates with explicit Euler.
struct PointBody {
    mass: f64,
    frame: CoordSystem,
    velocity: Vec3,
    accumulated: Resultant,
}

impl PointBody {
    fn step(&mut self, dt: f64) {
        let acceleration = self.accumulated.force / self.mass;
        self.velocity += acceleration * dt;
        self.frame.origin += self.velocity * dt;
        self.accumulated = Resultant::zero_at(self.frame.origin);
    }
}

impl RigidBody for PointBody {
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
        self.accumulated += resultant;
    }
}

fn profile(max_cl: f64, cd0: f64) -> LiftDragDescriptor {
    LiftDragDescriptor {
        curve: CoefficientTable {
            alpha_deg: vec![0.0, 5.0, 10.0, 15.0, 20.0, 30.0, 90.0],
            cl: vec![0.0, 0.5 * max_cl, 0.9 * max_cl, max_cl, 0.95 * max_cl, 0.8 * max_cl, 0.0],
            cd: vec![cd0, cd0 * 1.2, cd0 * 2.0, cd0 * 4.0, 0.15, 0.3, 1.2],
            cm: vec![],
        },
        ..Default::default()
    }
}

fn keelboat() -> VesselDescriptor {
    VesselDescriptor {
        constants: Constants::seawater(),
        hull: HullDescriptor::default(),
        sails: vec![FoilDescriptor {
            name: "main".into(),
            geometry: FoilGeometry {
                leading_edge: Vec2::new(1.0, 0.0),
                trailing_edge: Vec2::new(-2.0, 0.0),
                slice_z: 4.0,
                area: 20.0,
                aspect_ratio: Some(3.5),
                ..Default::default()
            },
            lift_drag: profile(1.3, 0.02),
        }],
        appendages: vec![
            FoilDescriptor {
                name: "keel".into(),
                geometry: FoilGeometry {
                    slice_z: -1.0,
                    area: 1.5,
                    aspect_ratio: Some(2.0),
                    mount_offset: Vec3::new(0.0, 0.0, -0.6),
                    ..Default::default()
                },
                lift_drag: profile(1.0, 0.008),
            },
            FoilDescriptor {
                name: "rudder".into(),
                geometry: FoilGeometry {
                    leading_edge: Vec2::new(0.15, 0.0),
                    trailing_edge: Vec2::new(-0.15, 0.0),
                    slice_z: -0.5,
                    area: 0.4,
                    aspect_ratio: Some(3.0),
                    mount_offset: Vec3::new(-4.5, 0.0, -0.3),
                    ..Default::default()
                },
                lift_drag: profile(1.0, 0.008),
            },
        ],
    }
}

fn main() {
    env_logger::init();

    println!("===================================================");
    println!("Sailing Vessel Force Model Demo");
    println!("===================================================");
    println!();

    let desc = keelboat();
    println!("Physical Constants:");
    for (k, v) in desc.constants.summary() {
        println!("  {}: {}", k, v);
    }
    println!();

    let mut vessel = match Vessel::from_descriptor(&desc) {
        Ok(vessel) => vessel,
        Err(e) => {
            error!("vessel descriptor rejected: {e}");
            std::process::exit(1);
        }
    };
    if let Some(main) = vessel.foil_mut("main") {
        main.trim_deg = -30.0;
    }

    // wind from the north; heading east, the boat is on a beam reach
    let mut wind = WindField::new(SteadyWind::new(6.0, 0.0));
    wind.add_puff(&WindPuffDescriptor {
        center: Vec2::new(0.0, 60.0),
        velocity: Vec2::new(0.0, -7.0),
        ..Default::default()
    });
    let boundary = BoundaryField::new(&[vec![Vec2::new(-500.0, -40.0), Vec2::new(500.0, -40.0)]], 1.0, 0.25);

    let hull_shape = BoxHull { length: 10.0, beam: 3.0, height: 1.2 };
    let params = &desc.hull.parameters;
    let mut body = PointBody {
        mass: params.displacement * desc.constants.rho_water,
        frame: CoordSystem::new(Vec3::zero(), Quaternion::identity()),
        velocity: Vec3::new(2.0, 0.0, 0.0),
        accumulated: Resultant::default(),
    };
    let mut probe = BoundaryProbe::new();
    let mut telemetry = TelemetryLog::new();

    let dt = 0.05;
    let steps = 600;
    println!("Simulating {} steps at dt = {:.2}s", steps, dt);
    for step in 0..steps {
        let env = Environment { wind: &wind, boundary: &boundary, current: Vec3::zero() };
        let details = vessel.update(dt, &mut body, &env, &mut probe, &hull_shape, Some(&mut telemetry));
        body.step(dt);
        wind.update(dt);

        if step % 60 == 0 {
            info!(
                "t={:5.1}s pos=({:7.1}, {:6.1}) V={:.2} m/s Fn={:.3} Rf={:.0} N Rr={:.0} N sail α={:.1}° puffs={}",
                step as f64 * dt,
                body.frame.origin.x,
                body.frame.origin.y,
                body.velocity.horizontal().magnitude(),
                details.hull.froude,
                details.hull.frictional,
                details.hull.residuary,
                details.sails.first().map_or(0.0, |s| s.alpha_deg),
                wind.puffs().len(),
            );
        }
    }

    println!();
    println!("Final telemetry:");
    for (name, value) in telemetry.iter().filter(|(name, _)| name.starts_with("hull.") || name.starts_with("total.")) {
        println!("  {:32} {:12.3}", name, value);
    }
    println!();
    println!("===================================================");
    println!("Demo completed successfully!");
    println!("===================================================");
}
