//! Benchmarks for the per-tick force path.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use sailforce::body::{HullVolume, ImmersedVolume, RigidBody};
use sailforce::boundary::{BoundaryField, BoundaryProbe};
use sailforce::hull::{Hull, HullDescriptor};
use sailforce::interp::{Calculator, MultiDimInterpolator};
use sailforce::lift_drag::{CoefficientTable, LiftDragCurve, LiftDragDescriptor};
use sailforce::spline::SplineInterpolator;
use sailforce::vector::{CoordSystem, Plane, Vec2, Vec3};
use sailforce::wind::{SteadyWind, WindField, WindPuffDescriptor};
use sailforce::{Constants, Resultant};

/// Sample angles across a full revolution
fn generate_angles(step: f64) -> Vec<f64> {
    let n = (360.0 / step).ceil() as usize;
    (0..n).map(|i| -180.0 + i as f64 * step).collect()
}

fn create_lift_drag(stall: bool) -> LiftDragDescriptor {
    let curve = CoefficientTable {
        alpha_deg: vec![0.0, 4.0, 8.0, 12.0, 16.0, 20.0, 30.0, 60.0, 90.0],
        cl: vec![0.0, 0.45, 0.85, 1.15, 1.25, 1.2, 1.0, 0.6, 0.0],
        cd: vec![0.01, 0.012, 0.02, 0.035, 0.06, 0.12, 0.35, 0.9, 1.2],
        cm: vec![0.0, -0.01, -0.02, -0.03, -0.04, -0.06, -0.1, -0.2, -0.25],
    };
    let stalled = CoefficientTable {
        alpha_deg: vec![0.0, 90.0],
        cl: vec![0.7, 0.0],
        cd: vec![0.4, 1.2],
        cm: vec![-0.1, -0.25],
    };
    LiftDragDescriptor {
        curve,
        stall_start_deg: stall.then_some(14.0),
        lift_end_deg: stall.then_some(24.0),
        stalled: if stall { stalled } else { CoefficientTable::default() },
        ..Default::default()
    }
}

struct StillBody;

impl RigidBody for StillBody {
    fn total_mass(&self) -> f64 {
        7000.0
    }
    fn center_of_mass(&self) -> Vec3 {
        Vec3::zero()
    }
    fn coord_system(&self) -> CoordSystem {
        CoordSystem::identity()
    }
    fn linear_velocity(&self) -> Vec3 {
        Vec3::new(3.0, 0.4, 0.0)
    }
    fn angular_velocity(&self) -> Vec3 {
        Vec3::zero()
    }
    fn apply_resultant(&mut self, _resultant: &Resultant) {}
}

struct RingVolume {
    vertices: Vec<Vec3>,
}

impl HullVolume for RingVolume {
    fn immersed(&self, _water: &Plane, _frame: &CoordSystem) -> ImmersedVolume {
        ImmersedVolume { volume: 6.8, centroid: Vec3::new(0.0, 0.0, -0.3), waterline_vertices: self.vertices.clone() }
    }
}

/// Benchmark spline setup and lookup
fn bench_spline(c: &mut Criterion) {
    let xs: Vec<f64> = (0..64).map(|i| i as f64 * 0.5).collect();
    let ys: Vec<f64> = xs.iter().map(|x| (x * 0.7).sin()).collect();
    let spline = SplineInterpolator::new(&xs, &ys).unwrap();

    let mut group = c.benchmark_group("Spline");
    group.bench_function("setup_64", |bencher| {
        bencher.iter(|| SplineInterpolator::new(black_box(&xs), black_box(&ys)))
    });
    group.bench_function("interpolate", |bencher| bencher.iter(|| spline.interpolate(black_box(17.3))));
    group.bench_function("interpolate_with_hint", |bencher| {
        bencher.iter(|| spline.interpolate_with_hint(black_box(17.3), 34))
    });
    group.finish();
}

/// Benchmark the interpolation strategies on a 3-curve table
fn bench_multi_dim(c: &mut Criterion) {
    let knots: Vec<f64> = (0..19).map(|i| -90.0 + i as f64 * 10.0).collect();
    let rows: Vec<Vec<f64>> =
        (0..3).map(|d| knots.iter().map(|k| (k.to_radians() * (d + 1) as f64).sin()).collect()).collect();

    let mut group = c.benchmark_group("MultiDim");
    for calculator in [Calculator::Linear, Calculator::CatmullRom] {
        let interp = MultiDimInterpolator::new(&knots, &rows, calculator).unwrap();
        group.bench_with_input(BenchmarkId::new("interpolate_into", format!("{calculator:?}")), &interp, |b, interp| {
            let mut out = [0.0; 3];
            b.iter(|| interp.interpolate_into(black_box(12.5), &mut out))
        });
    }
    group.finish();
}

/// Benchmark a coefficient sweep with and without stall blending
fn bench_lift_drag(c: &mut Criterion) {
    let angles = generate_angles(0.5);
    let mut group = c.benchmark_group("LiftDrag");
    group.throughput(Throughput::Elements(angles.len() as u64));
    for stall in [false, true] {
        let curve = LiftDragCurve::from_descriptor(&create_lift_drag(stall)).unwrap();
        group.bench_with_input(BenchmarkId::new("sweep", stall), &curve, |b, curve| {
            b.iter(|| angles.iter().map(|a| curve.evaluate(*a).cl).sum::<f64>())
        });
    }
    group.finish();
}

/// Benchmark one hull tick, brute-force wake scan included
fn bench_hull(c: &mut Criterion) {
    let hull = Hull::from_descriptor(&HullDescriptor::default(), Constants::new()).unwrap();
    let volume = RingVolume {
        vertices: (0..64)
            .map(|i| {
                let a = i as f64 / 64.0 * std::f64::consts::TAU;
                Vec3::new(5.0 * a.cos(), 1.5 * a.sin(), 0.0)
            })
            .collect(),
    };

    let mut group = c.benchmark_group("Hull");
    group.bench_function("compute_forces", |bencher| {
        bencher.iter(|| hull.compute_forces(0.02, &StillBody, black_box(Vec3::new(0.0, 0.2, 0.0)), &volume))
    });
    group.finish();
}

/// Benchmark wind and boundary field queries
fn bench_fields(c: &mut Criterion) {
    let mut wind = WindField::new(SteadyWind::new(7.0, 220.0));
    for i in 0..8 {
        wind.add_puff(&WindPuffDescriptor {
            center: Vec2::new(i as f64 * 30.0, 100.0),
            velocity: Vec2::new(1.0, -6.0),
            ..Default::default()
        });
    }
    let coast: Vec<Vec2> = (0..200).map(|i| Vec2::new(i as f64 * 5.0, (i as f64 * 0.1).sin() * 20.0)).collect();
    let boundary = BoundaryField::new(&[coast], 1.0, 0.25);

    let mut group = c.benchmark_group("Fields");
    group.bench_function("wind_8_puffs", |bencher| {
        bencher.iter(|| wind.get_flow_velocity(black_box(&Vec3::new(60.0, 40.0, 5.0))))
    });
    group.bench_function("boundary_uncached", |bencher| {
        let mut probe = BoundaryProbe::new();
        let mut x = 0.0;
        bencher.iter(|| {
            x += 0.01;
            boundary.resisting_wind_velocity(&Vec3::new(x, -30.0, 0.0), &mut probe)
        })
    });
    group.bench_function("boundary_cached", |bencher| {
        let mut probe = BoundaryProbe::new();
        let p = Vec3::new(400.0, -30.0, 0.0);
        bencher.iter(|| boundary.resisting_current_velocity(black_box(&p), &mut probe))
    });
    group.finish();
}

criterion_group!(benches, bench_spline, bench_multi_dim, bench_lift_drag, bench_hull, bench_fields,);

criterion_main!(benches);
