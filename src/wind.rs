//! Wind: a steady component plus travelling gusts ("puffs").
//!
//! A puff is a quadrilateral moving along its centreline. Its leading edge
//! and trailing edge have independent widths, so streamlines inside it fan
//! out (leading edge wider) or converge. While it travels the edges spread
//! and the puff slows down; once it has run its distance or stopped it is
//! inert for good.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::math::{is_like_zero, lerp, smoothstep3};
use crate::vector::{Vec2, Vec3};

/// Speed-scaled height over which a puff builds up above the water.
/// The taper point is this divided by the current puff speed.
pub const HEIGHT_TAPER_SCALE: f64 = 10.0;

/// Constant wind. The bearing is where the wind blows *from*, clockwise from
/// north (+y), with x pointing east.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteadyWind {
    /// Wind speed (m/s).
    pub speed: f64,
    /// Compass bearing the wind blows from, degrees.
    pub from_bearing_deg: f64,
}

impl SteadyWind {
    /// Wind of `speed` from `from_bearing_deg`.
    pub fn new(speed: f64, from_bearing_deg: f64) -> Self {
        Self { speed, from_bearing_deg }
    }

    /// World velocity of the air.
    pub fn velocity(&self) -> Vec3 {
        let (sin_b, cos_b) = self.from_bearing_deg.to_radians().sin_cos();
        Vec3::new(-self.speed * sin_b, -self.speed * cos_b, 0.0)
    }
}

/// Load-time description of one puff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindPuffDescriptor {
    /// Centre of the leading edge.
    pub center: Vec2,
    /// Travel velocity; its direction is the puff's centreline.
    pub velocity: Vec2,
    /// Distance from the leading to the trailing edge.
    pub depth: f64,
    /// Width of the leading edge.
    pub leading_width: f64,
    /// Width of the trailing edge.
    pub trailing_width: f64,
    /// Distance after which the puff dies.
    pub distance_to_travel: f64,
    /// Speed at which each edge end moves outward.
    pub edge_expansion_speed: f64,
    /// Extra deceleration on top of the spreading loss (m/s²).
    pub friction: f64,
    /// Fraction of the depth over which the puff ramps up behind the leading edge.
    pub entry_taper: f64,
    /// Fraction of the depth over which the puff dies out ahead of the trailing edge.
    pub exit_taper: f64,
    /// Fraction of the half-width over which the puff fades toward its sides.
    pub lateral_taper: f64,
}

impl Default for WindPuffDescriptor {
    fn default() -> Self {
        Self {
            center: Vec2::zero(),
            velocity: Vec2::new(0.0, -5.0),
            depth: 100.0,
            leading_width: 60.0,
            trailing_width: 40.0,
            distance_to_travel: 500.0,
            edge_expansion_speed: 0.25,
            friction: 0.01,
            entry_taper: 0.1,
            exit_taper: 0.25,
            lateral_taper: 0.2,
        }
    }
}

/// A travelling gust.
#[derive(Debug, Clone, PartialEq)]
pub struct WindPuff {
    leading_center: Vec2,
    direction: Vec2,
    speed: f64,
    depth: f64,
    leading_width: f64,
    trailing_width: f64,
    distance_to_travel: f64,
    edge_expansion_speed: f64,
    friction: f64,
    entry_taper: f64,
    exit_taper: f64,
    lateral_taper: f64,
    inert: bool,
}

impl WindPuff {
    /// Puff from a descriptor; negative sizes and rates are replaced by 0.
    pub fn new(desc: &WindPuffDescriptor) -> Self {
        let non_negative = |name: &str, v: f64| {
            if v < 0.0 {
                warn!("wind puff {name} {v} is negative, using 0");
                0.0
            } else {
                v
            }
        };
        let speed = desc.velocity.magnitude();
        let direction = desc.velocity.normalized().unwrap_or(Vec2::new(0.0, 1.0));
        let mut puff = Self {
            leading_center: desc.center,
            direction,
            speed,
            depth: non_negative("depth", desc.depth),
            leading_width: non_negative("leading width", desc.leading_width),
            trailing_width: non_negative("trailing width", desc.trailing_width),
            distance_to_travel: desc.distance_to_travel,
            edge_expansion_speed: non_negative("edge expansion speed", desc.edge_expansion_speed),
            friction: non_negative("friction", desc.friction),
            entry_taper: desc.entry_taper,
            exit_taper: desc.exit_taper,
            lateral_taper: desc.lateral_taper,
            inert: false,
        };
        puff.check_inert();
        puff
    }

    /// True once the puff has stopped for good.
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Current speed (m/s).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current travel velocity.
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }

    /// Distance left before the puff dies.
    pub fn distance_to_travel(&self) -> f64 {
        self.distance_to_travel
    }

    /// Current leading-edge width.
    pub fn leading_width(&self) -> f64 {
        self.leading_width
    }

    /// Current trailing-edge width.
    pub fn trailing_width(&self) -> f64 {
        self.trailing_width
    }

    /// Centre of the leading edge.
    pub fn leading_center(&self) -> Vec2 {
        self.leading_center
    }

    /// Centre of the trailing edge.
    pub fn trailing_center(&self) -> Vec2 {
        self.leading_center - self.direction * self.depth
    }

    /// Leading and trailing edges as (left end, right end) looking downwind.
    pub fn edges(&self) -> [(Vec2, Vec2); 2] {
        let lateral = self.direction.perp();
        let segment = |center: Vec2, width: f64| (center + lateral * (width / 2.0), center - lateral * (width / 2.0));
        [segment(self.leading_center, self.leading_width), segment(self.trailing_center(), self.trailing_width)]
    }

    /// Angle the side streamlines make with the centreline.
    pub fn edge_velocity_dir_angle(&self) -> f64 {
        ((self.leading_width - self.trailing_width) / 2.0).atan2(self.depth)
    }

    /// Gust velocity at a world point; zero outside the puff, below the
    /// surface, or once inert.
    pub fn get_flow_velocity(&self, p: &Vec3) -> Vec3 {
        if self.inert || p.z <= 0.0 || is_like_zero(self.depth) || is_like_zero(self.speed) {
            return Vec3::zero();
        }
        let rel = p.xy() - self.leading_center;

        let s = -rel.dot(&self.direction) / self.depth;
        if s <= 0.0 || s >= 1.0 {
            return Vec3::zero();
        }

        let half_leading = self.leading_width / 2.0;
        let half_trailing = self.trailing_width / 2.0;
        if is_like_zero(half_leading) || is_like_zero(half_trailing) {
            return Vec3::zero();
        }
        // both edge centres lie on the centreline, so the lateral offset is shared
        let lateral = rel.dot(&self.direction.perp());
        let t = lerp(lateral / half_leading, lateral / half_trailing, s);
        if t.abs() >= 1.0 {
            return Vec3::zero();
        }

        let height_taper_point = HEIGHT_TAPER_SCALE / self.speed;
        let magnitude = self.speed
            * taper(s, self.entry_taper)
            * taper(1.0 - s, self.exit_taper)
            * taper(1.0 - t.abs(), self.lateral_taper)
            * smoothstep3(p.z / height_taper_point + 0.5);

        (self.direction.rotated(t * self.edge_velocity_dir_angle()) * magnitude).extend(0.0)
    }

    /// Advances the puff by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        if self.inert {
            return;
        }
        let travelled = self.speed * dt;
        self.leading_center += self.direction * travelled;
        self.leading_width += 2.0 * self.edge_expansion_speed * dt;
        self.trailing_width += 2.0 * self.edge_expansion_speed * dt;
        self.speed -= (2.0 * self.edge_expansion_speed + self.friction) * dt;
        self.distance_to_travel -= travelled;
        self.check_inert();
    }

    fn check_inert(&mut self) {
        if self.distance_to_travel <= 0.0 || self.speed <= 0.0 {
            self.inert = true;
            self.speed = 0.0;
            self.distance_to_travel = self.distance_to_travel.max(0.0);
        }
    }
}

/// Ramp from 0 at `x = 0` to 1 at `x = fraction`. A non-positive fraction disables it.
fn taper(x: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 { 1.0 } else { smoothstep3(x / fraction) }
}

/// Load-time description of the wind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindFieldDescriptor {
    /// Background wind.
    pub steady: SteadyWind,
    /// Initial puffs.
    pub puffs: Vec<WindPuffDescriptor>,
}

/// Steady wind plus the live puffs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindField {
    steady: SteadyWind,
    puffs: Vec<WindPuff>,
}

impl WindField {
    /// Steady wind with no puffs.
    pub fn new(steady: SteadyWind) -> Self {
        Self { steady, puffs: Vec::new() }
    }

    /// Steady wind plus the descriptor's puffs.
    pub fn from_descriptor(desc: &WindFieldDescriptor) -> Self {
        let mut field = Self::new(desc.steady);
        for puff in &desc.puffs {
            field.add_puff(puff);
        }
        field
    }

    /// Background wind.
    pub fn steady(&self) -> &SteadyWind {
        &self.steady
    }

    /// Replaces the background wind.
    pub fn set_steady(&mut self, steady: SteadyWind) {
        self.steady = steady;
    }

    /// Live puffs.
    pub fn puffs(&self) -> &[WindPuff] {
        &self.puffs
    }

    /// Starts a new puff.
    pub fn add_puff(&mut self, desc: &WindPuffDescriptor) {
        let puff = WindPuff::new(desc);
        debug!(
            "wind puff added at ({:.1}, {:.1}), {:.1} m/s, {:.0} m to travel",
            desc.center.x,
            desc.center.y,
            puff.speed(),
            puff.distance_to_travel()
        );
        self.puffs.push(puff);
    }

    /// True wind at a world point.
    pub fn get_flow_velocity(&self, p: &Vec3) -> Vec3 {
        let mut v = if p.z > 0.0 { self.steady.velocity() } else { Vec3::zero() };
        for puff in &self.puffs {
            v += puff.get_flow_velocity(p);
        }
        v
    }

    /// Advances every puff and drops the ones that have died out.
    pub fn update(&mut self, dt: f64) {
        for puff in &mut self.puffs {
            puff.update(dt);
        }
        let before = self.puffs.len();
        self.puffs.retain(|p| !p.is_inert());
        if self.puffs.len() != before {
            debug!("{} wind puff(s) expired, {} live", before - self.puffs.len(), self.puffs.len());
        }
    }
}
