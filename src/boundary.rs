//! No-sail-zone boundaries.
//!
//! Boundaries are open polylines in the world x/y plane. The sailable water
//! is on the left of each segment's direction. A point on the wrong side is
//! pushed back by a resisting velocity proportional to how far it has
//! strayed; the host adds it to the wind at the sails and to the current at
//! the hull and appendages.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::math::is_like_zero;
use crate::vector::{Vec2, Vec3};

/// One straight piece of a boundary polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySegment {
    /// First point.
    pub start: Vec2,
    /// Second point.
    pub end: Vec2,
    /// Unit vector from start to end.
    pub direction: Vec2,
    /// Distance from `start` to `end`.
    pub length: f64,
}

impl BoundarySegment {
    /// `None` for a zero-length segment.
    pub fn new(start: Vec2, end: Vec2) -> Option<Self> {
        let delta = end - start;
        let direction = delta.normalized()?;
        Some(Self { start, end, direction, length: delta.magnitude() })
    }

    /// Unit normal pointing into the sailable side.
    pub fn inward_normal(&self) -> Vec2 {
        self.direction.perp()
    }
}

/// Load-time description of the no-sail boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryDescriptor {
    /// Each section is an open polyline of at least two points.
    pub sections: Vec<Vec<Vec2>>,
    /// Resisting wind speed per metre of penetration.
    pub wind_coefficient: f64,
    /// Resisting current speed per metre of penetration.
    pub current_coefficient: f64,
}

impl Default for BoundaryDescriptor {
    fn default() -> Self {
        Self { sections: Vec::new(), wind_coefficient: 1.0, current_coefficient: 0.25 }
    }
}

/// How far a point has strayed and which way is back.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundaryHit {
    /// Distance past the boundary (m); 0 on the sailable side.
    pub penetration: f64,
    /// Unit direction back toward sailable water; zero when not penetrating.
    pub direction: Vec2,
}

impl BoundaryHit {
    /// True when the point is on the wrong side.
    pub fn is_outside(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Per-vessel cache of the last boundary search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryProbe {
    last: Option<(Vec2, BoundaryHit)>,
    searches: usize,
}

impl BoundaryProbe {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of searches that missed the cache.
    pub fn searches(&self) -> usize {
        self.searches
    }

    /// Drops the cached result so the next query searches again.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

/// Every boundary polyline with its resisting coefficients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryField {
    sections: Vec<Vec<BoundarySegment>>,
    wind_coefficient: f64,
    current_coefficient: f64,
}

impl BoundaryField {
    /// Builds segments from point lists. Sections with fewer than two points and
    /// zero-length segments are skipped with a warning.
    pub fn new(sections: &[Vec<Vec2>], wind_coefficient: f64, current_coefficient: f64) -> Self {
        let mut built = Vec::with_capacity(sections.len());
        for (i, points) in sections.iter().enumerate() {
            if points.len() < 2 {
                warn!("boundary section {i} has {} point(s), skipped", points.len());
                continue;
            }
            let mut segments = Vec::with_capacity(points.len() - 1);
            for pair in points.windows(2) {
                match BoundarySegment::new(pair[0], pair[1]) {
                    Some(segment) => segments.push(segment),
                    None => warn!("boundary section {i}: zero-length segment at ({}, {}) skipped", pair[0].x, pair[0].y),
                }
            }
            if !segments.is_empty() {
                built.push(segments);
            }
        }
        Self { sections: built, wind_coefficient, current_coefficient }
    }

    /// Same as [`BoundaryField::new`] with the descriptor's values.
    pub fn from_descriptor(desc: &BoundaryDescriptor) -> Self {
        Self::new(&desc.sections, desc.wind_coefficient, desc.current_coefficient)
    }

    /// Segments grouped by section.
    pub fn sections(&self) -> &[Vec<BoundarySegment>] {
        &self.sections
    }

    /// True when there are no segments at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Penetration of `point`, reusing the probe's result for a repeated point.
    pub fn probe(&self, point: Vec2, probe: &mut BoundaryProbe) -> BoundaryHit {
        if let Some((last, hit)) = probe.last {
            if last == point {
                return hit;
            }
        }
        let hit = self.search(point);
        probe.last = Some((point, hit));
        probe.searches += 1;
        hit
    }

    fn search(&self, point: Vec2) -> BoundaryHit {
        let mut best: Option<(f64, f64, &BoundarySegment)> = None;
        for segment in self.sections.iter().flatten() {
            let along = (point - segment.start).dot(&segment.direction);
            let closest = segment.start + segment.direction * along.clamp(0.0, segment.length);
            let distance = point.distance(&closest);
            if best.is_none_or(|(d, _, _)| distance < d) {
                best = Some((distance, along, segment));
            }
        }
        let Some((distance, along, segment)) = best else {
            return BoundaryHit::default();
        };

        let inside = segment.direction.cross(&(point - segment.start)) >= 0.0;
        if inside || is_like_zero(distance) {
            return BoundaryHit::default();
        }

        let direction = if along < 0.0 {
            (segment.start - point) / distance
        } else if along > segment.length {
            (segment.end - point) / distance
        } else {
            segment.inward_normal()
        };
        BoundaryHit { penetration: distance, direction }
    }

    /// Velocity pushing the wind at `point` back toward sailable water.
    pub fn resisting_wind_velocity(&self, point: &Vec3, probe: &mut BoundaryProbe) -> Vec3 {
        self.resisting_velocity(point, probe, self.wind_coefficient)
    }

    /// Velocity pushing the current at `point` back toward sailable water.
    pub fn resisting_current_velocity(&self, point: &Vec3, probe: &mut BoundaryProbe) -> Vec3 {
        self.resisting_velocity(point, probe, self.current_coefficient)
    }

    fn resisting_velocity(&self, point: &Vec3, probe: &mut BoundaryProbe, coefficient: f64) -> Vec3 {
        let hit = self.probe(point.xy(), probe);
        (hit.direction * (hit.penetration * coefficient)).extend(0.0)
    }
}
