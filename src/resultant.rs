//! Force + moment + application point ("resultant") algebra.
//!
//! A [`Resultant`] stores the moment about its own application point. Moving
//! the application point from `P` to `Q` re-expresses the moment about `Q`:
//! `M_Q = M_P + (P − Q) × F`, which leaves `M` unchanged for any `Q` on the
//! force's line of action.

use crate::math::is_like_zero;
use crate::vector::Vec3;

/// A force with its moment about `application_point`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Resultant {
    /// Net force.
    pub force: Vec3,
    /// Moment about `application_point`.
    pub moment: Vec3,
    /// Reference point of `moment`.
    pub application_point: Vec3,
}

impl Resultant {
    /// Resultant from its parts.
    pub const fn new(force: Vec3, moment: Vec3, application_point: Vec3) -> Self {
        Self { force, moment, application_point }
    }

    /// Pure force with no couple, acting at `point`.
    pub const fn from_force(force: Vec3, point: Vec3) -> Self {
        Self { force, moment: Vec3::zero(), application_point: point }
    }

    /// Empty resultant anchored at `point`.
    pub const fn zero_at(point: Vec3) -> Self {
        Self::from_force(Vec3::zero(), point)
    }

    /// True when both force and moment are negligible.
    pub fn is_zero(&self) -> bool {
        self.force.is_zero(1e-10) && self.moment.is_zero(1e-10)
    }

    /// Moment of this resultant about an arbitrary `point`.
    pub fn moment_about(&self, point: &Vec3) -> Vec3 {
        self.moment + (self.application_point - *point).cross(&self.force)
    }

    /// Re-anchors the resultant at `point` without changing its mechanical effect.
    pub fn move_application_point(&mut self, point: Vec3) {
        self.moment = self.moment_about(&point);
        self.application_point = point;
    }

    /// Copy re-anchored at `point`.
    pub fn moved_to(&self, point: Vec3) -> Self {
        let mut moved = *self;
        moved.move_application_point(point);
        moved
    }

    /// Adds a force acting at `point`.
    pub fn add_force(&mut self, force: Vec3, point: Vec3) {
        self.moment += (point - self.application_point).cross(&force);
        self.force += force;
    }

    /// Adds a free couple.
    pub fn add_moment(&mut self, moment: Vec3) {
        self.moment += moment;
    }

    /// Superposes `other`, transporting its moment to this application point.
    pub fn add_resultant(&mut self, other: &Resultant) {
        self.moment += other.moment_about(&self.application_point);
        self.force += other.force;
    }

    /// Canonical wrench: same force, re-anchored on the central axis so the
    /// remaining moment is parallel to the force. A zero force is returned as is.
    pub fn to_wrench(&self) -> Self {
        let f_sq = self.force.magnitude_sq();
        if is_like_zero(f_sq) {
            return *self;
        }
        let axis_point = self.application_point + self.force.cross(&self.moment) / f_sq;
        self.moved_to(axis_point)
    }
}

impl std::ops::AddAssign<&Resultant> for Resultant {
    fn add_assign(&mut self, rhs: &Resultant) {
        self.add_resultant(rhs);
    }
}
