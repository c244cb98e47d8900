//! Vector, rotation and frame algebra for the force model.
//!
//! World convention: x east, y north, z up. Vessel-local convention: x toward
//! the bow, y to port, z up. Foils work in their own 2-D chord plane (local
//! x, y) with the span along local z.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::math::{is_like_zero, EPSILON};

#[cfg(test)]
use approx::{AbsDiffEq, RelativeEq};

/// 2-D vector used for planar foil flow, wind puffs and boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// East / chordwise component.
    pub x: f64,
    /// North / normal component.
    pub y: f64,
}

impl Vec2 {
    /// Creates a new vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector at `angle` radians counter-clockwise from +x.
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Euclidean length.
    #[inline(always)]
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Squared length.
    #[inline(always)]
    pub fn magnitude_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector, or `None` for a (near) zero vector.
    pub fn normalized(&self) -> Option<Self> {
        let mag = self.magnitude();
        if is_like_zero(mag) { None } else { Some(*self / mag) }
    }

    /// Dot product.
    #[inline(always)]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scalar 2-D cross product `self.x * other.y - self.y * other.x`.
    /// Positive when `other` lies counter-clockwise of `self`.
    #[inline(always)]
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotated 90° counter-clockwise.
    #[inline(always)]
    pub fn perp(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Rotated counter-clockwise by `angle` radians.
    pub fn rotated(&self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Distance to `other`.
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Lifts into 3-D at height `z`.
    pub const fn extend(&self, z: f64) -> Vec3 {
        Vec3::new(self.x, self.y, z)
    }
}

/// 3D vector with utility methods for force computations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Creates a new vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Zero vector.
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    /// Unit vector in Z direction (up).
    pub const fn up() -> Self {
        Self { x: 0.0, y: 0.0, z: 1.0 }
    }

    /// Magnitude (length) of the vector.
    #[inline(always)]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_sq().sqrt()
    }

    /// Squared magnitude (avoids sqrt, cheaper for comparisons).
    #[inline(always)]
    pub fn magnitude_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Normalized vector (unit length), `None` for a (near) zero vector.
    pub fn normalized(&self) -> Option<Self> {
        let mag = self.magnitude();
        if is_like_zero(mag) { None } else { Some(*self / mag) }
    }

    /// Normalized vector, or zero for a degenerate input.
    pub fn normalized_or_zero(&self) -> Self {
        self.normalized().unwrap_or_default()
    }

    /// Dot product.
    #[inline(always)]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product: self × other
    #[inline(always)]
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Horizontal part (z zeroed).
    #[inline(always)]
    pub fn horizontal(&self) -> Self {
        Self::new(self.x, self.y, 0.0)
    }

    /// Planar projection onto x/y.
    #[inline(always)]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Check if vector is approximately zero.
    pub fn is_zero(&self, eps: f64) -> bool {
        self.magnitude_sq() < eps * eps
    }

    /// Convert to array.
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

macro_rules! impl_vector_ops {
    ($t:ident { $($f:ident),+ }) => {
        impl Add for $t {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self { Self { $($f: self.$f + rhs.$f),+ } }
        }
        impl Sub for $t {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self { Self { $($f: self.$f - rhs.$f),+ } }
        }
        impl Mul<f64> for $t {
            type Output = Self;
            #[inline(always)]
            fn mul(self, rhs: f64) -> Self { Self { $($f: self.$f * rhs),+ } }
        }
        impl Mul<$t> for f64 {
            type Output = $t;
            #[inline(always)]
            fn mul(self, rhs: $t) -> $t { rhs * self }
        }
        impl Div<f64> for $t {
            type Output = Self;
            #[inline(always)]
            fn div(self, rhs: f64) -> Self { Self { $($f: self.$f / rhs),+ } }
        }
        impl Neg for $t {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self { Self { $($f: -self.$f),+ } }
        }
        impl AddAssign for $t {
            #[inline(always)]
            fn add_assign(&mut self, rhs: Self) { $(self.$f += rhs.$f;)+ }
        }
        impl SubAssign for $t {
            #[inline(always)]
            fn sub_assign(&mut self, rhs: Self) { $(self.$f -= rhs.$f;)+ }
        }
    };
}

impl_vector_ops!(Vec2 { x, y });
impl_vector_ops!(Vec3 { x, y, z });

#[cfg(test)]
impl AbsDiffEq for Vec3 {
    type Epsilon = f64;
    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

#[cfg(test)]
impl RelativeEq for Vec3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

/// Quaternion for 3D rotations. Kept unit length by every constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// Scalar part.
    pub w: f64,
    /// X of the vector part.
    pub x: f64,
    /// Y of the vector part.
    pub y: f64,
    /// Z of the vector part.
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    /// Raw components; the caller keeps them unit length.
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Identity quaternion (no rotation).
    pub const fn identity() -> Self {
        Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 }
    }

    /// Rotation of `theta` radians about `axis`; identity for a zero axis.
    pub fn from_axis_angle(axis: &Vec3, theta: f64) -> Self {
        let Some(axis) = axis.normalized() else {
            return Self::identity();
        };
        let (sin_half, cos_half) = (theta / 2.0).sin_cos();
        Self::new(cos_half, axis.x * sin_half, axis.y * sin_half, axis.z * sin_half)
    }

    /// Creates a quaternion from roll, pitch, yaw (Z-Y-X sequence), radians.
    pub fn from_rpy(roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sy, cy) = (yaw / 2.0).sin_cos();
        let (sp, cp) = (pitch / 2.0).sin_cos();
        let (sr, cr) = (roll / 2.0).sin_cos();

        Self::new(
            cy * cp * cr + sy * sp * sr,
            cy * cp * sr - sy * sp * cr,
            sy * cp * sr + cy * sp * cr,
            sy * cp * cr - cy * sp * sr,
        )
    }

    /// Same as [`Quaternion::from_rpy`] with angles in degrees.
    pub fn from_rpy_deg(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::from_rpy(roll.to_radians(), pitch.to_radians(), yaw.to_radians())
    }

    /// Hamilton product `self * other` (apply `other` first).
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(
            self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        )
    }

    /// Rotates a vector: `q v q*`.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        // t = 2 (q.xyz × v); v' = v + w t + q.xyz × t
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        *v + t * self.w + u.cross(&t)
    }

    /// Inverse rotation of a unit quaternion.
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Magnitude (norm) of quaternion.
    pub fn magnitude(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalized (unit) quaternion, identity when degenerate.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < EPSILON {
            Self::identity()
        } else {
            Self::new(self.w / mag, self.x / mag, self.y / mag, self.z / mag)
        }
    }
}

/// Infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane.
    pub point: Vec3,
    /// Unit normal.
    pub normal: Vec3,
}

impl Plane {
    /// Plane through `point`; a degenerate normal falls back to +z.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal: normal.normalized().unwrap_or_else(Vec3::up) }
    }

    /// Horizontal water surface at height `z`.
    pub fn horizontal(z: f64) -> Self {
        Self { point: Vec3::new(0.0, 0.0, z), normal: Vec3::up() }
    }

    /// Signed distance, positive on the normal side.
    pub fn signed_distance(&self, p: &Vec3) -> f64 {
        (*p - self.point).dot(&self.normal)
    }
}

/// Local-to-world rigid transform: rotation then translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordSystem {
    /// Local origin in world coordinates.
    pub origin: Vec3,
    /// Local-to-world rotation.
    pub rotation: Quaternion,
}

impl CoordSystem {
    /// Frame at `origin` rotated by `rotation`.
    pub fn new(origin: Vec3, rotation: Quaternion) -> Self {
        Self { origin, rotation: rotation.normalized() }
    }

    /// World frame.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Local point to world.
    pub fn to_world_point(&self, p: &Vec3) -> Vec3 {
        self.rotation.rotate(p) + self.origin
    }

    /// Local direction to world.
    pub fn to_world_vector(&self, v: &Vec3) -> Vec3 {
        self.rotation.rotate(v)
    }

    /// World point to local.
    pub fn to_local_point(&self, p: &Vec3) -> Vec3 {
        self.rotation.conjugate().rotate(&(*p - self.origin))
    }

    /// World direction to local.
    pub fn to_local_vector(&self, v: &Vec3) -> Vec3 {
        self.rotation.conjugate().rotate(v)
    }

    /// Frame of a child placed at `offset` with `rotation` inside this frame.
    pub fn child(&self, offset: &Vec3, rotation: &Quaternion) -> Self {
        Self::new(self.to_world_point(offset), self.rotation.mul(rotation))
    }

    /// Local +z axis expressed in world coordinates.
    pub fn up_axis(&self) -> Vec3 {
        self.rotation.rotate(&Vec3::up())
    }
}
