//! Scalar helpers shared by every force component.
//!
//! Near-zero guards, angle wrapping and the cubic smoothstep used for all
//! tapers and blends live here so that the tolerances are identical across
//! hull, foil, wind and boundary code.

/// Tolerance used by [`is_like_zero`].
pub const EPSILON: f64 = 1e-10;

/// True when `x` is within [`EPSILON`] of zero.
#[inline(always)]
pub fn is_like_zero(x: f64) -> bool {
    x.abs() < EPSILON
}

/// Wraps an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r <= -180.0 {
        r + 360.0
    } else if r > 180.0 {
        r - 360.0
    } else {
        r
    }
}

/// Cubic smoothstep `3x² − 2x³`, clamped to `[0, 1]` outside the unit interval.
#[inline(always)]
pub fn smoothstep3(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Linear blend from `a` to `b`.
#[inline(always)]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Ratio `num / den`, or `0.0` when the denominator is near zero.
#[inline(always)]
pub fn safe_ratio(num: f64, den: f64) -> f64 {
    if is_like_zero(den) { 0.0 } else { num / den }
}
