//! Planar-flight vector helpers.
//!
//! The flight model is 2.5-D: positions are 3-vectors but headings, bearings
//! and banking live in the xy-plane (z is altitude).  All helpers therefore
//! come in xy flavors; consumers that need full 3-D math use `glam` directly.

use glam::Vec3;

/// Squared-length threshold below which a vector counts as degenerate.
const EPS2: f32 = 1e-7;

/// Normalize `v`, falling back to `fallback` for (near-)zero input.
///
/// Covers NaN-producing inputs: a zero-length vector yields `fallback`, never
/// a NaN direction.
#[inline]
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let len2 = v.length_squared();
    if len2 > EPS2 { v / len2.sqrt() } else { fallback }
}

/// Counter-clockwise xy-perpendicular of `v` (z untouched semantics: result
/// lies in the xy-plane).
#[inline]
pub fn perp_xy(v: Vec3) -> Vec3 {
    Vec3::new(-v.y, v.x, 0.0)
}

/// 2-D perp-dot (cross product z-component) of `a` and `b` in the xy-plane.
#[inline]
pub fn perp_dot_xy(a: Vec3, b: Vec3) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Signed angle [rad] from `a` to `b` in the xy-plane, clamped to
/// `[-max_rad, +max_rad]`.  Positive = counter-clockwise.
#[inline]
pub fn rad_between_xy(a: Vec3, b: Vec3, max_rad: f32) -> f32 {
    let c = perp_dot_xy(a, b);
    let d = a.x * b.x + a.y * b.y;
    c.atan2(d).clamp(-max_rad, max_rad)
}

/// Rotate `a` by `rad` around the z-axis.
#[inline]
pub fn rotate_xy(a: Vec3, rad: f32) -> Vec3 {
    let (s, c) = rad.sin_cos();
    Vec3::new(a.x * c - a.y * s, a.x * s + a.y * c, a.z)
}

/// Clamp the length of `v` to at most `max_len` (no-op for shorter vectors
/// and degenerate input).
#[inline]
pub fn clamp_length(v: Vec3, max_len: f32) -> Vec3 {
    let len2 = v.length_squared();
    if len2 > max_len * max_len && len2 > EPS2 {
        v * (max_len / len2.sqrt())
    } else {
        v
    }
}

