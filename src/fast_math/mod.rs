//! Scalar helpers shared by the layout code.
//!
//! Every formula that divides by `(count - 1)` or `(total - 1)` goes through
//! [`spread_fraction`], so a single element never divides by zero.

use glam::Vec3;

/// Small length below which a direction is considered undefined.
pub const EPSILON: f32 = 1e-4;

/// Fused Multiply-Add: a * b + c
#[inline(always)]
pub fn fma(a: f32, b: f32, c: f32) -> f32 {
    a.mul_add(b, c)
}

/// Linear interpolation using FMA.
/// lerp(a, b, t) = a + t * (b - a) = fma(t, b-a, a)
#[inline(always)]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    fma(t, b - a, a)
}

/// Position of `index` among `count` evenly spread items, in [0, 1].
///
/// Returns `fallback` when there is at most one item.
#[inline]
pub fn spread_fraction(index: usize, count: usize, fallback: f32) -> f32 {
    if count > 1 {
        index as f32 / (count - 1) as f32
    } else {
        fallback
    }
}

/// Cubic ease-in-out on [0, 1].
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u * 0.5
    }
}

/// Horizontal (XZ) direction from the world Y axis towards `p`.
///
/// Falls back to +X for points on the axis.
#[inline]
pub fn radial_xz(p: Vec3) -> Vec3 {
    let flat = Vec3::new(p.x, 0.0, p.z);
    let len = flat.length();
    if len < EPSILON {
        Vec3::X
    } else {
        flat / len
    }
}
