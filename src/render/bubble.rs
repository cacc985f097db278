//! Per-bubble visual state: picking, material, glow, selection rings.
//!
//! Hover is reported as a plain boolean from [`pick`]; cursor handling and the
//! like stay with the UI.

use glam::Vec3;
use serde::Serialize;

use crate::render::spiral::ProjectedMoment;

/// World-space ray (direction need not be normalized)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Distance along the ray to the first hit with a sphere, if any.
    ///
    /// A ray starting inside the sphere hits at distance 0.
    pub fn hit_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let dir = self.direction.try_normalize()?;
        let oc = self.origin - center;
        let b = oc.dot(dir);
        let c = oc.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let disc = b * b - c;
        if disc < 0.0 || b > 0.0 {
            return None;
        }
        Some(-b - disc.sqrt())
    }
}

/// Nearest bubble under the ray.
pub fn pick<'a>(ray: &Ray, bubbles: &'a [ProjectedMoment]) -> Option<&'a ProjectedMoment> {
    bubbles
        .iter()
        .filter_map(|b| ray.hit_sphere(b.position, b.radius).map(|t| (t, b)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, b)| b)
}

/// Resolved look of one bubble for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleStyle {
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub glow_intensity: f32,
    pub glow_distance: f32,
    /// Target scale; the renderer eases towards it
    pub scale: f32,
    /// Inner and outer selection ring radii, present only when selected
    pub inner_ring: Option<(f32, f32)>,
    pub outer_ring: Option<(f32, f32)>,
    /// Tooltip height above the bubble centre, present only when hovered
    pub tooltip_offset: Option<f32>,
}

impl BubbleStyle {
    pub fn resolve(radius: f32, hovered: bool, selected: bool, textured: bool) -> Self {
        // photo bubbles keep the emissive low so the texture reads
        let emissive_intensity = match (textured, selected, hovered) {
            (true, _, true) => 0.1,
            (true, _, false) => 0.03,
            (false, true, _) => 0.6,
            (false, false, true) => 0.35,
            (false, false, false) => 0.2,
        };
        let opacity = match (textured, selected) {
            (true, _) => 0.7,
            (false, true) => 0.8,
            (false, false) => 0.65,
        };
        let glow_intensity = if selected {
            2.0
        } else if hovered {
            1.5
        } else {
            0.4
        };

        Self {
            emissive_intensity,
            opacity,
            glow_intensity,
            glow_distance: radius * if selected { 5.0 } else { 3.0 },
            scale: if hovered && !selected { 1.2 } else { 1.0 },
            inner_ring: selected.then_some((radius * 1.15, radius * 1.25)),
            outer_ring: selected.then_some((radius * 1.35, radius * 1.55)),
            tooltip_offset: hovered.then_some(radius + 0.5),
        }
    }
}

/// Vertical bob of a bubble at `time` seconds; phase comes from its x.
#[inline]
pub fn bob_offset(time: f32, position: Vec3) -> f32 {
    (time * 0.5 + position.x).sin() * 0.1
}

/// Scale of the pulsing outer selection ring.
#[inline]
pub fn ring_pulse(time: f32) -> f32 {
    1.0 + (time * 2.0).sin() * 0.08
}
