//! GPU-ready buffers for bubbles, edges and the guide path.
//!
//! Layouts are `#[repr(C)]` and padded to vec4 boundaries so they can be
//! uploaded as-is with [`as_bytes`].

use glam::Vec3;

use crate::render::palette::{Rgb, GUIDE};
use crate::render::spiral::ProjectedMoment;

/// One instanced sphere (32 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BubbleInstance {
    // Center + radius (vec4)
    pub center: [f32; 3],
    pub radius: f32,
    // Color (vec4, alpha 1)
    pub color: [f32; 4],
}

/// One polyline vertex (32 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    /// Normalized distance along the line, 0 at the start and 1 at the end
    pub along: f32,
    pub color: [f32; 4],
}

pub fn bubble_instances(bubbles: &[ProjectedMoment]) -> Vec<BubbleInstance> {
    bubbles
        .iter()
        .map(|b| BubbleInstance {
            center: b.position.to_array(),
            radius: b.radius,
            color: b.color.to_f32(),
        })
        .collect()
}

/// Vertices of a polyline in one color.
pub fn polyline_vertices(points: &[Vec3], color: Rgb) -> Vec<LineVertex> {
    let color = color.to_f32();
    let last = points.len().saturating_sub(1).max(1) as f32;
    points
        .iter()
        .enumerate()
        .map(|(i, p)| LineVertex {
            position: p.to_array(),
            along: i as f32 / last,
            color,
        })
        .collect()
}

/// Vertices of the spiral guide path, in the guide tint.
pub fn guide_vertices(points: &[Vec3]) -> Vec<LineVertex> {
    polyline_vertices(points, GUIDE)
}

/// Upload-ready buffers for one layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpuBuffers {
    pub bubbles: Vec<BubbleInstance>,
    pub guide: Vec<LineVertex>,
    /// All edge polylines, back to back
    pub edges: Vec<LineVertex>,
}

/// Raw bytes of a vertex slice.
#[inline]
pub fn as_bytes<T: bytemuck::Pod>(data: &[T]) -> &[u8] {
    bytemuck::cast_slice(data)
}
