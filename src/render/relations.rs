//! Relation edges between bubbles.
//!
//! Two passes: [`build_edges`] turns relation rows into one undirected edge per
//! related pair and numbers the branches at each endpoint; [`RelationGraphLayout`]
//! then bends every edge into a cubic Bezier whose control points fan out
//! around the edge axis, so several edges leaving one bubble stay apart.

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};
use serde::Serialize;

use crate::config::EdgeParams;
use crate::fast_math::spread_fraction;
use crate::model::{Moment, RelationType};
use crate::render::palette::{relation_color, Rgb};
use crate::render::spiral::ProjectedMoment;
use crate::render::spline::CubicBezier;

/// Position of one edge among all edges touching a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub index: usize,
    pub total: usize,
}

impl Branch {
    /// Fan angle of this branch: spread evenly over `range`, centred on 0.
    pub fn fan_angle(self, range: f32) -> f32 {
        fan_angle(self.index, self.total, range)
    }
}

/// `((index / (total - 1)) - 0.5) · range`, or 0 for a lone branch.
pub fn fan_angle(index: usize, total: usize, range: f32) -> f32 {
    if total > 1 {
        (spread_fraction(index, total, 0.5) - 0.5) * range
    } else {
        0.0
    }
}

/// Undirected relation between two visible moments
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Sorted id pair for display, `"a--b"`
    pub key: String,
    pub source_id: String,
    pub target_id: String,
    pub relation_type: RelationType,
    pub source_branch: Branch,
    pub target_branch: Branch,
}

/// Identity shared by both directions of a relation: the ids in sorted order.
pub fn pair_ids<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Display key of a pair, `"a--b"`. Ids may contain `--`, so this is not an identity.
pub fn pair_key(a: &str, b: &str) -> String {
    let (lo, hi) = pair_ids(a, b);
    format!("{lo}--{hi}")
}

/// Collapse relation rows into undirected edges between moments of `moments`.
///
/// The first row seen for a pair decides its direction and type. Rows whose
/// target is not in `moments` are dropped, and so is the pair: a reciprocal
/// row from the other side does not bring it back. Self-relations are ignored.
pub fn build_edges(moments: &[Moment]) -> Vec<Edge> {
    let visible: HashSet<&str> = moments.iter().map(|m| m.id.as_str()).collect();
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for moment in moments {
        for rel in &moment.relations {
            let target = rel.related_moment_id.as_str();
            if target == moment.id {
                continue;
            }
            if !seen.insert(pair_ids(&moment.id, target)) {
                continue;
            }
            if !visible.contains(target) {
                continue;
            }
            let key = pair_key(&moment.id, target);
            pairs.push((key, moment.id.as_str(), target, &rel.relation_type));
        }
    }

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for &(_, from, to, _) in &pairs {
        *totals.entry(from).or_insert(0) += 1;
        *totals.entry(to).or_insert(0) += 1;
    }

    let mut next: HashMap<&str, usize> = HashMap::new();
    let mut branch = |id| {
        let slot = next.entry(id).or_insert(0);
        let index = *slot;
        *slot += 1;
        Branch {
            index,
            total: totals.get(id).copied().unwrap_or(1),
        }
    };

    pairs
        .into_iter()
        .map(|(key, from, to, kind)| Edge {
            key,
            source_branch: branch(from),
            target_branch: branch(to),
            source_id: from.to_owned(),
            target_id: to.to_owned(),
            relation_type: kind.clone(),
        })
        .collect()
}

/// Drawable edge: surface-to-surface Bezier plus its sampled polyline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeGeometry {
    pub key: String,
    pub source_id: String,
    pub target_id: String,
    pub relation_type: RelationType,
    pub color: Rgb,
    /// On the source bubble's surface
    pub start: Vec3,
    /// On the target bubble's surface
    pub end: Vec3,
    pub control_points: [Vec3; 2],
    pub polyline: Vec<Vec3>,
    /// Curve midpoint, where the glow light sits
    pub glow_point: Vec3,
}

/// Bends edges into fanned Bezier curves
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelationGraphLayout {
    params: EdgeParams,
}

impl RelationGraphLayout {
    pub fn new(params: EdgeParams) -> Self {
        Self { params }
    }

    /// Edges of `moments` with geometry taken from `bubbles`.
    ///
    /// `bubbles` must hold the projection of the same list; an edge whose
    /// endpoint has no bubble, or whose bubbles (nearly) coincide, is skipped.
    pub fn layout(&self, moments: &[Moment], bubbles: &[ProjectedMoment]) -> Vec<EdgeGeometry> {
        let edges = build_edges(moments);
        let by_id: HashMap<&str, &ProjectedMoment> =
            bubbles.iter().map(|b| (b.id.as_str(), b)).collect();

        let geometry: Vec<EdgeGeometry> = edges
            .iter()
            .filter_map(|e| {
                let from = by_id.get(e.source_id.as_str())?;
                let to = by_id.get(e.target_id.as_str())?;
                self.edge_geometry(e, from, to)
            })
            .collect();

        log::debug!(
            "Relation edges: {} drawn, {} collapsed or degenerate",
            geometry.len(),
            edges.len() - geometry.len()
        );
        geometry
    }

    /// Curve for one edge between two placed bubbles.
    pub fn edge_geometry(
        &self,
        edge: &Edge,
        from: &ProjectedMoment,
        to: &ProjectedMoment,
    ) -> Option<EdgeGeometry> {
        let p = &self.params;
        let delta = to.position - from.position;
        let dist = delta.length();
        if dist < p.min_length {
            return None;
        }
        let dir = delta / dist;

        let start = from.position + dir * from.radius;
        let end = to.position - dir * to.radius;

        // pull away from the galaxy centre, twisted around the edge by the fan angle
        let outward = (from.position + to.position).normalize_or_zero();
        let pull = (dist * p.pull_ratio).max(p.min_pull);
        let from_angle = edge.source_branch.fan_angle(p.fan_range);
        let to_angle = edge.target_branch.fan_angle(p.fan_range);
        let cp1 = start + Quat::from_axis_angle(dir, from_angle) * outward * pull;
        let cp2 = end + Quat::from_axis_angle(dir, to_angle) * outward * pull;

        let curve = CubicBezier::new(start, cp1, cp2, end);
        Some(EdgeGeometry {
            key: edge.key.clone(),
            source_id: edge.source_id.clone(),
            target_id: edge.target_id.clone(),
            relation_type: edge.relation_type.clone(),
            color: relation_color(&edge.relation_type),
            start,
            end,
            control_points: [cp1, cp2],
            polyline: curve.points(p.segments),
            glow_point: curve.point(0.5),
        })
    }
}
