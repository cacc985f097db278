//! Constellation view: one selected moment at the origin, its direct
//! relations on a ring around it.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::Serialize;

use crate::config::ConstellationParams;
use crate::fast_math::spread_fraction;
use crate::model::Moment;
use crate::render::palette::{emotion_color, relation_color, Rgb, ACCENT};
use crate::render::spiral::bubble_radius;
use crate::render::spline::CubicBezier;

/// A bubble in the constellation view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstellationNode {
    pub id: String,
    pub position: Vec3,
    pub color: Rgb,
    pub radius: f32,
    /// The moment has relations of its own (renderer hints that it can be expanded)
    pub has_relations: bool,
}

/// Arc from the centre bubble to one ring member
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub target_id: String,
    pub color: Rgb,
    pub polyline: Vec<Vec3>,
    pub glow_point: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constellation {
    pub center: ConstellationNode,
    pub ring: Vec<ConstellationNode>,
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConstellationLayout {
    params: ConstellationParams,
}

impl ConstellationLayout {
    pub fn new(params: ConstellationParams) -> Self {
        Self { params }
    }

    /// Lay out `selected` and the moments of `all` it relates to.
    ///
    /// Related ids that are not in `all` are skipped. Ring members are ordered
    /// by date, oldest at angle 0.
    pub fn layout(&self, selected: &Moment, all: &[Moment]) -> Constellation {
        let mut related: Vec<&Moment> = all
            .iter()
            .filter(|m| m.id != selected.id)
            .filter(|m| selected.relations.iter().any(|r| r.related_moment_id == m.id))
            .collect();
        related.sort_by_key(|m| m.moment_date);

        let center = node(selected, Vec3::ZERO);
        let total = related.len();
        let p = &self.params;

        let ring: Vec<ConstellationNode> = related
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let angle = i as f32 / total as f32 * TAU;
                let y = if total > 1 {
                    (spread_fraction(i, total, 0.5) - 0.5) * p.vertical_spread
                } else {
                    0.0
                };
                let pos = Vec3::new(angle.cos() * p.ring_radius, y, angle.sin() * p.ring_radius);
                node(m, pos)
            })
            .collect();

        let connectors = ring
            .iter()
            .map(|member| self.connector(selected, &center, member))
            .collect();

        Constellation {
            center,
            ring,
            connectors,
        }
    }

    fn connector(&self, selected: &Moment, center: &ConstellationNode, member: &ConstellationNode) -> Connector {
        let color = selected
            .relations
            .iter()
            .find(|r| r.related_moment_id == member.id)
            .map_or(ACCENT, |r| relation_color(&r.relation_type));

        let dir = member.position.normalize_or_zero();
        let start = center.position + dir * center.radius;
        let end = member.position - dir * member.radius;
        let pull = member.position.length() * self.params.pull_ratio;

        let curve = CubicBezier::new(start, start + dir * pull, end + dir * pull, end);
        Connector {
            target_id: member.id.clone(),
            color,
            polyline: curve.points(self.params.segments),
            glow_point: curve.point(0.5),
        }
    }
}

fn node(m: &Moment, position: Vec3) -> ConstellationNode {
    ConstellationNode {
        id: m.id.clone(),
        position,
        color: emotion_color(m.emotion_or_neutral()),
        radius: bubble_radius(m.importance_or_default()),
        has_relations: !m.relations.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::moment;
    use crate::model::RelationType;
    use crate::render::palette;

    fn hub() -> (Moment, Vec<Moment>) {
        let selected = moment("hub", 6)
            .with_relation("late", RelationType::SameEvent)
            .with_relation("early", RelationType::SamePeople)
            .with_relation("mid", RelationType::Other("pets".into()))
            .with_relation("gone", RelationType::SameLocation);
        let all = vec![
            selected.clone(),
            moment("late", 9),
            moment("early", 1).with_relation("hub", RelationType::SamePeople),
            moment("mid", 4),
            moment("unrelated", 2),
        ];
        (selected, all)
    }

    #[test]
    fn ring_sorted_by_date_and_spread() {
        let (selected, all) = hub();
        let c = ConstellationLayout::default().layout(&selected, &all);

        assert_eq!(c.center.position, Vec3::ZERO);
        let ids: Vec<&str> = c.ring.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["early", "mid", "late"]);

        // first member at angle 0 on the ring, lowest
        assert!((c.ring[0].position - Vec3::new(5.0, -1.5, 0.0)).length() < 1e-5);
        assert!(c.ring[1].position.y.abs() < 1e-6);
        assert!((c.ring[2].position.y - 1.5).abs() < 1e-6);
        for n in &c.ring {
            let flat = Vec3::new(n.position.x, 0.0, n.position.z);
            assert!((flat.length() - 5.0).abs() < 1e-4);
        }
        assert!(c.ring[0].has_relations);
        assert!(!c.ring[1].has_relations);
    }

    #[test]
    fn connector_colors_and_shape() {
        let (selected, all) = hub();
        let c = ConstellationLayout::default().layout(&selected, &all);
        assert_eq!(c.connectors.len(), 3);
        assert_eq!(c.connectors[0].color, palette::SAME_PEOPLE);
        assert_eq!(c.connectors[1].color, palette::ACCENT);
        assert_eq!(c.connectors[2].color, palette::SAME_EVENT);

        let first = &c.connectors[0];
        assert_eq!(first.polyline.len(), 41);
        // starts on the centre bubble's surface
        assert!((first.polyline[0].length() - c.center.radius).abs() < 1e-4);
        let member = &c.ring[0];
        assert!((first.polyline[40].distance(member.position) - member.radius).abs() < 1e-4);
    }

    #[test]
    fn single_related_moment_sits_level() {
        let selected = moment("a", 1).with_relation("b", RelationType::SameEvent);
        let all = vec![selected.clone(), moment("b", 2)];
        let c = ConstellationLayout::default().layout(&selected, &all);
        assert_eq!(c.ring.len(), 1);
        assert_eq!(c.ring[0].position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn nothing_related() {
        let selected = moment("a", 1).with_relation("a", RelationType::SameEvent);
        let c = ConstellationLayout::default().layout(&selected, std::slice::from_ref(&selected));
        assert!(c.ring.is_empty());
        assert!(c.connectors.is_empty());
    }
}
