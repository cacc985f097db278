//! Memoized galaxy layout.
//!
//! The full layout (bubbles, guide path, edges, overview framing) is rebuilt
//! only when the content of the moment list changes. The memo holds a single
//! entry keyed by a hash of every field the layout reads.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use glam::Vec3;
use serde::Serialize;

use crate::config::GalaxyConfig;
use crate::model::Moment;
use crate::render::camera::{optimal_camera_position, CameraChoreographer};
use crate::render::constellation::{Constellation, ConstellationLayout};
use crate::render::relations::{EdgeGeometry, RelationGraphLayout};
use crate::render::spiral::{ProjectedMoment, SpiralProjector};
use crate::render::vertex::{bubble_instances, guide_vertices, polyline_vertices, GpuBuffers};

/// Everything the renderer draws for one moment list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalaxyLayout {
    /// One per moment, in input order
    pub bubbles: Vec<ProjectedMoment>,
    /// Spiral guide through all moments, oldest to newest
    pub guide_path: Vec<Vec3>,
    pub edges: Vec<EdgeGeometry>,
    /// Camera position framing every bubble
    pub overview: Vec3,
}

impl GalaxyLayout {
    pub fn bubble(&self, id: &str) -> Option<&ProjectedMoment> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    /// Bubbles, guide path and edges packed for the GPU.
    pub fn gpu_buffers(&self) -> GpuBuffers {
        GpuBuffers {
            bubbles: bubble_instances(&self.bubbles),
            guide: guide_vertices(&self.guide_path),
            edges: self
                .edges
                .iter()
                .flat_map(|e| polyline_vertices(&e.polyline, e.color))
                .collect(),
        }
    }
}

/// Content hash of the fields the layout depends on.
pub fn content_hash(moments: &[Moment]) -> u64 {
    let mut h = DefaultHasher::new();
    moments.len().hash(&mut h);
    for m in moments {
        m.id.hash(&mut h);
        m.moment_date.hash(&mut h);
        m.emotion.hash(&mut h);
        m.importance.hash(&mut h);
        m.relations.len().hash(&mut h);
        for r in &m.relations {
            r.related_moment_id.hash(&mut h);
            r.relation_type.as_str().hash(&mut h);
        }
    }
    h.finish()
}

pub struct GalaxyScene {
    config: GalaxyConfig,
    projector: SpiralProjector,
    edges: RelationGraphLayout,
    constellation: ConstellationLayout,
    memo: Option<(u64, Arc<GalaxyLayout>)>,
}

impl GalaxyScene {
    pub fn new(config: GalaxyConfig) -> Self {
        Self {
            projector: SpiralProjector::new(config.spiral),
            edges: RelationGraphLayout::new(config.edges),
            constellation: ConstellationLayout::new(config.constellation),
            config,
            memo: None,
        }
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    pub fn projector(&self) -> SpiralProjector {
        self.projector
    }

    /// A camera controller sharing this scene's spiral and camera settings.
    pub fn choreographer(&self) -> CameraChoreographer {
        CameraChoreographer::new(self.config.camera, self.projector)
    }

    /// Layout of `moments`, reused while their content is unchanged.
    pub fn layout(&mut self, moments: &[Moment]) -> Arc<GalaxyLayout> {
        let key = content_hash(moments);
        if let Some((cached_key, layout)) = &self.memo {
            if *cached_key == key {
                log::debug!("Layout cache HIT: {:016x}", key);
                return Arc::clone(layout);
            }
        }

        log::debug!("Layout cache MISS: {:016x} ({} moments)", key, moments.len());
        let layout = Arc::new(self.compute(moments));
        self.memo = Some((key, Arc::clone(&layout)));
        layout
    }

    /// Drop the memoized layout.
    pub fn invalidate(&mut self) {
        self.memo = None;
    }

    /// Constellation around `selected_id`, or `None` if no such moment.
    pub fn constellation(&self, selected_id: &str, moments: &[Moment]) -> Option<Constellation> {
        let selected = moments.iter().find(|m| m.id == selected_id)?;
        Some(self.constellation.layout(selected, moments))
    }

    fn compute(&self, moments: &[Moment]) -> GalaxyLayout {
        let bubbles = self.projector.project_all(moments);
        let ranks: Vec<f32> = bubbles.iter().filter_map(|b| b.rank).collect();
        let guide_path = self
            .projector
            .guide_path(&ranks, self.config.guide.steps_per_segment);
        let edges = self.edges.layout(moments, &bubbles);
        let positions: Vec<Vec3> = bubbles.iter().map(|b| b.position).collect();

        GalaxyLayout {
            overview: optimal_camera_position(&positions),
            bubbles,
            guide_path,
            edges,
        }
    }
}

impl Default for GalaxyScene {
    fn default() -> Self {
        Self::new(GalaxyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{five_months, moment};
    use crate::model::RelationType;

    #[test]
    fn cache_hit_reuses_layout() {
        let mut scene = GalaxyScene::default();
        let moments = five_months();
        let a = scene.layout(&moments);
        let b = scene.layout(&moments.clone());
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn content_change_recomputes() {
        let mut scene = GalaxyScene::default();
        let mut moments = five_months();
        let a = scene.layout(&moments);
        moments[0] = moments[0].clone().with_relation("m2", RelationType::SameEvent);
        let b = scene.layout(&moments);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.edges.len(), 1);

        scene.invalidate();
        let c = scene.layout(&moments);
        assert!(!Arc::ptr_eq(&b, &c));
        assert_eq!(*b, *c);
    }

    #[test]
    fn title_edits_do_not_invalidate() {
        let moments = five_months();
        let mut edited = moments.clone();
        edited[1].title = "renamed".into();
        assert_eq!(content_hash(&moments), content_hash(&edited));
    }

    #[test]
    fn no_relations_scene() {
        let mut scene = GalaxyScene::default();
        let layout = scene.layout(&five_months());
        assert_eq!(layout.bubbles.len(), 5);
        assert!(layout.edges.is_empty());
        // 4 segments of 12 steps sharing endpoints
        assert_eq!(layout.guide_path.len(), 49);
        assert_eq!(layout.guide_path[0], layout.bubbles[0].position);
        assert_eq!(layout.guide_path[48], layout.bubbles[4].position);

        let buffers = layout.gpu_buffers();
        assert_eq!(buffers.bubbles.len(), 5);
        assert_eq!(buffers.guide.len(), 49);
        assert!(buffers.edges.is_empty());
        assert_eq!(buffers.guide[0].color, crate::render::palette::GUIDE.to_f32());
        assert!((buffers.guide[48].along - 1.0).abs() < 1e-6);
    }

    #[test]
    fn single_moment_scene() {
        let mut scene = GalaxyScene::default();
        let layout = scene.layout(&[moment("only", 7).with_importance(2)]);
        let b = &layout.bubbles[0];
        assert_eq!(b.rank, Some(0.5));
        assert!(b.position.y.abs() < 1e-6);
        assert!((b.radius - 0.5).abs() < 1e-6);
        assert!(layout.guide_path.is_empty());
        assert!(layout.edges.is_empty());
        // a single point has a zero-size box: camera sits on it
        assert_eq!(layout.overview, b.position);
    }

    #[test]
    fn empty_scene() {
        let mut scene = GalaxyScene::default();
        let layout = scene.layout(&[]);
        assert!(layout.bubbles.is_empty());
        assert_eq!(layout.overview, Vec3::new(0.0, 5.0, 15.0));
    }

    #[test]
    fn constellation_lookup() {
        let scene = GalaxyScene::default();
        let moments = vec![
            moment("a", 1).with_relation("b", RelationType::SamePeople),
            moment("b", 2),
        ];
        let c = scene.constellation("a", &moments).unwrap();
        assert_eq!(c.ring.len(), 1);
        assert!(scene.constellation("zzz", &moments).is_none());
    }

    #[test]
    fn layout_serializes_for_the_renderer() {
        let mut scene = GalaxyScene::default();
        let moments = vec![
            moment("a", 1).with_relation("b", RelationType::SameLocation),
            moment("b", 2),
        ];
        let json = serde_json::to_value(&*scene.layout(&moments)).unwrap();
        assert_eq!(json["bubbles"][0]["color"], "#A9A9A9");
        assert_eq!(json["edges"][0]["color"], "#32CD32");
        assert!(json["edges"][0]["glowPoint"].is_array());
        assert!(json["guidePath"].is_array());
    }
}
