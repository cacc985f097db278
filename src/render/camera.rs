//! Camera choreography between selected moments.
//!
//! A selection change builds a pair of Catmull-Rom curves (camera position and
//! look-at target) and the choreographer walks them once per frame:
//! - Approach:     first selection, an outward-bowed arc from the live pose
//! - FollowSpiral: selection moved along the timeline, ride the spiral arm
//! - Overview:     selection cleared, lifted arc back to the overview pose
//!
//! Progress advances by `dt · speed`, is eased, then mapped through an
//! arc-length table so the camera moves at an even pace along the curve.
//! Between animations `tick` does nothing.

use glam::Vec3;
use serde::Serialize;

use crate::config::CameraParams;
use crate::fast_math::{ease_in_out_cubic, radial_xz, EPSILON};
use crate::render::spiral::{ProjectedMoment, SpiralProjector};
use crate::render::spline::{ArcLength, CatmullRom};

/// Where the camera is and what it looks at
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionKind {
    Approach,
    FollowSpiral,
    Overview,
}

/// Camera and look-at curves of one transition, with its progress
#[derive(Debug, Clone)]
struct CameraPath {
    kind: TransitionKind,
    camera: CatmullRom,
    look_at: CatmullRom,
    camera_arc: ArcLength,
    look_at_arc: ArcLength,
    progress: f32,
    speed: f32,
}

impl CameraPath {
    fn new(kind: TransitionKind, camera: Vec<Vec3>, look_at: Vec<Vec3>, params: &CameraParams) -> Self {
        let camera = CatmullRom::new(camera);
        let look_at = CatmullRom::new(look_at);
        let camera_arc = ArcLength::measure(params.arc_divisions, |t| camera.point(t));
        let look_at_arc = ArcLength::measure(params.arc_divisions, |t| look_at.point(t));
        let speed = travel_speed(camera_arc.total(), params);
        Self {
            kind,
            camera,
            look_at,
            camera_arc,
            look_at_arc,
            progress: 0.0,
            speed,
        }
    }

    fn pose_at(&self, u: f32) -> CameraPose {
        CameraPose {
            position: self.camera.point(self.camera_arc.parameter_at(u)),
            look_at: self.look_at.point(self.look_at_arc.parameter_at(u)),
        }
    }

    fn final_pose(&self) -> CameraPose {
        CameraPose {
            position: self.camera.last(),
            look_at: self.look_at.last(),
        }
    }
}

/// `speed_numerator / length`, clamped. A zero-length path runs at full speed.
pub fn travel_speed(length: f32, params: &CameraParams) -> f32 {
    if length < EPSILON {
        return params.speed_max;
    }
    (params.speed_numerator / length).clamp(params.speed_min, params.speed_max)
}

/// The selection the camera is parked on or travelling to
#[derive(Debug, Clone, PartialEq)]
struct Anchor {
    id: String,
    rank: Option<f32>,
}

/// Drives the viewpoint between selections, one `tick` per frame
#[derive(Debug, Clone)]
pub struct CameraChoreographer {
    params: CameraParams,
    projector: SpiralProjector,
    pose: CameraPose,
    selected: Option<Anchor>,
    path: Option<CameraPath>,
    /// The last transition ran to completion
    arrived: bool,
}

impl CameraChoreographer {
    /// Idle choreographer parked at the overview pose.
    pub fn new(params: CameraParams, projector: SpiralProjector) -> Self {
        Self {
            pose: CameraPose {
                position: params.overview_position,
                look_at: params.overview_look_at,
            },
            params,
            projector,
            selected: None,
            path: None,
            arrived: false,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Adopt a pose moved by something else (orbit controls).
    ///
    /// The next transition starts from here. A transition already in flight
    /// keeps its curves and overrides the pose on the next tick.
    pub fn sync_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|a| a.id.as_str())
    }

    pub fn is_animating(&self) -> bool {
        self.path.is_some()
    }

    pub fn transition(&self) -> Option<TransitionKind> {
        self.path.as_ref().map(|p| p.kind)
    }

    /// Raw progress of the current transition. 1 once it has arrived, 0
    /// before the first one.
    pub fn progress(&self) -> f32 {
        match &self.path {
            Some(p) => p.progress,
            None if self.arrived => 1.0,
            None => 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.path.as_ref().map_or(0.0, |p| p.speed)
    }

    /// Control points of the current camera curve.
    pub fn camera_points(&self) -> &[Vec3] {
        self.path.as_ref().map(|p| p.camera.points()).unwrap_or_default()
    }

    pub fn look_at_points(&self) -> &[Vec3] {
        self.path.as_ref().map(|p| p.look_at.points()).unwrap_or_default()
    }

    /// Length of the current camera curve.
    pub fn path_length(&self) -> f32 {
        self.path.as_ref().map_or(0.0, |p| p.camera_arc.total())
    }

    /// Camera position framing a moment: radially outside it at `distance`,
    /// raised by `distance · elevation_ratio`.
    pub fn viewpoint(&self, rank: Option<f32>, position: Vec3) -> Vec3 {
        let outward = match rank {
            Some(r) => {
                let angle = self.projector.angle_at(r);
                Vec3::new(angle.cos(), 0.0, angle.sin())
            }
            None => radial_xz(position),
        };
        let d = self.params.distance;
        position + outward * d + Vec3::Y * (d * self.params.elevation_ratio)
    }

    /// Change the selection. Returns `false` when nothing changes.
    ///
    /// A transition in flight is dropped and the new one starts from the live
    /// pose.
    pub fn select(&mut self, target: Option<&ProjectedMoment>) -> bool {
        let Some(target) = target else {
            if self.selected.take().is_none() {
                return false;
            }
            self.start(self.overview_path());
            return true;
        };

        if self.selected_id() == Some(target.id.as_str()) {
            return false;
        }

        let previous_rank = self.selected.as_ref().and_then(|a| a.rank);
        let path = match (previous_rank, target.rank) {
            (Some(from), Some(to)) if from != to => self.spiral_path(from, to, target),
            _ => self.approach_path(target),
        };
        self.selected = Some(Anchor {
            id: target.id.clone(),
            rank: target.rank,
        });
        self.start(path);
        true
    }

    /// Advance the current transition by `dt` seconds.
    ///
    /// Returns the new pose, or `None` when no transition is running.
    pub fn tick(&mut self, dt: f32) -> Option<CameraPose> {
        let path = self.path.as_mut()?;
        path.progress = (path.progress + dt.max(0.0) * path.speed).min(1.0);

        if path.progress >= 1.0 {
            self.pose = path.final_pose();
            log::debug!("Camera {:?} arrived at {}", path.kind, self.pose.position);
            self.path = None;
            self.arrived = true;
        } else {
            self.pose = path.pose_at(ease_in_out_cubic(path.progress));
            log::trace!("Camera {:?} progress {:.3}", path.kind, path.progress);
        }
        Some(self.pose)
    }

    fn start(&mut self, path: CameraPath) {
        log::debug!(
            "Camera {:?}: {} waypoints, length {:.2}, speed {:.2}",
            path.kind,
            path.camera.points().len(),
            path.camera_arc.total(),
            path.speed
        );
        self.path = Some(path);
        self.arrived = false;
    }

    // ── Transitions ──

    /// Ride the spiral from rank `from` to rank `to`.
    fn spiral_path(&self, from: f32, to: f32, target: &ProjectedMoment) -> CameraPath {
        let steps = self.params.spiral_steps.max(1);
        let samples = self.projector.sample(from.min(to), from.max(to), steps);
        let mut ranks: Vec<f32> = (0..=steps).map(|k| samples.rank_at(k)).collect();
        let mut look_at: Vec<Vec3> = samples.collect();
        if to < from {
            ranks.reverse();
            look_at.reverse();
        }

        let mut camera: Vec<Vec3> = ranks
            .iter()
            .zip(&look_at)
            .map(|(&r, &p)| self.viewpoint(Some(r), p))
            .collect();

        // join the live pose at the start and the exact target framing at the end
        camera[0] = self.pose.position;
        look_at[0] = self.pose.look_at;
        camera[steps] = self.viewpoint(target.rank, target.position);
        look_at[steps] = target.position;

        CameraPath::new(TransitionKind::FollowSpiral, camera, look_at, &self.params)
    }

    /// Arc from the live pose to the target, bowed away from the spiral core.
    fn approach_path(&self, target: &ProjectedMoment) -> CameraPath {
        let start = self.pose.position;
        let end = self.viewpoint(target.rank, target.position);
        let chord = start.distance(end);
        let mid = start.lerp(end, 0.5);
        let push = (chord * self.params.arc_push_ratio).max(self.params.min_arc_push);
        let bowed = mid + radial_xz(mid) * push;

        let look_start = self.pose.look_at;
        let look_mid = look_start.lerp(target.position, 0.5);

        CameraPath::new(
            TransitionKind::Approach,
            vec![start, bowed, end],
            vec![look_start, look_mid, target.position],
            &self.params,
        )
    }

    /// Lifted arc back to the overview pose.
    fn overview_path(&self) -> CameraPath {
        let start = self.pose.position;
        let end = self.params.overview_position;
        let chord = start.distance(end);
        let lift = (chord * self.params.overview_lift_ratio).max(self.params.min_overview_lift);
        let raised = start.lerp(end, 0.5) + Vec3::Y * lift;

        let look_start = self.pose.look_at;
        let look_end = self.params.overview_look_at;

        CameraPath::new(
            TransitionKind::Overview,
            vec![start, raised, end],
            vec![look_start, look_start.lerp(look_end, 0.5), look_end],
            &self.params,
        )
    }
}

/// Camera position that frames every point: off the bounding-box centre by
/// 1.5 × its largest dimension. `(0, 5, 15)` when there is nothing to frame.
pub fn optimal_camera_position(points: &[Vec3]) -> Vec3 {
    let Some(&first) = points.first() else {
        return Vec3::new(0.0, 5.0, 15.0);
    };
    let (min, max) = points
        .iter()
        .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));

    let center = (min + max) * 0.5;
    let distance = (max - min).max_element() * 1.5;
    center + Vec3::new(distance * 0.7, distance * 0.5, distance * 0.7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::five_months;

    fn setup() -> (CameraChoreographer, Vec<ProjectedMoment>, SpiralProjector) {
        let projector = SpiralProjector::default();
        let bubbles = projector.project_all(&five_months());
        (CameraChoreographer::new(CameraParams::default(), projector), bubbles, projector)
    }

    fn run_to_end(cam: &mut CameraChoreographer) -> usize {
        let mut frames = 0;
        while cam.tick(1.0 / 60.0).is_some() {
            frames += 1;
            assert!(frames < 10_000, "camera never arrived");
        }
        frames
    }

    #[test]
    fn idle_tick_does_nothing() {
        let (mut cam, _, _) = setup();
        assert!(!cam.is_animating());
        assert_eq!(cam.tick(0.5), None);
        assert_eq!(cam.pose().position, Vec3::new(25.0, 15.0, 25.0));
    }

    #[test]
    fn first_selection_approaches_on_an_arc() {
        let (mut cam, bubbles, _) = setup();
        assert!(cam.select(Some(&bubbles[2])));
        assert_eq!(cam.transition(), Some(TransitionKind::Approach));
        assert_eq!(cam.camera_points().len(), 3);
        assert_eq!(cam.look_at_points()[2], bubbles[2].position);

        // the arc bows away from the chord midpoint
        let pts = cam.camera_points();
        let mid = pts[0].lerp(pts[2], 0.5);
        assert!(pts[1].distance(mid) >= 4.0 - 1e-4);
    }

    #[test]
    fn arrival_is_exact() {
        let (mut cam, bubbles, _) = setup();
        cam.select(Some(&bubbles[2]));
        let expected = cam.viewpoint(bubbles[2].rank, bubbles[2].position);
        run_to_end(&mut cam);

        assert!(!cam.is_animating());
        assert_eq!(cam.pose().position, expected);
        assert_eq!(cam.pose().look_at, bubbles[2].position);
        assert_eq!(cam.tick(0.1), None);
    }

    #[test]
    fn viewpoint_offset() {
        let (cam, _, projector) = setup();
        // rank 0: angle 0, outward is +X
        let p = projector.point_at(0.0);
        let v = cam.viewpoint(Some(0.0), p);
        assert!((v - (p + Vec3::new(8.0, 4.8, 0.0))).length() < 1e-5);
        // no rank: horizontal direction from the axis
        let w = cam.viewpoint(None, Vec3::new(0.0, 2.0, 3.0));
        assert!((w - Vec3::new(0.0, 6.8, 11.0)).length() < 1e-5);
    }

    #[test]
    fn selecting_along_the_timeline_rides_the_spiral() {
        let (mut cam, bubbles, projector) = setup();
        cam.select(Some(&bubbles[2]));
        run_to_end(&mut cam);

        assert!(cam.select(Some(&bubbles[4])));
        assert_eq!(cam.transition(), Some(TransitionKind::FollowSpiral));
        assert_eq!(cam.camera_points().len(), 21);

        let expected: Vec<Vec3> = projector.sample(0.5, 1.0, 20).collect();
        let look = cam.look_at_points();
        assert_eq!(look.len(), 21);
        for (a, b) in look.iter().zip(&expected) {
            assert!((*a - *b).length() < 1e-4);
        }

        let speed = cam.speed();
        assert!((0.5..=1.2).contains(&speed));
        let len = cam.path_length();
        assert!((speed - (25.0 / len).clamp(0.5, 1.2)).abs() < 1e-6);

        run_to_end(&mut cam);
        assert_eq!(cam.pose().position, cam.viewpoint(Some(1.0), bubbles[4].position));
        assert_eq!(cam.pose().look_at, bubbles[4].position);
    }

    #[test]
    fn travelling_backwards_reverses_samples() {
        let (mut cam, bubbles, projector) = setup();
        cam.select(Some(&bubbles[4]));
        run_to_end(&mut cam);
        cam.select(Some(&bubbles[0]));

        let look = cam.look_at_points();
        assert_eq!(look[20], bubbles[0].position);
        let forward: Vec<Vec3> = projector.sample(0.0, 1.0, 20).collect();
        assert!((look[10] - forward[10]).length() < 1e-4);
        assert!((look[1] - forward[19]).length() < 1e-4);
    }

    #[test]
    fn reselecting_is_a_no_op() {
        let (mut cam, bubbles, _) = setup();
        assert!(cam.select(Some(&bubbles[1])));
        cam.tick(0.2);
        let progress = cam.progress();
        assert!(!cam.select(Some(&bubbles[1])));
        assert_eq!(cam.progress(), progress);
    }

    #[test]
    fn interruption_starts_from_live_pose() {
        let (mut cam, bubbles, _) = setup();
        cam.select(Some(&bubbles[0]));
        cam.tick(0.3);
        let live = cam.pose();
        assert!(cam.progress() > 0.0);

        cam.select(Some(&bubbles[3]));
        assert_eq!(cam.progress(), 0.0);
        assert_eq!(cam.camera_points()[0], live.position);
        assert_eq!(cam.look_at_points()[0], live.look_at);
    }

    #[test]
    fn deselect_returns_to_overview() {
        let (mut cam, bubbles, _) = setup();
        assert!(!cam.select(None));

        cam.select(Some(&bubbles[3]));
        run_to_end(&mut cam);
        assert!(cam.select(None));
        assert_eq!(cam.transition(), Some(TransitionKind::Overview));
        assert_eq!(cam.selected_id(), None);
        // midpoint raised above the chord
        let pts = cam.camera_points();
        assert!(pts[1].y > (pts[0].y + pts[2].y) * 0.5);

        run_to_end(&mut cam);
        assert_eq!(cam.pose().position, Vec3::new(25.0, 15.0, 25.0));
        assert_eq!(cam.pose().look_at, Vec3::ZERO);
        assert!(!cam.select(None));
    }

    #[test]
    fn progress_is_monotone_and_ends_at_one() {
        let (mut cam, bubbles, _) = setup();
        assert_eq!(cam.progress(), 0.0);
        cam.select(Some(&bubbles[2]));
        let mut last = 0.0;
        while cam.tick(0.05).is_some() {
            let p = cam.progress();
            assert!(p >= last);
            last = p;
        }
        assert_eq!(cam.progress(), 1.0);

        cam.select(Some(&bubbles[3]));
        assert_eq!(cam.progress(), 0.0);
    }

    #[test]
    fn flight_eases_in_and_out() {
        let (mut cam, bubbles, _) = setup();
        cam.select(Some(&bubbles[2]));
        let mut positions = vec![cam.pose().position];
        while let Some(pose) = cam.tick(1.0 / 60.0) {
            positions.push(pose.position);
        }
        let steps: Vec<f32> = positions.windows(2).map(|w| w[0].distance(w[1])).collect();
        assert!(steps.len() > 10);

        let first = steps[0];
        let middle = steps[steps.len() / 2];
        let last = steps[steps.len() - 1];
        assert!(first * 10.0 < middle, "first {first} middle {middle}");
        assert!(last < middle);
    }

    #[test]
    fn speed_clamp() {
        let params = CameraParams::default();
        assert_eq!(travel_speed(0.0, &params), 1.2);
        assert_eq!(travel_speed(5.0, &params), 1.2);
        assert_eq!(travel_speed(1000.0, &params), 0.5);
        assert!((travel_speed(25.0, &params) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn framing() {
        assert_eq!(optimal_camera_position(&[]), Vec3::new(0.0, 5.0, 15.0));
        let pts = [Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0)];
        // box 4 × 1 × 1 around (0, 0.5, 0.5), distance 6
        let cam = optimal_camera_position(&pts);
        assert!((cam - Vec3::new(4.2, 3.5, 4.7)).length() < 1e-5);
    }
}
