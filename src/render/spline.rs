//! Parametric curves used for edges and camera paths.
//!
//! - `CubicBezier`: relation edges and constellation connectors
//! - `CatmullRom`: centripetal spline through camera waypoints
//! - `ArcLength`: cumulative length table for constant-speed sampling

use glam::Vec3;

use crate::fast_math::EPSILON;

// ── Cubic Bezier ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl CubicBezier {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate at `t` in [0, 1].
    pub fn point(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        let tt = t * t;
        let uu = u * u;
        self.p0 * (uu * u) + self.p1 * (3.0 * uu * t) + self.p2 * (3.0 * u * tt) + self.p3 * (tt * t)
    }

    /// `divisions + 1` evenly spaced (in t) points, endpoints exact.
    pub fn points(&self, divisions: usize) -> Vec<Vec3> {
        let n = divisions.max(1);
        let mut out = Vec::with_capacity(n + 1);
        out.push(self.p0);
        for i in 1..n {
            out.push(self.point(i as f32 / n as f32));
        }
        out.push(self.p3);
        out
    }
}

// ── Centripetal Catmull-Rom ──

/// Open centripetal Catmull-Rom spline through `points`.
///
/// End tangents are taken from mirrored phantom points, so the curve starts
/// at the first point and ends at the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct CatmullRom {
    points: Vec<Vec3>,
}

impl CatmullRom {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn first(&self) -> Vec3 {
        self.points.first().copied().unwrap_or(Vec3::ZERO)
    }

    pub fn last(&self) -> Vec3 {
        self.points.last().copied().unwrap_or(Vec3::ZERO)
    }

    /// Evaluate at `t` in [0, 1], spread uniformly over the control segments.
    pub fn point(&self, t: f32) -> Vec3 {
        let pts = &self.points;
        let l = pts.len();
        match l {
            0 => return Vec3::ZERO,
            1 => return pts[0],
            _ => {}
        }

        let t = t.clamp(0.0, 1.0);
        let p = (l - 1) as f32 * t;
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f32;
        if seg >= l - 1 {
            seg = l - 2;
            weight = 1.0;
        }

        let p1 = pts[seg];
        let p2 = pts[seg + 1];
        let p0 = if seg > 0 { pts[seg - 1] } else { p1 * 2.0 - p2 };
        let p3 = if seg + 2 < l { pts[seg + 2] } else { p2 * 2.0 - p1 };

        // centripetal parameterisation: knot spacing = sqrt(distance)
        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < EPSILON {
            dt1 = 1.0;
        }
        if dt0 < EPSILON {
            dt0 = dt1;
        }
        if dt2 < EPSILON {
            dt2 = dt1;
        }

        let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

        let c0 = p1;
        let c1 = t1;
        let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * t1 - t2;
        let c3 = 2.0 * p1 - 2.0 * p2 + t1 + t2;

        let w = weight;
        c0 + c1 * w + c2 * (w * w) + c3 * (w * w * w)
    }
}

// ── Arc length ──

/// Cumulative chord lengths of a curve sampled at `divisions + 1` points.
///
/// Maps a fraction of the total length back to the curve parameter, so a
/// camera moving at constant `u` moves at constant speed.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLength {
    cumulative: Vec<f32>,
}

impl ArcLength {
    pub fn measure(divisions: usize, eval: impl Fn(f32) -> Vec3) -> Self {
        let n = divisions.max(1);
        let mut cumulative = Vec::with_capacity(n + 1);
        cumulative.push(0.0);
        let mut prev = eval(0.0);
        let mut total = 0.0;
        for i in 1..=n {
            let p = eval(i as f32 / n as f32);
            total += prev.distance(p);
            cumulative.push(total);
            prev = p;
        }
        Self { cumulative }
    }

    pub fn total(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Curve parameter at which `u` ∈ [0, 1] of the total length is covered.
    pub fn parameter_at(&self, u: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let total = self.total();
        let n = self.cumulative.len() - 1;
        if total < EPSILON || n == 0 {
            return u;
        }
        if u >= 1.0 {
            return 1.0;
        }

        let target = u * total;
        // first index whose cumulative length exceeds the target
        let hi = self.cumulative.partition_point(|&len| len <= target).clamp(1, n);
        let lo = hi - 1;
        let span = self.cumulative[hi] - self.cumulative[lo];
        let frac = if span > 0.0 {
            (target - self.cumulative[lo]) / span
        } else {
            0.0
        };
        (lo as f32 + frac) / n as f32
    }
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_endpoints_and_count() {
        let b = CubicBezier::new(Vec3::ZERO, Vec3::Y, Vec3::new(1.0, 1.0, 0.0), Vec3::X);
        let pts = b.points(50);
        assert_eq!(pts.len(), 51);
        assert_eq!(pts[0], Vec3::ZERO);
        assert_eq!(pts[50], Vec3::X);
        // symmetric control polygon → midpoint at x = 0.5, y = 0.75
        let mid = b.point(0.5);
        assert!((mid - Vec3::new(0.5, 0.75, 0.0)).length() < 1e-6);
    }

    #[test]
    fn straight_bezier_is_a_line() {
        let b = CubicBezier::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        );
        assert!((b.point(0.5) - Vec3::new(1.5, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn catmull_rom_passes_through_waypoints() {
        let pts = vec![
            Vec3::ZERO,
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(4.0, 0.0, 1.0),
            Vec3::new(7.0, 2.0, 3.0),
        ];
        let c = CatmullRom::new(pts.clone());
        for (i, p) in pts.iter().enumerate() {
            let t = i as f32 / 3.0;
            assert!((c.point(t) - *p).length() < 1e-4, "waypoint {i}");
        }
    }

    #[test]
    fn catmull_rom_collinear_stays_on_line() {
        let c = CatmullRom::new(vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)]);
        for i in 0..=20 {
            let p = c.point(i as f32 / 20.0);
            assert!(p.y.abs() < 1e-5 && p.z.abs() < 1e-5);
            assert!(p.x >= -1e-4 && p.x <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn catmull_rom_degenerate_inputs() {
        assert_eq!(CatmullRom::new(vec![]).point(0.3), Vec3::ZERO);
        assert_eq!(CatmullRom::new(vec![Vec3::ONE]).point(0.7), Vec3::ONE);
        // repeated points must not produce NaN
        let c = CatmullRom::new(vec![Vec3::ONE, Vec3::ONE, Vec3::ONE]);
        assert!((c.point(0.4) - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn arc_length_of_a_line() {
        let line = |t: f32| Vec3::new(10.0 * t * t, 0.0, 0.0);
        let arc = ArcLength::measure(200, line);
        assert!((arc.total() - 10.0).abs() < 1e-3);
        // half the length is reached at t = sqrt(0.5)
        let t = arc.parameter_at(0.5);
        assert!((t - 0.5f32.sqrt()).abs() < 1e-2);
        assert_eq!(arc.parameter_at(0.0), 0.0);
        assert_eq!(arc.parameter_at(1.0), 1.0);
    }

    #[test]
    fn arc_length_of_a_point() {
        let arc = ArcLength::measure(10, |_| Vec3::ONE);
        assert_eq!(arc.total(), 0.0);
        assert_eq!(arc.parameter_at(0.3), 0.3);
    }

    #[test]
    fn polyline() {
        let pts = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 2.0, 0.0)];
        assert!((polyline_length(&pts) - 3.0).abs() < 1e-6);
        assert_eq!(polyline_length(&pts[..1]), 0.0);
    }
}
