//! Dense samples of the spiral arm between two ranks.
//!
//! Samples come straight from [`SpiralProjector::point_at`], so a sample taken
//! at a moment's rank is that moment's position, bit for bit.

use glam::Vec3;

use crate::fast_math::lerp;
use crate::render::spiral::SpiralProjector;

/// Lazy, restartable walk along the spiral from `rank_start` to `rank_end`.
///
/// Yields `steps + 1` points, both endpoints included. Cloning restarts the
/// walk without recomputing anything.
#[derive(Debug, Clone)]
pub struct SpiralSamples {
    projector: SpiralProjector,
    rank_start: f32,
    rank_end: f32,
    steps: usize,
    next: usize,
}

impl SpiralSamples {
    pub fn new(projector: SpiralProjector, rank_start: f32, rank_end: f32, steps: usize) -> Self {
        Self {
            projector,
            rank_start,
            rank_end,
            steps,
            next: 0,
        }
    }

    /// Rank of sample `k`. With zero steps every sample sits at `rank_start`.
    #[inline]
    pub fn rank_at(&self, k: usize) -> f32 {
        if self.steps == 0 {
            return self.rank_start;
        }
        if k >= self.steps {
            return self.rank_end;
        }
        lerp(self.rank_start, self.rank_end, k as f32 / self.steps as f32)
    }
}

impl Iterator for SpiralSamples {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.next > self.steps {
            return None;
        }
        let rank = self.rank_at(self.next);
        self.next += 1;
        Some(self.projector.point_at(rank))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps + 1).saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for SpiralSamples {}

impl SpiralProjector {
    /// Sample the arm from `rank_start` to `rank_end` in `steps` equal rank steps.
    pub fn sample(&self, rank_start: f32, rank_end: f32, steps: usize) -> SpiralSamples {
        SpiralSamples::new(*self, rank_start, rank_end, steps)
    }

    /// Guide path through a set of ranks: one sampled segment per neighbouring
    /// pair, shared endpoints emitted once.
    ///
    /// Ranks are visited in ascending order. Fewer than two ranks give an
    /// empty path since there is nothing to connect.
    pub fn guide_path(&self, ranks: &[f32], steps_per_segment: usize) -> Vec<Vec3> {
        let mut sorted: Vec<f32> = ranks.iter().copied().filter(|r| r.is_finite()).collect();
        sorted.sort_by(f32::total_cmp);
        sorted.dedup();
        if sorted.len() < 2 {
            return Vec::new();
        }

        let steps = steps_per_segment.max(1);
        let mut path = Vec::with_capacity((sorted.len() - 1) * steps + 1);
        for (i, pair) in sorted.windows(2).enumerate() {
            let segment = self.sample(pair[0], pair[1], steps);
            // every segment after the first starts where the previous one ended
            let skip = usize::from(i > 0);
            path.extend(segment.skip(skip));
        }
        path
    }
}
