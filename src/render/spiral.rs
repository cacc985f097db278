//! Spiral timeline projection.
//!
//! Moments are placed along a multi-turn spiral arm by chronological rank:
//! the oldest moment (rank 0) sits on the innermost, lowest ring and the
//! newest (rank 1) on the outermost, highest one.
//!
//!   angle  = rank · 2π · turns
//!   radius = base_radius + rank · radius_growth
//!   wave   = sin(rank · π · wave_frequency) · wave_amplitude
//!   x = cos(angle) · radius
//!   y = (rank − 0.5) · vertical_spread
//!   z = sin(angle) · radius + wave
//!
//! Only relative order matters: absolute dates never enter the geometry.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SpiralParams;
use crate::fast_math::spread_fraction;
use crate::model::Moment;
use crate::render::palette::{emotion_color, Rgb};

/// Rank given to the only moment of a one-element history
pub const SINGLE_MOMENT_RANK: f32 = 0.5;

/// Lists at least this long are projected on the rayon pool
#[cfg(feature = "parallel")]
const PAR_THRESHOLD: usize = 512;

/// A moment placed in the galaxy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedMoment {
    pub id: String,
    /// Chronological rank in [0, 1]; `None` if the moment was not in the list
    pub rank: Option<f32>,
    pub position: Vec3,
    pub color: Rgb,
    /// Bubble radius (not the spiral radius)
    pub radius: f32,
}

/// Bubble radius for an importance on 1..=5: 0.3 at 1, 1.1 at 5.
pub fn bubble_radius(importance: u8) -> f32 {
    0.3 + (importance.max(1) - 1) as f32 * 0.2
}

/// Indices of `moments` sorted by date ascending. Ties keep input order.
pub fn chronological_order(moments: &[Moment]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..moments.len()).collect();
    order.sort_by_key(|&i| moments[i].moment_date);
    order
}

/// Rank of every moment id. A repeated id keeps its earliest rank.
pub fn chronological_ranks(moments: &[Moment]) -> HashMap<&str, f32> {
    let order = chronological_order(moments);
    let count = order.len();
    let mut ranks = HashMap::with_capacity(count);
    for (pos, &i) in order.iter().enumerate() {
        ranks
            .entry(moments[i].id.as_str())
            .or_insert_with(|| spread_fraction(pos, count, SINGLE_MOMENT_RANK));
    }
    ranks
}

/// Rank of `moment` within `all`, or `None` if it is not part of the list.
pub fn rank_of(moment: &Moment, all: &[Moment]) -> Option<f32> {
    chronological_ranks(all).get(moment.id.as_str()).copied()
}

/// Maps chronological rank to spiral coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpiralProjector {
    params: SpiralParams,
}

impl SpiralProjector {
    pub fn new(params: SpiralParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SpiralParams {
        &self.params
    }

    /// Polar angle of the arm at `rank`
    #[inline]
    pub fn angle_at(&self, rank: f32) -> f32 {
        rank * TAU * self.params.turns
    }

    /// Raw spiral position at `rank`. The curve sampler uses exactly this.
    #[inline]
    pub fn point_at(&self, rank: f32) -> Vec3 {
        let p = &self.params;
        let angle = self.angle_at(rank);
        let radius = p.base_radius + rank * p.radius_growth;
        let wave = (rank * PI * p.wave_frequency).sin() * p.wave_amplitude;

        Vec3::new(
            angle.cos() * radius,
            (rank - 0.5) * p.vertical_spread,
            angle.sin() * radius + wave,
        )
    }

    /// Place one moment relative to the whole history.
    ///
    /// A moment missing from `all` lands at the origin.
    pub fn project(&self, moment: &Moment, all: &[Moment]) -> ProjectedMoment {
        self.place(moment, rank_of(moment, all))
    }

    /// Place every moment of `moments`, in input order.
    pub fn project_all(&self, moments: &[Moment]) -> Vec<ProjectedMoment> {
        let ranks = chronological_ranks(moments);
        let place = |m: &Moment| self.place(m, ranks.get(m.id.as_str()).copied());

        #[cfg(feature = "parallel")]
        if moments.len() >= PAR_THRESHOLD {
            return moments.par_iter().map(place).collect();
        }

        moments.iter().map(place).collect()
    }

    fn place(&self, moment: &Moment, rank: Option<f32>) -> ProjectedMoment {
        ProjectedMoment {
            id: moment.id.clone(),
            rank,
            position: rank.map_or(Vec3::ZERO, |r| self.point_at(r)),
            color: emotion_color(moment.emotion_or_neutral()),
            radius: bubble_radius(moment.importance_or_default()),
        }
    }
}
