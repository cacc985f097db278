//! Spiral-timeline galaxy for journaled moments.
//!
//! Moments are placed on a multi-turn spiral by chronological rank, related
//! moments are joined by fanned Bezier edges, and a camera choreographer
//! flies between selections along the spiral arm.

pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod scene;

// Scalar helpers
pub mod fast_math;

pub use config::GalaxyConfig;
pub use error::{GalaxyError, Result};
pub use model::filter::MomentFilter;
pub use model::stats::MomentStats;
pub use model::{Emotion, Moment, RelationType};
pub use render::camera::{CameraChoreographer, CameraPose, TransitionKind};
pub use render::spiral::{ProjectedMoment, SpiralProjector};
pub use scene::{GalaxyLayout, GalaxyScene};
