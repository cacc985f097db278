//! Galaxy tuning parameters.
//!
//! Every constant that shapes the spiral, the edges, the constellation and the
//! camera lives here. `Default` reproduces the shipped look; a TOML file may
//! override any subset of fields.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{GalaxyError, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Spiral
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Shape of the spiral arm, parameterised by chronological rank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralParams {
    /// Full turns across the whole history
    pub turns: f32,
    /// Radius of the innermost ring (rank 0)
    pub base_radius: f32,
    /// Radius added between rank 0 and rank 1
    pub radius_growth: f32,
    /// Amplitude of the lateral Z wobble
    pub wave_amplitude: f32,
    /// Half-periods of the wobble across the history
    pub wave_frequency: f32,
    /// Total height between oldest and newest moment
    pub vertical_spread: f32,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            turns: 6.0,
            base_radius: 1.0,
            radius_growth: 30.0,
            wave_amplitude: 2.0,
            wave_frequency: 3.0,
            vertical_spread: 15.0,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Relation edges
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// Total angle covered by the branches leaving one bubble (radians)
    pub fan_range: f32,
    /// Control-point pull as a fraction of the edge length
    pub pull_ratio: f32,
    /// Lower bound on the control-point pull
    pub min_pull: f32,
    /// Bezier subdivisions per edge (polyline has segments + 1 points)
    pub segments: usize,
    /// Edges shorter than this are not drawn
    pub min_length: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            fan_range: std::f32::consts::FRAC_PI_2,
            pull_ratio: 0.45,
            min_pull: 3.0,
            segments: 50,
            min_length: 0.01,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Constellation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationParams {
    /// Radius of the ring of related moments
    pub ring_radius: f32,
    /// Height between the first and last ring member
    pub vertical_spread: f32,
    /// Connector control-point pull as a fraction of the ring distance
    pub pull_ratio: f32,
    pub segments: usize,
}

impl Default for ConstellationParams {
    fn default() -> Self {
        Self {
            ring_radius: 5.0,
            vertical_spread: 3.0,
            pull_ratio: 0.3,
            segments: 40,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Camera
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Radial distance from a selected bubble to the camera
    pub distance: f32,
    /// Camera height above the bubble, as a fraction of `distance`
    pub elevation_ratio: f32,
    /// Spiral samples used when riding the arm between two selections
    pub spiral_steps: usize,
    /// Path length covered in one second at speed 1.0
    pub speed_numerator: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Outward push of the approach arc midpoint, as a fraction of the chord
    pub arc_push_ratio: f32,
    pub min_arc_push: f32,
    /// Lift of the overview arc midpoint, as a fraction of the chord
    pub overview_lift_ratio: f32,
    pub min_overview_lift: f32,
    /// Pose the camera returns to when the selection is cleared
    pub overview_position: Vec3,
    pub overview_look_at: Vec3,
    /// Subdivisions of the arc-length table built for every curve
    pub arc_divisions: usize,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            distance: 8.0,
            elevation_ratio: 0.6,
            spiral_steps: 20,
            speed_numerator: 25.0,
            speed_min: 0.5,
            speed_max: 1.2,
            arc_push_ratio: 0.3,
            min_arc_push: 4.0,
            overview_lift_ratio: 0.25,
            min_overview_lift: 3.0,
            overview_position: Vec3::new(25.0, 15.0, 25.0),
            overview_look_at: Vec3::ZERO,
            arc_divisions: 200,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Guide path
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideParams {
    /// Spiral samples between two neighbouring moments
    pub steps_per_segment: usize,
}

impl Default for GuideParams {
    fn default() -> Self {
        Self {
            steps_per_segment: 12,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GalaxyConfig
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Full configuration for the galaxy scene
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub spiral: SpiralParams,
    pub edges: EdgeParams,
    pub constellation: ConstellationParams,
    pub camera: CameraParams,
    pub guide: GuideParams,
}

impl GalaxyConfig {
    /// Parse and validate a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: GalaxyConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|e| GalaxyError::io(path, e))?;
        let cfg = Self::from_toml_str(&src)?;
        log::debug!("Loaded galaxy config from {}", path.display());
        Ok(cfg)
    }

    /// Reject values that would make the layout divide by zero or stall the camera.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: &str| Err(GalaxyError::InvalidConfig(msg.to_string()));

        if self.edges.segments == 0 || self.constellation.segments == 0 {
            return bad("curve segments must be > 0");
        }
        if self.camera.spiral_steps == 0 || self.camera.arc_divisions == 0 {
            return bad("camera.spiral_steps and camera.arc_divisions must be > 0");
        }
        if self.guide.steps_per_segment == 0 {
            return bad("guide.steps_per_segment must be > 0");
        }
        if !(self.camera.speed_min > 0.0 && self.camera.speed_min <= self.camera.speed_max) {
            return bad("camera speed range must satisfy 0 < speed_min <= speed_max");
        }
        if self.camera.speed_numerator <= 0.0 || self.camera.distance <= 0.0 {
            return bad("camera.speed_numerator and camera.distance must be positive");
        }
        if self.constellation.ring_radius <= 0.0 {
            return bad("constellation.ring_radius must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(GalaxyConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = GalaxyConfig::from_toml_str(
            r#"
            [spiral]
            turns = 4.0

            [camera]
            distance = 10.0
            "#,
        )
        .unwrap();
        assert!((cfg.spiral.turns - 4.0).abs() < 1e-6);
        assert!((cfg.spiral.radius_growth - 30.0).abs() < 1e-6);
        assert!((cfg.camera.distance - 10.0).abs() < 1e-6);
        assert_eq!(cfg.camera.spiral_steps, 20);
        assert_eq!(cfg.edges.segments, 50);
    }

    #[test]
    fn overview_pose_from_toml() {
        let cfg = GalaxyConfig::from_toml_str(
            r#"
            [camera]
            overview_position = [30.0, 20.0, 30.0]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.camera.overview_position, Vec3::new(30.0, 20.0, 30.0));
        assert_eq!(cfg.camera.overview_look_at, Vec3::ZERO);
    }

    #[test]
    fn inverted_speed_range_rejected() {
        let err = GalaxyConfig::from_toml_str(
            r#"
            [camera]
            speed_min = 2.0
            speed_max = 1.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GalaxyError::InvalidConfig(_)));
    }

    #[test]
    fn zero_segments_rejected() {
        let mut cfg = GalaxyConfig::default();
        cfg.edges.segments = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = GalaxyConfig::from_toml_str("[spiral\nturns = ").unwrap_err();
        assert!(matches!(err, GalaxyError::Config(_)));
    }
}
