//! Fixed color tables for bubbles and relation edges.
//!
//! Colors travel to the renderer as `#RRGGBB` strings; `to_f32` gives the
//! normalized form used in vertex buffers.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::{Emotion, RelationType};

/// RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Normalized RGBA (alpha 1.0) for rendering
    #[inline(always)]
    pub fn to_f32(self) -> [f32; 4] {
        const INV_255: f32 = 1.0 / 255.0;
        [
            self.r as f32 * INV_255,
            self.g as f32 * INV_255,
            self.b as f32 * INV_255,
            1.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// ── Emotion colors ──

pub const HAPPY: Rgb = Rgb::new(0xFF, 0xD7, 0x00); // Gold
pub const SAD: Rgb = Rgb::new(0x41, 0x69, 0xE1); // Royal Blue
pub const EXCITING: Rgb = Rgb::new(0xFF, 0x63, 0x47); // Tomato
pub const NOSTALGIC: Rgb = Rgb::new(0x93, 0x70, 0xDB); // Medium Purple
pub const NEUTRAL: Rgb = Rgb::new(0xA9, 0xA9, 0xA9); // Dark Gray

pub fn emotion_color(emotion: Emotion) -> Rgb {
    match emotion {
        Emotion::Happy => HAPPY,
        Emotion::Sad => SAD,
        Emotion::Exciting => EXCITING,
        Emotion::Nostalgic => NOSTALGIC,
        Emotion::Neutral => NEUTRAL,
    }
}

// ── Relation colors ──

pub const SAME_PEOPLE: Rgb = Rgb::new(0xFF, 0x69, 0xB4); // Hot Pink
pub const SAME_LOCATION: Rgb = Rgb::new(0x32, 0xCD, 0x32); // Lime Green
pub const SAME_EVENT: Rgb = Rgb::new(0xFF, 0xD7, 0x00); // Gold
/// Fallback for relation categories without a dedicated color
pub const ACCENT: Rgb = Rgb::new(0xA7, 0x8B, 0xFA);

pub fn relation_color(kind: &RelationType) -> Rgb {
    match kind {
        RelationType::SamePeople => SAME_PEOPLE,
        RelationType::SameLocation => SAME_LOCATION,
        RelationType::SameEvent => SAME_EVENT,
        RelationType::Other(_) => ACCENT,
    }
}

/// Tint of the spiral guide path
pub const GUIDE: Rgb = NOSTALGIC;
