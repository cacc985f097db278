//! Moment records as delivered by the REST layer.
//!
//! The layout core only reads these; it never mutates or persists them.

pub mod filter;
pub mod stats;

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GalaxyError, Result};

/// Importance used when a record has none.
pub const DEFAULT_IMPORTANCE: u8 = 3;

/// Emotion tag of a moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Exciting,
    Nostalgic,
    #[default]
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Exciting,
        Emotion::Nostalgic,
        Emotion::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Exciting => "exciting",
            Emotion::Nostalgic => "nostalgic",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == s)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a link between two moments.
///
/// Unknown categories are kept verbatim so newer backends do not break the
/// layout; they are drawn with the accent color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationType {
    SamePeople,
    SameLocation,
    SameEvent,
    Other(String),
}

impl RelationType {
    pub fn as_str(&self) -> &str {
        match self {
            RelationType::SamePeople => "same_people",
            RelationType::SameLocation => "same_location",
            RelationType::SameEvent => "same_event",
            RelationType::Other(s) => s,
        }
    }
}

impl From<&str> for RelationType {
    fn from(s: &str) -> Self {
        match s {
            "same_people" => RelationType::SamePeople,
            "same_location" => RelationType::SameLocation,
            "same_event" => RelationType::SameEvent,
            other => RelationType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RelationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(RelationType::from(s.as_str()))
    }
}

/// Directional relation row: the owning moment points at `related_moment_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentRelation {
    pub related_moment_id: String,
    pub relation_type: RelationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    Other,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Other => "other",
        }
    }
}

impl Serialize for MediaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            _ => MediaType::Other,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub file_type: MediaType,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// A journaled moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moment {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub moment_date: DateTime<Utc>,
    /// Unrecognized emotion strings read as untagged
    #[serde(default, deserialize_with = "lenient_emotion")]
    pub emotion: Option<Emotion>,
    #[serde(default)]
    pub importance: Option<u8>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media_files: Vec<MediaFile>,
    #[serde(default)]
    pub relations: Vec<MomentRelation>,
}

impl Moment {
    pub fn new(id: impl Into<String>, moment_date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: None,
            moment_date,
            emotion: None,
            importance: None,
            is_draft: false,
            deleted_at: None,
            media_files: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_emotion(mut self, emotion: Emotion) -> Self {
        self.emotion = Some(emotion);
        self
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn with_relation(mut self, related_id: impl Into<String>, kind: RelationType) -> Self {
        self.relations.push(MomentRelation {
            related_moment_id: related_id.into(),
            relation_type: kind,
        });
        self
    }

    pub fn emotion_or_neutral(&self) -> Emotion {
        self.emotion.unwrap_or_default()
    }

    /// Importance on 1..=5; missing or zero means [`DEFAULT_IMPORTANCE`].
    pub fn importance_or_default(&self) -> u8 {
        match self.importance {
            None | Some(0) => DEFAULT_IMPORTANCE,
            Some(v) => v.clamp(1, 5),
        }
    }

    /// URL of the first image attached to the moment, thumbnail preferred.
    pub fn primary_image(&self) -> Option<&str> {
        self.media_files
            .iter()
            .find(|m| m.file_type == MediaType::Image)
            .map(|m| m.thumbnail_url.as_deref().unwrap_or(&m.url))
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

fn lenient_emotion<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Emotion>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Emotion::parse))
}

/// Parse a JSON array of moment records.
pub fn load_moments_json(src: &str) -> Result<Vec<Moment>> {
    Ok(serde_json::from_str(src)?)
}

pub fn load_moments_file(path: impl AsRef<Path>) -> Result<Vec<Moment>> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|e| GalaxyError::io(path, e))?;
    let moments = load_moments_json(&src)?;
    log::debug!("Loaded {} moments from {}", moments.len(), path.display());
    Ok(moments)
}
