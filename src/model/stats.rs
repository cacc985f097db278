//! Timeline statistics for the legend and year picker.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::{Emotion, Moment};

/// Aggregate counts over the non-deleted moments
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentStats {
    pub total: usize,
    /// Moments with an explicit emotion; untagged ones are not bucketed
    pub by_emotion: BTreeMap<Emotion, usize>,
    /// Moments with an explicit importance
    pub by_importance: BTreeMap<u8, usize>,
    /// Mean explicit importance, if any moment has one
    pub average_importance: Option<f32>,
}

impl MomentStats {
    pub fn collect(moments: &[Moment]) -> Self {
        let mut by_emotion = BTreeMap::new();
        let mut by_importance = BTreeMap::new();
        let mut total = 0;
        let mut importance_sum = 0u32;
        let mut importance_count = 0u32;

        for m in moments.iter().filter(|m| !m.is_deleted()) {
            total += 1;
            if let Some(e) = m.emotion {
                *by_emotion.entry(e).or_insert(0) += 1;
            }
            if let Some(i) = m.importance.filter(|&i| i > 0) {
                *by_importance.entry(i).or_insert(0) += 1;
                importance_sum += u32::from(i);
                importance_count += 1;
            }
        }

        let average_importance =
            (importance_count > 0).then(|| importance_sum as f32 / importance_count as f32);

        Self {
            total,
            by_emotion,
            by_importance,
            average_importance,
        }
    }
}

/// Number of moments per calendar year, ascending.
pub fn year_groups(moments: &[Moment]) -> BTreeMap<i32, usize> {
    let mut groups = BTreeMap::new();
    for m in moments {
        *groups.entry(m.moment_date.year()).or_insert(0) += 1;
    }
    groups
}

/// Earliest and latest moment date, or `None` for an empty list.
pub fn date_span(moments: &[Moment]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let min = moments.iter().map(|m| m.moment_date).min()?;
    let max = moments.iter().map(|m| m.moment_date).max()?;
    Some((min, max))
}
