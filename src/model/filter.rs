//! Visible-set filtering.
//!
//! Narrows the moment list before layout. Relation targets that fall outside
//! the filtered set simply stop producing edges.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{Emotion, Moment};

/// Filter applied to the moment list before it is laid out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentFilter {
    pub emotion: Option<Emotion>,
    pub importance: Option<u8>,
    /// Inclusive lower bound on the moment date
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the moment date
    pub end: Option<DateTime<Utc>>,
    /// Keep soft-deleted moments
    pub include_deleted: bool,
}

impl MomentFilter {
    /// Everything dated within calendar year `year` (UTC).
    pub fn year(year: i32) -> Self {
        Self {
            start: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single(),
            // last representable instant of the year, sub-second dates included
            end: Utc
                .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
                .single()
                .map(|next| next - Duration::nanoseconds(1)),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.emotion.is_some()
            || self.importance.is_some()
            || self.start.is_some()
            || self.end.is_some()
    }

    pub fn matches(&self, moment: &Moment) -> bool {
        if !self.include_deleted && moment.is_deleted() {
            return false;
        }
        if let Some(emotion) = self.emotion {
            if moment.emotion != Some(emotion) {
                return false;
            }
        }
        if let Some(importance) = self.importance {
            if moment.importance != Some(importance) {
                return false;
            }
        }
        if self.start.is_some_and(|start| moment.moment_date < start) {
            return false;
        }
        if self.end.is_some_and(|end| moment.moment_date > end) {
            return false;
        }
        true
    }

    /// Matching moments, in input order.
    pub fn apply(&self, moments: &[Moment]) -> Vec<Moment> {
        let kept: Vec<Moment> = moments.iter().filter(|m| self.matches(m)).cloned().collect();
        log::debug!("Filter kept {} of {} moments", kept.len(), moments.len());
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::moment;

    #[test]
    fn empty_filter_keeps_everything_but_deleted() {
        let mut gone = moment("gone", 2);
        gone.deleted_at = Some(Utc::now());
        let moments = vec![moment("a", 1), gone, moment("c", 3)];

        let kept = MomentFilter::default().apply(&moments);
        let ids: Vec<_> = kept.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        let all = MomentFilter {
            include_deleted: true,
            ..Default::default()
        }
        .apply(&moments);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn emotion_and_importance_are_exact() {
        let moments = vec![
            moment("a", 1).with_emotion(Emotion::Happy).with_importance(5),
            moment("b", 2).with_emotion(Emotion::Happy).with_importance(2),
            moment("c", 3).with_emotion(Emotion::Sad).with_importance(5),
            moment("d", 4),
        ];
        let f = MomentFilter {
            emotion: Some(Emotion::Happy),
            importance: Some(5),
            ..Default::default()
        };
        let kept = f.apply(&moments);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
        assert!(f.is_active());
    }

    #[test]
    fn date_range_is_inclusive() {
        let moments = vec![moment("jan", 1), moment("feb", 2), moment("mar", 3)];
        let f = MomentFilter {
            start: Some(moments[1].moment_date),
            end: Some(moments[2].moment_date),
            ..Default::default()
        };
        let ids: Vec<_> = f.apply(&moments).into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["feb", "mar"]);
    }

    #[test]
    fn year_filter() {
        let mut old = moment("old", 6);
        old.moment_date = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let moments = vec![old, moment("new", 6)];
        let kept = MomentFilter::year(2024).apply(&moments);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "new");
        assert!(!MomentFilter::default().is_active());
    }

    #[test]
    fn year_filter_keeps_the_last_second() {
        let mut late = moment("late", 6);
        late.moment_date = "2024-12-31T23:59:59.500Z".parse().unwrap();
        let mut next = moment("next", 6);
        next.moment_date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let kept = MomentFilter::year(2024).apply(&[late, next]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "late");
    }
}
