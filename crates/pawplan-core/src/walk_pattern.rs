//! The fixed evening dog-walk rotation.
//!
//! Unlike schedule-driven rotation, the walk assignee is a pure function
//! of the calendar date: a fixed 3-kid cycle anchored at a known date, so
//! the mapping is recomputable from the date alone. There is no persisted
//! rotation state to drift -- if generation misses a week, the next run
//! assigns exactly the kids the date arithmetic dictates.

use chrono::{Duration, NaiveDate, NaiveTime};
use std::collections::HashSet;
use tracing::debug;

use crate::chore::{TaskDraft, TaskType};
use crate::config::WalkConfig;
use crate::error::{CoreError, Result};

/// Task name identifying walk tasks; also their deduplication key.
pub const WALK_TASK_NAME: &str = "evening_walk";
/// Default points for a completed walk.
pub const DEFAULT_WALK_POINTS: i64 = 15;

/// Walks are due at 18:00.
pub fn walk_due_time() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Anchor date for the cycle: a Thursday on which the first roster kid
/// walks.
pub fn default_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 4).unwrap_or(NaiveDate::MIN)
}

fn default_roster() -> Vec<String> {
    ["aiden", "clara", "emery"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Deterministic weekday-pattern walk assignment.
#[derive(Debug, Clone)]
pub struct WalkPattern {
    roster: Vec<String>,
    anchor: NaiveDate,
    points_value: i64,
}

impl Default for WalkPattern {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            anchor: default_anchor(),
            points_value: DEFAULT_WALK_POINTS,
        }
    }
}

impl WalkPattern {
    /// Create the pattern with the default roster and anchor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the pattern from configuration.
    pub fn from_config(config: &WalkConfig) -> Self {
        Self {
            roster: config.roster.clone(),
            anchor: config.anchor_date,
            points_value: config.points_value,
        }
    }

    /// The kid who walks on `date`.
    ///
    /// `roster[days_since_anchor mod len]`; dates before the anchor wrap
    /// through the cycle the same way.
    pub fn assignee_for(&self, date: NaiveDate) -> Result<&str> {
        if self.roster.is_empty() {
            return Err(CoreError::invalid_input("walk roster is empty"));
        }
        let days = (date - self.anchor).num_days();
        let index = days.rem_euclid(self.roster.len() as i64) as usize;
        Ok(&self.roster[index])
    }

    /// Generate walk task drafts for the next `days_ahead` days.
    ///
    /// Dates already present in `existing_dates` are skipped; since the
    /// assignee depends only on the date, skips never shift the pattern.
    pub fn generate_tasks(
        &self,
        family_id: &str,
        days_ahead: u32,
        existing_dates: &HashSet<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Vec<TaskDraft>> {
        let mut drafts = Vec::new();
        for offset in 0..days_ahead {
            let date = today + Duration::days(offset as i64);
            if existing_dates.contains(&date) {
                continue;
            }
            let assignee = self.assignee_for(date)?.to_string();
            debug!(date = %date, kid = %assignee, "assigning evening walk");
            drafts.push(TaskDraft {
                schedule_id: None,
                family_id: family_id.to_string(),
                pet_id: None,
                task_name: WALK_TASK_NAME.to_string(),
                task_type: TaskType::Exercise,
                assigned_kid_id: assignee,
                due_date: date,
                due_at: date.and_time(walk_due_time()).and_utc(),
                points_value: self.points_value,
            });
        }
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn anchor_thursday_starts_the_cycle() {
        let pattern = WalkPattern::new();
        // 2024-01-04 is a Thursday.
        assert_eq!(pattern.assignee_for(date(2024, 1, 4)).unwrap(), "aiden");
        assert_eq!(pattern.assignee_for(date(2024, 1, 5)).unwrap(), "clara");
        assert_eq!(pattern.assignee_for(date(2024, 1, 6)).unwrap(), "emery");
        assert_eq!(pattern.assignee_for(date(2024, 1, 7)).unwrap(), "aiden");
    }

    #[test]
    fn cycle_repeats_every_three_days_over_two_weeks() {
        let pattern = WalkPattern::new();
        let start = date(2024, 1, 4);
        for offset in 0..14 {
            let day = start + Duration::days(offset);
            let expected = ["aiden", "clara", "emery"][(offset % 3) as usize];
            assert_eq!(pattern.assignee_for(day).unwrap(), expected, "{day}");
        }
    }

    #[test]
    fn dates_before_the_anchor_wrap() {
        let pattern = WalkPattern::new();
        assert_eq!(pattern.assignee_for(date(2024, 1, 3)).unwrap(), "emery");
        assert_eq!(pattern.assignee_for(date(2024, 1, 1)).unwrap(), "aiden");
    }

    #[test]
    fn generation_skips_existing_dates() {
        let pattern = WalkPattern::new();
        let today = date(2025, 6, 1);
        let existing: HashSet<_> = [today].into();
        let drafts = pattern
            .generate_tasks("family-1", 3, &existing, today)
            .unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].due_date, date(2025, 6, 2));
        assert_eq!(drafts[0].task_name, WALK_TASK_NAME);
        assert!(drafts[0].schedule_id.is_none());
    }

    #[test]
    fn self_heals_after_a_gap() {
        let pattern = WalkPattern::new();
        // Generating on two different start dates must agree wherever the
        // windows overlap.
        let early = pattern
            .generate_tasks("family-1", 10, &HashSet::new(), date(2025, 6, 1))
            .unwrap();
        let late = pattern
            .generate_tasks("family-1", 5, &HashSet::new(), date(2025, 6, 6))
            .unwrap();
        for draft in &late {
            let twin = early
                .iter()
                .find(|d| d.due_date == draft.due_date)
                .expect("overlapping date");
            assert_eq!(twin.assigned_kid_id, draft.assigned_kid_id);
        }
    }

    #[test]
    fn walks_are_due_at_six_pm() {
        let pattern = WalkPattern::new();
        let drafts = pattern
            .generate_tasks("family-1", 1, &HashSet::new(), date(2025, 6, 1))
            .unwrap();
        assert_eq!(
            drafts[0].due_at,
            date(2025, 6, 1).and_time(walk_due_time()).and_utc()
        );
    }

    #[test]
    fn empty_roster_is_invalid_input() {
        let pattern = WalkPattern {
            roster: Vec::new(),
            anchor: default_anchor(),
            points_value: DEFAULT_WALK_POINTS,
        };
        let err = pattern
            .generate_tasks("family-1", 1, &HashSet::new(), date(2025, 6, 1))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }
}
