//! Consecutive-day completion streaks.
//!
//! A calendar day qualifies when it has at least one approved submission,
//! or a rejected one backed by real effort (more than the low-effort
//! threshold in self-reported minutes) -- genuine effort counts even when
//! a parent rejects the result. The streak is the most recent run of
//! qualifying days with no gap of two or more days between them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::chore::{ChoreStatus, ChoreSubmission};
use crate::config::StreakConfig;
use crate::error::Result;
use crate::store::ChoreStore;

/// Default minutes above which a rejected submission still counts.
pub const DEFAULT_LOW_EFFORT_MINUTES: u32 = 10;

/// Derived streak state for one kid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakSummary {
    /// Length in days of the most recent contiguous qualifying run.
    pub current_streak: u32,
    /// Whether the run touches today or yesterday.
    pub streak_active: bool,
    /// Most recent qualifying day, if any.
    pub last_completion_date: Option<NaiveDate>,
}

impl StreakSummary {
    fn empty() -> Self {
        StreakSummary {
            current_streak: 0,
            streak_active: false,
            last_completion_date: None,
        }
    }
}

/// Derives streaks from submission history.
#[derive(Debug, Clone)]
pub struct StreakCalculator {
    low_effort_minutes: u32,
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self {
            low_effort_minutes: DEFAULT_LOW_EFFORT_MINUTES,
        }
    }
}

impl StreakCalculator {
    /// Create a calculator with the default low-effort threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator from configuration.
    pub fn from_config(config: &StreakConfig) -> Self {
        Self {
            low_effort_minutes: config.low_effort_minutes,
        }
    }

    /// Whether a single submission contributes to its day.
    fn qualifies(&self, submission: &ChoreSubmission) -> bool {
        match submission.status {
            ChoreStatus::Approved => true,
            ChoreStatus::Rejected => submission
                .effort_minutes
                .map_or(false, |m| m > self.low_effort_minutes),
            ChoreStatus::Assigned | ChoreStatus::PendingApproval => false,
        }
    }

    /// Compute the streak from a kid's full submission history.
    ///
    /// Walks backward from the most recent qualifying day; a difference of
    /// two or more days between neighboring qualifying days breaks the run.
    /// Only the most recent contiguous run is reported.
    pub fn calculate(
        &self,
        submissions: &[ChoreSubmission],
        today: NaiveDate,
    ) -> StreakSummary {
        let qualifying_days: BTreeSet<NaiveDate> = submissions
            .iter()
            .filter(|s| self.qualifies(s))
            .filter_map(|s| s.submitted_at.map(|t| t.date_naive()))
            .collect();

        let mut days = qualifying_days.iter().rev();
        let Some(&latest) = days.next() else {
            return StreakSummary::empty();
        };

        let mut streak = 1u32;
        let mut cursor = latest;
        for &day in days {
            if (cursor - day).num_days() >= 2 {
                break;
            }
            streak += 1;
            cursor = day;
        }

        let age = (today - latest).num_days();
        StreakSummary {
            current_streak: streak,
            streak_active: (0..=1).contains(&age),
            last_completion_date: Some(latest),
        }
    }

    /// Load a kid's history from the store and compute the streak.
    pub fn for_kid<S: ChoreStore>(
        &self,
        store: &S,
        family_id: &str,
        kid_id: &str,
        today: NaiveDate,
    ) -> Result<StreakSummary> {
        let submissions = store.submissions_for_kid(family_id, kid_id)?;
        Ok(self.calculate(&submissions, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chore::{TaskDraft, TaskType};
    use chrono::{NaiveTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn submission_on(
        day: NaiveDate,
        status: ChoreStatus,
        effort_minutes: Option<u32>,
    ) -> ChoreSubmission {
        let mut s = ChoreSubmission::from_draft(TaskDraft {
            schedule_id: Some("schedule-1".to_string()),
            family_id: "family-1".to_string(),
            pet_id: Some("pet-1".to_string()),
            task_name: "feed_dragon".to_string(),
            task_type: TaskType::Feeding,
            assigned_kid_id: "kid-1".to_string(),
            due_date: day,
            due_at: Utc::now(),
            points_value: 10,
        });
        s.status = status;
        s.effort_minutes = effort_minutes;
        s.submitted_at = Some(
            day.and_time(NaiveTime::from_hms_opt(16, 0, 0).unwrap())
                .and_utc(),
        );
        s
    }

    #[test]
    fn empty_history_has_no_streak() {
        let calc = StreakCalculator::new();
        let summary = calc.calculate(&[], date(2025, 6, 10));
        assert_eq!(summary.current_streak, 0);
        assert!(!summary.streak_active);
        assert!(summary.last_completion_date.is_none());
    }

    #[test]
    fn consecutive_approved_days_accumulate() {
        let calc = StreakCalculator::new();
        let subs: Vec<_> = (1..=4)
            .map(|d| submission_on(date(2025, 6, d), ChoreStatus::Approved, Some(5)))
            .collect();
        let summary = calc.calculate(&subs, date(2025, 6, 4));
        assert_eq!(summary.current_streak, 4);
        assert!(summary.streak_active);
        assert_eq!(summary.last_completion_date, Some(date(2025, 6, 4)));
    }

    #[test]
    fn gap_of_two_days_breaks_the_run() {
        let calc = StreakCalculator::new();
        let subs = vec![
            submission_on(date(2025, 6, 1), ChoreStatus::Approved, None),
            submission_on(date(2025, 6, 2), ChoreStatus::Approved, None),
            // 3rd and 4th missed.
            submission_on(date(2025, 6, 5), ChoreStatus::Approved, None),
            submission_on(date(2025, 6, 6), ChoreStatus::Approved, None),
        ];
        let summary = calc.calculate(&subs, date(2025, 6, 6));
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.last_completion_date, Some(date(2025, 6, 6)));
    }

    #[test]
    fn rejected_with_real_effort_qualifies() {
        let calc = StreakCalculator::new();
        let subs = vec![
            submission_on(date(2025, 6, 1), ChoreStatus::Approved, None),
            submission_on(date(2025, 6, 2), ChoreStatus::Rejected, Some(25)),
            submission_on(date(2025, 6, 3), ChoreStatus::Approved, None),
        ];
        let summary = calc.calculate(&subs, date(2025, 6, 3));
        assert_eq!(summary.current_streak, 3);
    }

    #[test]
    fn rejected_low_effort_does_not_qualify() {
        let calc = StreakCalculator::new();
        let subs = vec![
            submission_on(date(2025, 6, 1), ChoreStatus::Approved, None),
            // Exactly at the threshold is still low effort.
            submission_on(date(2025, 6, 2), ChoreStatus::Rejected, Some(10)),
            submission_on(date(2025, 6, 3), ChoreStatus::Approved, None),
        ];
        let summary = calc.calculate(&subs, date(2025, 6, 3));
        assert_eq!(summary.current_streak, 1);
    }

    #[test]
    fn pending_submissions_do_not_qualify() {
        let calc = StreakCalculator::new();
        let subs = vec![submission_on(
            date(2025, 6, 3),
            ChoreStatus::PendingApproval,
            Some(30),
        )];
        let summary = calc.calculate(&subs, date(2025, 6, 3));
        assert_eq!(summary.current_streak, 0);
    }

    #[test]
    fn streak_from_yesterday_is_active() {
        let calc = StreakCalculator::new();
        let subs = vec![submission_on(date(2025, 6, 9), ChoreStatus::Approved, None)];
        let summary = calc.calculate(&subs, date(2025, 6, 10));
        assert!(summary.streak_active);
    }

    #[test]
    fn stale_streak_is_reported_inactive() {
        let calc = StreakCalculator::new();
        let subs = vec![
            submission_on(date(2025, 6, 1), ChoreStatus::Approved, None),
            submission_on(date(2025, 6, 2), ChoreStatus::Approved, None),
        ];
        let summary = calc.calculate(&subs, date(2025, 6, 10));
        // The run itself is still reported; it just is not active.
        assert_eq!(summary.current_streak, 2);
        assert!(!summary.streak_active);
        assert_eq!(summary.last_completion_date, Some(date(2025, 6, 2)));
    }

    #[test]
    fn multiple_submissions_one_day_count_once() {
        let calc = StreakCalculator::new();
        let subs = vec![
            submission_on(date(2025, 6, 2), ChoreStatus::Approved, None),
            submission_on(date(2025, 6, 2), ChoreStatus::Approved, None),
            submission_on(date(2025, 6, 3), ChoreStatus::Approved, None),
        ];
        let summary = calc.calculate(&subs, date(2025, 6, 3));
        assert_eq!(summary.current_streak, 2);
    }
}
