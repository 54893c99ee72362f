//! Chore types: schedules, task instances, kids, and identities.
//!
//! Status follows strict transitions enforced by the approval engine:
//!
//! ```text
//!   ASSIGNED ──────> PENDING_APPROVAL ──────> APPROVED
//!      |                     |
//!      |                     +──────────────> REJECTED
//!      |
//!      +── (auto-approve class) ───────────> APPROVED
//! ```
//!
//! `Approved` and `Rejected` are terminal: there is no un-approve or
//! un-reject, and a reviewed submission is immutable thereafter.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a chore task instance.
///
/// Wire form is UPPERCASE; unknown values are rejected at the
/// deserialization boundary rather than mapped to a default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoreStatus {
    /// Task generated and waiting for the kid (initial state).
    Assigned,
    /// Kid submitted, waiting for a parent's review.
    PendingApproval,
    /// Parent approved (terminal). Points have been credited.
    Approved,
    /// Parent rejected, or approval auto-rejected (terminal).
    Rejected,
}

impl ChoreStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &ChoreStatus) -> bool {
        match self {
            // Direct Assigned -> Approved covers the auto-approve class.
            ChoreStatus::Assigned => matches!(
                to,
                ChoreStatus::PendingApproval | ChoreStatus::Approved
            ),
            ChoreStatus::PendingApproval => {
                matches!(to, ChoreStatus::Approved | ChoreStatus::Rejected)
            }
            ChoreStatus::Approved | ChoreStatus::Rejected => false,
        }
    }

    /// Whether the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChoreStatus::Approved | ChoreStatus::Rejected)
    }
}

impl Default for ChoreStatus {
    fn default() -> Self {
        ChoreStatus::Assigned
    }
}

impl fmt::Display for ChoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChoreStatus::Assigned => "ASSIGNED",
            ChoreStatus::PendingApproval => "PENDING_APPROVAL",
            ChoreStatus::Approved => "APPROVED",
            ChoreStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Error for an invalid status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoreTransitionError {
    pub from: ChoreStatus,
    pub to: ChoreStatus,
}

impl fmt::Display for ChoreTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid transition from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for ChoreTransitionError {}

/// How often a care schedule fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    /// One task per calendar day.
    Daily,
    /// One task per week, on `day_of_week`.
    Weekly,
}

/// Category of care work, used for instruction lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Feeding,
    Habitat,
    Health,
    Exercise,
    /// Anything the guide has no dedicated entry for.
    #[serde(other)]
    Other,
}

impl Default for TaskType {
    fn default() -> Self {
        TaskType::Other
    }
}

/// A recurring care-obligation definition.
///
/// `rotation_index` points into `assigned_kid_ids` at the kid who takes the
/// next generated task. The invariant `rotation_index < assigned_kid_ids.len()`
/// holds whenever the kid list is non-empty; the index only moves when a
/// generation batch commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareSchedule {
    pub id: String,
    pub family_id: String,
    pub pet_id: String,
    pub task_name: String,
    #[serde(default)]
    pub task_type: TaskType,
    pub frequency: Frequency,
    /// 0 = Sunday ... 6 = Saturday. Required for weekly schedules; a weekly
    /// schedule without one never fires.
    pub day_of_week: Option<u8>,
    /// "HH:MM" due time; malformed or absent falls back to 23:59.
    pub due_time: Option<String>,
    pub points_value: i64,
    /// Ordered rotation. Empty is rejected at generation time.
    pub assigned_kid_ids: Vec<String>,
    #[serde(default)]
    pub rotation_index: usize,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl CareSchedule {
    /// Create a daily schedule with defaults.
    pub fn new(
        family_id: impl Into<String>,
        pet_id: impl Into<String>,
        task_name: impl Into<String>,
        points_value: i64,
        assigned_kid_ids: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        CareSchedule {
            id: format!("schedule-{}-{}", now.timestamp(), uuid::Uuid::new_v4()),
            family_id: family_id.into(),
            pet_id: pet_id.into(),
            task_name: task_name.into(),
            task_type: TaskType::Other,
            frequency: Frequency::Daily,
            day_of_week: None,
            due_time: None,
            points_value,
            assigned_kid_ids,
            rotation_index: 0,
            active: true,
            created_at: now,
        }
    }
}

/// A task-create record emitted by a generation engine.
///
/// Drafts are pure values: nothing is persisted until the caller commits
/// them, and the schedule's rotation index moves only by the count that
/// actually committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDraft {
    /// Present for rotation-generated tasks; `None` for the fixed walk
    /// pattern, which is keyed by task name instead.
    pub schedule_id: Option<String>,
    pub family_id: String,
    pub pet_id: Option<String>,
    pub task_name: String,
    pub task_type: TaskType,
    pub assigned_kid_id: String,
    pub due_date: NaiveDate,
    pub due_at: DateTime<Utc>,
    pub points_value: i64,
}

/// One concrete due chore instance, tracked through the approval lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoreSubmission {
    /// Unique identifier
    pub id: String,
    pub schedule_id: Option<String>,
    pub family_id: String,
    pub pet_id: Option<String>,
    pub task_name: String,
    #[serde(default)]
    pub task_type: TaskType,
    pub assigned_kid_id: String,
    /// Calendar date the task is due; part of the uniqueness key.
    pub due_date: NaiveDate,
    /// Full due timestamp (due date + schedule due time).
    pub due_at: DateTime<Utc>,
    pub status: ChoreStatus,
    pub points_value: i64,
    /// Kid-supplied notes from submission, if any.
    pub notes: Option<String>,
    /// Parent-supplied reason on rejection.
    pub review_note: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Reviewing parent; `None` for auto-approved submissions.
    pub reviewed_by: Option<String>,
    /// Self-reported minutes of effort, captured once at submission.
    pub effort_minutes: Option<u32>,
    /// Bounded bonus points from self-reported effort; stored immutably.
    #[serde(default)]
    pub effort_points: u32,
    /// Prior submissions for the same chore inside the retry window.
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default)]
    pub is_retry: bool,
    pub created_at: DateTime<Utc>,
}

impl ChoreSubmission {
    /// Materialize a draft into a persistable task instance.
    pub fn from_draft(draft: TaskDraft) -> Self {
        let now = Utc::now();
        ChoreSubmission {
            id: format!("task-{}-{}", now.timestamp(), uuid::Uuid::new_v4()),
            schedule_id: draft.schedule_id,
            family_id: draft.family_id,
            pet_id: draft.pet_id,
            task_name: draft.task_name,
            task_type: draft.task_type,
            assigned_kid_id: draft.assigned_kid_id,
            due_date: draft.due_date,
            due_at: draft.due_at,
            status: ChoreStatus::Assigned,
            points_value: draft.points_value,
            notes: None,
            review_note: None,
            submitted_at: None,
            reviewed_at: None,
            reviewed_by: None,
            effort_minutes: None,
            effort_points: 0,
            retry_count: 0,
            is_retry: false,
            created_at: now,
        }
    }

    /// Transition to a new status, updating lifecycle timestamps.
    ///
    /// Returns an error if the transition is invalid.
    pub fn transition_to(&mut self, new_status: ChoreStatus) -> Result<(), ChoreTransitionError> {
        if !self.status.can_transition_to(&new_status) {
            return Err(ChoreTransitionError {
                from: self.status,
                to: new_status,
            });
        }

        let now = Utc::now();
        match new_status {
            ChoreStatus::PendingApproval => {
                self.submitted_at = Some(now);
            }
            ChoreStatus::Approved | ChoreStatus::Rejected => {
                // Auto-approval goes straight from Assigned; it still counts
                // as a submission for streak purposes.
                if self.submitted_at.is_none() {
                    self.submitted_at = Some(now);
                }
                self.reviewed_at = Some(now);
            }
            ChoreStatus::Assigned => {}
        }

        self.status = new_status;
        Ok(())
    }
}

/// A kid in the family, with the points balance the ledger maintains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kid {
    pub id: String,
    pub family_id: String,
    pub username: String,
    /// Reward balance. Changes only through the store's atomic adjustment,
    /// exactly once per approved submission.
    pub points: i64,
    /// Optimistic-concurrency version; bumped on every balance write.
    #[serde(default)]
    pub version: u64,
}

impl Kid {
    pub fn new(
        family_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Kid {
            id: format!("kid-{}", uuid::Uuid::new_v4()),
            family_id: family_id.into(),
            username: username.into(),
            points: 0,
            version: 0,
        }
    }
}

/// Caller role as asserted by the identity layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Kid,
}

/// Verified caller identity, supplied per call by the identity layer.
///
/// The core trusts these fields and never re-verifies them; it only uses
/// `family_id` to scope lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
    pub family_id: String,
}

impl Identity {
    pub fn parent(user_id: impl Into<String>, family_id: impl Into<String>) -> Self {
        Identity {
            user_id: user_id.into(),
            role: Role::Parent,
            family_id: family_id.into(),
        }
    }

    pub fn kid(user_id: impl Into<String>, family_id: impl Into<String>) -> Self {
        Identity {
            user_id: user_id.into(),
            role: Role::Kid,
            family_id: family_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigned_accepts_submission_and_auto_approval() {
        assert!(ChoreStatus::Assigned.can_transition_to(&ChoreStatus::PendingApproval));
        assert!(ChoreStatus::Assigned.can_transition_to(&ChoreStatus::Approved));
        assert!(!ChoreStatus::Assigned.can_transition_to(&ChoreStatus::Rejected));
    }

    #[test]
    fn terminal_states_are_one_way() {
        for terminal in [ChoreStatus::Approved, ChoreStatus::Rejected] {
            assert!(terminal.is_terminal());
            for target in [
                ChoreStatus::Assigned,
                ChoreStatus::PendingApproval,
                ChoreStatus::Approved,
                ChoreStatus::Rejected,
            ] {
                assert!(!terminal.can_transition_to(&target));
            }
        }
    }

    #[test]
    fn transition_stamps_timestamps() {
        let draft = TaskDraft {
            schedule_id: Some("schedule-1".to_string()),
            family_id: "family-1".to_string(),
            pet_id: Some("pet-1".to_string()),
            task_name: "feed_dragon".to_string(),
            task_type: TaskType::Feeding,
            assigned_kid_id: "kid-1".to_string(),
            due_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            due_at: Utc::now(),
            points_value: 10,
        };
        let mut task = ChoreSubmission::from_draft(draft);
        assert_eq!(task.status, ChoreStatus::Assigned);

        task.transition_to(ChoreStatus::PendingApproval).unwrap();
        assert!(task.submitted_at.is_some());
        assert!(task.reviewed_at.is_none());

        task.transition_to(ChoreStatus::Approved).unwrap();
        assert!(task.reviewed_at.is_some());

        let err = task.transition_to(ChoreStatus::Rejected).unwrap_err();
        assert_eq!(err.from, ChoreStatus::Approved);
    }

    #[test]
    fn auto_approval_backfills_submitted_at() {
        let mut task = ChoreSubmission::from_draft(TaskDraft {
            schedule_id: None,
            family_id: "family-1".to_string(),
            pet_id: None,
            task_name: "water_refill".to_string(),
            task_type: TaskType::Habitat,
            assigned_kid_id: "kid-1".to_string(),
            due_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            due_at: Utc::now(),
            points_value: 5,
        });
        task.transition_to(ChoreStatus::Approved).unwrap();
        assert!(task.submitted_at.is_some());
        assert!(task.reviewed_at.is_some());
    }

    #[test]
    fn status_wire_form_is_screaming_snake() {
        let json = serde_json::to_string(&ChoreStatus::PendingApproval).unwrap();
        assert_eq!(json, "\"PENDING_APPROVAL\"");
        let back: ChoreStatus = serde_json::from_str("\"APPROVED\"").unwrap();
        assert_eq!(back, ChoreStatus::Approved);
        // Unknown statuses are rejected, not defaulted.
        assert!(serde_json::from_str::<ChoreStatus>("\"ARCHIVED\"").is_err());
    }
}
