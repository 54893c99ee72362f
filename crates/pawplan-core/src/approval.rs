//! Submission approval state machine and ledger coupling.
//!
//! All transitions funnel through here: kids submit, parents review, and
//! the points ledger moves exactly once per approved submission, through
//! the store's atomic adjustment. The pre-approval balance check is
//! advisory -- it exists to fail fast with a useful message, but the
//! conditional ledger write is the enforcement point and other approvals
//! may race past the check.
//!
//! Tasks in the auto-approve class skip review entirely: they are
//! identified by task NAME, not id, so the whitelist survives task
//! regeneration.

use tracing::{info, warn};

use crate::chore::{ChoreStatus, ChoreSubmission, Identity};
use crate::config::CoreConfig;
use crate::effort::EffortScorer;
use crate::error::{CoreError, Result};
use crate::store::ChoreStore;

/// Task names approved without parent review by default.
pub const DEFAULT_AUTO_APPROVE_TASKS: [&str; 1] = ["water_refill"];

/// Drives the submission lifecycle against a store.
pub struct ApprovalEngine<S> {
    store: S,
    scorer: EffortScorer,
    auto_approve_tasks: Vec<String>,
}

impl<S: ChoreStore> ApprovalEngine<S> {
    /// Create an engine with default scoring and auto-approve class.
    pub fn new(store: S) -> Self {
        Self {
            store,
            scorer: EffortScorer::new(),
            auto_approve_tasks: DEFAULT_AUTO_APPROVE_TASKS
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Create an engine from configuration.
    pub fn with_config(store: S, config: &CoreConfig) -> Self {
        Self {
            store,
            scorer: EffortScorer::from_config(&config.scoring),
            auto_approve_tasks: config.generation.auto_approve_tasks.clone(),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Kid submits a completed task.
    ///
    /// Effort points and retry flags are computed here, once, and stored
    /// immutably. Auto-approve-class tasks go straight to `Approved` with
    /// the ledger credited; everything else waits in `PendingApproval`.
    pub fn submit(
        &self,
        task_id: &str,
        identity: &Identity,
        notes: Option<String>,
        effort_minutes: Option<u32>,
    ) -> Result<ChoreSubmission> {
        let mut task = self.load_task(identity, task_id)?;
        if task.status != ChoreStatus::Assigned {
            return Err(CoreError::conflict(format!(
                "task is not open for submission (status {})",
                task.status
            )));
        }

        let now = chrono::Utc::now();
        let prior =
            self.store
                .submissions_for_chore(&identity.family_id, &task.assigned_kid_id, &task.task_name)?;
        let score = self.scorer.score(effort_minutes.unwrap_or(0), &prior, now);

        task.notes = notes;
        task.effort_minutes = effort_minutes;
        task.effort_points = score.effort_points;
        task.retry_count = score.retry_count;
        task.is_retry = score.is_retry;

        if self.auto_approve_tasks.iter().any(|n| n == &task.task_name) {
            // Credit before flipping status so a failed credit leaves the
            // task open and the whole submit retryable.
            self.store
                .adjust_points(&identity.family_id, &task.assigned_kid_id, task.points_value)?;
            self.set_status(&mut task, ChoreStatus::Approved)?;
            info!(task = %task.task_name, kid = %task.assigned_kid_id, "auto-approved");
        } else {
            self.set_status(&mut task, ChoreStatus::PendingApproval)?;
        }

        self.store.update_task(&task)?;
        Ok(task)
    }

    /// Parent approves a pending submission and the ledger is credited.
    ///
    /// If the kid's balance is below the task's points value, the
    /// submission is auto-rejected instead and the error carries an
    /// actionable message.
    pub fn approve(&self, task_id: &str, identity: &Identity) -> Result<ChoreSubmission> {
        let mut task = self.load_task(identity, task_id)?;
        if task.status != ChoreStatus::PendingApproval {
            return Err(CoreError::conflict(format!(
                "submission is not pending (status {})",
                task.status
            )));
        }

        let kid = self
            .store
            .kid(&identity.family_id, &task.assigned_kid_id)?
            .ok_or_else(|| CoreError::not_found("kid"))?;

        // Advisory only: a concurrent approval can still drain the balance
        // between this read and the ledger write below.
        if kid.points < task.points_value {
            return self.auto_reject_insufficient(task, identity);
        }

        match self
            .store
            .adjust_points(&identity.family_id, &task.assigned_kid_id, task.points_value)
        {
            Ok(_) => {}
            // The write-side guard fired after the advisory check passed.
            Err(CoreError::Conflict { .. }) => {
                return self.auto_reject_insufficient(task, identity);
            }
            Err(e) => return Err(e),
        }

        self.set_status(&mut task, ChoreStatus::Approved)?;
        task.reviewed_by = Some(identity.user_id.clone());
        self.store.update_task(&task)?;
        info!(task = %task.task_name, kid = %task.assigned_kid_id, "approved");
        Ok(task)
    }

    /// Parent rejects a pending submission. No ledger effect.
    pub fn reject(
        &self,
        task_id: &str,
        identity: &Identity,
        reason: Option<String>,
    ) -> Result<ChoreSubmission> {
        let mut task = self.load_task(identity, task_id)?;
        if task.status != ChoreStatus::PendingApproval {
            return Err(CoreError::conflict(format!(
                "submission is not pending (status {})",
                task.status
            )));
        }

        self.set_status(&mut task, ChoreStatus::Rejected)?;
        task.reviewed_by = Some(identity.user_id.clone());
        task.review_note = reason;
        self.store.update_task(&task)?;
        info!(task = %task.task_name, kid = %task.assigned_kid_id, "rejected");
        Ok(task)
    }

    /// Family-scoped task lookup. Out-of-family records are `NotFound`.
    fn load_task(&self, identity: &Identity, task_id: &str) -> Result<ChoreSubmission> {
        self.store
            .task(&identity.family_id, task_id)?
            .ok_or_else(|| CoreError::not_found("task"))
    }

    fn set_status(&self, task: &mut ChoreSubmission, status: ChoreStatus) -> Result<()> {
        task.transition_to(status)
            .map_err(|e| CoreError::conflict(e.to_string()))
    }

    fn auto_reject_insufficient(
        &self,
        mut task: ChoreSubmission,
        identity: &Identity,
    ) -> Result<ChoreSubmission> {
        warn!(
            task = %task.task_name,
            kid = %task.assigned_kid_id,
            "insufficient points at approval, auto-rejecting"
        );
        self.set_status(&mut task, ChoreStatus::Rejected)?;
        task.reviewed_by = Some(identity.user_id.clone());
        task.review_note = Some("insufficient points".to_string());
        self.store.update_task(&task)?;
        Err(CoreError::conflict(
            "insufficient points, request auto-rejected",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chore::{Kid, TaskDraft, TaskType};
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, Utc};

    fn seed_task(store: &MemoryStore, name: &str, kid_id: &str, points: i64) -> String {
        let task = ChoreSubmission::from_draft(TaskDraft {
            schedule_id: Some("schedule-1".to_string()),
            family_id: "family-1".to_string(),
            pet_id: Some("pet-1".to_string()),
            task_name: name.to_string(),
            task_type: TaskType::Feeding,
            assigned_kid_id: kid_id.to_string(),
            due_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            due_at: Utc::now(),
            points_value: points,
        });
        store.insert_task(&task).unwrap();
        task.id
    }

    fn seed_kid(store: &MemoryStore, points: i64) -> Kid {
        let mut kid = Kid::new("family-1", "aiden");
        kid.points = points;
        store.put_kid(&kid).unwrap();
        kid
    }

    #[test]
    fn submit_moves_to_pending_with_effort_score() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 0);
        let task_id = seed_task(&store, "feed_dragon", &kid.id, 10);
        let engine = ApprovalEngine::new(store);

        let identity = Identity::kid(&kid.id, "family-1");
        let task = engine
            .submit(&task_id, &identity, Some("done!".to_string()), Some(20))
            .unwrap();
        assert_eq!(task.status, ChoreStatus::PendingApproval);
        assert_eq!(task.effort_points, 10);
        assert!(!task.is_retry);
        assert!(task.submitted_at.is_some());
    }

    #[test]
    fn double_submit_conflicts() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 0);
        let task_id = seed_task(&store, "feed_dragon", &kid.id, 10);
        let engine = ApprovalEngine::new(store);

        let identity = Identity::kid(&kid.id, "family-1");
        engine.submit(&task_id, &identity, None, None).unwrap();
        let err = engine.submit(&task_id, &identity, None, None).unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
    }

    #[test]
    fn cross_family_submission_is_not_found() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 0);
        let task_id = seed_task(&store, "feed_dragon", &kid.id, 10);
        let engine = ApprovalEngine::new(store);

        let outsider = Identity::kid("kid-elsewhere", "family-2");
        let err = engine.submit(&task_id, &outsider, None, None).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn approve_credits_ledger_once() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 50);
        let task_id = seed_task(&store, "feed_dragon", &kid.id, 10);
        let engine = ApprovalEngine::new(store);

        engine
            .submit(&task_id, &Identity::kid(&kid.id, "family-1"), None, None)
            .unwrap();
        let parent = Identity::parent("parent-1", "family-1");
        let task = engine.approve(&task_id, &parent).unwrap();
        assert_eq!(task.status, ChoreStatus::Approved);
        assert_eq!(task.reviewed_by.as_deref(), Some("parent-1"));

        let stored = engine.store().kid("family-1", &kid.id).unwrap().unwrap();
        assert_eq!(stored.points, 60);

        // Terminal: a second approval conflicts and the balance holds.
        let err = engine.approve(&task_id, &parent).unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
        let stored = engine.store().kid("family-1", &kid.id).unwrap().unwrap();
        assert_eq!(stored.points, 60);
    }

    #[test]
    fn approve_before_submit_conflicts() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 50);
        let task_id = seed_task(&store, "feed_dragon", &kid.id, 10);
        let engine = ApprovalEngine::new(store);

        let err = engine
            .approve(&task_id, &Identity::parent("parent-1", "family-1"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
    }

    #[test]
    fn insufficient_balance_auto_rejects() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 50);
        let task_id = seed_task(&store, "feed_dragon", &kid.id, 60);
        let engine = ApprovalEngine::new(store);

        engine
            .submit(&task_id, &Identity::kid(&kid.id, "family-1"), None, None)
            .unwrap();
        let err = engine
            .approve(&task_id, &Identity::parent("parent-1", "family-1"))
            .unwrap_err();
        assert!(err.to_string().contains("insufficient points"));

        let task = engine.store().task("family-1", &task_id).unwrap().unwrap();
        assert_eq!(task.status, ChoreStatus::Rejected);
        let stored = engine.store().kid("family-1", &kid.id).unwrap().unwrap();
        assert_eq!(stored.points, 50);
    }

    #[test]
    fn reject_has_no_ledger_effect() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 50);
        let task_id = seed_task(&store, "feed_dragon", &kid.id, 10);
        let engine = ApprovalEngine::new(store);

        engine
            .submit(&task_id, &Identity::kid(&kid.id, "family-1"), None, None)
            .unwrap();
        let task = engine
            .reject(
                &task_id,
                &Identity::parent("parent-1", "family-1"),
                Some("bowl still dirty".to_string()),
            )
            .unwrap();
        assert_eq!(task.status, ChoreStatus::Rejected);
        assert_eq!(task.review_note.as_deref(), Some("bowl still dirty"));

        let stored = engine.store().kid("family-1", &kid.id).unwrap().unwrap();
        assert_eq!(stored.points, 50);
    }

    #[test]
    fn auto_approve_class_skips_review_and_credits() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 0);
        let task_id = seed_task(&store, "water_refill", &kid.id, 5);
        let engine = ApprovalEngine::new(store);

        let task = engine
            .submit(&task_id, &Identity::kid(&kid.id, "family-1"), None, Some(5))
            .unwrap();
        assert_eq!(task.status, ChoreStatus::Approved);
        assert!(task.reviewed_at.is_some());
        assert!(task.reviewed_by.is_none());

        let stored = engine.store().kid("family-1", &kid.id).unwrap().unwrap();
        assert_eq!(stored.points, 5);
    }

    #[test]
    fn resubmission_within_a_day_is_flagged_as_retry() {
        let store = MemoryStore::new();
        let kid = seed_kid(&store, 100);
        let first_id = seed_task(&store, "feed_dragon", &kid.id, 10);
        let engine = ApprovalEngine::new(store);

        let kid_identity = Identity::kid(&kid.id, "family-1");
        let parent = Identity::parent("parent-1", "family-1");
        engine.submit(&first_id, &kid_identity, None, Some(5)).unwrap();
        engine
            .reject(&first_id, &parent, Some("try again".to_string()))
            .unwrap();

        // A fresh task for the same chore the next morning.
        let second = ChoreSubmission::from_draft(TaskDraft {
            schedule_id: Some("schedule-1".to_string()),
            family_id: "family-1".to_string(),
            pet_id: Some("pet-1".to_string()),
            task_name: "feed_dragon".to_string(),
            task_type: TaskType::Feeding,
            assigned_kid_id: kid.id.clone(),
            due_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            due_at: Utc::now(),
            points_value: 10,
        });
        engine.store().insert_task(&second).unwrap();

        let resubmitted = engine
            .submit(&second.id, &kid_identity, None, Some(15))
            .unwrap();
        assert!(resubmitted.is_retry);
        assert_eq!(resubmitted.retry_count, 1);
    }
}
