//! Store-backed task generation.
//!
//! One runner invocation per external trigger (cron or CLI); there is no
//! in-process scheduler thread. Each draft is committed through the
//! store's conditional insert so retried runs create no duplicates, and a
//! failure on one date never blocks the rest of the batch -- the report
//! carries per-item counts instead. The schedule's rotation index is
//! committed once per batch, by compare-and-swap, advanced by the number
//! of tasks that actually landed.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

use crate::chore::ChoreSubmission;
use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use crate::rotation::RotationEngine;
use crate::store::{ChoreStore, TaskSeries};
use crate::walk_pattern::{WalkPattern, WALK_TASK_NAME};

/// Default generation horizon in days.
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

/// Per-run outcome counts; batch jobs never abort on one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Tasks newly persisted.
    pub created: u32,
    /// Dates that already had a task (idempotent re-run).
    pub skipped: u32,
    /// Dates whose insert failed; details in `errors`.
    pub failed: u32,
    pub errors: Vec<String>,
}

impl GenerationReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: GenerationReport) {
        self.created += other.created;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} skipped, {} failed",
            self.created, self.skipped, self.failed
        )
    }
}

/// Runs the generation engines against a store.
pub struct GenerationRunner<S> {
    store: S,
    walk: WalkPattern,
    days_ahead: u32,
}

impl<S: ChoreStore> GenerationRunner<S> {
    /// Create a runner with the default horizon and walk pattern.
    pub fn new(store: S) -> Self {
        Self {
            store,
            walk: WalkPattern::new(),
            days_ahead: DEFAULT_DAYS_AHEAD,
        }
    }

    /// Create a runner from configuration.
    pub fn with_config(store: S, config: &CoreConfig) -> Self {
        Self {
            store,
            walk: WalkPattern::from_config(&config.walk),
            days_ahead: config.generation.days_ahead,
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate tasks for one schedule over the configured horizon.
    pub fn run_schedule(
        &self,
        family_id: &str,
        schedule_id: &str,
        today: NaiveDate,
    ) -> Result<GenerationReport> {
        let schedule = self
            .store
            .schedule(family_id, schedule_id)?
            .ok_or_else(|| CoreError::not_found("schedule"))?;
        if !schedule.active {
            warn!(schedule = %schedule.task_name, "schedule inactive, nothing to generate");
            return Ok(GenerationReport::default());
        }

        let pet = self
            .store
            .pet(family_id, &schedule.pet_id)?
            .ok_or_else(|| CoreError::not_found("pet"))?;

        let mut kid_names = HashMap::new();
        for kid_id in &schedule.assigned_kid_ids {
            if let Some(kid) = self.store.kid(family_id, kid_id)? {
                kid_names.insert(kid.id, kid.username);
            }
        }

        let existing = self
            .store
            .existing_due_dates(family_id, &TaskSeries::Schedule(schedule_id))?;
        let batch = RotationEngine::generate_tasks(
            &schedule,
            &pet,
            &kid_names,
            self.days_ahead,
            &existing,
            today,
        )?;

        let mut report = GenerationReport::default();
        for draft in batch.drafts.iter().cloned() {
            let task = ChoreSubmission::from_draft(draft);
            match self.store.insert_task(&task) {
                Ok(true) => report.created += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    report
                        .errors
                        .push(format!("{} on {}: {e}", task.task_name, task.due_date));
                }
            }
        }

        if report.created > 0 {
            let new_index = batch.advance(report.created as usize);
            if let Err(e) = self.store.commit_rotation_index(
                family_id,
                schedule_id,
                batch.start_index(),
                new_index,
            ) {
                // A lost CAS means a concurrent run already advanced the
                // index; our inserts were idempotent, so just report it.
                warn!(schedule = %schedule.task_name, error = %e, "rotation index commit lost");
                report.errors.push(format!("rotation index: {e}"));
            }
        }

        info!(schedule = %schedule.task_name, %report, "generation run finished");
        Ok(report)
    }

    /// Generate tasks for every active schedule in the family.
    ///
    /// One schedule's fatal error (for example an empty rotation) is
    /// recorded and the run continues with the next schedule.
    pub fn run_all_schedules(
        &self,
        family_id: &str,
        today: NaiveDate,
    ) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        for schedule in self.store.schedules(family_id)? {
            match self.run_schedule(family_id, &schedule.id, today) {
                Ok(r) => report.merge(r),
                Err(e) => {
                    report.failed += 1;
                    report.errors.push(format!("{}: {e}", schedule.task_name));
                }
            }
        }
        Ok(report)
    }

    /// Generate evening-walk tasks over the configured horizon.
    pub fn run_walk_pattern(
        &self,
        family_id: &str,
        today: NaiveDate,
    ) -> Result<GenerationReport> {
        let existing = self
            .store
            .existing_due_dates(family_id, &TaskSeries::TaskName(WALK_TASK_NAME))?;
        let drafts = self
            .walk
            .generate_tasks(family_id, self.days_ahead, &existing, today)?;

        let mut report = GenerationReport::default();
        for draft in drafts {
            let task = ChoreSubmission::from_draft(draft);
            match self.store.insert_task(&task) {
                Ok(true) => report.created += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    report
                        .errors
                        .push(format!("{} on {}: {e}", task.task_name, task.due_date));
                }
            }
        }

        info!(%report, "walk generation finished");
        Ok(report)
    }
}
