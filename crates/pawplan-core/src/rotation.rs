//! Per-schedule kid-rotation task generation.
//!
//! The engine is pure: it sees a schedule, a pet, a horizon, and the set of
//! due dates that already exist, and emits task-create drafts. Nothing is
//! persisted here. The schedule's `rotation_index` advances exactly once,
//! by the caller, by the number of drafts that actually committed --
//! `RotationBatch::advance` does that arithmetic so a partially persisted
//! batch leaves the rotation aligned with what landed.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::chore::{CareSchedule, Frequency, TaskDraft};
use crate::error::{CoreError, Result};
use crate::pet::Pet;

/// Fallback due time when the schedule's "HH:MM" field is absent or
/// malformed: end of the due day.
pub fn default_due_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Parse an "HH:MM" due-time field.
///
/// Malformed or absent input falls back to 23:59 -- a bad due time must
/// never abort generation.
pub fn parse_due_time(raw: Option<&str>) -> NaiveTime {
    let Some(raw) = raw else {
        return default_due_time();
    };
    let mut parts = raw.split(':');
    let time = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), None) => match (h.parse::<u32>(), m.parse::<u32>()) {
            (Ok(h), Ok(m)) => NaiveTime::from_hms_opt(h, m, 0),
            _ => None,
        },
        _ => None,
    };
    match time {
        Some(t) => t,
        None => {
            warn!(due_time = raw, "malformed due time, falling back to 23:59");
            default_due_time()
        }
    }
}

/// The outcome of one generation pass over a schedule.
#[derive(Debug, Clone)]
pub struct RotationBatch {
    /// Drafts in due-date order, assignees already resolved.
    pub drafts: Vec<TaskDraft>,
    start_index: usize,
    kid_count: usize,
}

impl RotationBatch {
    /// Rotation index the schedule should carry after `committed` of the
    /// batch's drafts were persisted.
    pub fn advance(&self, committed: usize) -> usize {
        (self.start_index + committed) % self.kid_count
    }

    /// The index the schedule held when the batch was computed.
    pub fn start_index(&self) -> usize {
        self.start_index
    }
}

/// Generic rotation-based task generator.
pub struct RotationEngine;

impl RotationEngine {
    /// Generate task drafts for the next `days_ahead` days.
    ///
    /// For each day offset, the schedule fires when it is daily, or weekly
    /// with a matching `day_of_week`; dates already present in
    /// `existing_dates` are skipped before any assignee is consumed, so
    /// re-running generation is idempotent and never shifts the rotation.
    ///
    /// `kid_names` maps kid ids to display names and is used for trace
    /// output only.
    pub fn generate_tasks(
        schedule: &CareSchedule,
        pet: &Pet,
        kid_names: &HashMap<String, String>,
        days_ahead: u32,
        existing_dates: &HashSet<NaiveDate>,
        today: NaiveDate,
    ) -> Result<RotationBatch> {
        if schedule.assigned_kid_ids.is_empty() {
            return Err(CoreError::invalid_input(format!(
                "schedule '{}' has no assigned kids",
                schedule.task_name
            )));
        }

        let kid_count = schedule.assigned_kid_ids.len();
        let start_index = schedule.rotation_index % kid_count;
        let due_time = parse_due_time(schedule.due_time.as_deref());

        let mut drafts = Vec::new();
        let mut fired = 0usize;
        for offset in 0..days_ahead {
            let date = today + Duration::days(offset as i64);
            if !Self::fires_on(schedule, date) {
                continue;
            }
            if existing_dates.contains(&date) {
                continue;
            }

            let assignee = &schedule.assigned_kid_ids[(start_index + fired) % kid_count];
            debug!(
                task = %schedule.task_name,
                pet = %pet.name,
                date = %date,
                kid = kid_names
                    .get(assignee)
                    .map(String::as_str)
                    .unwrap_or(assignee),
                "assigning task"
            );
            drafts.push(TaskDraft {
                schedule_id: Some(schedule.id.clone()),
                family_id: schedule.family_id.clone(),
                pet_id: Some(pet.id.clone()),
                task_name: schedule.task_name.clone(),
                task_type: schedule.task_type,
                assigned_kid_id: assignee.clone(),
                due_date: date,
                due_at: date.and_time(due_time).and_utc(),
                points_value: schedule.points_value,
            });
            fired += 1;
        }

        Ok(RotationBatch {
            drafts,
            start_index,
            kid_count,
        })
    }

    /// Single-step assignment outside batch generation.
    ///
    /// Returns the kid currently at the rotation pointer plus the index the
    /// schedule should persist once the assignment is committed.
    pub fn next_assigned_kid(schedule: &CareSchedule) -> Result<(String, usize)> {
        if schedule.assigned_kid_ids.is_empty() {
            return Err(CoreError::invalid_input(format!(
                "schedule '{}' has no assigned kids",
                schedule.task_name
            )));
        }
        let kid_count = schedule.assigned_kid_ids.len();
        let index = schedule.rotation_index % kid_count;
        let kid = schedule.assigned_kid_ids[index].clone();
        Ok((kid, (index + 1) % kid_count))
    }

    /// Whether the schedule produces a task on `date`.
    fn fires_on(schedule: &CareSchedule, date: NaiveDate) -> bool {
        match schedule.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => match schedule.day_of_week {
                Some(dow) if dow <= 6 => {
                    date.weekday().num_days_from_sunday() as u8 == dow
                }
                Some(dow) => {
                    warn!(day_of_week = dow, "weekly schedule has out-of-range day");
                    false
                }
                // A weekly schedule without a day never fires.
                None => false,
            },
        }
    }
}
