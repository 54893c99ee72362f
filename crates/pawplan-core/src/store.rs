//! Storage contract and the in-memory reference implementation.
//!
//! The production backend is an external collaborator; the core only
//! depends on the `ChoreStore` trait. Two operations carry the whole
//! concurrency story:
//!
//! - `insert_task` is a conditional write on the task's due-date key, so
//!   re-running a partially failed generation batch creates no duplicates.
//! - `adjust_points` is an atomic conditional increment that refuses to
//!   drive a balance negative. Read-then-write ledger updates are not an
//!   acceptable implementation of this trait.
//!
//! `MemoryStore` backs tests and the CLI, and round-trips through a serde
//! snapshot so CLI state survives between runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::chore::{CareSchedule, ChoreSubmission, Kid};
use crate::error::{CoreError, Result, StoreError};
use crate::pet::Pet;

/// Identity of a recurring task series for deduplication queries.
///
/// Rotation tasks are unique per (schedule, due date); fixed-pattern tasks
/// have no schedule and are unique per (task name, due date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSeries<'a> {
    Schedule(&'a str),
    TaskName(&'a str),
}

impl TaskSeries<'_> {
    /// The series a persisted task belongs to.
    pub fn of(task: &ChoreSubmission) -> TaskSeries<'_> {
        match &task.schedule_id {
            Some(id) => TaskSeries::Schedule(id),
            None => TaskSeries::TaskName(&task.task_name),
        }
    }

    fn key(&self, family_id: &str, due_date: NaiveDate) -> String {
        match self {
            TaskSeries::Schedule(id) => format!("{family_id}/schedule:{id}/{due_date}"),
            TaskSeries::TaskName(name) => format!("{family_id}/name:{name}/{due_date}"),
        }
    }
}

/// The persistence seam consumed by the engines.
///
/// All read methods are family-scoped: a record owned by another family is
/// reported as absent, never as a permission failure.
pub trait ChoreStore: Send + Sync {
    fn kid(&self, family_id: &str, kid_id: &str) -> Result<Option<Kid>>;
    fn put_kid(&self, kid: &Kid) -> Result<()>;

    fn pet(&self, family_id: &str, pet_id: &str) -> Result<Option<Pet>>;
    fn put_pet(&self, pet: &Pet) -> Result<()>;

    fn schedule(&self, family_id: &str, schedule_id: &str) -> Result<Option<CareSchedule>>;
    fn put_schedule(&self, schedule: &CareSchedule) -> Result<()>;
    /// List a family's schedules, active ones first-class.
    fn schedules(&self, family_id: &str) -> Result<Vec<CareSchedule>>;

    /// Compare-and-swap the rotation index. Fails with `Conflict` when the
    /// stored index no longer matches `expected` (a concurrent generation
    /// run won the race).
    fn commit_rotation_index(
        &self,
        family_id: &str,
        schedule_id: &str,
        expected: usize,
        new: usize,
    ) -> Result<()>;

    fn task(&self, family_id: &str, task_id: &str) -> Result<Option<ChoreSubmission>>;

    /// Conditional insert keyed by the task's series and due date.
    ///
    /// Returns `false` without writing when a task already exists at that
    /// key; generation treats that as an idempotent skip, not an error.
    fn insert_task(&self, task: &ChoreSubmission) -> Result<bool>;

    /// Replace a task record wholesale. The approval engine is the only
    /// writer after creation.
    fn update_task(&self, task: &ChoreSubmission) -> Result<()>;

    /// Due dates that already have a task in the given series.
    fn existing_due_dates(
        &self,
        family_id: &str,
        series: &TaskSeries<'_>,
    ) -> Result<HashSet<NaiveDate>>;

    /// A kid's submissions across all chores, chronological.
    fn submissions_for_kid(&self, family_id: &str, kid_id: &str)
        -> Result<Vec<ChoreSubmission>>;

    /// A kid's submissions for one chore, chronological.
    fn submissions_for_chore(
        &self,
        family_id: &str,
        kid_id: &str,
        task_name: &str,
    ) -> Result<Vec<ChoreSubmission>>;

    /// Atomically add `delta` to a kid's balance and return the new value.
    ///
    /// Fails with `Conflict` -- and leaves the balance untouched -- when
    /// the result would be negative.
    fn adjust_points(&self, family_id: &str, kid_id: &str, delta: i64) -> Result<i64>;
}

#[derive(Debug, Default)]
struct State {
    kids: HashMap<String, Kid>,
    pets: HashMap<String, Pet>,
    schedules: HashMap<String, CareSchedule>,
    tasks: HashMap<String, ChoreSubmission>,
    /// Unique index over (family, series, due date).
    due_index: HashSet<String>,
}

/// Serializable snapshot of the whole store.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub kids: Vec<Kid>,
    #[serde(default)]
    pub pets: Vec<Pet>,
    #[serde(default)]
    pub schedules: Vec<CareSchedule>,
    #[serde(default)]
    pub tasks: Vec<ChoreSubmission>,
}

/// In-memory store used by tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot, recomputing the due-date index.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut state = State::default();
        for kid in snapshot.kids {
            state.kids.insert(kid.id.clone(), kid);
        }
        for pet in snapshot.pets {
            state.pets.insert(pet.id.clone(), pet);
        }
        for schedule in snapshot.schedules {
            state.schedules.insert(schedule.id.clone(), schedule);
        }
        for task in snapshot.tasks {
            let key = TaskSeries::of(&task).key(&task.family_id, task.due_date);
            state.due_index.insert(key);
            state.tasks.insert(task.id.clone(), task);
        }
        Self {
            inner: RwLock::new(state),
        }
    }

    /// Snapshot the current contents.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        let state = self.read()?;
        Ok(StoreSnapshot {
            kids: state.kids.values().cloned().collect(),
            pets: state.pets.values().cloned().collect(),
            schedules: state.schedules.values().cloned().collect(),
            tasks: state.tasks.values().cloned().collect(),
        })
    }

    /// Load a snapshot file; a missing file yields an empty store.
    pub fn load_json(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path).map_err(StoreError::from)?;
        let snapshot: StoreSnapshot =
            serde_json::from_str(&content).map_err(StoreError::from)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Persist the current contents as a snapshot file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot()?;
        let content = serde_json::to_string_pretty(&snapshot).map_err(StoreError::from)?;
        std::fs::write(path, content).map_err(StoreError::from)?;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()).into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()).into())
    }
}

impl ChoreStore for MemoryStore {
    fn kid(&self, family_id: &str, kid_id: &str) -> Result<Option<Kid>> {
        let state = self.read()?;
        Ok(state
            .kids
            .get(kid_id)
            .filter(|k| k.family_id == family_id)
            .cloned())
    }

    fn put_kid(&self, kid: &Kid) -> Result<()> {
        let mut state = self.write()?;
        state.kids.insert(kid.id.clone(), kid.clone());
        Ok(())
    }

    fn pet(&self, family_id: &str, pet_id: &str) -> Result<Option<Pet>> {
        let state = self.read()?;
        Ok(state
            .pets
            .get(pet_id)
            .filter(|p| p.family_id == family_id)
            .cloned())
    }

    fn put_pet(&self, pet: &Pet) -> Result<()> {
        let mut state = self.write()?;
        state.pets.insert(pet.id.clone(), pet.clone());
        Ok(())
    }

    fn schedule(&self, family_id: &str, schedule_id: &str) -> Result<Option<CareSchedule>> {
        let state = self.read()?;
        Ok(state
            .schedules
            .get(schedule_id)
            .filter(|s| s.family_id == family_id)
            .cloned())
    }

    fn put_schedule(&self, schedule: &CareSchedule) -> Result<()> {
        let mut state = self.write()?;
        state.schedules.insert(schedule.id.clone(), schedule.clone());
        Ok(())
    }

    fn schedules(&self, family_id: &str) -> Result<Vec<CareSchedule>> {
        let state = self.read()?;
        let mut schedules: Vec<_> = state
            .schedules
            .values()
            .filter(|s| s.family_id == family_id)
            .cloned()
            .collect();
        schedules.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(schedules)
    }

    fn commit_rotation_index(
        &self,
        family_id: &str,
        schedule_id: &str,
        expected: usize,
        new: usize,
    ) -> Result<()> {
        let mut state = self.write()?;
        let schedule = state
            .schedules
            .get_mut(schedule_id)
            .filter(|s| s.family_id == family_id)
            .ok_or_else(|| CoreError::not_found("schedule"))?;
        if schedule.rotation_index != expected {
            return Err(CoreError::conflict(format!(
                "rotation index moved (expected {expected}, found {})",
                schedule.rotation_index
            )));
        }
        schedule.rotation_index = new;
        Ok(())
    }

    fn task(&self, family_id: &str, task_id: &str) -> Result<Option<ChoreSubmission>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .get(task_id)
            .filter(|t| t.family_id == family_id)
            .cloned())
    }

    fn insert_task(&self, task: &ChoreSubmission) -> Result<bool> {
        let mut state = self.write()?;
        let key = TaskSeries::of(task).key(&task.family_id, task.due_date);
        if state.due_index.contains(&key) {
            return Ok(false);
        }
        state.due_index.insert(key);
        state.tasks.insert(task.id.clone(), task.clone());
        Ok(true)
    }

    fn update_task(&self, task: &ChoreSubmission) -> Result<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id) {
            return Err(CoreError::not_found("task"));
        }
        state.tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    fn existing_due_dates(
        &self,
        family_id: &str,
        series: &TaskSeries<'_>,
    ) -> Result<HashSet<NaiveDate>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.family_id == family_id && TaskSeries::of(t) == *series)
            .map(|t| t.due_date)
            .collect())
    }

    fn submissions_for_kid(
        &self,
        family_id: &str,
        kid_id: &str,
    ) -> Result<Vec<ChoreSubmission>> {
        let state = self.read()?;
        let mut subs: Vec<_> = state
            .tasks
            .values()
            .filter(|t| t.family_id == family_id && t.assigned_kid_id == kid_id)
            .cloned()
            .collect();
        subs.sort_by_key(|t| t.submitted_at.unwrap_or(t.created_at));
        Ok(subs)
    }

    fn submissions_for_chore(
        &self,
        family_id: &str,
        kid_id: &str,
        task_name: &str,
    ) -> Result<Vec<ChoreSubmission>> {
        let mut subs = self.submissions_for_kid(family_id, kid_id)?;
        subs.retain(|t| t.task_name == task_name);
        Ok(subs)
    }

    fn adjust_points(&self, family_id: &str, kid_id: &str, delta: i64) -> Result<i64> {
        let mut state = self.write()?;
        let kid = state
            .kids
            .get_mut(kid_id)
            .filter(|k| k.family_id == family_id)
            .ok_or_else(|| CoreError::not_found("kid"))?;
        let new_balance = kid.points + delta;
        if new_balance < 0 {
            return Err(CoreError::conflict(format!(
                "balance update would go negative ({} {delta:+})",
                kid.points
            )));
        }
        kid.points = new_balance;
        kid.version += 1;
        Ok(new_balance)
    }
}
