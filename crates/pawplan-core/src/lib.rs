//! # Pawplan Core Library
//!
//! Core business logic for Pawplan, a family pet-care chore and reward
//! tracker. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary, with any outer transport being a
//! thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Generation**: pure engines turn schedules (kid rotations) and the
//!   fixed walk pattern into task-create drafts; a store-backed runner
//!   commits them idempotently per external trigger
//! - **Approval**: the submission state machine governs the task
//!   lifecycle and couples terminal approval to an atomic ledger credit
//! - **Scoring**: self-reported effort converts to bounded bonus points
//!   with retry detection, computed once at submission time
//! - **Streaks**: consecutive-day completion streaks derived on demand
//!   from submission history
//!
//! ## Key Components
//!
//! - [`RotationEngine`]: rotation-based task generation
//! - [`WalkPattern`]: date-anchored fixed assignment
//! - [`ApprovalEngine`]: submit/approve/reject state machine
//! - [`ChoreStore`]: the persistence seam, with [`MemoryStore`] for tests
//!   and the CLI

pub mod approval;
pub mod chore;
pub mod config;
pub mod effort;
pub mod error;
pub mod generate;
pub mod guide;
pub mod pet;
pub mod rotation;
pub mod store;
pub mod streak;
pub mod walk_pattern;

pub use approval::ApprovalEngine;
pub use chore::{
    CareSchedule, ChoreStatus, ChoreSubmission, Frequency, Identity, Kid, Role, TaskDraft,
    TaskType,
};
pub use config::CoreConfig;
pub use effort::{EffortScore, EffortScorer};
pub use error::{ConfigError, CoreError, Result, StoreError};
pub use generate::{GenerationReport, GenerationRunner};
pub use pet::{LifeStage, Pet, Species, WeightStatus};
pub use rotation::{RotationBatch, RotationEngine};
pub use store::{ChoreStore, MemoryStore, StoreSnapshot, TaskSeries};
pub use streak::{StreakCalculator, StreakSummary};
pub use walk_pattern::WalkPattern;
