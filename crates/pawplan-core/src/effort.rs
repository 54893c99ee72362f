//! Effort-based scoring and retry detection.
//!
//! Self-reported effort minutes convert to a bounded bonus: half a point
//! per minute, capped at 10, rounded ties-to-even (5 minutes is 2 points,
//! not 3). Retries are prior submissions for the same chore inside a
//! 24-hour lookback window; the window is exclusive at the exact boundary.
//! Both values are computed once at submission time and stored immutably.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::chore::ChoreSubmission;
use crate::config::ScoringConfig;

/// Default points credited per self-reported minute.
pub const DEFAULT_POINTS_PER_MINUTE: f64 = 0.5;
/// Default upper bound on effort points.
pub const DEFAULT_EFFORT_CAP: u32 = 10;
/// Default retry lookback window, in hours. Exclusive at the boundary: a
/// prior submission exactly this old does not count.
pub const DEFAULT_RETRY_WINDOW_HOURS: i64 = 24;

/// The stored outcome of scoring one submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffortScore {
    pub effort_points: u32,
    pub retry_count: u32,
    pub is_retry: bool,
}

/// Converts self-reported effort into points and retry flags.
#[derive(Debug, Clone)]
pub struct EffortScorer {
    points_per_minute: f64,
    cap: u32,
    retry_window: Duration,
}

impl Default for EffortScorer {
    fn default() -> Self {
        Self {
            points_per_minute: DEFAULT_POINTS_PER_MINUTE,
            cap: DEFAULT_EFFORT_CAP,
            retry_window: Duration::hours(DEFAULT_RETRY_WINDOW_HOURS),
        }
    }
}

impl EffortScorer {
    /// Create a scorer with default rate, cap, and window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer from configuration.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            points_per_minute: config.points_per_minute,
            cap: config.effort_cap,
            retry_window: Duration::hours(config.retry_window_hours),
        }
    }

    /// Bounded effort points for `effort_minutes`.
    ///
    /// `min(cap, round_ties_even(minutes * rate))`.
    pub fn effort_points(&self, effort_minutes: u32) -> u32 {
        let raw = (effort_minutes as f64 * self.points_per_minute).round_ties_even();
        let raw = if raw.is_sign_negative() { 0.0 } else { raw };
        (raw as u32).min(self.cap)
    }

    /// Count prior submissions for the same chore inside the lookback
    /// window before `submitted_at`.
    ///
    /// Counts regardless of the prior submission's resulting status; only
    /// submissions that were actually submitted participate. The window is
    /// half-open: strictly newer than `submitted_at - window`, strictly
    /// older than `submitted_at`.
    pub fn retry_count(
        &self,
        prior: &[ChoreSubmission],
        submitted_at: DateTime<Utc>,
    ) -> u32 {
        let window_start = submitted_at - self.retry_window;
        prior
            .iter()
            .filter_map(|s| s.submitted_at)
            .filter(|t| *t > window_start && *t < submitted_at)
            .count() as u32
    }

    /// Compute the full stored score for a new submission.
    pub fn score(
        &self,
        effort_minutes: u32,
        prior: &[ChoreSubmission],
        submitted_at: DateTime<Utc>,
    ) -> EffortScore {
        let retry_count = self.retry_count(prior, submitted_at);
        EffortScore {
            effort_points: self.effort_points(effort_minutes),
            retry_count,
            is_retry: retry_count > 0,
        }
    }
}
