//! TOML-based engine configuration.
//!
//! Every knob the engines expose lives here with a serde default, so a
//! missing file -- or a file with only the sections the family cares
//! about -- yields a fully usable configuration. Loaded from
//! `~/.config/pawplan/config.toml`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Effort scoring knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_points_per_minute")]
    pub points_per_minute: f64,
    #[serde(default = "default_effort_cap")]
    pub effort_cap: u32,
    /// Retry lookback window; exclusive at the exact boundary.
    #[serde(default = "default_retry_window_hours")]
    pub retry_window_hours: i64,
}

/// Streak qualification knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Rejected submissions above this many minutes still qualify.
    #[serde(default = "default_low_effort_minutes")]
    pub low_effort_minutes: u32,
}

/// Generation knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
    /// Task names approved without parent review.
    #[serde(default = "default_auto_approve_tasks")]
    pub auto_approve_tasks: Vec<String>,
}

/// Evening-walk pattern knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    #[serde(default = "default_walk_roster")]
    pub roster: Vec<String>,
    /// Cycle anchor; the first roster kid walks on this date.
    #[serde(default = "default_walk_anchor")]
    pub anchor_date: NaiveDate,
    #[serde(default = "default_walk_points")]
    pub points_value: i64,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/pawplan/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub walk: WalkConfig,
}

// Default functions
fn default_points_per_minute() -> f64 {
    crate::effort::DEFAULT_POINTS_PER_MINUTE
}
fn default_effort_cap() -> u32 {
    crate::effort::DEFAULT_EFFORT_CAP
}
fn default_retry_window_hours() -> i64 {
    crate::effort::DEFAULT_RETRY_WINDOW_HOURS
}
fn default_low_effort_minutes() -> u32 {
    crate::streak::DEFAULT_LOW_EFFORT_MINUTES
}
fn default_days_ahead() -> u32 {
    crate::generate::DEFAULT_DAYS_AHEAD
}
fn default_auto_approve_tasks() -> Vec<String> {
    crate::approval::DEFAULT_AUTO_APPROVE_TASKS
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_walk_roster() -> Vec<String> {
    ["aiden", "clara", "emery"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_walk_anchor() -> NaiveDate {
    crate::walk_pattern::default_anchor()
}
fn default_walk_points() -> i64 {
    crate::walk_pattern::DEFAULT_WALK_POINTS
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_minute: default_points_per_minute(),
            effort_cap: default_effort_cap(),
            retry_window_hours: default_retry_window_hours(),
        }
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            low_effort_minutes: default_low_effort_minutes(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            days_ahead: default_days_ahead(),
            auto_approve_tasks: default_auto_approve_tasks(),
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            roster: default_walk_roster(),
            anchor_date: default_walk_anchor(),
            points_value: default_walk_points(),
        }
    }
}

impl CoreConfig {
    /// Standard config file location, if a config directory exists.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pawplan").join("config.toml"))
    }

    /// Load from the standard location; missing path or file yields
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: CoreConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring.points_per_minute < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "scoring.points_per_minute".to_string(),
                message: "must be non-negative".to_string(),
            });
        }
        if self.scoring.retry_window_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "scoring.retry_window_hours".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.generation.days_ahead == 0 {
            return Err(ConfigError::InvalidValue {
                key: "generation.days_ahead".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.walk.roster.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "walk.roster".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.scoring.effort_cap, 10);
        assert_eq!(config.generation.days_ahead, 7);
        assert_eq!(config.walk.roster.len(), 3);
    }

    #[test]
    fn partial_file_fills_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[scoring]\neffort_cap = 20").unwrap();

        let config = CoreConfig::load_from(&path).unwrap();
        assert_eq!(config.scoring.effort_cap, 20);
        // Untouched sections keep their defaults.
        assert!((config.scoring.points_per_minute - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.generation.auto_approve_tasks, vec!["water_refill"]);
    }

    #[test]
    fn toml_roundtrip_preserves_fields() {
        let config = CoreConfig::default();
        let encoded = toml::to_string_pretty(&config).unwrap();
        let decoded: CoreConfig = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded.walk.anchor_date, config.walk.anchor_date);
        assert_eq!(decoded.scoring.retry_window_hours, 24);
        assert_eq!(decoded.streak.low_effort_minutes, 10);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = CoreConfig::default();
        config.generation.days_ahead = 0;
        assert!(config.validate().is_err());

        let mut config = CoreConfig::default();
        config.walk.roster.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scoring = \"nope").unwrap();
        assert!(CoreConfig::load_from(&path).is_err());
    }
}
