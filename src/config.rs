//! Planner configuration, loaded from YAML. Every field has a default, so an
//! empty file (or no file) is a valid configuration.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};
use crate::feasibility::{ScheduleRules, Side};
use crate::solver::SolverConfig;

pub const WORKERS_ENV: &str = "TRIP_SOLVER_WORKERS";
/// Largest daily driving allowance, in hours.
pub const MAX_DRIVING_HOURS: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub solver: SolverConfig,
    pub schedule: ScheduleRules,
    /// Daily driving allowance range searched, in hours.
    pub min_hours: u32,
    pub max_hours: u32,
    /// Which of the focus team's games count toward a trip.
    pub side: Side,
    /// Team-name pairs that never meet in an attendable game; neither is
    /// required as the other's opponent.
    pub excluded_pairings: Vec<(String, String)>,
    /// Worker threads for batch planning; 0 uses every core.
    pub workers: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig {
                edge_penalty: 1,
                ..SolverConfig::default()
            },
            schedule: ScheduleRules::default(),
            min_hours: 1,
            max_hours: MAX_DRIVING_HOURS,
            side: Side::Away,
            excluded_pairings: Vec::new(),
            workers: 0,
        }
    }
}

impl PlannerConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the planner cannot work with: schedule rules out of
    /// range, or an hour range outside `1..=MAX_DRIVING_HOURS`.
    pub fn validate(&self) -> Result<()> {
        self.schedule.validate()?;
        if self.min_hours < 1 || self.min_hours > self.max_hours || self.max_hours > MAX_DRIVING_HOURS {
            return Err(SolverError::InvalidConfig(format!(
                "driving hours {}..={} must lie within 1..={MAX_DRIVING_HOURS}",
                self.min_hours, self.max_hours
            )));
        }
        Ok(())
    }

    /// Apply `TRIP_SOLVER_WORKERS` when it holds a valid count.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = env::var(WORKERS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(workers) => self.workers = workers,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {WORKERS_ENV}"),
            }
        }
        self
    }

    /// Names of teams paired with `team_name` in `excluded_pairings`.
    pub fn excluded_opponents(&self, team_name: &str) -> Vec<&str> {
        self.excluded_pairings
            .iter()
            .filter_map(|(left, right)| {
                if left == team_name {
                    Some(right.as_str())
                } else if right == team_name {
                    Some(left.as_str())
                } else {
                    None
                }
            })
            .collect()
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<PlannerConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|err| SolverError::io(format!("unable to read config '{}'", path.display()), err))?;
    PlannerConfig::from_yaml_str(&raw)
}

/// Config from `path` if it exists, defaults otherwise; env overrides applied either way.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<PlannerConfig> {
    let path = path.as_ref();
    let config = if path.is_file() {
        load_config(path)?
    } else {
        PlannerConfig::default()
    };
    Ok(config.with_env_overrides())
}
