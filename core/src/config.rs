//! Run parameters and engine options
//!
//! [`RunParams`] travel with every request and are validated before a
//! worker starts. [`EngineOptions`] are fixed per engine and govern
//! watchdog slack, reporting cadence and exact-search budgets.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{ColoringError, Result};
use crate::data_structures::coloring::Color;

/// Per-request tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunParams {
    /// Wall-clock limit in seconds
    pub time_limit: f64,

    /// Stagnation window in milliseconds
    #[serde(alias = "stagnationWindow")]
    pub stagnation_time: u64,

    /// Genetic algorithm population size
    pub population: usize,

    /// Genetic algorithm generation cap per attempt; `0` means unbounded
    pub generations: usize,

    /// Initial annealing temperature
    pub temperature: f64,

    /// Geometric cooling factor applied every annealing step
    pub cooling_rate: f64,

    /// Iterations a reverted move stays tabu
    pub tabu_tenure: u64,

    /// Starting color budget for escalating strategies
    #[serde(alias = "maxColorsHint")]
    pub max_colors: Option<Color>,

    /// Ant count for ant colony optimization; derived from `n` when absent
    pub ants: Option<usize>,

    /// Seed for reproducible stochastic runs
    pub seed: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            time_limit: 10.0,
            stagnation_time: 5_000,
            population: 50,
            generations: 0,
            temperature: 1_000.0,
            cooling_rate: 0.9995,
            tabu_tenure: 15,
            max_colors: None,
            ants: None,
            seed: None,
        }
    }
}

impl RunParams {
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = seconds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_colors(mut self, colors: Color) -> Self {
        self.max_colors = Some(colors);
        self
    }

    pub fn time_limit_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit).unwrap_or(Duration::ZERO)
    }

    pub fn stagnation_window(&self) -> Duration {
        Duration::from_millis(self.stagnation_time)
    }

    /// Reject values no strategy can work with
    pub fn validate(&self) -> Result<()> {
        if !self.time_limit.is_finite() || self.time_limit <= 0.0 {
            return Err(ColoringError::invalid_parameter(
                "timeLimit",
                format!("must be a positive number of seconds, got {}", self.time_limit),
            ));
        }
        if self.stagnation_time == 0 {
            return Err(ColoringError::invalid_parameter(
                "stagnationTime",
                "must be at least one millisecond",
            ));
        }
        if self.population < 2 {
            return Err(ColoringError::invalid_parameter(
                "population",
                "needs at least two individuals",
            ));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(ColoringError::invalid_parameter(
                "temperature",
                "must be positive",
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ColoringError::invalid_parameter(
                "coolingRate",
                "must lie strictly between 0 and 1",
            ));
        }
        if self.max_colors == Some(0) {
            return Err(ColoringError::invalid_parameter(
                "maxColors",
                "must be at least 1",
            ));
        }
        if self.ants == Some(0) {
            return Err(ColoringError::invalid_parameter("ants", "must be at least 1"));
        }
        Ok(())
    }
}

/// Engine-wide execution options
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Slack past the time limit before the watchdog fires
    pub grace_period: Duration,

    /// Emit a progress event every this many steps
    pub report_every: u64,

    /// Optional pause after each progress event for animated playback
    pub pacing: Option<Duration>,

    /// Starting color budget when the request gives none
    pub initial_colors: Color,

    /// First step budget for exact strategies; doubled after every attempt
    pub exact_step_budget: u64,

    /// Ceiling for the exact step budget
    pub exact_step_budget_cap: u64,

    /// Wall-clock cap for a single ILP feasibility solve
    pub ilp_solve_limit: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(2),
            report_every: 100,
            pacing: None,
            initial_colors: 3,
            exact_step_budget: 5_000,
            exact_step_budget_cap: 1_000_000,
            ilp_solve_limit: Duration::from_secs(10),
        }
    }
}

impl EngineOptions {
    /// Options for animated playback
    pub fn interactive(pacing: Duration) -> Self {
        Self {
            pacing: Some(pacing),
            report_every: 10,
            ..Self::default()
        }
    }

    /// Options for benchmarking: no pacing, sparse reporting
    pub fn benchmark() -> Self {
        Self {
            pacing: None,
            report_every: 10_000,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_are_valid() {
        let params = RunParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.time_limit_duration(), Duration::from_secs(10));
        assert_eq!(params.stagnation_window(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: RunParams =
            serde_json::from_str(r#"{"timeLimit":2.5,"maxColors":4}"#).unwrap();
        assert_relative_eq!(params.time_limit, 2.5);
        assert_relative_eq!(params.cooling_rate, 0.9995);
        assert_eq!(params.max_colors, Some(4));
        assert_eq!(params.population, 50);
    }

    #[test]
    fn test_legacy_field_names_are_accepted() {
        let params: RunParams =
            serde_json::from_str(r#"{"stagnationWindow":250,"maxColorsHint":6}"#).unwrap();
        assert_eq!(params.stagnation_time, 250);
        assert_eq!(params.max_colors, Some(6));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero_time = RunParams::default().with_time_limit(0.0);
        assert!(matches!(
            zero_time.validate(),
            Err(ColoringError::InvalidParameter { ref name, .. }) if name == "timeLimit"
        ));

        let bad_cooling = RunParams {
            cooling_rate: 1.0,
            ..RunParams::default()
        };
        assert!(bad_cooling.validate().is_err());

        assert!(RunParams::default().with_max_colors(0).validate().is_err());
    }
}
