//! Core strategy trait definitions for the coloring engine
//!
//! This module establishes the contract every coloring strategy fulfils,
//! the closed set of algorithm identifiers that cross the run boundary and
//! the error taxonomy shared by the whole crate.
//!
//! # Key Design Principles
//! - Strategies own their search state but never the time budget; they
//!   cooperate through checkpoints on the [`RunContext`]
//! - Interruptions (deadline, cancellation) travel as errors so `?`
//!   unwinds a strategy from any depth of its search
//! - An attempt reports *how* it ended; whether the result is acceptable
//!   is decided later by the auditor
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Debug, Display};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::execution::context::RunContext;

/// Closed enumeration of the available strategies
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlgorithmId {
    BasicGreedy,
    WelshPowell,
    DSatur,
    Rlf,
    Backtracking,
    BranchAndBound,
    BruteForce,
    Ilp,
    SimulatedAnnealing,
    GeneticAlgorithm,
    TabuSearch,
    AntColony,
}

impl AlgorithmId {
    /// Every strategy, in catalogue order
    pub const ALL: [AlgorithmId; 12] = [
        AlgorithmId::BasicGreedy,
        AlgorithmId::WelshPowell,
        AlgorithmId::DSatur,
        AlgorithmId::Rlf,
        AlgorithmId::Backtracking,
        AlgorithmId::BranchAndBound,
        AlgorithmId::BruteForce,
        AlgorithmId::Ilp,
        AlgorithmId::SimulatedAnnealing,
        AlgorithmId::GeneticAlgorithm,
        AlgorithmId::TabuSearch,
        AlgorithmId::AntColony,
    ];

    /// Wire identifier
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmId::BasicGreedy => "basicGreedy",
            AlgorithmId::WelshPowell => "welshPowell",
            AlgorithmId::DSatur => "dSatur",
            AlgorithmId::Rlf => "rlf",
            AlgorithmId::Backtracking => "backtracking",
            AlgorithmId::BranchAndBound => "branchAndBound",
            AlgorithmId::BruteForce => "bruteForce",
            AlgorithmId::Ilp => "ilp",
            AlgorithmId::SimulatedAnnealing => "simulatedAnnealing",
            AlgorithmId::GeneticAlgorithm => "geneticAlgorithm",
            AlgorithmId::TabuSearch => "tabuSearch",
            AlgorithmId::AntColony => "antColony",
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            AlgorithmId::BasicGreedy => "Basic Greedy",
            AlgorithmId::WelshPowell => "Welsh-Powell",
            AlgorithmId::DSatur => "DSatur",
            AlgorithmId::Rlf => "Recursive Largest First",
            AlgorithmId::Backtracking => "Backtracking",
            AlgorithmId::BranchAndBound => "Branch and Bound",
            AlgorithmId::BruteForce => "Brute Force",
            AlgorithmId::Ilp => "Integer Linear Programming",
            AlgorithmId::SimulatedAnnealing => "Simulated Annealing",
            AlgorithmId::GeneticAlgorithm => "Genetic Algorithm",
            AlgorithmId::TabuSearch => "Tabu Search",
            AlgorithmId::AntColony => "Ant Colony Optimization",
        }
    }

    /// Family governing how the driver schedules attempts
    pub fn family(self) -> StrategyFamily {
        match self {
            AlgorithmId::BasicGreedy
            | AlgorithmId::WelshPowell
            | AlgorithmId::DSatur
            | AlgorithmId::Rlf => StrategyFamily::Constructive,
            AlgorithmId::Backtracking | AlgorithmId::BranchAndBound | AlgorithmId::BruteForce => {
                StrategyFamily::Exact
            }
            AlgorithmId::Ilp => StrategyFamily::IntegerProgramming,
            AlgorithmId::SimulatedAnnealing
            | AlgorithmId::GeneticAlgorithm
            | AlgorithmId::TabuSearch
            | AlgorithmId::AntColony => StrategyFamily::Metaheuristic,
        }
    }
}

impl Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = ColoringError;

    fn from_str(s: &str) -> Result<Self> {
        let id = match s.trim() {
            "basicGreedy" | "greedy" => AlgorithmId::BasicGreedy,
            "welshPowell" => AlgorithmId::WelshPowell,
            "dSatur" | "dsatur" => AlgorithmId::DSatur,
            "rlf" => AlgorithmId::Rlf,
            "backtracking" => AlgorithmId::Backtracking,
            "branchAndBound" => AlgorithmId::BranchAndBound,
            "bruteForce" => AlgorithmId::BruteForce,
            "ilp" => AlgorithmId::Ilp,
            "simulatedAnnealing" => AlgorithmId::SimulatedAnnealing,
            "geneticAlgorithm" => AlgorithmId::GeneticAlgorithm,
            "tabuSearch" => AlgorithmId::TabuSearch,
            "antColony" | "aco" => AlgorithmId::AntColony,
            other => return Err(ColoringError::UnknownAlgorithm(other.to_owned())),
        };
        Ok(id)
    }
}

/// Scheduling family of a strategy
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum StrategyFamily {
    /// Single greedy pass, no color cap unless one is imposed
    Constructive,
    /// Complete search under a per-attempt step budget, escalated by one
    Exact,
    /// Stochastic local or population search, escalated by residual conflicts
    Metaheuristic,
    /// Greedy seed followed by solver-backed reduction
    IntegerProgramming,
}

/// How a single attempt ended
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttemptOutcome {
    /// A complete zero-conflict coloring within the color budget
    Solved,
    /// One constructive pass finished; conflicts are possible under a cap
    Constructed,
    /// Progress over the stagnation window fell below threshold
    Stagnated,
    /// Search space at this budget exhausted, or the schedule ran out
    Exhausted,
    /// Per-attempt step budget spent
    StepBudgetExhausted,
}

/// Comprehensive error types for engine operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColoringError {
    #[error("Unknown algorithm identifier: {0}")]
    UnknownAlgorithm(String),

    #[error("Time limit exceeded after {elapsed:?}")]
    SoftTimeExceeded { elapsed: Duration },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Watchdog terminated the run: no completion within {limit:?}")]
    WatchdogKilled { limit: Duration },

    #[error("Integer program is infeasible")]
    SolverInfeasible,

    #[error("Malformed solver result: {0}")]
    ResultParseFailure(String),

    #[error("Post-run invariant violated: {conflicts} conflict(s), {uncolored} uncolored node(s)")]
    PostRunInvariantViolation { conflicts: usize, uncolored: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ColoringError {
    /// Interruptions end an attempt early but still yield a usable result
    pub fn is_interrupt(&self) -> bool {
        matches!(
            self,
            ColoringError::SoftTimeExceeded { .. } | ColoringError::Cancelled
        )
    }

    /// Stable short name of the variant, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            ColoringError::UnknownAlgorithm(_) => "unknown_algorithm",
            ColoringError::SoftTimeExceeded { .. } => "soft_time_exceeded",
            ColoringError::Cancelled => "cancelled",
            ColoringError::WatchdogKilled { .. } => "watchdog_killed",
            ColoringError::SolverInfeasible => "solver_infeasible",
            ColoringError::ResultParseFailure(_) => "result_parse_failure",
            ColoringError::PostRunInvariantViolation { .. } => "post_run_invariant_violation",
            ColoringError::InvalidParameter { .. } => "invalid_parameter",
            ColoringError::InvalidGraph(_) => "invalid_graph",
            ColoringError::Solver(_) => "solver",
            ColoringError::Internal(_) => "internal",
        }
    }

    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        ColoringError::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ColoringError>;

/// A coloring strategy
///
/// An attempt colors `ctx.coloring` (or reports candidates through the
/// context) using at most `ctx.max_colors()` colors. Strategies must call
/// [`RunContext::tick`] regularly; it is the only place where deadlines and
/// cancellation are observed.
pub trait ColoringStrategy: Debug + Send {
    /// Strategy identifier
    fn id(&self) -> AlgorithmId;

    /// Scheduling family
    fn family(&self) -> StrategyFamily {
        self.id().family()
    }

    /// Run one attempt at the context's color budget
    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip_through_wire_names() {
        for id in AlgorithmId::ALL {
            assert_eq!(id.as_str().parse::<AlgorithmId>().unwrap(), id);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        let err = "quantumAnnealing".parse::<AlgorithmId>().unwrap_err();
        assert_eq!(err, ColoringError::UnknownAlgorithm("quantumAnnealing".into()));
    }

    #[test]
    fn test_interrupt_classification() {
        assert!(ColoringError::Cancelled.is_interrupt());
        assert!(ColoringError::SoftTimeExceeded {
            elapsed: Duration::from_secs(1)
        }
        .is_interrupt());
        assert!(!ColoringError::SolverInfeasible.is_interrupt());
        assert_eq!(ColoringError::Cancelled.kind(), "cancelled");
    }
}
