//! Chromatic: Graph-Coloring Solver Observatory
//!
//! The engine behind watching and benchmarking vertex-coloring algorithms.
//! A family of interchangeable strategies (greedy, exact, ILP-assisted and
//! metaheuristic) is driven by an escalation loop that widens the color
//! budget whenever an attempt stagnates, all under a shared wall-clock
//! deadline. Every result is re-derived by an independent auditor before it
//! leaves the engine.
//!
//! # Layout
//! - [`data_structures`]: the immutable graph model, colorings and the
//!   conflict analyzer
//! - [`algorithm`]: the strategy trait, error taxonomy and the twelve
//!   strategies
//! - [`execution`]: per-attempt run context, time budgets, stagnation
//!   detection, progress reporting, the escalation driver and the run
//!   boundary with its watchdog
//! - [`validation`]: result auditing and sequential benchmarking
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod execution;
pub mod validation;

pub use crate::algorithm::traits::{
    AlgorithmId, AttemptOutcome, ColoringError, ColoringStrategy, Result, StrategyFamily,
};
pub use crate::algorithm::create_strategy;
pub use crate::config::{EngineOptions, RunParams};
pub use crate::data_structures::coloring::{Color, Coloring, ConflictAnalyzer, ConflictReport};
pub use crate::data_structures::graph::{ExternalId, Graph, GraphInput, NodeMapping};
pub use crate::execution::driver::{DriverReport, EscalationDriver};
pub use crate::execution::progress::{RunEvent, StepMetrics};
pub use crate::execution::runner::{ColoringEngine, RunHandle, RunRequest};
pub use crate::validation::benchmarks::{BenchmarkEntry, BenchmarkSequence};
pub use crate::validation::correctness::{AuditReport, RunStatus, VerificationAuditor};
