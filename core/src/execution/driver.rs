//! Escalation driver
//!
//! Runs attempts of one strategy against a single run deadline. Escalating
//! families start from a color budget and widen it whenever an attempt
//! ends without a solution; constructive and ILP strategies get one
//! uncapped attempt.
//!
//! # Escalation policy
//! - Exact strategies: `k → k + 1`, step budget doubled after each attempt
//! - Metaheuristics: `k → k + 5` above 1000 residual conflicts, `k + 2`
//!   above 100, otherwise `k + 1`
//!
//! The color budget never decreases within a run.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithm::traits::{
    AlgorithmId, AttemptOutcome, ColoringError, ColoringStrategy, Result, StrategyFamily,
};
use crate::config::{EngineOptions, RunParams};
use crate::data_structures::coloring::{Color, Coloring};
use crate::data_structures::graph::Graph;
use crate::execution::budget::{CancellationToken, Deadline, TimeBudget};
use crate::execution::context::{AttemptState, RunContext};
use crate::execution::progress::ProgressReporter;

/// Next color budget after a failed attempt
pub fn next_color_budget(current: Color, residual_conflicts: usize, family: StrategyFamily) -> Color {
    let jump = match family {
        StrategyFamily::Metaheuristic => match residual_conflicts {
            c if c > 1_000 => 5,
            c if c > 100 => 2,
            _ => 1,
        },
        _ => 1,
    };
    current.saturating_add(jump)
}

/// One attempt as seen by the driver
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    /// Color cap of the attempt; `None` when uncapped
    pub max_colors: Option<Color>,
    /// Step budget of the attempt; `None` when unbounded
    pub step_budget: Option<u64>,
    pub outcome: std::result::Result<AttemptOutcome, ColoringError>,
    pub conflicts: usize,
    pub uncolored: usize,
    pub elapsed: Duration,
}

/// Everything the driver learned during a run
#[derive(Debug, Clone, PartialEq)]
pub struct DriverReport {
    pub algorithm: AlgorithmId,
    /// Coloring handed to the auditor
    pub coloring: Coloring,
    pub attempts: Vec<AttemptRecord>,
    /// The final attempt claimed a solution
    pub solved: bool,
    /// The run deadline cut the search short
    pub limit_reached: bool,
    pub cancelled: bool,
}

impl DriverReport {
    /// Color caps in attempt order
    pub fn attempted_colors(&self) -> Vec<Option<Color>> {
        self.attempts.iter().map(|attempt| attempt.max_colors).collect()
    }
}

/// Schedules attempts of a strategy until it succeeds or time runs out
#[derive(Debug, Clone)]
pub struct EscalationDriver<'a> {
    graph: &'a Graph,
    params: &'a RunParams,
    options: &'a EngineOptions,
    deadline: Deadline,
    token: CancellationToken,
}

impl<'a> EscalationDriver<'a> {
    pub fn new(
        graph: &'a Graph,
        params: &'a RunParams,
        options: &'a EngineOptions,
        deadline: Deadline,
        token: CancellationToken,
    ) -> Self {
        Self {
            graph,
            params,
            options,
            deadline,
            token,
        }
    }

    fn initial_colors(&self, algorithm: AlgorithmId) -> Color {
        if algorithm == AlgorithmId::BruteForce {
            return 1;
        }
        self.params
            .max_colors
            .unwrap_or(self.options.initial_colors)
            .max(1)
    }

    fn attempt_rng(&self, attempt: usize) -> StdRng {
        match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(attempt as u64)),
            None => StdRng::from_entropy(),
        }
    }

    /// Drive `strategy` to completion, interruption or failure
    pub fn run(
        &self,
        strategy: &mut dyn ColoringStrategy,
        reporter: &mut ProgressReporter,
    ) -> Result<DriverReport> {
        let algorithm = strategy.id();
        let family = strategy.family();
        let budget = TimeBudget::new(self.deadline, self.token.clone());
        let escalates = matches!(family, StrategyFamily::Exact | StrategyFamily::Metaheuristic);
        // Δ + 1 colors always suffice, so caps above that buy nothing
        let ceiling = self.graph.max_degree() as Color + 1;

        let mut max_colors = escalates.then(|| self.initial_colors(algorithm));
        let step_cap = self.options.exact_step_budget_cap.max(1);
        let mut step_budget = self.options.exact_step_budget.clamp(1, step_cap);
        let mut attempts: Vec<AttemptRecord> = Vec::new();
        let mut fallback: Option<AttemptState> = None;
        let mut solved = false;
        let mut interrupt: Option<ColoringError> = None;

        info!(
            "Running {} on {} nodes / {} edges",
            algorithm.display_name(),
            self.graph.node_count(),
            self.graph.edge_count()
        );

        loop {
            if let Err(e) = budget.check() {
                interrupt = Some(e);
                break;
            }

            let steps = match family {
                StrategyFamily::Exact => {
                    let current = step_budget;
                    step_budget = step_budget.saturating_mul(2).min(step_cap);
                    Some(current)
                }
                _ => None,
            };

            debug!(
                "Attempt {} of {} with color cap {:?}, step budget {:?}",
                attempts.len() + 1,
                algorithm,
                max_colors,
                steps
            );

            let started = Instant::now();
            let rng = self.attempt_rng(attempts.len());
            let mut ctx = RunContext::new(self.graph, self.params, max_colors, budget.clone(), reporter, rng)
                .with_step_budget(steps);
            if let Some(k) = max_colors {
                ctx.status(format!("Trying {} with {} colors", algorithm.display_name(), k));
            }
            let outcome = strategy.attempt(&mut ctx);
            let state = ctx.into_state();

            attempts.push(AttemptRecord {
                max_colors,
                step_budget: steps,
                outcome: outcome.clone(),
                conflicts: state.conflicts,
                uncolored: state.uncolored,
                elapsed: started.elapsed(),
            });

            match outcome {
                Ok(AttemptOutcome::Solved) => {
                    solved = true;
                    fallback = Some(state);
                    break;
                }
                Ok(_) if !escalates => {
                    fallback = Some(state);
                    break;
                }
                Ok(outcome) => {
                    let current = max_colors.unwrap_or(1);
                    let next = next_color_budget(current, state.conflicts, family)
                        .min(ceiling)
                        .max(current);
                    let message = format!(
                        "{:?} at k={} with {} conflict(s). Escalating to k={}",
                        outcome, current, state.conflicts, next
                    );
                    debug!("{}", message);
                    reporter.step(self.graph, 0, &state.coloring, Some(message));
                    keep_better(&mut fallback, state);
                    max_colors = Some(next);
                }
                Err(e) if e.is_interrupt() => {
                    keep_better(&mut fallback, state);
                    interrupt = Some(e);
                    break;
                }
                Err(e) => {
                    warn!("{} failed: {}", algorithm, e);
                    return Err(e);
                }
            }
        }

        let limit_reached = matches!(interrupt, Some(ColoringError::SoftTimeExceeded { .. }));
        let cancelled = matches!(interrupt, Some(ColoringError::Cancelled));
        if limit_reached {
            info!("{} hit the time limit after {} attempt(s)", algorithm, attempts.len());
        }

        let coloring = fallback
            .map(|state| state.coloring)
            .unwrap_or_else(|| Coloring::new(self.graph.node_count()));

        Ok(DriverReport {
            algorithm,
            coloring,
            attempts,
            solved,
            limit_reached,
            cancelled,
        })
    }
}

/// Keep whichever state has fewer conflicts, then fewer uncolored nodes;
/// ties go to the later attempt
fn keep_better(current: &mut Option<AttemptState>, candidate: AttemptState) {
    let replace = match current {
        None => true,
        Some(existing) => {
            (candidate.conflicts, candidate.uncolored) <= (existing.conflicts, existing.uncolored)
        }
    };
    if replace {
        *current = Some(candidate);
    }
}
