//! Per-attempt run context
//!
//! The context is what a strategy sees of the outside world: the graph, its
//! color budget, a seeded random source, the live coloring it is working on
//! and the best candidate found so far. All checkpoints go through
//! [`RunContext::tick`].
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use rand::rngs::StdRng;

use crate::algorithm::traits::Result;
use crate::config::RunParams;
use crate::data_structures::coloring::{Color, Coloring, ConflictAnalyzer};
use crate::data_structures::graph::Graph;
use crate::execution::budget::TimeBudget;
use crate::execution::progress::ProgressReporter;
use crate::execution::stagnation::{StagnationMonitor, StagnationVerdict};

/// Deadline is polled every this many ticks
const CHECK_INTERVAL: u64 = 16;

/// Stagnation is judged every this many ticks
const STAGNATION_POLL: u64 = 64;

/// Which coloring a periodic progress step shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    /// The live working coloring
    Live,
    /// The best candidate so far, falling back to the live coloring
    Best,
}

/// Best candidate of an attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub coloring: Coloring,
    pub conflicts: usize,
}

/// What an attempt leaves behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptState {
    /// Best candidate when one was recorded, else the live coloring
    pub coloring: Coloring,
    pub conflicts: usize,
    pub uncolored: usize,
    pub iterations: u64,
}

/// Mutable state shared between the driver and one strategy attempt
pub struct RunContext<'a> {
    graph: &'a Graph,
    params: &'a RunParams,
    max_colors: Option<Color>,
    step_budget: Option<u64>,
    budget: TimeBudget,
    stagnation: StagnationMonitor,
    reporter: &'a mut ProgressReporter,
    rng: StdRng,
    iteration: u64,
    best: Option<Candidate>,
    /// Working coloring of the attempt
    pub coloring: Coloring,
}

impl<'a> RunContext<'a> {
    pub fn new(
        graph: &'a Graph,
        params: &'a RunParams,
        max_colors: Option<Color>,
        budget: TimeBudget,
        reporter: &'a mut ProgressReporter,
        rng: StdRng,
    ) -> Self {
        reporter.begin_attempt();
        Self {
            graph,
            params,
            max_colors,
            step_budget: None,
            budget,
            stagnation: StagnationMonitor::new(params.stagnation_window()),
            reporter,
            rng,
            iteration: 0,
            best: None,
            coloring: Coloring::new(graph.node_count()),
        }
    }

    pub fn with_step_budget(mut self, steps: Option<u64>) -> Self {
        self.step_budget = steps;
        self
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn params(&self) -> &'a RunParams {
        self.params
    }

    /// Color cap of this attempt; `None` for uncapped constructive passes
    pub fn max_colors(&self) -> Option<Color> {
        self.max_colors
    }

    /// Color cap, or `Δ + 1` colors when uncapped
    pub fn color_budget(&self) -> Color {
        self.max_colors
            .unwrap_or(self.graph.max_degree() as Color + 1)
            .max(1)
    }

    pub fn step_budget(&self) -> Option<u64> {
        self.step_budget
    }

    pub fn time_budget(&self) -> &TimeBudget {
        &self.budget
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Immediate deadline and cancellation check
    pub fn checkpoint(&self) -> Result<()> {
        self.budget.check()
    }

    /// Count one step: polls the deadline and emits a throttled progress
    /// event showing `snapshot`
    pub fn tick(&mut self, snapshot: Snapshot) -> Result<()> {
        self.iteration += 1;
        if self.iteration % CHECK_INTERVAL == 0 {
            self.budget.check()?;
        }

        if self.reporter.is_due(self.iteration) {
            self.emit(snapshot, None);
        } else {
            self.reporter.advance(self.iteration);
        }
        Ok(())
    }

    /// Emit a step carrying a status message
    pub fn status(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{}", message);
        self.emit(Snapshot::Best, Some(message));
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn best_conflicts(&self) -> Option<usize> {
        self.best.as_ref().map(|candidate| candidate.conflicts)
    }

    /// Keep `candidate` when it strictly beats the best so far
    pub fn record_candidate(&mut self, candidate: &Coloring, conflicts: usize) -> bool {
        if !self.beats_best(conflicts) {
            return false;
        }
        match &mut self.best {
            Some(best) => {
                best.coloring.clone_from(candidate);
                best.conflicts = conflicts;
            }
            None => {
                self.best = Some(Candidate {
                    coloring: candidate.clone(),
                    conflicts,
                })
            }
        }
        self.emit(Snapshot::Best, None);
        true
    }

    /// [`record_candidate`](Self::record_candidate) for the live coloring
    pub fn record_live(&mut self, conflicts: usize) -> bool {
        if !self.beats_best(conflicts) {
            return false;
        }
        let live = self.coloring.clone();
        self.record_candidate(&live, conflicts)
    }

    /// Make the live coloring the best candidate whatever its rank
    ///
    /// For strategies whose progress is not measured in conflicts, such as
    /// a proper coloring proven with fewer colors.
    pub fn replace_best(&mut self, conflicts: usize) {
        self.best = Some(Candidate {
            coloring: self.coloring.clone(),
            conflicts,
        });
        self.emit(Snapshot::Best, None);
    }

    /// Observe the best conflict count against the stagnation window
    pub fn stagnated(&mut self) -> bool {
        if self.iteration % STAGNATION_POLL != 0 {
            return false;
        }
        let Some(best) = self.best_conflicts() else {
            return false;
        };

        match self.stagnation.observe(best) {
            StagnationVerdict::Progressing => false,
            StagnationVerdict::Stagnated {
                improvement,
                threshold,
            } => {
                self.status(format!(
                    "Stagnated: improved by {} over the window, needed {}",
                    improvement, threshold
                ));
                true
            }
        }
    }

    /// Consume the context, keeping the best result of the attempt
    pub fn into_state(self) -> AttemptState {
        let coloring = match self.best {
            Some(best) => best.coloring,
            None => self.coloring,
        };
        let conflicts = ConflictAnalyzer::new(self.graph).count(&coloring);
        let uncolored = coloring.uncolored().count();
        AttemptState {
            coloring,
            conflicts,
            uncolored,
            iterations: self.iteration,
        }
    }

    fn beats_best(&self, conflicts: usize) -> bool {
        self.best_conflicts().map_or(true, |best| conflicts < best)
    }

    fn emit(&mut self, snapshot: Snapshot, status: Option<String>) {
        let coloring = match (snapshot, &self.best) {
            (Snapshot::Best, Some(best)) => &best.coloring,
            _ => &self.coloring,
        };
        self.reporter.step(self.graph, self.iteration, coloring, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::budget::{CancellationToken, Deadline};
    use rand::SeedableRng;
    use std::time::Duration;

    #[test]
    fn test_best_only_improves() {
        let graph = Graph::from_edges(2, vec![(0, 1)]);
        let params = RunParams::default();
        let mut reporter = ProgressReporter::silent(2);
        let budget = TimeBudget::new(
            Deadline::starting_now(Duration::from_secs(60)),
            CancellationToken::new(),
        );
        let mut ctx = RunContext::new(
            &graph,
            &params,
            Some(2),
            budget,
            &mut reporter,
            StdRng::seed_from_u64(1),
        );

        assert!(ctx.record_candidate(&Coloring::from_vec(vec![1, 1]), 1));
        assert!(!ctx.record_candidate(&Coloring::from_vec(vec![2, 2]), 1));
        ctx.coloring = Coloring::from_vec(vec![1, 2]);
        assert!(ctx.record_live(0));

        let state = ctx.into_state();
        assert_eq!(state.coloring, Coloring::from_vec(vec![1, 2]));
        assert_eq!(state.conflicts, 0);
        assert_eq!(state.uncolored, 0);
    }

    #[test]
    fn test_replaced_best_survives_equal_rank() {
        let graph = Graph::from_edges(3, vec![(0, 1), (1, 2)]);
        let params = RunParams::default();
        let mut reporter = ProgressReporter::silent(3);
        let budget = TimeBudget::new(
            Deadline::starting_now(Duration::from_secs(60)),
            CancellationToken::new(),
        );
        let mut ctx = RunContext::new(
            &graph,
            &params,
            None,
            budget,
            &mut reporter,
            StdRng::seed_from_u64(1),
        );

        ctx.coloring = Coloring::from_vec(vec![1, 2, 3]);
        assert!(ctx.record_live(0));
        ctx.coloring = Coloring::from_vec(vec![1, 2, 1]);
        assert!(!ctx.record_live(0));
        ctx.replace_best(0);

        let state = ctx.into_state();
        assert_eq!(state.coloring, Coloring::from_vec(vec![1, 2, 1]));
        assert_eq!(state.coloring.colors_used(), 2);
    }

    #[test]
    fn test_tick_observes_cancellation() {
        let graph = Graph::from_edges(1, vec![]);
        let params = RunParams::default();
        let mut reporter = ProgressReporter::silent(1);
        let token = CancellationToken::new();
        let budget = TimeBudget::new(Deadline::starting_now(Duration::from_secs(60)), token.clone());
        let mut ctx = RunContext::new(
            &graph,
            &params,
            None,
            budget,
            &mut reporter,
            StdRng::seed_from_u64(1),
        );

        token.cancel();
        let result = (0..CHECK_INTERVAL).try_for_each(|_| ctx.tick(Snapshot::Live));
        assert_eq!(result, Err(crate::algorithm::traits::ColoringError::Cancelled));
        assert_eq!(ctx.color_budget(), 1);
    }
}
