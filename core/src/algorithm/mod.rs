//! Coloring strategy catalogue
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod exact;
pub mod greedy;
pub mod ilp;
pub mod metaheuristic;
pub mod traits;

pub use self::traits::*;

use crate::config::{EngineOptions, RunParams};

use self::exact::{BranchAndBound, BruteForce};
use self::greedy::{DSatur, FirstFit, RecursiveLargestFirst, WelshPowell};
use self::ilp::{IlpReduction, MicroLpSolver};
use self::metaheuristic::{AntColony, GeneticAlgorithm, SimulatedAnnealing, TabuSearch};

/// Instantiate the strategy behind an identifier
pub fn create_strategy(
    id: AlgorithmId,
    params: &RunParams,
    options: &EngineOptions,
) -> Box<dyn ColoringStrategy> {
    match id {
        AlgorithmId::BasicGreedy => Box::new(FirstFit),
        AlgorithmId::WelshPowell => Box::new(WelshPowell),
        AlgorithmId::DSatur => Box::new(DSatur),
        AlgorithmId::Rlf => Box::new(RecursiveLargestFirst),
        AlgorithmId::Backtracking => Box::new(BranchAndBound::backtracking()),
        AlgorithmId::BranchAndBound => Box::new(BranchAndBound::minimizing()),
        AlgorithmId::BruteForce => Box::new(BruteForce),
        AlgorithmId::Ilp => Box::new(IlpReduction::new(MicroLpSolver, options.ilp_solve_limit)),
        AlgorithmId::SimulatedAnnealing => Box::new(SimulatedAnnealing::from_params(params)),
        AlgorithmId::GeneticAlgorithm => Box::new(GeneticAlgorithm::from_params(params)),
        AlgorithmId::TabuSearch => Box::new(TabuSearch::from_params(params)),
        AlgorithmId::AntColony => Box::new(AntColony::from_params(params)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_identifier() {
        let params = RunParams::default();
        let options = EngineOptions::default();
        for id in AlgorithmId::ALL {
            assert_eq!(create_strategy(id, &params, &options).id(), id);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::traits::{AttemptOutcome, ColoringStrategy, Result};
    use crate::config::RunParams;
    use crate::data_structures::coloring::Color;
    use crate::data_structures::graph::Graph;
    use crate::execution::budget::{CancellationToken, Deadline, TimeBudget};
    use crate::execution::context::{AttemptState, RunContext};
    use crate::execution::progress::ProgressReporter;

    /// Run a single attempt with a generous deadline and a fixed seed
    pub(crate) fn run_attempt(
        strategy: &mut dyn ColoringStrategy,
        graph: &Graph,
        max_colors: Option<Color>,
        step_budget: Option<u64>,
    ) -> (Result<AttemptOutcome>, AttemptState) {
        let params = RunParams::default().with_seed(7);
        let mut reporter = ProgressReporter::silent(graph.node_count());
        let budget = TimeBudget::new(
            Deadline::starting_now(Duration::from_secs(30)),
            CancellationToken::new(),
        );
        let mut ctx = RunContext::new(
            graph,
            &params,
            max_colors,
            budget,
            &mut reporter,
            StdRng::seed_from_u64(7),
        )
        .with_step_budget(step_budget);
        let outcome = strategy.attempt(&mut ctx);
        (outcome, ctx.into_state())
    }

    pub(crate) fn complete_graph(n: usize) -> Graph {
        Graph::from_edges(n, (0..n).flat_map(|u| (u + 1..n).map(move |v| (u, v))))
    }

    /// Two disjoint triangles joined by a single edge
    pub(crate) fn linked_triangles() -> Graph {
        Graph::from_edges(6, vec![(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)])
    }
}
