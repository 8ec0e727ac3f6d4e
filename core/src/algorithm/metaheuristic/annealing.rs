//! Simulated annealing (Kirkpatrick et al., 1983)
//!
//! Each step recolors a random node to a random color. Improving moves are
//! always taken; worsening moves with probability `exp(-Δ / T)`. The
//! temperature decays geometrically and the attempt ends at the floor.

use rand::Rng;

use crate::algorithm::metaheuristic::{random_coloring, MoveEvaluator};
use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::config::RunParams;
use crate::execution::context::{RunContext, Snapshot};

/// Temperature below which the schedule is considered frozen
const MIN_TEMPERATURE: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    initial_temperature: f64,
    cooling_rate: f64,
}

impl SimulatedAnnealing {
    pub fn new(initial_temperature: f64, cooling_rate: f64) -> Self {
        Self {
            initial_temperature,
            cooling_rate,
        }
    }

    pub fn from_params(params: &RunParams) -> Self {
        Self::new(params.temperature, params.cooling_rate)
    }
}

impl ColoringStrategy for SimulatedAnnealing {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::SimulatedAnnealing
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        if n == 0 {
            return Ok(AttemptOutcome::Solved);
        }

        let k = ctx.color_budget();
        ctx.coloring = random_coloring(ctx.rng(), n, k);
        let mut evaluator = MoveEvaluator::new(graph, &ctx.coloring);
        ctx.record_live(evaluator.total());

        let mut temperature = self.initial_temperature;
        while evaluator.total() > 0 {
            if temperature <= MIN_TEMPERATURE {
                return Ok(AttemptOutcome::Exhausted);
            }
            ctx.tick(Snapshot::Best)?;
            if ctx.stagnated() {
                return Ok(AttemptOutcome::Stagnated);
            }

            let u = ctx.rng().gen_range(0..n);
            let color = ctx.rng().gen_range(1..=k);
            if color != ctx.coloring.get(u) {
                let delta = evaluator.delta(&ctx.coloring, u, color);
                let accept = delta <= 0 || ctx.rng().gen::<f64>() < (-(delta as f64) / temperature).exp();
                if accept {
                    evaluator.apply(&mut ctx.coloring, u, color);
                    ctx.record_live(evaluator.total());
                }
            }

            temperature *= self.cooling_rate;
        }

        Ok(AttemptOutcome::Solved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::testing::{linked_triangles, run_attempt};
    use crate::data_structures::graph::Graph;

    #[test]
    fn test_solves_with_enough_colors() {
        let graph = linked_triangles();
        let (outcome, state) = run_attempt(&mut SimulatedAnnealing::new(10.0, 0.9999), &graph, Some(3), None);

        assert_eq!(outcome, Ok(AttemptOutcome::Solved));
        assert_eq!(state.conflicts, 0);
    }

    #[test]
    fn test_cold_schedule_gives_up_on_impossible_budget() {
        let graph = Graph::from_edges(3, vec![(0, 1), (1, 2), (0, 2)]);
        let (outcome, state) = run_attempt(&mut SimulatedAnnealing::new(1.0, 0.5), &graph, Some(2), None);

        assert_eq!(outcome, Ok(AttemptOutcome::Exhausted));
        assert!(state.conflicts >= 1);
        assert!(state.coloring.is_complete());
    }
}
