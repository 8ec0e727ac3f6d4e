//! Brute-force search in index order
//!
//! Plain depth-first enumeration of proper partial colorings, node `i` at
//! depth `i`. The driver starts it at one color and walks upwards, so the
//! first solution found uses the chromatic number of colors whenever the
//! step budget allows the search to finish.

use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::data_structures::coloring::Color;
use crate::execution::context::{RunContext, Snapshot};

#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl ColoringStrategy for BruteForce {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::BruteForce
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        let k = ctx.color_budget();
        let step_budget = ctx.step_budget();
        ctx.coloring.reset();

        let mut next_color: Vec<Color> = vec![1; n];
        let mut depth = 0usize;
        let mut steps = 0u64;

        loop {
            if depth == n {
                ctx.record_live(0);
                return Ok(AttemptOutcome::Solved);
            }

            let color = next_color[depth];
            if color > k {
                next_color[depth] = 1;
                ctx.coloring.clear(depth);
                if depth == 0 {
                    return Ok(AttemptOutcome::Exhausted);
                }
                depth -= 1;
                next_color[depth] += 1;
                continue;
            }

            if step_budget.map_or(false, |limit| steps >= limit) {
                return Ok(AttemptOutcome::StepBudgetExhausted);
            }

            if ctx.coloring.neighbors_with_color(graph, depth, color) == 0 {
                ctx.coloring.set(depth, color);
                steps += 1;
                ctx.tick(Snapshot::Live)?;
                depth += 1;
            } else {
                next_color[depth] += 1;
            }
        }
    }
}
