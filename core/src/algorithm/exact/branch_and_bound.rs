//! Branch and bound over conflict counts
//!
//! Nodes are assigned in non-increasing degree order using an explicit
//! stack of `(position, color, inherited conflicts)` frames. A partial
//! assignment is pruned as soon as its conflict count reaches the best
//! complete assignment found so far.
//!
//! Backtracking is the same search started with a bound of one: every
//! conflicting partial assignment is pruned immediately, so the first leaf
//! reached is a proper coloring.

use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::data_structures::coloring::{Color, ConflictAnalyzer};
use crate::execution::context::{RunContext, Snapshot};

#[derive(Debug, Clone, Copy)]
struct Frame {
    position: usize,
    color: Color,
    inherited: usize,
}

#[derive(Debug, Clone)]
pub struct BranchAndBound {
    id: AlgorithmId,
    initial_bound: usize,
}

impl BranchAndBound {
    /// Only conflict-free partial assignments survive
    pub fn backtracking() -> Self {
        Self {
            id: AlgorithmId::Backtracking,
            initial_bound: 1,
        }
    }

    /// Minimizes conflicts; any leaf may become the incumbent
    pub fn minimizing() -> Self {
        Self {
            id: AlgorithmId::BranchAndBound,
            initial_bound: usize::MAX,
        }
    }
}

impl ColoringStrategy for BranchAndBound {
    fn id(&self) -> AlgorithmId {
        self.id
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        if n == 0 {
            return Ok(AttemptOutcome::Solved);
        }

        let k = ctx.color_budget();
        let step_budget = ctx.step_budget();
        let order = graph.nodes_by_degree();
        let analyzer = ConflictAnalyzer::new(graph);
        ctx.coloring.reset();

        let mut bound = self.initial_bound;
        let mut steps = 0u64;
        let mut stack = vec![Frame {
            position: 0,
            color: 1,
            inherited: 0,
        }];

        while let Some(frame) = stack.last().copied() {
            let u = order[frame.position];

            if frame.color > k {
                ctx.coloring.clear(u);
                stack.pop();
                if let Some(parent) = stack.last_mut() {
                    parent.color += 1;
                }
                continue;
            }

            if step_budget.map_or(false, |limit| steps >= limit) {
                return Ok(AttemptOutcome::StepBudgetExhausted);
            }

            // unassigned nodes hold 0 and never match a real color
            let conflicts = frame.inherited + ctx.coloring.neighbors_with_color(graph, u, frame.color);
            if conflicts >= bound {
                if let Some(top) = stack.last_mut() {
                    top.color += 1;
                }
                continue;
            }

            ctx.coloring.set(u, frame.color);
            steps += 1;
            ctx.tick(Snapshot::Live)?;

            if frame.position + 1 < n {
                stack.push(Frame {
                    position: frame.position + 1,
                    color: 1,
                    inherited: conflicts,
                });
                continue;
            }

            let total = analyzer.count(&ctx.coloring);
            if total < bound {
                bound = total;
                ctx.record_live(total);
                if total == 0 {
                    return Ok(AttemptOutcome::Solved);
                }
            }
            if let Some(top) = stack.last_mut() {
                top.color += 1;
            }
        }

        Ok(AttemptOutcome::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::testing::{complete_graph, linked_triangles, run_attempt};

    #[test]
    fn test_backtracking_colors_k4_with_four() {
        let graph = complete_graph(4);
        let (outcome, state) = run_attempt(&mut BranchAndBound::backtracking(), &graph, Some(4), Some(10_000));

        assert_eq!(outcome, Ok(AttemptOutcome::Solved));
        assert_eq!(state.conflicts, 0);
        assert_eq!(state.coloring.colors_used(), 4);
    }

    #[test]
    fn test_backtracking_exhausts_k4_with_three() {
        let graph = complete_graph(4);
        let (outcome, _) = run_attempt(&mut BranchAndBound::backtracking(), &graph, Some(3), Some(10_000));

        assert_eq!(outcome, Ok(AttemptOutcome::Exhausted));
    }

    #[test]
    fn test_minimizing_keeps_least_conflicting_leaf() {
        let graph = complete_graph(4);
        let (outcome, state) = run_attempt(&mut BranchAndBound::minimizing(), &graph, Some(3), Some(10_000));

        assert_eq!(outcome, Ok(AttemptOutcome::Exhausted));
        assert!(state.coloring.is_complete());
        assert_eq!(state.conflicts, 1);
    }

    #[test]
    fn test_step_budget_stops_the_search() {
        let graph = linked_triangles();
        let (outcome, _) = run_attempt(&mut BranchAndBound::backtracking(), &graph, Some(2), Some(3));

        assert_eq!(outcome, Ok(AttemptOutcome::StepBudgetExhausted));
    }
}
