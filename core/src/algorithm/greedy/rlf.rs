//! Recursive Largest First (Leighton, 1979)
//!
//! Builds one color class at a time. Each class starts from the uncolored
//! node of highest degree in the uncolored subgraph and then keeps adding
//! the highest-degree uncolored node that is not adjacent to the class.
//! Degrees are always measured against the remaining uncolored subgraph.
//! Once a capped palette is used up, the leftover nodes take their
//! least-conflicting color.

use crate::algorithm::greedy::argmax_lowest;
use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::data_structures::coloring::Color;
use crate::execution::context::{RunContext, Snapshot};

#[derive(Debug, Clone, Copy, Default)]
pub struct RecursiveLargestFirst;

impl ColoringStrategy for RecursiveLargestFirst {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::Rlf
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        let cap = ctx.max_colors();
        ctx.coloring.reset();

        let mut uncolored = vec![true; n];
        let mut remaining = n;
        let mut color: Color = 1;

        let residual_degree = |uncolored: &[bool], u: usize| {
            graph.neighbors(u).iter().filter(|&&v| uncolored[v]).count()
        };

        while remaining > 0 {
            if let Some(cap) = cap.filter(|&cap| color > cap) {
                for u in 0..n {
                    if uncolored[u] {
                        let fallback = ctx.coloring.least_conflicting_color(graph, u, cap);
                        ctx.coloring.set(u, fallback);
                        uncolored[u] = false;
                        ctx.tick(Snapshot::Live)?;
                    }
                }
                break;
            }

            let mut blocked = vec![false; n];
            loop {
                let next = argmax_lowest((0..n).filter(|&u| uncolored[u] && !blocked[u]), |u| {
                    residual_degree(&uncolored, u)
                });
                let Some(u) = next else { break };

                ctx.coloring.set(u, color);
                uncolored[u] = false;
                remaining -= 1;
                for &v in graph.neighbors(u) {
                    blocked[v] = true;
                }
                ctx.tick(Snapshot::Live)?;
            }

            color += 1;
        }

        Ok(AttemptOutcome::Constructed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::testing::{complete_graph, linked_triangles, run_attempt};

    #[test]
    fn test_classes_are_independent_sets() {
        let graph = linked_triangles();
        let (outcome, state) = run_attempt(&mut RecursiveLargestFirst, &graph, None, None);

        assert_eq!(outcome, Ok(AttemptOutcome::Constructed));
        assert_eq!(state.conflicts, 0);
        assert_eq!(state.coloring.colors_used(), 3);
        assert!(state.coloring.is_complete());
    }

    #[test]
    fn test_capped_palette_falls_back() {
        let graph = complete_graph(5);
        let (_, state) = run_attempt(&mut RecursiveLargestFirst, &graph, Some(3), None);

        assert!(state.coloring.is_complete());
        assert!(state.coloring.max_color() <= 3);
        assert!(state.conflicts > 0);
    }
}
