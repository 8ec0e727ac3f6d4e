//! DSatur (Brélaz, 1979)
//!
//! Repeatedly colors the uncolored node with the most distinct neighbor
//! colors, breaking ties by degree and then by lowest index. Saturation
//! sets are maintained incrementally as nodes get colored.

use std::collections::HashSet;

use crate::algorithm::greedy::argmax_lowest;
use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::data_structures::coloring::Color;
use crate::execution::context::{RunContext, Snapshot};

#[derive(Debug, Clone, Copy, Default)]
pub struct DSatur;

impl ColoringStrategy for DSatur {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::DSatur
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let graph = ctx.graph();
        let n = graph.node_count();
        let cap = ctx.max_colors();
        ctx.coloring.reset();

        let mut uncolored = vec![true; n];
        let mut saturation: Vec<HashSet<Color>> = vec![HashSet::new(); n];

        for _ in 0..n {
            let next = argmax_lowest((0..n).filter(|&u| uncolored[u]), |u| {
                (saturation[u].len(), graph.degree(u))
            });
            let Some(u) = next else { break };

            let color = ctx.coloring.assign_bounded(graph, u, cap);
            uncolored[u] = false;
            for &v in graph.neighbors(u) {
                if uncolored[v] {
                    saturation[v].insert(color);
                }
            }
            ctx.tick(Snapshot::Live)?;
        }

        Ok(AttemptOutcome::Constructed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::testing::{linked_triangles, run_attempt};
    use crate::data_structures::graph::Graph;

    #[test]
    fn test_linked_triangles_need_three_colors() {
        let graph = linked_triangles();
        let (_, state) = run_attempt(&mut DSatur, &graph, None, None);

        assert_eq!(state.conflicts, 0);
        assert_eq!(state.coloring.colors_used(), 3);
    }

    #[test]
    fn test_bipartite_graphs_get_two_colors() {
        // crown graph on 8 nodes defeats first-fit in index order
        let graph = Graph::from_edges(
            8,
            vec![(0, 3), (0, 5), (0, 7), (2, 1), (2, 5), (2, 7), (4, 1), (4, 3), (4, 7), (6, 1), (6, 3), (6, 5)],
        );
        let (_, state) = run_attempt(&mut DSatur, &graph, None, None);

        assert_eq!(state.conflicts, 0);
        assert_eq!(state.coloring.colors_used(), 2);
    }
}
