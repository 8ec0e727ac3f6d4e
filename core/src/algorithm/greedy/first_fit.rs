//! First-fit greedy coloring in index order

use crate::algorithm::greedy::color_in_order;
use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::execution::context::RunContext;

/// Basic greedy: nodes in index order, smallest available color
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl ColoringStrategy for FirstFit {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::BasicGreedy
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let n = ctx.graph().node_count();
        color_in_order(ctx, 0..n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::testing::run_attempt;
    use crate::data_structures::coloring::Coloring;
    use crate::data_structures::graph::Graph;

    #[test]
    fn test_single_edge() {
        let graph = Graph::from_edges(2, vec![(0, 1)]);
        let (outcome, state) = run_attempt(&mut FirstFit, &graph, None, None);

        assert_eq!(outcome, Ok(AttemptOutcome::Constructed));
        assert_eq!(state.coloring, Coloring::from_vec(vec![1, 2]));
        assert_eq!(state.conflicts, 0);
    }

    #[test]
    fn test_isolated_nodes_share_one_color() {
        let graph = Graph::from_edges(10, vec![]);
        let (_, state) = run_attempt(&mut FirstFit, &graph, None, None);

        assert!(state.coloring.as_slice().iter().all(|&c| c == 1));
    }

    #[test]
    fn test_cap_trades_colors_for_conflicts() {
        let graph = crate::algorithm::testing::complete_graph(4);
        let (_, state) = run_attempt(&mut FirstFit, &graph, Some(3), None);

        assert!(state.coloring.max_color() <= 3);
        assert_eq!(state.conflicts, 1);
    }
}
