//! Welsh-Powell: greedy coloring by non-increasing degree

use crate::algorithm::greedy::color_in_order;
use crate::algorithm::traits::{AlgorithmId, AttemptOutcome, ColoringStrategy, Result};
use crate::execution::context::RunContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct WelshPowell;

impl ColoringStrategy for WelshPowell {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::WelshPowell
    }

    fn attempt(&mut self, ctx: &mut RunContext<'_>) -> Result<AttemptOutcome> {
        let order = ctx.graph().nodes_by_degree();
        color_in_order(ctx, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::testing::run_attempt;
    use crate::data_structures::graph::Graph;

    #[test]
    fn test_hub_is_colored_first() {
        // index order would give the hub color 3 here
        let graph = Graph::from_edges(5, vec![(0, 1), (2, 3), (4, 0), (4, 1), (4, 2), (4, 3)]);
        let (_, state) = run_attempt(&mut WelshPowell, &graph, None, None);

        assert_eq!(state.coloring.get(4), 1);
        assert_eq!(state.coloring.max_color(), 3);
        assert_eq!(state.conflicts, 0);
    }
}
