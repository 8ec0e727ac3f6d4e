//! Metaheuristic strategies
//!
//! Stochastic searches over complete colorings with a fixed palette
//! `1..=k`. All of them keep their best candidate in the run context,
//! watch the stagnation window and leave escalation of `k` to the driver.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod annealing;
mod ant_colony;
mod genetic;
mod tabu;

pub use self::annealing::SimulatedAnnealing;
pub use self::ant_colony::AntColony;
pub use self::genetic::GeneticAlgorithm;
pub use self::tabu::TabuSearch;

use rand::Rng;

use crate::data_structures::coloring::{Color, Coloring, ConflictAnalyzer};
use crate::data_structures::graph::Graph;

/// Uniformly random complete coloring over `1..=k`
pub(crate) fn random_coloring<R: Rng>(rng: &mut R, node_count: usize, k: Color) -> Coloring {
    Coloring::from_vec((0..node_count).map(|_| rng.gen_range(1..=k)).collect())
}

/// Incremental conflict bookkeeping for single-node recolorings
///
/// Keeps per-node conflict counts so the conflicting set and the running
/// total are available without rescanning the graph.
#[derive(Debug, Clone)]
pub(crate) struct MoveEvaluator<'g> {
    graph: &'g Graph,
    analyzer: ConflictAnalyzer<'g>,
    node_conflicts: Vec<usize>,
    total: usize,
}

impl<'g> MoveEvaluator<'g> {
    pub(crate) fn new(graph: &'g Graph, coloring: &Coloring) -> Self {
        let node_conflicts: Vec<usize> = (0..graph.node_count())
            .map(|u| {
                let color = coloring.get(u);
                if color == 0 {
                    0
                } else {
                    coloring.neighbors_with_color(graph, u, color)
                }
            })
            .collect();
        let total = node_conflicts.iter().sum::<usize>() / 2;

        Self {
            graph,
            analyzer: ConflictAnalyzer::new(graph),
            node_conflicts,
            total,
        }
    }

    #[inline]
    pub(crate) fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub(crate) fn delta(&self, coloring: &Coloring, u: usize, color: Color) -> isize {
        self.analyzer.move_delta(coloring, u, color)
    }

    /// Nodes with at least one conflict, in index order
    pub(crate) fn conflicting_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.node_conflicts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(u, _)| u)
    }

    /// Recolor `u` and update the bookkeeping
    pub(crate) fn apply(&mut self, coloring: &mut Coloring, u: usize, color: Color) {
        let old = coloring.get(u);
        if old == color {
            return;
        }

        for &v in self.graph.neighbors(u) {
            let c = coloring.get(v);
            if old != 0 && c == old {
                self.node_conflicts[v] -= 1;
                self.node_conflicts[u] -= 1;
                self.total -= 1;
            }
            if c == color {
                self.node_conflicts[v] += 1;
                self.node_conflicts[u] += 1;
                self.total += 1;
            }
        }
        coloring.set(u, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bookkeeping_tracks_the_analyzer() {
        let graph = Graph::from_edges(6, vec![(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)]);
        let analyzer = ConflictAnalyzer::new(&graph);
        let mut rng = StdRng::seed_from_u64(11);
        let mut coloring = random_coloring(&mut rng, 6, 2);
        let mut evaluator = MoveEvaluator::new(&graph, &coloring);

        for _ in 0..200 {
            let u = rng.gen_range(0..6);
            let color = rng.gen_range(1..=3);
            let expected = analyzer.count(&coloring) as isize + evaluator.delta(&coloring, u, color);
            evaluator.apply(&mut coloring, u, color);

            assert_eq!(evaluator.total() as isize, expected);
            assert_eq!(evaluator.total(), analyzer.count(&coloring));
        }

        let conflicting: Vec<usize> = evaluator.conflicting_nodes().collect();
        for u in 0..6 {
            let has_conflict = coloring.neighbors_with_color(&graph, u, coloring.get(u)) > 0;
            assert_eq!(conflicting.contains(&u), has_conflict);
        }
    }
}
