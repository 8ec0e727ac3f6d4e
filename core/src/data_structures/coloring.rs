//! Colorings and conflict analysis
//!
//! A [`Coloring`] is a dense vector of colors where `0` marks an uncolored
//! node and valid colors are `1..=k`. The [`ConflictAnalyzer`] is the single
//! source of truth for conflict counts: strategies may keep incremental
//! bookkeeping, but reported figures are always re-derived here.
//!
//! # Mathematical Foundations
//! A coloring `c: V → {0} ∪ ℕ⁺` is proper when every edge `{u, v}` with both
//! endpoints colored satisfies `c(u) ≠ c(v)`. Its conflict count is
//! `|{ {u, v} ∈ E : c(u) = c(v) ≠ 0 }|`, each undirected edge counted once.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data_structures::graph::Graph;

/// Color index; `0` is reserved for uncolored
pub type Color = u32;

/// Marker for an uncolored node
pub const UNCOLORED: Color = 0;

/// Assignment of colors to dense node indices
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coloring {
    colors: Vec<Color>,
}

impl Coloring {
    /// All nodes uncolored
    pub fn new(node_count: usize) -> Self {
        Self {
            colors: vec![UNCOLORED; node_count],
        }
    }

    pub fn from_vec(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn get(&self, u: usize) -> Color {
        self.colors[u]
    }

    #[inline]
    pub fn set(&mut self, u: usize, color: Color) {
        self.colors[u] = color;
    }

    #[inline]
    pub fn clear(&mut self, u: usize) {
        self.colors[u] = UNCOLORED;
    }

    /// Uncolor every node
    pub fn reset(&mut self) {
        self.colors.fill(UNCOLORED);
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    /// Nodes still uncolored, in index order
    pub fn uncolored(&self) -> impl Iterator<Item = usize> + '_ {
        self.colors
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == UNCOLORED)
            .map(|(u, _)| u)
    }

    pub fn is_complete(&self) -> bool {
        self.colors.iter().all(|&c| c != UNCOLORED)
    }

    /// Highest color in use, `0` when nothing is colored
    pub fn max_color(&self) -> Color {
        self.colors.iter().copied().max().unwrap_or(UNCOLORED)
    }

    /// Number of distinct positive colors
    pub fn colors_used(&self) -> usize {
        self.colors
            .iter()
            .filter(|&&c| c != UNCOLORED)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Colored neighbors of `u` currently holding `color`
    #[inline]
    pub fn neighbors_with_color(&self, graph: &Graph, u: usize, color: Color) -> usize {
        graph
            .neighbors(u)
            .iter()
            .filter(|&&v| self.colors[v] == color)
            .count()
    }

    /// Number of distinct colors among the neighbors of `u`
    pub fn saturation(&self, graph: &Graph, u: usize) -> usize {
        graph
            .neighbors(u)
            .iter()
            .map(|&v| self.colors[v])
            .filter(|&c| c != UNCOLORED)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Smallest positive color not held by any colored neighbor of `u`
    pub fn smallest_available_color(&self, graph: &Graph, u: usize) -> Color {
        let neighbors = graph.neighbors(u);
        // colors above deg + 1 can never block the answer
        let mut taken = vec![false; neighbors.len() + 2];
        for &v in neighbors {
            let c = self.colors[v] as usize;
            if c < taken.len() {
                taken[c] = true;
            }
        }

        (1..taken.len())
            .find(|&c| !taken[c])
            .map_or(taken.len() as Color, |c| c as Color)
    }

    /// Color in `1..=max_colors` with the fewest same-colored neighbors;
    /// the first minimum wins and a conflict-free color ends the scan
    pub fn least_conflicting_color(&self, graph: &Graph, u: usize, max_colors: Color) -> Color {
        let mut best_color = 1;
        let mut best_conflicts = usize::MAX;

        for color in 1..=max_colors.max(1) {
            let conflicts = self.neighbors_with_color(graph, u, color);
            if conflicts < best_conflicts {
                best_color = color;
                best_conflicts = conflicts;
                if conflicts == 0 {
                    break;
                }
            }
        }

        best_color
    }

    /// Greedy assignment shared by the constructive strategies: the smallest
    /// available color, or the least-conflicting one once it would exceed
    /// the cap
    pub fn assign_bounded(&mut self, graph: &Graph, u: usize, max_colors: Option<Color>) -> Color {
        let color = match (self.smallest_available_color(graph, u), max_colors) {
            (color, Some(cap)) if color > cap => self.least_conflicting_color(graph, u, cap),
            (color, _) => color,
        };
        self.colors[u] = color;
        color
    }
}

/// Ground-truth conflict summary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Number of conflicting edges
    pub count: usize,
    /// Conflicting edges as `(u, v)` with `u < v`
    pub edges: Vec<(usize, usize)>,
}

impl ConflictReport {
    pub fn is_clean(&self) -> bool {
        self.count == 0
    }
}

/// Pure conflict evaluation against a fixed graph
#[derive(Debug, Clone, Copy)]
pub struct ConflictAnalyzer<'g> {
    graph: &'g Graph,
}

impl<'g> ConflictAnalyzer<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Full report including the conflicting edge list
    pub fn evaluate(&self, coloring: &Coloring) -> ConflictReport {
        let mut edges = Vec::new();
        self.scan(coloring.as_slice(), |u, v| edges.push((u, v)));
        ConflictReport {
            count: edges.len(),
            edges,
        }
    }

    /// Conflict count only
    pub fn count(&self, coloring: &Coloring) -> usize {
        let mut count = 0;
        self.scan(coloring.as_slice(), |_, _| count += 1);
        count
    }

    /// Change in conflict count if `u` were recolored to `new_color`
    pub fn move_delta(&self, coloring: &Coloring, u: usize, new_color: Color) -> isize {
        let old_color = coloring.get(u);
        if old_color == new_color {
            return 0;
        }

        let mut delta = 0isize;
        for &v in self.graph.neighbors(u) {
            let c = coloring.get(v);
            if c == UNCOLORED {
                continue;
            }
            if c == old_color {
                delta -= 1;
            }
            if c == new_color {
                delta += 1;
            }
        }
        delta
    }

    fn scan<F>(&self, colors: &[Color], mut on_conflict: F)
    where
        F: FnMut(usize, usize),
    {
        for u in 0..self.graph.node_count() {
            let cu = colors[u];
            if cu == UNCOLORED {
                continue;
            }
            let neighbors = self.graph.neighbors(u);
            let start = neighbors.partition_point(|&v| v <= u);
            for &v in &neighbors[start..] {
                if colors[v] == cu {
                    on_conflict(u, v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::from_edges(3, vec![(0, 1), (1, 2), (0, 2)])
    }

    #[test]
    fn test_uncolored_nodes_never_conflict() {
        let graph = triangle();
        let coloring = Coloring::from_vec(vec![0, 0, 1]);
        assert_eq!(ConflictAnalyzer::new(&graph).count(&coloring), 0);
    }

    #[test]
    fn test_conflicts_reported_once_per_edge() {
        let graph = triangle();
        let report = ConflictAnalyzer::new(&graph).evaluate(&Coloring::from_vec(vec![2, 2, 2]));
        assert_eq!(report.count, 3);
        assert_eq!(report.edges, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_move_delta_matches_recount() {
        let graph = Graph::from_edges(4, vec![(0, 1), (0, 2), (0, 3), (2, 3)]);
        let analyzer = ConflictAnalyzer::new(&graph);
        let before = Coloring::from_vec(vec![1, 1, 2, 2]);

        for color in 1..=3 {
            let mut after = before.clone();
            after.set(0, color);
            let expected = analyzer.count(&after) as isize - analyzer.count(&before) as isize;
            assert_eq!(analyzer.move_delta(&before, 0, color), expected);
        }
    }

    #[test]
    fn test_color_choice_helpers() {
        let graph = Graph::from_edges(4, vec![(0, 1), (0, 2), (0, 3)]);
        let coloring = Coloring::from_vec(vec![0, 1, 3, 1]);

        assert_eq!(coloring.smallest_available_color(&graph, 0), 2);
        assert_eq!(coloring.least_conflicting_color(&graph, 0, 1), 1);
        assert_eq!(coloring.least_conflicting_color(&graph, 0, 3), 2);
        assert_eq!(coloring.saturation(&graph, 0), 2);
        assert_eq!(coloring.colors_used(), 2);
        assert_eq!(coloring.uncolored().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_bounded_assignment_respects_cap() {
        let graph = triangle();
        let mut coloring = Coloring::from_vec(vec![1, 2, 0]);

        assert_eq!(coloring.assign_bounded(&graph, 2, Some(2)), 1);
        coloring.clear(2);
        assert_eq!(coloring.assign_bounded(&graph, 2, None), 3);
    }
}
