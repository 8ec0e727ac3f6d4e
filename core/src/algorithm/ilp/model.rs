//! Binary program for k-colorability
//!
//! One binary `x[v][c]` per node and color. Each node takes exactly one
//! color, and no two endpoints of an edge share one:
//!
//! ```text
//! Σ_c x[v][c] = 1                ∀ v
//! x[u][c] + x[v][c] ≤ 1          ∀ {u, v} ∈ E, ∀ c
//! ```

use crate::algorithm::traits::{ColoringError, Result};
use crate::data_structures::coloring::{Color, Coloring};
use crate::data_structures::graph::Graph;

/// Threshold above which a relaxed binary reads as set
const ONE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IlpModel {
    node_count: usize,
    colors: Color,
    /// Edges `(u, v)` with `u < v`
    edges: Vec<(usize, usize)>,
}

impl IlpModel {
    pub fn build(graph: &Graph, colors: Color) -> Self {
        Self {
            node_count: graph.node_count(),
            colors,
            edges: graph.edges().collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn colors(&self) -> Color {
        self.colors
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn variable_count(&self) -> usize {
        self.node_count * self.colors as usize
    }

    /// Position of `x[node][color]` in the flat variable vector
    #[inline]
    pub fn variable_index(&self, node: usize, color: Color) -> usize {
        node * self.colors as usize + (color as usize - 1)
    }

    /// Read a coloring out of solver values
    pub fn decode(&self, values: &[f64]) -> Result<Coloring> {
        if values.len() != self.variable_count() {
            return Err(ColoringError::ResultParseFailure(format!(
                "expected {} values, got {}",
                self.variable_count(),
                values.len()
            )));
        }

        let mut coloring = Coloring::new(self.node_count);
        for node in 0..self.node_count {
            let mut chosen = (1..=self.colors).filter(|&c| values[self.variable_index(node, c)] > ONE);
            match (chosen.next(), chosen.next()) {
                (Some(color), None) => coloring.set(node, color),
                (None, _) => {
                    return Err(ColoringError::ResultParseFailure(format!(
                        "node {} has no color",
                        node
                    )))
                }
                (Some(_), Some(_)) => {
                    return Err(ColoringError::ResultParseFailure(format!(
                        "node {} has several colors",
                        node
                    )))
                }
            }
        }
        Ok(coloring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_ambiguous_assignments() {
        let graph = Graph::from_edges(2, vec![(0, 1)]);
        let model = IlpModel::build(&graph, 2);

        let coloring = model.decode(&[1.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(coloring, Coloring::from_vec(vec![1, 2]));

        assert!(model.decode(&[1.0, 1.0, 0.0, 1.0]).is_err());
        assert!(model.decode(&[0.0, 0.0, 0.0, 1.0]).is_err());
        assert!(matches!(
            model.decode(&[1.0]),
            Err(ColoringError::ResultParseFailure(_))
        ));
    }
}
