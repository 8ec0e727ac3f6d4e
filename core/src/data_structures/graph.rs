//! Immutable undirected graph model
//!
//! Graphs are submitted with arbitrary external node identifiers and are
//! normalized once, at the run boundary, into a dense `0..n` index space.
//! Every strategy works exclusively in dense indices; the [`NodeMapping`]
//! translates back when progress leaves the engine.
//!
//! # Invariants
//! - Adjacency lists are sorted and free of duplicates
//! - No self-loops are stored
//! - `v ∈ N(u) ⇔ u ∈ N(v)`
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{ColoringError, Result};

/// Node identifier as supplied by the caller
pub type ExternalId = u64;

/// Graph as submitted across the run boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphInput {
    /// Number of nodes
    pub node_count: usize,

    /// External identifiers, one per node; identity `0..n` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_ids: Option<Vec<ExternalId>>,

    /// Undirected edges between external identifiers
    #[serde(default)]
    pub edges: Vec<(ExternalId, ExternalId)>,
}

impl GraphInput {
    /// Graph whose external identifiers are `0..node_count`
    pub fn new(node_count: usize, edges: Vec<(ExternalId, ExternalId)>) -> Self {
        Self {
            node_count,
            node_ids: None,
            edges,
        }
    }

    /// Attach explicit external identifiers
    pub fn with_node_ids(mut self, ids: Vec<ExternalId>) -> Self {
        self.node_ids = Some(ids);
        self
    }
}

/// Bidirectional translation between external identifiers and dense indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMapping {
    to_dense: HashMap<ExternalId, usize>,
    to_external: Vec<ExternalId>,
}

impl NodeMapping {
    /// Mapping where external identifier `i` is dense index `i`
    pub fn identity(node_count: usize) -> Self {
        let to_external: Vec<ExternalId> = (0..node_count as ExternalId).collect();
        let to_dense = to_external
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();

        Self {
            to_dense,
            to_external,
        }
    }

    /// Mapping over explicit identifiers; duplicates are rejected
    pub fn from_ids(ids: &[ExternalId]) -> Result<Self> {
        let mut to_dense = HashMap::with_capacity(ids.len());
        for (index, &id) in ids.iter().enumerate() {
            if to_dense.insert(id, index).is_some() {
                return Err(ColoringError::InvalidGraph(format!(
                    "duplicate node identifier {}",
                    id
                )));
            }
        }

        Ok(Self {
            to_dense,
            to_external: ids.to_vec(),
        })
    }

    /// Dense index of an external identifier
    #[inline]
    pub fn dense(&self, id: ExternalId) -> Option<usize> {
        self.to_dense.get(&id).copied()
    }

    /// External identifier of a dense index
    #[inline]
    pub fn external(&self, index: usize) -> ExternalId {
        self.to_external[index]
    }

    /// Number of mapped nodes
    pub fn len(&self) -> usize {
        self.to_external.len()
    }

    /// Whether the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.to_external.is_empty()
    }
}

/// Undirected simple graph over dense indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Build from dense edges; self-loops, duplicates and out-of-range
    /// endpoints are discarded
    pub fn from_edges<I>(node_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut adjacency = vec![Vec::new(); node_count];
        for (u, v) in edges {
            if u == v || u >= node_count || v >= node_count {
                continue;
            }
            adjacency[u].push(v);
            adjacency[v].push(u);
        }

        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        let edge_count = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        Self {
            adjacency,
            edge_count,
        }
    }

    /// Normalize a submitted graph. Edges naming unknown identifiers are
    /// dropped and counted in a warning.
    pub fn from_input(input: &GraphInput) -> Result<(Self, NodeMapping)> {
        let mapping = match &input.node_ids {
            Some(ids) if ids.len() != input.node_count => {
                return Err(ColoringError::InvalidGraph(format!(
                    "nodeCount is {} but {} node identifiers were supplied",
                    input.node_count,
                    ids.len()
                )));
            }
            Some(ids) => NodeMapping::from_ids(ids)?,
            None => NodeMapping::identity(input.node_count),
        };

        let mut dropped = 0usize;
        let edges: Vec<(usize, usize)> = input
            .edges
            .iter()
            .filter_map(|&(source, target)| match (mapping.dense(source), mapping.dense(target)) {
                (Some(u), Some(v)) => Some((u, v)),
                _ => {
                    dropped += 1;
                    None
                }
            })
            .collect();

        if dropped > 0 {
            warn!("Dropped {} edge(s) referencing unknown node identifiers", dropped);
        }

        let graph = Self::from_edges(input.node_count, edges);
        debug!(
            "Normalized graph: {} nodes, {} edges (max degree {})",
            graph.node_count(),
            graph.edge_count(),
            graph.max_degree()
        );

        Ok((graph, mapping))
    }

    /// Number of nodes
    #[inline]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct undirected edges
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Sorted neighbors of `u`
    #[inline]
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.adjacency[u]
    }

    #[inline]
    pub fn degree(&self, u: usize) -> usize {
        self.adjacency[u].len()
    }

    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Each undirected edge once, as `(u, v)` with `u < v`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, neighbors)| {
            let start = neighbors.partition_point(|&v| v <= u);
            neighbors[start..].iter().map(move |&v| (u, v))
        })
    }

    /// Nodes in non-increasing degree order; ties keep index order
    pub fn nodes_by_degree(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.node_count()).collect();
        order.sort_by(|&a, &b| self.degree(b).cmp(&self.degree(a)));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_drops_loops_and_duplicates() {
        let graph = Graph::from_edges(3, vec![(0, 1), (1, 0), (1, 1), (1, 2), (2, 7)]);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_external_identifiers_are_mapped() {
        let input = GraphInput::new(3, vec![(10, 20), (20, 30), (30, 99)])
            .with_node_ids(vec![10, 20, 30]);
        let (graph, mapping) = Graph::from_input(&input).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(mapping.dense(20), Some(1));
        assert_eq!(mapping.external(2), 30);
        assert_eq!(mapping.dense(99), None);
    }

    #[test]
    fn test_mismatched_identifier_count_is_rejected() {
        let input = GraphInput::new(3, vec![]).with_node_ids(vec![1, 2]);
        assert!(matches!(
            Graph::from_input(&input),
            Err(ColoringError::InvalidGraph(_))
        ));

        let duplicate = GraphInput::new(2, vec![]).with_node_ids(vec![5, 5]);
        assert!(Graph::from_input(&duplicate).is_err());
    }

    #[test]
    fn test_degree_order_is_stable() {
        // star centered on 2 plus a pendant edge
        let graph = Graph::from_edges(5, vec![(2, 0), (2, 1), (2, 3), (3, 4)]);
        assert_eq!(graph.nodes_by_degree(), vec![2, 3, 0, 1, 4]);
        assert_eq!(graph.max_degree(), 3);
    }

    #[test]
    fn test_input_deserializes_from_camel_case() {
        let json = r#"{"nodeCount":2,"edges":[[0,1]]}"#;
        let input: GraphInput = serde_json::from_str(json).unwrap();
        assert_eq!(input, GraphInput::new(2, vec![(0, 1)]));
    }
}
