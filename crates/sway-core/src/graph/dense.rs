//! Index-addressed adjacency snapshot.
//!
//! Algorithms iterate the same adjacency thousands of times; resolving
//! vertices through hash maps on every step would dominate the run. A
//! [`DenseGraph`] numbers vertices `0..n` (sorted by vertex) and stores
//! weighted in/out adjacency lists against those positions. It also records
//! which graph, at which modification, it was taken from.

use std::sync::Arc;

use crate::graph::Vertex;
use crate::graph::index::VertexIndex;
use crate::graph::store::{Graph, GraphId};

/// Weighted adjacency over dense vertex positions.
#[derive(Debug, Clone)]
pub struct DenseGraph<V> {
    index: Arc<VertexIndex<V>>,
    out: Vec<Vec<(usize, f64)>>,
    inc: Vec<Vec<(usize, f64)>>,
    graph_id: GraphId,
    mod_count: u64,
}

impl<V: Vertex> DenseGraph<V> {
    /// Snapshot `graph`. Adjacency lists are sorted by neighbour position.
    #[must_use]
    pub fn from_graph<E>(graph: &Graph<V, E>) -> Self {
        let index = VertexIndex::from_vertices(graph.vertices().cloned());
        let n = index.len();
        let mut out: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut inc: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];

        for edge in graph.edges() {
            let (Some(s), Some(t)) = (index.position(edge.source()), index.position(edge.target()))
            else {
                continue;
            };
            out[s].push((t, edge.weight()));
            inc[t].push((s, edge.weight()));
        }

        for list in out.iter_mut().chain(inc.iter_mut()) {
            list.sort_unstable_by_key(|&(pos, _)| pos);
        }

        Self {
            index: Arc::new(index),
            out,
            inc,
            graph_id: graph.id(),
            mod_count: graph.mod_count(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Shared vertex numbering; hand this to
    /// [`GraphState::with_values`](crate::state::GraphState::with_values).
    #[must_use]
    pub const fn index(&self) -> &Arc<VertexIndex<V>> {
        &self.index
    }

    #[must_use]
    pub fn position(&self, v: &V) -> Option<usize> {
        self.index.position(v)
    }

    #[must_use]
    pub fn vertex(&self, position: usize) -> &V {
        self.index.vertex(position)
    }

    /// `(target, weight)` pairs of edges leaving `position`.
    #[must_use]
    pub fn out_edges(&self, position: usize) -> &[(usize, f64)] {
        &self.out[position]
    }

    /// `(source, weight)` pairs of edges entering `position`.
    #[must_use]
    pub fn in_edges(&self, position: usize) -> &[(usize, f64)] {
        &self.inc[position]
    }

    /// Outbound weight sum of every vertex, by position.
    #[must_use]
    pub fn out_weight_sums(&self) -> Vec<f64> {
        self.out
            .iter()
            .map(|edges| edges.iter().map(|&(_, w)| w).sum())
            .collect()
    }

    #[must_use]
    pub const fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    /// The source graph's [`Graph::mod_count`] at capture time.
    #[must_use]
    pub const fn mod_count(&self) -> u64 {
        self.mod_count
    }
}
