//! Strongly connected components (two-pass iterative Kosaraju).
//!
//! # Overview
//!
//! 1. Depth-first over outgoing edges, recording vertices in order of
//!    completion.
//! 2. Walk that order backwards; every vertex not yet assigned starts a new
//!    component, filled by a search over *incoming* edges (the transpose).
//!
//! Both passes keep explicit stacks, so recursion depth never depends on
//! graph size. O(V + E).
//!
//! # Snapshot validity
//!
//! A [`Kosaraju`] result stores the identity and `mod_count` of the graph
//! it was computed from, never the graph itself. Every query takes the
//! graph again and fails with [`GraphError::ForeignGraph`] or
//! [`GraphError::StaleSnapshot`] instead of answering from an outdated
//! partition.

use std::collections::{BTreeSet, HashMap};

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use sway_core::{DenseGraph, Graph, GraphError, GraphId, Result, Vertex};

/// The SCC partition of one graph at one modification.
#[derive(Debug, Clone)]
pub struct Kosaraju<V> {
    graph_id: GraphId,
    mod_count: u64,
    /// Sorted by smallest member.
    components: Vec<BTreeSet<V>>,
    membership: HashMap<V, usize>,
}

impl<V: Vertex> Kosaraju<V> {
    /// Partition `graph` into strongly connected components.
    #[must_use]
    #[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
    pub fn new<E>(graph: &Graph<V, E>) -> Self {
        let components = partition(&graph.dense());
        let membership = components
            .iter()
            .enumerate()
            .flat_map(|(c, members)| members.iter().map(move |v| (v.clone(), c)))
            .collect();

        debug!(components = components.len(), "strongly connected components computed");

        Self {
            graph_id: graph.id(),
            mod_count: graph.mod_count(),
            components,
            membership,
        }
    }

    /// `true` when `graph` is the instance this result was computed from
    /// and has not been modified since.
    #[must_use]
    pub fn is_valid_for<E>(&self, graph: &Graph<V, E>) -> bool {
        self.check(graph).is_ok()
    }

    /// All components, each sorted, ordered by smallest member.
    ///
    /// # Errors
    ///
    /// [`GraphError::ForeignGraph`] or [`GraphError::StaleSnapshot`].
    pub fn components<E>(&self, graph: &Graph<V, E>) -> Result<&[BTreeSet<V>]> {
        self.check(graph)?;
        Ok(&self.components)
    }

    /// # Errors
    ///
    /// [`GraphError::ForeignGraph`] or [`GraphError::StaleSnapshot`].
    pub fn component_count<E>(&self, graph: &Graph<V, E>) -> Result<usize> {
        self.check(graph)?;
        Ok(self.components.len())
    }

    /// The component containing `v`.
    ///
    /// # Errors
    ///
    /// [`GraphError::ForeignGraph`], [`GraphError::StaleSnapshot`], or
    /// [`GraphError::UnknownVertex`] if `v` is not in the graph.
    pub fn component<E>(&self, graph: &Graph<V, E>, v: &V) -> Result<&BTreeSet<V>> {
        self.check(graph)?;
        let c = self.component_of(v)?;
        Ok(&self.components[c])
    }

    /// `true` when `a` and `b` can reach each other.
    ///
    /// # Errors
    ///
    /// [`GraphError::ForeignGraph`], [`GraphError::StaleSnapshot`], or
    /// [`GraphError::UnknownVertex`] for either vertex.
    pub fn connected<E>(&self, graph: &Graph<V, E>, a: &V, b: &V) -> Result<bool> {
        self.check(graph)?;
        Ok(self.component_of(a)? == self.component_of(b)?)
    }

    fn component_of(&self, v: &V) -> Result<usize> {
        self.membership
            .get(v)
            .copied()
            .ok_or_else(|| GraphError::unknown_vertex(v))
    }

    fn check<E>(&self, graph: &Graph<V, E>) -> Result<()> {
        if graph.id() != self.graph_id {
            return Err(GraphError::ForeignGraph);
        }
        if graph.mod_count() != self.mod_count {
            return Err(GraphError::StaleSnapshot {
                expected: self.mod_count,
                found: graph.mod_count(),
            });
        }
        Ok(())
    }
}

/// Convenience: the components of `graph`, computed once.
#[must_use]
pub fn strongly_connected_components<V: Vertex, E>(graph: &Graph<V, E>) -> Vec<BTreeSet<V>> {
    partition(&graph.dense())
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

fn partition<V: Vertex>(dense: &DenseGraph<V>) -> Vec<BTreeSet<V>> {
    let order = finish_order(dense);
    let mut components = assign_components(dense, &order);
    components.sort_unstable_by(|a, b| a.first().cmp(&b.first()));
    components
}

/// First pass: positions in order of DFS completion over outgoing edges.
fn finish_order<V: Vertex>(dense: &DenseGraph<V>) -> Vec<usize> {
    let n = dense.len();
    let mut visited = FixedBitSet::with_capacity(n);
    let mut order = Vec::with_capacity(n);
    // (position, index of the next outgoing edge to follow)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if visited.put(root) {
            continue;
        }
        stack.push((root, 0));

        while let Some((node, next_edge)) = stack.last_mut() {
            let node = *node;
            if let Some(&(target, _)) = dense.out_edges(node).get(*next_edge) {
                *next_edge += 1;
                if !visited.put(target) {
                    stack.push((target, 0));
                }
            } else {
                stack.pop();
                order.push(node);
            }
        }
    }
    order
}

/// Second pass: flood incoming edges in reverse completion order.
fn assign_components<V: Vertex>(dense: &DenseGraph<V>, order: &[usize]) -> Vec<BTreeSet<V>> {
    let n = dense.len();
    let mut assigned = FixedBitSet::with_capacity(n);
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for &root in order.iter().rev() {
        if assigned.put(root) {
            continue;
        }
        let mut members = BTreeSet::new();
        stack.push(root);
        while let Some(node) = stack.pop() {
            members.insert(dense.vertex(node).clone());
            for &(source, _) in dense.in_edges(node) {
                if !assigned.put(source) {
                    stack.push(source);
                }
            }
        }
        components.push(members);
    }
    components
}
