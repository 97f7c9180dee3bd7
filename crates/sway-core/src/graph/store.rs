//! Directed, weighted graph store with versioned mutation.
//!
//! # Model
//!
//! Vertices are caller-chosen identities (`V`). Each ordered pair
//! `(source, target)` carries at most one edge: adding an edge between
//! endpoints that are already connected replaces the prior edge. Every edge
//! has a finite weight `> 0` and an optional value `E`. Self-loops are
//! allowed.
//!
//! # Versioning
//!
//! [`Graph::mod_count`] increases on every successful vertex/edge add,
//! remove or re-weight. Results cached over a graph record the counter (and
//! the graph's [`GraphId`]) at capture time and compare them when consulted.
//!
//! # Atomicity
//!
//! Every operation validates all of its arguments before touching storage.
//! A failed call leaves the graph, including its counter, unchanged.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use crate::error::{GraphError, Result};
use crate::graph::Vertex;
use crate::graph::dense::DenseGraph;
use crate::graph::index::VertexIndex;

/// Weight given to edges added through [`Graph::add_unit_edge`].
pub const DEFAULT_WEIGHT: f64 = 1.0;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Process-unique identity of a graph instance.
///
/// Clones receive a fresh id: a clone is a different graph that merely
/// starts with the same contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub(crate) struct EdgeData<E> {
    pub(crate) weight: f64,
    pub(crate) value: Option<E>,
}

/// A borrowed view of one edge.
///
/// Equality and hashing use `(source, target)` only; weight and value are
/// payload.
#[derive(Debug)]
pub struct Edge<'a, V, E> {
    source: &'a V,
    target: &'a V,
    weight: f64,
    value: Option<&'a E>,
}

impl<'a, V, E> Edge<'a, V, E> {
    #[must_use]
    pub const fn source(&self) -> &'a V {
        self.source
    }

    #[must_use]
    pub const fn target(&self) -> &'a V {
        self.target
    }

    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    #[must_use]
    pub const fn value(&self) -> Option<&'a E> {
        self.value
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool
    where
        V: PartialEq,
    {
        self.source == self.target
    }
}

impl<V, E> Clone for Edge<'_, V, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, E> Copy for Edge<'_, V, E> {}

impl<V: PartialEq, E> PartialEq for Edge<'_, V, E> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target
    }
}

impl<V: Eq, E> Eq for Edge<'_, V, E> {}

impl<V: Hash, E> Hash for Edge<'_, V, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
    }
}

/// Reject weights that are non-finite or not strictly positive.
///
/// # Errors
///
/// Returns [`GraphError::InvalidWeight`] for `weight <= 0`, NaN or infinity.
pub fn validate_weight(weight: f64) -> Result<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidWeight { weight })
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A mutable directed graph.
///
/// Backed by a `petgraph` [`StableDiGraph`] plus a vertex → node-index map,
/// so removals never invalidate the indices of surviving vertices.
#[derive(Debug)]
pub struct Graph<V, E = ()> {
    id: GraphId,
    inner: StableDiGraph<V, EdgeData<E>>,
    nodes: HashMap<V, NodeIndex>,
    mod_count: u64,
}

impl<V: Vertex, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex, E: Clone> Clone for Graph<V, E> {
    fn clone(&self) -> Self {
        Self {
            id: GraphId::next(),
            inner: self.inner.clone(),
            nodes: self.nodes.clone(),
            mod_count: self.mod_count,
        }
    }
}

impl<V: Vertex> Graph<V, ()> {
    /// Build a graph from `(source, target, weight)` triples, adding
    /// endpoints as they are first seen.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidWeight`] on the first invalid weight.
    pub fn from_weighted_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, V, f64)>,
    {
        let mut graph = Self::new();
        for (source, target, weight) in edges {
            validate_weight(weight)?;
            graph.ensure_vertex(source.clone());
            graph.ensure_vertex(target.clone());
            graph.add_edge(&source, &target, weight)?;
        }
        Ok(graph)
    }
}

impl<V: Vertex, E> Graph<V, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    #[must_use]
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            id: GraphId::next(),
            inner: StableDiGraph::with_capacity(vertices, edges),
            nodes: HashMap::with_capacity(vertices),
            mod_count: 0,
        }
    }

    #[must_use]
    pub const fn id(&self) -> GraphId {
        self.id
    }

    /// Monotonic modification counter.
    #[must_use]
    pub const fn mod_count(&self) -> u64 {
        self.mod_count
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains_vertex(&self, v: &V) -> bool {
        self.nodes.contains_key(v)
    }

    #[must_use]
    pub fn contains_edge(&self, source: &V, target: &V) -> bool {
        self.find(source, target).is_some()
    }

    /// All vertices, in storage order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.inner.node_indices().filter_map(|n| self.inner.node_weight(n))
    }

    /// All edges, in storage order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_, V, E>> {
        self.inner.edge_indices().filter_map(|e| self.edge_view(e))
    }

    /// Add a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateVertex`] if `v` is already present.
    pub fn add_vertex(&mut self, v: V) -> Result<()> {
        if self.nodes.contains_key(&v) {
            return Err(GraphError::DuplicateVertex(format!("{v:?}")));
        }
        self.ensure_vertex(v);
        Ok(())
    }

    /// Add `v` unless present. Returns `true` if it was inserted.
    pub fn ensure_vertex(&mut self, v: V) -> bool {
        if self.nodes.contains_key(&v) {
            return false;
        }
        let idx = self.inner.add_node(v.clone());
        self.nodes.insert(v, idx);
        self.bump();
        true
    }

    /// Remove a vertex together with every edge incident to it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `v` is not in this graph.
    pub fn remove_vertex(&mut self, v: &V) -> Result<()> {
        let idx = self.node(v)?;
        self.inner.remove_node(idx);
        self.nodes.remove(v);
        self.bump();
        Ok(())
    }

    /// Add (or replace) the edge `source → target` with no value.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidWeight`] or [`GraphError::UnknownVertex`];
    /// the graph is untouched in either case.
    pub fn add_edge(&mut self, source: &V, target: &V, weight: f64) -> Result<Edge<'_, V, E>> {
        self.insert_edge(source, target, weight, None)
    }

    /// [`Graph::add_edge`] with [`DEFAULT_WEIGHT`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if either endpoint is absent.
    pub fn add_unit_edge(&mut self, source: &V, target: &V) -> Result<Edge<'_, V, E>> {
        self.insert_edge(source, target, DEFAULT_WEIGHT, None)
    }

    /// Add (or replace) the edge `source → target` carrying `value`.
    ///
    /// # Errors
    ///
    /// See [`Graph::add_edge`].
    pub fn add_edge_with_value(
        &mut self,
        source: &V,
        target: &V,
        weight: f64,
        value: E,
    ) -> Result<Edge<'_, V, E>> {
        self.insert_edge(source, target, weight, Some(value))
    }

    fn insert_edge(
        &mut self,
        source: &V,
        target: &V,
        weight: f64,
        value: Option<E>,
    ) -> Result<Edge<'_, V, E>> {
        validate_weight(weight)?;
        let s = self.node(source)?;
        let t = self.node(target)?;

        let e = self.upsert_raw(s, t, EdgeData { weight, value });
        self.bump();
        self.edge_view(e)
            .ok_or_else(|| GraphError::unknown_edge(source, target))
    }

    /// Remove the edge `source → target`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] for an absent endpoint and
    /// [`GraphError::UnknownEdge`] when both exist but are not connected.
    pub fn remove_edge(&mut self, source: &V, target: &V) -> Result<()> {
        let e = self.edge_index(source, target)?;
        self.inner.remove_edge(e);
        self.bump();
        Ok(())
    }

    /// Change the weight of an existing edge, keeping its value.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidWeight`], [`GraphError::UnknownVertex`]
    /// or [`GraphError::UnknownEdge`].
    pub fn set_weight(&mut self, source: &V, target: &V, weight: f64) -> Result<()> {
        validate_weight(weight)?;
        let e = self.edge_index(source, target)?;
        if let Some(data) = self.inner.edge_weight_mut(e) {
            data.weight = weight;
        }
        self.bump();
        Ok(())
    }

    #[must_use]
    pub fn edge(&self, source: &V, target: &V) -> Option<Edge<'_, V, E>> {
        self.find(source, target).and_then(|e| self.edge_view(e))
    }

    #[must_use]
    pub fn edge_weight(&self, source: &V, target: &V) -> Option<f64> {
        self.edge(source, target).map(|e| e.weight())
    }

    #[must_use]
    pub fn edge_value(&self, source: &V, target: &V) -> Option<&E> {
        self.edge(source, target).and_then(|e| e.value())
    }

    /// Outbound edges of `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `v` is absent.
    pub fn adjacent_out<'a>(
        &'a self,
        v: &V,
    ) -> Result<impl Iterator<Item = Edge<'a, V, E>> + use<'a, V, E>> {
        self.adjacent(v, Direction::Outgoing)
    }

    /// Inbound edges of `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `v` is absent.
    pub fn adjacent_in<'a>(
        &'a self,
        v: &V,
    ) -> Result<impl Iterator<Item = Edge<'a, V, E>> + use<'a, V, E>> {
        self.adjacent(v, Direction::Incoming)
    }

    fn adjacent<'a>(
        &'a self,
        v: &V,
        dir: Direction,
    ) -> Result<impl Iterator<Item = Edge<'a, V, E>> + use<'a, V, E>> {
        let n = self.node(v)?;
        Ok(self
            .inner
            .edges_directed(n, dir)
            .filter_map(move |e| self.edge_view(e.id())))
    }

    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `v` is absent.
    pub fn out_degree(&self, v: &V) -> Result<usize> {
        Ok(self.adjacent_out(v)?.count())
    }

    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `v` is absent.
    pub fn in_degree(&self, v: &V) -> Result<usize> {
        Ok(self.adjacent_in(v)?.count())
    }

    /// Sum of outbound edge weights of `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `v` is absent.
    pub fn out_weight_sum(&self, v: &V) -> Result<f64> {
        Ok(self.adjacent_out(v)?.map(|e| e.weight()).sum())
    }

    /// Sum of inbound edge weights of `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `v` is absent.
    pub fn in_weight_sum(&self, v: &V) -> Result<f64> {
        Ok(self.adjacent_in(v)?.map(|e| e.weight()).sum())
    }

    /// Sorted vertex numbering of the current vertex set.
    #[must_use]
    pub fn vertex_index(&self) -> VertexIndex<V> {
        VertexIndex::from_vertices(self.vertices().cloned())
    }

    /// Index-addressed adjacency snapshot of the current state.
    #[must_use]
    pub fn dense(&self) -> DenseGraph<V> {
        DenseGraph::from_graph(self)
    }

    // -----------------------------------------------------------------------
    // Crate-internal plumbing (shared with the undirected wrapper)
    // -----------------------------------------------------------------------

    pub(crate) fn node(&self, v: &V) -> Result<NodeIndex> {
        self.nodes
            .get(v)
            .copied()
            .ok_or_else(|| GraphError::unknown_vertex(v))
    }

    pub(crate) fn find(&self, source: &V, target: &V) -> Option<EdgeIndex> {
        let s = self.nodes.get(source)?;
        let t = self.nodes.get(target)?;
        self.inner.find_edge(*s, *t)
    }

    pub(crate) fn edge_index(&self, source: &V, target: &V) -> Result<EdgeIndex> {
        let s = self.node(source)?;
        let t = self.node(target)?;
        self.inner
            .find_edge(s, t)
            .ok_or_else(|| GraphError::unknown_edge(source, target))
    }

    pub(crate) fn upsert_raw(&mut self, s: NodeIndex, t: NodeIndex, data: EdgeData<E>) -> EdgeIndex {
        self.inner.update_edge(s, t, data)
    }

    pub(crate) fn remove_raw(&mut self, e: EdgeIndex) {
        self.inner.remove_edge(e);
    }

    pub(crate) fn edge_data_mut(&mut self, e: EdgeIndex) -> Option<&mut EdgeData<E>> {
        self.inner.edge_weight_mut(e)
    }

    pub(crate) fn edge_data(&self, e: EdgeIndex) -> Option<&EdgeData<E>> {
        self.inner.edge_weight(e)
    }

    pub(crate) fn bump(&mut self) {
        self.mod_count += 1;
    }

    fn edge_view(&self, e: EdgeIndex) -> Option<Edge<'_, V, E>> {
        let (s, t) = self.inner.edge_endpoints(e)?;
        let data = self.inner.edge_weight(e)?;
        Some(Edge {
            source: self.inner.node_weight(s)?,
            target: self.inner.node_weight(t)?,
            weight: data.weight,
            value: data.value.as_ref(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
