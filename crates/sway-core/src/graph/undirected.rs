//! Undirected graphs as symmetric directed graphs.
//!
//! Every edge `{a, b}` is stored as the directed pair `a → b`, `b → a` with
//! the same weight and value. Each public mutation touches both directions
//! as one logical operation and advances the modification counter once.

use crate::error::Result;
use crate::graph::Vertex;
use crate::graph::store::{DEFAULT_WEIGHT, EdgeData, Graph, GraphId, validate_weight};

/// A graph whose in- and out-adjacency are identical for every vertex.
#[derive(Debug)]
pub struct UndirectedGraph<V, E = ()> {
    inner: Graph<V, E>,
}

impl<V: Vertex, E: Clone> Clone for UndirectedGraph<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V: Vertex, E: Clone> Default for UndirectedGraph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> UndirectedGraph<V, ()> {
    /// Build from `(a, b, weight)` triples, adding endpoints as needed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeight`](crate::GraphError::InvalidWeight) on the first invalid weight.
    pub fn from_weighted_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, V, f64)>,
    {
        let mut graph = Self::new();
        for (a, b, weight) in edges {
            validate_weight(weight)?;
            graph.ensure_vertex(a.clone());
            graph.ensure_vertex(b.clone());
            graph.add_edge(&a, &b, weight)?;
        }
        Ok(graph)
    }
}

impl<V: Vertex, E: Clone> UndirectedGraph<V, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Graph::new(),
        }
    }

    /// Read-only directed projection. No edges are copied.
    #[must_use]
    pub const fn as_directed(&self) -> &Graph<V, E> {
        &self.inner
    }

    #[must_use]
    pub const fn id(&self) -> GraphId {
        self.inner.id()
    }

    #[must_use]
    pub const fn mod_count(&self) -> u64 {
        self.inner.mod_count()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.inner.vertex_count()
    }

    /// Number of undirected edges (a self-loop counts once).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner
            .edges()
            .filter(|e| e.source() <= e.target())
            .count()
    }

    #[must_use]
    pub fn contains_vertex(&self, v: &V) -> bool {
        self.inner.contains_vertex(v)
    }

    #[must_use]
    pub fn contains_edge(&self, a: &V, b: &V) -> bool {
        self.inner.contains_edge(a, b)
    }

    /// # Errors
    ///
    /// Returns [`DuplicateVertex`](crate::GraphError::DuplicateVertex) if `v` is already present.
    pub fn add_vertex(&mut self, v: V) -> Result<()> {
        self.inner.add_vertex(v)
    }

    pub fn ensure_vertex(&mut self, v: V) -> bool {
        self.inner.ensure_vertex(v)
    }

    /// # Errors
    ///
    /// Returns [`UnknownVertex`](crate::GraphError::UnknownVertex) if `v` is absent.
    pub fn remove_vertex(&mut self, v: &V) -> Result<()> {
        self.inner.remove_vertex(v)
    }

    /// Add (or replace) the edge `{a, b}`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeight`](crate::GraphError::InvalidWeight) or
    /// [`UnknownVertex`](crate::GraphError::UnknownVertex).
    pub fn add_edge(&mut self, a: &V, b: &V, weight: f64) -> Result<()> {
        self.insert_edge(a, b, weight, None)
    }

    /// [`UndirectedGraph::add_edge`] with [`DEFAULT_WEIGHT`].
    ///
    /// # Errors
    ///
    /// Returns [`UnknownVertex`](crate::GraphError::UnknownVertex) if either endpoint is absent.
    pub fn add_unit_edge(&mut self, a: &V, b: &V) -> Result<()> {
        self.insert_edge(a, b, DEFAULT_WEIGHT, None)
    }

    /// # Errors
    ///
    /// See [`UndirectedGraph::add_edge`].
    pub fn add_edge_with_value(&mut self, a: &V, b: &V, weight: f64, value: E) -> Result<()> {
        self.insert_edge(a, b, weight, Some(value))
    }

    fn insert_edge(&mut self, a: &V, b: &V, weight: f64, value: Option<E>) -> Result<()> {
        validate_weight(weight)?;
        let na = self.inner.node(a)?;
        let nb = self.inner.node(b)?;

        self.inner.upsert_raw(
            na,
            nb,
            EdgeData {
                weight,
                value: value.clone(),
            },
        );
        if na != nb {
            self.inner.upsert_raw(nb, na, EdgeData { weight, value });
        }
        self.inner.bump();
        Ok(())
    }

    /// Remove the edge `{a, b}`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownVertex`](crate::GraphError::UnknownVertex) or
    /// [`UnknownEdge`](crate::GraphError::UnknownEdge).
    pub fn remove_edge(&mut self, a: &V, b: &V) -> Result<()> {
        let forward = self.inner.edge_index(a, b)?;
        let backward = self.inner.edge_index(b, a)?;

        // Removing from a stable graph never invalidates other edge indices.
        self.inner.remove_raw(forward);
        if backward != forward {
            self.inner.remove_raw(backward);
        }
        self.inner.bump();
        Ok(())
    }

    /// Re-weight the edge `{a, b}` in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeight`](crate::GraphError::InvalidWeight),
    /// [`UnknownVertex`](crate::GraphError::UnknownVertex) or
    /// [`UnknownEdge`](crate::GraphError::UnknownEdge).
    pub fn set_weight(&mut self, a: &V, b: &V, weight: f64) -> Result<()> {
        validate_weight(weight)?;
        let forward = self.inner.edge_index(a, b)?;
        let backward = self.inner.edge_index(b, a)?;

        for e in [forward, backward] {
            if let Some(data) = self.inner.edge_data_mut(e) {
                data.weight = weight;
            }
        }
        self.inner.bump();
        Ok(())
    }

    #[must_use]
    pub fn edge_weight(&self, a: &V, b: &V) -> Option<f64> {
        let e = self.inner.find(a, b)?;
        self.inner.edge_data(e).map(|d| d.weight)
    }

    /// Neighbours of `v` with the connecting weight.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownVertex`](crate::GraphError::UnknownVertex) if `v` is absent.
    pub fn neighbors<'a>(
        &'a self,
        v: &V,
    ) -> Result<impl Iterator<Item = (&'a V, f64)> + use<'a, V, E>> {
        Ok(self
            .inner
            .adjacent_out(v)?
            .map(|e| (e.target(), e.weight())))
    }

    /// # Errors
    ///
    /// Returns [`UnknownVertex`](crate::GraphError::UnknownVertex) if `v` is absent.
    pub fn degree(&self, v: &V) -> Result<usize> {
        self.inner.out_degree(v)
    }
}

impl<V, E> AsRef<Graph<V, E>> for UndirectedGraph<V, E> {
    fn as_ref(&self) -> &Graph<V, E> {
        &self.inner
    }
}
