//! Dense, sorted vertex numbering shared by states and adjacency snapshots.

use std::collections::HashMap;

use crate::graph::Vertex;

/// A sorted list of vertices with O(1) vertex → position lookup.
///
/// Positions are `0..len()` in ascending vertex order, so two indices built
/// from the same vertex set are identical regardless of insertion history.
#[derive(Debug, Clone)]
pub struct VertexIndex<V> {
    vertices: Vec<V>,
    positions: HashMap<V, usize>,
}

impl<V: Vertex> VertexIndex<V> {
    /// Build an index from any vertex iterator. Duplicates are collapsed.
    pub fn from_vertices<I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        let mut vertices: Vec<V> = vertices.into_iter().collect();
        vertices.sort_unstable();
        vertices.dedup();

        let positions = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();

        Self {
            vertices,
            positions,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn position(&self, v: &V) -> Option<usize> {
        self.positions.get(v).copied()
    }

    #[must_use]
    pub fn contains(&self, v: &V) -> bool {
        self.positions.contains_key(v)
    }

    /// Vertex at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    #[must_use]
    pub fn vertex(&self, position: usize) -> &V {
        &self.vertices[position]
    }

    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.vertices.iter()
    }
}

impl<V: PartialEq> PartialEq for VertexIndex<V> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl<V: Eq> Eq for VertexIndex<V> {}
