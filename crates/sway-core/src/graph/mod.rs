//! Graph store.
//!
//! # Overview
//!
//! ```text
//! Graph<V, E>            mutable directed store (petgraph StableDiGraph)
//!   ├─ UndirectedGraph   symmetric wrapper, as_directed() projection
//!   ├─ VertexIndex       sorted vertex numbering 0..n
//!   └─ DenseGraph        index-addressed weighted adjacency snapshot
//! ```
//!
//! Algorithms never mutate a graph. They take `&Graph`, snapshot it with
//! [`Graph::dense`] once per call and work on dense positions from there.

use std::fmt::Debug;
use std::hash::Hash;

pub mod dense;
pub mod index;
pub mod store;
pub mod undirected;

pub use dense::DenseGraph;
pub use index::VertexIndex;
pub use store::{DEFAULT_WEIGHT, Edge, Graph, GraphId, validate_weight};
pub use undirected::UndirectedGraph;

/// Requirements on a vertex identity.
///
/// Equality and hashing identify vertices; the total order makes every
/// vertex-indexed output deterministic. Blanket-implemented.
pub trait Vertex: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Vertex for T {}
