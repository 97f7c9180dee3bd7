#![forbid(unsafe_code)]
//! sway-core library.
//!
//! The in-memory graph store the sway analytics run on, the per-vertex
//! state maps they produce, and the weighted sampler generators use for
//! preferential attachment.
//!
//! # Conventions
//!
//! - **Errors**: Fallible operations return [`Result`] with a [`GraphError`].
//!   Validation happens before mutation; a failed call changes nothing.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`, `warn!`).
//! - **Randomness**: Always injected as an `&mut impl Rng` parameter.
//! - **Concurrency**: Single writer. Nothing here locks; callers must not
//!   mutate a graph while an algorithm is reading it.

pub mod error;
pub mod graph;
pub mod pair;
pub mod sample;
pub mod state;

pub use error::{GraphError, Result};
pub use graph::{
    DEFAULT_WEIGHT, DenseGraph, Edge, Graph, GraphId, UndirectedGraph, Vertex, VertexIndex,
};
pub use pair::VertexPair;
pub use sample::{select_weighted, select_weighted_default};
pub use state::{GraphState, Numeric, StateValue};
