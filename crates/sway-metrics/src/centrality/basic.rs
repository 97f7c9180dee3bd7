//! Single-pass centralities: degree, closeness, harmonic and decay.
//!
//! # Overview
//!
//! None of these iterate. Degree counts adjacency. The distance-based
//! scores take the Dijkstra all-pairs map once and fold, for every vertex,
//! the distances to the vertices it can reach through an aggregation
//! function:
//!
//! | score     | aggregate over reachable distances `d_1..d_k` |
//! |-----------|-----------------------------------------------|
//! | closeness | `k / Σ d_i` (0 when nothing is reachable)     |
//! | harmonic  | `Σ 1 / d_i`                                   |
//! | decay(δ)  | `Σ δ^d_i`                                     |
//!
//! The vertex itself is never part of its own distance list.

use tracing::instrument;

use sway_core::{Graph, GraphError, GraphState, Result, Vertex};

use crate::paths::all_pairs;

// ---------------------------------------------------------------------------
// Degree Centrality
// ---------------------------------------------------------------------------

/// Which edges [`degree_centrality`] counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegreeMode {
    In,
    #[default]
    Out,
    /// In plus out; a self-loop counts twice.
    Total,
}

/// Number of edges at every vertex.
#[must_use]
pub fn degree_centrality<V: Vertex, E>(
    graph: &Graph<V, E>,
    mode: DegreeMode,
) -> GraphState<V, f64> {
    let dense = graph.dense();
    GraphState::from_fn(graph, |v| {
        let Some(p) = dense.position(v) else {
            return 0.0;
        };
        let count = match mode {
            DegreeMode::In => dense.in_edges(p).len(),
            DegreeMode::Out => dense.out_edges(p).len(),
            DegreeMode::Total => dense.in_edges(p).len() + dense.out_edges(p).len(),
        };
        count as f64
    })
}

// ---------------------------------------------------------------------------
// Distance-based Centrality
// ---------------------------------------------------------------------------

/// Fold each vertex's distances to every other reachable vertex through
/// `aggregate`.
///
/// `aggregate` receives the distances in ascending vertex order of the
/// targets and may receive an empty slice.
#[must_use]
#[instrument(skip(graph, aggregate), fields(vertices = graph.vertex_count()))]
pub fn distance_centrality<V, E, F>(graph: &Graph<V, E>, aggregate: F) -> GraphState<V, f64>
where
    V: Vertex,
    F: Fn(&[f64]) -> f64,
{
    let pairs = all_pairs(graph);
    let mut reach = Vec::new();
    GraphState::from_fn(graph, |v| {
        reach.clear();
        reach.extend(pairs.distances_from(v).map(|(_, d)| d));
        aggregate(&reach)
    })
}

/// `|reachable| / Σ distance`.
#[must_use]
pub fn closeness_sum(distances: &[f64]) -> f64 {
    let total: f64 = distances.iter().sum();
    if total > 0.0 {
        distances.len() as f64 / total
    } else {
        0.0
    }
}

/// `Σ 1 / distance`.
#[must_use]
pub fn harmonic_sum(distances: &[f64]) -> f64 {
    distances.iter().map(|d| d.recip()).sum()
}

/// `Σ delta^distance`.
#[must_use]
pub fn decay_sum(delta: f64) -> impl Fn(&[f64]) -> f64 {
    move |distances| distances.iter().map(|&d| delta.powf(d)).sum()
}

#[must_use]
pub fn closeness_centrality<V: Vertex, E>(graph: &Graph<V, E>) -> GraphState<V, f64> {
    distance_centrality(graph, closeness_sum)
}

#[must_use]
pub fn harmonic_centrality<V: Vertex, E>(graph: &Graph<V, E>) -> GraphState<V, f64> {
    distance_centrality(graph, harmonic_sum)
}

/// Decay centrality with factor `delta`.
///
/// # Errors
///
/// Returns [`GraphError::InvalidArgument`] unless `0 < delta < 1`.
pub fn decay_centrality<V: Vertex, E>(
    graph: &Graph<V, E>,
    delta: f64,
) -> Result<GraphState<V, f64>> {
    let in_range = delta > 0.0 && delta < 1.0;
    if !in_range {
        return Err(GraphError::InvalidArgument(format!(
            "decay factor must be in (0, 1), got {delta}"
        )));
    }
    Ok(distance_centrality(graph, decay_sum(delta)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
