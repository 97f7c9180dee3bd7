//! PageRank over weighted directed graphs.
//!
//! # Overview
//!
//! A vertex matters when vertices that matter point at it. Every vertex
//! starts at score 1 and each step redistributes scores along outgoing
//! edges in proportion to edge weight:
//!
//! ```text
//! next(v) = damping + (1 - damping) * Σ_{u → v} prev(u) * w(u, v) / out_weight(u)
//! ```
//!
//! `damping` is the teleport share (default 0.15): the part of a vertex's
//! score that does not depend on its in-links. Out-weight sums are computed
//! once per run; the graph must not change during it.
//!
//! # Dangling vertices
//!
//! A vertex without outgoing edges passes nothing on. Its mass is not
//! redistributed, so on graphs with dangling vertices the scores no longer
//! sum to `|V|`.
//!
//! # Termination
//!
//! Driven by [`iterate`](crate::iterate::iterate): epsilon convergence on
//! the largest per-vertex change, or a repeated state. With `damping == 0`
//! on a bipartite graph the scores oscillate and the run reports a period.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use sway_core::{Graph, GraphError, GraphState, Result, Vertex};

use crate::iterate::{IterationConfig, iterate, validate_epsilon, within_epsilon};

use super::ScoreRun;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for PageRank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Teleport share in `[0, 1]`. Default: 0.15.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Largest per-vertex change accepted as converged; `0` relies on exact
    /// repetition. Default: 1e-7.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            epsilon: default_epsilon(),
        }
    }
}

impl PageRankConfig {
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] if `damping` is outside
    /// `[0, 1]` or `epsilon` is negative or non-finite.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(GraphError::InvalidArgument(format!(
                "damping must be in [0, 1], got {}",
                self.damping
            )));
        }
        validate_epsilon(self.epsilon)
    }
}

const fn default_damping() -> f64 {
    0.15
}

const fn default_epsilon() -> f64 {
    1e-7
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// PageRank scores of every vertex.
///
/// # Errors
///
/// - [`GraphError::InvalidArgument`] for an out-of-range `damping` or
///   `epsilon`.
/// - [`GraphError::DidNotConverge`] if the default ceiling is reached.
pub fn pagerank<V: Vertex, E>(
    graph: &Graph<V, E>,
    damping: f64,
    epsilon: f64,
) -> Result<GraphState<V, f64>> {
    let config = PageRankConfig { damping, epsilon };
    pagerank_run(graph, &config, &IterationConfig::default()).map(|run| run.state)
}

/// PageRank with explicit driver settings, reporting how the run ended.
///
/// # Errors
///
/// See [`pagerank`].
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn pagerank_run<V: Vertex, E>(
    graph: &Graph<V, E>,
    config: &PageRankConfig,
    iteration: &IterationConfig,
) -> Result<ScoreRun<V>> {
    config.validate()?;

    let dense = graph.dense();
    let n = dense.len();
    let index = Arc::clone(dense.index());
    let out_weight = dense.out_weight_sums();
    let damping = config.damping;

    let initial = GraphState::with_values(Arc::clone(&index), vec![1.0; n])?;

    let step = |prev: &GraphState<V, f64>| {
        let scores = prev.values();
        let next = (0..n)
            .map(|v| {
                let inflow: f64 = dense
                    .in_edges(v)
                    .iter()
                    .map(|&(u, w)| scores[u] * w / out_weight[u])
                    .sum();
                (1.0 - damping).mul_add(inflow, damping)
            })
            .collect();
        GraphState::with_values(Arc::clone(&index), next)
    };

    iterate(iteration, initial, step, within_epsilon(config.epsilon))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterate::Termination;

    fn directed(edges: &[(&'static str, &'static str)]) -> Graph<&'static str> {
        Graph::from_weighted_edges(edges.iter().map(|&(a, b)| (a, b, 1.0))).expect("valid edges")
    }

    #[test]
    fn empty_graph_yields_empty_state() {
        let g: Graph<&str> = Graph::new();
        let scores = pagerank(&g, 0.15, 1e-7).expect("pagerank");
        assert!(scores.is_empty());
    }

    #[test]
    fn isolated_vertex_keeps_teleport_share() {
        let mut g = directed(&[("a", "b")]);
        g.add_vertex("z").expect("fresh");
        let scores = pagerank(&g, 0.15, 1e-9).expect("pagerank");
        assert!((scores[&"z"] - 0.15).abs() < 1e-12);
    }

    #[test]
    fn cycle_scores_are_uniform() {
        let g = directed(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let run = pagerank_run(&g, &PageRankConfig::default(), &IterationConfig::default())
            .expect("pagerank");
        assert!(run.converged());
        for (_, &score) in run.state.iter() {
            assert!((score - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn heavier_edge_carries_more_rank() {
        let g = Graph::from_weighted_edges([
            ("hub", "light", 1.0),
            ("hub", "heavy", 9.0),
            ("light", "hub", 1.0),
            ("heavy", "hub", 1.0),
        ])
        .expect("edges");
        let scores = pagerank(&g, 0.15, 1e-9).expect("pagerank");
        assert!(scores[&"heavy"] > scores[&"light"]);
        // heavy takes 9/10 of hub's outflow: heavy - 0.15 = 9 * (light - 0.15).
        let light = scores[&"light"] - 0.15;
        let heavy = scores[&"heavy"] - 0.15;
        assert!((heavy - 9.0 * light).abs() < 1e-6);
    }

    #[test]
    fn bipartite_oscillation_without_damping_is_periodic() {
        let g = directed(&[("a", "b"), ("b", "a"), ("a", "c"), ("c", "a")]);
        let config = PageRankConfig {
            damping: 0.0,
            epsilon: 1e-9,
        };
        let run = pagerank_run(&g, &config, &IterationConfig::default()).expect("pagerank");
        assert_eq!(run.termination, Termination::Periodic { period: 2 });
        assert_eq!(run.iterations, 2);
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let g = directed(&[("a", "b")]);
        for (damping, epsilon) in [(-0.1, 1e-7), (1.5, 1e-7), (f64::NAN, 1e-7), (0.15, -1.0)] {
            assert!(matches!(
                pagerank(&g, damping, epsilon),
                Err(GraphError::InvalidArgument(_))
            ));
        }
    }
}
