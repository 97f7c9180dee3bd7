//! DeGroot opinion dynamics.
//!
//! # Overview
//!
//! Each vertex holds an opinion and repeatedly replaces it with the
//! weighted average of the opinions of the vertices it points at (the
//! vertices it listens to):
//!
//! ```text
//! next(v) = Σ_{v → u} w(v, u) * prev(u) / out_weight(v)
//! ```
//!
//! A vertex with no outgoing edges listens to nobody and keeps its opinion.
//!
//! On a strongly connected aperiodic graph the opinions reach consensus. On
//! a periodic graph (e.g. a directed 2-cycle with differing opinions) they
//! oscillate and the run terminates with [`Termination::Periodic`].
//!
//! [`Termination::Periodic`]: crate::iterate::Termination::Periodic

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use sway_core::{Graph, GraphError, GraphState, Result, Vertex};

use crate::iterate::{IterationConfig, iterate, validate_epsilon, within_epsilon};

use super::ScoreRun;

/// Configuration for DeGroot dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeGrootConfig {
    /// Largest per-vertex change accepted as converged. Default: 1e-7.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for DeGrootConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
        }
    }
}

impl DeGrootConfig {
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] for a negative or non-finite
    /// epsilon.
    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)
    }
}

const fn default_epsilon() -> f64 {
    1e-7
}

/// Opinions after DeGroot updating from `initial`.
///
/// # Errors
///
/// - [`GraphError::ShapeMismatch`] if `initial` does not cover exactly the
///   vertices of `graph`.
/// - [`GraphError::InvalidArgument`] for a bad `epsilon`.
/// - [`GraphError::DidNotConverge`] if the default ceiling is reached.
pub fn degroot<V: Vertex, E>(
    graph: &Graph<V, E>,
    initial: &GraphState<V, f64>,
    epsilon: f64,
) -> Result<GraphState<V, f64>> {
    degroot_run(
        graph,
        initial,
        &DeGrootConfig { epsilon },
        &IterationConfig::default(),
    )
    .map(|run| run.state)
}

/// DeGroot dynamics with explicit driver settings.
///
/// # Errors
///
/// See [`degroot`].
#[instrument(skip(graph, initial), fields(vertices = graph.vertex_count()))]
pub fn degroot_run<V: Vertex, E>(
    graph: &Graph<V, E>,
    initial: &GraphState<V, f64>,
    config: &DeGrootConfig,
    iteration: &IterationConfig,
) -> Result<ScoreRun<V>> {
    config.validate()?;
    if !initial.covers(graph) {
        return Err(GraphError::ShapeMismatch);
    }

    let dense = graph.dense();
    let n = dense.len();
    let index = Arc::clone(dense.index());
    let out_weight = dense.out_weight_sums();

    // Both numberings sort the same vertex set, so positions line up.
    let start = GraphState::with_values(Arc::clone(&index), initial.values().to_vec())?;

    let step = |prev: &GraphState<V, f64>| {
        let opinions = prev.values();
        let next = (0..n)
            .map(|v| {
                if out_weight[v] > 0.0 {
                    let heard: f64 = dense
                        .out_edges(v)
                        .iter()
                        .map(|&(u, w)| w * opinions[u])
                        .sum();
                    heard / out_weight[v]
                } else {
                    opinions[v]
                }
            })
            .collect();
        GraphState::with_values(Arc::clone(&index), next)
    };

    iterate(iteration, start, step, within_epsilon(config.epsilon))
}
