//! HITS (Hyperlink-Induced Topic Search).
//!
//! # Overview
//!
//! HITS computes two scores for each vertex:
//!
//! - **Authority**: how strongly good hubs point at the vertex.
//! - **Hub**: how strongly the vertex points at good authorities.
//!
//! # Algorithm
//!
//! Iterative power method (Kleinberg, 1999), unweighted:
//!
//! 1. Initialise every authority and hub score to 1.
//! 2. `auth(v) = Σ hub(u)` for all `u → v`.
//! 3. `hub(v) = Σ auth(w)` for all `v → w`, using the authorities from step 2.
//! 4. Rescale each vector so it sums to `|V|` (left at zero if it sums to zero).
//! 5. Repeat until both vectors are within epsilon, or a state repeats.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use sway_core::{Graph, GraphState, Result, StateValue, Vertex};

use crate::iterate::{FixedPointRun, IterationConfig, iterate, validate_epsilon};

/// Paired HITS scores of one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HubAuthority {
    pub authority: f64,
    pub hub: f64,
}

impl StateValue for HubAuthority {
    fn exact_eq(&self, other: &Self) -> bool {
        self.authority.exact_eq(&other.authority) && self.hub.exact_eq(&other.hub)
    }

    fn hash_exact<H: Hasher>(&self, state: &mut H) {
        self.authority.to_bits().hash(state);
        self.hub.to_bits().hash(state);
    }
}

/// Configuration for HITS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitsConfig {
    /// Bound each of authority and hub must meet. Default: 1e-7.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
        }
    }
}

impl HitsConfig {
    /// # Errors
    ///
    /// Returns [`sway_core::GraphError::InvalidArgument`] for a negative or
    /// non-finite epsilon.
    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)
    }
}

const fn default_epsilon() -> f64 {
    1e-7
}

/// Authority and hub scores of every vertex.
///
/// # Errors
///
/// - [`sway_core::GraphError::InvalidArgument`] for a bad `epsilon`.
/// - [`sway_core::GraphError::DidNotConverge`] if the default ceiling is
///   reached.
pub fn hits<V: Vertex, E>(
    graph: &Graph<V, E>,
    epsilon: f64,
) -> Result<GraphState<V, HubAuthority>> {
    hits_run(graph, &HitsConfig { epsilon }, &IterationConfig::default()).map(|run| run.state)
}

/// HITS with explicit driver settings.
///
/// # Errors
///
/// See [`hits`].
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn hits_run<V: Vertex, E>(
    graph: &Graph<V, E>,
    config: &HitsConfig,
    iteration: &IterationConfig,
) -> Result<FixedPointRun<V, HubAuthority>> {
    config.validate()?;

    let dense = graph.dense();
    let n = dense.len();
    let index = Arc::clone(dense.index());

    let initial = GraphState::with_values(
        Arc::clone(&index),
        vec![
            HubAuthority {
                authority: 1.0,
                hub: 1.0,
            };
            n
        ],
    )?;

    let step = |prev: &GraphState<V, HubAuthority>| {
        let scores = prev.values();
        let mut authority: Vec<f64> = (0..n)
            .map(|v| dense.in_edges(v).iter().map(|&(u, _)| scores[u].hub).sum())
            .collect();
        rescale(&mut authority);

        let mut hub: Vec<f64> = (0..n)
            .map(|v| dense.out_edges(v).iter().map(|&(w, _)| authority[w]).sum())
            .collect();
        rescale(&mut hub);

        let next = authority
            .into_iter()
            .zip(hub)
            .map(|(authority, hub)| HubAuthority { authority, hub })
            .collect();
        GraphState::with_values(Arc::clone(&index), next)
    };

    iterate(iteration, initial, step, both_within(config.epsilon))
}

/// Scale `values` so they sum to their count.
fn rescale(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        let factor = values.len() as f64 / total;
        for x in values.iter_mut() {
            *x *= factor;
        }
    }
}

fn both_within<V: Vertex>(
    epsilon: f64,
) -> impl Fn(&GraphState<V, HubAuthority>, &GraphState<V, HubAuthority>) -> bool {
    move |previous, next| {
        if epsilon <= 0.0 || !previous.same_shape(next) {
            return false;
        }
        previous.values().iter().zip(next.values()).all(|(a, b)| {
            (a.authority - b.authority).abs() <= epsilon && (a.hub - b.hub).abs() <= epsilon
        })
    }
}
