#![forbid(unsafe_code)]
//! sway-metrics library.
//!
//! Analytics over a [`sway_core::Graph`]: fixed-point scores (PageRank,
//! DeGroot, HITS), single-pass centralities, shortest paths and strongly
//! connected components.
//!
//! # Conventions
//!
//! - **Errors**: Algorithms return [`sway_core::Result`]; configuration
//!   loading returns `anyhow::Result` with file context.
//! - **Logging**: Use `tracing` macros. Entry points open an `instrument`
//!   span; termination of iterative runs is logged at `debug`.
//! - **Graphs are read, never written**: every algorithm takes `&Graph`
//!   and works on a [`sway_core::DenseGraph`] snapshot.

pub mod centrality;
pub mod config;
pub mod iterate;
pub mod paths;
pub mod scc;

pub use centrality::{
    DeGrootConfig, DegreeMode, HitsConfig, HubAuthority, PageRankConfig, ScoreRun,
    closeness_centrality, decay_centrality, degree_centrality, degroot, distance_centrality,
    harmonic_centrality, hits, pagerank,
};
pub use config::{AnalyticsConfig, load_config, parse_config};
pub use iterate::{FixedPointRun, IterationConfig, Termination, iterate, within_epsilon};
pub use paths::{AllPairs, ShortestPaths, VertexSequence, all_pairs, dijkstra, floyd_warshall};
pub use scc::{Kosaraju, strongly_connected_components};
pub use sway_core::{GraphError, Result};
