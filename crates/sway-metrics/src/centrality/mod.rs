//! Vertex scoring.
//!
//! - [`pagerank`], [`degroot`], [`hits`]: fixed-point scores driven by
//!   [`crate::iterate`].
//! - [`basic`]: single-pass degree and distance-based scores.

pub mod basic;
pub mod degroot;
pub mod hits;
pub mod pagerank;

use crate::iterate::FixedPointRun;

/// A real-valued scoring run with its iteration metadata.
pub type ScoreRun<V> = FixedPointRun<V, f64>;

pub use basic::{
    DegreeMode, closeness_centrality, closeness_sum, decay_centrality, decay_sum,
    degree_centrality, distance_centrality, harmonic_centrality, harmonic_sum,
};
pub use degroot::{DeGrootConfig, degroot, degroot_run};
pub use hits::{HitsConfig, HubAuthority, hits, hits_run};
pub use pagerank::{PageRankConfig, pagerank, pagerank_run};
