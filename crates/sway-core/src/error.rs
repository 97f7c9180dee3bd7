//! Error taxonomy shared by the graph store and every algorithm built on it.
//!
//! Variants fall into four kinds, each with a stable code prefix so callers
//! (notably the simulation layer) can branch without matching on messages:
//!
//! | prefix  | kind              | meaning                                        |
//! |---------|-------------------|------------------------------------------------|
//! | `E1xxx` | invalid argument  | rejected before any mutation takes place       |
//! | `E2xxx` | unknown entity    | the vertex/edge never existed in this graph    |
//! | `E3xxx` | stale snapshot    | a cached result no longer matches its graph    |
//! | `E4xxx` | liveness          | the fixed-point engine hit its hard ceiling    |

use thiserror::Error;

/// Errors raised by graph mutation, state arithmetic and algorithms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Edge weights must be finite and strictly positive.
    #[error("invalid edge weight {weight}: weights must be finite and > 0")]
    InvalidWeight { weight: f64 },

    /// A numeric parameter (epsilon, damping, sample size, ...) is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two states over different vertex sets were combined.
    #[error("graph states cover different vertex sets")]
    ShapeMismatch,

    #[error("unknown vertex {0}")]
    UnknownVertex(String),

    #[error("unknown edge {from} -> {to}")]
    UnknownEdge { from: String, to: String },

    #[error("vertex {0} is already present")]
    DuplicateVertex(String),

    /// The graph was mutated after a cached result was captured.
    #[error("stale snapshot: captured at modification {expected}, graph is at {found}")]
    StaleSnapshot { expected: u64, found: u64 },

    /// A cached result was consulted against a different graph instance.
    #[error("result was computed for a different graph instance")]
    ForeignGraph,

    /// The fixed-point engine exhausted its iteration ceiling.
    #[error("no convergence or periodicity detected after {iterations} iterations")]
    DidNotConverge { iterations: usize },
}

impl GraphError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidWeight { .. } => "E1001",
            Self::InvalidArgument(_) => "E1002",
            Self::ShapeMismatch => "E1003",
            Self::UnknownVertex(_) => "E2001",
            Self::UnknownEdge { .. } => "E2002",
            Self::DuplicateVertex(_) => "E2003",
            Self::StaleSnapshot { .. } => "E3001",
            Self::ForeignGraph => "E3002",
            Self::DidNotConverge { .. } => "E4001",
        }
    }

    /// `true` for the "existed but changed under us" family.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleSnapshot { .. } | Self::ForeignGraph)
    }

    /// Build an [`GraphError::UnknownVertex`] from any debuggable vertex.
    #[must_use]
    pub fn unknown_vertex<V: std::fmt::Debug>(v: &V) -> Self {
        Self::UnknownVertex(format!("{v:?}"))
    }

    #[must_use]
    pub fn unknown_edge<V: std::fmt::Debug>(source: &V, target: &V) -> Self {
        Self::UnknownEdge {
            from: format!("{source:?}"),
            to: format!("{target:?}"),
        }
    }
}

/// Result alias used across the sway crates.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::GraphError;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            GraphError::InvalidWeight { weight: 0.0 },
            GraphError::InvalidArgument(String::new()),
            GraphError::ShapeMismatch,
            GraphError::UnknownVertex(String::new()),
            GraphError::UnknownEdge {
                from: String::new(),
                to: String::new(),
            },
            GraphError::DuplicateVertex(String::new()),
            GraphError::StaleSnapshot {
                expected: 0,
                found: 1,
            },
            GraphError::ForeignGraph,
            GraphError::DidNotConverge { iterations: 0 },
        ];

        let mut seen = HashSet::new();
        for err in &all {
            assert!(seen.insert(err.code()), "duplicate code {}", err.code());
        }
    }

    #[test]
    fn stale_family_is_distinct_from_unknown_entity() {
        let stale = GraphError::StaleSnapshot {
            expected: 3,
            found: 4,
        };
        assert!(stale.is_stale());
        assert!(!GraphError::UnknownVertex("\"a\"".into()).is_stale());
        assert_eq!(
            stale.to_string(),
            "stale snapshot: captured at modification 3, graph is at 4"
        );
    }
}
