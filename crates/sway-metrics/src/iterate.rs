//! Generic fixed-point iteration with periodicity detection.
//!
//! # Overview
//!
//! Every convergence-based scorer in this crate has the shape
//!
//! ```text
//! state_{n+1} = step(state_n)
//! ```
//!
//! and supplies only `step` and a `converges(previous, next)` predicate.
//! [`iterate`] drives the loop and stops at the first of:
//!
//! 1. `converges(state_n, state_{n+1})`: epsilon convergence;
//! 2. `state_{n+1}` is bit-identical to a state in the history window:
//!    the iteration has entered a cycle (a fixed point is a cycle of
//!    period 1);
//! 3. the optional iteration ceiling is reached, giving
//!    [`GraphError::DidNotConverge`].
//!
//! # History window
//!
//! The window keeps the most recent distinct states in insertion order,
//! starting at [`INITIAL_HISTORY`] entries and evicting the oldest when full,
//! so memory stays at O(window · |V|). Every [`REPS_INCREASE`] iterations
//! without termination the window doubles, which lets longer periods be
//! recognised eventually.
//!
//! # Known limitation
//!
//! Detection is a heuristic, not a proof: a period longer than the current
//! window goes unnoticed until the window has grown past it. The ceiling
//! turns the remaining liveness risk into an error instead of an endless
//! loop.

use std::collections::VecDeque;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace, warn};

use sway_core::{GraphError, GraphState, Result, StateValue, Vertex};

/// Starting size of the history window.
pub const INITIAL_HISTORY: usize = 2;

/// Iterations between doublings of the history window.
pub const REPS_INCREASE: usize = 500;

/// Default hard iteration ceiling.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning for the fixed-point driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationConfig {
    /// Starting history window size. Default: 2.
    #[serde(default = "default_initial_history")]
    pub initial_history: usize,
    /// Iterations between window doublings. Default: 500.
    #[serde(default = "default_growth_interval")]
    pub growth_interval: usize,
    /// Hard ceiling; `None` iterates until convergence or periodicity.
    /// Default: 1,000,000. Written as `0` in config files, which have no
    /// way to spell `None`.
    #[serde(
        default = "default_max_iterations",
        deserialize_with = "ceiling_from_config",
        serialize_with = "ceiling_to_config"
    )]
    pub max_iterations: Option<usize>,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            initial_history: INITIAL_HISTORY,
            growth_interval: REPS_INCREASE,
            max_iterations: default_max_iterations(),
        }
    }
}

impl IterationConfig {
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] for a zero window, a zero
    /// growth interval or a zero ceiling.
    pub fn validate(&self) -> Result<()> {
        if self.initial_history == 0 {
            return Err(GraphError::InvalidArgument(
                "initial_history must be > 0".to_string(),
            ));
        }
        if self.growth_interval == 0 {
            return Err(GraphError::InvalidArgument(
                "growth_interval must be > 0".to_string(),
            ));
        }
        if self.max_iterations == Some(0) {
            return Err(GraphError::InvalidArgument(
                "max_iterations must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

const fn default_initial_history() -> usize {
    INITIAL_HISTORY
}

const fn default_growth_interval() -> usize {
    REPS_INCREASE
}

#[allow(clippy::unnecessary_wraps)]
const fn default_max_iterations() -> Option<usize> {
    Some(DEFAULT_MAX_ITERATIONS)
}

fn ceiling_from_config<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<usize>, D::Error> {
    let max = usize::deserialize(deserializer)?;
    Ok((max > 0).then_some(max))
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn ceiling_to_config<S: Serializer>(
    max: &Option<usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    max.unwrap_or(0).serialize(serializer)
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Why the driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// The convergence predicate accepted the last step.
    Converged,
    /// The last state repeats the state `period` steps earlier.
    Periodic { period: usize },
}

/// Outcome of a fixed-point run.
#[derive(Debug, Clone)]
pub struct FixedPointRun<V, T> {
    /// The last computed state (`state_{n+1}`).
    pub state: GraphState<V, T>,
    /// Number of `step` applications.
    pub iterations: usize,
    pub termination: Termination,
}

impl<V, T> FixedPointRun<V, T> {
    #[must_use]
    pub const fn converged(&self) -> bool {
        matches!(self.termination, Termination::Converged)
    }
}

// ---------------------------------------------------------------------------
// History window
// ---------------------------------------------------------------------------

struct History<V, T> {
    entries: VecDeque<(u64, GraphState<V, T>)>,
    capacity: usize,
}

impl<V: Vertex, T: StateValue> History<V, T> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, fingerprint: u64, state: GraphState<V, T>) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((fingerprint, state));
    }

    /// Distance from a matching entry to the state about to be pushed.
    fn period_of(&self, fingerprint: u64, state: &GraphState<V, T>) -> Option<usize> {
        let len = self.entries.len();
        self.entries
            .iter()
            .enumerate()
            .rev()
            .find(|(_, (fp, past))| *fp == fingerprint && past == state)
            .map(|(i, _)| len - i)
    }

    fn grow(&mut self) {
        self.capacity = self.capacity.saturating_mul(2);
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Iterate `step` from `initial` until convergence or periodicity.
///
/// # Errors
///
/// - [`GraphError::InvalidArgument`] if `config` is invalid.
/// - [`GraphError::DidNotConverge`] when the ceiling is reached.
/// - Any error returned by `step`.
pub fn iterate<V, T, S, C>(
    config: &IterationConfig,
    initial: GraphState<V, T>,
    mut step: S,
    converges: C,
) -> Result<FixedPointRun<V, T>>
where
    V: Vertex,
    T: StateValue,
    S: FnMut(&GraphState<V, T>) -> Result<GraphState<V, T>>,
    C: Fn(&GraphState<V, T>, &GraphState<V, T>) -> bool,
{
    config.validate()?;

    let mut history = History::new(config.initial_history);
    history.push(initial.fingerprint(), initial.clone());
    let mut current = initial;
    let mut iterations = 0_usize;

    loop {
        if config.max_iterations.is_some_and(|max| iterations >= max) {
            warn!(iterations, "fixed-point iteration hit its ceiling");
            return Err(GraphError::DidNotConverge { iterations });
        }

        let next = step(&current)?;
        iterations += 1;

        if converges(&current, &next) {
            debug!(iterations, "fixed point reached within epsilon");
            return Ok(FixedPointRun {
                state: next,
                iterations,
                termination: Termination::Converged,
            });
        }

        let fingerprint = next.fingerprint();
        if let Some(period) = history.period_of(fingerprint, &next) {
            debug!(iterations, period, "periodic state detected");
            return Ok(FixedPointRun {
                state: next,
                iterations,
                termination: Termination::Periodic { period },
            });
        }

        history.push(fingerprint, next.clone());
        if iterations % config.growth_interval == 0 {
            history.grow();
            trace!(iterations, capacity = history.capacity, "history window grown");
        }
        current = next;
    }
}

/// Predicate accepting a step when every value moved by at most `epsilon`.
///
/// With `epsilon == 0` it never accepts, leaving termination to periodicity
/// detection (an exact fixed point is reported as period 1).
pub fn within_epsilon<V: Vertex>(
    epsilon: f64,
) -> impl Fn(&GraphState<V, f64>, &GraphState<V, f64>) -> bool {
    move |previous, next| {
        epsilon > 0.0 && previous.max_abs_diff(next).is_ok_and(|d| d <= epsilon)
    }
}

/// Reject negative or non-finite tolerances.
///
/// # Errors
///
/// Returns [`GraphError::InvalidArgument`].
pub fn validate_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_finite() && epsilon >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidArgument(format!(
            "epsilon must be finite and >= 0, got {epsilon}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use sway_core::Graph;

    fn five() -> Graph<u8> {
        let mut g = Graph::new();
        for v in 0..5 {
            g.add_vertex(v).expect("fresh vertex");
        }
        g
    }

    fn numbered(g: &Graph<u8>) -> GraphState<u8, f64> {
        GraphState::from_fn(g, |v| f64::from(*v) + 1.0)
    }

    #[test]
    fn contraction_converges() {
        let g = five();
        let run = iterate(
            &IterationConfig::default(),
            numbered(&g),
            |s| Ok(s.map(|x| x / 2.0)),
            within_epsilon(1e-9),
        )
        .expect("run");
        assert!(run.converged());
        assert!(run.state.max().expect("non-empty") < 1e-8);
    }

    #[test]
    fn alternation_is_period_two() {
        let g = five();
        let run = iterate(
            &IterationConfig::default(),
            numbered(&g),
            |s| Ok(s.map(|x| -x)),
            within_epsilon(1e-9),
        )
        .expect("run");
        assert_eq!(run.termination, Termination::Periodic { period: 2 });
        assert_eq!(run.iterations, 2);
        assert_eq!(run.state, numbered(&g));
    }

    #[test]
    fn zero_epsilon_reports_fixed_point_as_period_one() {
        let g = five();
        let run = iterate(
            &IterationConfig::default(),
            numbered(&g),
            |s| Ok(s.clone()),
            within_epsilon(0.0),
        )
        .expect("run");
        assert_eq!(run.termination, Termination::Periodic { period: 1 });
        assert_eq!(run.iterations, 1);
    }

    #[test]
    fn long_period_found_after_window_growth() {
        let g = five();
        let rotate = |s: &GraphState<u8, f64>| {
            let v = s.values();
            let rotated = (0..v.len()).map(|i| v[(i + 1) % v.len()]).collect();
            GraphState::with_values(Arc::clone(s.index()), rotated)
        };
        let run = iterate(
            &IterationConfig::default(),
            numbered(&g),
            rotate,
            within_epsilon(0.0),
        )
        .expect("run");

        assert_eq!(run.termination, Termination::Periodic { period: 5 });
        // Window is 2 until 500 iterations, 4 until 1000, then 8 >= 5.
        assert!(run.iterations > 1000 && run.iterations <= 1010, "{}", run.iterations);
    }

    #[test]
    fn ceiling_raises_did_not_converge() {
        let g = five();
        let config = IterationConfig {
            max_iterations: Some(100),
            ..IterationConfig::default()
        };
        let err = iterate(
            &config,
            numbered(&g),
            |s| Ok(s.map(|x| x + 1.0)),
            within_epsilon(0.0),
        )
        .expect_err("never repeats");
        assert_eq!(err, GraphError::DidNotConverge { iterations: 100 });
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let g = five();
        let config = IterationConfig {
            initial_history: 0,
            ..IterationConfig::default()
        };
        assert!(matches!(
            iterate(&config, numbered(&g), |s| Ok(s.clone()), within_epsilon(1e-3)),
            Err(GraphError::InvalidArgument(_))
        ));
        let zero_ceiling = IterationConfig {
            max_iterations: Some(0),
            ..IterationConfig::default()
        };
        assert!(zero_ceiling.validate().is_err());
        assert!(validate_epsilon(-1.0).is_err());
        assert!(validate_epsilon(f64::NAN).is_err());
        assert!(validate_epsilon(0.0).is_ok());
    }

    #[test]
    fn history_evicts_oldest_first() {
        let g = five();
        let mut history: History<u8, f64> = History::new(2);
        let states: Vec<GraphState<u8, f64>> =
            (0..3).map(|k| GraphState::uniform(&g, f64::from(k))).collect();
        for s in &states {
            history.push(s.fingerprint(), s.clone());
        }
        assert_eq!(history.entries.len(), 2);
        assert_eq!(history.period_of(states[0].fingerprint(), &states[0]), None);
        assert_eq!(history.period_of(states[1].fingerprint(), &states[1]), Some(2));
        assert_eq!(history.period_of(states[2].fingerprint(), &states[2]), Some(1));
    }
}
