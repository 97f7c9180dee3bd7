//! Weighted sampling without replacement (Efraimidis–Spirakis).
//!
//! # Algorithm
//!
//! Each candidate `e` with weight `w_e` draws `u_e ~ Uniform(0, 1)` and gets
//! the key `u_e^(1 / w_e)`. The `k` candidates with the largest keys form the
//! sample. Heavier candidates get keys closer to 1, so inclusion probability
//! grows with weight; for `k = 1` candidate `e` wins with probability
//! `w_e / Σw`.
//!
//! Keys go into a max-heap that is popped `k` times: O(n log n) time, O(n)
//! space.
//!
//! # Randomness
//!
//! The RNG is always a parameter. For reproducible runs pass a seeded RNG
//! and an input with deterministic iteration order (e.g. a `BTreeMap`).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::Rng;
use rand_distr::{Distribution, Open01};
use tracing::trace;

use crate::error::{GraphError, Result};
use crate::graph::validate_weight;

struct Keyed<'a, K> {
    key: f64,
    item: &'a K,
}

impl<K> PartialEq for Keyed<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for Keyed<'_, K> {}

impl<K> PartialOrd for Keyed<'_, K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Keyed<'_, K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.total_cmp(&other.key)
    }
}

/// Draw `k` distinct candidates, weighted, without replacement.
///
/// `weights` yields `(candidate, weight)` pairs, e.g. `&HashMap<K, f64>` or
/// `&BTreeMap<K, f64>`. The result is ordered by descending key (the first
/// element is the candidate that "won" first).
///
/// # Errors
///
/// - [`GraphError::InvalidWeight`] if any weight is not finite and `> 0`.
/// - [`GraphError::InvalidArgument`] if `k` exceeds the number of candidates.
///
/// Both are checked before any randomness is consumed.
pub fn select_weighted<'a, K, I, R>(weights: I, k: usize, rng: &mut R) -> Result<Vec<K>>
where
    K: Clone + 'a,
    I: IntoIterator<Item = (&'a K, &'a f64)>,
    R: Rng + ?Sized,
{
    let candidates: Vec<(&K, f64)> = weights.into_iter().map(|(item, &w)| (item, w)).collect();

    for &(_, weight) in &candidates {
        validate_weight(weight)?;
    }
    if k > candidates.len() {
        return Err(GraphError::InvalidArgument(format!(
            "sample size {k} exceeds {} candidates",
            candidates.len()
        )));
    }

    let mut heap: BinaryHeap<Keyed<'_, K>> = candidates
        .into_iter()
        .map(|(item, weight)| {
            let u: f64 = Open01.sample(&mut *rng);
            Keyed {
                key: u.powf(1.0 / weight),
                item,
            }
        })
        .collect();

    trace!(candidates = heap.len(), k, "weighted reservoir draw");

    let mut selected = Vec::with_capacity(k);
    while selected.len() < k {
        match heap.pop() {
            Some(entry) => selected.push(entry.item.clone()),
            None => break,
        }
    }
    Ok(selected)
}

/// [`select_weighted`] with the thread-local RNG.
///
/// # Errors
///
/// See [`select_weighted`].
pub fn select_weighted_default<'a, K, I>(weights: I, k: usize) -> Result<Vec<K>>
where
    K: Clone + 'a,
    I: IntoIterator<Item = (&'a K, &'a f64)>,
{
    select_weighted(weights, k, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{BTreeMap, HashSet};

    fn weights(pairs: &[(&'static str, f64)]) -> BTreeMap<&'static str, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn heavier_candidate_wins_in_proportion() {
        let w = weights(&[("a", 3.0), ("b", 1.0)]);
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 20_000;
        let mut a_wins = 0;
        for _ in 0..trials {
            let pick = select_weighted(&w, 1, &mut rng).expect("valid draw");
            if pick[0] == "a" {
                a_wins += 1;
            }
        }
        let share = f64::from(a_wins) / f64::from(trials);
        assert!((share - 0.75).abs() < 0.02, "share of a = {share}");
    }

    #[test]
    fn selection_is_distinct_and_sized() {
        let w = weights(&[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        let pick = select_weighted(&w, 3, &mut rng).expect("valid draw");
        assert_eq!(pick.len(), 3);
        let unique: HashSet<_> = pick.iter().collect();
        assert_eq!(unique.len(), 3);

        let all = select_weighted(&w, 4, &mut rng).expect("k == n");
        let unique: HashSet<_> = all.into_iter().collect();
        assert_eq!(unique.len(), 4);

        assert!(select_weighted(&w, 0, &mut rng).expect("k == 0").is_empty());
    }

    #[test]
    fn same_seed_same_sample() {
        let w = weights(&[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0), ("e", 0.5)]);
        let first = select_weighted(&w, 2, &mut StdRng::seed_from_u64(99)).expect("draw");
        let second = select_weighted(&w, 2, &mut StdRng::seed_from_u64(99)).expect("draw");
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_oversized_k_and_bad_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        let w = weights(&[("a", 1.0)]);
        assert!(matches!(
            select_weighted(&w, 2, &mut rng),
            Err(GraphError::InvalidArgument(_))
        ));

        let bad = weights(&[("a", 1.0), ("b", 0.0)]);
        assert!(matches!(
            select_weighted(&bad, 1, &mut rng),
            Err(GraphError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn default_rng_variant_draws() {
        let w = weights(&[("a", 1.0), ("b", 1.0)]);
        let pick = select_weighted_default(&w, 1).expect("draw");
        assert_eq!(pick.len(), 1);
    }
}
