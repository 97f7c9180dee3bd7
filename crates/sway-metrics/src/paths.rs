//! Shortest paths: Dijkstra with tie tracking, all-pairs, Floyd–Warshall.
//!
//! # Overview
//!
//! [`dijkstra`] is the standard min-heap algorithm with one extension: when
//! a candidate distance *equals* the best known distance, its predecessor is
//! recorded as an additional parent. Every target therefore knows all of
//! its parents on minimum-length paths, and every distinct shortest path can
//! be rebuilt by walking all parent branches back to the source.
//!
//! The number of such paths can be exponential in the graph size, so
//! [`ShortestPaths::paths_to`] enumerates them lazily, and
//! [`ShortestPaths::path_count`] counts them without enumeration.
//!
//! Ties use exact `f64` equality: distances that differ in the last bit
//! are different distances.
//!
//! [`all_pairs`] runs Dijkstra from every vertex. [`floyd_warshall`] is the
//! O(V³) dynamic program, kept as an independent cross-check.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use fixedbitset::FixedBitSet;
use serde::Serialize;
use tracing::{debug, instrument};

use sway_core::{DenseGraph, Graph, GraphError, Result, Vertex, VertexIndex, VertexPair};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One minimum-length path, source first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexSequence<V> {
    pub vertices: Vec<V>,
    /// Sum of edge weights along the path.
    pub distance: f64,
}

impl<V> VertexSequence<V> {
    /// Number of edges on the path.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

/// Single-source result of [`dijkstra`].
#[derive(Debug, Clone)]
pub struct ShortestPaths<V> {
    index: Arc<VertexIndex<V>>,
    source: usize,
    /// `f64::INFINITY` for unreachable positions.
    distances: Vec<f64>,
    /// Every predecessor on a minimum-length path, by position.
    parents: Vec<Vec<usize>>,
}

impl<V: Vertex> ShortestPaths<V> {
    #[must_use]
    pub fn source(&self) -> &V {
        self.index.vertex(self.source)
    }

    /// Minimum distance to `target`, `None` if unreachable or unknown.
    #[must_use]
    pub fn distance(&self, target: &V) -> Option<f64> {
        self.index
            .position(target)
            .map(|t| self.distances[t])
            .filter(|d| d.is_finite())
    }

    #[must_use]
    pub fn is_reachable(&self, target: &V) -> bool {
        self.distance(target).is_some()
    }

    /// `(vertex, distance)` for every reachable vertex, source included.
    pub fn distances(&self) -> impl Iterator<Item = (&V, f64)> {
        self.index
            .iter()
            .zip(self.distances.iter().copied())
            .filter(|(_, d)| d.is_finite())
    }

    /// All predecessors of `target` on minimum-length paths.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `target` was not in the graph.
    pub fn parents(&self, target: &V) -> Result<Vec<&V>> {
        let t = self.position_of(target)?;
        Ok(self.parents[t]
            .iter()
            .map(|&p| self.index.vertex(p))
            .collect())
    }

    /// Number of distinct minimum-length paths to `target`; `0` when
    /// unreachable, `1` for the source itself. Saturates at `u128::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `target` was not in the graph.
    pub fn path_count(&self, target: &V) -> Result<u128> {
        let target = self.position_of(target)?;
        if !self.distances[target].is_finite() {
            return Ok(0);
        }

        let mut order: Vec<usize> = (0..self.distances.len())
            .filter(|&v| self.distances[v].is_finite())
            .collect();
        order.sort_by(|&lhs, &rhs| self.distances[lhs].total_cmp(&self.distances[rhs]));

        // Parents are strictly closer, so they are counted first.
        let mut counts = vec![0_u128; self.distances.len()];
        counts[self.source] = 1;
        for v in order {
            if v == self.source {
                continue;
            }
            counts[v] = self.parents[v]
                .iter()
                .fold(0_u128, |acc, &p| acc.saturating_add(counts[p]));
        }
        Ok(counts[target])
    }

    /// Lazily enumerate every minimum-length path to `target`.
    ///
    /// Yields nothing when `target` is unreachable and the one-vertex path
    /// when `target` is the source.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownVertex`] if `target` was not in the graph.
    pub fn paths_to(&self, target: &V) -> Result<PathIter<'_, V>> {
        let t = self.position_of(target)?;
        Ok(PathIter {
            paths: self,
            distance: self.distances[t],
            stack: vec![(t, 0)],
        })
    }

    fn position_of(&self, v: &V) -> Result<usize> {
        self.index
            .position(v)
            .ok_or_else(|| GraphError::unknown_vertex(v))
    }
}

/// Depth-first walk over parent branches; see [`ShortestPaths::paths_to`].
#[derive(Debug)]
pub struct PathIter<'a, V> {
    paths: &'a ShortestPaths<V>,
    distance: f64,
    /// `(position, next parent to try)`, target at the bottom.
    stack: Vec<(usize, usize)>,
}

impl<V: Vertex> Iterator for PathIter<'_, V> {
    type Item = VertexSequence<V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, next_parent) = self.stack.last_mut()?;
            let node = *node;

            if node == self.paths.source {
                let vertices = self
                    .stack
                    .iter()
                    .rev()
                    .map(|&(v, _)| self.paths.index.vertex(v).clone())
                    .collect();
                self.stack.pop();
                return Some(VertexSequence {
                    vertices,
                    distance: self.distance,
                });
            }

            match self.paths.parents[node].get(*next_parent) {
                Some(&parent) => {
                    *next_parent += 1;
                    self.stack.push((parent, 0));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Distances between every ordered pair `(from, to)` where `to` is reachable
/// from `from`.
#[derive(Debug, Clone)]
pub struct AllPairs<V> {
    index: Arc<VertexIndex<V>>,
    distances: HashMap<VertexPair<V>, f64>,
}

impl<V: Vertex> AllPairs<V> {
    /// Distance from `from` to `to`; `None` if unreachable or unknown.
    #[must_use]
    pub fn distance(&self, from: &V, to: &V) -> Option<f64> {
        self.distances
            .get(&VertexPair::new(from.clone(), to.clone()))
            .copied()
    }

    /// Number of reachable ordered pairs, including `(v, v)`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Vertices the result was computed over, in ascending order.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        self.index.vertices()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VertexPair<V>, f64)> {
        self.distances.iter().map(|(pair, &d)| (pair, d))
    }

    /// `(target, distance)` for every vertex reachable from `from`, `from`
    /// itself excluded.
    pub fn distances_from<'a>(&'a self, from: &'a V) -> impl Iterator<Item = (&'a V, f64)> {
        self.index
            .iter()
            .filter(move |to| *to != from)
            .filter_map(move |to| self.distance(from, to).map(|d| (to, d)))
    }

    /// Largest absolute distance difference against `other`, or `None`
    /// when the two results disagree on which pairs are reachable.
    #[must_use]
    pub fn max_abs_difference(&self, other: &Self) -> Option<f64> {
        if self.distances.len() != other.distances.len() {
            return None;
        }
        self.distances.iter().try_fold(0.0_f64, |acc, (pair, &d)| {
            other.distances.get(pair).map(|&e| acc.max((d - e).abs()))
        })
    }
}

// ---------------------------------------------------------------------------
// Dijkstra
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: f64,
    position: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Reversed so the max-heap pops the smallest cost first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.position.cmp(&self.position))
    }
}

/// Single-source shortest paths from `source`, keeping tied parents.
///
/// # Errors
///
/// Returns [`GraphError::UnknownVertex`] if `source` is not in `graph`.
#[instrument(skip(graph), fields(vertices = graph.vertex_count()))]
pub fn dijkstra<V: Vertex, E>(graph: &Graph<V, E>, source: &V) -> Result<ShortestPaths<V>> {
    let dense = graph.dense();
    let s = dense
        .position(source)
        .ok_or_else(|| GraphError::unknown_vertex(source))?;
    Ok(dijkstra_dense(&dense, s))
}

fn dijkstra_dense<V: Vertex>(dense: &DenseGraph<V>, source: usize) -> ShortestPaths<V> {
    let n = dense.len();
    let mut distances = vec![f64::INFINITY; n];
    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut settled = FixedBitSet::with_capacity(n);
    let mut heap = BinaryHeap::new();

    distances[source] = 0.0;
    heap.push(Candidate {
        cost: 0.0,
        position: source,
    });

    while let Some(Candidate { cost, position: u }) = heap.pop() {
        if settled.put(u) {
            continue;
        }
        for &(v, weight) in dense.out_edges(u) {
            let candidate = cost + weight;
            match candidate.total_cmp(&distances[v]) {
                Ordering::Less => {
                    distances[v] = candidate;
                    parents[v].clear();
                    parents[v].push(u);
                    heap.push(Candidate {
                        cost: candidate,
                        position: v,
                    });
                }
                Ordering::Equal if !parents[v].contains(&u) && v != source => {
                    parents[v].push(u);
                }
                _ => {}
            }
        }
    }

    ShortestPaths {
        index: Arc::clone(dense.index()),
        source,
        distances,
        parents,
    }
}

/// Dijkstra from every vertex.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn all_pairs<V: Vertex, E>(graph: &Graph<V, E>) -> AllPairs<V> {
    let dense = graph.dense();
    let mut distances = HashMap::new();
    for s in 0..dense.len() {
        let tree = dijkstra_dense(&dense, s);
        for (t, &d) in tree.distances.iter().enumerate() {
            if d.is_finite() {
                distances.insert(
                    VertexPair::new(dense.vertex(s).clone(), dense.vertex(t).clone()),
                    d,
                );
            }
        }
    }
    debug!(pairs = distances.len(), "all-pairs shortest paths computed");
    AllPairs {
        index: Arc::clone(dense.index()),
        distances,
    }
}

// ---------------------------------------------------------------------------
// Floyd–Warshall
// ---------------------------------------------------------------------------

/// All-pairs distances by dynamic programming over a distance matrix.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.vertex_count()))]
pub fn floyd_warshall<V: Vertex, E>(graph: &Graph<V, E>) -> AllPairs<V> {
    let dense = graph.dense();
    let n = dense.len();
    let mut dist = vec![f64::INFINITY; n * n];

    for from in 0..n {
        dist[from * n + from] = 0.0;
        for &(to, weight) in dense.out_edges(from) {
            if to != from {
                dist[from * n + to] = dist[from * n + to].min(weight);
            }
        }
    }

    for via in 0..n {
        for from in 0..n {
            let head = dist[from * n + via];
            if head.is_infinite() {
                continue;
            }
            for to in 0..n {
                let candidate = head + dist[via * n + to];
                if candidate < dist[from * n + to] {
                    dist[from * n + to] = candidate;
                }
            }
        }
    }

    let mut distances = HashMap::new();
    for from in 0..n {
        for to in 0..n {
            let total = dist[from * n + to];
            if total.is_finite() {
                distances.insert(
                    VertexPair::new(dense.vertex(from).clone(), dense.vertex(to).clone()),
                    total,
                );
            }
        }
    }
    AllPairs {
        index: Arc::clone(dense.index()),
        distances,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Two equal-cost routes s→a→t and s→b→t, plus a longer direct edge.
    fn diamond() -> Graph<&'static str> {
        Graph::from_weighted_edges([
            ("s", "a", 1.0),
            ("s", "b", 2.0),
            ("a", "t", 2.0),
            ("b", "t", 1.0),
            ("s", "t", 5.0),
        ])
        .expect("edges")
    }

    #[test]
    fn tied_routes_record_both_parents() {
        let sp = dijkstra(&diamond(), &"s").expect("dijkstra");
        assert_eq!(sp.distance(&"t"), Some(3.0));
        let mut parents = sp.parents(&"t").expect("known");
        parents.sort_unstable();
        assert_eq!(parents, vec![&"a", &"b"]);
        assert_eq!(sp.path_count(&"t").expect("known"), 2);
    }

    #[test]
    fn paths_to_enumerates_each_minimum_path_once() {
        let sp = dijkstra(&diamond(), &"s").expect("dijkstra");
        let mut paths: Vec<Vec<&str>> = sp
            .paths_to(&"t")
            .expect("known")
            .map(|p| {
                assert!((p.distance - 3.0).abs() < f64::EPSILON);
                p.vertices
            })
            .collect();
        paths.sort();
        assert_eq!(paths, vec![vec!["s", "a", "t"], vec!["s", "b", "t"]]);
    }

    #[test]
    fn source_and_unreachable_targets() {
        let mut g = diamond();
        g.add_vertex("island").expect("fresh");
        let sp = dijkstra(&g, &"s").expect("dijkstra");

        assert_eq!(sp.distance(&"s"), Some(0.0));
        assert_eq!(sp.path_count(&"s").expect("known"), 1);
        let own: Vec<_> = sp.paths_to(&"s").expect("known").collect();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].vertices, vec!["s"]);
        assert_eq!(own[0].hops(), 0);

        assert_eq!(sp.distance(&"island"), None);
        assert_eq!(sp.path_count(&"island").expect("known"), 0);
        assert_eq!(sp.paths_to(&"island").expect("known").count(), 0);

        assert!(matches!(
            sp.paths_to(&"nowhere"),
            Err(GraphError::UnknownVertex(_))
        ));
        assert!(matches!(
            dijkstra(&g, &"nowhere"),
            Err(GraphError::UnknownVertex(_))
        ));
    }

    #[test]
    fn ladder_path_count_doubles_per_rung() {
        // Chain of k diamonds has 2^k shortest paths.
        let mut g: Graph<u32> = Graph::new();
        let rungs = 20;
        for r in 0..rungs {
            let (from, to) = (3 * r, 3 * (r + 1));
            for mid in [from + 1, from + 2] {
                g.ensure_vertex(from);
                g.ensure_vertex(mid);
                g.ensure_vertex(to);
                g.add_edge(&from, &mid, 1.0).expect("edge");
                g.add_edge(&mid, &to, 1.0).expect("edge");
            }
        }
        let sp = dijkstra(&g, &0).expect("dijkstra");
        let end = 3 * rungs;
        assert_eq!(sp.path_count(&end).expect("known"), 1 << rungs);
        assert_eq!(sp.distance(&end), Some(f64::from(2 * rungs)));
        // Lazy: taking a few paths does not enumerate a million.
        assert_eq!(sp.paths_to(&end).expect("known").take(3).count(), 3);
    }

    #[test]
    fn all_pairs_matches_floyd_warshall() {
        let g = diamond();
        let dijkstra_based = all_pairs(&g);
        let oracle = floyd_warshall(&g);
        assert_eq!(dijkstra_based.len(), oracle.len());
        assert_eq!(dijkstra_based.max_abs_difference(&oracle), Some(0.0));
        assert_eq!(dijkstra_based.distance(&"s", &"t"), Some(3.0));
        assert_eq!(dijkstra_based.distance(&"t", &"s"), None);
    }

    #[test]
    fn distances_from_skips_self_and_unreachable() {
        let g = diamond();
        let ap = all_pairs(&g);
        let mut from_a: Vec<(&str, f64)> = ap.distances_from(&"a").map(|(v, d)| (*v, d)).collect();
        from_a.sort_by(|x, y| x.0.cmp(y.0));
        assert_eq!(from_a, vec![("t", 2.0)]);
    }

    #[test]
    fn differing_reachability_has_no_difference() {
        let g = diamond();
        let mut h = g.clone();
        h.add_edge(&"t", &"s", 1.0).expect("edge");
        assert_eq!(all_pairs(&g).max_abs_difference(&all_pairs(&h)), None);
    }
}
