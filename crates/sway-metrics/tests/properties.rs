//! Property tests over random weighted digraphs.
//!
//! - SCC output is a partition whose blocks are exactly the mutual
//!   reachability classes.
//! - Dijkstra-based all-pairs agrees with Floyd–Warshall.
//! - Tie-tracked path enumeration agrees with path counting, and every
//!   enumerated path is a real minimum-length walk.
//! - DeGroot reaches consensus on strongly connected aperiodic graphs from
//!   any starting opinions.
//! - Undamped PageRank on a connected non-bipartite undirected graph is
//!   proportional to degree.

use std::collections::BTreeSet;

use proptest::prelude::*;

use sway_core::{Graph, GraphState, UndirectedGraph};
use sway_metrics::{
    DegreeMode, Kosaraju, all_pairs, degree_centrality, degroot, dijkstra, floyd_warshall,
    pagerank,
};

fn random_graph(max_vertices: u8, integral: bool) -> impl Strategy<Value = Graph<u8>> {
    (1..=max_vertices).prop_flat_map(move |n| {
        let weight = if integral {
            (1_u8..4).prop_map(f64::from).boxed()
        } else {
            (0.1_f64..10.0).boxed()
        };
        proptest::collection::vec((0..n, 0..n, weight), 0..(usize::from(n) * 3)).prop_map(
            move |edges| {
                let mut g = Graph::new();
                for v in 0..n {
                    g.ensure_vertex(v);
                }
                for (a, b, w) in edges {
                    g.add_edge(&a, &b, w).expect("positive weight");
                }
                g
            },
        )
    })
}

/// A Hamiltonian cycle `0 → 1 → … → 0` plus the chord `0 → 2` (cycles of
/// coprime lengths `n` and `n - 1`), plus random extra edges, with opinions.
fn strongly_connected_with_opinions() -> impl Strategy<Value = (Graph<u8>, Vec<f64>)> {
    (3_u8..=8).prop_flat_map(|n| {
        let extra = proptest::collection::vec((0..n, 0..n, 0.5_f64..5.0), 0..usize::from(n) * 2);
        let cycle = proptest::collection::vec(0.5_f64..5.0, usize::from(n) + 1);
        let opinions = proptest::collection::vec(-10.0_f64..10.0, usize::from(n));
        (extra, cycle, opinions).prop_map(move |(extra, cycle, opinions)| {
            let mut g = Graph::new();
            for v in 0..n {
                g.ensure_vertex(v);
            }
            for (a, b, w) in extra {
                if a != b {
                    g.add_edge(&a, &b, w).expect("positive weight");
                }
            }
            for v in 0..n {
                g.add_edge(&v, &((v + 1) % n), cycle[usize::from(v)])
                    .expect("positive weight");
            }
            g.add_edge(&0, &2, cycle[usize::from(n)]).expect("positive weight");
            (g, opinions)
        })
    })
}

/// A path `0 - 1 - … - (n-1)` closed into a triangle by `0 - 2`, plus
/// random extra unit edges.
fn connected_non_bipartite() -> impl Strategy<Value = UndirectedGraph<u8>> {
    (3_u8..=9).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n), 0..usize::from(n) * 2).prop_map(move |extra| {
            let spine = (1..n).map(|v| (v - 1, v)).chain([(0, 2)]);
            let edges = spine
                .chain(extra.into_iter().filter(|(a, b)| a != b))
                .map(|(a, b)| (a, b, 1.0));
            UndirectedGraph::from_weighted_edges(edges).expect("unit weights")
        })
    })
}

proptest! {
    #[test]
    fn scc_is_a_partition_into_reachability_classes(g in random_graph(10, false)) {
        let scc = Kosaraju::new(&g);
        let components = scc.components(&g).expect("fresh");
        let pairs = all_pairs(&g);

        let mut seen = BTreeSet::new();
        for component in components {
            prop_assert!(!component.is_empty());
            for v in component {
                prop_assert!(seen.insert(*v), "vertex {v} in two components");
            }
        }
        prop_assert_eq!(seen.len(), g.vertex_count());

        for a in g.vertices() {
            for b in g.vertices() {
                let mutual = pairs.distance(a, b).is_some() && pairs.distance(b, a).is_some();
                prop_assert_eq!(scc.connected(&g, a, b).expect("known"), mutual);
            }
        }
    }

    #[test]
    fn dijkstra_all_pairs_matches_floyd_warshall(g in random_graph(12, false)) {
        let fast = all_pairs(&g);
        let oracle = floyd_warshall(&g);
        prop_assert_eq!(fast.len(), oracle.len());
        let diff = fast.max_abs_difference(&oracle);
        prop_assert!(diff.is_some_and(|d| d <= 1e-5), "difference {diff:?}");
    }

    #[test]
    fn enumerated_paths_match_count_and_length(g in random_graph(7, true)) {
        let source = *g.vertices().min().expect("at least one vertex");
        let sp = dijkstra(&g, &source).expect("known source");

        for target in g.vertices() {
            let count = sp.path_count(target).expect("known");
            let paths: Vec<_> = sp.paths_to(target).expect("known").collect();
            prop_assert_eq!(paths.len() as u128, count);

            let distinct: BTreeSet<Vec<u8>> = paths.iter().map(|p| p.vertices.clone()).collect();
            prop_assert_eq!(distinct.len(), paths.len());

            for path in &paths {
                prop_assert_eq!(path.vertices.first(), Some(&source));
                prop_assert_eq!(path.vertices.last(), Some(target));
                let length: f64 = path
                    .vertices
                    .windows(2)
                    .map(|hop| g.edge_weight(&hop[0], &hop[1]).expect("edge on path"))
                    .sum();
                prop_assert_eq!(Some(length), sp.distance(target));
            }
        }
    }

    #[test]
    fn degroot_reaches_consensus_from_any_opinions(
        (g, opinions) in strongly_connected_with_opinions()
    ) {
        let start = GraphState::from_fn(&g, |v| opinions[usize::from(*v)]);
        let end = degroot(&g, &start, 1e-12).expect("degroot");

        let lo = end.values().iter().copied().fold(f64::INFINITY, f64::min);
        let hi = end.values().iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(hi - lo < 1e-6, "spread {} in {:?}", hi - lo, end.values());
        // Consensus is a weighted average of the starting opinions.
        let start_lo = opinions.iter().copied().fold(f64::INFINITY, f64::min);
        let start_hi = opinions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(lo >= start_lo - 1e-9 && hi <= start_hi + 1e-9);
    }

    #[test]
    fn undamped_pagerank_is_proportional_to_degree(g in connected_non_bipartite()) {
        let directed = g.as_directed();
        let scores = pagerank(directed, 0.0, 1e-12).expect("pagerank");
        let degree = degree_centrality(directed, DegreeMode::Out);

        let ratios: Vec<f64> = scores.iter().map(|(v, score)| score / degree[v]).collect();
        let lo = ratios.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = ratios.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(hi - lo < 1e-6, "ratios {ratios:?}");

        // Mass stays at |V|, so the common ratio is |V| / Σ degree.
        let expected = directed.vertex_count() as f64 / degree.sum();
        prop_assert!((ratios[0] - expected).abs() < 1e-6);
    }
}
