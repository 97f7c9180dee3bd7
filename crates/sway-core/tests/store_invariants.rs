//! Property tests for the graph store's mutation contract.
//!
//! Random operation sequences (including invalid weights and unknown
//! vertices) are replayed against a [`Graph`] and an [`UndirectedGraph`];
//! after every step the weight, atomicity and symmetry invariants must hold.

use proptest::prelude::*;

use sway_core::{Graph, GraphError, UndirectedGraph};

#[derive(Debug, Clone)]
enum Op {
    AddVertex(u8),
    RemoveVertex(u8),
    AddEdge(u8, u8, f64),
    RemoveEdge(u8, u8),
    SetWeight(u8, u8, f64),
}

fn weight() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => 0.01_f64..10.0,
        1 => Just(0.0),
        1 => -5.0_f64..0.0,
        1 => Just(f64::NAN),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0_u8..8).prop_map(Op::AddVertex),
        (0_u8..8).prop_map(Op::RemoveVertex),
        (0_u8..8, 0_u8..8, weight()).prop_map(|(a, b, w)| Op::AddEdge(a, b, w)),
        (0_u8..8, 0_u8..8).prop_map(|(a, b)| Op::RemoveEdge(a, b)),
        (0_u8..8, 0_u8..8, weight()).prop_map(|(a, b, w)| Op::SetWeight(a, b, w)),
    ]
}

fn apply(g: &mut Graph<u8>, op: &Op) -> Result<(), GraphError> {
    match *op {
        Op::AddVertex(v) => g.add_vertex(v),
        Op::RemoveVertex(v) => g.remove_vertex(&v),
        Op::AddEdge(a, b, w) => g.add_edge(&a, &b, w).map(|_| ()),
        Op::RemoveEdge(a, b) => g.remove_edge(&a, &b),
        Op::SetWeight(a, b, w) => g.set_weight(&a, &b, w),
    }
}

fn apply_undirected(g: &mut UndirectedGraph<u8>, op: &Op) -> Result<(), GraphError> {
    match *op {
        Op::AddVertex(v) => g.add_vertex(v),
        Op::RemoveVertex(v) => g.remove_vertex(&v),
        Op::AddEdge(a, b, w) => g.add_edge(&a, &b, w),
        Op::RemoveEdge(a, b) => g.remove_edge(&a, &b),
        Op::SetWeight(a, b, w) => g.set_weight(&a, &b, w),
    }
}

fn edge_snapshot(g: &Graph<u8>) -> Vec<(u8, u8, u64)> {
    let mut edges: Vec<(u8, u8, u64)> = g
        .edges()
        .map(|e| (*e.source(), *e.target(), e.weight().to_bits()))
        .collect();
    edges.sort_unstable();
    edges
}

proptest! {
    #[test]
    fn weights_stay_positive_and_failures_change_nothing(ops in proptest::collection::vec(op(), 0..80)) {
        let mut g: Graph<u8> = Graph::new();
        for op in &ops {
            let before_count = g.mod_count();
            let before_edges = edge_snapshot(&g);
            let before_vertices = g.vertex_count();

            match apply(&mut g, op) {
                Ok(()) => prop_assert!(g.mod_count() > before_count),
                Err(_) => {
                    prop_assert_eq!(g.mod_count(), before_count);
                    prop_assert_eq!(edge_snapshot(&g), before_edges);
                    prop_assert_eq!(g.vertex_count(), before_vertices);
                }
            }

            for e in g.edges() {
                prop_assert!(e.weight() > 0.0 && e.weight().is_finite());
                prop_assert!(g.contains_vertex(e.source()));
                prop_assert!(g.contains_vertex(e.target()));
            }
        }
    }

    #[test]
    fn undirected_adjacency_stays_symmetric(ops in proptest::collection::vec(op(), 0..80)) {
        let mut g: UndirectedGraph<u8> = UndirectedGraph::new();
        for op in &ops {
            let _ = apply_undirected(&mut g, op);
            let d = g.as_directed();
            for e in d.edges() {
                prop_assert_eq!(d.edge_weight(e.target(), e.source()), Some(e.weight()));
            }
        }
    }
}
