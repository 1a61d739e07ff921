//! End-to-end tests for Prim's algorithm
//!
//! Tests cover:
//! - Known trees on hand-built graphs, for every scheme
//! - Edge cases (single vertex, disconnected graphs, custom start vertices)
//! - Graphs loaded from the edge-list text format
//! - Agreement between schemes on generated graphs

use fibonacci_prim::graph::{Cost, Edge, Graph, GraphError, VertexId};
use fibonacci_prim::prim::{minimum_spanning_tree, PrimDriver, PrimError, Scheme};
use fibonacci_prim::Adjacency;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;

// ============================================================================
// Known graphs
// ============================================================================

#[test]
fn test_square_with_diagonal() {
    let graph = Graph::from_edges(4, [(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 0, 4), (0, 2, 10)])
        .unwrap();

    for scheme in Scheme::ALL {
        let tree = minimum_spanning_tree(&graph, scheme).unwrap();
        assert_eq!(tree.total_cost, 6, "{scheme}");
        assert_eq!(tree.edges, vec![(0, 1), (1, 2), (2, 3)], "{scheme}");
    }
}

#[test]
fn test_textbook_graph() {
    // Nine-vertex example graph; its MST costs 37.
    let graph = Graph::from_edges(
        9,
        [
            (0, 1, 4),
            (0, 7, 8),
            (1, 2, 8),
            (1, 7, 11),
            (2, 3, 7),
            (2, 8, 2),
            (2, 5, 4),
            (3, 4, 9),
            (3, 5, 14),
            (4, 5, 10),
            (5, 6, 2),
            (6, 7, 1),
            (6, 8, 6),
            (7, 8, 7),
        ],
    )
    .unwrap();

    for scheme in Scheme::ALL {
        for start in 0..9 {
            let tree = PrimDriver::new(&graph).start(start).run(scheme).unwrap();
            assert_eq!(tree.total_cost, 37, "{scheme} from {start}");
            assert_eq!(tree.edges.len(), 8);
            assert_eq!(tree.edges[0].0, start);
        }
    }
}

#[test]
fn test_star_graph() {
    let graph = Graph::from_edges(6, (1..6usize).map(|v| (0, v, v as Cost))).unwrap();

    for scheme in Scheme::ALL {
        let tree = PrimDriver::new(&graph).start(4).run(scheme).unwrap();
        assert_eq!(tree.total_cost, 15, "{scheme}");
        assert_eq!(tree.edges, vec![(4, 0), (0, 1), (0, 2), (0, 3), (0, 5)], "{scheme}");
    }
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn test_single_vertex_is_trivial() {
    let graph = Graph::new(1);
    for scheme in Scheme::ALL {
        let tree = minimum_spanning_tree(&graph, scheme).unwrap();
        assert_eq!(tree.total_cost, 0);
        assert!(tree.edges.is_empty());
    }
}

#[test]
fn test_disconnected_graph_exhausts_frontier() {
    // Triangle plus an isolated pair.
    let graph = Graph::from_edges(5, [(0, 1, 1), (1, 2, 1), (0, 2, 1), (3, 4, 1)]).unwrap();

    for scheme in Scheme::ALL {
        assert_eq!(
            minimum_spanning_tree(&graph, scheme),
            Err(PrimError::HeapExhausted {
                settled: 3,
                vertices: 5
            }),
            "{scheme}"
        );
        assert_eq!(
            PrimDriver::new(&graph).start(4).run(scheme),
            Err(PrimError::HeapExhausted {
                settled: 2,
                vertices: 5
            }),
            "{scheme}"
        );
    }
}

#[test]
fn test_isolated_vertex() {
    let graph = Graph::from_edges(3, [(0, 1, 3)]).unwrap();
    let err = minimum_spanning_tree(&graph, Scheme::LazyInsert).unwrap_err();
    assert!(err.to_string().contains("not connected"));
}

#[test]
fn test_start_out_of_range() {
    let graph = Graph::from_edges(2, [(0, 1, 3)]).unwrap();
    for scheme in Scheme::ALL {
        assert_eq!(
            PrimDriver::new(&graph).start(2).run(scheme),
            Err(PrimError::StartOutOfRange {
                start: 2,
                vertices: 2
            })
        );
    }
}

#[test]
fn test_equal_costs() {
    let graph = Graph::from_edges(
        4,
        [(0, 1, 5), (0, 2, 5), (0, 3, 5), (1, 2, 5), (2, 3, 5), (1, 3, 5)],
    )
    .unwrap();

    for scheme in Scheme::ALL {
        let tree = minimum_spanning_tree(&graph, scheme).unwrap();
        assert_eq!(tree.total_cost, 15);
        assert_eq!(tree.edges.len(), 3);
    }
}

// ============================================================================
// Custom adjacency providers
// ============================================================================

/// Complete graph where the cost of `{u, v}` is `|u - v|`
struct Ladder {
    adjacency: Vec<Vec<Edge>>,
}

impl Ladder {
    fn new(n: usize) -> Self {
        let adjacency = (0..n)
            .map(|u| {
                (0..n)
                    .filter(|&v| v != u)
                    .map(|v| Edge {
                        source: u,
                        dest: v,
                        cost: u.abs_diff(v) as Cost,
                    })
                    .collect()
            })
            .collect();
        Ladder { adjacency }
    }
}

impl Adjacency for Ladder {
    fn num_vertices(&self) -> usize {
        self.adjacency.len()
    }

    fn neighbors(&self, vertex: VertexId) -> &[Edge] {
        &self.adjacency[vertex]
    }
}

#[test]
fn test_custom_adjacency() {
    let ladder = Ladder::new(30);
    for scheme in Scheme::ALL {
        let tree = minimum_spanning_tree(&ladder, scheme).unwrap();
        assert_eq!(tree.total_cost, 29, "{scheme}");
    }
}

// ============================================================================
// Graph files
// ============================================================================

const SAMPLE: &str = "\
5 7
0 1 2
0 3 6
1 2 3
1 3 8
1 4 5
2 4 7
3 4 9
";

#[test]
fn test_parsed_graph() {
    let graph = Graph::parse(SAMPLE).unwrap();
    assert_eq!(graph.num_vertices(), 5);
    assert_eq!(graph.num_edges(), 7);

    for scheme in Scheme::ALL {
        let tree = minimum_spanning_tree(&graph, scheme).unwrap();
        assert_eq!(tree.total_cost, 16, "{scheme}");
        assert_eq!(tree.edges, vec![(0, 1), (1, 2), (1, 4), (0, 3)], "{scheme}");
    }
}

#[test]
fn test_graph_from_file() {
    let path = std::env::temp_dir().join(format!("fibonacci-prim-{}.txt", std::process::id()));
    fs::write(&path, SAMPLE).unwrap();
    let graph = Graph::from_file(&path);
    fs::remove_file(&path).unwrap();

    let tree = minimum_spanning_tree(&graph.unwrap(), Scheme::DecreaseKey).unwrap();
    assert_eq!(tree.total_cost, 16);
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("fibonacci-prim-does-not-exist.txt");
    assert!(matches!(Graph::from_file(&path), Err(GraphError::Io(_))));
}

#[test]
fn test_truncated_file() {
    let truncated = &SAMPLE[..SAMPLE.len() - 6];
    assert!(matches!(Graph::parse(truncated), Err(GraphError::Parse { .. })));
}

// ============================================================================
// Generated graphs
// ============================================================================

#[test]
fn test_random_graphs_schemes_agree() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for (vertices, density) in [(10, 50.0), (100, 10.0), (250, 5.0), (60, 100.0)] {
        let graph = Graph::random_connected(vertices, density, &mut rng).unwrap();
        let costs: Vec<_> = Scheme::ALL
            .iter()
            .map(|&scheme| minimum_spanning_tree(&graph, scheme).unwrap().total_cost)
            .collect();
        assert!(
            costs.windows(2).all(|pair| pair[0] == pair[1]),
            "{vertices} vertices at {density}%: {costs:?}"
        );
    }
}

#[test]
fn test_seeded_graphs_are_reproducible() {
    let a = Graph::random_connected(80, 20.0, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
    let b = Graph::random_connected(80, 20.0, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();

    for v in 0..80 {
        assert_eq!(a.neighbors(v), b.neighbors(v));
    }
    assert_eq!(
        minimum_spanning_tree(&a, Scheme::LazyInsert),
        minimum_spanning_tree(&b, Scheme::LazyInsert)
    );
}
