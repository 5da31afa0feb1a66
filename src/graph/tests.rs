use crate::graph::{Label, PlanarGraph};
use geo_types::Coord;

fn c(x: f64, y: f64) -> Coord<f64> {
    Coord { x, y }
}

fn add(graph: &mut PlanarGraph, p0: (f64, f64), p1: (f64, f64)) {
    graph.add_segment(c(p0.0, p0.1), c(p1.0, p1.1), 0, Label::default());
}

#[test]
fn test_graph_construction() {
    let mut graph = PlanarGraph::new();
    add(&mut graph, (0.0, 0.0), (10.0, 0.0));
    add(&mut graph, (0.0, 0.0), (0.0, 10.0));

    assert_eq!(graph.nodes.len(), 3); // (0,0), (10,0), (0,10)
    assert_eq!(graph.dir_edges.len(), 4);

    // Node at (0,0) should have 2 outgoing edges
    let center = graph.find_node(c(0.0, 0.0)).unwrap();
    assert_eq!(graph.nodes[center].outgoing.len(), 2);
    assert_eq!(graph.nodes[center].degree, 2);
}

#[test]
fn test_degenerate_segment_ignored() {
    let mut graph = PlanarGraph::new();
    let e = graph.add_segment(c(1.0, 1.0), c(1.0, 1.0), 0, Label::default());
    assert!(e.is_none());
    assert_eq!(graph.dir_edges.len(), 0);
}

#[test]
fn test_edge_sorting() {
    let mut graph = PlanarGraph::new();
    // 4 edges radiating from (0,0): right, up, left, down
    add(&mut graph, (0.0, 0.0), (10.0, 0.0));
    add(&mut graph, (0.0, 0.0), (0.0, 10.0));
    add(&mut graph, (0.0, 0.0), (-10.0, 0.0));
    add(&mut graph, (0.0, 0.0), (0.0, -10.0));

    graph.sort_edges();

    let center = graph.find_node(c(0.0, 0.0)).unwrap();
    let star = &graph.nodes[center].outgoing;
    assert_eq!(star.len(), 4);

    // atan2 order: Down (-pi/2), Right (0), Up (pi/2), Left (pi)
    let get_dst = |de: usize| graph.nodes[graph.dir_edges[star[de]].dst].coordinate;

    assert_eq!(get_dst(0), c(0.0, -10.0));
    assert_eq!(get_dst(1), c(10.0, 0.0));
    assert_eq!(get_dst(2), c(0.0, 10.0));
    assert_eq!(get_dst(3), c(-10.0, 0.0));
}

#[test]
fn test_prune_dangles() {
    let mut graph = PlanarGraph::new();
    // Triangle with a two-segment tail hanging off one corner.
    add(&mut graph, (0.0, 0.0), (10.0, 0.0));
    add(&mut graph, (10.0, 0.0), (5.0, 8.0));
    add(&mut graph, (5.0, 8.0), (0.0, 0.0));
    add(&mut graph, (10.0, 0.0), (15.0, 0.0));
    add(&mut graph, (15.0, 0.0), (20.0, 0.0));

    let removed = graph.prune_dangles();
    assert_eq!(removed, 2); // (20,0) then (15,0)

    // Triangle nodes survive with degree 2.
    for p in [(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)] {
        let n = graph.find_node(c(p.0, p.1)).unwrap();
        assert_eq!(graph.nodes[n].degree, 2, "node {:?}", p);
        assert!(!graph.nodes[n].is_marked);
    }
    // Tail edges are marked out.
    let marked = graph.dir_edges.iter().filter(|e| e.is_marked).count();
    assert_eq!(marked, 4);
}

#[test]
fn test_extract_single_ring() {
    let mut graph = PlanarGraph::new();
    add(&mut graph, (0.0, 0.0), (10.0, 0.0));
    add(&mut graph, (10.0, 0.0), (10.0, 10.0));
    add(&mut graph, (10.0, 10.0), (0.0, 10.0));
    add(&mut graph, (0.0, 10.0), (0.0, 0.0));

    graph.sort_edges();
    let rings = graph.extract_rings();

    // The square is traced twice, once per direction.
    assert_eq!(rings.len(), 2);
    for ring in &rings {
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }
}

#[test]
fn test_extract_rings_shared_edge() {
    let mut graph = PlanarGraph::new();
    // Two unit-height rectangles sharing the segment (1,0)-(1,1).
    add(&mut graph, (0.0, 0.0), (1.0, 0.0));
    add(&mut graph, (1.0, 0.0), (2.0, 0.0));
    add(&mut graph, (2.0, 0.0), (2.0, 1.0));
    add(&mut graph, (2.0, 1.0), (1.0, 1.0));
    add(&mut graph, (1.0, 1.0), (0.0, 1.0));
    add(&mut graph, (0.0, 1.0), (0.0, 0.0));
    add(&mut graph, (1.0, 0.0), (1.0, 1.0));

    graph.sort_edges();
    let rings = graph.extract_rings();

    // Two minimal interior rings plus the outer face.
    assert_eq!(rings.len(), 3);
    let mut quads = 0;
    for ring in &rings {
        assert_eq!(ring.first(), ring.last());
        if ring.len() == 5 {
            quads += 1;
        }
    }
    assert_eq!(quads, 2);
}

#[test]
fn test_extract_rings_skips_marked() {
    let mut graph = PlanarGraph::new();
    add(&mut graph, (0.0, 0.0), (10.0, 0.0));
    add(&mut graph, (10.0, 0.0), (5.0, 8.0));
    add(&mut graph, (5.0, 8.0), (0.0, 0.0));
    add(&mut graph, (5.0, 8.0), (5.0, 20.0));

    graph.prune_dangles();
    graph.sort_edges();
    let rings = graph.extract_rings();

    assert_eq!(rings.len(), 2);
    for ring in &rings {
        assert_eq!(ring.len(), 4);
        assert!(!ring.contains(&c(5.0, 20.0)));
    }
}
