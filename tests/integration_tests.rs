use geo_topology::{
    cascaded_union, locate, node, relate, triangulate, Location, PrecisionModel,
    SnapRoundingNoder,
};
use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon};

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (x0, y0),
            (x1, y0),
            (x1, y1),
            (x0, y1),
            (x0, y0),
        ]),
        vec![],
    )
}

fn total_area(mp: &MultiPolygon<f64>) -> f64 {
    use geo::Area;
    mp.0.iter().map(|p| p.unsigned_area()).sum()
}

#[test]
fn test_union_of_two_overlapping_squares_is_l_shaped() {
    let out = cascaded_union(&[
        square(0.0, 0.0, 10.0, 10.0),
        square(5.0, 5.0, 15.0, 15.0),
    ])
    .unwrap();

    assert_eq!(out.0.len(), 1);
    let poly = &out.0[0];
    assert!(poly.interiors().is_empty());
    assert!((total_area(&out) - 175.0).abs() < 1e-9);

    let expected = [
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 5.0),
        (15.0, 5.0),
        (15.0, 15.0),
        (5.0, 15.0),
        (5.0, 10.0),
        (0.0, 10.0),
    ];
    assert_eq!(poly.exterior().0.len(), expected.len() + 1);
    for (x, y) in expected {
        assert!(poly.exterior().0.contains(&Coord { x, y }));
    }
}

#[test]
fn test_relate_of_geometry_with_itself_is_equals() {
    let cases: Vec<Geometry<f64>> = vec![
        square(0.0, 0.0, 7.0, 7.0).into(),
        LineString::from(vec![(0.0, 0.0), (4.0, 1.0), (9.0, 0.0)]).into(),
        geo_types::Point::new(2.0, 3.0).into(),
    ];
    for g in cases {
        let m = relate(&g, &g).unwrap();
        assert!(m.is_equals_topo(), "self-relate not equals: {}", m);
        assert!(m.is_contains() || matches!(g, Geometry::Point(_)));
    }
}

#[test]
fn test_relate_overlapping_squares_matrix() {
    let a: Geometry<f64> = square(0.0, 0.0, 10.0, 10.0).into();
    let b: Geometry<f64> = square(5.0, 5.0, 15.0, 15.0).into();
    let m = relate(&a, &b).unwrap();
    assert_eq!(m.to_string(), "212101212");
    assert!(m.is_overlaps(2, 2));
    assert!(!m.is_touches());
}

#[test]
fn test_locate_is_translation_invariant() {
    let offsets = [
        (0.0, 0.0),
        (100.0, -250.0),
        (1e6, 1e6),
        (-3.25, 7.75),
    ];
    let probe_offsets = [
        ((5.0, 5.0), Location::Interior),
        ((10.0, 5.0), Location::Boundary),
        ((0.0, 0.0), Location::Boundary),
        ((-1.0, 5.0), Location::Exterior),
        ((5.0, 12.0), Location::Exterior),
    ];
    for (dx, dy) in offsets {
        let poly = square(dx, dy, dx + 10.0, dy + 10.0);
        for ((px, py), expected) in probe_offsets {
            let p = Coord { x: dx + px, y: dy + py };
            assert_eq!(locate(p, &poly), expected, "probe ({}, {})", px, py);
        }
    }
}

#[test]
fn test_locator_classifies_vertices_and_centroid() {
    let poly = Polygon::new(
        LineString::from(vec![
            (0.0, 0.0),
            (8.0, 0.0),
            (8.0, 6.0),
            (4.0, 9.0),
            (0.0, 6.0),
            (0.0, 0.0),
        ]),
        vec![],
    );
    for &v in &poly.exterior().0 {
        assert_eq!(locate(v, &poly), Location::Boundary);
    }
    use geo::Centroid;
    let c = poly.centroid().unwrap();
    assert_eq!(locate(c.0, &poly), Location::Interior);
}

#[test]
fn test_noding_is_idempotent() {
    let cross: Vec<Geometry<f64>> = vec![
        LineString::from(vec![(0.0, 5.0), (10.0, 5.0)]).into(),
        LineString::from(vec![(5.0, 0.0), (5.0, 10.0)]).into(),
        LineString::from(vec![(0.0, 0.0), (10.0, 8.0)]).into(),
    ];
    let once = node(&cross).unwrap();
    // Three mutual crossings split each line into three pieces.
    let segs: usize = once.iter().map(|s| s.num_segments()).sum();
    assert_eq!(segs, 9);

    // Noding already-noded strings must not split anything further.
    let strings = once.clone();
    let twice = geo_topology::IndexNoder::new().node(&strings).unwrap();
    let segs_again: usize = twice.iter().map(|s| s.num_segments()).sum();
    assert_eq!(segs, segs_again);
}

#[test]
fn test_snap_rounding_output_is_on_grid_and_noded() {
    let strings = vec![
        geo_topology::SegmentString::new(
            vec![
                Coord { x: 0.001, y: 0.499 },
                Coord { x: 9.999, y: 0.501 },
            ],
            0,
        ),
        geo_topology::SegmentString::new(
            vec![
                Coord { x: 5.001, y: -4.999 },
                Coord { x: 5.002, y: 5.499 },
            ],
            1,
        ),
    ];
    let pm = PrecisionModel::fixed(1.0);
    let noded = SnapRoundingNoder::new(pm).node(&strings).unwrap();
    for s in &noded {
        for &c in &s.coords {
            assert_eq!(c, pm.make_precise(c), "vertex off-grid: {:?}", c);
        }
    }
    assert!(geo_topology::noding::find_unnoded_intersection(&noded).is_none());
}

#[test]
fn test_union_is_independent_of_grouping() {
    let parts = [
        square(0.0, 0.0, 6.0, 6.0),
        square(4.0, 0.0, 10.0, 6.0),
        square(0.0, 4.0, 6.0, 10.0),
        square(4.0, 4.0, 10.0, 10.0),
    ];
    // ((a u b) u c) u d against (a u (b u (c u d))) by area.
    let left = cascaded_union(&parts).unwrap();
    let mut reordered = parts.to_vec();
    reordered.rotate_left(2);
    let right = cascaded_union(&reordered).unwrap();

    assert_eq!(left.0.len(), 1);
    assert_eq!(right.0.len(), 1);
    assert!((total_area(&left) - 100.0).abs() < 1e-9);
    assert!((total_area(&right) - 100.0).abs() < 1e-9);
}

#[test]
fn test_delaunay_triangulation_covers_hull() {
    let sites: Vec<Coord<f64>> = vec![
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 10.0, y: 0.0 },
        Coord { x: 10.0, y: 10.0 },
        Coord { x: 0.0, y: 10.0 },
        Coord { x: 5.0, y: 5.0 },
        Coord { x: 2.0, y: 7.0 },
    ];
    let tri = triangulate(&sites).unwrap();

    // Triangle areas sum to the hull area.
    let tri_area: f64 = tri
        .triangles()
        .iter()
        .map(|t| {
            let [a, b, c] = t.to_array();
            ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
        })
        .sum();
    assert!((tri_area - 100.0).abs() < 1e-9);

    let hull = tri.hull();
    assert!(hull.is_closed());
    assert_eq!(hull.0.len(), 5); // square corners + closure

    // Every site owns a Voronoi cell containing it.
    let cells = tri.voronoi();
    assert_eq!(cells.len(), sites.len());
    for (site, cell) in &cells {
        assert_ne!(
            locate(*site, cell),
            Location::Exterior,
            "site {:?} outside its cell",
            site
        );
    }
}

#[test]
fn test_union_with_hole_then_relate() {
    // A frame with a hole, then relate the hole region against it.
    let bars = [
        square(0.0, 0.0, 12.0, 4.0),
        square(0.0, 8.0, 12.0, 12.0),
        square(0.0, 0.0, 4.0, 12.0),
        square(8.0, 0.0, 12.0, 12.0),
    ];
    let frame = cascaded_union(&bars).unwrap();
    assert_eq!(frame.0.len(), 1);
    assert_eq!(frame.0[0].interiors().len(), 1);

    let void: Geometry<f64> = square(4.0, 4.0, 8.0, 8.0).into();
    let m = relate(&Geometry::MultiPolygon(frame), &void).unwrap();
    assert!(m.is_touches());
}
