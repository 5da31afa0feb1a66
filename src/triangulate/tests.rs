use crate::predicates::in_circle;
use crate::triangulate::Triangulation;
use geo_types::Coord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn c(x: f64, y: f64) -> Coord<f64> {
    Coord { x, y }
}

fn triangle_vertices(t: &geo_types::Triangle<f64>) -> [Coord<f64>; 3] {
    [t.0, t.1, t.2]
}

/// Every input site not a vertex of a triangle must lie outside or on
/// that triangle's circumcircle.
fn assert_delaunay(tri: &Triangulation, sites: &[Coord<f64>]) {
    use crate::predicates::{orientation, Orientation};
    for t in tri.triangles() {
        let [a, mut b, mut cc] = triangle_vertices(&t);
        if orientation(a, b, cc) == Orientation::Clockwise {
            std::mem::swap(&mut b, &mut cc);
        }
        for &p in sites {
            if p == a || p == b || p == cc {
                continue;
            }
            assert!(
                !in_circle(a, b, cc, p),
                "site {:?} inside circumcircle of {:?}",
                p,
                t
            );
        }
    }
}

#[test]
fn test_triangle_of_three_points() {
    let sites = [c(0.0, 0.0), c(10.0, 0.0), c(5.0, 8.0)];
    let tri = Triangulation::new(&sites).unwrap();
    assert_eq!(tri.num_sites(), 3);
    assert_eq!(tri.triangles().len(), 1);
    assert_eq!(tri.edges().len(), 3);
}

#[test]
fn test_square_yields_two_triangles() {
    let sites = [c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 10.0)];
    let tri = Triangulation::new(&sites).unwrap();
    assert_eq!(tri.triangles().len(), 2);
    assert_delaunay(&tri, &sites);
}

#[test]
fn test_interior_point_fans_out() {
    let sites = [
        c(0.0, 0.0),
        c(10.0, 0.0),
        c(10.0, 10.0),
        c(0.0, 10.0),
        c(5.0, 5.0),
    ];
    let tri = Triangulation::new(&sites).unwrap();
    assert_eq!(tri.triangles().len(), 4);
    assert_delaunay(&tri, &sites);
}

#[test]
fn test_duplicate_points_discarded() {
    let sites = [c(0.0, 0.0), c(10.0, 0.0), c(0.0, 0.0), c(5.0, 8.0), c(10.0, 0.0)];
    let tri = Triangulation::new(&sites).unwrap();
    assert_eq!(tri.num_sites(), 3);
    assert_eq!(tri.triangles().len(), 1);
}

#[test]
fn test_collinear_input_is_edge_only() {
    let sites = [c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0)];
    let tri = Triangulation::new(&sites).unwrap();
    assert!(tri.triangles().is_empty());
    // The chain survives as interior edges.
    assert_eq!(tri.edges().len(), 3);
}

#[test]
fn test_empty_input_rejected() {
    assert!(Triangulation::new(&[]).is_err());
}

#[test]
fn test_on_edge_insertion() {
    // The fifth site lies exactly on the diagonal created by the first
    // four; insertion must split that edge, not corrupt the mesh.
    let sites = [
        c(0.0, 0.0),
        c(10.0, 0.0),
        c(10.0, 10.0),
        c(0.0, 10.0),
        c(5.0, 5.0),
    ];
    let tri = Triangulation::new(&sites).unwrap();
    assert_delaunay(&tri, &sites);
    let vertex_count: usize = 5;
    // Euler: with 4 hull vertices and 1 interior, a full triangulation
    // has 2*5 - 2 - 4 = 4 triangles.
    assert_eq!(tri.triangles().len(), 2 * vertex_count - 2 - 4);
}

#[test]
fn test_random_sites_satisfy_delaunay() {
    let mut rng = StdRng::seed_from_u64(7);
    let sites: Vec<Coord<f64>> = (0..120)
        .map(|_| c(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)))
        .collect();
    let tri = Triangulation::new(&sites).unwrap();
    assert!(tri.triangles().len() > 100);
    assert_delaunay(&tri, &sites);
}

#[test]
fn test_hull_is_convex_and_ccw() {
    let mut rng = StdRng::seed_from_u64(11);
    let sites: Vec<Coord<f64>> = (0..60)
        .map(|_| c(rng.gen_range(0.0..50.0), rng.gen_range(0.0..50.0)))
        .collect();
    let tri = Triangulation::new(&sites).unwrap();
    let hull = tri.hull();
    assert!(hull.is_closed());
    assert!(crate::predicates::ring_signed_area(&hull.0) > 0.0);
    // Convexity: no clockwise turn along the ring.
    let n = hull.0.len() - 1;
    for i in 0..n {
        let p = hull.0[i];
        let q = hull.0[(i + 1) % n];
        let r = hull.0[(i + 2) % n];
        assert_ne!(
            crate::predicates::orientation(p, q, r),
            crate::predicates::Orientation::Clockwise,
            "reflex hull corner at {:?}",
            q
        );
    }
    // Every site is inside or on the hull.
    let locator = crate::locate::PointInAreaLocator::from_rings(vec![hull.0.clone()]);
    for &p in &sites {
        assert_ne!(locator.locate(p), crate::geom::Location::Exterior);
    }
}

#[test]
fn test_voronoi_cells_contain_their_sites() {
    let sites = [
        c(0.0, 0.0),
        c(10.0, 0.0),
        c(10.0, 10.0),
        c(0.0, 10.0),
        c(5.0, 5.0),
        c(2.0, 7.0),
    ];
    let tri = Triangulation::new(&sites).unwrap();
    let cells = tri.voronoi();
    assert_eq!(cells.len(), sites.len());
    for (site, cell) in &cells {
        let locator = crate::locate::PointInAreaLocator::for_polygon(cell);
        assert_ne!(
            locator.locate(*site),
            crate::geom::Location::Exterior,
            "site {:?} outside its voronoi cell",
            site
        );
    }
}

#[test]
fn test_circumcenter() {
    use approx::assert_relative_eq;
    let center = crate::triangulate::circumcenter(c(0.0, 0.0), c(10.0, 0.0), c(0.0, 10.0));
    assert_eq!(center, c(5.0, 5.0));
    // Equilateral: circumcenter coincides with the centroid.
    let h = 3.0f64.sqrt();
    let center = crate::triangulate::circumcenter(c(0.0, 0.0), c(2.0, 0.0), c(1.0, h));
    assert_relative_eq!(center.x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(center.y, h / 3.0, epsilon = 1e-12);
}
