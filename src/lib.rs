//! A planar topology kernel: robust predicates, segment noding, DE-9IM
//! relate, point-in-area location, quad-edge Delaunay triangulation and
//! cascaded polygon union.
//!
//! All operations work on `geo-types` geometries with f64 coordinates.
//! Orientation and incircle tests go through adaptive-precision
//! arithmetic, so the combinatorial decisions are exact even where the
//! constructed coordinates are not.

pub mod error;
pub mod geom;
pub mod graph;
pub mod index;
pub mod intersection;
pub mod locate;
pub mod noding;
pub mod overlay;
pub mod predicates;
pub mod relate;
pub mod triangulate;
pub mod union;
pub mod utils;

pub use error::{Result, TopologyError};
pub use geom::{Envelope, Location, PrecisionModel};
pub use locate::PointInAreaLocator;
pub use noding::snap::SnapRoundingNoder;
pub use noding::{IndexNoder, SegmentString};
pub use relate::{relate, IntersectionMatrix};
pub use triangulate::Triangulation;
pub use union::{cascaded_union, cascaded_union_with};

use geo_types::{Coord, Geometry, Polygon};

/// Nodes the linework of the given geometries together: the result
/// strings intersect each other only at shared endpoints. Puntal
/// geometries contribute nothing; the operand index of each output
/// string identifies the input it came from.
pub fn node(geometries: &[Geometry<f64>]) -> Result<Vec<SegmentString>> {
    let mut strings = Vec::new();
    for (operand, g) in geometries.iter().enumerate() {
        collect_linework(g, operand, &mut strings)?;
    }
    IndexNoder::new().node(&strings)
}

fn collect_linework(
    g: &Geometry<f64>,
    operand: usize,
    out: &mut Vec<SegmentString>,
) -> Result<()> {
    match g {
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
        Geometry::Line(l) => push_string(out, vec![l.start, l.end], operand),
        Geometry::LineString(ls) => push_string(out, ls.0.clone(), operand),
        Geometry::MultiLineString(mls) => {
            for ls in &mls.0 {
                push_string(out, ls.0.clone(), operand);
            }
        }
        Geometry::Polygon(p) => polygon_linework(out, p, operand),
        Geometry::MultiPolygon(mp) => {
            for p in &mp.0 {
                polygon_linework(out, p, operand);
            }
        }
        Geometry::Rect(r) => polygon_linework(out, &r.to_polygon(), operand),
        Geometry::Triangle(t) => polygon_linework(out, &t.to_polygon(), operand),
        Geometry::GeometryCollection(gc) => {
            for g in &gc.0 {
                collect_linework(g, operand, out)?;
            }
        }
    }
    Ok(())
}

fn polygon_linework(out: &mut Vec<SegmentString>, p: &Polygon<f64>, operand: usize) {
    push_string(out, p.exterior().0.clone(), operand);
    for hole in p.interiors() {
        push_string(out, hole.0.clone(), operand);
    }
}

fn push_string(out: &mut Vec<SegmentString>, coords: Vec<Coord<f64>>, operand: usize) {
    if coords.len() >= 2 {
        out.push(SegmentString::new(coords, operand));
    }
}

/// Locates a point relative to a polygon's interior, boundary or
/// exterior.
pub fn locate(p: Coord<f64>, polygon: &Polygon<f64>) -> Location {
    PointInAreaLocator::for_polygon(polygon).locate(p)
}

/// Delaunay-triangulates a point set.
pub fn triangulate(points: &[Coord<f64>]) -> Result<Triangulation> {
    Triangulation::new(points)
}
