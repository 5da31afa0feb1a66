//! The relate engine: DE-9IM matrix computation over a jointly noded
//! planar graph.
//!
//! Operands are decomposed into puntal, lineal or polygonal form.
//! Degenerate combinations (empty or point operands) short-circuit with
//! fixed matrix entries; the general line/area path nodes both boundaries
//! together, labels every resulting sub-segment and node per operand, and
//! folds the labels into the matrix by maximum dimension.

use crate::error::{Result, TopologyError};
use crate::geom::Location;
use crate::graph::{Label, PlanarGraph};
use crate::locate::PointInAreaLocator;
use crate::geom::builder::normalized_ring;
use crate::noding::{pt_key, seg_key, IndexNoder, PtKey, SegKey, SegmentString};
use crate::predicates::point_on_segment;
use crate::relate::IntersectionMatrix;
use geo_types::{Coord, Geometry, Polygon};
use std::collections::{HashMap, HashSet};

struct LineOperand {
    strings: Vec<Vec<Coord<f64>>>,
    /// Mod-2 boundary: endpoints occurring in an odd number of string
    /// ends. Closed strings contribute nothing.
    boundary: HashSet<PtKey>,
}

struct AreaOperand {
    /// Closed rings with normalized winding (shells CCW, holes CW), so
    /// the operand interior is always to the left of ring direction.
    rings: Vec<Vec<Coord<f64>>>,
    locator: PointInAreaLocator,
}

enum Operand {
    Empty,
    Points(Vec<Coord<f64>>),
    Lines(LineOperand),
    Area(AreaOperand),
}

impl Operand {
    fn build(g: &Geometry<f64>) -> Result<Operand> {
        match g {
            Geometry::Point(p) => Self::from_points(vec![p.0]),
            Geometry::MultiPoint(mp) => Self::from_points(mp.0.iter().map(|p| p.0).collect()),
            Geometry::Line(l) => Self::from_lines(vec![vec![l.start, l.end]]),
            Geometry::LineString(ls) => Self::from_lines(vec![ls.0.clone()]),
            Geometry::MultiLineString(mls) => {
                Self::from_lines(mls.0.iter().map(|ls| ls.0.clone()).collect())
            }
            Geometry::Polygon(p) => Self::from_polygons(std::slice::from_ref(p)),
            Geometry::MultiPolygon(mp) => Self::from_polygons(&mp.0),
            Geometry::Rect(r) => Self::from_polygons(&[r.to_polygon()]),
            Geometry::Triangle(t) => Self::from_polygons(&[t.to_polygon()]),
            Geometry::GeometryCollection(_) => Err(TopologyError::InvalidGeometry(
                "relate does not support heterogeneous collections".into(),
            )),
        }
    }

    fn from_points(points: Vec<Coord<f64>>) -> Result<Operand> {
        check_finite(points.iter().copied())?;
        let mut seen = HashSet::new();
        let points: Vec<_> = points
            .into_iter()
            .filter(|&p| seen.insert(pt_key(p)))
            .collect();
        if points.is_empty() {
            return Ok(Operand::Empty);
        }
        Ok(Operand::Points(points))
    }

    fn from_lines(lines: Vec<Vec<Coord<f64>>>) -> Result<Operand> {
        let mut strings = Vec::new();
        let mut parity: HashMap<PtKey, usize> = HashMap::new();
        for coords in lines {
            check_finite(coords.iter().copied())?;
            if coords.len() < 2 {
                continue;
            }
            *parity.entry(pt_key(coords[0])).or_default() += 1;
            *parity.entry(pt_key(coords[coords.len() - 1])).or_default() += 1;
            strings.push(coords);
        }
        if strings.is_empty() {
            return Ok(Operand::Empty);
        }
        let boundary = parity
            .into_iter()
            .filter(|&(_, n)| n % 2 == 1)
            .map(|(k, _)| k)
            .collect();
        Ok(Operand::Lines(LineOperand { strings, boundary }))
    }

    fn from_polygons(polys: &[Polygon<f64>]) -> Result<Operand> {
        let mut rings = Vec::new();
        for poly in polys {
            if poly.exterior().0.is_empty() {
                continue;
            }
            rings.push(normalized_ring(poly.exterior(), true)?);
            for hole in poly.interiors() {
                rings.push(normalized_ring(hole, false)?);
            }
        }
        if rings.is_empty() {
            return Ok(Operand::Empty);
        }
        let locator = PointInAreaLocator::from_rings(rings.clone());
        Ok(Operand::Area(AreaOperand { rings, locator }))
    }

    fn dim(&self) -> i8 {
        match self {
            Operand::Empty => -1,
            Operand::Points(_) => 0,
            Operand::Lines(_) => 1,
            Operand::Area(_) => 2,
        }
    }

    fn boundary_dim(&self) -> i8 {
        match self {
            Operand::Empty | Operand::Points(_) => -1,
            Operand::Lines(l) => {
                if l.boundary.is_empty() {
                    -1
                } else {
                    0
                }
            }
            Operand::Area(_) => 1,
        }
    }

    fn segment_strings(&self, operand: usize) -> Vec<SegmentString> {
        match self {
            Operand::Lines(l) => l
                .strings
                .iter()
                .map(|c| SegmentString::new(c.clone(), operand))
                .collect(),
            Operand::Area(a) => a
                .rings
                .iter()
                .map(|c| SegmentString::new(c.clone(), operand))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn check_finite(coords: impl IntoIterator<Item = Coord<f64>>) -> Result<()> {
    for c in coords {
        if !c.x.is_finite() || !c.y.is_finite() {
            return Err(TopologyError::InvalidGeometry(
                "non-finite coordinate".into(),
            ));
        }
    }
    Ok(())
}

/// Computes the DE-9IM matrix of two geometries.
///
/// Each operand must be individually noded: a proper self-intersection
/// within one operand is rejected with `InvalidGeometry`.
pub fn relate(a: &Geometry<f64>, b: &Geometry<f64>) -> Result<IntersectionMatrix> {
    let oa = Operand::build(a)?;
    let ob = Operand::build(b)?;

    let mut m = match (&oa, &ob) {
        (Operand::Empty, _) => empty_vs(&ob),
        (_, Operand::Empty) => empty_vs(&oa).transposed(),
        (Operand::Points(pa), Operand::Points(pb)) => points_vs_points(pa, pb),
        (Operand::Points(pa), Operand::Lines(lb)) => points_vs_lines(pa, lb),
        (Operand::Points(pa), Operand::Area(ab)) => points_vs_area(pa, ab),
        (Operand::Lines(la), Operand::Points(pb)) => points_vs_lines(pb, la).transposed(),
        (Operand::Area(aa), Operand::Points(pb)) => points_vs_area(pb, aa).transposed(),
        _ => extended_relate(&oa, &ob)?,
    };
    // The exteriors of bounded geometries always share the plane.
    m.set(Location::Exterior, Location::Exterior, 2);
    log::debug!("relate -> {}", m);
    Ok(m)
}

/// Matrix for an empty first operand: only the second operand's presence
/// in the universal exterior is recorded.
fn empty_vs(other: &Operand) -> IntersectionMatrix {
    let mut m = IntersectionMatrix::new();
    if other.dim() >= 0 {
        m.set(Location::Exterior, Location::Interior, other.dim());
        let bd = other.boundary_dim();
        if bd >= 0 {
            m.set(Location::Exterior, Location::Boundary, bd);
        }
    }
    m
}

fn points_vs_points(pa: &[Coord<f64>], pb: &[Coord<f64>]) -> IntersectionMatrix {
    let keys_a: HashSet<PtKey> = pa.iter().map(|&p| pt_key(p)).collect();
    let keys_b: HashSet<PtKey> = pb.iter().map(|&p| pt_key(p)).collect();
    let mut m = IntersectionMatrix::new();
    if keys_a.intersection(&keys_b).next().is_some() {
        m.set(Location::Interior, Location::Interior, 0);
    }
    if keys_a.difference(&keys_b).next().is_some() {
        m.set(Location::Interior, Location::Exterior, 0);
    }
    if keys_b.difference(&keys_a).next().is_some() {
        m.set(Location::Exterior, Location::Interior, 0);
    }
    m
}

fn points_vs_lines(pa: &[Coord<f64>], lb: &LineOperand) -> IntersectionMatrix {
    let mut m = IntersectionMatrix::new();
    let keys_a: HashSet<PtKey> = pa.iter().map(|&p| pt_key(p)).collect();
    for &p in pa {
        let loc = if lb.boundary.contains(&pt_key(p)) {
            Location::Boundary
        } else if lb
            .strings
            .iter()
            .any(|s| s.windows(2).any(|w| point_on_segment(p, w[0], w[1])))
        {
            Location::Interior
        } else {
            Location::Exterior
        };
        m.set_at_least(Location::Interior, loc, 0);
    }
    // Finitely many points never cover a 1-D interior.
    m.set(Location::Exterior, Location::Interior, 1);
    if lb.boundary.iter().any(|k| !keys_a.contains(k)) {
        m.set(Location::Exterior, Location::Boundary, 0);
    }
    m
}

fn points_vs_area(pa: &[Coord<f64>], ab: &AreaOperand) -> IntersectionMatrix {
    let mut m = IntersectionMatrix::new();
    for &p in pa {
        m.set_at_least(Location::Interior, ab.locator.locate(p), 0);
    }
    m.set(Location::Exterior, Location::Interior, 2);
    m.set(Location::Exterior, Location::Boundary, 1);
    m
}

/// Per-operand view of one noded sub-segment or node.
struct OperandView<'a> {
    op: &'a Operand,
    /// Canonical segment key -> (present in ring/string direction,
    /// present in reverse direction).
    segments: HashMap<SegKey, (bool, bool)>,
    /// Endpoints of this operand's noded sub-segments.
    endpoints: HashSet<PtKey>,
    line_boundary: HashSet<PtKey>,
}

impl<'a> OperandView<'a> {
    fn new(op: &'a Operand, operand: usize, noded: &[SegmentString]) -> Self {
        let mut segments: HashMap<SegKey, (bool, bool)> = HashMap::new();
        let mut endpoints = HashSet::new();
        for s in noded.iter().filter(|s| s.operand == operand) {
            for w in s.coords.windows(2) {
                let (key, canonical) = seg_key(w[0], w[1]);
                let entry = segments.entry(key).or_default();
                if canonical {
                    entry.0 = true;
                } else {
                    entry.1 = true;
                }
                endpoints.insert(pt_key(w[0]));
                endpoints.insert(pt_key(w[1]));
            }
        }
        let line_boundary = match op {
            Operand::Lines(l) => l.boundary.clone(),
            _ => HashSet::new(),
        };
        Self {
            op,
            segments,
            endpoints,
            line_boundary,
        }
    }

    /// Label components for a canonical-direction sub-segment.
    fn segment_label(&self, key: SegKey, midpoint: Coord<f64>) -> (Location, Location, Location) {
        match (self.op, self.segments.get(&key)) {
            (Operand::Area(_), Some(&(fwd, rev))) => {
                // Operand interior lies left of ring direction.
                let left = if fwd {
                    Location::Interior
                } else {
                    Location::Exterior
                };
                let right = if rev {
                    Location::Interior
                } else {
                    Location::Exterior
                };
                (Location::Boundary, left, right)
            }
            (Operand::Lines(_), Some(_)) => {
                // A line has no 2-D sides.
                (Location::Interior, Location::Exterior, Location::Exterior)
            }
            (Operand::Area(a), None) => {
                // Noding guarantees the location is constant along the
                // sub-segment, so the midpoint decides.
                let loc = a.locator.locate(midpoint);
                (loc, loc, loc)
            }
            _ => (Location::Exterior, Location::Exterior, Location::Exterior),
        }
    }

    fn node_location(&self, coord: Coord<f64>) -> Location {
        let key = pt_key(coord);
        match self.op {
            Operand::Area(a) => {
                if self.endpoints.contains(&key) {
                    Location::Boundary
                } else {
                    a.locator.locate(coord)
                }
            }
            Operand::Lines(_) => {
                if self.line_boundary.contains(&key) {
                    Location::Boundary
                } else if self.endpoints.contains(&key) {
                    Location::Interior
                } else {
                    Location::Exterior
                }
            }
            _ => Location::Exterior,
        }
    }
}

/// The general line/area path: joint noding, per-sub-segment labels, graph
/// build, matrix fold.
fn extended_relate(oa: &Operand, ob: &Operand) -> Result<IntersectionMatrix> {
    let mut strings = oa.segment_strings(0);
    strings.extend(ob.segment_strings(1));

    let noder = IndexNoder {
        forbid_self_crossings: true,
    };
    let noded = noder.node(&strings)?;

    let views = [OperandView::new(oa, 0, &noded), OperandView::new(ob, 1, &noded)];

    let mut graph = PlanarGraph::new();
    let mut inserted: HashSet<SegKey> = HashSet::new();
    for s in &noded {
        for w in s.coords.windows(2) {
            let (lo, hi) = if (w[0].x, w[0].y) <= (w[1].x, w[1].y) {
                (w[0], w[1])
            } else {
                (w[1], w[0])
            };
            let (key, _) = seg_key(lo, hi);
            if !inserted.insert(key) {
                continue;
            }
            let midpoint = Coord {
                x: (lo.x + hi.x) / 2.0,
                y: (lo.y + hi.y) / 2.0,
            };
            let mut label = Label::default();
            for (k, view) in views.iter().enumerate() {
                let (on, left, right) = view.segment_label(key, midpoint);
                label.set_operand(k, on, left, right);
            }
            graph.add_segment(lo, hi, 0, label);
        }
    }

    let mut m = IntersectionMatrix::new();
    // Forward edges carry the canonical-direction labels.
    for de in graph.dir_edges.iter().step_by(2) {
        let l = &de.label;
        m.set_at_least(l.on[0], l.on[1], 1);
        m.set_at_least(l.left[0], l.left[1], 2);
        m.set_at_least(l.right[0], l.right[1], 2);
    }
    for node in &graph.nodes {
        let la = views[0].node_location(node.coordinate);
        let lb = views[1].node_location(node.coordinate);
        m.set_at_least(la, lb, 0);
    }
    Ok(m)
}

/// Topological dimension of a geometry: -1 empty, 0 puntal, 1 lineal,
/// 2 polygonal. Used with the dimension-dependent matrix predicates.
pub fn dimension_of(g: &Geometry<f64>) -> i8 {
    match g {
        Geometry::Point(_) => 0,
        Geometry::MultiPoint(mp) => {
            if mp.0.is_empty() {
                -1
            } else {
                0
            }
        }
        Geometry::Line(_) => 1,
        Geometry::LineString(ls) => {
            if ls.0.len() < 2 {
                -1
            } else {
                1
            }
        }
        Geometry::MultiLineString(mls) => {
            if mls.0.iter().any(|ls| ls.0.len() >= 2) {
                1
            } else {
                -1
            }
        }
        Geometry::Polygon(p) => {
            if p.exterior().0.is_empty() {
                -1
            } else {
                2
            }
        }
        Geometry::MultiPolygon(mp) => {
            if mp.0.iter().any(|p| !p.exterior().0.is_empty()) {
                2
            } else {
                -1
            }
        }
        Geometry::Rect(_) | Geometry::Triangle(_) => 2,
        Geometry::GeometryCollection(gc) => {
            gc.0.iter().map(dimension_of).max().unwrap_or(-1)
        }
    }
}
