//! Robust segment/segment intersection.
//!
//! Classification (none / point / collinear overlap) is decided purely by
//! robust orientations, so it is exact. Only the coordinates of a proper
//! crossing are computed with floating point, and that computation is
//! normalized and envelope-clamped so near-parallel segments cannot
//! produce a wildly wrong point through a near-zero determinant.

use crate::geom::Envelope;
use crate::predicates::{distance_sq, orientation_index, point_on_segment};
use geo_types::Coord;
use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq)]
pub enum IntersectionKind {
    None,
    /// Single intersection point.
    Point(Coord<f64>),
    /// Collinear overlap between the two endpoints (inclusive).
    Collinear(Coord<f64>, Coord<f64>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SegmentIntersection {
    pub kind: IntersectionKind,
    /// True if the intersection point is interior to both segments.
    pub proper: bool,
}

impl SegmentIntersection {
    fn none() -> Self {
        Self { kind: IntersectionKind::None, proper: false }
    }

    pub fn is_some(&self) -> bool {
        !matches!(self.kind, IntersectionKind::None)
    }

    /// All intersection points, in lexicographic order.
    pub fn points(&self) -> Vec<Coord<f64>> {
        match self.kind {
            IntersectionKind::None => vec![],
            IntersectionKind::Point(p) => vec![p],
            IntersectionKind::Collinear(a, b) => vec![a, b],
        }
    }
}

fn finite(c: Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

fn lex_cmp(a: Coord<f64>, b: Coord<f64>) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then(a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
}

/// Computes the intersection of segments (p1, p2) and (q1, q2).
pub fn segment_intersection(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
) -> SegmentIntersection {
    if !finite(p1) || !finite(p2) || !finite(q1) || !finite(q2) {
        return SegmentIntersection::none();
    }

    let env_p = Envelope::of_segment(p1, p2);
    let env_q = Envelope::of_segment(q1, q2);
    if !env_p.intersects(&env_q) {
        return SegmentIntersection::none();
    }

    let pq1 = orientation_index(p1, p2, q1);
    let pq2 = orientation_index(p1, p2, q2);
    if pq1 * pq2 > 0 {
        return SegmentIntersection::none();
    }
    let qp1 = orientation_index(q1, q2, p1);
    let qp2 = orientation_index(q1, q2, p2);
    if qp1 * qp2 > 0 {
        return SegmentIntersection::none();
    }

    if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
        return collinear_intersection(p1, p2, q1, q2);
    }

    // Exactly one orientation is zero: an endpoint of one segment lies on
    // the other. The intersection is that endpoint, taken exactly.
    if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
        let pt = if pq1 == 0 {
            q1
        } else if pq2 == 0 {
            q2
        } else if qp1 == 0 {
            p1
        } else {
            p2
        };
        return SegmentIntersection { kind: IntersectionKind::Point(pt), proper: false };
    }

    let pt = proper_intersection_point(p1, p2, q1, q2, &env_p, &env_q);
    SegmentIntersection { kind: IntersectionKind::Point(pt), proper: true }
}

fn collinear_intersection(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
) -> SegmentIntersection {
    let mut pts: Vec<Coord<f64>> = Vec::with_capacity(4);
    for c in [q1, q2] {
        if point_on_segment(c, p1, p2) {
            pts.push(c);
        }
    }
    for c in [p1, p2] {
        if point_on_segment(c, q1, q2) {
            pts.push(c);
        }
    }
    pts.sort_by(|a, b| lex_cmp(*a, *b));
    pts.dedup();

    match pts.len() {
        0 => SegmentIntersection::none(),
        1 => SegmentIntersection { kind: IntersectionKind::Point(pts[0]), proper: false },
        _ => SegmentIntersection {
            kind: IntersectionKind::Collinear(pts[0], pts[pts.len() - 1]),
            proper: false,
        },
    }
}

/// Intersection point of two properly crossing segments.
///
/// The segments are put into a canonical order first so the computed
/// point is identical under argument swap, and the solve is shifted to
/// the local origin to shed exponent bits before the division.
fn proper_intersection_point(
    p1: Coord<f64>,
    p2: Coord<f64>,
    q1: Coord<f64>,
    q2: Coord<f64>,
    env_p: &Envelope,
    env_q: &Envelope,
) -> Coord<f64> {
    let (a1, a2, b1, b2) = if lex_cmp(p1, q1).then(lex_cmp(p2, q2)) == Ordering::Greater {
        (q1, q2, p1, p2)
    } else {
        (p1, p2, q1, q2)
    };

    // Shift everything to the centre of the envelope overlap so the solve
    // works on small local magnitudes.
    let ox = (a1.x.min(a2.x).max(b1.x.min(b2.x)) + a1.x.max(a2.x).min(b1.x.max(b2.x))) / 2.0;
    let oy = (a1.y.min(a2.y).max(b1.y.min(b2.y)) + a1.y.max(a2.y).min(b1.y.max(b2.y))) / 2.0;
    let shift = |c: Coord<f64>| Coord { x: c.x - ox, y: c.y - oy };
    let (s1, s2, t1, t2) = (shift(a1), shift(a2), shift(b1), shift(b2));

    let ax = s2.x - s1.x;
    let ay = s2.y - s1.y;
    let bx = t2.x - t1.x;
    let by = t2.y - t1.y;
    let denom = ax * by - ay * bx;

    let pt = if denom != 0.0 && denom.is_finite() {
        let wx = t1.x - s1.x;
        let wy = t1.y - s1.y;
        let t = (wx * by - wy * bx) / denom;
        Coord { x: ox + s1.x + t * ax, y: oy + s1.y + t * ay }
    } else {
        // Near-parallel fallback: the crossing is squeezed between the
        // segments, any shared endpoint-scale point is acceptable.
        Coord { x: ox, y: oy }
    };

    if env_p.contains_coord(pt) || env_q.contains_coord(pt) {
        pt
    } else {
        // The solve drifted outside both segments; fall back to the
        // nearest endpoint, which is guaranteed consistent.
        nearest_endpoint(pt, [p1, p2, q1, q2])
    }
}

fn nearest_endpoint(pt: Coord<f64>, candidates: [Coord<f64>; 4]) -> Coord<f64> {
    let mut best = candidates[0];
    let mut best_d = distance_sq(pt, best);
    for c in &candidates[1..] {
        let d = distance_sq(pt, *c);
        if d < best_d {
            best_d = d;
            best = *c;
        }
    }
    best
}
