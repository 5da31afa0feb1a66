//! Robust geometric predicates.
//!
//! All sign computations go through the adaptive-precision predicates in
//! the `robust` crate. Plain double arithmetic near collinearity yields
//! wrong signs and corrupts every structure built on top, so nothing in
//! the kernel is allowed to compute an orientation any other way.

use geo_types::Coord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

fn rc(c: Coord<f64>) -> robust::Coord<f64> {
    robust::Coord { x: c.x, y: c.y }
}

fn finite(c: Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

/// Orientation of the turn p -> q -> r.
///
/// Non-finite inputs resolve deterministically to `Collinear`; predicates
/// never fail.
pub fn orientation(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> Orientation {
    if !finite(p) || !finite(q) || !finite(r) {
        return Orientation::Collinear;
    }
    let det = robust::orient2d(rc(p), rc(q), rc(r));
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Signed orientation index: +1 CCW, -1 CW, 0 collinear.
pub fn orientation_index(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> i32 {
    match orientation(p, q, r) {
        Orientation::CounterClockwise => 1,
        Orientation::Clockwise => -1,
        Orientation::Collinear => 0,
    }
}

/// True if `q` is inside the circumcircle of the CCW triangle `(a, b, c)`.
/// Points exactly on the circle report false.
pub fn in_circle(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>, q: Coord<f64>) -> bool {
    if !finite(a) || !finite(b) || !finite(c) || !finite(q) {
        return false;
    }
    robust::incircle(rc(a), rc(b), rc(c), rc(q)) > 0.0
}

/// True if `p` lies exactly on the closed segment `(p0, p1)`.
pub fn point_on_segment(p: Coord<f64>, p0: Coord<f64>, p1: Coord<f64>) -> bool {
    if orientation(p0, p1, p) != Orientation::Collinear {
        return false;
    }
    // Collinear: check the envelope.
    p.x >= p0.x.min(p1.x)
        && p.x <= p0.x.max(p1.x)
        && p.y >= p0.y.min(p1.y)
        && p.y <= p0.y.max(p1.y)
}

/// Signed area of a ring (positive for CCW), by the shoelace formula.
/// Used for shell/hole classification after ring extraction.
pub fn ring_signed_area(ring: &[Coord<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for w in ring.windows(2) {
        sum += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    // Close implicitly if the caller passed an open ring.
    let first = ring[0];
    let last = ring[ring.len() - 1];
    if first != last {
        sum += last.x * first.y - first.x * last.y;
    }
    sum / 2.0
}

pub fn distance_sq(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
