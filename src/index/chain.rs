//! Monotone chains.
//!
//! A chain is a maximal run of segments whose direction stays in one
//! quadrant. Within a chain, a segment run's envelope is spanned by its
//! two corner vertices, and a horizontal or vertical line crosses the
//! chain at most once. That invariant lets both selection and pairwise
//! overlap checks binary-subdivide instead of scanning every segment.

use crate::geom::Envelope;
use geo_types::Coord;

/// Direction quadrant of a vector (0 = NE, 1 = NW, 2 = SW, 3 = SE).
fn quadrant(dx: f64, dy: f64) -> usize {
    if dx >= 0.0 {
        if dy >= 0.0 {
            0
        } else {
            3
        }
    } else if dy >= 0.0 {
        1
    } else {
        2
    }
}

/// A chain over `coords[start..=end]` of some externally owned sequence.
#[derive(Clone, Copy, Debug)]
pub struct MonotoneChain {
    pub start: usize,
    pub end: usize,
}

impl MonotoneChain {
    pub fn envelope(&self, coords: &[Coord<f64>]) -> Envelope {
        // Monotonicity: the chain envelope is spanned by its endpoints.
        Envelope::of_segment(coords[self.start], coords[self.end])
    }

    /// Visits the index of every segment whose section envelope overlaps
    /// `search`. Indices are relative to the owning coordinate sequence.
    pub fn select<F: FnMut(usize)>(&self, coords: &[Coord<f64>], search: &Envelope, visit: &mut F) {
        self.select_section(coords, search, self.start, self.end, visit);
    }

    fn select_section<F: FnMut(usize)>(
        &self,
        coords: &[Coord<f64>],
        search: &Envelope,
        start: usize,
        end: usize,
        visit: &mut F,
    ) {
        if end - start == 1 {
            visit(start);
            return;
        }
        if !Envelope::of_segment(coords[start], coords[end]).intersects(search) {
            return;
        }
        let mid = (start + end) / 2;
        if mid > start {
            self.select_section(coords, search, start, mid, visit);
        }
        if end > mid {
            self.select_section(coords, search, mid, end, visit);
        }
    }

    /// Visits every candidate segment pair between two chains whose
    /// section envelopes overlap, without materializing all pairs.
    pub fn overlaps<F: FnMut(usize, usize)>(
        &self,
        coords: &[Coord<f64>],
        other: &MonotoneChain,
        other_coords: &[Coord<f64>],
        visit: &mut F,
    ) {
        overlap_sections(
            coords,
            self.start,
            self.end,
            other_coords,
            other.start,
            other.end,
            visit,
        );
    }
}

fn overlap_sections<F: FnMut(usize, usize)>(
    a: &[Coord<f64>],
    a0: usize,
    a1: usize,
    b: &[Coord<f64>],
    b0: usize,
    b1: usize,
    visit: &mut F,
) {
    if a1 - a0 == 1 && b1 - b0 == 1 {
        visit(a0, b0);
        return;
    }
    if !Envelope::of_segment(a[a0], a[a1]).intersects(&Envelope::of_segment(b[b0], b[b1])) {
        return;
    }
    let a_mid = (a0 + a1) / 2;
    let b_mid = (b0 + b1) / 2;
    if a1 - a0 > 1 && b1 - b0 > 1 {
        overlap_sections(a, a0, a_mid, b, b0, b_mid, visit);
        overlap_sections(a, a0, a_mid, b, b_mid, b1, visit);
        overlap_sections(a, a_mid, a1, b, b0, b_mid, visit);
        overlap_sections(a, a_mid, a1, b, b_mid, b1, visit);
    } else if a1 - a0 > 1 {
        overlap_sections(a, a0, a_mid, b, b0, b1, visit);
        overlap_sections(a, a_mid, a1, b, b0, b1, visit);
    } else {
        overlap_sections(a, a0, a1, b, b0, b_mid, visit);
        overlap_sections(a, a0, a1, b, b_mid, b1, visit);
    }
}

/// Decomposes a coordinate sequence into maximal monotone chains.
pub fn chains_of(coords: &[Coord<f64>]) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if coords.len() < 2 {
        return chains;
    }
    let mut start = 0;
    let mut quad = quadrant(coords[1].x - coords[0].x, coords[1].y - coords[0].y);
    for i in 1..coords.len() - 1 {
        let q = quadrant(coords[i + 1].x - coords[i].x, coords[i + 1].y - coords[i].y);
        if q != quad {
            chains.push(MonotoneChain { start, end: i });
            start = i;
            quad = q;
        }
    }
    chains.push(MonotoneChain { start, end: coords.len() - 1 });
    chains
}
