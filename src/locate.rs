//! Point-in-area location.
//!
//! Build-once, query-many locator over a polygonal area. Queries shoot a
//! horizontal ray to the right of the test point and count crossings,
//! but only against the monotone chains whose envelopes the ray actually
//! passes through, so each query touches O(log n) of the boundary.

use crate::geom::{Envelope, Location};
use crate::index::chain::{chains_of, MonotoneChain};
use crate::index::StrTree;
use crate::predicates::orientation_index;
use float_next_after::NextAfter;
use geo_types::{Coord, MultiPolygon, Polygon};

#[derive(Clone, Copy, Debug)]
struct ChainEntry {
    ring: usize,
    chain: MonotoneChain,
}

pub struct PointInAreaLocator {
    rings: Vec<Vec<Coord<f64>>>,
    tree: StrTree<ChainEntry>,
    envelope: Envelope,
}

impl PointInAreaLocator {
    pub fn for_polygon(poly: &Polygon<f64>) -> Self {
        let mut ring_coords: Vec<Vec<Coord<f64>>> = Vec::with_capacity(1 + poly.interiors().len());
        ring_coords.push(poly.exterior().0.clone());
        for hole in poly.interiors() {
            ring_coords.push(hole.0.clone());
        }
        Self::from_rings(ring_coords)
    }

    pub fn for_multi_polygon(mp: &MultiPolygon<f64>) -> Self {
        let mut ring_coords = Vec::new();
        for poly in &mp.0 {
            ring_coords.push(poly.exterior().0.clone());
            for hole in poly.interiors() {
                ring_coords.push(hole.0.clone());
            }
        }
        Self::from_rings(ring_coords)
    }

    /// Builds a locator from closed boundary rings. Winding does not
    /// matter; the crossing count is parity-based.
    pub fn from_rings(rings: Vec<Vec<Coord<f64>>>) -> Self {
        let mut entries = Vec::new();
        let mut envelope = Envelope::null();
        for (ri, ring) in rings.iter().enumerate() {
            envelope.expand_to_include_envelope(&Envelope::of_coords(ring));
            for chain in chains_of(ring) {
                entries.push((chain.envelope(ring), ChainEntry { ring: ri, chain }));
            }
        }
        let tree = StrTree::bulk_load(entries);
        Self {
            rings,
            tree,
            envelope,
        }
    }

    pub fn locate(&self, p: Coord<f64>) -> Location {
        if !p.x.is_finite() || !p.y.is_finite() || !self.envelope.contains_coord(p) {
            return Location::Exterior;
        }

        // Envelope of the rightward ray, widened by one ulp in y so
        // segments that merely touch the ray line are not pruned.
        let ray_env = Envelope::new(
            p.x,
            p.y.next_after(f64::NEG_INFINITY),
            self.envelope.max_x(),
            p.y.next_after(f64::INFINITY),
        );

        let mut counter = RayCrossingCounter::new(p);
        self.tree.query_visit(&ray_env, |entry| {
            let coords = &self.rings[entry.ring];
            entry.chain.select(coords, &ray_env, &mut |i| {
                counter.count_segment(coords[i], coords[i + 1]);
            });
        });
        counter.location()
    }
}

/// Crossing counter for a horizontal ray extending rightward from `p`.
///
/// Segments may arrive in any order and each boundary segment must be
/// fed exactly once. Horizontal segments never count as crossings; a
/// segment through the query point reports Boundary directly.
struct RayCrossingCounter {
    p: Coord<f64>,
    crossings: usize,
    on_boundary: bool,
}

impl RayCrossingCounter {
    fn new(p: Coord<f64>) -> Self {
        Self {
            p,
            crossings: 0,
            on_boundary: false,
        }
    }

    fn count_segment(&mut self, p1: Coord<f64>, p2: Coord<f64>) {
        let p = self.p;
        // Entirely left of the ray origin.
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == p2 {
            self.on_boundary = true;
            return;
        }
        if p1.y == p.y && p2.y == p.y {
            // Horizontal at ray level: on-segment or nothing.
            if p1.x.min(p2.x) <= p.x && p.x <= p1.x.max(p2.x) {
                self.on_boundary = true;
            }
            return;
        }
        // Count segments straddling the ray line. The strict/non-strict
        // asymmetry counts a vertex lying on the ray exactly once.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut sign = orientation_index(p1, p2, p);
            if sign == 0 {
                self.on_boundary = true;
                return;
            }
            // Normalize to an upward-pointing segment.
            if p2.y < p1.y {
                sign = -sign;
            }
            if sign > 0 {
                self.crossings += 1;
            }
        }
    }

    fn location(&self) -> Location {
        if self.on_boundary {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}
