//! Polygonal overlay: exact pairwise union by boundary classification.
//!
//! Both boundaries are noded together (snap-rounded under a fixed
//! precision model), then every noded sub-segment is classified against
//! the other operand. The surviving directed segments carry the result
//! interior on their left, so ring extraction yields shells CCW and
//! holes CW directly, with no containment guessing for shell detection.

use crate::error::Result;
use crate::geom::builder::normalized_ring;
use crate::geom::{Envelope, Location, PrecisionModel};
use crate::graph::{Label, PlanarGraph};
use crate::index::StrTree;
use crate::locate::PointInAreaLocator;
use crate::noding::snap::SnapRoundingNoder;
use crate::noding::{seg_key, IndexNoder, SegKey, SegmentString};
use crate::predicates::ring_signed_area;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use std::collections::{HashMap, HashSet};

/// Degenerate slivers below this area are dropped during assembly.
const MIN_RING_AREA: f64 = 1e-9;

#[derive(Clone, Copy, Default)]
struct DirPresence {
    fwd: bool,
    rev: bool,
}

impl DirPresence {
    /// The single effective boundary direction, or `None` when the
    /// segment is absent or cancelled (present in both directions, i.e.
    /// interior on both sides).
    fn effective(self) -> Option<bool> {
        match (self.fwd, self.rev) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

/// Computes the union of two polygonal operands.
pub fn union(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
    pm: &PrecisionModel,
) -> Result<MultiPolygon<f64>> {
    let mut strings = operand_strings(a, 0)?;
    strings.extend(operand_strings(b, 1)?);

    // Each operand must be free of proper self-crossings before any
    // snapping; crossings between the operands are the noder's job.
    IndexNoder {
        forbid_self_crossings: true,
    }
    .find_splits(&strings)?;

    let noded = SnapRoundingNoder::new(*pm).node(&strings)?;

    // Locators over the snapped boundaries; the per-operand noded
    // strings partition each boundary exactly once.
    let loc = [
        locator_for(&noded, 0),
        locator_for(&noded, 1),
    ];
    let maps = [presence_map(&noded, 0), presence_map(&noded, 1)];

    // Keep exactly the segments on the union boundary, directed with the
    // union interior on the left.
    let mut graph = PlanarGraph::new();
    let mut kept = 0usize;
    let mut seen: HashSet<SegKey> = HashSet::new();
    for s in &noded {
        for w in s.coords.windows(2) {
            let (key, _) = seg_key(w[0], w[1]);
            if !seen.insert(key) {
                continue;
            }
            let (lo, hi) = if (w[0].x, w[0].y) <= (w[1].x, w[1].y) {
                (w[0], w[1])
            } else {
                (w[1], w[0])
            };
            let da = maps[0].get(&key).copied().unwrap_or_default().effective();
            let db = maps[1].get(&key).copied().unwrap_or_default().effective();
            let keep_dir = match (da, db) {
                // Coincident boundaries: same interior side keeps one
                // copy, opposite sides form an interior seam.
                (Some(d), Some(e)) => {
                    if d == e {
                        Some(d)
                    } else {
                        None
                    }
                }
                (Some(d), None) => keep_against(lo, hi, &loc[1]).then_some(d),
                (None, Some(e)) => keep_against(lo, hi, &loc[0]).then_some(e),
                (None, None) => None,
            };
            if let Some(dir) = keep_dir {
                let (p, q) = if dir { (lo, hi) } else { (hi, lo) };
                let mut label = Label::default();
                label.set_operand(0, Location::Boundary, Location::Interior, Location::Exterior);
                if let Some(fwd) = graph.add_segment(p, q, 0, label) {
                    // Only the stored direction participates in traversal.
                    graph.dir_edges[fwd + 1].is_marked = true;
                    kept += 1;
                }
            }
        }
    }
    log::debug!("overlay union kept {} of {} segments", kept, seen.len());

    graph.sort_edges();
    graph.prune_dangles();
    let rings = graph.extract_rings();
    Ok(assemble(rings))
}

fn operand_strings(mp: &MultiPolygon<f64>, operand: usize) -> Result<Vec<SegmentString>> {
    let mut out = Vec::new();
    for poly in &mp.0 {
        if poly.exterior().0.is_empty() {
            continue;
        }
        out.push(SegmentString::new(
            normalized_ring(poly.exterior(), true)?,
            operand,
        ));
        for hole in poly.interiors() {
            out.push(SegmentString::new(normalized_ring(hole, false)?, operand));
        }
    }
    Ok(out)
}

fn locator_for(noded: &[SegmentString], operand: usize) -> PointInAreaLocator {
    let chains: Vec<Vec<Coord<f64>>> = noded
        .iter()
        .filter(|s| s.operand == operand)
        .map(|s| s.coords.clone())
        .collect();
    PointInAreaLocator::from_rings(chains)
}

fn presence_map(noded: &[SegmentString], operand: usize) -> HashMap<SegKey, DirPresence> {
    let mut map: HashMap<SegKey, DirPresence> = HashMap::new();
    for s in noded.iter().filter(|s| s.operand == operand) {
        for w in s.coords.windows(2) {
            let (key, canonical) = seg_key(w[0], w[1]);
            let entry = map.entry(key).or_default();
            if canonical {
                entry.fwd = true;
            } else {
                entry.rev = true;
            }
        }
    }
    map
}

/// A one-sided segment survives iff its midpoint lies outside the other
/// operand. Noding guarantees the location is constant along the
/// sub-segment interior.
fn keep_against(lo: Coord<f64>, hi: Coord<f64>, other: &PointInAreaLocator) -> bool {
    let mid = Coord {
        x: (lo.x + hi.x) / 2.0,
        y: (lo.y + hi.y) / 2.0,
    };
    other.locate(mid) == Location::Exterior
}

/// Builds polygons out of extracted rings: CCW rings are shells, CW
/// rings are holes assigned to the smallest containing shell.
fn assemble(rings: Vec<Vec<Coord<f64>>>) -> MultiPolygon<f64> {
    let mut shells: Vec<Vec<Coord<f64>>> = Vec::new();
    let mut holes: Vec<Vec<Coord<f64>>> = Vec::new();
    for ring in rings {
        let area = ring_signed_area(&ring);
        if area.abs() < MIN_RING_AREA {
            continue;
        }
        if area > 0.0 {
            shells.push(ring);
        } else {
            holes.push(ring);
        }
    }

    let shell_locators: Vec<PointInAreaLocator> = shells
        .iter()
        .map(|s| PointInAreaLocator::from_rings(vec![s.clone()]))
        .collect();
    let shell_areas: Vec<f64> = shells.iter().map(|s| ring_signed_area(s)).collect();
    let tree = StrTree::bulk_load(
        shells
            .iter()
            .enumerate()
            .map(|(i, s)| (Envelope::of_coords(s), i))
            .collect(),
    );

    let mut shell_holes: Vec<Vec<LineString<f64>>> = vec![Vec::new(); shells.len()];
    for hole in holes {
        let hole_area = ring_signed_area(&hole).abs();
        let mut best: Option<usize> = None;
        tree.query_visit(&Envelope::of_coords(&hole), |&si| {
            if shell_areas[si] <= hole_area {
                return;
            }
            if let Some(b) = best {
                if shell_areas[si] >= shell_areas[b] {
                    return;
                }
            }
            if contains_ring(&shell_locators[si], &hole) {
                best = Some(si);
            }
        });
        match best {
            Some(si) => shell_holes[si].push(LineString::new(hole)),
            None => log::warn!("dropping orphan hole ring of {} points", hole.len()),
        }
    }

    MultiPolygon(
        shells
            .into_iter()
            .zip(shell_holes)
            .map(|(shell, holes)| Polygon::new(LineString::new(shell), holes))
            .collect(),
    )
}

/// True if the hole ring lies inside the shell. Vertices of the hole may
/// touch the shell boundary, so the first strictly-interior/exterior
/// probe point decides; segment midpoints serve as a fallback.
fn contains_ring(shell: &PointInAreaLocator, hole: &[Coord<f64>]) -> bool {
    for &p in hole {
        match shell.locate(p) {
            Location::Interior => return true,
            Location::Exterior => return false,
            Location::Boundary => {}
        }
    }
    for w in hole.windows(2) {
        let mid = Coord {
            x: (w[0].x + w[1].x) / 2.0,
            y: (w[0].y + w[1].y) / 2.0,
        };
        match shell.locate(mid) {
            Location::Interior => return true,
            Location::Exterior => return false,
            Location::Boundary => {}
        }
    }
    // Fully coincident with the shell boundary; treat as contained.
    true
}

#[cfg(test)]
#[path = "overlay_tests.rs"]
mod tests;
