//! Segment noding: breaking segment strings so every intersection
//! between them is a shared endpoint.

pub mod snap;

use crate::error::{Result, TopologyError};
use crate::index::chain::{chains_of, MonotoneChain};
use crate::index::StrTree;
use crate::intersection::{segment_intersection, IntersectionKind};
use crate::predicates::distance_sq;
use geo_types::Coord;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Hashable coordinate key (f64 has no `Hash`).
pub(crate) type PtKey = (u64, u64);
/// Canonical undirected segment key.
pub(crate) type SegKey = (PtKey, PtKey);

pub(crate) fn pt_key(c: Coord<f64>) -> PtKey {
    (c.x.to_bits(), c.y.to_bits())
}

/// Canonical segment key: endpoints ordered lexicographically by (x, y),
/// plus whether the given direction was already canonical.
pub(crate) fn seg_key(p: Coord<f64>, q: Coord<f64>) -> (SegKey, bool) {
    if (p.x, p.y) <= (q.x, q.y) {
        ((pt_key(p), pt_key(q)), true)
    } else {
        ((pt_key(q), pt_key(p)), false)
    }
}

/// A labeled, mutable coordinate sequence used during noding.
///
/// `operand` records which input operand the string came from, so the
/// relate and overlay stages can tell the two sides apart after noding.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentString {
    pub coords: Vec<Coord<f64>>,
    pub operand: usize,
}

impl SegmentString {
    pub fn new(coords: Vec<Coord<f64>>, operand: usize) -> Self {
        Self { coords, operand }
    }

    pub fn num_segments(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }
}

/// An interior split point, keyed by its position along the string.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SplitPoint {
    pub(crate) seg_index: usize,
    pub(crate) coord: Coord<f64>,
}

pub(crate) type SplitList = SmallVec<[SplitPoint; 4]>;

/// Reference to one monotone chain of one string.
#[derive(Clone, Copy, Debug)]
struct ChainRef {
    string: usize,
    chain: MonotoneChain,
}

/// Monotone-chain indexed noder.
///
/// Candidate segment pairs come from an STR-tree over the chains, so the
/// pass is near-linear for realistic inputs instead of all-pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexNoder {
    /// Reject proper self-intersections within a single operand. Relate
    /// requires operands to be individually noded already.
    pub forbid_self_crossings: bool,
}

impl IndexNoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits the strings at every mutual intersection. An intersection
    /// landing exactly on an existing vertex is a no-op.
    pub fn node(&self, strings: &[SegmentString]) -> Result<Vec<SegmentString>> {
        let splits = self.find_splits(strings)?;
        Ok(split_all(strings, splits))
    }

    /// Computes all interior split points without applying them.
    pub(crate) fn find_splits(&self, strings: &[SegmentString]) -> Result<Vec<SplitList>> {
        let mut splits: Vec<SplitList> = vec![SplitList::new(); strings.len()];

        let mut chain_refs = Vec::new();
        for (si, s) in strings.iter().enumerate() {
            for chain in chains_of(&s.coords) {
                chain_refs.push((chain.envelope(&s.coords), ChainRef { string: si, chain }));
            }
        }
        let tree = StrTree::bulk_load(chain_refs.clone());
        log::debug!(
            "noding {} strings, {} chains",
            strings.len(),
            tree.len()
        );

        for (env, a) in &chain_refs {
            let mut pairs: Vec<ChainRef> = Vec::new();
            tree.query_visit(env, |b| {
                // Process each unordered chain pair once.
                if (b.string, b.chain.start) > (a.string, a.chain.start) {
                    pairs.push(*b);
                }
            });
            for b in pairs {
                let ca = &strings[a.string].coords;
                let cb = &strings[b.string].coords;
                let mut failure: Option<TopologyError> = None;
                a.chain.overlaps(ca, &b.chain, cb, &mut |i, j| {
                    if failure.is_some() {
                        return;
                    }
                    if a.string == b.string && j.abs_diff(i) <= 1 {
                        // Adjacent segments of one string share a vertex
                        // by construction.
                        return;
                    }
                    if let Err(e) = process_pair(
                        strings,
                        &mut splits,
                        (a.string, i),
                        (b.string, j),
                        self.forbid_self_crossings,
                    ) {
                        failure = Some(e);
                    }
                });
                if let Some(e) = failure {
                    return Err(e);
                }
            }
        }
        Ok(splits)
    }
}

fn process_pair(
    strings: &[SegmentString],
    splits: &mut [SplitList],
    (sa, i): (usize, usize),
    (sb, j): (usize, usize),
    forbid_self_crossings: bool,
) -> Result<()> {
    let a = &strings[sa].coords;
    let b = &strings[sb].coords;
    let (p1, p2) = (a[i], a[i + 1]);
    let (q1, q2) = (b[j], b[j + 1]);

    let isect = segment_intersection(p1, p2, q1, q2);
    if !isect.is_some() {
        return Ok(());
    }
    if forbid_self_crossings
        && isect.proper
        && strings[sa].operand == strings[sb].operand
    {
        if let IntersectionKind::Point(pt) = isect.kind {
            return Err(TopologyError::InvalidGeometry(format!(
                "operand {} self-intersects at ({}, {})",
                strings[sa].operand, pt.x, pt.y
            )));
        }
    }
    for pt in isect.points() {
        add_split(&mut splits[sa], a, i, pt);
        add_split(&mut splits[sb], b, j, pt);
    }
    Ok(())
}

/// Records a split point, unless it coincides with a segment endpoint
/// (in which case the node already exists and this is a no-op).
fn add_split(list: &mut SplitList, coords: &[Coord<f64>], seg_index: usize, pt: Coord<f64>) {
    if pt == coords[seg_index] || pt == coords[seg_index + 1] {
        return;
    }
    list.push(SplitPoint { seg_index, coord: pt });
}

/// Applies the recorded splits, producing strings in which every split
/// point is an endpoint. Zero-length pieces are dropped.
pub(crate) fn split_all(strings: &[SegmentString], mut splits: Vec<SplitList>) -> Vec<SegmentString> {
    let mut out = Vec::with_capacity(strings.len());
    for (s, list) in strings.iter().zip(splits.iter_mut()) {
        if list.is_empty() {
            if s.num_segments() > 0 {
                out.push(s.clone());
            }
            continue;
        }
        list.sort_by(|a, b| {
            a.seg_index.cmp(&b.seg_index).then_with(|| {
                let da = distance_sq(a.coord, s.coords[a.seg_index]);
                let db = distance_sq(b.coord, s.coords[b.seg_index]);
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            })
        });
        list.dedup_by(|a, b| a.seg_index == b.seg_index && a.coord == b.coord);

        let mut cur: Vec<Coord<f64>> = vec![s.coords[0]];
        let mut split_iter = list.iter().peekable();
        for i in 0..s.num_segments() {
            while let Some(sp) = split_iter.peek() {
                if sp.seg_index != i {
                    break;
                }
                let sp = split_iter.next().unwrap();
                if *cur.last().unwrap() != sp.coord {
                    cur.push(sp.coord);
                }
                if cur.len() >= 2 {
                    out.push(SegmentString::new(std::mem::take(&mut cur), s.operand));
                }
                cur = vec![sp.coord];
            }
            if *cur.last().unwrap() != s.coords[i + 1] {
                cur.push(s.coords[i + 1]);
            }
        }
        if cur.len() >= 2 {
            out.push(SegmentString::new(cur, s.operand));
        }
    }
    out
}

/// Finds a residual crossing: an intersection point that is not an
/// endpoint of both participating segments. Returns `None` when the
/// strings are fully noded.
pub fn find_unnoded_intersection(strings: &[SegmentString]) -> Option<Coord<f64>> {
    let noder = IndexNoder::new();
    match noder.find_splits(strings) {
        Ok(splits) => splits
            .iter()
            .find(|l| !l.is_empty())
            .map(|l| l[0].coord),
        Err(_) => None,
    }
}
