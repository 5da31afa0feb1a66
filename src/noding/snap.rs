//! Snap-rounding noder.
//!
//! Quantizes every vertex and intersection to the fixed precision grid,
//! then re-nodes until a fixed point: rounding can create new crossings
//! or collapse segments, so a single pass is never enough. The pass
//! count is capped; exhausting the cap with crossings left is a hard
//! `NodingFailure`, never a silently un-noded result.

use crate::error::{Result, TopologyError};
use crate::geom::PrecisionModel;
use crate::noding::{split_all, IndexNoder, SegmentString, SplitList};

pub const DEFAULT_MAX_PASSES: usize = 10;

#[derive(Clone, Copy, Debug)]
pub struct SnapRoundingNoder {
    pub precision: PrecisionModel,
    /// Snap/re-node iteration cap. Rounding converges fast in practice;
    /// the cap only exists to turn pathological inputs into a typed
    /// failure instead of a spin.
    pub max_passes: usize,
}

impl SnapRoundingNoder {
    pub fn new(precision: PrecisionModel) -> Self {
        Self {
            precision,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn node(&self, strings: &[SegmentString]) -> Result<Vec<SegmentString>> {
        for s in strings {
            for &c in &s.coords {
                self.precision.check_magnitude(c)?;
            }
        }

        let mut cur = self.snap_strings(strings);
        let noder = IndexNoder::new();

        for pass in 0..self.max_passes {
            let mut splits = noder.find_splits(&cur)?;
            self.snap_splits(&cur, &mut splits);

            let split_count: usize = splits.iter().map(|l| l.len()).sum();
            if split_count == 0 {
                log::debug!("snap rounding converged after {} passes", pass);
                return Ok(cur);
            }
            log::trace!("snap pass {}: {} split points", pass, split_count);

            cur = self.snap_strings(&split_all(&cur, splits));
        }

        // Cap exhausted: report a residual crossing if one remains.
        match super::find_unnoded_intersection(&cur) {
            Some(coord) => Err(TopologyError::NodingFailure {
                coord,
                passes: self.max_passes,
            }),
            None => Ok(cur),
        }
    }

    /// Snaps every vertex to the grid, collapsing zero-length segments.
    /// A fully collapsed string disappears; its endpoints were snapped
    /// onto neighboring strings' vertices, so connectivity survives.
    fn snap_strings(&self, strings: &[SegmentString]) -> Vec<SegmentString> {
        let mut out = Vec::with_capacity(strings.len());
        for s in strings {
            let mut coords: Vec<_> = Vec::with_capacity(s.coords.len());
            for &c in &s.coords {
                let snapped = self.precision.make_precise(c);
                if coords.last() != Some(&snapped) {
                    coords.push(snapped);
                }
            }
            if coords.len() >= 2 {
                out.push(SegmentString::new(coords, s.operand));
            }
        }
        out
    }

    /// Snaps computed split points onto the grid, discarding those that
    /// land on an existing endpoint of their segment (already noded).
    fn snap_splits(&self, strings: &[SegmentString], splits: &mut [SplitList]) {
        for (s, list) in strings.iter().zip(splits.iter_mut()) {
            for sp in list.iter_mut() {
                sp.coord = self.precision.make_precise(sp.coord);
            }
            list.retain(|sp| {
                sp.coord != s.coords[sp.seg_index] && sp.coord != s.coords[sp.seg_index + 1]
            });
        }
    }
}
