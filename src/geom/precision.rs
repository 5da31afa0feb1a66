use crate::error::{Result, TopologyError};
use geo_types::Coord;

/// Largest integer exactly representable in an f64. Fixed-model snapping
/// beyond this range silently loses grid cells, so it is rejected instead.
const MAX_EXACT_INT: f64 = 9007199254740992.0; // 2^53

/// Quantizes coordinates to a floating (identity) or fixed grid.
///
/// The fixed model snaps each ordinate to `round(v * scale) / scale`.
/// Snapping is deterministic and idempotent; non-finite ordinates pass
/// through unchanged so predicates can classify them safely downstream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrecisionModel {
    Floating,
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// A fixed model with the given grid scale (cells per unit).
    /// A non-finite or non-positive scale degrades to the floating model.
    pub fn fixed(scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            PrecisionModel::Fixed { scale }
        } else {
            PrecisionModel::Floating
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, PrecisionModel::Floating)
    }

    /// Spacing of the snap grid; 0.0 for the floating model.
    pub fn grid_size(&self) -> f64 {
        match self {
            PrecisionModel::Floating => 0.0,
            PrecisionModel::Fixed { scale } => 1.0 / scale,
        }
    }

    pub fn make_precise_value(&self, v: f64) -> f64 {
        match self {
            PrecisionModel::Floating => v,
            PrecisionModel::Fixed { scale } => {
                if v.is_finite() {
                    (v * scale).round() / scale
                } else {
                    v
                }
            }
        }
    }

    pub fn make_precise(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.make_precise_value(c.x),
            y: self.make_precise_value(c.y),
        }
    }

    /// Rejects coordinates whose scaled magnitude leaves the exact-integer
    /// range of f64, which would make grid snapping lossy.
    pub fn check_magnitude(&self, c: Coord<f64>) -> Result<()> {
        if let PrecisionModel::Fixed { scale } = self {
            for v in [c.x, c.y] {
                if v.is_finite() && (v * scale).abs() > MAX_EXACT_INT {
                    return Err(TopologyError::NumericOverflow {
                        value: v,
                        scale: *scale,
                    });
                }
            }
        }
        Ok(())
    }
}
