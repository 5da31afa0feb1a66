//! Validated, normalizing geometry constructors.
//!
//! The kernel assumes rings are closed, have enough points and carry a
//! normalized winding (shell CCW, holes CW). These constructors enforce
//! that at entry so the algorithms never have to re-check it.

use crate::error::{Result, TopologyError};
use crate::geom::PrecisionModel;
use geo::algorithm::winding_order::Winding;
use geo_types::{Coord, LineString, Polygon};

/// Builds a line string, applying the precision model to every vertex and
/// collapsing consecutive duplicates introduced by snapping.
pub fn line_string(coords: Vec<Coord<f64>>, pm: &PrecisionModel) -> Result<LineString<f64>> {
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    for c in coords {
        pm.check_magnitude(c)?;
        let c = pm.make_precise(c);
        if out.last() != Some(&c) {
            out.push(c);
        }
    }
    if out.len() < 2 {
        return Err(TopologyError::DegenerateInput(format!(
            "line string requires 2 distinct points, got {}",
            out.len()
        )));
    }
    Ok(LineString::new(out))
}

/// Builds a closed ring: at least 4 points (first == last), auto-closing
/// an open input.
pub fn linear_ring(coords: Vec<Coord<f64>>, pm: &PrecisionModel) -> Result<LineString<f64>> {
    let mut ls = line_string(coords, pm)?;
    if !ls.is_closed() {
        let first = ls.0[0];
        ls.0.push(first);
    }
    if ls.0.len() < 4 {
        return Err(TopologyError::InvalidGeometry(format!(
            "ring requires at least 3 distinct points, got {}",
            ls.0.len() - 1
        )));
    }
    Ok(ls)
}

/// Builds a polygon with normalized winding: shell CCW, holes CW.
pub fn polygon(
    shell: Vec<Coord<f64>>,
    holes: Vec<Vec<Coord<f64>>>,
    pm: &PrecisionModel,
) -> Result<Polygon<f64>> {
    let mut shell = linear_ring(shell, pm)?;
    shell.make_ccw_winding();

    let mut interiors = Vec::with_capacity(holes.len());
    for hole in holes {
        let mut ring = linear_ring(hole, pm)?;
        ring.make_cw_winding();
        interiors.push(ring);
    }
    Ok(Polygon::new(shell, interiors))
}

/// Clones a ring's coordinate sequence with enforced winding: CCW for a
/// shell, CW for a hole. Open, too-short or non-finite rings are
/// rejected. Used by the relate and overlay stages, which require the
/// operand interior to lie to the left of every ring direction.
pub(crate) fn normalized_ring(ring: &LineString<f64>, shell: bool) -> Result<Vec<Coord<f64>>> {
    for c in &ring.0 {
        if !c.x.is_finite() || !c.y.is_finite() {
            return Err(TopologyError::InvalidGeometry(
                "non-finite coordinate in ring".into(),
            ));
        }
    }
    if ring.0.len() < 4 || !ring.is_closed() {
        return Err(TopologyError::InvalidGeometry(format!(
            "ring requires at least 3 distinct points and closure, got {} points",
            ring.0.len()
        )));
    }
    let mut ring = ring.clone();
    if shell {
        ring.make_ccw_winding();
    } else {
        ring.make_cw_winding();
    }
    Ok(ring.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::algorithm::winding_order::WindingOrder;

    #[test]
    fn test_line_string_dedups_after_snap() {
        let pm = PrecisionModel::fixed(1.0);
        let ls = line_string(
            vec![
                Coord { x: 0.1, y: 0.2 },
                Coord { x: 0.3, y: -0.1 }, // snaps onto the first point
                Coord { x: 5.0, y: 5.0 },
            ],
            &pm,
        )
        .unwrap();
        assert_eq!(ls.0.len(), 2);
    }

    #[test]
    fn test_degenerate_line_string_rejected() {
        let pm = PrecisionModel::fixed(1.0);
        let err = line_string(
            vec![Coord { x: 0.1, y: 0.1 }, Coord { x: 0.2, y: -0.2 }],
            &pm,
        );
        assert!(matches!(err, Err(TopologyError::DegenerateInput(_))));
    }

    #[test]
    fn test_ring_auto_close() {
        let pm = PrecisionModel::Floating;
        let ring = linear_ring(
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 10.0, y: 0.0 },
                Coord { x: 10.0, y: 10.0 },
            ],
            &pm,
        )
        .unwrap();
        assert!(ring.is_closed());
        assert_eq!(ring.0.len(), 4);
    }

    #[test]
    fn test_polygon_winding_normalized() {
        let pm = PrecisionModel::Floating;
        // Shell given clockwise, hole counter-clockwise.
        let poly = polygon(
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 0.0, y: 10.0 },
                Coord { x: 10.0, y: 10.0 },
                Coord { x: 10.0, y: 0.0 },
            ],
            vec![vec![
                Coord { x: 2.0, y: 2.0 },
                Coord { x: 8.0, y: 2.0 },
                Coord { x: 8.0, y: 8.0 },
                Coord { x: 2.0, y: 8.0 },
            ]],
            &pm,
        )
        .unwrap();
        assert_eq!(poly.exterior().winding_order(), Some(WindingOrder::CounterClockwise));
        assert_eq!(poly.interiors()[0].winding_order(), Some(WindingOrder::Clockwise));
    }

    #[test]
    fn test_too_few_ring_points_rejected() {
        let pm = PrecisionModel::Floating;
        let err = linear_ring(
            vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }],
            &pm,
        );
        assert!(err.is_err());
    }
}
