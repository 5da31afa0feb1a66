//! Cascaded polygon union.
//!
//! Unioning a large set pairwise in input order degenerates: late unions
//! merge huge accumulated geometries against tiny inputs. Ordering the
//! polygons spatially and merging as a balanced binary tree keeps both
//! sides of every union comparable in size and mostly adjacent, which is
//! where the pairwise overlay is cheapest. Because the pairwise union is
//! exact, the grouping cannot change the result, only the cost.

use crate::error::Result;
use crate::geom::{Envelope, PrecisionModel};
use crate::index::StrTree;
use crate::overlay;
use crate::utils::z_order_index;
use geo_types::{Coord, MultiPolygon, Polygon};

/// Small fan-out keeps sibling groups tightly clustered.
const UNION_TREE_CAPACITY: usize = 4;

/// Below this count a tree build costs more than it saves; a Z-order
/// sort of envelope centres gives the same locality.
const TREE_BUILD_THRESHOLD: usize = 8;

/// Unions all polygons into one polygonal result under floating
/// precision.
pub fn cascaded_union(polys: &[Polygon<f64>]) -> Result<MultiPolygon<f64>> {
    cascaded_union_with(polys, &PrecisionModel::Floating)
}

/// Unions all polygons, snap-rounding intermediate boundaries to the
/// given precision model.
pub fn cascaded_union_with(
    polys: &[Polygon<f64>],
    pm: &PrecisionModel,
) -> Result<MultiPolygon<f64>> {
    match polys.len() {
        0 => return Ok(MultiPolygon(Vec::new())),
        1 => return Ok(MultiPolygon(vec![polys[0].clone()])),
        _ => {}
    }

    let ordered: Vec<MultiPolygon<f64>> = if polys.len() <= TREE_BUILD_THRESHOLD {
        let mut refs: Vec<&Polygon<f64>> = polys.iter().collect();
        refs.sort_by_key(|p| {
            let center = Envelope::of_polygon(p)
                .center()
                .unwrap_or(Coord { x: 0.0, y: 0.0 });
            z_order_index(center)
        });
        refs.into_iter()
            .map(|p| MultiPolygon(vec![p.clone()]))
            .collect()
    } else {
        let items: Vec<(Envelope, &Polygon<f64>)> = polys
            .iter()
            .map(|p| (Envelope::of_polygon(p), p))
            .collect();
        let tree = StrTree::bulk_load_with_capacity(items, UNION_TREE_CAPACITY);
        tree.tree_order_items()
            .into_iter()
            .map(|&p| MultiPolygon(vec![p.clone()]))
            .collect()
    };

    log::debug!("cascaded union of {} polygons", ordered.len());
    binary_union(&ordered, pm)
}

fn binary_union(group: &[MultiPolygon<f64>], pm: &PrecisionModel) -> Result<MultiPolygon<f64>> {
    match group.len() {
        0 => Ok(MultiPolygon(Vec::new())),
        1 => Ok(group[0].clone()),
        2 => overlay::union(&group[0], &group[1], pm),
        n => {
            let mid = n / 2;
            #[cfg(feature = "parallel")]
            let (left, right) = rayon::join(
                || binary_union(&group[..mid], pm),
                || binary_union(&group[mid..], pm),
            );
            #[cfg(not(feature = "parallel"))]
            let (left, right) = (binary_union(&group[..mid], pm), binary_union(&group[mid..], pm));
            overlay::union(&left?, &right?, pm)
        }
    }
}

#[cfg(test)]
#[path = "union_tests.rs"]
mod tests;
