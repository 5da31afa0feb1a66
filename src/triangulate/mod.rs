//! Delaunay triangulation, convex hull and Voronoi diagram.

pub mod delaunay;
pub mod quadedge;

pub use delaunay::{circumcenter, Subdivision};

use crate::error::Result;
use geo_types::{Coord, Line, LineString, Polygon, Triangle};

/// A finished Delaunay triangulation of a point set.
pub struct Triangulation {
    subdiv: Subdivision,
}

impl Triangulation {
    /// Triangulates the given sites. Duplicate points are discarded
    /// (first wins); fully collinear input yields an edge-only result
    /// with no triangles.
    pub fn new(points: &[Coord<f64>]) -> Result<Triangulation> {
        Ok(Triangulation {
            subdiv: Subdivision::new(points)?,
        })
    }

    /// The Delaunay triangles. Every triangle satisfies the
    /// empty-circumcircle property with respect to all sites.
    pub fn triangles(&self) -> Vec<Triangle<f64>> {
        self.subdiv.triangles()
    }

    /// All site-to-site edges of the triangulation.
    pub fn edges(&self) -> Vec<Line<f64>> {
        self.subdiv.edges()
    }

    /// Convex hull of the sites as a closed CCW ring.
    pub fn hull(&self) -> LineString<f64> {
        self.subdiv.hull()
    }

    /// Voronoi diagram: each site with its circumcenter cell polygon.
    pub fn voronoi(&self) -> Vec<(Coord<f64>, Polygon<f64>)> {
        self.subdiv.voronoi()
    }

    pub fn num_sites(&self) -> usize {
        self.subdiv.num_sites()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
