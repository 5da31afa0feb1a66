//! Incremental Delaunay triangulation over a quad-edge subdivision.
//!
//! The subdivision is seeded with a frame triangle roughly ten times the
//! input extent, so every site insertion happens strictly inside an
//! existing face and the walking locate never leaves the mesh. Sites are
//! inserted one at a time: locate by walking, connect the new vertex
//! star, then flip suspect edges until the empty-circumcircle invariant
//! holds again.

use crate::error::{Result, TopologyError};
use crate::geom::Envelope;
use crate::predicates::{in_circle, orientation, point_on_segment, ring_signed_area, Orientation};
use crate::triangulate::quadedge::{sym, EdgeArena, EdgeId};
use geo_types::{Coord, Line, LineString, Polygon, Triangle};
use std::collections::HashMap;

const FRAME_VERTEX_COUNT: usize = 3;

pub struct Subdivision {
    arena: EdgeArena,
    verts: Vec<Coord<f64>>,
    /// Walking-locate start hint, updated by every successful locate.
    last: EdgeId,
}

impl Subdivision {
    /// Builds the Delaunay triangulation of the given sites. Duplicate
    /// coordinates are discarded (first occurrence wins). Collinear
    /// input produces a valid edge-only interior.
    pub fn new(points: &[Coord<f64>]) -> Result<Subdivision> {
        if points.is_empty() {
            return Err(TopologyError::DegenerateInput(
                "triangulation requires at least one point".into(),
            ));
        }
        for &p in points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(TopologyError::InvalidGeometry(
                    "non-finite coordinate".into(),
                ));
            }
        }

        let env = Envelope::of_coords(points);
        let offset = (env.width().max(env.height()) * 10.0).max(10.0);
        let frame = [
            Coord {
                x: (env.min_x() + env.max_x()) / 2.0,
                y: env.max_y() + offset,
            },
            Coord {
                x: env.min_x() - offset,
                y: env.min_y() - offset,
            },
            Coord {
                x: env.max_x() + offset,
                y: env.min_y() - offset,
            },
        ];

        let mut arena = EdgeArena::new();
        let ea = arena.make_edge(0, 1);
        let eb = arena.make_edge(1, 2);
        arena.splice(sym(ea), eb);
        arena.connect(eb, ea);

        let mut subdiv = Subdivision {
            arena,
            verts: frame.to_vec(),
            last: ea,
        };
        for &p in points {
            subdiv.insert_site(p)?;
        }
        log::debug!(
            "triangulated {} sites, {} edges",
            subdiv.verts.len() - FRAME_VERTEX_COUNT,
            subdiv.arena.edge_count()
        );
        Ok(subdiv)
    }

    pub fn num_sites(&self) -> usize {
        self.verts.len() - FRAME_VERTEX_COUNT
    }

    fn coord(&self, v: usize) -> Coord<f64> {
        self.verts[v]
    }

    /// True if `p` is strictly left of the directed edge, i.e. the turn
    /// org -> dest -> p is counter-clockwise.
    fn left_of(&self, p: Coord<f64>, e: EdgeId) -> bool {
        orientation(
            self.coord(self.arena.org(e)),
            self.coord(self.arena.dest(e)),
            p,
        ) == Orientation::CounterClockwise
    }

    fn right_of(&self, p: Coord<f64>, e: EdgeId) -> bool {
        self.left_of(p, sym(e))
    }

    /// Walking locate: returns an edge of the face containing `p`, or an
    /// edge `p` lies on, or an edge with `p` as an endpoint.
    fn locate(&mut self, p: Coord<f64>) -> Result<EdgeId> {
        let max_iter = 2 * self.arena.edge_count() + 16;
        let mut e = self.last;
        for _ in 0..max_iter {
            if p == self.coord(self.arena.org(e)) || p == self.coord(self.arena.dest(e)) {
                self.last = e;
                return Ok(e);
            }
            if self.right_of(p, e) {
                e = sym(e);
            } else if !self.right_of(p, self.arena.onext(e)) {
                e = self.arena.onext(e);
            } else if !self.right_of(p, self.arena.dprev(e)) {
                e = self.arena.dprev(e);
            } else {
                self.last = e;
                return Ok(e);
            }
        }
        Err(TopologyError::LocateFailure { coord: p })
    }

    /// Inserts one site, restoring the Delaunay invariant afterwards.
    fn insert_site(&mut self, p: Coord<f64>) -> Result<()> {
        let mut e = self.locate(p)?;

        // Duplicate site: first insertion wins.
        if p == self.coord(self.arena.org(e)) || p == self.coord(self.arena.dest(e)) {
            return Ok(());
        }
        if point_on_segment(
            p,
            self.coord(self.arena.org(e)),
            self.coord(self.arena.dest(e)),
        ) {
            // The site splits an existing edge; remove it and re-mesh
            // the surrounding quadrilateral through the new vertex.
            e = self.arena.oprev(e);
            let on = self.arena.onext(e);
            self.arena.delete_edge(on);
        }

        let vid = self.verts.len();
        self.verts.push(p);

        // Connect the new vertex to the surrounding polygon.
        let mut base = self.arena.make_edge(self.arena.org(e), vid);
        self.arena.splice(base, e);
        let start = base;
        loop {
            base = self.arena.connect(e, sym(base));
            e = self.arena.oprev(base);
            if self.arena.lnext(e) == start {
                break;
            }
        }

        // Flip suspect edges until the empty-circumcircle test passes.
        loop {
            let t = self.arena.oprev(e);
            let t_dest = self.coord(self.arena.dest(t));
            if self.right_of(t_dest, e)
                && in_circle(
                    self.coord(self.arena.org(e)),
                    t_dest,
                    self.coord(self.arena.dest(e)),
                    p,
                )
            {
                self.arena.swap(e);
                e = self.arena.oprev(e);
            } else if self.arena.onext(e) == start {
                return Ok(());
            } else {
                e = self.arena.lprev(self.arena.onext(e));
            }
        }
    }

    fn is_frame_vertex(&self, v: usize) -> bool {
        v < FRAME_VERTEX_COUNT
    }

    /// All triangles not touching the frame, i.e. the Delaunay
    /// triangulation of the sites. Every face of the framed subdivision
    /// is a triangle (including the outer face of the frame itself), so
    /// each left-face cycle has exactly three edges.
    pub fn triangles(&self) -> Vec<Triangle<f64>> {
        let mut visited = vec![false; self.arena.slot_count()];
        let mut out = Vec::new();
        let bases: Vec<EdgeId> = self.arena.primal_edges().collect();
        for base in bases {
            for e in [base, sym(base)] {
                if visited[e] {
                    continue;
                }
                let e1 = self.arena.lnext(e);
                let e2 = self.arena.lnext(e1);
                visited[e] = true;
                visited[e1] = true;
                visited[e2] = true;
                let verts = [self.arena.org(e), self.arena.org(e1), self.arena.org(e2)];
                if self.arena.lnext(e2) == e && !verts.iter().any(|&v| self.is_frame_vertex(v)) {
                    out.push(Triangle::new(
                        self.coord(verts[0]),
                        self.coord(verts[1]),
                        self.coord(verts[2]),
                    ));
                }
            }
        }
        out
    }

    /// All site-to-site edges (the triangulation interior, including the
    /// degenerate collinear case where no triangles exist).
    pub fn edges(&self) -> Vec<Line<f64>> {
        let mut out = Vec::new();
        for e in self.arena.primal_edges() {
            let (o, d) = (self.arena.org(e), self.arena.dest(e));
            if !self.is_frame_vertex(o) && !self.is_frame_vertex(d) {
                out.push(Line::new(self.coord(o), self.coord(d)));
            }
        }
        out
    }

    /// The convex hull of the sites as a closed CCW ring.
    pub fn hull(&self) -> LineString<f64> {
        // Hull edges are site-site edges whose left face reaches a frame
        // vertex (the third face vertex, since every face is a triangle).
        let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut directed = 0usize;
        let bases: Vec<EdgeId> = self.arena.primal_edges().collect();
        for base in bases {
            for e in [base, sym(base)] {
                let (o, d) = (self.arena.org(e), self.arena.dest(e));
                if self.is_frame_vertex(o) || self.is_frame_vertex(d) {
                    continue;
                }
                let third = self.arena.dest(self.arena.lnext(e));
                if self.is_frame_vertex(third) {
                    adjacency.entry(o).or_default().push(d);
                    directed += 1;
                }
            }
        }
        if adjacency.is_empty() {
            // Single site: degenerate hull.
            let p = self.coord(FRAME_VERTEX_COUNT);
            return LineString::new(vec![p, p]);
        }

        // Chain the directed edges into a ring, avoiding immediate
        // backtracking so the degenerate collinear hull closes too.
        let start = *adjacency
            .keys()
            .min_by(|a, b| {
                let pa = self.coord(**a);
                let pb = self.coord(**b);
                (pa.x, pa.y).partial_cmp(&(pb.x, pb.y)).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(&FRAME_VERTEX_COUNT);
        let mut ring_verts = vec![start];
        let mut prev = usize::MAX;
        let mut cur = start;
        for _ in 0..directed {
            let Some(nexts) = adjacency.get_mut(&cur) else {
                break;
            };
            let pick = nexts
                .iter()
                .position(|&d| d != prev)
                .or(if nexts.is_empty() { None } else { Some(0) });
            let Some(pick) = pick else { break };
            let next = nexts.swap_remove(pick);
            ring_verts.push(next);
            prev = cur;
            cur = next;
            if cur == start {
                break;
            }
        }

        let mut coords: Vec<Coord<f64>> = ring_verts.iter().map(|&v| self.coord(v)).collect();
        if coords.first() != coords.last() {
            if let Some(&first) = coords.first() {
                coords.push(first);
            }
        }
        if ring_signed_area(&coords) < 0.0 {
            coords.reverse();
        }
        LineString::new(coords)
    }

    /// Voronoi cells of all sites: each site paired with the CCW polygon
    /// of the circumcenters of its surrounding triangles. The frame makes
    /// every cell bounded; outermost cells extend toward the frame.
    pub fn voronoi(&self) -> Vec<(Coord<f64>, Polygon<f64>)> {
        // One outgoing edge per vertex.
        let mut vert_edge: HashMap<usize, EdgeId> = HashMap::new();
        for e in self.arena.primal_edges() {
            vert_edge.insert(self.arena.org(e), e);
            vert_edge.insert(self.arena.dest(e), sym(e));
        }

        let mut out = Vec::new();
        for vid in FRAME_VERTEX_COUNT..self.verts.len() {
            let Some(&start) = vert_edge.get(&vid) else {
                continue;
            };
            let max_fan = self.arena.edge_count();
            let mut cell = Vec::new();
            let mut e = start;
            loop {
                let a = self.coord(self.arena.org(e));
                let b = self.coord(self.arena.dest(e));
                let c = self.coord(self.arena.dest(self.arena.lnext(e)));
                cell.push(circumcenter(a, b, c));
                e = self.arena.onext(e);
                if e == start || cell.len() > max_fan {
                    break;
                }
            }
            if let Some(&first) = cell.first() {
                cell.push(first);
            }
            out.push((self.coord(vid), Polygon::new(LineString::new(cell), vec![])));
        }
        out
    }
}

/// Circumcenter of a non-degenerate triangle; falls back to the centroid
/// when the points are collinear.
pub fn circumcenter(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> Coord<f64> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d == 0.0 {
        return Coord {
            x: (a.x + b.x + c.x) / 3.0,
            y: (a.y + b.y + c.y) / 3.0,
        };
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    Coord {
        x: (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        y: (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    }
}
