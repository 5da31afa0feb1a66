use crate::graph::Label;
use geo_types::Coord;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use smallvec::SmallVec;
use std::collections::HashMap;

// Type aliases for indices to ensure we don't mix them up
pub type NodeId = usize;
pub type DirEdgeId = usize;

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub coordinate: Coord<f64>,
    /// Indices of outgoing directed edges.
    /// CRITICAL INVARIANT: sorted by polar angle (CCW) after `sort_edges`.
    pub outgoing: SmallVec<[DirEdgeId; 4]>,
    /// State flag for graph cleaning (dangle removal)
    pub degree: usize,
    pub is_marked: bool,
}

#[derive(Clone, Debug)]
pub struct DirectedEdge {
    pub src: NodeId,
    pub dst: NodeId,
    /// Index of the symmetric (reverse) edge
    pub sym: DirEdgeId,
    /// Precomputed angle for efficient sorting
    pub angle: f64,
    /// Which input operand contributed this edge
    pub operand: usize,
    pub label: Label,
    /// Traversal state: has this edge been processed into a ring?
    pub is_visited: bool,
    /// Is this edge excluded from traversal (dangle / dropped segment)
    pub is_marked: bool,
}

pub struct PlanarGraph {
    /// All nodes in the graph. Index is `NodeId`.
    pub nodes: Vec<GraphNode>,
    /// All directed half-edges. Index is `DirEdgeId`.
    pub dir_edges: Vec<DirectedEdge>,
    /// Lookup map to dedup nodes during construction.
    pub node_map: HashMap<NodeKey, NodeId>,
}

// Wrapper for Coord to be hashable (f64 is not Hash)
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
pub struct NodeKey(u64, u64);

impl From<Coord<f64>> for NodeKey {
    fn from(c: Coord<f64>) -> Self {
        NodeKey(c.x.to_bits(), c.y.to_bits())
    }
}

impl Default for PlanarGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanarGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            dir_edges: Vec::new(),
            node_map: HashMap::new(),
        }
    }

    pub fn add_node(&mut self, coord: Coord<f64>) -> NodeId {
        let key = NodeKey::from(coord);
        if let Some(&id) = self.node_map.get(&key) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(GraphNode {
            coordinate: coord,
            outgoing: SmallVec::new(),
            degree: 0,
            is_marked: false,
        });
        self.node_map.insert(key, id);
        id
    }

    pub fn find_node(&self, coord: Coord<f64>) -> Option<NodeId> {
        self.node_map.get(&NodeKey::from(coord)).copied()
    }

    /// Inserts a segment as a forward/reverse directed edge pair.
    /// The endpoints become nodes; degenerate segments are ignored.
    /// Returns the forward edge id.
    pub fn add_segment(
        &mut self,
        p0: Coord<f64>,
        p1: Coord<f64>,
        operand: usize,
        label: Label,
    ) -> Option<DirEdgeId> {
        if p0 == p1 {
            return None;
        }
        let u = self.add_node(p0);
        let v = self.add_node(p1);

        let fwd = self.dir_edges.len();
        let rev = fwd + 1;

        self.dir_edges.push(DirectedEdge {
            src: u,
            dst: v,
            sym: rev,
            angle: (p1.y - p0.y).atan2(p1.x - p0.x),
            operand,
            label,
            is_visited: false,
            is_marked: false,
        });
        self.dir_edges.push(DirectedEdge {
            src: v,
            dst: u,
            sym: fwd,
            angle: (p0.y - p1.y).atan2(p0.x - p1.x),
            operand,
            label: label.flipped(),
            is_visited: false,
            is_marked: false,
        });

        self.nodes[u].outgoing.push(fwd);
        self.nodes[u].degree += 1;
        self.nodes[v].outgoing.push(rev);
        self.nodes[v].degree += 1;
        Some(fwd)
    }

    /// Sorts all outgoing edges of all nodes by angle (CCW).
    pub fn sort_edges(&mut self) {
        let dir_edges = &self.dir_edges;
        let sort_node = |node: &mut GraphNode| {
            node.outgoing.sort_by(|&a, &b| {
                dir_edges[a]
                    .angle
                    .partial_cmp(&dir_edges[b].angle)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        };
        #[cfg(feature = "parallel")]
        self.nodes.par_iter_mut().for_each(sort_node);
        #[cfg(not(feature = "parallel"))]
        self.nodes.iter_mut().for_each(sort_node);
    }

    /// Prunes dangles (nodes with degree 1) iteratively. Returns the
    /// number of nodes removed.
    pub fn prune_dangles(&mut self) -> usize {
        let mut removed = 0;
        let mut to_process: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.degree == 1 && !n.is_marked)
            .map(|(i, _)| i)
            .collect();

        while let Some(node_idx) = to_process.pop() {
            if self.nodes[node_idx].degree != 1 {
                continue;
            }
            self.nodes[node_idx].is_marked = true;
            self.nodes[node_idx].degree = 0;
            removed += 1;

            let found = self.nodes[node_idx]
                .outgoing
                .iter()
                .copied()
                .find(|&de| !self.dir_edges[de].is_marked);

            if let Some(de) = found {
                self.dir_edges[de].is_marked = true;
                let sym = self.dir_edges[de].sym;
                self.dir_edges[sym].is_marked = true;

                let neighbor_idx = self.dir_edges[de].dst;
                let neighbor = &mut self.nodes[neighbor_idx];
                if neighbor.degree > 0 {
                    neighbor.degree -= 1;
                    if neighbor.degree == 1 && !neighbor.is_marked {
                        to_process.push(neighbor_idx);
                    }
                }
            }
        }
        removed
    }

    /// Extracts minimal rings: arriving at a node, continue with the
    /// first unmarked edge clockwise from the reversed arrival edge in
    /// the angle-sorted star. Edges whose interior side is the left side
    /// therefore trace interior faces CCW and holes CW.
    pub fn extract_rings(&mut self) -> Vec<Vec<Coord<f64>>> {
        let mut rings = Vec::new();

        for de in &mut self.dir_edges {
            de.is_visited = false;
        }

        for start in 0..self.dir_edges.len() {
            if self.dir_edges[start].is_visited || self.dir_edges[start].is_marked {
                continue;
            }

            let mut ring_edges = Vec::new();
            let mut curr = start;
            let mut is_valid = true;

            loop {
                self.dir_edges[curr].is_visited = true;
                ring_edges.push(curr);

                let dst = self.dir_edges[curr].dst;
                let sym = self.dir_edges[curr].sym;
                let star = &self.nodes[dst].outgoing;

                let Some(pos) = star.iter().position(|&idx| idx == sym) else {
                    is_valid = false;
                    break;
                };

                // Next unmarked edge CW from the reversed arrival edge.
                let mut next = None;
                for i in 1..=star.len() {
                    let cand = star[(pos + star.len() - i) % star.len()];
                    if !self.dir_edges[cand].is_marked {
                        next = Some(cand);
                        break;
                    }
                }
                let Some(next) = next else {
                    is_valid = false;
                    break;
                };
                curr = next;

                if curr == start {
                    break; // Ring closed
                }
                if self.dir_edges[curr].is_visited {
                    is_valid = false;
                    break;
                }
            }

            if is_valid && !ring_edges.is_empty() {
                let mut coords = Vec::with_capacity(ring_edges.len() + 1);
                coords.push(self.nodes[self.dir_edges[ring_edges[0]].src].coordinate);
                for &de in &ring_edges {
                    coords.push(self.nodes[self.dir_edges[de].dst].coordinate);
                }
                rings.push(coords);
            }
        }
        rings
    }
}
