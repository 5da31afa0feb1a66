//! Bulk-loaded Sort-Tile-Recursive bounding-box tree.
//!
//! Build is O(n log n); the tree is read-only afterwards. Queries return a
//! superset of the envelope-overlapping items: false positives are the
//! caller's problem, false negatives never happen.

use crate::geom::Envelope;
use std::cmp::Ordering;

pub const DEFAULT_NODE_CAPACITY: usize = 10;

#[derive(Debug)]
enum NodeKind {
    /// Indices into `items`.
    Leaf(Vec<usize>),
    /// Indices into `nodes`.
    Inner(Vec<usize>),
}

#[derive(Debug)]
struct Node {
    env: Envelope,
    kind: NodeKind,
}

#[derive(Debug)]
pub struct StrTree<T> {
    items: Vec<(Envelope, T)>,
    nodes: Vec<Node>,
    root: Option<usize>,
    capacity: usize,
}

impl<T> StrTree<T> {
    pub fn bulk_load(items: Vec<(Envelope, T)>) -> Self {
        Self::bulk_load_with_capacity(items, DEFAULT_NODE_CAPACITY)
    }

    pub fn bulk_load_with_capacity(items: Vec<(Envelope, T)>, capacity: usize) -> Self {
        let capacity = capacity.max(2);
        let mut tree = Self { items, nodes: Vec::new(), root: None, capacity };
        if tree.items.is_empty() {
            return tree;
        }

        // Leaf level: STR-pack item indices.
        let idx: Vec<usize> = (0..tree.items.len()).collect();
        let envs: Vec<Envelope> = tree.items.iter().map(|(e, _)| *e).collect();
        let leaf_groups = str_pack(&idx, &envs, capacity);

        let mut level: Vec<usize> = Vec::with_capacity(leaf_groups.len());
        for group in leaf_groups {
            let mut env = Envelope::null();
            for &i in &group {
                env.expand_to_include_envelope(&tree.items[i].0);
            }
            tree.nodes.push(Node { env, kind: NodeKind::Leaf(group) });
            level.push(tree.nodes.len() - 1);
        }

        // Pack upper levels until a single root remains.
        while level.len() > 1 {
            let envs: Vec<Envelope> = level.iter().map(|&n| tree.nodes[n].env).collect();
            let groups = str_pack(&level, &envs, capacity);
            let mut next = Vec::with_capacity(groups.len());
            for group in groups {
                let mut env = Envelope::null();
                for &n in &group {
                    env.expand_to_include_envelope(&tree.nodes[n].env);
                }
                tree.nodes.push(Node { env, kind: NodeKind::Inner(group) });
                next.push(tree.nodes.len() - 1);
            }
            level = next;
        }

        tree.root = Some(level[0]);
        log::trace!(
            "StrTree built: {} items, {} nodes, capacity {}",
            tree.items.len(),
            tree.nodes.len(),
            capacity
        );
        tree
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn query(&self, search: &Envelope) -> Vec<&T> {
        let mut out = Vec::new();
        self.query_visit(search, |item| out.push(item));
        out
    }

    pub fn query_visit<'a, F: FnMut(&'a T)>(&'a self, search: &Envelope, mut visit: F) {
        if let Some(root) = self.root {
            self.visit_node(root, search, &mut visit);
        }
    }

    fn visit_node<'a, F: FnMut(&'a T)>(&'a self, node: usize, search: &Envelope, visit: &mut F) {
        let node = &self.nodes[node];
        if !node.env.intersects(search) {
            return;
        }
        match &node.kind {
            NodeKind::Leaf(items) => {
                for &i in items {
                    if self.items[i].0.intersects(search) {
                        visit(&self.items[i].1);
                    }
                }
            }
            NodeKind::Inner(children) => {
                for &c in children {
                    self.visit_node(c, search, visit);
                }
            }
        }
    }

    /// Payloads in spatially coherent (leaf traversal) order. Cascaded
    /// union consumes this so nearby polygons get merged first.
    pub fn tree_order_items(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.items.len());
        if let Some(root) = self.root {
            self.collect_node(root, &mut out);
        }
        out
    }

    fn collect_node<'a>(&'a self, node: usize, out: &mut Vec<&'a T>) {
        match &self.nodes[node].kind {
            NodeKind::Leaf(items) => out.extend(items.iter().map(|&i| &self.items[i].1)),
            NodeKind::Inner(children) => {
                for &c in children {
                    self.collect_node(c, out);
                }
            }
        }
    }
}

/// Sort-Tile-Recursive packing of one level: sort by centre x, cut into
/// vertical slices, sort each slice by centre y, chunk to capacity.
fn str_pack(ids: &[usize], envs: &[Envelope], capacity: usize) -> Vec<Vec<usize>> {
    debug_assert_eq!(ids.len(), envs.len());
    let n = ids.len();
    if n <= capacity {
        return vec![ids.to_vec()];
    }

    let center = |e: &Envelope| e.center().unwrap_or(geo_types::Coord { x: 0.0, y: 0.0 });
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        center(&envs[a])
            .x
            .partial_cmp(&center(&envs[b]).x)
            .unwrap_or(Ordering::Equal)
    });

    let leaf_count = n.div_ceil(capacity);
    let slice_count = (leaf_count as f64).sqrt().ceil() as usize;
    let slice_len = n.div_ceil(slice_count);

    let mut groups = Vec::with_capacity(leaf_count);
    for slice in order.chunks(slice_len) {
        let mut slice: Vec<usize> = slice.to_vec();
        slice.sort_by(|&a, &b| {
            center(&envs[a])
                .y
                .partial_cmp(&center(&envs[b]).y)
                .unwrap_or(Ordering::Equal)
        });
        for chunk in slice.chunks(capacity) {
            groups.push(chunk.iter().map(|&i| ids[i]).collect());
        }
    }
    groups
}
