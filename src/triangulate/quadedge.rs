//! Quad-edge arena.
//!
//! Each undirected edge occupies one quad of four directed edge slots:
//! the edge, its dual, its reverse, and the reverse dual. An `EdgeId`
//! is `4 * quad + rot`, so the rotation operators are pure index
//! arithmetic and `rot` applied four times is the identity. Deleted
//! quads go on a free list and are reused by `make_edge`.

pub type EdgeId = usize;

/// Vertex slot value for dual edges, which have no primal vertex.
pub const UNSET: usize = usize::MAX;

/// Rotated edge: the dual directed from right face to left face.
#[inline]
pub fn rot(e: EdgeId) -> EdgeId {
    (e & !3) | ((e + 1) & 3)
}

/// Inverse rotation, `rot` three times.
#[inline]
pub fn rot_inv(e: EdgeId) -> EdgeId {
    (e & !3) | ((e + 3) & 3)
}

/// The same edge directed the other way.
#[inline]
pub fn sym(e: EdgeId) -> EdgeId {
    (e & !3) | ((e + 2) & 3)
}

#[derive(Default)]
pub struct EdgeArena {
    /// Next edge CCW around the origin, per slot.
    next: Vec<EdgeId>,
    /// Origin vertex index per slot (`UNSET` on dual slots).
    vert: Vec<usize>,
    alive: Vec<bool>,
    free: Vec<usize>,
}

impl EdgeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live undirected edges.
    pub fn edge_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Total directed-edge slots ever allocated (live or freed).
    pub fn slot_count(&self) -> usize {
        self.next.len()
    }

    pub fn is_alive(&self, e: EdgeId) -> bool {
        self.alive[e >> 2]
    }

    /// Base ids (rot 0) of all live quads.
    pub fn primal_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, &a)| a)
            .map(|(q, _)| q * 4)
    }

    /// Creates an isolated edge from `org` to `dst`. Its left and right
    /// faces coincide until it is spliced into a subdivision.
    pub fn make_edge(&mut self, org: usize, dst: usize) -> EdgeId {
        let q = match self.free.pop() {
            Some(q) => {
                self.alive[q] = true;
                q
            }
            None => {
                let q = self.alive.len();
                self.alive.push(true);
                self.next.resize(self.next.len() + 4, 0);
                self.vert.resize(self.vert.len() + 4, UNSET);
                q
            }
        };
        let e = q * 4;
        self.next[e] = e;
        self.next[e + 1] = e + 3;
        self.next[e + 2] = e + 2;
        self.next[e + 3] = e + 1;
        self.vert[e] = org;
        self.vert[e + 1] = UNSET;
        self.vert[e + 2] = dst;
        self.vert[e + 3] = UNSET;
        e
    }

    /// The fundamental topology operator: joins or splits the two edge
    /// rings at the origins of `a` and `b`, and symmetrically the dual
    /// rings of their left faces.
    pub fn splice(&mut self, a: EdgeId, b: EdgeId) {
        let alpha = rot(self.next[a]);
        let beta = rot(self.next[b]);
        self.next.swap(a, b);
        self.next.swap(alpha, beta);
    }

    /// Disconnects `e` from the subdivision and frees its quad.
    pub fn delete_edge(&mut self, e: EdgeId) {
        let op = self.oprev(e);
        self.splice(e, op);
        let ops = self.oprev(sym(e));
        self.splice(sym(e), ops);
        let q = e >> 2;
        self.alive[q] = false;
        self.free.push(q);
    }

    /// Connects the destination of `a` to the origin of `b` with a new
    /// edge, so that all three share the same left face.
    pub fn connect(&mut self, a: EdgeId, b: EdgeId) -> EdgeId {
        let e = self.make_edge(self.dest(a), self.org(b));
        let ln = self.lnext(a);
        self.splice(e, ln);
        self.splice(sym(e), b);
        e
    }

    /// Rotates the diagonal `e` inside the quadrilateral formed by its
    /// two adjacent triangles.
    pub fn swap(&mut self, e: EdgeId) {
        let a = self.oprev(e);
        let b = self.oprev(sym(e));
        self.splice(e, a);
        self.splice(sym(e), b);
        let la = self.lnext(a);
        self.splice(e, la);
        let lb = self.lnext(b);
        self.splice(sym(e), lb);
        let org = self.dest(a);
        let dst = self.dest(b);
        self.set_org(e, org);
        self.set_dest(e, dst);
    }

    pub fn org(&self, e: EdgeId) -> usize {
        self.vert[e]
    }

    pub fn dest(&self, e: EdgeId) -> usize {
        self.vert[sym(e)]
    }

    pub fn set_org(&mut self, e: EdgeId, v: usize) {
        self.vert[e] = v;
    }

    pub fn set_dest(&mut self, e: EdgeId, v: usize) {
        self.vert[sym(e)] = v;
    }

    pub fn onext(&self, e: EdgeId) -> EdgeId {
        self.next[e]
    }

    pub fn oprev(&self, e: EdgeId) -> EdgeId {
        rot(self.next[rot(e)])
    }

    /// Next edge CCW around the left face.
    pub fn lnext(&self, e: EdgeId) -> EdgeId {
        rot(self.next[rot_inv(e)])
    }

    pub fn lprev(&self, e: EdgeId) -> EdgeId {
        sym(self.next[e])
    }

    pub fn rprev(&self, e: EdgeId) -> EdgeId {
        self.next[sym(e)]
    }

    pub fn dprev(&self, e: EdgeId) -> EdgeId {
        rot_inv(self.next[rot_inv(e)])
    }
}
