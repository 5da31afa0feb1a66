//! DE-9IM intersection matrices and the relate engine.

pub mod compute;

pub use compute::{dimension_of, relate};

use crate::geom::Location;
use std::fmt;

/// Dimensionally Extended 9-Intersection Model matrix.
///
/// Rows index the first operand's interior/boundary/exterior, columns the
/// second's. Entries are the dimension of the pairwise intersection:
/// `-1` (empty, printed `F`), `0`, `1` or `2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntersectionMatrix {
    dims: [[i8; 3]; 3],
}

impl Default for IntersectionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl IntersectionMatrix {
    pub fn new() -> Self {
        Self { dims: [[-1; 3]; 3] }
    }

    pub fn get(&self, row: Location, col: Location) -> i8 {
        self.dims[row.index()][col.index()]
    }

    pub fn set(&mut self, row: Location, col: Location, dim: i8) {
        self.dims[row.index()][col.index()] = dim;
    }

    /// Raises an entry to `dim` if it is currently lower.
    pub fn set_at_least(&mut self, row: Location, col: Location, dim: i8) {
        if self.dims[row.index()][col.index()] < dim {
            self.dims[row.index()][col.index()] = dim;
        }
    }

    /// Transposes operands: `relate(B, A)` from `relate(A, B)`.
    pub fn transposed(&self) -> IntersectionMatrix {
        let mut out = IntersectionMatrix::new();
        for r in 0..3 {
            for c in 0..3 {
                out.dims[c][r] = self.dims[r][c];
            }
        }
        out
    }

    /// Matches the matrix against a 9-character DE-9IM pattern, row-major.
    /// Pattern symbols: `T` (any non-empty), `F` (empty), `*` (anything),
    /// `0`/`1`/`2` (exact dimension). A malformed pattern never matches.
    pub fn matches(&self, pattern: &str) -> bool {
        let bytes = pattern.as_bytes();
        if bytes.len() != 9 {
            return false;
        }
        for (i, &sym) in bytes.iter().enumerate() {
            let dim = self.dims[i / 3][i % 3];
            let ok = match sym {
                b'*' => true,
                b'T' => dim >= 0,
                b'F' => dim == -1,
                b'0' => dim == 0,
                b'1' => dim == 1,
                b'2' => dim == 2,
                _ => return false,
            };
            if !ok {
                return false;
            }
        }
        true
    }

    pub fn is_disjoint(&self) -> bool {
        self.matches("FF*FF****")
    }

    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    pub fn is_contains(&self) -> bool {
        self.matches("T*****FF*")
    }

    pub fn is_within(&self) -> bool {
        self.matches("T*F**F***")
    }

    pub fn is_covers(&self) -> bool {
        self.matches("T*****FF*")
            || self.matches("*T****FF*")
            || self.matches("***T**FF*")
            || self.matches("****T*FF*")
    }

    pub fn is_covered_by(&self) -> bool {
        self.matches("T*F**F***")
            || self.matches("*TF**F***")
            || self.matches("**FT*F***")
            || self.matches("**F*TF***")
    }

    pub fn is_touches(&self) -> bool {
        self.matches("FT*******") || self.matches("F**T*****") || self.matches("F***T****")
    }

    /// Crosses is dimension-dependent; `dim_a`/`dim_b` are the operand
    /// dimensions (0, 1 or 2).
    pub fn is_crosses(&self, dim_a: i8, dim_b: i8) -> bool {
        if dim_a < dim_b {
            self.matches("T*T******")
        } else if dim_a > dim_b {
            self.matches("T*****T**")
        } else if dim_a == 1 {
            self.matches("0********")
        } else {
            false
        }
    }

    pub fn is_overlaps(&self, dim_a: i8, dim_b: i8) -> bool {
        if dim_a != dim_b {
            return false;
        }
        if dim_a == 1 {
            self.matches("1*T***T**")
        } else {
            self.matches("T*T***T**")
        }
    }

    pub fn is_equals_topo(&self) -> bool {
        self.matches("T*F**FFF*")
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.dims {
            for &dim in row {
                let ch = match dim {
                    -1 => 'F',
                    0 => '0',
                    1 => '1',
                    _ => '2',
                };
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}
