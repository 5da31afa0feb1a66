use crate::geom::Location;

/// Topological label of a graph edge: for each of the two operands, the
/// location of the edge itself and of the regions on its left and right.
///
/// For an area operand the sides are Interior/Exterior per the ring
/// winding; for a line or point operand there is no 2-D region, so the
/// sides are Exterior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Label {
    pub on: [Location; 2],
    pub left: [Location; 2],
    pub right: [Location; 2],
}

impl Default for Label {
    fn default() -> Self {
        Self {
            on: [Location::Exterior; 2],
            left: [Location::Exterior; 2],
            right: [Location::Exterior; 2],
        }
    }
}

impl Label {
    /// The label of the reverse (sym) edge: sides swap, on stays.
    pub fn flipped(&self) -> Label {
        Label {
            on: self.on,
            left: self.right,
            right: self.left,
        }
    }

    pub fn set_operand(&mut self, operand: usize, on: Location, left: Location, right: Location) {
        self.on[operand] = on;
        self.left[operand] = left;
        self.right[operand] = right;
    }
}
