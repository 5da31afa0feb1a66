pub mod builder;
pub mod envelope;
pub mod precision;

pub use envelope::Envelope;
pub use precision::PrecisionModel;

/// Point location relative to an area or line, per the DE-9IM model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    /// Index into a DE-9IM matrix row/column.
    pub(crate) fn index(self) -> usize {
        match self {
            Location::Interior => 0,
            Location::Boundary => 1,
            Location::Exterior => 2,
        }
    }
}
