use geo_types::Coord;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Noding failed: residual crossing near ({}, {}) after {passes} snap-rounding passes", coord.x, coord.y)]
    NodingFailure { coord: Coord<f64>, passes: usize },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Coordinate magnitude {value} overflows fixed precision scale {scale}")]
    NumericOverflow { value: f64, scale: f64 },

    #[error("Triangulation locate walk failed near ({}, {})", coord.x, coord.y)]
    LocateFailure { coord: Coord<f64> },
}

pub type Result<T> = std::result::Result<T, TopologyError>;
