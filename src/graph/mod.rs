pub mod label;
pub mod planar_graph;

pub use label::Label;
pub use planar_graph::{DirEdgeId, DirectedEdge, GraphNode, NodeId, PlanarGraph};

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
