pub mod chain;
pub mod strtree;

pub use chain::MonotoneChain;
pub use strtree::StrTree;
