//! The view tree: ids, nodes, capability contracts, arena operations.

pub mod node;
pub mod query;
pub mod traits;
pub mod tree;

pub use node::{LayoutState, ViewId, ViewKind, ViewNode};
pub use traits::{Container, Measure, Measured, Placement};
pub use tree::ViewTree;
