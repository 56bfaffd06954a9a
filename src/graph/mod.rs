//! Graph representation and conversion module

pub mod algorithms;
pub mod builder;
pub mod compressed;
pub mod matrix;
pub mod store;
pub mod view;

pub use builder::GraphBuilder;
pub use compressed::CompressedGraph;
pub use matrix::{CooMatrix, CsrMatrix};
pub use store::GraphStore;
pub use view::{to_indexed, to_indexed_sorted, IndexedView, NodeOrder};
