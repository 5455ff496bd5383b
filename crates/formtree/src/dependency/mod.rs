//! Dependency ordering of sibling children.
//!
//! - [`Levels`]: incremental layering of names by declared dependencies
//! - [`DependencyTree`]: the children collection ordered by that layering

pub mod level;
pub mod tree;

pub use level::{Depths, Level, Levels};
pub use tree::DependencyTree;
