mod graph;
mod layer;
mod shape;
mod types;

pub use graph::*;
pub use layer::*;
pub use shape::*;
pub use types::*;
