pub use self::error::*;
pub use self::graph::*;
pub use self::traversal::*;

mod error;
mod graph;
mod traversal;
