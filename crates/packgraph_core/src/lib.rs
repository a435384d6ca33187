pub mod build_graph;
pub mod hash;
pub mod types;

pub use self::error::*;

mod error;
