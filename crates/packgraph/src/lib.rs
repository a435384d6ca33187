pub use packgraph_core;
pub use plugins::*;
pub use runner::*;

mod plugins;
mod runner;
