pub use self::build_graph::*;
pub use self::bundle::*;
pub use self::content_key::*;
pub use self::dispatch::*;
pub use self::edge::*;
pub use self::initialize::*;
pub use self::node::*;
pub use self::resolve::*;

mod build_graph;
mod bundle;
mod content_key;
mod dispatch;
mod edge;
mod initialize;
mod invalidation;
mod node;
mod queries;
mod resolve;
#[cfg(test)]
mod test_utils;
