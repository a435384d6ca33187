use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
  #[error("Node {0} does not exist in the graph")]
  NodeNotFound(String),
}
