use packgraph_graph::GraphError;
use thiserror::Error;

use crate::build_graph::NodeType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildGraphError {
  #[error("Targets are required when entries are specified")]
  MissingTargets,

  #[error("Cannot invalidate node {id} with type {node_type}")]
  CannotInvalidate { id: String, node_type: NodeType },

  #[error("Unrecognized file event kind {0}")]
  UnknownFileEventKind(String),

  #[error(transparent)]
  Graph(#[from] GraphError),
}
