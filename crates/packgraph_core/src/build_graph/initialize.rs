use std::path::PathBuf;
use std::sync::Arc;

use packgraph_graph::GraphNode;
use serde::Deserialize;

use crate::types::Dependency;
use crate::types::Target;
use crate::types::TransformerRequest;
use crate::BuildGraphError;

use super::build_graph::BuildGraph;
use super::edge::BuildGraphEdgeType;
use super::node::BuildGraphNode;
use super::node::RootNode;
use super::node::ROOT_NODE_ID;

/// What a build starts from
///
/// Either `entries`, built once per target, or a single `transformer_request` when building a
/// sub-bundle.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeOptions {
  pub entries: Option<Vec<String>>,
  pub targets: Option<Vec<Target>>,
  pub transformer_request: Option<TransformerRequest>,
  pub root_dir: PathBuf,
}

impl BuildGraph {
  /// Creates the root node and the nodes the build starts from
  ///
  /// Returns the new nodes, which are all incomplete.
  pub fn initialize(
    &mut self,
    options: InitializeOptions,
  ) -> Result<Vec<BuildGraphNode>, BuildGraphError> {
    let InitializeOptions {
      entries,
      targets,
      transformer_request,
      root_dir,
    } = options;

    let mut nodes = Vec::new();

    if let Some(entries) = entries {
      let targets = match targets {
        Some(targets) if !targets.is_empty() => targets,
        _ => return Err(BuildGraphError::MissingTargets),
      };

      for entry in entries.iter() {
        for target in targets.iter() {
          let dependency = Dependency::entry(entry.clone(), target.clone(), root_dir.clone());
          nodes.push(BuildGraphNode::Dependency(Arc::new(dependency)));
        }
      }
    } else if let Some(request) = transformer_request {
      nodes.push(self.transformer_request_node(request));
    }

    self
      .graph
      .set_root_node(BuildGraphNode::Root(RootNode { root_dir }));

    let updates = self.replace(ROOT_NODE_ID, nodes.clone(), BuildGraphEdgeType::Reference)?;

    let new_nodes: Vec<BuildGraphNode> = nodes
      .into_iter()
      .filter(|node| updates.added.has_node(node.id()))
      .collect();

    for node in new_nodes.iter() {
      self.mark_incomplete(node);
    }

    tracing::debug!(nodes = new_nodes.len(), "Initialized build graph");

    Ok(new_nodes)
  }
}
