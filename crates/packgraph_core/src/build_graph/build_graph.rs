use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use packgraph_graph::Graph;
use packgraph_graph::GraphError;
use packgraph_graph::GraphNode;
use packgraph_graph::GraphUpdates;

use crate::hash::ContentHasherRef;
use crate::hash::Xxh3ContentHasher;
use crate::types::Config;
use crate::types::ConfigRequest;
use crate::types::DevDep;
use crate::types::DevDepRequest;
use crate::types::TransformerRequest;

use super::content_key::*;
use super::edge::BuildGraphEdgeType;
use super::node::*;

pub type BuildGraphUpdates = GraphUpdates<BuildGraphNode, BuildGraphEdgeType>;

/// The incremental build graph
///
/// Besides the graph itself this tracks two indices: `incomplete` nodes whose work has not
/// produced a result yet, and `invalid` nodes whose previous result is stale. Every mutation goes
/// through `&mut self`, so a graph has a single writer at a time.
#[derive(Clone, Debug)]
pub struct BuildGraph {
  pub(super) graph: Graph<BuildGraphNode, BuildGraphEdgeType>,
  pub(super) incomplete: IndexMap<String, BuildGraphNode>,
  pub(super) invalid: IndexMap<String, BuildGraphNode>,
  /// Bumped on every invalidation. Entries are kept after a node is pruned, so a node that comes
  /// back never reuses a generation handed out before.
  pub(super) generations: HashMap<String, u64>,
  pub(super) in_flight: HashMap<String, u64>,
  hasher: ContentHasherRef,
}

impl Default for BuildGraph {
  fn default() -> Self {
    BuildGraph::with_hasher(Arc::new(Xxh3ContentHasher))
  }
}

impl BuildGraph {
  pub fn new() -> Self {
    BuildGraph::default()
  }

  pub fn with_hasher(hasher: ContentHasherRef) -> Self {
    BuildGraph {
      graph: Graph::new(),
      incomplete: IndexMap::new(),
      invalid: IndexMap::new(),
      generations: HashMap::new(),
      in_flight: HashMap::new(),
      hasher,
    }
  }

  pub fn graph(&self) -> &Graph<BuildGraphNode, BuildGraphEdgeType> {
    &self.graph
  }

  pub fn get_node(&self, id: &str) -> Option<&BuildGraphNode> {
    self.graph.get_node(id)
  }

  pub fn root_dir(&self) -> Option<&PathBuf> {
    match self.graph.root_node() {
      Some(BuildGraphNode::Root(root)) => Some(&root.root_dir),
      _ => None,
    }
  }

  pub fn transformer_request_node(&self, request: TransformerRequest) -> BuildGraphNode {
    BuildGraphNode::TransformerRequest(TransformerRequestNode {
      id: self.hasher.hash(&transformer_request_key(&request)),
      request: Arc::new(request),
    })
  }

  pub fn config_request_node(&self, request: ConfigRequest) -> BuildGraphNode {
    BuildGraphNode::ConfigRequest(ConfigRequestNode {
      id: self.hasher.hash(&config_request_key(&request)),
      request: Arc::new(request),
    })
  }

  pub fn config_node(&self, config_request_id: &str, config: Config) -> BuildGraphNode {
    BuildGraphNode::Config(ConfigNode {
      id: self.hasher.hash(&config_key(config_request_id, &config)),
      config: Arc::new(config),
    })
  }

  pub fn dev_dep_request_node(&self, request: DevDepRequest) -> BuildGraphNode {
    BuildGraphNode::DevDepRequest(DevDepRequestNode {
      id: self.hasher.hash(&dev_dep_request_key(&request)),
      request: Arc::new(request),
    })
  }

  pub fn dev_dep_node(&self, dev_dep: DevDep) -> BuildGraphNode {
    BuildGraphNode::DevDep(DevDepNode {
      id: self.hasher.hash(&dev_dep_key(&dev_dep)),
      dev_dep: Arc::new(dev_dep),
    })
  }

  /// Reconciles the children of `from` and keeps the indices in step with the graph
  ///
  /// Pruned nodes leave both indices. Children whose payload was refreshed are refreshed in the
  /// indices too.
  pub(super) fn replace(
    &mut self,
    from: &str,
    to_nodes: Vec<BuildGraphNode>,
    edge_type: BuildGraphEdgeType,
  ) -> Result<BuildGraphUpdates, GraphError> {
    let ids: Vec<String> = to_nodes.iter().map(|node| node.id().to_string()).collect();
    let updates = self
      .graph
      .replace_nodes_connected_to(from, to_nodes, edge_type)?;

    for node in updates.removed.nodes() {
      self.forget(node.id());
    }

    for id in ids {
      if let Some(node) = self.graph.get_node(&id) {
        if let Some(entry) = self.incomplete.get_mut(&id) {
          *entry = node.clone();
        }
        if let Some(entry) = self.invalid.get_mut(&id) {
          *entry = node.clone();
        }
      }
    }

    Ok(updates)
  }

  /// Drops `id` from the indices, either because its work produced a result or because the node
  /// left the graph
  pub(super) fn forget(&mut self, id: &str) {
    self.incomplete.shift_remove(id);
    self.invalid.shift_remove(id);
    self.in_flight.remove(id);
  }

  pub(super) fn mark_incomplete(&mut self, node: &BuildGraphNode) {
    self
      .incomplete
      .insert(node.id().to_string(), node.clone());
  }

  pub(super) fn mark_invalid(&mut self, node: &BuildGraphNode) {
    let id = node.id().to_string();
    let generation = self.generations.entry(id.clone()).or_default();
    *generation += 1;

    tracing::info!(
      id = %id,
      node_type = %node.node_type(),
      generation = *generation,
      "Invalidated node"
    );

    self.invalid.insert(id, node.clone());
  }

  pub(super) fn generation(&self, id: &str) -> u64 {
    self.generations.get(id).copied().unwrap_or_default()
  }

  pub(super) fn removed_files(updates: &BuildGraphUpdates) -> Vec<PathBuf> {
    updates
      .removed
      .nodes()
      .filter_map(|node| node.as_file_path())
      .map(|path| path.to_path_buf())
      .collect()
  }
}
