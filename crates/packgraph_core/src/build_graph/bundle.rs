use std::path::PathBuf;
use std::sync::Arc;

use packgraph_graph::Graph;
use packgraph_graph::GraphNode;

use crate::types::Asset;
use crate::BuildGraphError;

use super::build_graph::BuildGraph;
use super::edge::BuildGraphEdgeType;
use super::node::AssetNode;
use super::node::BuildGraphNode;
use super::node::RootNode;
use super::node::ROOT_NODE_ID;
use super::queries::asset_edges;

/// A self-contained slice of the build graph starting at one asset
#[derive(Clone, Debug)]
pub struct Bundle {
  pub entry_asset_id: String,
  graph: Graph<BuildGraphNode, BuildGraphEdgeType>,
}

impl Bundle {
  pub fn graph(&self) -> &Graph<BuildGraphNode, BuildGraphEdgeType> {
    &self.graph
  }

  /// The live assets of the bundle, entry first
  pub fn assets(&self) -> Vec<&Arc<Asset>> {
    let mut assets = Vec::new();
    self.graph.traverse(
      |node, _| {
        if let Some(asset) = node.as_live_asset() {
          assets.push(asset);
        }
      },
      None,
      asset_edges(),
    );
    assets
  }

  pub fn total_size(&self) -> u64 {
    self.assets().iter().map(|asset| asset.stats.size).sum()
  }
}

impl BuildGraph {
  /// Extracts everything reachable from `asset_id` into a graph of its own, rooted at a new root
  /// node that references the asset
  pub fn create_bundle(&self, asset_id: &str) -> Result<Option<Bundle>, BuildGraphError> {
    if self.live_asset(asset_id).is_none() {
      return Ok(None);
    }

    let mut graph = Graph::new();
    graph.set_root_node(BuildGraphNode::Root(RootNode {
      root_dir: self.root_dir().cloned().unwrap_or_else(PathBuf::new),
    }));
    graph.merge(&self.graph.get_subgraph(asset_id, asset_edges()));
    graph.add_edge(ROOT_NODE_ID, asset_id, BuildGraphEdgeType::Reference)?;

    Ok(Some(Bundle {
      entry_asset_id: asset_id.to_string(),
      graph,
    }))
  }

  /// Replaces an asset with a tombstone
  ///
  /// Everything pointing at the asset points at the tombstone instead. What the asset imported is
  /// pruned unless something else still reaches it. Returns the id of the tombstone.
  pub fn remove_asset(&mut self, asset_id: &str) -> Result<Option<String>, BuildGraphError> {
    let Some(asset) = self.live_asset(asset_id).cloned() else {
      return Ok(None);
    };

    let tombstone = BuildGraphNode::Asset(AssetNode::tombstone(asset));
    let tombstone_id = tombstone.id().to_string();

    let removed = self.graph.replace_node(asset_id, tombstone)?;
    for node in removed.nodes() {
      self.forget(node.id());
    }

    tracing::debug!(asset = asset_id, "Removed asset");

    Ok(Some(tombstone_id))
  }
}
