use std::sync::Arc;

use packgraph_graph::EdgeTypeFilter;
use packgraph_graph::TraversalActions;

use crate::types::Asset;
use crate::types::Dependency;

use super::build_graph::BuildGraph;
use super::edge::BuildGraphEdgeType;
use super::node::AssetNode;
use super::node::BuildGraphNode;

/// The edges that lead from the root through dependencies and requests to assets
pub(super) fn asset_edges() -> EdgeTypeFilter<BuildGraphEdgeType> {
  EdgeTypeFilter::AnyOf(vec![
    BuildGraphEdgeType::Reference,
    BuildGraphEdgeType::Produces,
  ])
}

impl BuildGraph {
  pub fn get_incomplete_nodes(&self) -> Vec<&BuildGraphNode> {
    self.incomplete.values().collect()
  }

  pub fn get_invalid_nodes(&self) -> Vec<&BuildGraphNode> {
    self.invalid.values().collect()
  }

  pub fn has_incomplete_nodes(&self) -> bool {
    !self.incomplete.is_empty()
  }

  pub fn is_incomplete(&self, id: &str) -> bool {
    self.incomplete.contains_key(id)
  }

  pub fn is_invalid(&self, id: &str) -> bool {
    self.invalid.contains_key(id)
  }

  pub fn get_dependency_nodes(&self) -> Vec<&Arc<Dependency>> {
    self
      .graph
      .nodes()
      .filter_map(|node| match node {
        BuildGraphNode::Dependency(dependency) => Some(dependency),
        _ => None,
      })
      .collect()
  }

  /// Every live asset in the graph, reachable or not
  pub fn get_assets(&self) -> Vec<&Arc<Asset>> {
    self.graph.nodes().filter_map(|node| node.as_live_asset()).collect()
  }

  /// The dependencies of an asset, in source order
  pub fn get_dependencies(&self, asset_id: &str) -> Vec<&Arc<Dependency>> {
    self
      .graph
      .get_nodes_connected_from(asset_id, BuildGraphEdgeType::Reference)
      .into_iter()
      .filter_map(|node| match node {
        BuildGraphNode::Dependency(dependency) => Some(dependency),
        _ => None,
      })
      .collect()
  }

  /// The first asset a dependency leads to, live or tombstoned
  ///
  /// Returns `None` when the dependency does not exist or has not resolved to an asset yet.
  pub fn get_dependency_resolution(&self, dependency_id: &str) -> Option<&AssetNode> {
    if !matches!(
      self.graph.get_node(dependency_id),
      Some(BuildGraphNode::Dependency(_))
    ) {
      return None;
    }

    let mut resolution = None;

    self.graph.traverse(
      |node, actions| {
        if let BuildGraphNode::Asset(asset) = node {
          resolution = Some(asset);
          actions.stop();
        }
      },
      Some(dependency_id),
      asset_edges(),
    );

    resolution
  }

  /// Visits each live asset reachable from the root, depth first
  pub fn traverse_assets<'a, F>(&'a self, mut visit: F)
  where
    F: FnMut(&'a Arc<Asset>, &mut TraversalActions),
  {
    self.graph.traverse(
      |node, actions| {
        if let Some(asset) = node.as_live_asset() {
          visit(asset, actions);
        }
      },
      None,
      asset_edges(),
    );
  }

  pub fn get_total_size(&self) -> u64 {
    let mut size = 0;
    self.traverse_assets(|asset, _| size += asset.stats.size);
    size
  }

  /// The first assets reached from the root, without the assets they import
  pub fn get_entry_assets(&self) -> Vec<&Arc<Asset>> {
    let mut entries = Vec::new();

    self.traverse_assets(|asset, actions| {
      entries.push(asset);
      actions.skip_children();
    });

    entries
  }

  pub(super) fn live_asset(&self, asset_id: &str) -> Option<&Arc<Asset>> {
    self
      .graph
      .get_node(asset_id)
      .and_then(|node| node.as_live_asset())
  }
}
