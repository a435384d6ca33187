use std::path::PathBuf;
use std::sync::Arc;

use packgraph_graph::GraphError;
use packgraph_graph::GraphNode;

use crate::types::ConfigRequest;
use crate::types::ConfigRequestResult;
use crate::types::DevDep;
use crate::types::TransformerRequest;
use crate::types::TransformerRequestResult;
use crate::BuildGraphError;

use super::build_graph::BuildGraph;
use super::edge::BuildGraphEdgeType;
use super::node::AssetNode;
use super::node::BuildGraphNode;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DependencyResolution {
  /// The request the dependency resolved to, when no other dependency shares it yet
  pub new_request_node: Option<BuildGraphNode>,
  pub pruned_files: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformResolution {
  pub new_dependency_nodes: Vec<BuildGraphNode>,
  pub new_config_request_nodes: Vec<BuildGraphNode>,
  pub removed_files: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigResolution {
  pub dev_dep_request_nodes: Vec<BuildGraphNode>,
  pub removed_files: Vec<PathBuf>,
}

impl BuildGraph {
  /// Links a dependency to the request for the file it resolved to
  pub fn resolve_dependency(
    &mut self,
    dependency_id: &str,
    request: TransformerRequest,
  ) -> Result<DependencyResolution, BuildGraphError> {
    if !self.has_node_of_kind(dependency_id, |node| matches!(node, BuildGraphNode::Dependency(_))) {
      return Ok(DependencyResolution::default());
    }

    tracing::debug!(
      dependency = dependency_id,
      file_path = %request.file_path.display(),
      "Resolved dependency"
    );

    self.forget(dependency_id);

    let request_node = self.transformer_request_node(request);
    let updates = self.replace(
      dependency_id,
      vec![request_node.clone()],
      BuildGraphEdgeType::Reference,
    )?;

    let new_request_node = if updates.added.has_node(request_node.id()) {
      self.mark_incomplete(&request_node);
      Some(request_node)
    } else {
      None
    };

    Ok(DependencyResolution {
      new_request_node,
      pruned_files: Self::removed_files(&updates),
    })
  }

  /// Marks a dependency as resolving to nothing, e.g. an optional dependency that is not installed
  pub fn exclude_dependency(&mut self, dependency_id: &str) -> Result<Vec<PathBuf>, BuildGraphError> {
    if !self.has_node_of_kind(dependency_id, |node| matches!(node, BuildGraphNode::Dependency(_))) {
      return Ok(Vec::new());
    }

    tracing::debug!(dependency = dependency_id, "Excluded dependency");

    self.forget(dependency_id);
    let updates = self.replace(dependency_id, Vec::new(), BuildGraphEdgeType::Reference)?;

    Ok(Self::removed_files(&updates))
  }

  /// Records the assets a transformer request produced
  ///
  /// The request is linked to the files it read, to its assets, to the config requests it made,
  /// and each asset to its dependencies. Dependencies and config requests that are new to the
  /// graph are returned and become incomplete. Config requests the transform no longer makes are
  /// pruned along with their subtree.
  pub fn resolve_transformer_request(
    &mut self,
    request_id: &str,
    result: TransformerRequestResult,
  ) -> Result<TransformResolution, BuildGraphError> {
    let Some(BuildGraphNode::TransformerRequest(node)) = self.graph.get_node(request_id).cloned()
    else {
      return Ok(TransformResolution::default());
    };

    tracing::debug!(
      request = request_id,
      file_path = %node.request.file_path.display(),
      assets = result.assets.len(),
      "Resolved transformer request"
    );

    self.forget(request_id);

    let mut removed_files = Vec::new();

    let files = std::iter::once(&node.request.file_path)
      .chain(result.connected_files.iter())
      .map(|file_path| BuildGraphNode::file(file_path.clone()))
      .collect();
    let updates = self.replace(request_id, files, BuildGraphEdgeType::InvalidatedByChangeTo)?;
    removed_files.extend(Self::removed_files(&updates));

    let assets: Vec<Arc<_>> = result.assets.into_iter().map(Arc::new).collect();
    let asset_nodes = assets
      .iter()
      .map(|asset| BuildGraphNode::Asset(AssetNode::Live(asset.clone())))
      .collect();
    let updates = self.replace(request_id, asset_nodes, BuildGraphEdgeType::Produces)?;
    removed_files.extend(Self::removed_files(&updates));

    let mut new_dependency_nodes = Vec::new();
    for asset in assets.iter() {
      let dependency_nodes: Vec<BuildGraphNode> = asset
        .dependencies
        .values()
        .map(|dependency| BuildGraphNode::Dependency(Arc::new(dependency.clone())))
        .collect();

      let updates = self.replace(
        &asset.id,
        dependency_nodes.clone(),
        BuildGraphEdgeType::Reference,
      )?;
      removed_files.extend(Self::removed_files(&updates));

      for dependency_node in dependency_nodes {
        if updates.added.has_node(dependency_node.id()) {
          self.mark_incomplete(&dependency_node);
          new_dependency_nodes.push(dependency_node);
        }
      }
    }

    let config_request_nodes: Vec<BuildGraphNode> = result
      .config_requests
      .into_iter()
      .map(|request| self.config_request_node(request))
      .collect();
    let updates = self.replace(
      request_id,
      config_request_nodes.clone(),
      BuildGraphEdgeType::Reference,
    )?;
    removed_files.extend(Self::removed_files(&updates));

    let mut new_config_request_nodes = Vec::new();
    for config_request_node in config_request_nodes {
      if updates.added.has_node(config_request_node.id()) {
        self.mark_incomplete(&config_request_node);
        new_config_request_nodes.push(config_request_node);
      }
    }

    Ok(TransformResolution {
      new_dependency_nodes,
      new_config_request_nodes,
      removed_files,
    })
  }

  /// Adds a config request for `requester_id`
  ///
  /// Returns the request node when it is new to the graph, in which case it is incomplete.
  pub fn add_config_request(
    &mut self,
    request: ConfigRequest,
    requester_id: &str,
  ) -> Result<Option<BuildGraphNode>, BuildGraphError> {
    if !self.graph.has_node(requester_id) {
      return Err(GraphError::NodeNotFound(requester_id.to_string()).into());
    }

    let request_node = self.config_request_node(request);
    let request_id = request_node.id().to_string();

    let is_new = !self.graph.has_node(&request_id);
    if is_new {
      self.graph.add_node(request_node.clone());
    }

    self
      .graph
      .add_edge(requester_id, &request_id, BuildGraphEdgeType::Reference)?;

    if !is_new {
      return Ok(None);
    }

    tracing::debug!(request = %request_id, requester = requester_id, "Added config request");

    self.mark_incomplete(&request_node);
    Ok(Some(request_node))
  }

  /// Records a loaded configuration, the files that invalidate it, and the dev dependencies it
  /// refers to
  ///
  /// Dev dependency requests that are new to the graph are returned and become incomplete.
  pub fn resolve_config_request(
    &mut self,
    request_id: &str,
    result: ConfigRequestResult,
  ) -> Result<ConfigResolution, BuildGraphError> {
    if !self.has_node_of_kind(request_id, |node| matches!(node, BuildGraphNode::ConfigRequest(_))) {
      return Ok(ConfigResolution::default());
    }

    tracing::debug!(
      request = request_id,
      invalidations = result.invalidations.len(),
      dev_deps = result.dev_deps.len(),
      "Resolved config request"
    );

    self.forget(request_id);

    let mut removed_files = Vec::new();

    let config_node = self.config_node(request_id, result.config);
    let updates = self.replace(request_id, vec![config_node], BuildGraphEdgeType::Reference)?;
    removed_files.extend(Self::removed_files(&updates));

    for edge_type in BuildGraphEdgeType::invalidations() {
      let nodes = result
        .invalidations
        .iter()
        .filter(|invalidation| BuildGraphEdgeType::for_file_event(invalidation.action) == edge_type)
        .map(|invalidation| BuildGraphNode::file_or_glob(&invalidation.pattern))
        .collect();

      let updates = self.replace(request_id, nodes, edge_type)?;
      removed_files.extend(Self::removed_files(&updates));
    }

    let dev_dep_request_nodes: Vec<BuildGraphNode> = result
      .dev_deps
      .into_iter()
      .map(|request| self.dev_dep_request_node(request))
      .collect();
    let updates = self.replace(
      request_id,
      dev_dep_request_nodes.clone(),
      BuildGraphEdgeType::Configures,
    )?;
    removed_files.extend(Self::removed_files(&updates));

    let mut new_dev_dep_request_nodes = Vec::new();
    for node in dev_dep_request_nodes {
      if updates.added.has_node(node.id()) {
        self.mark_incomplete(&node);
        new_dev_dep_request_nodes.push(node);
      }
    }

    Ok(ConfigResolution {
      dev_dep_request_nodes: new_dev_dep_request_nodes,
      removed_files,
    })
  }

  /// Records the version a dev dependency request resolved to
  pub fn resolve_dev_dep_request(
    &mut self,
    request_id: &str,
    dev_dep: DevDep,
  ) -> Result<(), BuildGraphError> {
    if !self.has_node_of_kind(request_id, |node| matches!(node, BuildGraphNode::DevDepRequest(_))) {
      return Ok(());
    }

    tracing::debug!(
      request = request_id,
      name = %dev_dep.name,
      version = %dev_dep.version,
      "Resolved dev dependency"
    );

    self.forget(request_id);

    let dev_dep_node = self.dev_dep_node(dev_dep);
    self.replace(request_id, vec![dev_dep_node], BuildGraphEdgeType::ResolvesTo)?;

    Ok(())
  }

  /// Results for nodes that have since left the graph are ignored
  fn has_node_of_kind(&self, id: &str, kind: impl Fn(&BuildGraphNode) -> bool) -> bool {
    match self.graph.get_node(id) {
      Some(node) if kind(node) => true,
      _ => {
        tracing::debug!(id, "Ignoring result for a node that is not in the graph");
        false
      }
    }
  }
}
