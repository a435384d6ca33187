use std::path::Path;

use packgraph_graph::GraphNode;

use crate::types::FileEvent;
use crate::types::FileEventKind;
use crate::BuildGraphError;

use super::build_graph::BuildGraph;
use super::edge::BuildGraphEdgeType;
use super::node::BuildGraphNode;

impl BuildGraph {
  /// Invalidates every request affected by a batch of filesystem events
  ///
  /// Returns true when at least one node became invalid.
  #[tracing::instrument(level = "info", skip_all)]
  pub fn respond_to_fs_events(&mut self, events: Vec<FileEvent>) -> Result<bool, BuildGraphError> {
    let mut invalidated = false;

    for event in events {
      invalidated |= self.on_filesystem_event(event.kind, &event.path)?;
    }

    Ok(invalidated)
  }

  /// Invalidates the requests linked to `path` by the edge type for `kind`
  ///
  /// Additions also invalidate requests watching a glob that matches `path`. Events for paths the
  /// graph does not know about are ignored.
  #[tracing::instrument(level = "debug", skip(self, path), fields(path = %path.display()))]
  pub fn on_filesystem_event(
    &mut self,
    kind: FileEventKind,
    path: &Path,
  ) -> Result<bool, BuildGraphError> {
    let edge_type = BuildGraphEdgeType::for_file_event(kind);
    let path = path.to_string_lossy();

    let mut affected: Vec<BuildGraphNode> = Vec::new();

    if let Some(file @ BuildGraphNode::File(_)) = self.graph.get_node(&path) {
      affected.extend(
        self
          .graph
          .get_nodes_connected_to(file.id(), edge_type)
          .into_iter()
          .cloned(),
      );
    }

    if kind == FileEventKind::Add {
      let globs = self.graph.find_nodes(|node| match node {
        BuildGraphNode::Glob(glob) => glob_match::glob_match(&glob.pattern, &path),
        _ => false,
      });

      for glob in globs {
        affected.extend(
          self
            .graph
            .get_nodes_connected_to(glob.id(), edge_type)
            .into_iter()
            .cloned(),
        );
      }
    }

    for node in affected.iter() {
      self.invalidate(node)?;
    }

    Ok(!affected.is_empty())
  }

  /// Marks a request invalid so it is dispatched again
  ///
  /// Config and dev dependency requests also invalidate the requests that asked for them: the
  /// requester of a config request, and the config request and its requester for a dev dependency
  /// request.
  pub fn invalidate(&mut self, node: &BuildGraphNode) -> Result<(), BuildGraphError> {
    match node {
      BuildGraphNode::Dependency(_) | BuildGraphNode::TransformerRequest(_) => {
        self.mark_invalid(node);
      }
      BuildGraphNode::ConfigRequest(_) => {
        self.mark_invalid(node);
        self.invalidate_requesters(node.id());
      }
      BuildGraphNode::DevDepRequest(_) => {
        self.mark_invalid(node);

        let config_requests: Vec<BuildGraphNode> = self
          .graph
          .get_nodes_connected_to(node.id(), BuildGraphEdgeType::Configures)
          .into_iter()
          .cloned()
          .collect();

        for config_request in config_requests {
          self.mark_invalid(&config_request);
          self.invalidate_requesters(config_request.id());
        }
      }
      BuildGraphNode::Root(_)
      | BuildGraphNode::File(_)
      | BuildGraphNode::Glob(_)
      | BuildGraphNode::Asset(_)
      | BuildGraphNode::Config(_)
      | BuildGraphNode::DevDep(_) => {
        return Err(BuildGraphError::CannotInvalidate {
          id: node.id().to_string(),
          node_type: node.node_type(),
        });
      }
    }

    Ok(())
  }

  fn invalidate_requesters(&mut self, config_request_id: &str) {
    let requesters: Vec<BuildGraphNode> = self
      .graph
      .get_nodes_connected_to(config_request_id, BuildGraphEdgeType::Reference)
      .into_iter()
      .filter(|node| node.is_request())
      .cloned()
      .collect();

    for requester in requesters {
      self.mark_invalid(&requester);
    }
  }
}
