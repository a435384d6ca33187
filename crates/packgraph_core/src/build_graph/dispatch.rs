use std::collections::HashSet;

use packgraph_graph::GraphNode;

use super::build_graph::BuildGraph;
use super::node::BuildGraphNode;

/// A ticket for one unit of work handed to a worker
///
/// The result may only be applied while [`BuildGraph::is_current`] holds for the ticket. Once the
/// node is invalidated again, the result describes stale inputs and is discarded.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
  pub node: BuildGraphNode,
  pub generation: u64,
}

impl Dispatch {
  pub fn id(&self) -> &str {
    self.node.id()
  }
}

impl BuildGraph {
  pub fn dispatch(&mut self) -> Vec<Dispatch> {
    self.dispatch_where(|_| true)
  }

  /// Hands out every incomplete or invalid node accepted by `filter` that is not already in
  /// flight at its current generation
  ///
  /// Dispatched invalid nodes move back to the incomplete index.
  pub fn dispatch_where(&mut self, filter: impl Fn(&BuildGraphNode) -> bool) -> Vec<Dispatch> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = self
      .incomplete
      .keys()
      .chain(self.invalid.keys())
      .filter(|id| seen.insert(id.as_str()))
      .cloned()
      .collect();

    let mut dispatches = Vec::new();

    for id in ids {
      let Some(node) = self.graph.get_node(&id).cloned() else {
        continue;
      };

      if !filter(&node) {
        continue;
      }

      let generation = self.generation(&id);
      if self.in_flight.get(&id) == Some(&generation) {
        continue;
      }

      self.invalid.shift_remove(&id);
      self.incomplete.insert(id.clone(), node.clone());
      self.in_flight.insert(id, generation);

      dispatches.push(Dispatch { node, generation });
    }

    tracing::debug!(nodes = dispatches.len(), "Dispatched work");

    dispatches
  }

  /// Whether the result for `dispatch` may still be applied
  pub fn is_current(&self, dispatch: &Dispatch) -> bool {
    let id = dispatch.id();

    self.incomplete.contains_key(id)
      && !self.invalid.contains_key(id)
      && self.generation(id) == dispatch.generation
  }

  /// Moves the node of a failed dispatch to the invalid index so it can be retried
  ///
  /// Failures of stale dispatches are ignored, the node is already waiting to be dispatched again.
  pub fn mark_failed(&mut self, dispatch: &Dispatch) {
    if !self.is_current(dispatch) {
      return;
    }

    let id = dispatch.id();
    self.incomplete.shift_remove(id);
    self.in_flight.remove(id);

    if let Some(node) = self.graph.get_node(id).cloned() {
      self.invalid.insert(id.to_string(), node);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use pretty_assertions::assert_eq;

  use crate::build_graph::test_utils::*;
  use crate::types::FileEventKind;

  use super::*;

  #[test]
  fn dispatches_each_incomplete_node_once() {
    let (mut graph, entry_id) = entry_graph();

    let dispatches = graph.dispatch();

    assert_eq!(ids(dispatches.iter().map(|dispatch| &dispatch.node)), vec![entry_id]);
    assert_eq!(dispatches[0].generation, 0);
    assert!(graph.is_current(&dispatches[0]));
    assert!(graph.dispatch().is_empty());
  }

  #[test]
  fn dispatch_where_filters_nodes() {
    let (mut graph, _) = entry_graph();

    let dispatches = graph.dispatch_where(|node| matches!(node, BuildGraphNode::TransformerRequest(_)));

    assert!(dispatches.is_empty());
    assert_eq!(graph.dispatch().len(), 1);
  }

  #[test]
  fn invalid_nodes_are_dispatched_again() {
    let (mut graph, entry_id) = entry_graph();
    let request_id = resolve_and_transform(&mut graph, &entry_id, "/proj/index.js", Vec::new());

    graph
      .on_filesystem_event(FileEventKind::Change, Path::new("/proj/index.js"))
      .unwrap();
    let dispatches = graph.dispatch();

    assert_eq!(ids(dispatches.iter().map(|dispatch| &dispatch.node)), vec![request_id.clone()]);
    assert_eq!(dispatches[0].generation, 1);
    assert!(!graph.is_invalid(&request_id));
    assert!(graph.is_incomplete(&request_id));
  }

  #[test]
  fn results_for_nodes_invalidated_in_flight_are_stale() {
    let (mut graph, entry_id) = entry_graph();
    let request_id = resolve_and_transform(&mut graph, &entry_id, "/proj/index.js", Vec::new());
    graph
      .on_filesystem_event(FileEventKind::Change, Path::new("/proj/index.js"))
      .unwrap();
    let in_flight = graph.dispatch().remove(0);

    graph
      .on_filesystem_event(FileEventKind::Change, Path::new("/proj/index.js"))
      .unwrap();

    assert!(!graph.is_current(&in_flight));

    let redispatched = graph.dispatch();
    assert_eq!(redispatched.len(), 1);
    assert_eq!(redispatched[0].id(), request_id);
    assert_eq!(redispatched[0].generation, in_flight.generation + 1);
    assert!(graph.is_current(&redispatched[0]));
    assert!(!graph.is_current(&in_flight));
  }

  #[test]
  fn failed_nodes_become_invalid() {
    let (mut graph, entry_id) = entry_graph();
    let dispatch = graph.dispatch().remove(0);

    graph.mark_failed(&dispatch);

    assert!(graph.is_invalid(&entry_id));
    assert!(!graph.is_incomplete(&entry_id));
    assert_eq!(graph.dispatch().len(), 1);
  }

  #[test]
  fn failures_of_stale_dispatches_are_ignored() {
    let (mut graph, entry_id) = entry_graph();
    let dispatch = graph.dispatch().remove(0);
    graph.resolve_dependency(&entry_id, request("/proj/index.js")).unwrap();

    graph.mark_failed(&dispatch);

    assert!(!graph.is_invalid(&entry_id));
  }
}
