use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::stable_graph::EdgeIndex;
use petgraph::stable_graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::Dfs;
use petgraph::visit::EdgeRef;
use petgraph::visit::IntoEdgeReferences;
use petgraph::visit::Reversed;
use petgraph::Direction;

use crate::GraphError;
use crate::TraversalActions;

/// A value that can be stored in a [`Graph`]
///
/// Identity is the string returned by [`GraphNode::id`]. Two values with the same id are the same
/// node, and inserting the second one only refreshes the payload of the first.
pub trait GraphNode: Clone + Debug {
  fn id(&self) -> &str;
}

/// Edge types are small copyable tags. The default value is the type used by unfiltered queries.
pub trait GraphEdgeType: Copy + Debug + Default + Eq + Hash {}

impl<T> GraphEdgeType for T where T: Copy + Debug + Default + Eq + Hash {}

/// Selects which edge types an adjacency query or traversal follows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeTypeFilter<E> {
  Only(E),
  AnyOf(Vec<E>),
  All,
}

impl<E: GraphEdgeType> EdgeTypeFilter<E> {
  pub fn matches(&self, edge_type: &E) -> bool {
    match self {
      EdgeTypeFilter::Only(only) => only == edge_type,
      EdgeTypeFilter::AnyOf(edge_types) => edge_types.contains(edge_type),
      EdgeTypeFilter::All => true,
    }
  }
}

impl<E: GraphEdgeType> Default for EdgeTypeFilter<E> {
  fn default() -> Self {
    EdgeTypeFilter::Only(E::default())
  }
}

impl<E: GraphEdgeType> From<E> for EdgeTypeFilter<E> {
  fn from(edge_type: E) -> Self {
    EdgeTypeFilter::Only(edge_type)
  }
}

/// What a [`Graph::replace_nodes_connected_to`] call changed
///
/// `added` holds the nodes that did not exist in the graph before the call. `removed` holds every
/// node pruned because it lost its last path to the root, together with the edges between them.
#[derive(Clone, Debug)]
pub struct GraphUpdates<N, E> {
  pub added: Graph<N, E>,
  pub removed: Graph<N, E>,
}

/// A directed multigraph of uniquely identified nodes and typed edges
///
/// At most one edge exists per `(from, to, type)` triple. When a root node is set, nodes that lose
/// every path back to the root during a removal are pruned together with their exclusively
/// reachable descendants.
#[derive(Clone, Debug)]
pub struct Graph<N, E> {
  graph: StableDiGraph<N, E>,
  node_indices: HashMap<String, NodeIndex>,
  root_node_id: Option<String>,
}

impl<N: GraphNode, E: GraphEdgeType> Default for Graph<N, E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<N: GraphNode, E: GraphEdgeType> Graph<N, E> {
  pub fn new() -> Self {
    Graph {
      graph: StableDiGraph::new(),
      node_indices: HashMap::new(),
      root_node_id: None,
    }
  }

  pub fn set_root_node(&mut self, node: N) {
    self.root_node_id = Some(node.id().to_string());
    self.add_node(node);
  }

  pub fn root_node_id(&self) -> Option<&str> {
    self.root_node_id.as_deref()
  }

  pub fn root_node(&self) -> Option<&N> {
    self.root_node_id().and_then(|id| self.get_node(id))
  }

  /// Inserts a node, or refreshes the payload of the existing node with the same id
  ///
  /// Returns true when the node was not part of the graph before.
  pub fn add_node(&mut self, node: N) -> bool {
    if let Some(node_index) = self.node_indices.get(node.id()) {
      self.graph[*node_index] = node;
      return false;
    }

    let id = node.id().to_string();
    let node_index = self.graph.add_node(node);
    self.node_indices.insert(id, node_index);

    true
  }

  pub fn has_node(&self, id: &str) -> bool {
    self.node_indices.contains_key(id)
  }

  pub fn get_node(&self, id: &str) -> Option<&N> {
    self
      .node_indices
      .get(id)
      .and_then(|node_index| self.graph.node_weight(*node_index))
  }

  pub fn nodes(&self) -> impl Iterator<Item = &N> {
    self.graph.node_weights()
  }

  pub fn find_nodes(&self, predicate: impl Fn(&N) -> bool) -> Vec<&N> {
    self.nodes().filter(|node| predicate(node)).collect()
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  pub fn edges(&self) -> impl Iterator<Item = (&str, &str, E)> {
    self.graph.edge_references().map(|edge| {
      (
        self.graph[edge.source()].id(),
        self.graph[edge.target()].id(),
        *edge.weight(),
      )
    })
  }

  /// Removes a node and every edge incident to it
  ///
  /// Children are not pruned, use [`Graph::remove_edge`] or [`Graph::replace_nodes_connected_to`]
  /// when orphans should go too.
  pub fn remove_node(&mut self, id: &str) -> Option<N> {
    let node_index = self.node_indices.remove(id)?;

    if self.root_node_id.as_deref() == Some(id) {
      self.root_node_id = None;
    }

    self.graph.remove_node(node_index)
  }

  /// Adds an edge. Returns false when the same `(from, to, type)` edge already exists.
  pub fn add_edge(&mut self, from: &str, to: &str, edge_type: E) -> Result<bool, GraphError> {
    let from_index = self.index_of(from)?;
    let to_index = self.index_of(to)?;

    if self.find_edge(from_index, to_index, edge_type).is_some() {
      return Ok(false);
    }

    self.graph.add_edge(from_index, to_index, edge_type);
    Ok(true)
  }

  pub fn has_edge(&self, from: &str, to: &str, edge_type: E) -> bool {
    match (self.node_indices.get(from), self.node_indices.get(to)) {
      (Some(from_index), Some(to_index)) => {
        self.find_edge(*from_index, *to_index, edge_type).is_some()
      }
      _ => false,
    }
  }

  /// Removes a single edge, optionally pruning the target if it is no longer reachable
  pub fn remove_edge(
    &mut self,
    from: &str,
    to: &str,
    edge_type: E,
    remove_orphans: bool,
  ) -> Graph<N, E> {
    let mut removed = Graph::new();

    let (Some(from_index), Some(to_index)) = (
      self.node_indices.get(from).copied(),
      self.node_indices.get(to).copied(),
    ) else {
      return removed;
    };

    if let Some(edge_index) = self.find_edge(from_index, to_index, edge_type) {
      self.graph.remove_edge(edge_index);
    }

    if remove_orphans {
      self.prune_orphans(vec![to_index], &mut removed);
    }

    removed
  }

  pub fn get_nodes_connected_from(
    &self,
    id: &str,
    edge_types: impl Into<EdgeTypeFilter<E>>,
  ) -> Vec<&N> {
    self.connected_nodes(id, Direction::Outgoing, &edge_types.into())
  }

  pub fn get_nodes_connected_to(
    &self,
    id: &str,
    edge_types: impl Into<EdgeTypeFilter<E>>,
  ) -> Vec<&N> {
    self.connected_nodes(id, Direction::Incoming, &edge_types.into())
  }

  /// A node is orphaned when no path leads back to the root over any edge type
  ///
  /// Without a root, a node is orphaned when nothing points at it.
  pub fn is_orphaned_node(&self, id: &str) -> bool {
    match self.node_indices.get(id) {
      Some(node_index) => self.is_orphaned_index(*node_index),
      None => false,
    }
  }

  /// Sets the children of `from` along `edge_type` to exactly `to_nodes`
  ///
  /// Children present before and after are left connected, so whatever hangs off them survives.
  /// Children that are no longer listed are disconnected and pruned together with anything that
  /// was only reachable through them.
  pub fn replace_nodes_connected_to(
    &mut self,
    from: &str,
    to_nodes: Vec<N>,
    edge_type: E,
  ) -> Result<GraphUpdates<N, E>, GraphError> {
    let from_index = self.index_of(from)?;
    let mut added = Graph::new();
    let mut removed = Graph::new();

    let mut children_to_remove =
      self.neighbors(from_index, Direction::Outgoing, &EdgeTypeFilter::Only(edge_type));

    for to_node in to_nodes {
      let to_id = to_node.id().to_string();
      if self.add_node(to_node.clone()) {
        added.add_node(to_node);
      }

      let to_index = self.index_of(&to_id)?;
      children_to_remove.retain(|child| *child != to_index);

      if self.find_edge(from_index, to_index, edge_type).is_none() {
        self.graph.add_edge(from_index, to_index, edge_type);
      }
    }

    for child in children_to_remove.iter() {
      if let Some(edge_index) = self.find_edge(from_index, *child, edge_type) {
        self.graph.remove_edge(edge_index);
      }
    }

    self.prune_orphans(children_to_remove, &mut removed);

    Ok(GraphUpdates { added, removed })
  }

  /// Swaps `from` for `to_node`, keeping every inbound edge with its type
  ///
  /// Outbound edges of `from` are dropped and its descendants pruned when they become orphaned.
  /// Returns the removed subgraph, which includes `from`.
  pub fn replace_node(&mut self, from: &str, to_node: N) -> Result<Graph<N, E>, GraphError> {
    let from_index = self.index_of(from)?;
    let to_id = to_node.id().to_string();

    self.add_node(to_node);
    let to_index = self.index_of(&to_id)?;

    let inbound: Vec<(NodeIndex, E)> = self
      .graph
      .edges_directed(from_index, Direction::Incoming)
      .map(|edge| (edge.source(), *edge.weight()))
      .collect();

    for (parent, edge_type) in inbound {
      let parent = if parent == from_index {
        to_index
      } else {
        parent
      };

      if self.find_edge(parent, to_index, edge_type).is_none() {
        self.graph.add_edge(parent, to_index, edge_type);
      }
    }

    let children = self.neighbors(from_index, Direction::Outgoing, &EdgeTypeFilter::All);
    let mut removed = Graph::new();
    let mut removed_edges = Vec::new();

    self.remove_index(from_index, &mut removed, &mut removed_edges);
    self.prune_orphans_with(children, &mut removed, &mut removed_edges);
    Self::connect_removed(&mut removed, removed_edges);

    Ok(removed)
  }

  /// Depth-first, pre-order traversal from `start` (or the root) along the selected edge types
  ///
  /// Each node is visited at most once. Children are visited in the order they were connected.
  pub fn traverse<'a, F>(
    &'a self,
    visit: F,
    start: Option<&str>,
    edge_types: impl Into<EdgeTypeFilter<E>>,
  ) where
    F: FnMut(&'a N, &mut TraversalActions),
  {
    self.dfs(visit, start, Direction::Outgoing, &edge_types.into());
  }

  pub fn traverse_ancestors<'a, F>(
    &'a self,
    start: &str,
    visit: F,
    edge_types: impl Into<EdgeTypeFilter<E>>,
  ) where
    F: FnMut(&'a N, &mut TraversalActions),
  {
    self.dfs(visit, Some(start), Direction::Incoming, &edge_types.into());
  }

  /// Returns the induced subgraph reachable from `id`, rooted at `id`
  pub fn get_subgraph(&self, id: &str, edge_types: impl Into<EdgeTypeFilter<E>>) -> Graph<N, E> {
    let edge_types = edge_types.into();
    let mut subgraph = Graph::new();

    let Some(start) = self.get_node(id) else {
      return subgraph;
    };
    subgraph.set_root_node(start.clone());

    self.traverse(
      |node, _| {
        subgraph.add_node(node.clone());
      },
      Some(id),
      edge_types.clone(),
    );

    for (from, to, edge_type) in self.edges() {
      if edge_types.matches(&edge_type) && subgraph.has_node(from) && subgraph.has_node(to) {
        let _ = subgraph.add_edge(from, to, edge_type);
      }
    }

    subgraph
  }

  /// Copies every node and edge of `other` into this graph
  pub fn merge(&mut self, other: &Graph<N, E>) {
    for node in other.nodes() {
      self.add_node(node.clone());
    }

    for (from, to, edge_type) in other.edges() {
      let _ = self.add_edge(from, to, edge_type);
    }
  }

  fn index_of(&self, id: &str) -> Result<NodeIndex, GraphError> {
    self
      .node_indices
      .get(id)
      .copied()
      .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
  }

  fn root_index(&self) -> Option<NodeIndex> {
    self
      .root_node_id
      .as_ref()
      .and_then(|id| self.node_indices.get(id))
      .copied()
  }

  fn find_edge(&self, from: NodeIndex, to: NodeIndex, edge_type: E) -> Option<EdgeIndex> {
    self
      .graph
      .edges_directed(from, Direction::Outgoing)
      .find(|edge| edge.target() == to && *edge.weight() == edge_type)
      .map(|edge| edge.id())
  }

  fn neighbors(
    &self,
    node_index: NodeIndex,
    direction: Direction,
    edge_types: &EdgeTypeFilter<E>,
  ) -> Vec<NodeIndex> {
    let mut neighbors: Vec<NodeIndex> = self
      .graph
      .edges_directed(node_index, direction)
      .filter(|edge| edge_types.matches(edge.weight()))
      .map(|edge| match direction {
        Direction::Outgoing => edge.target(),
        Direction::Incoming => edge.source(),
      })
      .collect();

    // petgraph yields the most recently added edge first
    neighbors.reverse();

    let mut seen = HashSet::new();
    neighbors.retain(|neighbor| seen.insert(*neighbor));
    neighbors
  }

  fn connected_nodes(
    &self,
    id: &str,
    direction: Direction,
    edge_types: &EdgeTypeFilter<E>,
  ) -> Vec<&N> {
    let Some(node_index) = self.node_indices.get(id) else {
      return Vec::new();
    };

    self
      .neighbors(*node_index, direction, edge_types)
      .into_iter()
      .map(|neighbor| &self.graph[neighbor])
      .collect()
  }

  fn is_orphaned_index(&self, node_index: NodeIndex) -> bool {
    let Some(root_index) = self.root_index() else {
      return self
        .graph
        .edges_directed(node_index, Direction::Incoming)
        .next()
        .is_none();
    };

    if node_index == root_index {
      return false;
    }

    let reversed = Reversed(&self.graph);
    let mut dfs = Dfs::new(reversed, node_index);
    while let Some(ancestor) = dfs.next(reversed) {
      if ancestor == root_index {
        return false;
      }
    }

    true
  }

  fn prune_orphans(&mut self, candidates: Vec<NodeIndex>, removed: &mut Graph<N, E>) {
    let mut removed_edges = Vec::new();
    self.prune_orphans_with(candidates, removed, &mut removed_edges);
    Self::connect_removed(removed, removed_edges);
  }

  fn prune_orphans_with(
    &mut self,
    candidates: Vec<NodeIndex>,
    removed: &mut Graph<N, E>,
    removed_edges: &mut Vec<(String, String, E)>,
  ) {
    if candidates.is_empty() {
      return;
    }

    // Removing unreachable nodes never changes what the root reaches, so one pass suffices
    let reachable = self.root_index().map(|root_index| {
      let mut reachable = HashSet::new();
      let mut dfs = Dfs::new(&self.graph, root_index);
      while let Some(node_index) = dfs.next(&self.graph) {
        reachable.insert(node_index);
      }
      reachable
    });

    let mut stack = candidates;

    while let Some(node_index) = stack.pop() {
      if !self.graph.contains_node(node_index) {
        continue;
      }

      let is_orphaned = match &reachable {
        Some(reachable) => !reachable.contains(&node_index),
        None => self
          .graph
          .edges_directed(node_index, Direction::Incoming)
          .next()
          .is_none(),
      };
      if !is_orphaned {
        continue;
      }

      let children = self.neighbors(node_index, Direction::Outgoing, &EdgeTypeFilter::All);
      self.remove_index(node_index, removed, removed_edges);
      stack.extend(children);
    }
  }

  fn remove_index(
    &mut self,
    node_index: NodeIndex,
    removed: &mut Graph<N, E>,
    removed_edges: &mut Vec<(String, String, E)>,
  ) {
    for edge in self.graph.edges_directed(node_index, Direction::Outgoing) {
      removed_edges.push((
        self.graph[edge.source()].id().to_string(),
        self.graph[edge.target()].id().to_string(),
        *edge.weight(),
      ));
    }

    let Some(node) = self.graph.remove_node(node_index) else {
      return;
    };

    tracing::trace!(id = node.id(), "Pruned node");

    self.node_indices.remove(node.id());
    if self.root_node_id.as_deref() == Some(node.id()) {
      self.root_node_id = None;
    }

    removed.add_node(node);
  }

  fn connect_removed(removed: &mut Graph<N, E>, removed_edges: Vec<(String, String, E)>) {
    for (from, to, edge_type) in removed_edges {
      if removed.has_node(&from) && removed.has_node(&to) {
        let _ = removed.add_edge(&from, &to, edge_type);
      }
    }
  }

  fn dfs<'a, F>(
    &'a self,
    mut visit: F,
    start: Option<&str>,
    direction: Direction,
    edge_types: &EdgeTypeFilter<E>,
  ) where
    F: FnMut(&'a N, &mut TraversalActions),
  {
    let Some(start) = start.or(self.root_node_id.as_deref()) else {
      return;
    };
    let Some(start_index) = self.node_indices.get(start).copied() else {
      return;
    };

    let mut visited = HashSet::new();
    let mut stack = vec![start_index];

    while let Some(node_index) = stack.pop() {
      if !visited.insert(node_index) {
        continue;
      }

      let mut actions = TraversalActions::default();
      visit(&self.graph[node_index], &mut actions);

      if actions.is_stopped() {
        return;
      }

      if actions.is_skipped() {
        continue;
      }

      let children = self.neighbors(node_index, direction, edge_types);
      stack.extend(
        children
          .into_iter()
          .rev()
          .filter(|child| !visited.contains(child)),
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[derive(Clone, Debug, PartialEq)]
  struct TestNode {
    id: String,
    value: u32,
  }

  impl GraphNode for TestNode {
    fn id(&self) -> &str {
      &self.id
    }
  }

  #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
  enum TestEdge {
    #[default]
    Child,
    Watch,
  }

  fn node(id: &str) -> TestNode {
    TestNode {
      id: id.to_string(),
      value: 0,
    }
  }

  fn ids<'a>(nodes: impl IntoIterator<Item = &'a TestNode>) -> Vec<String> {
    nodes.into_iter().map(|node| node.id.clone()).collect()
  }

  fn sorted_ids(graph: &Graph<TestNode, TestEdge>) -> Vec<String> {
    let mut ids = ids(graph.nodes());
    ids.sort();
    ids
  }

  fn rooted_graph() -> Graph<TestNode, TestEdge> {
    let mut graph = Graph::new();
    graph.set_root_node(node("root"));
    graph
  }

  #[test]
  fn duplicate_edges_are_ignored() {
    let mut graph = rooted_graph();
    graph.add_node(node("a"));

    assert_eq!(graph.add_edge("root", "a", TestEdge::Child), Ok(true));
    assert_eq!(graph.add_edge("root", "a", TestEdge::Child), Ok(false));
    assert_eq!(graph.add_edge("root", "a", TestEdge::Watch), Ok(true));

    assert_eq!(graph.edge_count(), 2);
    assert!(graph.has_edge("root", "a", TestEdge::Watch));
  }

  #[test]
  fn add_edge_fails_for_missing_nodes() {
    let mut graph = rooted_graph();

    assert_eq!(
      graph.add_edge("root", "missing", TestEdge::Child),
      Err(GraphError::NodeNotFound(String::from("missing")))
    );
  }

  #[test]
  fn remove_node_drops_incident_edges() {
    let mut graph = rooted_graph();
    graph.add_node(node("a"));
    graph.add_node(node("b"));
    graph.add_edge("root", "a", TestEdge::Child).unwrap();
    graph.add_edge("a", "b", TestEdge::Child).unwrap();

    assert_eq!(graph.remove_node("a"), Some(node("a")));

    assert_eq!(graph.edge_count(), 0);
    assert!(graph.has_node("b"));
    assert!(graph.get_nodes_connected_to("b", TestEdge::Child).is_empty());
  }

  #[test]
  fn adjacency_queries_default_to_the_default_edge_type() {
    let mut graph = rooted_graph();
    graph.add_node(node("a"));
    graph.add_node(node("b"));
    graph.add_edge("root", "a", TestEdge::Child).unwrap();
    graph.add_edge("root", "b", TestEdge::Watch).unwrap();

    assert_eq!(
      ids(graph.get_nodes_connected_from("root", EdgeTypeFilter::<TestEdge>::default())),
      vec!["a"]
    );
    assert_eq!(
      ids(graph.get_nodes_connected_from("root", EdgeTypeFilter::<TestEdge>::All)),
      vec!["a", "b"]
    );
    assert_eq!(
      ids(graph.get_nodes_connected_to("b", TestEdge::Watch)),
      vec!["root"]
    );
  }

  #[test]
  fn replace_reports_the_symmetric_difference() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a"), node("b")], TestEdge::Child)
      .unwrap();

    let updates = graph
      .replace_nodes_connected_to("root", vec![node("b"), node("c")], TestEdge::Child)
      .unwrap();

    assert_eq!(sorted_ids(&updates.added), vec!["c"]);
    assert_eq!(sorted_ids(&updates.removed), vec!["a"]);
    assert_eq!(
      ids(graph.get_nodes_connected_from("root", TestEdge::Child)),
      vec!["b", "c"]
    );
  }

  #[test]
  fn replace_with_the_same_children_changes_nothing() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("a", vec![node("b")], TestEdge::Child)
      .unwrap();

    let updates = graph
      .replace_nodes_connected_to("root", vec![node("a")], TestEdge::Child)
      .unwrap();

    assert_eq!(updates.added.node_count(), 0);
    assert_eq!(updates.removed.node_count(), 0);
    assert_eq!(graph.edge_count(), 2);
    assert!(graph.has_edge("a", "b", TestEdge::Child));
  }

  #[test]
  fn replace_refreshes_the_payload_of_existing_children() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a")], TestEdge::Child)
      .unwrap();

    let updated = TestNode {
      id: String::from("a"),
      value: 7,
    };
    graph
      .replace_nodes_connected_to("root", vec![updated.clone()], TestEdge::Child)
      .unwrap();

    assert_eq!(graph.get_node("a"), Some(&updated));
  }

  #[test]
  fn replace_only_touches_the_given_edge_type() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("root", vec![node("w")], TestEdge::Watch)
      .unwrap();

    let updates = graph
      .replace_nodes_connected_to("root", vec![], TestEdge::Watch)
      .unwrap();

    assert_eq!(sorted_ids(&updates.removed), vec!["w"]);
    assert!(graph.has_node("a"));
  }

  #[test]
  fn pruning_removes_exclusively_reachable_descendants() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("dep")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("dep", vec![node("request")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("request", vec![node("asset")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("request", vec![node("file")], TestEdge::Watch)
      .unwrap();
    graph
      .replace_nodes_connected_to("asset", vec![node("child-dep")], TestEdge::Child)
      .unwrap();

    let updates = graph
      .replace_nodes_connected_to("dep", vec![], TestEdge::Child)
      .unwrap();

    assert_eq!(
      sorted_ids(&updates.removed),
      vec!["asset", "child-dep", "file", "request"]
    );
    assert!(updates.removed.has_edge("request", "file", TestEdge::Watch));
    assert!(updates.removed.has_edge("asset", "child-dep", TestEdge::Child));
    assert_eq!(sorted_ids(&graph), vec!["dep", "root"]);
  }

  #[test]
  fn pruning_keeps_nodes_shared_with_another_parent() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a"), node("b")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("a", vec![node("shared")], TestEdge::Child)
      .unwrap();
    let updates = graph
      .replace_nodes_connected_to("b", vec![node("shared")], TestEdge::Child)
      .unwrap();
    assert_eq!(updates.added.node_count(), 0);

    let updates = graph
      .replace_nodes_connected_to("a", vec![], TestEdge::Child)
      .unwrap();

    assert_eq!(updates.removed.node_count(), 0);
    assert!(graph.has_node("shared"));
    assert!(!graph.is_orphaned_node("shared"));
  }

  #[test]
  fn pruning_a_subtree_keeps_descendants_reachable_through_a_deeper_path() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a"), node("b")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("a", vec![node("x"), node("y")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("x", vec![node("lib")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("y", vec![node("lib")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("b", vec![node("c")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("c", vec![node("lib"), node("y")], TestEdge::Watch)
      .unwrap();

    let updates = graph
      .replace_nodes_connected_to("root", vec![node("b")], TestEdge::Child)
      .unwrap();

    assert_eq!(sorted_ids(&updates.removed), vec!["a", "x"]);
    assert_eq!(sorted_ids(&graph), vec!["b", "c", "lib", "root", "y"]);
    assert!(graph.has_edge("y", "lib", TestEdge::Child));
  }

  #[test]
  fn pruning_handles_cycles_cut_off_from_the_root() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("a", vec![node("b")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("b", vec![node("a")], TestEdge::Child)
      .unwrap();

    let updates = graph
      .replace_nodes_connected_to("root", vec![], TestEdge::Child)
      .unwrap();

    assert_eq!(sorted_ids(&updates.removed), vec!["a", "b"]);
    assert_eq!(sorted_ids(&graph), vec!["root"]);
  }

  #[test]
  fn remove_edge_without_orphan_removal_keeps_the_target() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a")], TestEdge::Child)
      .unwrap();

    let removed = graph.remove_edge("root", "a", TestEdge::Child, false);

    assert_eq!(removed.node_count(), 0);
    assert!(graph.has_node("a"));
    assert!(graph.is_orphaned_node("a"));
  }

  #[test]
  fn replace_node_keeps_inbound_edges_and_prunes_children() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("a", vec![node("asset")], TestEdge::Watch)
      .unwrap();
    graph
      .replace_nodes_connected_to("asset", vec![node("dep")], TestEdge::Child)
      .unwrap();

    let removed = graph.replace_node("asset", node("tombstone")).unwrap();

    assert_eq!(sorted_ids(&removed), vec!["asset", "dep"]);
    assert!(graph.has_edge("a", "tombstone", TestEdge::Watch));
    assert!(!graph.has_node("asset"));
  }

  #[test]
  fn traverse_supports_skipping_and_stopping() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a"), node("b")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("a", vec![node("a1")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("b", vec![node("b1")], TestEdge::Child)
      .unwrap();

    let mut visited = Vec::new();
    graph.traverse(
      |node, actions| {
        visited.push(node.id.clone());
        if node.id == "a" {
          actions.skip_children();
        }
      },
      None,
      TestEdge::Child,
    );
    assert_eq!(visited, vec!["root", "a", "b", "b1"]);

    let mut visited = Vec::new();
    graph.traverse(
      |node, actions| {
        visited.push(node.id.clone());
        if node.id == "a1" {
          actions.stop();
        }
      },
      None,
      TestEdge::Child,
    );
    assert_eq!(visited, vec!["root", "a", "a1"]);
  }

  #[test]
  fn traverse_ancestors_walks_inbound_edges() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("a", vec![node("b")], TestEdge::Watch)
      .unwrap();

    let mut visited = Vec::new();
    graph.traverse_ancestors(
      "b",
      |node, _| visited.push(node.id.clone()),
      EdgeTypeFilter::<TestEdge>::All,
    );

    assert_eq!(visited, vec!["b", "a", "root"]);
  }

  #[test]
  fn subgraph_contains_the_reachable_induced_graph() {
    let mut graph = rooted_graph();
    graph
      .replace_nodes_connected_to("root", vec![node("a"), node("x")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("a", vec![node("b"), node("c")], TestEdge::Child)
      .unwrap();
    graph
      .replace_nodes_connected_to("b", vec![node("c")], TestEdge::Child)
      .unwrap();

    let subgraph = graph.get_subgraph("a", TestEdge::Child);

    assert_eq!(subgraph.root_node_id(), Some("a"));
    assert_eq!(sorted_ids(&subgraph), vec!["a", "b", "c"]);
    assert_eq!(subgraph.edge_count(), 3);
  }

  #[test]
  fn merge_copies_nodes_and_edges() {
    let mut graph = rooted_graph();
    let mut other = Graph::new();
    other.add_node(node("root"));
    other.add_node(node("a"));
    other.add_edge("root", "a", TestEdge::Child).unwrap();

    graph.merge(&other);

    assert!(graph.has_edge("root", "a", TestEdge::Child));
    assert_eq!(graph.node_count(), 2);
  }
}
