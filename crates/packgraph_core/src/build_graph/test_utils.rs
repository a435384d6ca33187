use std::path::PathBuf;
use std::sync::Arc;

use packgraph_graph::GraphNode;

use crate::types::*;

use super::*;

pub fn node_env() -> Arc<Environment> {
  Arc::new(Environment {
    context: EnvironmentContext::Node,
    engines: Engines {
      browsers: Vec::new(),
      node: Some(String::from("14")),
    },
    output_format: OutputFormat::CommonJS,
    ..Environment::default()
  })
}

pub fn node_target() -> Target {
  Target {
    dist_dir: PathBuf::from("/proj/dist"),
    env: node_env(),
    name: String::from("node14"),
  }
}

/// A dependency with a fixed id, as a cached transformer would return it
pub fn dependency(id: &str, specifier: &str) -> Dependency {
  Dependency {
    id: id.to_string(),
    ..Dependency::new(specifier.to_string(), node_env())
  }
}

pub fn asset(id: &str, file_path: &str, dependencies: Vec<Dependency>) -> Asset {
  let mut asset = Asset::new(id, PathBuf::from(file_path), node_env()).with_size(10);
  for dependency in dependencies {
    asset.add_dependency(dependency);
  }
  asset
}

pub fn transform_result(assets: Vec<Asset>) -> TransformerRequestResult {
  TransformerRequestResult {
    assets,
    ..TransformerRequestResult::default()
  }
}

pub fn request(file_path: &str) -> TransformerRequest {
  TransformerRequest::new(file_path, node_env())
}

/// A graph with a single `./index.js` entry, returning the entry dependency id
pub fn entry_graph() -> (BuildGraph, String) {
  let mut graph = BuildGraph::new();
  let nodes = graph
    .initialize(InitializeOptions {
      entries: Some(vec![String::from("./index.js")]),
      targets: Some(vec![node_target()]),
      root_dir: PathBuf::from("/proj"),
      ..InitializeOptions::default()
    })
    .unwrap();

  let entry_id = nodes[0].id().to_string();
  (graph, entry_id)
}

/// Resolves `dependency_id` to `file_path` and transforms it into `assets`, returning the request id
pub fn resolve_and_transform(
  graph: &mut BuildGraph,
  dependency_id: &str,
  file_path: &str,
  assets: Vec<Asset>,
) -> String {
  let request_node = graph.transformer_request_node(request(file_path));
  let request_id = request_node.id().to_string();

  graph
    .resolve_dependency(dependency_id, request(file_path))
    .unwrap();
  graph
    .resolve_transformer_request(&request_id, transform_result(assets))
    .unwrap();

  request_id
}

pub fn ids<'a>(nodes: impl IntoIterator<Item = &'a BuildGraphNode>) -> Vec<String> {
  nodes.into_iter().map(|node| node.id().to_string()).collect()
}
