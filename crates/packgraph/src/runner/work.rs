use anyhow::anyhow;
use packgraph_core::build_graph::BuildGraphNode;
use packgraph_core::types::ConfigRequestResult;
use packgraph_core::types::DevDep;
use packgraph_core::types::TransformerRequest;
use packgraph_core::types::TransformerRequestResult;
use packgraph_graph::GraphNode;

use crate::Plugins;

/// The result of running the work for one node
#[derive(Clone, Debug, PartialEq)]
pub enum WorkOutput {
  Dependency(Option<TransformerRequest>),
  TransformerRequest(TransformerRequestResult),
  ConfigRequest(ConfigRequestResult),
  DevDepRequest(DevDep),
}

pub fn run_work(plugins: &dyn Plugins, node: &BuildGraphNode) -> anyhow::Result<WorkOutput> {
  match node {
    BuildGraphNode::Dependency(dependency) => {
      plugins.resolve(dependency).map(WorkOutput::Dependency)
    }
    BuildGraphNode::TransformerRequest(node) => plugins
      .transform(&node.request)
      .map(WorkOutput::TransformerRequest),
    BuildGraphNode::ConfigRequest(node) => plugins
      .load_config(&node.request)
      .map(WorkOutput::ConfigRequest),
    BuildGraphNode::DevDepRequest(node) => plugins
      .resolve_dev_dep(&node.request)
      .map(WorkOutput::DevDepRequest),
    BuildGraphNode::Root(_)
    | BuildGraphNode::File(_)
    | BuildGraphNode::Glob(_)
    | BuildGraphNode::Asset(_)
    | BuildGraphNode::Config(_)
    | BuildGraphNode::DevDep(_) => Err(anyhow!(
      "There is no work to run for node {} with type {}",
      node.id(),
      node.node_type()
    )),
  }
}
