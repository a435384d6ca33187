use std::collections::HashSet;

use packgraph_core::build_graph::BuildGraph;
use packgraph_core::build_graph::Dispatch;
use packgraph_core::build_graph::NodeType;
use packgraph_core::BuildGraphError;
use packgraph_graph::GraphNode;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Deserialize;

use crate::PluginsRef;

use super::work::run_work;
use super::work::WorkOutput;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunnerOptions {
  /// Worker threads, defaults to the number of CPUs
  pub threads: Option<usize>,
}

#[derive(Debug)]
pub struct NodeFailure {
  pub id: String,
  pub node_type: NodeType,
  pub error: anyhow::Error,
}

#[derive(Debug, Default)]
pub struct BuildReport {
  pub passes: usize,
  pub applied: usize,
  /// Results dropped because their node was invalidated or pruned while the work ran
  pub discarded: usize,
  pub failures: Vec<NodeFailure>,
}

impl BuildReport {
  pub fn is_success(&self) -> bool {
    self.failures.is_empty()
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
  Applied,
  Stale,
}

/// Drives a [`BuildGraph`] until it has no work left
///
/// Work runs in parallel on a dedicated thread pool. Results are applied one at a time on the
/// calling thread, which is the only writer of the graph.
pub struct BuildRunner {
  plugins: PluginsRef,
  thread_pool: ThreadPool,
}

impl BuildRunner {
  pub fn new(plugins: PluginsRef, options: RunnerOptions) -> anyhow::Result<Self> {
    let threads = options.threads.unwrap_or_else(num_cpus::get).max(1);

    tracing::info!(%threads, "Creating build runner thread pool");

    let thread_pool = rayon::ThreadPoolBuilder::new()
      .num_threads(threads)
      .thread_name(|i| format!("packgraph-worker-{i}"))
      .build()?;

    Ok(BuildRunner {
      plugins,
      thread_pool,
    })
  }

  pub fn threads(&self) -> usize {
    self.thread_pool.current_num_threads()
  }

  /// Runs passes until nothing is left to dispatch
  ///
  /// Nodes that fail are reported and left invalid. They are not retried within the same build.
  #[tracing::instrument(level = "info", skip_all)]
  pub fn build(&self, graph: &mut BuildGraph) -> anyhow::Result<BuildReport> {
    let mut report = BuildReport::default();
    let mut failed: HashSet<String> = HashSet::new();

    loop {
      let dispatches = graph.dispatch_where(|node| !failed.contains(node.id()));
      if dispatches.is_empty() {
        break;
      }

      report.passes += 1;
      tracing::debug!(pass = report.passes, nodes = dispatches.len(), "Running build pass");

      let outputs: Vec<(Dispatch, anyhow::Result<WorkOutput>)> = self.thread_pool.install(|| {
        dispatches
          .into_par_iter()
          .map(|dispatch| {
            let output = run_work(self.plugins.as_ref(), &dispatch.node);
            (dispatch, output)
          })
          .collect()
      });

      for (dispatch, output) in outputs {
        match output {
          Ok(output) => match Self::apply(graph, &dispatch, output)? {
            ApplyOutcome::Applied => report.applied += 1,
            ApplyOutcome::Stale => report.discarded += 1,
          },
          Err(error) if graph.is_current(&dispatch) => {
            tracing::warn!(id = dispatch.id(), %error, "Build work failed");

            graph.mark_failed(&dispatch);
            failed.insert(dispatch.id().to_string());
            report.failures.push(NodeFailure {
              id: dispatch.id().to_string(),
              node_type: dispatch.node.node_type(),
              error,
            });
          }
          Err(error) => {
            tracing::debug!(id = dispatch.id(), %error, "Discarding failure of stale work");
            report.discarded += 1;
          }
        }
      }
    }

    tracing::debug!(
      passes = report.passes,
      applied = report.applied,
      discarded = report.discarded,
      failures = report.failures.len(),
      "Build finished"
    );

    Ok(report)
  }

  /// Applies the output of a dispatch, unless the node changed since it was dispatched
  pub fn apply(
    graph: &mut BuildGraph,
    dispatch: &Dispatch,
    output: WorkOutput,
  ) -> Result<ApplyOutcome, BuildGraphError> {
    if !graph.is_current(dispatch) {
      tracing::debug!(id = dispatch.id(), "Discarding stale result");
      return Ok(ApplyOutcome::Stale);
    }

    let id = dispatch.id();

    match output {
      WorkOutput::Dependency(Some(request)) => {
        graph.resolve_dependency(id, request)?;
      }
      WorkOutput::Dependency(None) => {
        graph.exclude_dependency(id)?;
      }
      WorkOutput::TransformerRequest(result) => {
        graph.resolve_transformer_request(id, result)?;
      }
      WorkOutput::ConfigRequest(result) => {
        graph.resolve_config_request(id, result)?;
      }
      WorkOutput::DevDepRequest(dev_dep) => {
        graph.resolve_dev_dep_request(id, dev_dep)?;
      }
    }

    Ok(ApplyOutcome::Applied)
  }
}
