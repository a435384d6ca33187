use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use packgraph_core::types::ConfigRequest;
use packgraph_core::types::ConfigRequestResult;
use packgraph_core::types::Dependency;
use packgraph_core::types::DevDep;
use packgraph_core::types::DevDepRequest;
use packgraph_core::types::TransformerRequest;
use packgraph_core::types::TransformerRequestResult;

pub type PluginsRef = Arc<dyn Plugins + Send + Sync>;

/// The collaborators that do the actual work for each kind of build graph request
///
/// Calls for different nodes run concurrently. An error fails only the node it was returned for.
#[cfg_attr(test, automock)]
pub trait Plugins {
  /// Resolves a dependency to the file and environment to transform
  ///
  /// `None` means the dependency is intentionally left unresolved, e.g. an excluded optional
  /// dependency.
  fn resolve(&self, dependency: &Dependency) -> Result<Option<TransformerRequest>, anyhow::Error>;

  fn transform(
    &self,
    request: &TransformerRequest,
  ) -> Result<TransformerRequestResult, anyhow::Error>;

  fn load_config(&self, request: &ConfigRequest) -> Result<ConfigRequestResult, anyhow::Error>;

  fn resolve_dev_dep(&self, request: &DevDepRequest) -> Result<DevDep, anyhow::Error>;
}
