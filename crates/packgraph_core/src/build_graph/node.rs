use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use packgraph_graph::GraphNode;

use crate::types::Asset;
use crate::types::Config;
use crate::types::ConfigRequest;
use crate::types::Dependency;
use crate::types::DevDep;
use crate::types::DevDepRequest;
use crate::types::TransformerRequest;

pub const ROOT_NODE_ID: &str = "@@root";

const ASSET_REFERENCE_PREFIX: &str = "asset_reference:";

#[derive(Clone, Debug, PartialEq)]
pub struct RootNode {
  pub root_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileNode {
  id: String,
  pub file_path: PathBuf,
}

impl FileNode {
  pub fn new(file_path: impl Into<PathBuf>) -> Self {
    let file_path = file_path.into();
    FileNode {
      id: file_path.to_string_lossy().into_owned(),
      file_path,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlobNode {
  pub pattern: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransformerRequestNode {
  pub id: String,
  pub request: Arc<TransformerRequest>,
}

/// An asset that is either part of the build, or a tombstone left by [`BuildGraph::remove_asset`]
///
/// Tombstones keep the inbound edges of the removed asset, but traversals do not treat them as
/// live assets.
///
/// [`BuildGraph::remove_asset`]: crate::build_graph::BuildGraph::remove_asset
#[derive(Clone, Debug, PartialEq)]
pub enum AssetNode {
  Live(Arc<Asset>),
  Tombstoned { id: String, asset: Arc<Asset> },
}

impl AssetNode {
  pub fn tombstone(asset: Arc<Asset>) -> Self {
    AssetNode::Tombstoned {
      id: format!("{}{}", ASSET_REFERENCE_PREFIX, asset.id),
      asset,
    }
  }

  pub fn asset(&self) -> &Arc<Asset> {
    match self {
      AssetNode::Live(asset) => asset,
      AssetNode::Tombstoned { asset, .. } => asset,
    }
  }

  pub fn is_live(&self) -> bool {
    matches!(self, AssetNode::Live(_))
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfigRequestNode {
  pub id: String,
  pub request: Arc<ConfigRequest>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfigNode {
  pub id: String,
  pub config: Arc<Config>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DevDepRequestNode {
  pub id: String,
  pub request: Arc<DevDepRequest>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DevDepNode {
  pub id: String,
  pub dev_dep: Arc<DevDep>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BuildGraphNode {
  Root(RootNode),
  Dependency(Arc<Dependency>),
  File(FileNode),
  Glob(GlobNode),
  TransformerRequest(TransformerRequestNode),
  Asset(AssetNode),
  ConfigRequest(ConfigRequestNode),
  Config(ConfigNode),
  DevDepRequest(DevDepRequestNode),
  DevDep(DevDepNode),
}

impl GraphNode for BuildGraphNode {
  fn id(&self) -> &str {
    match self {
      BuildGraphNode::Root(_) => ROOT_NODE_ID,
      BuildGraphNode::Dependency(dependency) => &dependency.id,
      BuildGraphNode::File(file) => &file.id,
      BuildGraphNode::Glob(glob) => &glob.pattern,
      BuildGraphNode::TransformerRequest(request) => &request.id,
      BuildGraphNode::Asset(AssetNode::Live(asset)) => &asset.id,
      BuildGraphNode::Asset(AssetNode::Tombstoned { id, .. }) => id,
      BuildGraphNode::ConfigRequest(request) => &request.id,
      BuildGraphNode::Config(config) => &config.id,
      BuildGraphNode::DevDepRequest(request) => &request.id,
      BuildGraphNode::DevDep(dev_dep) => &dev_dep.id,
    }
  }
}

impl BuildGraphNode {
  pub fn file(file_path: impl Into<PathBuf>) -> Self {
    BuildGraphNode::File(FileNode::new(file_path))
  }

  /// A file node, or a glob node when `pattern` contains glob syntax
  pub fn file_or_glob(pattern: &str) -> Self {
    if is_glob(pattern) {
      BuildGraphNode::Glob(GlobNode {
        pattern: pattern.to_string(),
      })
    } else {
      BuildGraphNode::file(pattern)
    }
  }

  pub fn node_type(&self) -> NodeType {
    match self {
      BuildGraphNode::Root(_) => NodeType::Root,
      BuildGraphNode::Dependency(_) => NodeType::Dependency,
      BuildGraphNode::File(_) => NodeType::File,
      BuildGraphNode::Glob(_) => NodeType::Glob,
      BuildGraphNode::TransformerRequest(_) => NodeType::TransformerRequest,
      BuildGraphNode::Asset(AssetNode::Live(_)) => NodeType::Asset,
      BuildGraphNode::Asset(AssetNode::Tombstoned { .. }) => NodeType::AssetReference,
      BuildGraphNode::ConfigRequest(_) => NodeType::ConfigRequest,
      BuildGraphNode::Config(_) => NodeType::Config,
      BuildGraphNode::DevDepRequest(_) => NodeType::DevDepRequest,
      BuildGraphNode::DevDep(_) => NodeType::DevDep,
    }
  }

  /// Nodes that stand for a unit of work the scheduler dispatches
  pub fn is_request(&self) -> bool {
    matches!(
      self,
      BuildGraphNode::Dependency(_)
        | BuildGraphNode::TransformerRequest(_)
        | BuildGraphNode::ConfigRequest(_)
        | BuildGraphNode::DevDepRequest(_)
    )
  }

  pub fn as_live_asset(&self) -> Option<&Arc<Asset>> {
    match self {
      BuildGraphNode::Asset(AssetNode::Live(asset)) => Some(asset),
      _ => None,
    }
  }

  pub fn as_file_path(&self) -> Option<&Path> {
    match self {
      BuildGraphNode::File(file) => Some(&file.file_path),
      _ => None,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
  Root,
  Dependency,
  File,
  Glob,
  TransformerRequest,
  Asset,
  AssetReference,
  ConfigRequest,
  Config,
  DevDepRequest,
  DevDep,
}

impl Display for NodeType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      NodeType::Root => "root",
      NodeType::Dependency => "dependency",
      NodeType::File => "file",
      NodeType::Glob => "glob",
      NodeType::TransformerRequest => "transformer_request",
      NodeType::Asset => "asset",
      NodeType::AssetReference => "asset_reference",
      NodeType::ConfigRequest => "config_request",
      NodeType::Config => "config",
      NodeType::DevDepRequest => "dev_dep_request",
      NodeType::DevDep => "dev_dep",
    };

    write!(f, "{}", name)
  }
}

pub fn is_glob(pattern: &str) -> bool {
  pattern.contains(['*', '?', '[', '{'])
}

#[cfg(test)]
mod tests {
  use crate::types::Environment;

  use super::*;

  #[test]
  fn tombstones_prefix_the_asset_id() {
    let asset = Arc::new(Asset::new(
      "a1",
      PathBuf::from("/proj/index.js"),
      Arc::new(Environment::default()),
    ));

    let live = BuildGraphNode::Asset(AssetNode::Live(asset.clone()));
    let tombstone = BuildGraphNode::Asset(AssetNode::tombstone(asset));

    assert_eq!(live.id(), "a1");
    assert_eq!(tombstone.id(), "asset_reference:a1");
    assert_eq!(tombstone.node_type(), NodeType::AssetReference);
    assert_eq!(tombstone.node_type().to_string(), "asset_reference");
  }

  #[test]
  fn distinguishes_globs_from_files() {
    assert!(matches!(
      BuildGraphNode::file_or_glob("/proj/**/.babelrc"),
      BuildGraphNode::Glob(_)
    ));
    assert!(matches!(
      BuildGraphNode::file_or_glob("/proj/.babelrc"),
      BuildGraphNode::File(_)
    ));
  }
}
