use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use super::dependency::Dependency;
use super::environment::Environment;

pub type AssetId = String;

#[derive(Clone, Debug, Default, Deserialize, Hash, PartialEq, Serialize)]
pub struct AssetStats {
  pub size: u64,
  pub time: u64,
}

/// An asset is a compiled unit of code produced by transforming a file
///
/// A single file can produce several assets.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
  pub id: AssetId,

  /// The dependencies found in the asset, keyed by dependency id, in source order
  #[serde(default)]
  pub dependencies: IndexMap<String, Dependency>,

  /// The environment of the asset
  pub env: Arc<Environment>,

  /// The file path to the asset
  pub file_path: PathBuf,

  /// The file extension of the compiled output, e.g. `js` or `css`
  pub file_type: String,

  /// Whether this asset is part of the project, and not an external dependency
  pub is_source: bool,

  /// A hash of the compiled output, once known
  #[serde(default)]
  pub output_hash: Option<String>,

  /// Statistics about the asset
  #[serde(default)]
  pub stats: AssetStats,
}

impl Asset {
  pub fn new(id: impl Into<AssetId>, file_path: PathBuf, env: Arc<Environment>) -> Self {
    let file_type = file_path
      .extension()
      .map(|extension| extension.to_string_lossy().into_owned())
      .unwrap_or_default();

    Asset {
      id: id.into(),
      dependencies: IndexMap::new(),
      env,
      file_path,
      file_type,
      is_source: true,
      output_hash: None,
      stats: AssetStats::default(),
    }
  }

  pub fn add_dependency(&mut self, dependency: Dependency) {
    self.dependencies.insert(dependency.id.clone(), dependency);
  }

  pub fn with_size(mut self, size: u64) -> Self {
    self.stats.size = size;
    self
  }
}
