use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::asset::Asset;
use super::config::ConfigRequest;
use super::environment::Environment;

/// Asks the transformer to process one file under one environment
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerRequest {
  pub file_path: PathBuf,

  pub env: Arc<Environment>,

  /// Source text to use instead of reading `file_path`, used for inline and virtual modules
  #[serde(default)]
  pub code: Option<String>,
}

impl TransformerRequest {
  pub fn new(file_path: impl Into<PathBuf>, env: Arc<Environment>) -> Self {
    TransformerRequest {
      file_path: file_path.into(),
      env,
      code: None,
    }
  }
}

/// What the transformer produced for a [`TransformerRequest`]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerRequestResult {
  pub assets: Vec<Asset>,

  /// Files read while transforming, other than the requested file itself
  #[serde(default)]
  pub connected_files: Vec<PathBuf>,

  /// Configuration the transformer needs loaded before its output can be trusted
  #[serde(default)]
  pub config_requests: Vec<ConfigRequest>,
}
