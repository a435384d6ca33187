use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::environment::Environment;

/// A target represents how and where source code is compiled
///
/// Every entry is built once per target, each with the target's environment.
#[derive(PartialEq, Clone, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
  /// The output folder for compiled bundles
  pub dist_dir: PathBuf,

  /// The environment the code will run in
  pub env: Arc<Environment>,

  /// The name of the target
  pub name: String,
}

impl Default for Target {
  fn default() -> Self {
    Self {
      dist_dir: PathBuf::from("dist"),
      env: Arc::new(Environment::default()),
      name: String::from("default"),
    }
  }
}
