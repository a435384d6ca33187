use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Asks for the installed version of a build tool, resolved from `resolve_from`
#[derive(Clone, Debug, Deserialize, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevDepRequest {
  pub name: String,
  pub resolve_from: PathBuf,
}

impl DevDepRequest {
  pub fn new(name: impl Into<String>, resolve_from: impl Into<PathBuf>) -> Self {
    DevDepRequest {
      name: name.into(),
      resolve_from: resolve_from.into(),
    }
  }
}

#[derive(Clone, Debug, Deserialize, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevDep {
  pub name: String,
  pub version: String,
}
