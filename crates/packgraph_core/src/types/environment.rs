use std::hash::Hash;
use std::hash::Hasher;

use serde::Deserialize;
use serde::Serialize;

use crate::hash::IdentifierHasher;

/// The environment the built code will run in
///
/// Two files compiled for different environments are different units of work, so the environment
/// is part of every transformer request identity.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
  /// The environment the output should run in
  pub context: EnvironmentContext,

  /// The engines supported by the environment
  pub engines: Engines,

  /// Whether this is a library build
  ///
  /// Treats the target as a library that would be published to npm and consumed by another tool,
  /// rather than used directly in a browser or other target environment.
  pub is_library: bool,

  /// Determines what type of module to output
  pub output_format: OutputFormat,

  /// Determines whether the output should be optimised
  pub should_optimize: bool,

  /// Determines whether scope hoisting should be enabled
  pub should_scope_hoist: bool,

  pub source_type: SourceType,
}

impl Environment {
  /// Stable identifier over every field of the environment
  pub fn id(&self) -> String {
    let mut hasher = IdentifierHasher::default();
    self.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
  }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Engines {
  pub browsers: Vec<String>,
  pub node: Option<String>,
}

/// This informs the transformers what environment-specific APIs are available
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentContext {
  #[default]
  Browser,
  ElectronMain,
  ElectronRenderer,
  Node,
  ServiceWorker,
  WebWorker,
  Worklet,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Global,
  CommonJS,
  EsModule,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
  #[default]
  Module,
  Script,
}
