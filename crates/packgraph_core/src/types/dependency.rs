use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::environment::Environment;
use super::target::Target;
use super::JSONObject;

static NEXT_DEPENDENCY_ID: AtomicU64 = AtomicU64::new(1);

/// Returns an id that no other dependency created by this process shares
pub fn create_dependency_id() -> String {
  let id = NEXT_DEPENDENCY_ID.fetch_add(1, Ordering::Relaxed);
  format!("dep:{:x}", id)
}

/// A dependency denotes a connection from an asset, or from the build itself, to a module
///
/// Dependencies are not content addressed. A transformer that returns the same dependency on every
/// run must return it with the same id, which is what keeps re-resolution of an unchanged file
/// from growing the graph.
#[derive(PartialEq, Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
  pub id: String,

  /// The environment of the dependency
  pub env: Arc<Environment>,

  /// Whether the dependency is an entry
  pub is_entry: bool,

  /// Whether the dependency is loaded through a dynamic import
  #[serde(default)]
  pub is_async: bool,

  /// Whether the dependency is optional
  ///
  /// If an optional dependency cannot be resolved, it will not fail the build.
  #[serde(default)]
  pub is_optional: bool,

  /// Plugin-specific metadata for the dependency
  #[serde(default)]
  pub meta: JSONObject,

  /// The import or export specifier that connects two assets together
  pub module_specifier: String,

  /// The file path of the asset with this dependency
  ///
  /// Entries use the project root, so they are resolved relative to it.
  pub source_path: Option<PathBuf>,

  /// The target associated with an entry, if any
  #[serde(default)]
  pub target: Option<Box<Target>>,
}

impl Dependency {
  pub fn new(module_specifier: String, env: Arc<Environment>) -> Dependency {
    Dependency {
      id: create_dependency_id(),
      env,
      is_entry: false,
      is_async: false,
      is_optional: false,
      meta: JSONObject::new(),
      module_specifier,
      source_path: None,
      target: None,
    }
  }

  pub fn entry(entry: String, target: Target, root_dir: PathBuf) -> Dependency {
    Dependency {
      is_entry: true,
      source_path: Some(root_dir),
      target: Some(Box::new(target.clone())),
      ..Dependency::new(entry, target.env)
    }
  }
}
