use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::dev_dep::DevDepRequest;
use super::file_event::FileEventKind;

/// Asks the config loader to find one of `file_names`, searching upwards from `file_path`
#[derive(Clone, Debug, Deserialize, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequest {
  pub file_path: PathBuf,

  /// Names the kind of configuration, e.g. `babel`
  pub config_type: String,

  /// Candidate file names in order of preference
  #[serde(default)]
  pub file_names: Vec<String>,
}

impl ConfigRequest {
  /// The directory the search starts from
  pub fn search_path(&self) -> &Path {
    self.file_path.parent().unwrap_or(&self.file_path)
  }
}

/// A loaded configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
  pub search_path: PathBuf,

  /// The file the value was read from, if one was found
  pub result_path: Option<PathBuf>,

  pub value: Option<Value>,
}

/// A file or glob whose change makes a loaded configuration stale
#[derive(Clone, Debug, Deserialize, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidation {
  pub action: FileEventKind,
  pub pattern: String,
}

impl ConfigInvalidation {
  pub fn on_change(path: &Path) -> Self {
    ConfigInvalidation {
      action: FileEventKind::Change,
      pattern: path.to_string_lossy().into_owned(),
    }
  }

  pub fn on_add(pattern: impl Into<String>) -> Self {
    ConfigInvalidation {
      action: FileEventKind::Add,
      pattern: pattern.into(),
    }
  }

  pub fn on_unlink(path: &Path) -> Self {
    ConfigInvalidation {
      action: FileEventKind::Unlink,
      pattern: path.to_string_lossy().into_owned(),
    }
  }
}

/// What the config loader found on disk
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedConfig {
  pub path: PathBuf,
  pub value: Value,

  /// Every file read while loading, including `path`
  pub consulted_files: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequestResult {
  pub config: Config,

  #[serde(default)]
  pub invalidations: Vec<ConfigInvalidation>,

  /// Build tools the configuration refers to
  #[serde(default)]
  pub dev_deps: Vec<DevDepRequest>,
}

impl ConfigRequestResult {
  /// Builds a result for a config search
  ///
  /// A found config is invalidated when any file consulted to load it changes or is deleted.
  /// When nothing was found, adding a candidate file to the search path or any directory above
  /// it invalidates the result instead.
  pub fn from_search(
    request: &ConfigRequest,
    loaded: Option<LoadedConfig>,
    dev_deps: Vec<DevDepRequest>,
  ) -> Self {
    let search_path = request.search_path().to_path_buf();

    let Some(loaded) = loaded else {
      let invalidations = search_path
        .ancestors()
        .flat_map(|dir| {
          request
            .file_names
            .iter()
            .map(move |name| ConfigInvalidation::on_add(dir.join(name).to_string_lossy()))
        })
        .collect();

      return ConfigRequestResult {
        config: Config {
          search_path,
          result_path: None,
          value: None,
        },
        invalidations,
        dev_deps,
      };
    };

    let mut invalidations = Vec::new();
    for file in loaded.consulted_files.iter() {
      invalidations.push(ConfigInvalidation::on_change(file));
      invalidations.push(ConfigInvalidation::on_unlink(file));
    }

    ConfigRequestResult {
      config: Config {
        search_path,
        result_path: Some(loaded.path),
        value: Some(loaded.value),
      },
      invalidations,
      dev_deps,
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::json;

  use super::*;

  fn babel_request() -> ConfigRequest {
    ConfigRequest {
      file_path: PathBuf::from("/proj/src/index.js"),
      config_type: String::from("babel"),
      file_names: vec![String::from(".babelrc"), String::from("babel.config.json")],
    }
  }

  #[test]
  fn missing_config_is_invalidated_by_adding_a_candidate_in_any_searched_directory() {
    let result = ConfigRequestResult::from_search(&babel_request(), None, Vec::new());

    assert_eq!(result.config.search_path, PathBuf::from("/proj/src"));
    assert_eq!(result.config.value, None);
    assert_eq!(
      result.invalidations,
      vec![
        ConfigInvalidation::on_add("/proj/src/.babelrc"),
        ConfigInvalidation::on_add("/proj/src/babel.config.json"),
        ConfigInvalidation::on_add("/proj/.babelrc"),
        ConfigInvalidation::on_add("/proj/babel.config.json"),
        ConfigInvalidation::on_add("/.babelrc"),
        ConfigInvalidation::on_add("/babel.config.json"),
      ]
    );
  }

  #[test]
  fn found_config_is_invalidated_by_its_consulted_files() {
    let result = ConfigRequestResult::from_search(
      &babel_request(),
      Some(LoadedConfig {
        path: PathBuf::from("/proj/.babelrc"),
        value: json!({ "presets": ["env"] }),
        consulted_files: vec![PathBuf::from("/proj/.babelrc")],
      }),
      vec![DevDepRequest::new("@babel/preset-env", "/proj/.babelrc")],
    );

    assert_eq!(result.config.result_path, Some(PathBuf::from("/proj/.babelrc")));
    assert_eq!(
      result.invalidations,
      vec![
        ConfigInvalidation::on_change(Path::new("/proj/.babelrc")),
        ConfigInvalidation::on_unlink(Path::new("/proj/.babelrc")),
      ]
    );
    assert_eq!(result.dev_deps.len(), 1);
  }
}
