use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::BuildGraphError;

/// The kinds of filesystem change the build graph reacts to
#[derive(Clone, Copy, Debug, Deserialize, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FileEventKind {
  Change,
  Add,
  Unlink,
}

impl FromStr for FileEventKind {
  type Err = BuildGraphError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "change" => Ok(FileEventKind::Change),
      "add" => Ok(FileEventKind::Add),
      "unlink" => Ok(FileEventKind::Unlink),
      other => Err(BuildGraphError::UnknownFileEventKind(other.to_string())),
    }
  }
}

impl TryFrom<String> for FileEventKind {
  type Error = BuildGraphError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl Display for FileEventKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FileEventKind::Change => write!(f, "change"),
      FileEventKind::Add => write!(f, "add"),
      FileEventKind::Unlink => write!(f, "unlink"),
    }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct FileEvent {
  pub path: PathBuf,
  pub kind: FileEventKind,
}

impl FileEvent {
  /// Parses a raw `(action, path)` pair as delivered by a watcher
  pub fn parse(action: &str, path: impl Into<PathBuf>) -> Result<Self, BuildGraphError> {
    Ok(FileEvent {
      path: path.into(),
      kind: action.parse()?,
    })
  }
}
