use crate::types::FileEventKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BuildGraphEdgeType {
  /// Structural edges: root to entries, dependency to request, asset to dependency, requester to
  /// config request, config request to config
  #[default]
  Reference,
  Produces,
  InvalidatedByChangeTo,
  InvalidatedByAdditionMatching,
  InvalidatedByRemovalOf,
  Configures,
  ResolvesTo,
}

impl BuildGraphEdgeType {
  /// The edge type linking a request to the files whose `kind` event makes it stale
  pub fn for_file_event(kind: FileEventKind) -> Self {
    match kind {
      FileEventKind::Change => BuildGraphEdgeType::InvalidatedByChangeTo,
      FileEventKind::Add => BuildGraphEdgeType::InvalidatedByAdditionMatching,
      FileEventKind::Unlink => BuildGraphEdgeType::InvalidatedByRemovalOf,
    }
  }

  pub fn invalidations() -> [BuildGraphEdgeType; 3] {
    [
      BuildGraphEdgeType::InvalidatedByChangeTo,
      BuildGraphEdgeType::InvalidatedByAdditionMatching,
      BuildGraphEdgeType::InvalidatedByRemovalOf,
    ]
  }
}
