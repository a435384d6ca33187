/// Handed to traversal visitors so they can steer the walk
#[derive(Debug, Default)]
pub struct TraversalActions {
  skipped: bool,
  stopped: bool,
}

impl TraversalActions {
  /// Do not descend into the children of the node currently being visited
  pub fn skip_children(&mut self) {
    self.skipped = true;
  }

  /// End the traversal after the current visit
  pub fn stop(&mut self) {
    self.stopped = true;
  }

  pub fn is_skipped(&self) -> bool {
    self.skipped
  }

  pub fn is_stopped(&self) -> bool {
    self.stopped
  }
}
