use std::fmt::Debug;
use std::sync::Arc;

use xxhash_rust::xxh3::xxh3_64;
use xxhash_rust::xxh3::Xxh3;

/// Hasher used to derive identifiers that end up in the build graph and its caches.
///
/// The hashes don't need to be incredibly fast, but they should be stable across
/// runs, machines, platforms and versions.
pub type IdentifierHasher = Xxh3;

pub fn hash_bytes(s: &[u8]) -> String {
  let res = xxh3_64(s);
  format!("{:016x}", res)
}

pub type ContentHasherRef = Arc<dyn ContentHasher>;

/// Turns the canonical key of a content-addressed node into its node id
///
/// Swapping the implementation changes every request id, so any persisted graph must be rebuilt.
pub trait ContentHasher: Debug + Send + Sync {
  fn hash(&self, input: &str) -> String;
}

/// xxh3-64 rendered as 16 lowercase hex characters
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3ContentHasher;

impl ContentHasher for Xxh3ContentHasher {
  fn hash(&self, input: &str) -> String {
    hash_bytes(input.as_bytes())
  }
}
