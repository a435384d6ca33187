//! Canonical keys for content-addressed nodes
//!
//! A key fully describes a unit of work. Node ids are the [`ContentHasher`] digest of the key, so
//! two requests for the same work collapse onto one node. Bump [`CONTENT_KEY_VERSION`] whenever
//! the shape of a key changes.
//!
//! [`ContentHasher`]: crate::hash::ContentHasher

use std::fmt::Display;

use serde_json::json;

use crate::types::Config;
use crate::types::ConfigRequest;
use crate::types::DevDep;
use crate::types::DevDepRequest;
use crate::types::TransformerRequest;

pub const CONTENT_KEY_VERSION: u32 = 1;

fn versioned(payload: impl Display) -> String {
  format!("{}:{}", CONTENT_KEY_VERSION, payload)
}

pub fn transformer_request_key(request: &TransformerRequest) -> String {
  versioned(format!(
    "{}:{}",
    request.file_path.display(),
    request.env.id()
  ))
}

pub fn config_request_key(request: &ConfigRequest) -> String {
  versioned(format!(
    "{}:{}",
    request.file_path.display(),
    request.config_type
  ))
}

pub fn dev_dep_request_key(request: &DevDepRequest) -> String {
  versioned(json!({
    "name": request.name,
    "resolveFrom": request.resolve_from.to_string_lossy(),
  }))
}

pub fn dev_dep_key(dev_dep: &DevDep) -> String {
  versioned(format!("{}:{}", dev_dep.name, dev_dep.version))
}

pub fn config_key(config_request_id: &str, config: &Config) -> String {
  let value = config
    .value
    .as_ref()
    .map(|value| value.to_string())
    .unwrap_or_else(|| String::from("null"));

  versioned(format!(
    "{}:{}:{}",
    config_request_id,
    config.search_path.display(),
    value
  ))
}
