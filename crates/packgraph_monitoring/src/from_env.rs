use thiserror::Error;

#[derive(Debug, Error)]
pub enum FromEnvError {
  #[error("Invalid value for environment variable {0}: {1}")]
  InvalidKey(String, #[source] anyhow::Error),
}

/// Reads an environment variable, treating unset and empty values alike
pub fn optional_var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
