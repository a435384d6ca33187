//! This module configures `tracing_subscriber` to write to a log file, and optionally to standard
//! output and a Chrome profile.
use std::collections::HashSet;

use anyhow::anyhow;
use serde::Deserialize;
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::from_env::optional_var;
use crate::from_env::FromEnvError;

const TRACING_MODE_VAR: &str = "PACKGRAPH_TRACING_MODE";

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum TracerMode {
  /// Output the Tracer logs to Stdout
  Stdout,
  /// Output a Chrome profile
  Chrome,
}

impl TracerMode {
  /// Parses the comma separated modes in `PACKGRAPH_TRACING_MODE`
  ///
  /// `file` is accepted but has no effect, the log file is always written.
  pub fn from_env() -> Result<Vec<Self>, FromEnvError> {
    let Some(modes) = optional_var(TRACING_MODE_VAR) else {
      return Ok(vec![]);
    };

    let mut tracer_modes = vec![];
    let mut used_modes = HashSet::new();

    for mode in modes.split(',').map(|mode| mode.trim()) {
      match mode {
        "stdout" => {
          if used_modes.insert(mode) {
            tracer_modes.push(TracerMode::Stdout);
          }
        }
        "chrome" => {
          if used_modes.insert(mode) {
            tracer_modes.push(TracerMode::Chrome);
          }
        }
        "file" => {}
        value => {
          return Err(FromEnvError::InvalidKey(
            String::from(TRACING_MODE_VAR),
            anyhow!("Invalid value: {}", value),
          ))
        }
      }
    }

    Ok(tracer_modes)
  }
}

enum TracerGuard {
  #[allow(unused)]
  WorkerGuard(WorkerGuard),
  #[allow(unused)]
  ChromeGuard(tracing_chrome::FlushGuard),
}

/// Keeps the log writers alive. Dropping it flushes them.
pub struct Tracer {
  #[allow(unused)]
  guards: Vec<TracerGuard>,
}

impl Tracer {
  pub fn new(options: &[TracerMode]) -> anyhow::Result<Self> {
    let mut guards = vec![];

    let directory = std::env::temp_dir().join("packgraph_trace");
    let file_appender = tracing_appender::rolling::Builder::new()
      .rotation(tracing_appender::rolling::Rotation::HOURLY)
      .max_log_files(4)
      .filename_prefix("packgraph-tracing")
      .build(&directory)
      .map_err(|err| anyhow!(err))?;
    let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
      .with_writer(non_blocking)
      .with_span_events(FmtSpan::CLOSE)
      .with_filter(EnvFilter::from_default_env());

    guards.push(TracerGuard::WorkerGuard(worker_guard));

    let stdout_layer = if options.contains(&TracerMode::Stdout) {
      let (non_blocking, worker_guard) = tracing_appender::non_blocking(std::io::stdout());
      guards.push(TracerGuard::WorkerGuard(worker_guard));

      Some(
        tracing_subscriber::fmt::layer()
          .with_writer(non_blocking)
          .with_span_events(FmtSpan::CLOSE)
          .with_filter(EnvFilter::from_default_env()),
      )
    } else {
      None
    };

    let chrome_layer = if options.contains(&TracerMode::Chrome) {
      let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
        .include_args(true)
        .build();
      guards.push(TracerGuard::ChromeGuard(guard));

      Some(chrome_layer)
    } else {
      None
    };

    let subscriber = Registry::default()
      .with(file_layer)
      .with(stdout_layer)
      .with(chrome_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Tracer { guards })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

  #[test]
  fn no_modes_when_the_variable_is_unset() {
    let _guard = TEST_LOCK.lock();
    std::env::remove_var(TRACING_MODE_VAR);

    let options = TracerMode::from_env().unwrap();

    assert!(options.is_empty());
  }

  #[test]
  fn parses_modes_and_ignores_duplicates() {
    let _guard = TEST_LOCK.lock();
    std::env::set_var(TRACING_MODE_VAR, "stdout, file,chrome,stdout");

    let options = TracerMode::from_env().unwrap();
    std::env::remove_var(TRACING_MODE_VAR);

    assert_eq!(options, vec![TracerMode::Stdout, TracerMode::Chrome]);
  }

  #[test]
  fn rejects_unknown_modes() {
    let _guard = TEST_LOCK.lock();
    std::env::set_var(TRACING_MODE_VAR, "stdout,syslog");

    let error = TracerMode::from_env().unwrap_err();
    std::env::remove_var(TRACING_MODE_VAR);

    assert_eq!(
      error.to_string(),
      "Invalid value for environment variable PACKGRAPH_TRACING_MODE: Invalid value: syslog"
    );
  }
}
