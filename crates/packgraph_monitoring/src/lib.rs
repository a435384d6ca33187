//! Configures tracing for packgraph.
//!
//! Logs always go to an hourly rotated file under the system temporary directory. Standard output
//! and Chrome profiles are opt-in through `PACKGRAPH_TRACING_MODE`.
//!
//! Monitoring should only be initialized once per process.
use std::sync::Mutex;

pub use from_env::FromEnvError;
pub use tracer::TracerMode;

mod from_env;
mod tracer;

pub static MONITORING_GUARD: Mutex<Option<MonitoringGuard>> = Mutex::new(None);

pub struct MonitoringGuard {
  #[allow(unused)]
  tracer: tracer::Tracer,
}

#[derive(Debug, Default)]
pub struct MonitoringOptions {
  pub tracing_options: Vec<TracerMode>,
}

impl MonitoringOptions {
  pub fn from_env() -> Result<Self, FromEnvError> {
    Ok(Self {
      tracing_options: TracerMode::from_env()?,
    })
  }
}

pub fn initialize_monitoring(options: MonitoringOptions) -> anyhow::Result<()> {
  let mut global = MONITORING_GUARD
    .lock()
    .map_err(|_| anyhow::anyhow!("Monitoring guard is poisoned"))?;

  if global.is_some() {
    tracing::warn!("Monitoring is getting set-up twice, this will no-op");
    return Ok(());
  }

  let tracer = tracer::Tracer::new(&options.tracing_options)?;
  *global = Some(MonitoringGuard { tracer });

  Ok(())
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_initialize_monitoring_multiple_times() {
    initialize_monitoring(MonitoringOptions {
      tracing_options: vec![TracerMode::Stdout],
    })
    .unwrap();

    initialize_monitoring(MonitoringOptions {
      tracing_options: vec![TracerMode::Stdout],
    })
    .unwrap();

    assert!(MONITORING_GUARD.lock().unwrap().is_some());
  }
}
