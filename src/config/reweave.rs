use std::path::PathBuf;
use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Drift detection and reweave scheduling
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReweaveConfig {
    /// TOML file holding `[[pointcuts]]`; unset means pointcuts are pushed in-process
    #[serde(default)]
    pub pointcuts_path: Option<PathBuf>,

    /// Interval (in milliseconds) between background drift checks, 0 disables polling
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ReweaveConfig {
    fn default() -> Self {
        Self {
            pointcuts_path: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ReweaveConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.pointcuts_path {
            if path.as_os_str().is_empty() {
                return Err(Error::Config(ConfigError::Message(
                    "pointcuts_path cannot be empty".into(),
                )));
            }
        }
        if self.poll_interval_ms > 0 && self.poll_interval_ms < 10 {
            return Err(Error::Config(ConfigError::Message(format!(
                "poll_interval_ms {} is below the 10ms minimum",
                self.poll_interval_ms
            ))));
        }
        Ok(())
    }

    /// `None` when background polling is disabled
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_ms > 0).then(|| Duration::from_millis(self.poll_interval_ms))
    }
}

fn default_poll_interval_ms() -> u64 {
    0
}
