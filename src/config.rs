//! Configuration for the distributed monitor

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Number of subnets to monitor (ids `1..=subnet_count`)
    #[serde(default = "default_subnet_count")]
    pub subnet_count: u32,

    /// Size of the worker pool
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Use synthetic subnet data
    #[serde(default = "default_true")]
    pub mock: bool,

    /// Delay every subnet by its simulated processing time
    #[serde(default = "default_true")]
    pub simulate_latency: bool,

    /// Maximum number of results collected per wait
    #[serde(default = "default_collect_batch_size")]
    pub collect_batch_size: usize,

    /// How long a single wait for results may take (milliseconds)
    #[serde(default = "default_collect_timeout_ms")]
    pub collect_timeout_ms: u64,

    /// Log progress after this many completed subnets
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

fn default_subnet_count() -> u32 {
    118
}

fn default_workers() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_collect_batch_size() -> usize {
    10
}

fn default_collect_timeout_ms() -> u64 {
    1000
}

fn default_progress_interval() -> usize {
    20
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            subnet_count: default_subnet_count(),
            workers: default_workers(),
            mock: true,
            simulate_latency: true,
            collect_batch_size: default_collect_batch_size(),
            collect_timeout_ms: default_collect_timeout_ms(),
            progress_interval: default_progress_interval(),
        }
    }
}

impl MonitorConfig {
    pub fn collect_timeout(&self) -> Duration {
        Duration::from_millis(self.collect_timeout_ms)
    }

    /// Load configuration from file, or use defaults if there is none
    ///
    /// Without an explicit path, `~/.config/subnet-monitor/monitor.toml` is used
    /// if it exists. Files ending in `.json` are parsed as JSON, everything else
    /// as TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(|p| p.to_path_buf()).or_else(default_config_path);

        let Some(path) = config_path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&path, &content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
            .inspect(|config| trace!("loaded config: {config:?}"))
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let is_json = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

        if is_json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    /// Apply `SUBNET_COUNT` / `MONITOR_WORKERS` from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(subnet_count) = crate::util::get_subnet_count() {
            self.subnet_count = subnet_count;
        }
        if let Some(workers) = crate::util::get_workers() {
            self.workers = workers;
        }
        self
    }
}

fn default_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let default_path = home.join(".config/subnet-monitor/monitor.toml");
    default_path.exists().then_some(default_path)
}
