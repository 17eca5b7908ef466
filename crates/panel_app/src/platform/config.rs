use std::fs;
use std::path::Path;
use std::time::Duration;

use panel_engine::{BackendSettings, RunnerSettings, STATUS_INTERVAL};
use panel_logging::{panel_info, panel_warn};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

/// Settings read from `panel.ron`. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub base_url: String,
    /// Listing URL preloaded into the URL field; empty means the built-in
    /// default.
    pub archive_url: String,
    pub poll_interval_ms: u64,
    pub status_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub detail_delay_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            archive_url: String::new(),
            poll_interval_ms: 1000,
            status_interval_secs: STATUS_INTERVAL.as_secs(),
            request_timeout_secs: 600,
            detail_delay_ms: 1000,
        }
    }
}

impl PanelConfig {
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(poll_interval_ms) = cli.poll_interval_ms {
            self.poll_interval_ms = poll_interval_ms;
        }
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ..BackendSettings::default()
        }
    }

    pub fn runner_settings(&self) -> RunnerSettings {
        RunnerSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            detail_delay: Duration::from_millis(self.detail_delay_ms),
        }
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs.max(1))
    }
}

pub(crate) fn load_config(path: &Path) -> PanelConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return PanelConfig::default();
        }
        Err(err) => {
            panel_warn!("Failed to read config from {:?}: {}", path, err);
            return PanelConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            panel_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            panel_warn!("Failed to parse config from {:?}: {}", path, err);
            PanelConfig::default()
        }
    }
}
