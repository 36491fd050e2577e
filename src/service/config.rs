use crate::client::ClientConfig;
use crate::dashboard::DashboardConfig;
use crate::service::monitor::MonitorConfig;
use crate::webhook::WebhookConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All settings, one TOML table per component. Missing tables and keys take
/// their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub rpc: ClientConfig,
    pub webhook: WebhookConfig,
    pub dashboard: DashboardConfig,
    pub monitor: MonitorConfig,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&data)?;
        Ok(settings)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
