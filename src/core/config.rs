use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::monitor::alerts::AlertThresholds;
use crate::core::monitor::signatures::DEFAULT_SCAN_WINDOW;

/// Monitor configuration. Loaded from `<config_dir>/vigil/config.json`;
/// a missing file yields the defaults below, which target a
/// docker-compose nginx deployment on the local host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Security dashboard refresh period.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Network analyzer refresh period.
    #[serde(default = "default_net_interval_ms")]
    pub net_interval_ms: u64,

    /// Log lines inspected per cycle.
    #[serde(default = "default_log_window")]
    pub log_window: usize,

    /// System-snapshot history retained for trend display.
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Container running the reverse proxy.
    #[serde(default = "default_proxy_container")]
    pub proxy_container: String,

    #[serde(default = "default_access_log")]
    pub access_log: String,

    #[serde(default = "default_error_log")]
    pub error_log: String,

    /// Certificate name passed to certbot.
    #[serde(default = "default_cert_name")]
    pub cert_name: String,

    /// Monitored logical services, in display order.
    #[serde(default = "default_services")]
    pub services: Vec<ServiceSpec>,

    #[serde(default)]
    pub thresholds: AlertThresholds,
}

/// One monitored logical service: a compose container, an HTTP probe
/// endpoint, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub probe: Option<String>,
}

impl ServiceSpec {
    pub fn container(name: &str, container: &str) -> Self {
        Self {
            name: name.to_string(),
            container: Some(container.to_string()),
            probe: None,
        }
    }

    pub fn with_probe(mut self, url: &str) -> Self {
        self.probe = Some(url.to_string());
        self
    }

    pub fn probe_only(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            container: None,
            probe: Some(url.to_string()),
        }
    }
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_net_interval_ms() -> u64 {
    3000
}

fn default_log_window() -> usize {
    DEFAULT_SCAN_WINDOW
}

fn default_history_size() -> usize {
    crate::core::monitor::DEFAULT_HISTORY_SIZE
}

fn default_proxy_container() -> String {
    "nginx".to_string()
}

fn default_access_log() -> String {
    "/var/log/nginx/access.log".to_string()
}

fn default_error_log() -> String {
    "/var/log/nginx/error.log".to_string()
}

fn default_cert_name() -> String {
    "localhost".to_string()
}

fn default_services() -> Vec<ServiceSpec> {
    vec![
        ServiceSpec::container("nginx", "nginx"),
        ServiceSpec::container("landing-page", "landing-page").with_probe("https://localhost/"),
        ServiceSpec::container("backend-api", "backend-api")
            .with_probe("https://localhost/api/health"),
        ServiceSpec::container("certbot", "certbot"),
        ServiceSpec::probe_only("health-check", "https://localhost/health"),
    ]
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            net_interval_ms: default_net_interval_ms(),
            log_window: default_log_window(),
            history_size: default_history_size(),
            proxy_container: default_proxy_container(),
            access_log: default_access_log(),
            error_log: default_error_log(),
            cert_name: default_cert_name(),
            services: default_services(),
            thresholds: AlertThresholds::default(),
        }
    }
}

impl MonitorConfig {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(MonitorConfig::default());
        }

        let data = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        // An empty or corrupted file falls back to defaults rather than
        // refusing to start the monitor.
        if data.trim().is_empty() {
            return Ok(MonitorConfig::default());
        }

        Ok(serde_json::from_str(&data).unwrap_or_else(|err| {
            log::warn!("config file unreadable ({err}), using defaults");
            MonitorConfig::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(&config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("vigil").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.interval_ms, 5000);
        assert_eq!(config.net_interval_ms, 3000);
        assert_eq!(config.log_window, 1000);
        assert_eq!(config.history_size, 100);
        assert!(!config.services.is_empty());
    }

    #[test]
    fn test_default_history_size_matches_ring_buffer() {
        let config = MonitorConfig::default();
        assert_eq!(
            config.history_size,
            crate::core::monitor::DEFAULT_HISTORY_SIZE
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"interval_ms": 2000, "cert_name": "example.com"}"#).unwrap();
        assert_eq!(config.interval_ms, 2000);
        assert_eq!(config.cert_name, "example.com");
        assert_eq!(config.log_window, 1000);
        assert_eq!(config.thresholds.cpu_percent, 80.0);
    }
}
