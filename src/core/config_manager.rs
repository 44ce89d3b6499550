// src/core/config_manager.rs
//! Configuration: `config.yaml` sections per environment, then env overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigManager {
    pub service_url: String,
    pub request_timeout_secs: Option<u64>,
    pub address: IpAddr,
    pub port: u16,
    pub max_upload_bytes: u64,
    pub log_file: Option<PathBuf>,
    /// Idle time after which a browser session is dropped
    pub session_ttl_secs: u64,
    /// Environment the configuration was loaded for
    #[serde(skip)]
    pub environment: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: ConfigManager,
    production: ConfigManager,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout_secs: None,
            address: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_file: None,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            environment: "local".to_string(),
        }
    }
}

impl ConfigManager {
    /// Load configuration for the current environment.
    ///
    /// An explicitly given path must exist; the default `config.yaml` is
    /// optional and built-in defaults apply without it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let environment = Self::get_environment();

        let mut config = match path {
            Some(path) => Self::load_from_file(path, &environment)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load_from_file(&default_path, &environment)?
                } else {
                    Self::default()
                }
            }
        };
        config.environment = environment;

        if let Ok(url) = std::env::var("RESUME_SERVICE_URL") {
            config.service_url = url;
        }

        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("RESUME_UPLOAD_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        let mut config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };
        config.environment = environment.to_string();
        Ok(config)
    }

    pub fn with_service_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.service_url = url;
        }
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
