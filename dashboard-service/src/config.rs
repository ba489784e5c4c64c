use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "aq-dashboard.sqlite3".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAqConfig {
    pub base_url: String,
    pub parameter: String,
}

impl Default for OpenAqConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openaq.org/v1".to_string(),
            parameter: "pm25".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub openaq: OpenAqConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load configuration from the TOML file named by `AQ_DASHBOARD_CONFIG`
    /// (default `dashboard-config.toml`). A missing file is not an error:
    /// every setting has a default, so the service runs unconfigured.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("AQ_DASHBOARD_CONFIG").unwrap_or_else(|_| "dashboard-config.toml".to_string());
        if !Path::new(&path).exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&contents)?;
        Ok(cfg)
    }
}
