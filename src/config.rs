//! Configuration management for the library portal

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend origin, e.g. `http://localhost:5000`
    pub base_url: String,
    /// Request timeout in milliseconds. Unset means the transport default.
    pub timeout_ms: Option<u64>,
}

/// Navigation targets of the portal
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PagesConfig {
    pub landing: String,
    pub admin_dashboard: String,
    pub student_dashboard: String,
    pub book_inventory: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pages: PagesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // LMS_API__BASE_URL, LMS_PAGES__LANDING, ...
            .add_source(
                Environment::with_prefix("LMS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("LMS_API_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: None,
        }
    }
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            landing: "/index.html".to_string(),
            admin_dashboard: "/admin-dashboard-enhanced.html".to_string(),
            student_dashboard: "/student-dashboard-enhanced.html".to_string(),
            book_inventory: "/admin/book_inventory.html".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
