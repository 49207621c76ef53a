use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout; `None` leaves it to the transport defaults
    pub timeout_secs: Option<u64>,
    pub log_requests: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding `session.json`; `None` keeps the session in memory only
    pub dir: Option<PathBuf>,
    pub max_age_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub page_size: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_SESSION_DAYS: i64 = 7;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PEARMONIE_API_URL") {
            let v = v.trim().trim_end_matches('/').to_string();
            if !v.is_empty() {
                self.api.base_url = v;
            }
        }
        if let Ok(v) = env::var("PEARMONIE_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().ok();
        }
        if let Ok(v) = env::var("PEARMONIE_API_LOG_REQUESTS") {
            self.api.log_requests = v.parse().unwrap_or(self.api.log_requests);
        }

        self.session.dir = default_config_dir();
        if let Ok(v) = env::var("PEARMONIE_SESSION_DAYS") {
            self.session.max_age_days = v.parse().unwrap_or(self.session.max_age_days);
        }

        if let Ok(v) = env::var("PEARMONIE_PAGE_SIZE") {
            // A zero page size would make every page empty
            self.catalog.page_size = v.parse().ok().filter(|n| *n > 0).unwrap_or(self.catalog.page_size);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_secs: None,
                log_requests: true,
            },
            session: SessionConfig {
                dir: None,
                max_age_days: DEFAULT_SESSION_DAYS,
            },
            catalog: CatalogConfig {
                page_size: DEFAULT_PAGE_SIZE,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging-api.pearmonie.com".to_string(),
                timeout_secs: None,
                log_requests: true,
            },
            session: SessionConfig {
                dir: None,
                max_age_days: DEFAULT_SESSION_DAYS,
            },
            catalog: CatalogConfig {
                page_size: DEFAULT_PAGE_SIZE,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.pearmonie.com".to_string(),
                timeout_secs: None,
                log_requests: false,
            },
            session: SessionConfig {
                dir: None,
                max_age_days: DEFAULT_SESSION_DAYS,
            },
            catalog: CatalogConfig {
                page_size: DEFAULT_PAGE_SIZE,
            },
        }
    }

    /// Configuration for tests and embedding: given base URL, in-memory session
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.api.base_url = base_url.into();
        config
    }
}

/// `$PEARMONIE_CONFIG_DIR`, else `$HOME/.config/pearmonie`
fn default_config_dir() -> Option<PathBuf> {
    if let Ok(custom_dir) = env::var("PEARMONIE_CONFIG_DIR") {
        return Some(PathBuf::from(custom_dir));
    }
    env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("pearmonie"))
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
