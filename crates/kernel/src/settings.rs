use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSTORE_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSTORE_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSTORE";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub paging: PagingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Default to repo root `config` directory.
                std::env::current_dir()
                    .map(|cwd| cwd.join("config"))
                    .unwrap_or_else(|_| PathBuf::from("config"))
            });

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit directory and environment name.
    pub fn load_from(config_dir: &std::path::Path, environment: &str) -> anyhow::Result<Self> {
        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = match environment {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        settings.paging.validate()?;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Record store settings.
///
/// The store is in-process; `seed_authors` are inserted in order at startup so
/// they receive ids `1..=n`. Authors have no write endpoint, so a catalog without
/// seeds cannot accept books.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub seed_authors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagingSettings {
    #[serde(default = "PagingSettings::default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "PagingSettings::default_max_page_size")]
    pub max_page_size: u32,
}

impl PagingSettings {
    fn default_page_size() -> u32 {
        20
    }

    fn default_max_page_size() -> u32 {
        2000
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_page_size == 0 {
            return Err(anyhow!("paging.default_page_size must be positive"));
        }
        if self.max_page_size < self.default_page_size {
            return Err(anyhow!(
                "paging.max_page_size ({}) is smaller than paging.default_page_size ({})",
                self.max_page_size,
                self.default_page_size
            ));
        }
        Ok(())
    }
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            default_page_size: Self::default_page_size(),
            max_page_size: Self::default_max_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "CacheSettings::default_enabled")]
    pub enabled: bool,
}

impl CacheSettings {
    fn default_enabled() -> bool {
        true
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_level: Self::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A single HTTP Basic principal.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BasicUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "AuthSettings::default_enabled")]
    pub enabled: bool,
    #[serde(default = "AuthSettings::default_realm")]
    pub realm: String,
    #[serde(default)]
    pub users: Vec<BasicUser>,
    #[serde(default = "AuthSettings::default_public_paths")]
    pub public_paths: Vec<String>,
}

impl AuthSettings {
    fn default_enabled() -> bool {
        true
    }

    fn default_realm() -> String {
        "bookstore".to_string()
    }

    fn default_public_paths() -> Vec<String> {
        ["/", "/healthz", "/swagger-ui", "/api-docs", "/docs"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            realm: Self::default_realm(),
            users: Vec::new(),
            public_paths: Self::default_public_paths(),
        }
    }
}
