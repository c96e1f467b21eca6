use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Engine configuration, loaded from TOML.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    /// Account the invoked functions belong to; part of every invoke URL.
    pub account_id: String,
    /// Logical CSDS name of the function gateway.
    #[serde(default = "default_gateway_service")]
    pub gateway_service: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Default attempt budget per invocation; overridable per target.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Linear backoff base: attempt N sleeps `N * base_delay_ms`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Name of the secret holding the OAuth2 app key.
    #[serde(default = "default_secret_name")]
    pub secret_name: String,
    /// Logical CSDS name of the auth server.
    #[serde(default = "default_auth_service")]
    pub auth_service: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the CSDS resolution endpoint.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_gateway_service() -> String {
    "functionGateway".into()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    100
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

fn default_secret_name() -> String {
    "oauth_app_key".into()
}

fn default_auth_service() -> String {
    "authServer".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_name: default_secret_name(),
            auth_service: default_auth_service(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.engine.account_id.is_empty() {
            return Err(ConfigError::MissingField {
                field: "engine.account_id",
            }
            .into());
        }
        if self.directory.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "directory.base_url",
            }
            .into());
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                account_id: String::new(),
                gateway_service: default_gateway_service(),
            },
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            auth: AuthConfig::default(),
            directory: DirectoryConfig {
                base_url: String::new(),
            },
            logging: LoggingConfig::default(),
        }
    }
}
