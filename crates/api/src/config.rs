use ::config::{Config, Environment, File, FileFormat};
use avatar_core::generator::DEFAULT_SIZE;
use avatar_db::DatabaseConfig;
use axum::http::HeaderValue;
use serde::Deserialize;

/// Config file read when `AVATAR_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

/// Top-level application configuration.
///
/// Layered, later sources winning:
///
/// | Source                       | Example                                  |
/// |------------------------------|------------------------------------------|
/// | Built-in defaults            |                                          |
/// | YAML file                    | `config/default.yaml` or `$AVATAR_CONFIG` |
/// | `AVATAR__`-prefixed env vars | `AVATAR__DATABASE__DRIVER=postgres`      |
/// | `DATABASE_URL`               | `postgres://user@db:5432/avatars`        |
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub avatar: AvatarConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Built frontend bundle served for non-API paths, if any.
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 30,
            static_dir: None,
        }
    }
}

/// Where avatar payloads live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/avatars".into(),
        }
    }
}

/// Generator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Edge length of generated avatars in pixels.
    pub size: u32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "avatar_api=debug,avatar_db=debug,tower_http=debug".into(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load from `$AVATAR_CONFIG` (or [`DEFAULT_CONFIG_PATH`]) plus environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("AVATAR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load_from(&path)
    }

    /// Load from a specific YAML file plus environment. A missing file is
    /// not an error; defaults and environment still apply.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig = Config::builder()
            .add_source(File::new(path, FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix("AVATAR")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            )
            .build()?
            .try_deserialize()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = Some(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document on its own, without touching the environment.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for origin in &self.server.cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                field: "server.cors_origins",
                message: format!("'{origin}': {e}"),
            })?;
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "server.request_timeout_secs",
                message: "must be greater than 0".into(),
            });
        }
        if self.storage.path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage.path",
                message: "must not be empty".into(),
            });
        }
        avatar_core::imaging::validate_size(self.avatar.size).map_err(|e| {
            ConfigError::Invalid {
                field: "avatar.size",
                message: e.to_string(),
            }
        })?;
        self.database.resolve().map_err(|e| ConfigError::Invalid {
            field: "database",
            message: e.to_string(),
        })?;
        Ok(())
    }
}
