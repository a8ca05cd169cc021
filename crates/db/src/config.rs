//! Database driver selection and connection settings.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// Backing store implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// Embedded, file-based.
    #[default]
    Sqlite,
    /// Networked relational server.
    Postgres,
}

impl Driver {
    pub fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }

    /// Infer the driver from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(DbError::Config(format!(
                "Unsupported database URL scheme '{other}'. Must be one of: sqlite, postgres"
            ))),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteSettings {
    /// Database file, or `:memory:`.
    pub path: String,
}

impl Default for SqliteSettings {
    fn default() -> Self {
        Self {
            path: "data/avatars.db".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: String::new(),
            database: "avatars".into(),
        }
    }
}

/// Connection settings for the database facade.
///
/// `url`, when set, wins over the per-driver sections and decides the
/// driver by its scheme.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub driver: Driver,
    pub url: Option<String>,
    pub sqlite: SqliteSettings,
    pub postgres: PostgresSettings,
    pub max_connections: u32,
    /// Total connection attempts before giving up (at least one is made).
    pub connect_retries: u32,
    /// Delay before the second attempt; doubles on each further attempt.
    pub retry_delay_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            url: None,
            sqlite: SqliteSettings::default(),
            postgres: PostgresSettings::default(),
            max_connections: 10,
            connect_retries: 5,
            retry_delay_ms: 500,
        }
    }
}

impl DatabaseConfig {
    /// SQLite file at `path`, with a short retry budget. Handy for tests.
    pub fn sqlite_file(path: impl AsRef<Path>) -> Self {
        Self {
            driver: Driver::Sqlite,
            sqlite: SqliteSettings {
                path: path.as_ref().to_string_lossy().into_owned(),
            },
            connect_retries: 1,
            retry_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Resolve the effective driver and connection URL.
    pub fn resolve(&self) -> Result<(Driver, String), DbError> {
        if let Some(url) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            let driver = Driver::from_url(url)?;
            let url = match driver {
                Driver::Sqlite => with_create_mode(url),
                Driver::Postgres => url.to_string(),
            };
            return Ok((driver, url));
        }

        match self.driver {
            Driver::Sqlite => {
                let path = self.sqlite.path.trim();
                if path.is_empty() {
                    return Err(DbError::Config("database.sqlite.path is empty".into()));
                }
                if path == ":memory:" {
                    return Ok((Driver::Sqlite, "sqlite::memory:".into()));
                }
                Ok((Driver::Sqlite, format!("sqlite://{path}?mode=rwc")))
            }
            Driver::Postgres => {
                let pg = &self.postgres;
                if pg.host.trim().is_empty() || pg.database.trim().is_empty() {
                    return Err(DbError::Config(
                        "database.postgres.host and database.postgres.database are required".into(),
                    ));
                }
                let credentials = if pg.password.is_empty() {
                    pg.user.clone()
                } else {
                    format!("{}:{}", pg.user, pg.password)
                };
                Ok((
                    Driver::Postgres,
                    format!(
                        "postgres://{credentials}@{}:{}/{}",
                        pg.host, pg.port, pg.database
                    ),
                ))
            }
        }
    }

    /// Pool size actually used for `url`; in-memory SQLite needs exactly one
    /// connection, otherwise every connection sees its own empty database.
    pub fn pool_size(&self, url: &str) -> u32 {
        if url.contains(":memory:") {
            1
        } else {
            self.max_connections.max(1)
        }
    }
}

/// File path named by a SQLite URL, or `None` for in-memory databases.
///
/// Accepts both `sqlite://path` and `sqlite:path`; query parameters are
/// ignored.
pub fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, query),
        None => (rest, ""),
    };
    let in_memory = path.is_empty()
        || path == ":memory:"
        || query.split('&').any(|kv| kv == "mode=memory");
    (!in_memory).then_some(path)
}

/// Ask SQLite to create a file-backed database unless the URL picks a mode.
fn with_create_mode(url: &str) -> String {
    if sqlite_file_path(url).is_none() || url.contains("mode=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}mode=rwc")
}
