//! Connection facade over the configured driver.
//!
//! Owns the pool and gives callers a uniform lifecycle regardless of the
//! backing store: connect (with a bounded retry budget), health check,
//! reconnect on demand, and close.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use sqlx::any::AnyPoolOptions;
use tokio::sync::{Mutex, RwLock};

use crate::config::{sqlite_file_path, DatabaseConfig, Driver};
use crate::error::DbError;
use crate::DbPool;

/// Upper bound for the delay between connection attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// How long a request waits for a free pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Database {
    config: DatabaseConfig,
    driver: Driver,
    url: String,
    pool: RwLock<DbPool>,
    /// Held while a replacement pool is being opened.
    reconnecting: Mutex<()>,
}

impl fmt::Debug for Database {
    // The URL may carry credentials, so only the driver is shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open the configured database and bring its schema up to date.
    ///
    /// Fails once `connect_retries` attempts have been used up.
    pub async fn connect(config: DatabaseConfig) -> Result<Self, DbError> {
        sqlx::any::install_default_drivers();

        let (driver, url) = config.resolve()?;
        if driver == Driver::Sqlite {
            if let Some(path) = sqlite_file_path(&url) {
                prepare_sqlite_dir(path).await?;
            }
        }

        let pool = open_with_retry(&config, driver, &url).await?;
        crate::run_migrations(&pool).await?;
        tracing::info!(%driver, "Database ready");

        Ok(Self {
            config,
            driver,
            url,
            pool: RwLock::new(pool),
            reconnecting: Mutex::new(()),
        })
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// Current pool. Cheap: pools are reference counted.
    pub async fn pool(&self) -> DbPool {
        self.pool.read().await.clone()
    }

    /// `true` when a trivial query succeeds. Never errors.
    pub async fn health_check(&self) -> bool {
        self.ping().await.is_ok()
    }

    /// Round-trip a trivial query and report its latency.
    pub async fn ping(&self) -> Result<Duration, DbError> {
        let pool = self.pool().await;
        let started = Instant::now();
        crate::health_check(&pool).await?;
        Ok(started.elapsed())
    }

    /// Replace the pool with a freshly connected one.
    ///
    /// The old pool keeps serving until the new one is up; on failure it is
    /// left in place.
    pub async fn reconnect(&self) -> Result<(), DbError> {
        let _guard = self.reconnecting.lock().await;
        self.reopen().await
    }

    /// Like [`reconnect`](Self::reconnect), but returns `Ok(false)` straight
    /// away when another reconnect is already running.
    pub async fn try_reconnect(&self) -> Result<bool, DbError> {
        let Ok(_guard) = self.reconnecting.try_lock() else {
            tracing::debug!(driver = %self.driver, "Reconnect already in progress");
            return Ok(false);
        };
        self.reopen().await?;
        Ok(true)
    }

    async fn reopen(&self) -> Result<(), DbError> {
        tracing::warn!(driver = %self.driver, "Reconnecting to database");
        let fresh = open_with_retry(&self.config, self.driver, &self.url).await?;
        crate::run_migrations(&fresh).await?;
        let stale = std::mem::replace(&mut *self.pool.write().await, fresh);
        stale.close().await;
        tracing::info!(driver = %self.driver, "Database reconnected");
        Ok(())
    }

    /// Close every pooled connection. Later queries fail until `reconnect`.
    pub async fn close(&self) {
        self.pool.read().await.close().await;
        tracing::info!(driver = %self.driver, "Database pool closed");
    }

    pub async fn is_closed(&self) -> bool {
        self.pool.read().await.is_closed()
    }
}

async fn open_with_retry(
    config: &DatabaseConfig,
    driver: Driver,
    url: &str,
) -> Result<DbPool, DbError> {
    let attempts = config.connect_retries.max(1);
    let mut delay = Duration::from_millis(config.retry_delay_ms);
    let mut attempt = 1;

    loop {
        let result = AnyPoolOptions::new()
            .max_connections(config.pool_size(url))
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await;

        match result {
            Ok(pool) => {
                tracing::debug!(%driver, attempt, "Database connection established");
                return Ok(pool);
            }
            Err(source) if attempt >= attempts => {
                tracing::error!(%driver, attempts, error = %source, "Database unreachable");
                return Err(DbError::Connect {
                    driver,
                    attempts,
                    source,
                });
            }
            Err(err) => {
                tracing::warn!(
                    %driver,
                    attempt,
                    max_attempts = attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %err,
                    "Database connection attempt failed"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Make sure the directory holding a SQLite file exists.
async fn prepare_sqlite_dir(path: &str) -> Result<(), DbError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}
