use avatar_core::types::AvatarId;

use crate::config::Driver;

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The connection retry budget ran out.
    #[error("Could not connect to {driver} database after {attempts} attempt(s): {source}")]
    Connect {
        driver: Driver,
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid database configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    /// A metadata row exists but its payload file does not.
    #[error("Payload missing for avatar {0}")]
    MissingPayload(AvatarId),
}
