//! Repository for the `avatars` table.

use avatar_core::types::AvatarId;

use crate::models::avatar::{Avatar, AvatarRow, CreateAvatar};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, version, storage_path, primary_color, \
    foreign_color, color_scheme, seed, angle";

/// Provides CRUD operations for avatars.
pub struct AvatarRepo;

impl AvatarRepo {
    /// Insert a new avatar, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateAvatar) -> Result<Avatar, sqlx::Error> {
        let query = format!(
            "INSERT INTO avatars ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AvatarRow>(&query)
            .bind(input.id.to_string())
            .bind(&input.name)
            .bind(input.created_at.timestamp_millis())
            .bind(&input.version)
            .bind(&input.storage_path)
            .bind(&input.primary_color)
            .bind(&input.foreign_color)
            .bind(&input.color_scheme)
            .bind(&input.seed)
            .bind(input.angle.map(i64::from))
            .fetch_one(pool)
            .await?;
        Avatar::try_from(row)
    }

    /// Find an avatar by its id.
    pub async fn find_by_id(pool: &DbPool, id: AvatarId) -> Result<Option<Avatar>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM avatars WHERE id = $1");
        sqlx::query_as::<_, AvatarRow>(&query)
            .bind(id.to_string())
            .fetch_optional(pool)
            .await?
            .map(Avatar::try_from)
            .transpose()
    }

    /// List avatars newest first. Ties on `created_at` fall back to id order
    /// so pages stay stable.
    pub async fn list(pool: &DbPool, limit: i64, offset: i64) -> Result<Vec<Avatar>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM avatars
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AvatarRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(Avatar::try_from)
            .collect()
    }

    /// Total number of stored avatars.
    pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM avatars")
            .fetch_one(pool)
            .await
    }

    /// Permanently delete an avatar by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &DbPool, id: AvatarId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM avatars WHERE id = $1")
            .bind(id.to_string())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
