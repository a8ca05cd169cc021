//! Avatar storage service: metadata rows and PNG payloads kept in step.

use std::sync::Arc;

use avatar_core::generator::GeneratedAvatar;
use avatar_core::types::AvatarId;

use crate::database::Database;
use crate::error::DbError;
use crate::file_store::FileStore;
use crate::models::avatar::{Avatar, CreateAvatar};
use crate::repositories::AvatarRepo;

/// Cheaply cloneable handle over the database facade and the file store.
#[derive(Clone)]
pub struct AvatarStore {
    db: Arc<Database>,
    files: FileStore,
}

impl AvatarStore {
    pub fn new(db: Arc<Database>, files: FileStore) -> Self {
        Self { db, files }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    /// Persist a generated avatar under a new id.
    ///
    /// The payload is written first; if the row insert fails the file is
    /// removed again.
    pub async fn save(&self, generated: &GeneratedAvatar) -> Result<Avatar, DbError> {
        let id = AvatarId::new_v4();
        let storage_path = payload_path(id);
        self.files.write(&storage_path, &generated.png).await?;

        let input = CreateAvatar::from_generated(id, storage_path.clone(), generated);
        let pool = self.db.pool().await;
        match AvatarRepo::create(&pool, &input).await {
            Ok(avatar) => {
                tracing::info!(avatar_id = %avatar.id, version = %avatar.version, "Avatar stored");
                Ok(avatar)
            }
            Err(err) => {
                if let Err(cleanup) = self.files.remove(&storage_path).await {
                    tracing::warn!(avatar_id = %id, error = %cleanup, "Failed to remove orphaned payload");
                }
                Err(err.into())
            }
        }
    }

    pub async fn find(&self, id: AvatarId) -> Result<Option<Avatar>, DbError> {
        let pool = self.db.pool().await;
        Ok(AvatarRepo::find_by_id(&pool, id).await?)
    }

    /// Metadata plus payload bytes. `Ok(None)` when the avatar does not exist.
    pub async fn fetch(&self, id: AvatarId) -> Result<Option<(Avatar, Vec<u8>)>, DbError> {
        let Some(avatar) = self.find(id).await? else {
            return Ok(None);
        };
        let bytes = self
            .files
            .read(&avatar.storage_path)
            .await?
            .ok_or(DbError::MissingPayload(id))?;
        Ok(Some((avatar, bytes)))
    }

    /// One page of avatars (newest first) and the overall total.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Avatar>, i64), DbError> {
        let pool = self.db.pool().await;
        let items = AvatarRepo::list(&pool, limit, offset).await?;
        let total = AvatarRepo::count(&pool).await?;
        Ok((items, total))
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let pool = self.db.pool().await;
        Ok(AvatarRepo::count(&pool).await?)
    }

    /// Delete the row, then the payload. Returns `false` if no such avatar.
    ///
    /// A payload that is already gone is logged and otherwise ignored.
    pub async fn delete(&self, id: AvatarId) -> Result<bool, DbError> {
        let Some(avatar) = self.find(id).await? else {
            return Ok(false);
        };

        let pool = self.db.pool().await;
        if !AvatarRepo::delete(&pool, id).await? {
            return Ok(false);
        }

        match self.files.remove(&avatar.storage_path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(avatar_id = %id, path = %avatar.storage_path, "Payload already missing");
            }
            Err(err) => {
                tracing::warn!(avatar_id = %id, error = %err, "Failed to remove payload");
            }
        }
        tracing::info!(avatar_id = %id, "Avatar deleted");
        Ok(true)
    }
}

/// Payload location for an avatar id.
fn payload_path(id: AvatarId) -> String {
    format!("{id}.png")
}
