//! Avatar entity model and DTOs.

use avatar_core::generator::GeneratedAvatar;
use avatar_core::types::{AvatarId, Timestamp};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A stored avatar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Avatar {
    pub id: AvatarId,
    pub name: String,
    pub created_at: Timestamp,
    /// Semantic version tag of the generator that produced the image.
    pub version: String,
    /// Payload location, relative to the file store root.
    pub storage_path: String,
    pub primary_color: Option<String>,
    pub foreign_color: Option<String>,
    pub color_scheme: Option<String>,
    pub seed: Option<String>,
    /// Rotation in degrees; only set by the v2 generator.
    pub angle: Option<u16>,
}

/// A raw row from the `avatars` table.
///
/// Columns use portable types (text ids, millisecond timestamps) so the
/// same row decodes from either driver.
#[derive(Debug, FromRow)]
pub(crate) struct AvatarRow {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub version: String,
    pub storage_path: String,
    pub primary_color: Option<String>,
    pub foreign_color: Option<String>,
    pub color_scheme: Option<String>,
    pub seed: Option<String>,
    pub angle: Option<i64>,
}

impl TryFrom<AvatarRow> for Avatar {
    type Error = sqlx::Error;

    fn try_from(row: AvatarRow) -> Result<Self, Self::Error> {
        let id = AvatarId::parse_str(&row.id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(row.created_at).ok_or_else(|| {
            sqlx::Error::Decode(format!("created_at out of range: {}", row.created_at).into())
        })?;
        let angle = row
            .angle
            .map(u16::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self {
            id,
            name: row.name,
            created_at,
            version: row.version,
            storage_path: row.storage_path,
            primary_color: row.primary_color,
            foreign_color: row.foreign_color,
            color_scheme: row.color_scheme,
            seed: row.seed,
            angle,
        })
    }
}

/// DTO for inserting a new avatar row.
#[derive(Debug, Clone)]
pub struct CreateAvatar {
    pub id: AvatarId,
    pub name: String,
    pub created_at: Timestamp,
    pub version: String,
    pub storage_path: String,
    pub primary_color: Option<String>,
    pub foreign_color: Option<String>,
    pub color_scheme: Option<String>,
    pub seed: Option<String>,
    pub angle: Option<u16>,
}

impl CreateAvatar {
    /// Metadata for a freshly generated avatar stored at `storage_path`.
    pub fn from_generated(id: AvatarId, storage_path: String, generated: &GeneratedAvatar) -> Self {
        Self {
            id,
            name: generated.name.clone(),
            created_at: Utc::now(),
            version: generated.version.tag().to_string(),
            storage_path,
            primary_color: Some(generated.primary_color.to_hex()),
            foreign_color: Some(generated.foreign_color.to_hex()),
            color_scheme: generated.color_scheme.clone(),
            seed: Some(generated.seed.clone()),
            angle: generated.angle,
        }
    }
}
