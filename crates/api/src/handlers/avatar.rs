//! Handlers for the avatar resource.
//!
//! Generation and image processing are CPU bound and run on the blocking
//! thread pool; handlers only await them.

use std::borrow::Cow;

use avatar_core::error::CoreError;
use avatar_core::filter::FilterType;
use avatar_core::generator::{AvatarParams, GeneratedAvatar};
use avatar_core::imaging::{self, PNG_CONTENT_TYPE};
use avatar_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PICK, MAX_PICK};
use avatar_core::palette::{find_palette, Rgb, PALETTES};
use avatar_core::types::AvatarId;
use avatar_db::models::avatar::Avatar;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::query::{FetchParams, ListParams};
use crate::response::PageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /api/v1/generate`. Every field is optional.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GenerateV1Request {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub foreign_color: Option<String>,
    #[validate(custom(function = "validate_color_scheme"))]
    pub color_scheme: Option<String>,
    #[validate(length(max = 256, message = "must be at most 256 characters"))]
    pub seed: Option<String>,
}

/// Body of `POST /api/v2/generate`: the v1 fields plus a required angle.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GenerateV2Request {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub foreign_color: Option<String>,
    #[validate(custom(function = "validate_color_scheme"))]
    pub color_scheme: Option<String>,
    #[validate(length(max = 256, message = "must be at most 256 characters"))]
    pub seed: Option<String>,
    #[validate(
        required(message = "is required"),
        range(min = 0, max = 360, message = "must be between 0 and 360")
    )]
    pub angle: Option<i32>,
}

fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    Rgb::parse_hex(value).map(|_| ()).map_err(|_| {
        ValidationError::new("hex_color")
            .with_message(Cow::Borrowed("must be a hex colour like #1a2b3c"))
    })
}

fn validate_color_scheme(value: &str) -> Result<(), ValidationError> {
    if find_palette(value).is_some() {
        return Ok(());
    }
    let keys: Vec<&str> = PALETTES.iter().map(|p| p.key).collect();
    Err(ValidationError::new("color_scheme")
        .with_message(Cow::Owned(format!("must be one of: {}", keys.join(", ")))))
}

/// Shared conversion for both request versions.
fn to_params(
    name: Option<String>,
    primary_color: Option<&str>,
    foreign_color: Option<&str>,
    color_scheme: Option<String>,
    seed: Option<String>,
) -> Result<AvatarParams, CoreError> {
    Ok(AvatarParams {
        name,
        primary_color: primary_color.map(Rgb::parse_hex).transpose()?,
        foreign_color: foreign_color.map(Rgb::parse_hex).transpose()?,
        color_scheme,
        seed,
    })
}

impl GenerateV1Request {
    pub fn into_params(self) -> Result<AvatarParams, CoreError> {
        to_params(
            self.name,
            self.primary_color.as_deref(),
            self.foreign_color.as_deref(),
            self.color_scheme,
            self.seed,
        )
    }
}

impl GenerateV2Request {
    /// Split into generator parameters and the rotation angle.
    pub fn into_params(self) -> Result<(AvatarParams, u16), CoreError> {
        let angle = self
            .angle
            .and_then(|a| u16::try_from(a).ok())
            .ok_or_else(|| CoreError::Validation("angle is required".into()))?;
        let params = to_params(
            self.name,
            self.primary_color.as_deref(),
            self.foreign_color.as_deref(),
            self.color_scheme,
            self.seed,
        )?;
        Ok((params, angle))
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// POST /api/v1/generate
pub async fn generate_v1(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<GenerateV1Request>,
) -> AppResult<(StatusCode, Json<Avatar>)> {
    let params = input.into_params()?;
    let generator = state.generator;
    let generated = run_blocking(move || generator.generate_v1(&params)).await?;
    persist(&state, generated).await
}

/// POST /api/v2/generate
pub async fn generate_v2(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<GenerateV2Request>,
) -> AppResult<(StatusCode, Json<Avatar>)> {
    let (params, angle) = input.into_params()?;
    let generator = state.generator;
    let generated = run_blocking(move || generator.generate_v2(&params, angle)).await?;
    persist(&state, generated).await
}

async fn persist(
    state: &AppState,
    generated: GeneratedAvatar,
) -> AppResult<(StatusCode, Json<Avatar>)> {
    let avatar = state.store.save(&generated).await?;
    tracing::debug!(
        avatar_id = %avatar.id,
        size = generated.size,
        bytes = generated.png.len(),
        "Avatar generated"
    );
    Ok((StatusCode::CREATED, Json(avatar)))
}

// ---------------------------------------------------------------------------
// Listing and metadata
// ---------------------------------------------------------------------------

/// GET /api/list?pick=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PageResponse<Avatar>>> {
    let pick = clamp_limit(params.pick()?, DEFAULT_PICK, MAX_PICK);
    let offset = clamp_offset(params.offset()?);
    let (data, total) = state.store.list(pick, offset).await?;
    Ok(Json(PageResponse {
        data,
        total,
        pick,
        offset,
    }))
}

/// GET /api/{id}/metadata
pub async fn get_metadata(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Avatar>> {
    let id = parse_id(&raw_id)?;
    let avatar = state.store.find(id).await?.ok_or(not_found(id))?;
    Ok(Json(avatar))
}

// ---------------------------------------------------------------------------
// Image fetch
// ---------------------------------------------------------------------------

/// GET /api/{id}?filter=&size=
///
/// Query parameters are checked before the lookup, so an unknown filter is
/// a 400 even for an id that does not exist.
pub async fn get_image(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<FetchParams>,
) -> AppResult<Response> {
    let filter = params.filter()?;
    let size = params.size()?;
    if let Some(size) = size {
        imaging::validate_size(size)?;
    }
    let id = parse_id(&raw_id)?;

    let (_, bytes) = state.store.fetch(id).await?.ok_or(not_found(id))?;
    let png = run_blocking(move || imaging::process(&bytes, filter, size)).await?;

    tracing::debug!(
        avatar_id = %id,
        filter = filter.map(FilterType::name),
        size,
        "Serving avatar image"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PNG_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, png.len().to_string())
        .header(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )
        .body(Body::from(png))
        .map_err(|e| AppError::InternalError(format!("Failed to build image response: {e}")))
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// DELETE /api/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    if state.store.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_id(raw: &str) -> AppResult<AvatarId> {
    AvatarId::parse_str(raw)
        .map_err(|_| AppError::BadRequest(format!("Invalid avatar id '{raw}': expected a UUID")))
}

fn not_found(id: AvatarId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Avatar",
        id,
    })
}

/// Run CPU-bound work on the blocking pool.
async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalError(format!("Blocking task failed: {e}")))?
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn v1_request_accepts_empty_object() {
        assert!(GenerateV1Request::default().validate().is_ok());
    }

    #[test]
    fn v1_request_rejects_bad_colour_and_scheme() {
        let req = GenerateV1Request {
            primary_color: Some("red".into()),
            color_scheme: Some("plaid".into()),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("primary_color"));
        assert!(fields.contains_key("color_scheme"));
        assert!(!fields.contains_key("foreign_color"));
    }

    #[test]
    fn v2_request_requires_angle_in_range() {
        let missing = GenerateV2Request::default();
        assert!(missing.validate().unwrap_err().field_errors().contains_key("angle"));

        let too_big = GenerateV2Request {
            angle: Some(361),
            ..Default::default()
        };
        assert!(too_big.validate().is_err());

        let edge = GenerateV2Request {
            angle: Some(360),
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn v2_into_params_parses_colours() {
        let req = GenerateV2Request {
            primary_color: Some("#0a0B0c".into()),
            angle: Some(90),
            ..Default::default()
        };
        let (params, angle) = req.into_params().unwrap();
        assert_eq!(angle, 90);
        assert_eq!(params.primary_color, Some(Rgb::new(0x0a, 0x0b, 0x0c)));
        assert_eq!(params.foreign_color, None);
    }

    #[test]
    fn malformed_id_is_bad_request() {
        assert_matches!(parse_id("not-a-uuid"), Err(AppError::BadRequest(_)));
        assert!(parse_id(&AvatarId::new_v4().to_string()).is_ok());
    }
}
