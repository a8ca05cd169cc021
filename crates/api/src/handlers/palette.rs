//! Built-in colour palettes.

use avatar_core::palette::{Palette, PALETTES};
use axum::Json;

use crate::response::DataResponse;

/// GET /api/palettes
pub async fn list() -> Json<DataResponse<&'static [Palette]>> {
    Json(DataResponse { data: PALETTES })
}
