pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /v1/generate              POST   v1 generation
/// /v2/generate              POST   v2 generation (rotated)
/// /list                     GET    paged listing (?pick=&offset=)
/// /palettes                 GET    built-in colour palettes
/// /{id}                     GET    PNG payload (?filter=&size=), DELETE
/// /{id}/metadata            GET    avatar record
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/generate", post(handlers::avatar::generate_v1))
        .route("/v2/generate", post(handlers::avatar::generate_v2))
        .route("/list", get(handlers::avatar::list))
        .route("/palettes", get(handlers::palette::list))
        .route(
            "/{id}",
            get(handlers::avatar::get_image).delete(handlers::avatar::delete),
        )
        .route("/{id}/metadata", get(handlers::avatar::get_metadata))
}
