use std::sync::Arc;
use std::time::Instant;

use avatar_core::generator::AvatarGenerator;
use avatar_core::types::Timestamp;
use avatar_db::AvatarStore;

use crate::config::AppConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Avatar metadata and payload storage.
    pub store: AvatarStore,
    /// Renders new avatars at the configured size.
    pub generator: AvatarGenerator,
    /// Full application configuration.
    pub config: Arc<AppConfig>,
    /// Monotonic process start, for uptime.
    pub started_at: Instant,
    /// Wall-clock process start, reported by detailed health.
    pub started_at_utc: Timestamp,
}

impl AppState {
    pub fn new(store: AvatarStore, generator: AvatarGenerator, config: AppConfig) -> Self {
        Self {
            store,
            generator,
            config: Arc::new(config),
            started_at: Instant::now(),
            started_at_utc: chrono::Utc::now(),
        }
    }
}
