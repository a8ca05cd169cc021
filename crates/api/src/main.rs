use std::net::SocketAddr;
use std::sync::Arc;

use avatar_api::config::AppConfig;
use avatar_api::router::build_app_router;
use avatar_api::state::AppState;
use avatar_core::generator::AvatarGenerator;
use avatar_db::{AvatarStore, Database, FileStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");
    avatar_api::logging::init(&config.logging);

    // --- Persistence ---
    let db = Database::connect(config.database.clone())
        .await
        .expect("Failed to connect to database");
    let db = Arc::new(db);

    let files = FileStore::new(&config.storage.path);
    files
        .init()
        .await
        .expect("Failed to initialise avatar storage directory");
    tracing::info!(path = %config.storage.path, "Avatar storage ready");

    let generator =
        AvatarGenerator::new(config.avatar.size).expect("Invalid avatar size in configuration");

    // --- HTTP ---
    let addr = SocketAddr::new(
        config.server.host.parse().expect("Invalid server.host"),
        config.server.port,
    );
    let state = AppState::new(AvatarStore::new(Arc::clone(&db), files), generator, config);
    let app = build_app_router(state);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    db.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
