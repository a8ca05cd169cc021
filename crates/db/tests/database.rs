//! Lifecycle tests for the database connection facade.

use assert_matches::assert_matches;
use avatar_db::{Database, DatabaseConfig, DbError, Driver};

#[tokio::test]
async fn connect_creates_sqlite_file_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("avatars.db");

    let db = Database::connect(DatabaseConfig::sqlite_file(&path)).await.unwrap();

    assert_eq!(db.driver(), Driver::Sqlite);
    assert!(path.exists());
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM avatars")
        .fetch_one(&db.pool().await)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn connect_by_url_creates_sqlite_file_and_parent_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("x.db");
    let config = DatabaseConfig {
        url: Some(format!("sqlite://{}", path.display())),
        connect_retries: 1,
        retry_delay_ms: 0,
        ..Default::default()
    };

    let db = Database::connect(config).await.unwrap();

    assert_eq!(db.driver(), Driver::Sqlite);
    assert!(path.exists());
    assert!(db.health_check().await);
}

#[tokio::test]
async fn connect_twice_reapplies_migrations_idempotently() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::sqlite_file(dir.path().join("avatars.db"));

    let first = Database::connect(config.clone()).await.unwrap();
    first.close().await;
    let second = Database::connect(config).await.unwrap();
    assert!(second.health_check().await);
}

#[tokio::test]
async fn health_check_follows_pool_state() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::connect(DatabaseConfig::sqlite_file(dir.path().join("h.db")))
        .await
        .unwrap();

    assert!(db.health_check().await);
    assert!(db.ping().await.is_ok());

    db.close().await;
    assert!(db.is_closed().await);
    assert!(!db.health_check().await);

    db.reconnect().await.unwrap();
    assert!(!db.is_closed().await);
    assert!(db.health_check().await);
}

#[tokio::test]
async fn concurrent_try_reconnect_runs_once() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::connect(DatabaseConfig::sqlite_file(dir.path().join("r.db")))
        .await
        .unwrap();
    db.close().await;

    let (first, second) = tokio::join!(db.try_reconnect(), db.try_reconnect());

    assert!(first.unwrap());
    assert!(!second.unwrap());
    assert!(db.health_check().await);
}

#[tokio::test]
async fn in_memory_sqlite_is_usable() {
    let mut config = DatabaseConfig::sqlite_file(":memory:");
    config.max_connections = 8;
    let db = Database::connect(config).await.unwrap();
    assert!(db.health_check().await);
}

#[tokio::test]
async fn unreachable_postgres_exhausts_retry_budget() {
    let config = DatabaseConfig {
        url: Some("postgres://nobody@127.0.0.1:1/avatars".into()),
        connect_retries: 2,
        retry_delay_ms: 10,
        ..Default::default()
    };

    let result = Database::connect(config).await;

    assert_matches!(
        result,
        Err(DbError::Connect {
            driver: Driver::Postgres,
            attempts: 2,
            ..
        })
    );
}
