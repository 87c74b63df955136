//! Schema reconciliation against temporary SQLite databases

use sea_orm::{ConnectionTrait, EntityTrait};
use tempfile::TempDir;

use codemint::config::DatabaseConfig;
use codemint::storage::{SeaOrmStorage, ensure_schema};
use migration::entities::generation_log;

async fn open(dir: &TempDir) -> SeaOrmStorage {
    let path = dir.path().join("codemint.db");
    let url = format!("sqlite://{}?mode=rwc", path.display());
    SeaOrmStorage::connect(&url, &DatabaseConfig::default())
        .await
        .expect("connect sqlite")
}

#[tokio::test]
async fn test_fresh_database_is_created_and_idempotent() {
    let dir = TempDir::new().unwrap();
    let storage = open(&dir).await;

    let report = ensure_schema(storage.get_db()).await;
    assert!(report.is_clean(), "{:?}", report);
    assert_eq!(report.present, vec!["debug_headers", "success", "error_message"]);
    assert!(report.added.is_empty());

    let again = ensure_schema(storage.get_db()).await;
    assert!(again.is_clean());
    assert_eq!(again.present.len(), 3);
    assert!(again.added.is_empty());
}

#[tokio::test]
async fn test_legacy_table_gets_diagnostic_columns() {
    let dir = TempDir::new().unwrap();
    let storage = open(&dir).await;
    let db = storage.get_db();

    db.execute_unprepared(
        "CREATE TABLE generation_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ip_address VARCHAR(64) NOT NULL,
            code_type VARCHAR(16) NOT NULL,
            barcode_type VARCHAR(32),
            code_value TEXT NOT NULL,
            image_format VARCHAR(16) NOT NULL,
            qr_options TEXT,
            created_at TEXT NOT NULL,
            user_agent TEXT
        )",
    )
    .await
    .unwrap();
    db.execute_unprepared(
        "INSERT INTO generation_logs (ip_address, code_type, barcode_type, code_value, image_format, created_at)
         VALUES ('127.0.0.1', 'barcode', 'code128', 'OLD', 'PNG', '2025-01-01T00:00:00+00:00')",
    )
    .await
    .unwrap();

    let report = ensure_schema(db).await;
    assert!(report.is_clean(), "{:?}", report);

    let rows = generation_log::Entity::find().all(db).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code_value, "OLD");
    assert!(rows[0].success, "legacy rows are back-filled as successful");
    assert!(rows[0].debug_headers.is_none());
    assert!(rows[0].error_message.is_none());
}

#[tokio::test]
async fn test_dropped_column_is_repaired_by_probe_pass() {
    let dir = TempDir::new().unwrap();
    let storage = open(&dir).await;
    let db = storage.get_db();

    assert!(ensure_schema(db).await.is_clean());

    // 迁移已记录为完成，只能由逐列检查补回
    db.execute_unprepared("ALTER TABLE generation_logs DROP COLUMN error_message")
        .await
        .unwrap();

    let report = ensure_schema(db).await;
    assert!(report.is_clean(), "{:?}", report);
    assert_eq!(report.added, vec!["error_message"]);
    assert_eq!(report.present, vec!["debug_headers", "success"]);

    let rows = generation_log::Entity::find().all(db).await.unwrap();
    assert!(rows.is_empty());
}
