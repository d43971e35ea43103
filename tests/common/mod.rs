// 統合テスト共通ユーティリティ
//
// 一時ディレクトリ上のSQLiteデータベースに接続し、メタデータテーブルを作成したエンジンを返します。

#![allow(dead_code)]

use sphere::adapters::database::DatabaseConnectionService;
use sphere::adapters::database_introspector::{create_introspector, SchemaIntrospector};
use sphere::core::config::{DatabaseConfig, Dialect, FieldLimits};
use sphere::core::field::FieldSpec;
use sphere::core::object::{NewObject, ObjectRecord};
use sphere::services::engine::SchemaEngine;
use sphere::services::field_service::{AddFieldOutcome, AddedField};
use sphere::services::object_directory::CreateObjectOutcome;
use tempfile::TempDir;

/// SQLiteファイルの接続設定
pub fn sqlite_config(temp_dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        host: String::new(),
        port: None,
        database: temp_dir
            .path()
            .join("sphere_test.db")
            .to_string_lossy()
            .into_owned(),
        user: None,
        password: None,
        timeout: Some(5),
    }
}

/// メタデータテーブル作成済みのSQLiteエンジンを作成
pub async fn sqlite_engine() -> (TempDir, SchemaEngine) {
    sqlx::any::install_default_drivers();

    let temp_dir = TempDir::new().unwrap();
    let pool = DatabaseConnectionService::new()
        .create_pool(Dialect::SQLite, &sqlite_config(&temp_dir))
        .await
        .unwrap();

    let engine = SchemaEngine::from_pool(pool, Dialect::SQLite, FieldLimits::default());
    engine.install().await.unwrap();

    (temp_dir, engine)
}

/// オブジェクトを作成（既存の場合はテスト失敗）
pub async fn create_object(engine: &SchemaEngine, name: &str) -> ObjectRecord {
    match engine
        .objects()
        .create_object(&NewObject::new(name, None))
        .await
        .unwrap()
    {
        CreateObjectOutcome::Created(object) => object,
        other => panic!("expected a new object, got {:?}", other),
    }
}

/// フィールドを追加（既存の場合はテスト失敗）
pub async fn add_field(
    engine: &SchemaEngine,
    object: &ObjectRecord,
    spec: FieldSpec,
) -> AddedField {
    match engine.fields().add_field(object, &spec).await.unwrap() {
        AddFieldOutcome::Created(added) => added,
        other => panic!("expected a new field, got {:?}", other),
    }
}

/// 物理テーブルのカラム名一覧
pub async fn column_names(engine: &SchemaEngine, table: &str) -> Vec<String> {
    create_introspector(engine.dialect())
        .get_columns(engine.pool(), table)
        .await
        .unwrap()
        .into_iter()
        .map(|column| column.name)
        .collect()
}

/// 物理カラムの型（カタログ上の表記）
pub async fn column_type(engine: &SchemaEngine, table: &str, column: &str) -> Option<String> {
    create_introspector(engine.dialect())
        .get_columns(engine.pool(), table)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == column)
        .map(|c| c.data_type)
}

/// 生のSQLを実行（ドリフトの再現用）
pub async fn execute(engine: &SchemaEngine, sql: &str) {
    sqlx::query(sql).execute(engine.pool()).await.unwrap();
}
