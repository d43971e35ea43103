// メタデータスキーマ
//
// オブジェクトとフィールドのメタデータテーブルを冪等に作成します。
// UUIDとタイムスタンプはテキスト、真偽値は 0/1 の整数で保存し、
// Anyドライバーでデコード可能な型だけを使用します。

use crate::adapters::database::classify_error;
use crate::core::config::Dialect;
use crate::core::error::DatabaseError;
use crate::core::naming::{FIELDS_TABLE, OBJECTS_TABLE};
use sqlx::AnyPool;
use tracing::{debug, info};

/// メタデータスキーマ
#[derive(Debug, Clone, Default)]
pub struct MetadataSchema;

impl MetadataSchema {
    /// 新しいMetadataSchemaを作成
    pub fn new() -> Self {
        Self
    }

    /// メタデータテーブル作成SQLを生成
    ///
    /// # Arguments
    ///
    /// * `dialect` - データベース方言
    ///
    /// # Returns
    ///
    /// 順に実行するCREATE TABLE / CREATE INDEX文
    pub fn generate_install_sql(&self, dialect: Dialect) -> Vec<String> {
        let (key_columns, text, big_int, real) = match dialect {
            Dialect::PostgreSQL => (
                ("VARCHAR(36) PRIMARY KEY", "BIGSERIAL UNIQUE NOT NULL"),
                "VARCHAR(255)",
                "BIGINT",
                "DOUBLE PRECISION",
            ),
            Dialect::SQLite => (
                ("TEXT NOT NULL UNIQUE", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                "TEXT",
                "INTEGER",
                "REAL",
            ),
        };
        let (uuid_column, id_column) = key_columns;

        vec![
            format!(
                r#"CREATE TABLE IF NOT EXISTS {objects} (
    object_uuid {uuid_column},
    object_id {id_column},
    name {text} NOT NULL,
    description TEXT,
    database_object {text} NOT NULL,
    is_deleted INTEGER NOT NULL DEFAULT 0,
    created_at {text} NOT NULL,
    created_by {text} NOT NULL,
    last_updated_at {text} NOT NULL,
    last_updated_by {text} NOT NULL
)"#,
                objects = OBJECTS_TABLE,
            ),
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_{objects}_name_lower ON {objects} (LOWER(name))",
                objects = OBJECTS_TABLE,
            ),
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_{objects}_database_object ON {objects} (database_object)",
                objects = OBJECTS_TABLE,
            ),
            format!(
                r#"CREATE TABLE IF NOT EXISTS {fields} (
    field_uuid {uuid_column},
    field_id {id_column},
    object_uuid {text} NOT NULL REFERENCES {objects} (object_uuid),
    name {text} NOT NULL,
    label {text} NOT NULL,
    description TEXT,
    field_type {text} NOT NULL,
    field_order {big_int} NOT NULL,
    created_by {text} NOT NULL,
    created_at {text} NOT NULL,
    last_updated_by {text} NOT NULL,
    last_updated_at {text} NOT NULL,
    max_length {big_int},
    default_value TEXT,
    markdown INTEGER NOT NULL DEFAULT 0,
    min_value {real},
    max_value {real},
    allow_decimal INTEGER NOT NULL DEFAULT 0,
    decimal_places {big_int}
)"#,
                fields = FIELDS_TABLE,
                objects = OBJECTS_TABLE,
            ),
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_{fields}_object_name_lower ON {fields} (object_uuid, LOWER(name))",
                fields = FIELDS_TABLE,
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{fields}_order ON {fields} (object_uuid, field_order, field_id)",
                fields = FIELDS_TABLE,
            ),
        ]
    }

    /// メタデータテーブルを作成
    ///
    /// 既に存在する場合は何もしません。
    pub async fn install(&self, pool: &AnyPool, dialect: Dialect) -> Result<(), DatabaseError> {
        for sql in self.generate_install_sql(dialect) {
            debug!(%sql, "installing metadata schema");
            sqlx::query(&sql)
                .execute(pool)
                .await
                .map_err(|e| classify_error(e, &sql))?;
        }

        info!(%dialect, "metadata schema installed");
        Ok(())
    }
}
