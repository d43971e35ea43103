// データベースイントロスペクター
//
// 物理テーブルとカラムの存在確認を行う抽象化レイヤー。
// 各方言固有のINFORMATION_SCHEMA/PRAGMAクエリを実装します。

use crate::adapters::database::classify_error;
use crate::adapters::row_reader::{get_i64, get_opt_string, get_string};
use crate::adapters::sql_quote::quote_identifier;
use crate::core::config::Dialect;
use crate::core::error::DatabaseError;
use crate::core::schema::RawColumnInfo;
use async_trait::async_trait;
use sqlx::AnyPool;

/// データベーススキーマ取得インターフェース
#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    /// テーブルが存在するか
    async fn table_exists(&self, pool: &AnyPool, table_name: &str) -> Result<bool, DatabaseError>;

    /// カラム情報を取得（定義順）
    async fn get_columns(
        &self,
        pool: &AnyPool,
        table_name: &str,
    ) -> Result<Vec<RawColumnInfo>, DatabaseError>;

    /// カラムが存在するか
    async fn column_exists(
        &self,
        pool: &AnyPool,
        table_name: &str,
        column_name: &str,
    ) -> Result<bool, DatabaseError> {
        let columns = self.get_columns(pool, table_name).await?;
        Ok(columns.iter().any(|column| column.name == column_name))
    }
}

/// PostgreSQL用イントロスペクター
pub struct PostgresIntrospector;

/// SQLite用イントロスペクター
pub struct SqliteIntrospector;

/// 方言に応じたイントロスペクターを作成
pub fn create_introspector(dialect: Dialect) -> Box<dyn SchemaIntrospector> {
    match dialect {
        Dialect::PostgreSQL => Box::new(PostgresIntrospector),
        Dialect::SQLite => Box::new(SqliteIntrospector),
    }
}

// =============================================================================
// PostgreSQL イントロスペクター実装
// =============================================================================

#[async_trait]
impl SchemaIntrospector for PostgresIntrospector {
    async fn table_exists(&self, pool: &AnyPool, table_name: &str) -> Result<bool, DatabaseError> {
        let sql = r#"
            SELECT COUNT(*) AS table_count
            FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = $1
        "#;

        let row = sqlx::query(sql)
            .bind(table_name)
            .fetch_one(pool)
            .await
            .map_err(|e| classify_error(e, sql))?;

        Ok(get_i64(&row, "table_count")? > 0)
    }

    async fn get_columns(
        &self,
        pool: &AnyPool,
        table_name: &str,
    ) -> Result<Vec<RawColumnInfo>, DatabaseError> {
        // information_schema のドメイン型はAnyドライバーで扱えないため TEXT にキャストする
        let sql = r#"
            SELECT
                CAST(column_name AS TEXT) AS column_name,
                CAST(data_type AS TEXT) AS data_type,
                CAST(is_nullable AS TEXT) AS is_nullable,
                CAST(column_default AS TEXT) AS column_default
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1
            ORDER BY ordinal_position
        "#;

        let rows = sqlx::query(sql)
            .bind(table_name)
            .fetch_all(pool)
            .await
            .map_err(|e| classify_error(e, sql))?;

        rows.iter()
            .map(|row| {
                Ok(RawColumnInfo {
                    name: get_string(row, "column_name")?,
                    data_type: get_string(row, "data_type")?,
                    is_nullable: get_string(row, "is_nullable")? == "YES",
                    default_value: get_opt_string(row, "column_default")?,
                })
            })
            .collect()
    }
}

// =============================================================================
// SQLite イントロスペクター実装
// =============================================================================

#[async_trait]
impl SchemaIntrospector for SqliteIntrospector {
    async fn table_exists(&self, pool: &AnyPool, table_name: &str) -> Result<bool, DatabaseError> {
        let sql = r#"
            SELECT COUNT(*) AS table_count
            FROM sqlite_master
            WHERE type = 'table' AND name = $1
        "#;

        let row = sqlx::query(sql)
            .bind(table_name)
            .fetch_one(pool)
            .await
            .map_err(|e| classify_error(e, sql))?;

        Ok(get_i64(&row, "table_count")? > 0)
    }

    async fn get_columns(
        &self,
        pool: &AnyPool,
        table_name: &str,
    ) -> Result<Vec<RawColumnInfo>, DatabaseError> {
        let sql = format!("PRAGMA table_info({})", quote_identifier(table_name));

        let rows = sqlx::query(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        rows.iter()
            .map(|row| {
                Ok(RawColumnInfo {
                    name: get_string(row, "name")?,
                    data_type: get_string(row, "type")?,
                    is_nullable: get_i64(row, "notnull")? == 0,
                    default_value: get_opt_string(row, "dflt_value")?,
                })
            })
            .collect()
    }
}
