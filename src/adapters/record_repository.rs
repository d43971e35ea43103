// レコードリポジトリ
//
// オブジェクトの物理テーブルに対する汎用的な行操作を提供します。
// カラムは実行時にカタログから取得し、値はすべてバインドパラメーターで渡します。

use crate::adapters::database::classify_error;
use crate::adapters::database_introspector::{create_introspector, SchemaIntrospector};
use crate::adapters::row_reader::get_opt_string;
use crate::adapters::sql_quote::{quote_columns, quote_identifier};
use crate::core::config::Dialect;
use crate::core::error::DatabaseError;
use crate::core::naming::{RECORD_ID_COLUMN, RECORD_UUID_COLUMN};
use crate::core::schema::RawColumnInfo;
use serde_json::{Map, Value};
use sqlx::AnyPool;

/// 取得したレコード（カラム名 -> テキスト値）
pub type RecordRow = Map<String, Value>;

/// レコードリポジトリ
pub struct RecordRepository {
    dialect: Dialect,
    introspector: Box<dyn SchemaIntrospector>,
}

impl std::fmt::Debug for RecordRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordRepository")
            .field("dialect", &self.dialect)
            .finish()
    }
}

impl RecordRepository {
    /// 新しいRecordRepositoryを作成
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            introspector: create_introspector(dialect),
        }
    }

    /// 物理テーブルの現在のカラムを取得
    pub async fn columns(
        &self,
        pool: &AnyPool,
        table_name: &str,
    ) -> Result<Vec<RawColumnInfo>, DatabaseError> {
        self.introspector.get_columns(pool, table_name).await
    }

    /// テーブルが存在するか
    pub async fn table_exists(&self, pool: &AnyPool, table_name: &str) -> Result<bool, DatabaseError> {
        self.introspector.table_exists(pool, table_name).await
    }

    /// SELECT文を生成
    ///
    /// Anyドライバーで型に依存せず取得できるよう、全カラムをテキストにキャストします。
    pub fn generate_select_sql(&self, table_name: &str, columns: &[RawColumnInfo]) -> String {
        let projection = columns
            .iter()
            .map(|column| {
                let quoted = quote_identifier(&column.name);
                format!("CAST({} AS TEXT) AS {}", quoted, quoted)
            })
            .collect::<Vec<_>>()
            .join(", ");

        // 出力カラムの別名（テキスト）ではなく元のカラムで並べるためテーブル名で修飾する
        let quoted_table = quote_identifier(table_name);
        format!(
            "SELECT {} FROM {} ORDER BY {}.{}",
            projection,
            quoted_table,
            quoted_table,
            quote_identifier(RECORD_ID_COLUMN)
        )
    }

    /// INSERT文を生成
    ///
    /// PostgreSQLではテキストで渡した値をカラム型へ明示的にキャストします。
    pub fn generate_insert_sql(&self, table_name: &str, columns: &[&RawColumnInfo]) -> String {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let placeholders = columns
            .iter()
            .enumerate()
            .map(|(i, column)| match self.dialect {
                Dialect::PostgreSQL => format!("CAST(${} AS {})", i + 1, column.data_type),
                Dialect::SQLite => format!("${}", i + 1),
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(table_name),
            quote_columns(&names),
            placeholders
        )
    }

    /// レコード一覧を取得（record_id 順）
    pub async fn list(
        &self,
        pool: &AnyPool,
        table_name: &str,
    ) -> Result<Vec<RecordRow>, DatabaseError> {
        let columns = self.columns(pool, table_name).await?;
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let sql = self.generate_select_sql(table_name, &columns);
        let rows = sqlx::query(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        rows.iter()
            .map(|row| {
                let mut record = Map::new();
                for column in &columns {
                    let value = get_opt_string(row, &column.name)?
                        .map(Value::String)
                        .unwrap_or(Value::Null);
                    record.insert(column.name.clone(), value);
                }
                Ok(record)
            })
            .collect()
    }

    /// レコードを挿入
    ///
    /// # Arguments
    ///
    /// * `table_name` - 物理テーブル名
    /// * `record_uuid` - 生成済みのレコードUUID
    /// * `values` - 挿入するカラムと値（既知のカラムに絞り込み済み）
    pub async fn insert(
        &self,
        pool: &AnyPool,
        table_name: &str,
        record_uuid: &str,
        values: &[(RawColumnInfo, Option<String>)],
    ) -> Result<(), DatabaseError> {
        let uuid_column = RawColumnInfo {
            name: RECORD_UUID_COLUMN.to_string(),
            data_type: match self.dialect {
                Dialect::PostgreSQL => "character varying".to_string(),
                Dialect::SQLite => "TEXT".to_string(),
            },
            is_nullable: false,
            default_value: None,
        };
        let mut columns = vec![&uuid_column];
        columns.extend(values.iter().map(|(column, _)| column));

        let sql = self.generate_insert_sql(table_name, &columns);
        let mut query = sqlx::query(&sql).bind(record_uuid.to_string());
        for (_, value) in values {
            query = query.bind(value.clone());
        }

        query
            .execute(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        Ok(())
    }

    /// レコードを削除
    ///
    /// # Returns
    ///
    /// 削除対象が存在した場合は true
    pub async fn delete(
        &self,
        pool: &AnyPool,
        table_name: &str,
        record_uuid: &str,
    ) -> Result<bool, DatabaseError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            quote_identifier(table_name),
            quote_identifier(RECORD_UUID_COLUMN)
        );

        let result = sqlx::query(&sql)
            .bind(record_uuid.to_string())
            .execute(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        Ok(result.rows_affected() > 0)
    }
}
