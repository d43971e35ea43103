// フィールドリポジトリ
//
// sph_object_fields テーブルへの永続化を担当します。
// 一覧は常に (field_order, field_id) の順で返します。

use crate::adapters::database::classify_error;
use crate::adapters::row_reader::{
    flag, get_flag, get_i64, get_opt_f64, get_opt_i64, get_opt_string, get_string,
};
use crate::core::error::DatabaseError;
use crate::core::field::{FieldConstraints, FieldRecord, FieldUpdate};
use crate::core::field_type::FieldType;
use crate::core::naming::FIELDS_TABLE;
use sqlx::any::AnyRow;
use sqlx::AnyPool;

const FIELD_COLUMNS: &str = "field_uuid, field_id, object_uuid, name, label, description, field_type, field_order, created_by, created_at, last_updated_by, last_updated_at, max_length, default_value, markdown, min_value, max_value, allow_decimal, decimal_places";

/// 新規フィールド行
#[derive(Debug, Clone)]
pub struct NewFieldRow {
    pub field_uuid: String,
    pub object_uuid: String,
    pub name: String,
    pub label: String,
    pub description: Option<String>,
    pub field_type: FieldType,
    pub field_order: i64,
    pub created_by: String,
    pub created_at: String,
    pub constraints: FieldConstraints,
}

/// フィールドリポジトリ
#[derive(Debug, Clone, Default)]
pub struct FieldRepository;

impl FieldRepository {
    /// 新しいFieldRepositoryを作成
    pub fn new() -> Self {
        Self
    }

    /// フィールドを保存
    ///
    /// 同一オブジェクト内の名前重複は `DatabaseError::UniqueViolation` として返します。
    pub async fn insert(
        &self,
        pool: &AnyPool,
        row: &NewFieldRow,
    ) -> Result<FieldRecord, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (field_uuid, object_uuid, name, label, description, field_type, field_order, \
             created_by, created_at, last_updated_by, last_updated_at, \
             max_length, default_value, markdown, min_value, max_value, allow_decimal, decimal_places) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {}",
            FIELDS_TABLE, FIELD_COLUMNS
        );
        let constraints = &row.constraints;

        let record = sqlx::query(&sql)
            .bind(&row.field_uuid)
            .bind(&row.object_uuid)
            .bind(&row.name)
            .bind(&row.label)
            .bind(row.description.clone())
            .bind(row.field_type.as_str())
            .bind(row.field_order)
            .bind(&row.created_by)
            .bind(&row.created_at)
            .bind(&row.created_by)
            .bind(&row.created_at)
            .bind(constraints.max_length)
            .bind(constraints.default_value.clone())
            .bind(flag(constraints.markdown))
            .bind(constraints.min_value)
            .bind(constraints.max_value)
            .bind(flag(constraints.allow_decimal))
            .bind(constraints.decimal_places)
            .fetch_one(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        map_field(&record)
    }

    /// UUIDで検索
    pub async fn find(
        &self,
        pool: &AnyPool,
        field_uuid: &str,
    ) -> Result<Option<FieldRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE field_uuid = $1",
            FIELD_COLUMNS, FIELDS_TABLE
        );

        let row = sqlx::query(&sql)
            .bind(field_uuid.to_string())
            .fetch_optional(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        row.as_ref().map(map_field).transpose()
    }

    /// オブジェクト内のフィールド一覧を取得
    pub async fn list(
        &self,
        pool: &AnyPool,
        object_uuid: &str,
    ) -> Result<Vec<FieldRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE object_uuid = $1 ORDER BY field_order ASC, field_id ASC",
            FIELD_COLUMNS, FIELDS_TABLE
        );

        let rows = sqlx::query(&sql)
            .bind(object_uuid.to_string())
            .fetch_all(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        rows.iter().map(map_field).collect()
    }

    /// 次の表示順（max(field_order) + 1）を取得
    pub async fn next_order(&self, pool: &AnyPool, object_uuid: &str) -> Result<i64, DatabaseError> {
        let sql = format!(
            "SELECT MAX(field_order) AS max_order FROM {} WHERE object_uuid = $1",
            FIELDS_TABLE
        );

        let row = sqlx::query(&sql)
            .bind(object_uuid.to_string())
            .fetch_one(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        Ok(get_opt_i64(&row, "max_order")?.unwrap_or(0) + 1)
    }

    /// フィールドを更新
    ///
    /// `None` の項目は現在値を維持します（NULLで上書きしない）。
    pub async fn update(
        &self,
        pool: &AnyPool,
        field_uuid: &str,
        update: &FieldUpdate,
        updated_at: &str,
    ) -> Result<Option<FieldRecord>, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET \
             name = COALESCE($1, name), \
             label = COALESCE($2, label), \
             description = COALESCE($3, description), \
             field_type = COALESCE($4, field_type), \
             field_order = COALESCE($5, field_order), \
             max_length = COALESCE($6, max_length), \
             default_value = COALESCE($7, default_value), \
             markdown = COALESCE($8, markdown), \
             min_value = COALESCE($9, min_value), \
             max_value = COALESCE($10, max_value), \
             allow_decimal = COALESCE($11, allow_decimal), \
             decimal_places = COALESCE($12, decimal_places), \
             last_updated_by = $13, \
             last_updated_at = $14 \
             WHERE field_uuid = $15 RETURNING {}",
            FIELDS_TABLE, FIELD_COLUMNS
        );
        let constraints = &update.constraints;

        let row = sqlx::query(&sql)
            .bind(update.name.clone())
            .bind(update.label.clone())
            .bind(update.description.clone())
            .bind(update.field_type.map(|t| t.as_str().to_string()))
            .bind(update.field_order)
            .bind(constraints.max_length)
            .bind(constraints.default_value.clone())
            .bind(constraints.markdown.map(flag))
            .bind(constraints.min_value)
            .bind(constraints.max_value)
            .bind(constraints.allow_decimal.map(flag))
            .bind(constraints.decimal_places)
            .bind(update.updated_by.clone())
            .bind(updated_at.to_string())
            .bind(field_uuid.to_string())
            .fetch_optional(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        row.as_ref().map(map_field).transpose()
    }

    /// フィールドを削除
    ///
    /// # Returns
    ///
    /// 削除対象が存在した場合は true
    pub async fn delete(&self, pool: &AnyPool, field_uuid: &str) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE field_uuid = $1", FIELDS_TABLE);

        let result = sqlx::query(&sql)
            .bind(field_uuid.to_string())
            .execute(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_field(row: &AnyRow) -> Result<FieldRecord, DatabaseError> {
    let raw_type = get_string(row, "field_type")?;
    let field_type = raw_type
        .parse::<FieldType>()
        .map_err(|e| DatabaseError::Query {
            message: format!("Stored field type is invalid: {}", e),
            sql: None,
        })?;

    Ok(FieldRecord {
        field_uuid: get_string(row, "field_uuid")?,
        field_id: get_i64(row, "field_id")?,
        object_uuid: get_string(row, "object_uuid")?,
        name: get_string(row, "name")?,
        label: get_string(row, "label")?,
        description: get_opt_string(row, "description")?,
        field_type,
        field_order: get_i64(row, "field_order")?,
        created_by: get_string(row, "created_by")?,
        created_at: get_string(row, "created_at")?,
        last_updated_by: get_string(row, "last_updated_by")?,
        last_updated_at: get_string(row, "last_updated_at")?,
        constraints: FieldConstraints {
            max_length: get_opt_i64(row, "max_length")?,
            min_value: get_opt_f64(row, "min_value")?,
            max_value: get_opt_f64(row, "max_value")?,
            allow_decimal: get_flag(row, "allow_decimal")?,
            decimal_places: get_opt_i64(row, "decimal_places")?,
            default_value: get_opt_string(row, "default_value")?,
            markdown: get_flag(row, "markdown")?,
        },
    })
}
