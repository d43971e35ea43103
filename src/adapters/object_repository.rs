// オブジェクトリポジトリ
//
// sph_objects テーブルへの永続化を担当します。
// 論理削除された行は検索結果に含めません。

use crate::adapters::database::classify_error;
use crate::adapters::row_reader::{get_flag, get_i64, get_opt_string, get_string};
use crate::core::error::DatabaseError;
use crate::core::naming::OBJECTS_TABLE;
use crate::core::object::ObjectRecord;
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool};

const OBJECT_COLUMNS: &str = "object_uuid, object_id, name, description, database_object, is_deleted, created_at, created_by, last_updated_at, last_updated_by";

/// 新規オブジェクト行
#[derive(Debug, Clone)]
pub struct NewObjectRow {
    pub object_uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub database_object: String,
    pub created_by: String,
    pub created_at: String,
}

/// オブジェクトリポジトリ
#[derive(Debug, Clone, Default)]
pub struct ObjectRepository;

impl ObjectRepository {
    /// 新しいObjectRepositoryを作成
    pub fn new() -> Self {
        Self
    }

    /// オブジェクトを保存
    ///
    /// 名前または物理テーブル名の一意制約違反は `DatabaseError::UniqueViolation` として返します。
    pub async fn insert(
        &self,
        pool: &AnyPool,
        row: &NewObjectRow,
    ) -> Result<ObjectRecord, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (object_uuid, name, description, database_object, is_deleted, created_at, created_by, last_updated_at, last_updated_by) \
             VALUES ($1, $2, $3, $4, 0, $5, $6, $7, $8) RETURNING {}",
            OBJECTS_TABLE, OBJECT_COLUMNS
        );

        let record = sqlx::query(&sql)
            .bind(&row.object_uuid)
            .bind(&row.name)
            .bind(row.description.clone())
            .bind(&row.database_object)
            .bind(&row.created_at)
            .bind(&row.created_by)
            .bind(&row.created_at)
            .bind(&row.created_by)
            .fetch_one(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        map_object(&record)
    }

    /// UUIDで検索
    pub async fn find_by_uuid(
        &self,
        pool: &AnyPool,
        object_uuid: &str,
    ) -> Result<Option<ObjectRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE object_uuid = $1 AND is_deleted = 0",
            OBJECT_COLUMNS, OBJECTS_TABLE
        );
        let query = sqlx::query(&sql).bind(object_uuid.to_string());
        self.fetch_optional(pool, query, &sql).await
    }

    /// 数値IDで検索
    pub async fn find_by_id(
        &self,
        pool: &AnyPool,
        object_id: i64,
    ) -> Result<Option<ObjectRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE object_id = $1 AND is_deleted = 0",
            OBJECT_COLUMNS, OBJECTS_TABLE
        );
        let query = sqlx::query(&sql).bind(object_id);
        self.fetch_optional(pool, query, &sql).await
    }

    /// 名前で検索（大文字小文字を区別しない）
    pub async fn find_by_name(
        &self,
        pool: &AnyPool,
        name: &str,
    ) -> Result<Option<ObjectRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE LOWER(name) = LOWER($1) AND is_deleted = 0",
            OBJECT_COLUMNS, OBJECTS_TABLE
        );
        let query = sqlx::query(&sql).bind(name.to_string());
        self.fetch_optional(pool, query, &sql).await
    }

    /// 名前を保持している行を検索（論理削除済みを含む）
    ///
    /// 論理削除されたオブジェクトの名前も予約されたままになります。
    pub async fn find_name_holder(
        &self,
        pool: &AnyPool,
        name: &str,
    ) -> Result<Option<ObjectRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE LOWER(name) = LOWER($1) ORDER BY is_deleted, object_id LIMIT 1",
            OBJECT_COLUMNS, OBJECTS_TABLE
        );
        let query = sqlx::query(&sql).bind(name.to_string());
        self.fetch_optional(pool, query, &sql).await
    }

    /// 物理テーブル名で検索（論理削除済みを含む）
    pub async fn find_by_database_object(
        &self,
        pool: &AnyPool,
        database_object: &str,
    ) -> Result<Option<ObjectRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE database_object = $1 ORDER BY is_deleted, object_id LIMIT 1",
            OBJECT_COLUMNS, OBJECTS_TABLE
        );
        let query = sqlx::query(&sql).bind(database_object.to_string());
        self.fetch_optional(pool, query, &sql).await
    }

    /// 一覧を取得（object_id 順）
    pub async fn list(&self, pool: &AnyPool) -> Result<Vec<ObjectRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE is_deleted = 0 ORDER BY object_id",
            OBJECT_COLUMNS, OBJECTS_TABLE
        );

        let rows = sqlx::query(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        rows.iter().map(map_object).collect()
    }

    /// 名前と説明を更新
    ///
    /// `None` の項目は変更しません。物理テーブル名は更新対象外です。
    pub async fn update(
        &self,
        pool: &AnyPool,
        object_uuid: &str,
        name: Option<&str>,
        description: Option<&str>,
        updated_by: &str,
        updated_at: &str,
    ) -> Result<Option<ObjectRecord>, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET name = COALESCE($1, name), description = COALESCE($2, description), \
             last_updated_by = $3, last_updated_at = $4 \
             WHERE object_uuid = $5 AND is_deleted = 0 RETURNING {}",
            OBJECTS_TABLE, OBJECT_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(name.map(str::to_string))
            .bind(description.map(str::to_string))
            .bind(updated_by.to_string())
            .bind(updated_at.to_string())
            .bind(object_uuid.to_string())
            .fetch_optional(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        row.as_ref().map(map_object).transpose()
    }

    /// 論理削除
    ///
    /// # Returns
    ///
    /// 削除対象が存在した場合は true
    pub async fn soft_delete(
        &self,
        pool: &AnyPool,
        object_uuid: &str,
        updated_by: &str,
        updated_at: &str,
    ) -> Result<bool, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET is_deleted = 1, last_updated_by = $1, last_updated_at = $2 \
             WHERE object_uuid = $3 AND is_deleted = 0",
            OBJECTS_TABLE
        );

        let result = sqlx::query(&sql)
            .bind(updated_by.to_string())
            .bind(updated_at.to_string())
            .bind(object_uuid.to_string())
            .execute(pool)
            .await
            .map_err(|e| classify_error(e, &sql))?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_optional<'q>(
        &self,
        pool: &AnyPool,
        query: Query<'q, Any, AnyArguments<'q>>,
        sql: &str,
    ) -> Result<Option<ObjectRecord>, DatabaseError> {
        let row = query
            .fetch_optional(pool)
            .await
            .map_err(|e| classify_error(e, sql))?;

        row.as_ref().map(map_object).transpose()
    }
}

fn map_object(row: &AnyRow) -> Result<ObjectRecord, DatabaseError> {
    Ok(ObjectRecord {
        object_uuid: get_string(row, "object_uuid")?,
        object_id: get_i64(row, "object_id")?,
        name: get_string(row, "name")?,
        description: get_opt_string(row, "description")?,
        database_object: get_string(row, "database_object")?,
        is_deleted: get_flag(row, "is_deleted")?,
        created_at: get_string(row, "created_at")?,
        created_by: get_string(row, "created_by")?,
        last_updated_at: get_string(row, "last_updated_at")?,
        last_updated_by: get_string(row, "last_updated_by")?,
    })
}
