// レコードサービス
//
// オブジェクトの物理テーブルに対する行操作を提供します。
// ペイロードは現在のカラムに存在するものだけに絞り込み、保護カラムは呼び出し側から設定できません。

use crate::adapters::record_repository::{RecordRepository, RecordRow};
use crate::core::config::Dialect;
use crate::core::error::{EngineError, EngineResult, EntityKind, ValidationError};
use crate::core::naming::is_protected_column;
use crate::core::object::ObjectRecord;
use crate::core::schema::RawColumnInfo;
use serde::Serialize;
use serde_json::Value;
use sqlx::AnyPool;
use tracing::{debug, info};
use uuid::Uuid;

/// 挿入されたレコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertedRecord {
    pub record_uuid: String,
    pub table_name: String,
    /// 値を設定したカラム
    pub columns: Vec<String>,
    /// ペイロードに含まれていたが無視したキー
    pub ignored: Vec<String>,
}

/// レコードサービス
#[derive(Debug)]
pub struct RecordService {
    pool: AnyPool,
    repository: RecordRepository,
}

impl RecordService {
    /// 新しいRecordServiceを作成
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self {
            pool,
            repository: RecordRepository::new(dialect),
        }
    }

    /// レコード一覧を取得
    ///
    /// 物理テーブルがまだ作成されていない場合は空の一覧を返します。
    pub async fn list_records(&self, object: &ObjectRecord) -> EngineResult<Vec<RecordRow>> {
        Ok(self.repository.list(&self.pool, object.table_name()).await?)
    }

    /// レコードを挿入
    ///
    /// # Arguments
    ///
    /// * `object` - 対象オブジェクト
    /// * `payload` - カラム名をキーとするJSONオブジェクト
    pub async fn insert_record(
        &self,
        object: &ObjectRecord,
        payload: &Value,
    ) -> EngineResult<InsertedRecord> {
        let Value::Object(entries) = payload else {
            return Err(ValidationError::constraint("data", "must be a JSON object").into());
        };

        let table_name = object.table_name();
        let columns = self.repository.columns(&self.pool, table_name).await?;
        if columns.is_empty() {
            return Err(EngineError::not_found(EntityKind::Table, table_name));
        }

        let mut values: Vec<(RawColumnInfo, Option<String>)> = Vec::new();
        let mut ignored = Vec::new();
        for (key, value) in entries {
            match columns
                .iter()
                .find(|column| column.name == *key && !is_protected_column(&column.name))
            {
                Some(column) => values.push((column.clone(), value_to_text(value))),
                None => ignored.push(key.clone()),
            }
        }

        if values.is_empty() {
            return Err(ValidationError::constraint(
                "data",
                "no known columns in payload",
            )
            .into());
        }
        if !ignored.is_empty() {
            debug!(table = %table_name, ?ignored, "ignored unknown or protected keys");
        }

        let record_uuid = Uuid::new_v4().to_string();
        self.repository
            .insert(&self.pool, table_name, &record_uuid, &values)
            .await?;

        info!(table = %table_name, %record_uuid, "inserted record");
        Ok(InsertedRecord {
            record_uuid,
            table_name: table_name.to_string(),
            columns: values.into_iter().map(|(column, _)| column.name).collect(),
            ignored,
        })
    }

    /// レコードを削除
    pub async fn delete_record(&self, object: &ObjectRecord, record_uuid: &str) -> EngineResult<()> {
        let table_name = object.table_name();
        if !self.repository.table_exists(&self.pool, table_name).await? {
            return Err(EngineError::not_found(EntityKind::Record, record_uuid));
        }

        if !self
            .repository
            .delete(&self.pool, table_name, record_uuid)
            .await?
        {
            return Err(EngineError::not_found(EntityKind::Record, record_uuid));
        }

        info!(table = %table_name, record_uuid, "deleted record");
        Ok(())
    }
}

/// JSON値をバインド用のテキストに変換
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
