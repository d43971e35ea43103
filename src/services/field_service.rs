// フィールドメタデータストア
//
// オブジェクトに属するフィールドのメタデータを管理し、物理カラムの調整を SchemaSynchronizer に委譲します。
//
// メタデータの書き込みとDDLは二段階で実行され、両者をまたぐトランザクションはありません。
// 途中で失敗した場合はメタデータが物理スキーマより先行した状態が残り、
// 後続の更新時に SchemaSynchronizer が検出して修復します。

use crate::adapters::field_repository::{FieldRepository, NewFieldRow};
use crate::core::config::{Dialect, FieldLimits};
use crate::core::error::{EngineError, EngineResult, EntityKind, ValidationError};
use crate::core::field::{FieldPatch, FieldRecord, FieldSpec, FieldUpdate};
use crate::core::field_type::FieldType;
use crate::core::identifier::column_name_for;
use crate::core::object::ObjectRecord;
use crate::core::sync::{ColumnChange, ColumnTarget, SyncReport};
use crate::core::type_mapper::map_field_type;
use crate::services::field_validator::FieldValidator;
use crate::services::object_directory::actor;
use crate::services::schema_synchronizer::SchemaSynchronizer;
use chrono::Utc;
use serde::Serialize;
use sqlx::AnyPool;
use tracing::{debug, info};
use uuid::Uuid;

/// 追加されたフィールド
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedField {
    /// 物理テーブルを新たに作成したか
    pub table_created: bool,
    pub table_name: String,
    pub column_name: String,
    pub field: FieldRecord,
    pub sync: SyncReport,
}

/// フィールド追加の結果
#[derive(Debug, Clone, PartialEq)]
pub enum AddFieldOutcome {
    Created(AddedField),
    /// 同名または同じ物理カラムに対応するフィールドが既に存在する
    AlreadyExists { message: String },
}

/// フィールド更新の結果
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateFieldOutcome {
    Updated { field: FieldRecord, sync: SyncReport },
    /// 変更後の名前が同じオブジェクトの他のフィールドと重複する
    NameConflict { message: String },
}

/// 削除されたフィールド
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedField {
    pub field: FieldRecord,
    pub table_name: String,
    pub column_dropped: bool,
}

/// フィールドメタデータストア
#[derive(Debug)]
pub struct FieldService {
    pool: AnyPool,
    repository: FieldRepository,
    validator: FieldValidator,
    synchronizer: SchemaSynchronizer,
}

impl FieldService {
    /// 新しいFieldServiceを作成
    pub fn new(pool: AnyPool, dialect: Dialect, limits: FieldLimits) -> Self {
        Self {
            synchronizer: SchemaSynchronizer::new(pool.clone(), dialect),
            pool,
            repository: FieldRepository::new(),
            validator: FieldValidator::new(limits),
        }
    }

    /// 物理スキーマの同期サービス
    pub fn synchronizer(&self) -> &SchemaSynchronizer {
        &self.synchronizer
    }

    /// フィールドを追加
    ///
    /// 検証 → 重複確認 → 表示順の決定 → メタデータ保存 → 物理カラムの作成 の順に実行します。
    /// 検証エラーはストレージへの書き込み前に返されます。
    ///
    /// # Arguments
    ///
    /// * `object` - フィールドを追加するオブジェクト
    /// * `spec` - 追加するフィールドの定義
    pub async fn add_field(
        &self,
        object: &ObjectRecord,
        spec: &FieldSpec,
    ) -> EngineResult<AddFieldOutcome> {
        let validated = self.validator.validate_new(spec)?;
        let column_type = map_field_type(validated.field_type, &spec.constraints)?;
        let name = spec.name.trim();

        let existing = self.repository.list(&self.pool, &object.object_uuid).await?;
        if let Some(message) = find_collision(&existing, None, name, &validated.column_name) {
            return Ok(AddFieldOutcome::AlreadyExists { message });
        }

        let field_order = match spec.field_order.filter(|order| *order > 0) {
            Some(order) => order,
            None => {
                self.repository
                    .next_order(&self.pool, &object.object_uuid)
                    .await?
            }
        };

        let row = NewFieldRow {
            field_uuid: Uuid::new_v4().to_string(),
            object_uuid: object.object_uuid.clone(),
            name: name.to_string(),
            label: spec.label.trim().to_string(),
            description: spec.description.clone(),
            field_type: validated.field_type,
            field_order,
            created_by: actor(spec.created_by.as_deref()),
            created_at: Utc::now().to_rfc3339(),
            constraints: spec.constraints.clone(),
        };

        let field = match self.repository.insert(&self.pool, &row).await {
            Ok(field) => field,
            // 事前確認と保存の間に同名のフィールドが追加された
            Err(error) if error.is_unique_violation() => {
                return Ok(AddFieldOutcome::AlreadyExists {
                    message: field_exists_message(name),
                });
            }
            Err(error) => return Err(error.into()),
        };

        let target = ColumnTarget::new(
            object.table_name(),
            validated.column_name.clone(),
            column_type,
        );
        let sync = self.synchronizer.materialize(&target).await?;

        info!(
            field_uuid = %field.field_uuid,
            table = %target.table,
            column = %target.column,
            table_created = sync.table_created,
            "added field"
        );

        Ok(AddFieldOutcome::Created(AddedField {
            table_created: sync.table_created,
            table_name: target.table,
            column_name: target.column,
            field,
            sync,
        }))
    }

    /// フィールド一覧を取得（field_order, field_id の順）
    pub async fn list_fields(&self, object: &ObjectRecord) -> EngineResult<Vec<FieldRecord>> {
        Ok(self.repository.list(&self.pool, &object.object_uuid).await?)
    }

    /// フィールドを取得
    ///
    /// フィールドが指定されたオブジェクトに属していない場合は `OwnershipMismatch` を返します。
    pub async fn get_field(
        &self,
        object: &ObjectRecord,
        field_uuid: &str,
    ) -> EngineResult<FieldRecord> {
        let field = self
            .repository
            .find(&self.pool, field_uuid)
            .await?
            .ok_or_else(|| EngineError::not_found(EntityKind::Field, field_uuid))?;

        if field.object_uuid != object.object_uuid {
            return Err(EngineError::OwnershipMismatch {
                field_uuid: field.field_uuid,
                object_uuid: object.object_uuid.clone(),
            });
        }

        Ok(field)
    }

    /// フィールドを更新
    ///
    /// 物理カラムの調整（テーブル作成 → リネームまたは不在カラムの追加 → 型変更）を先に行い、
    /// その後に未指定の項目を変更しない方針でメタデータを保存します。
    pub async fn update_field(
        &self,
        object: &ObjectRecord,
        field_uuid: &str,
        patch: &FieldPatch,
    ) -> EngineResult<UpdateFieldOutcome> {
        let current = self.get_field(object, field_uuid).await?;

        let label = non_blank("label", patch.label.as_deref())?;
        let requested_name = non_blank("name", patch.name.as_deref())?;
        let new_name = requested_name.filter(|name| *name != current.name);

        let old_column = column_name_for(&current.name)?;
        let new_column = match new_name {
            Some(name) => {
                let column = self.validator.validate_name(name)?;
                let others = self.repository.list(&self.pool, &object.object_uuid).await?;
                if let Some(message) =
                    find_collision(&others, Some(&current.field_uuid), name, &column)
                {
                    return Ok(UpdateFieldOutcome::NameConflict { message });
                }
                column
            }
            None => old_column.clone(),
        };

        let new_type = match non_blank("field_type", patch.field_type.as_deref())? {
            Some(raw) => Some(raw.parse::<FieldType>()?),
            None => None,
        };
        let effective_type = new_type.unwrap_or(current.field_type);
        let effective_constraints = current.constraints.merged(&patch.constraints);
        self.validator
            .validate_constraints(effective_type, &effective_constraints)?;

        let change = ColumnChange {
            table: object.table_name().to_string(),
            old_column,
            new_column,
            source_type: map_field_type(current.field_type, &current.constraints)?,
            target_type: map_field_type(effective_type, &effective_constraints)?,
        };
        debug!(?change, "reconciling column");
        let sync = self.synchronizer.reconcile(&change).await?;

        let update = FieldUpdate {
            name: new_name.map(str::to_string),
            label: label.map(str::to_string),
            description: patch.description.clone(),
            field_type: new_type,
            field_order: patch.field_order.filter(|order| *order > 0),
            updated_by: actor(patch.updated_by.as_deref()),
            constraints: patch.constraints.clone(),
        };

        let result = self
            .repository
            .update(
                &self.pool,
                &current.field_uuid,
                &update,
                &Utc::now().to_rfc3339(),
            )
            .await;

        match result {
            Ok(Some(field)) => {
                info!(
                    field_uuid = %field.field_uuid,
                    renamed = sync.column_renamed,
                    altered = sync.type_altered,
                    drift = sync.drift.len(),
                    "updated field"
                );
                Ok(UpdateFieldOutcome::Updated { field, sync })
            }
            Ok(None) => Err(EngineError::not_found(EntityKind::Field, field_uuid)),
            Err(error) if error.is_unique_violation() => Ok(UpdateFieldOutcome::NameConflict {
                message: field_exists_message(new_name.unwrap_or(&current.name)),
            }),
            Err(error) => Err(error.into()),
        }
    }

    /// フィールドを削除
    ///
    /// テーブルが存在すれば物理カラムを削除し、その結果に関わらずメタデータを削除します。
    pub async fn delete_field(
        &self,
        object: &ObjectRecord,
        field_uuid: &str,
    ) -> EngineResult<DeletedField> {
        let field = self.get_field(object, field_uuid).await?;
        let table_name = object.table_name().to_string();
        let column = column_name_for(&field.name)?;

        let column_dropped = self.synchronizer.drop_column(&table_name, &column).await?;
        self.repository.delete(&self.pool, &field.field_uuid).await?;

        info!(
            field_uuid = %field.field_uuid,
            table = %table_name,
            column_dropped,
            "deleted field"
        );

        Ok(DeletedField {
            field,
            table_name,
            column_dropped,
        })
    }
}

/// 同じオブジェクト内で名前または物理カラムが重複するフィールドを探す
///
/// `exclude` に指定したフィールド自身は比較対象から外します。
fn find_collision(
    fields: &[FieldRecord],
    exclude: Option<&str>,
    name: &str,
    column: &str,
) -> Option<String> {
    let lowered = name.to_lowercase();

    fields
        .iter()
        .filter(|field| Some(field.field_uuid.as_str()) != exclude)
        .find_map(|field| {
            if field.name.to_lowercase() == lowered {
                Some(field_exists_message(name))
            } else if field.column_name().is_ok_and(|c| c == column) {
                Some(format!(
                    "Field '{}' maps to column '{}' already used by field '{}'",
                    name, column, field.name
                ))
            } else {
                None
            }
        })
}

fn field_exists_message(name: &str) -> String {
    format!("A field named '{}' already exists on this object", name)
}

/// 指定された値が空白のみの場合はエラー、未指定なら None
fn non_blank<'a>(
    attribute: &str,
    value: Option<&'a str>,
) -> Result<Option<&'a str>, ValidationError> {
    match value.map(str::trim) {
        Some("") => Err(ValidationError::missing(attribute)),
        other => Ok(other),
    }
}
