// オブジェクトディレクトリ
//
// 論理オブジェクトの登録と、オブジェクトから物理テーブル名への対応付けを管理します。
// 物理テーブルは最初のフィールド追加時に作成されるため、ここではDDLを実行しません。
//
// 名前と物理テーブル名は論理削除後も予約されたままになり、
// 一つの物理テーブルを複数のオブジェクトが共有することはありません。

use crate::adapters::database_introspector::{create_introspector, SchemaIntrospector};
use crate::adapters::object_repository::{NewObjectRow, ObjectRepository};
use crate::core::config::Dialect;
use crate::core::error::{EngineError, EngineResult, EntityKind, ValidationError};
use crate::core::identifier::table_name_for;
use crate::core::naming::{FIELDS_TABLE, OBJECTS_TABLE, SYSTEM_USER};
use crate::core::object::{NewObject, ObjectPatch, ObjectRecord};
use chrono::Utc;
use sqlx::AnyPool;
use tracing::info;
use uuid::Uuid;

/// オブジェクト作成の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateObjectOutcome {
    /// 作成した
    Created(ObjectRecord),
    /// 同名（大文字小文字を区別しない）のオブジェクトが既に存在する
    AlreadyExists(ObjectRecord),
}

/// オブジェクト更新の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateObjectOutcome {
    /// 更新した
    Updated(ObjectRecord),
    /// 変更後の名前が他のオブジェクトと重複する
    NameConflict { message: String },
}

/// オブジェクトディレクトリ
#[derive(Debug, Clone)]
pub struct ObjectDirectory {
    pool: AnyPool,
    dialect: Dialect,
    repository: ObjectRepository,
}

impl ObjectDirectory {
    /// 新しいObjectDirectoryを作成
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self {
            pool,
            dialect,
            repository: ObjectRepository::new(),
        }
    }

    /// オブジェクトを作成
    ///
    /// 物理テーブル名はここで一度だけ決定され、以後変更されません。
    pub async fn create_object(&self, request: &NewObject) -> EngineResult<CreateObjectOutcome> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ValidationError::missing("name").into());
        }
        let database_object = table_name_for(name, request.database_object.as_deref())?;
        if database_object == OBJECTS_TABLE || database_object == FIELDS_TABLE {
            return Err(ValidationError::ReservedIdentifier {
                name: database_object,
            }
            .into());
        }

        if let Some(holder) = self.repository.find_name_holder(&self.pool, name).await? {
            if holder.is_deleted {
                return Err(EngineError::Conflict {
                    message: format!(
                        "Object name '{}' is still reserved by a deleted object",
                        name
                    ),
                });
            }
            return Ok(CreateObjectOutcome::AlreadyExists(holder));
        }
        self.ensure_table_unclaimed(&database_object).await?;

        let row = NewObjectRow {
            object_uuid: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: request.description.clone(),
            database_object,
            created_by: actor(request.created_by.as_deref()),
            created_at: Utc::now().to_rfc3339(),
        };

        match self.repository.insert(&self.pool, &row).await {
            Ok(object) => {
                info!(
                    object_uuid = %object.object_uuid,
                    table = %object.database_object,
                    "created object"
                );
                Ok(CreateObjectOutcome::Created(object))
            }
            // 事前確認と挿入の間に同名のオブジェクトが作成された
            Err(error) if error.is_unique_violation() => {
                match self.repository.find_by_name(&self.pool, name).await? {
                    Some(existing) => Ok(CreateObjectOutcome::AlreadyExists(existing)),
                    // 物理テーブル名の衝突、または論理削除済みの名前
                    None => Err(EngineError::Conflict {
                        message: format!(
                            "Object '{}' conflicts with an existing object or table '{}'",
                            name, row.database_object
                        ),
                    }),
                }
            }
            Err(error) => Err(error.into()),
        }
    }

    /// UUIDでオブジェクトを取得
    pub async fn get_object(&self, object_uuid: &str) -> EngineResult<ObjectRecord> {
        self.repository
            .find_by_uuid(&self.pool, object_uuid)
            .await?
            .ok_or_else(|| EngineError::not_found(EntityKind::Object, object_uuid))
    }

    /// 数値IDでオブジェクトを取得
    pub async fn get_object_by_id(&self, object_id: i64) -> EngineResult<ObjectRecord> {
        self.repository
            .find_by_id(&self.pool, object_id)
            .await?
            .ok_or_else(|| EngineError::not_found(EntityKind::Object, object_id.to_string()))
    }

    /// 名前でオブジェクトを取得（大文字小文字を区別しない）
    pub async fn get_object_by_name(&self, name: &str) -> EngineResult<ObjectRecord> {
        self.repository
            .find_by_name(&self.pool, name.trim())
            .await?
            .ok_or_else(|| EngineError::not_found(EntityKind::Object, name))
    }

    /// UUIDまたは数値IDでオブジェクトを解決
    pub async fn resolve_object(&self, key: &str) -> EngineResult<ObjectRecord> {
        let key = key.trim();
        if let Some(object) = self.repository.find_by_uuid(&self.pool, key).await? {
            return Ok(object);
        }
        match key.parse::<i64>() {
            Ok(object_id) => self.get_object_by_id(object_id).await,
            Err(_) => Err(EngineError::not_found(EntityKind::Object, key)),
        }
    }

    /// オブジェクト一覧を取得
    pub async fn list_objects(&self) -> EngineResult<Vec<ObjectRecord>> {
        Ok(self.repository.list(&self.pool).await?)
    }

    /// 名前と説明を更新
    ///
    /// 物理テーブル名は変更しません。
    pub async fn update_object(
        &self,
        object_uuid: &str,
        patch: &ObjectPatch,
    ) -> EngineResult<UpdateObjectOutcome> {
        let current = self.get_object(object_uuid).await?;

        let name = match patch.name.as_deref().map(str::trim) {
            Some("") => return Err(ValidationError::missing("name").into()),
            other => other,
        };

        if let Some(new_name) = name {
            if let Some(other) = self.repository.find_name_holder(&self.pool, new_name).await? {
                if other.object_uuid != current.object_uuid {
                    return Ok(UpdateObjectOutcome::NameConflict {
                        message: name_conflict_message(new_name),
                    });
                }
            }
        }

        let result = self
            .repository
            .update(
                &self.pool,
                &current.object_uuid,
                name,
                patch.description.as_deref(),
                &actor(patch.updated_by.as_deref()),
                &Utc::now().to_rfc3339(),
            )
            .await;

        match result {
            Ok(Some(object)) => {
                info!(object_uuid = %object.object_uuid, "updated object");
                Ok(UpdateObjectOutcome::Updated(object))
            }
            Ok(None) => Err(EngineError::not_found(EntityKind::Object, object_uuid)),
            Err(error) if error.is_unique_violation() => Ok(UpdateObjectOutcome::NameConflict {
                message: name_conflict_message(name.unwrap_or(&current.name)),
            }),
            Err(error) => Err(error.into()),
        }
    }

    /// オブジェクトを論理削除
    ///
    /// 物理テーブルは削除しません。
    pub async fn delete_object(&self, object_uuid: &str) -> EngineResult<ObjectRecord> {
        let current = self.get_object(object_uuid).await?;

        let deleted = self
            .repository
            .soft_delete(
                &self.pool,
                &current.object_uuid,
                SYSTEM_USER,
                &Utc::now().to_rfc3339(),
            )
            .await?;
        if !deleted {
            return Err(EngineError::not_found(EntityKind::Object, object_uuid));
        }

        info!(object_uuid = %current.object_uuid, "deleted object");
        Ok(ObjectRecord {
            is_deleted: true,
            ..current
        })
    }
}

impl ObjectDirectory {
    /// 物理テーブル名が他のオブジェクトやメタデータ外のテーブルに使われていないことを確認
    async fn ensure_table_unclaimed(&self, database_object: &str) -> EngineResult<()> {
        if let Some(owner) = self
            .repository
            .find_by_database_object(&self.pool, database_object)
            .await?
        {
            return Err(EngineError::Conflict {
                message: format!(
                    "Table '{}' is already used by object '{}'",
                    database_object, owner.name
                ),
            });
        }

        if create_introspector(self.dialect)
            .table_exists(&self.pool, database_object)
            .await?
        {
            return Err(EngineError::Conflict {
                message: format!("Table '{}' already exists in the database", database_object),
            });
        }

        Ok(())
    }
}

/// 監査カラムに記録する実行者
pub(crate) fn actor(user: Option<&str>) -> String {
    user.map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(SYSTEM_USER)
        .to_string()
}

fn name_conflict_message(name: &str) -> String {
    format!("An object named '{}' already exists", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_defaults_to_system() {
        assert_eq!(actor(None), "system");
        assert_eq!(actor(Some("  ")), "system");
        assert_eq!(actor(Some("alice")), "alice");
    }
}
