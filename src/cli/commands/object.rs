// objectコマンドハンドラー
//
// オブジェクトの作成・一覧・取得・更新・論理削除を実装します。
// 名前の重複はエラーではなく、メッセージ付きの結果として返します。

use crate::cli::command_context::{resolve_object, CommandContext};
use crate::cli::commands::CommandOutput;
use crate::cli::ObjectCommands;
use crate::core::object::{NewObject, ObjectPatch, ObjectRecord};
use crate::services::engine::SchemaEngine;
use crate::services::object_directory::{CreateObjectOutcome, UpdateObjectOutcome};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// objectコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ObjectCommand {
    pub project_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub env: String,
    pub action: ObjectCommands,
}

/// objectコマンドの結果種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectStatus {
    Created,
    AlreadyExists,
    Listed,
    Found,
    Updated,
    NameConflict,
    Deleted,
}

/// objectコマンドの出力
#[derive(Debug, Clone, Serialize)]
pub struct ObjectOutput {
    pub status: ObjectStatus,
    pub objects: Vec<ObjectRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ObjectOutput {
    fn single(status: ObjectStatus, object: ObjectRecord) -> Self {
        Self {
            status,
            objects: vec![object],
            message: None,
        }
    }
}

impl CommandOutput for ObjectOutput {
    fn to_text(&self) -> String {
        let mut output = String::new();

        match self.status {
            ObjectStatus::Created => output.push_str(&format!("{}\n", "Created object".green())),
            ObjectStatus::AlreadyExists => output.push_str(&format!(
                "{}\n",
                "Object already exists".yellow()
            )),
            ObjectStatus::Updated => output.push_str(&format!("{}\n", "Updated object".green())),
            ObjectStatus::Deleted => output.push_str(&format!("{}\n", "Deleted object".green())),
            ObjectStatus::NameConflict => {
                output.push_str(&format!("{}\n", "Name conflict".yellow()));
            }
            ObjectStatus::Listed | ObjectStatus::Found => {}
        }

        if let Some(message) = &self.message {
            output.push_str(&format!("{}\n", message));
        }

        if self.status == ObjectStatus::Listed && self.objects.is_empty() {
            output.push_str("No objects defined.\n");
        }

        for object in &self.objects {
            output.push_str(&format!(
                "  {:>4}  {}  {}  (table: {})\n",
                object.object_id,
                object.object_uuid,
                object.name.bold(),
                object.database_object
            ));
            if let Some(description) = &object.description {
                output.push_str(&format!("        {}\n", description));
            }
        }

        output.trim_end().to_string()
    }
}

/// objectコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct ObjectCommandHandler {}

impl ObjectCommandHandler {
    /// 新しいObjectCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// objectコマンドを実行
    pub async fn execute(&self, command: &ObjectCommand) -> Result<ObjectOutput> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;
        let engine = context.connect(&command.env).await?;

        let result = self.run(&engine, &command.action).await;
        engine.close().await;
        result
    }

    /// 接続済みのエンジンでアクションを実行
    pub async fn run(&self, engine: &SchemaEngine, action: &ObjectCommands) -> Result<ObjectOutput> {
        let objects = engine.objects();

        match action {
            ObjectCommands::Create {
                name,
                description,
                table,
            } => {
                let request = NewObject {
                    name: name.clone(),
                    description: description.clone(),
                    database_object: table.clone(),
                    created_by: None,
                };
                Ok(match objects.create_object(&request).await? {
                    CreateObjectOutcome::Created(object) => {
                        ObjectOutput::single(ObjectStatus::Created, object)
                    }
                    CreateObjectOutcome::AlreadyExists(object) => ObjectOutput {
                        message: Some(format!("An object named '{}' already exists", object.name)),
                        ..ObjectOutput::single(ObjectStatus::AlreadyExists, object)
                    },
                })
            }

            ObjectCommands::List => Ok(ObjectOutput {
                status: ObjectStatus::Listed,
                objects: objects.list_objects().await?,
                message: None,
            }),

            ObjectCommands::Get { object } => {
                let object = resolve_object(engine, object).await?;
                Ok(ObjectOutput::single(ObjectStatus::Found, object))
            }

            ObjectCommands::Update {
                object,
                name,
                description,
            } => {
                let current = resolve_object(engine, object).await?;
                let patch = ObjectPatch {
                    name: name.clone(),
                    description: description.clone(),
                    updated_by: None,
                };
                Ok(
                    match objects.update_object(&current.object_uuid, &patch).await? {
                        UpdateObjectOutcome::Updated(object) => {
                            ObjectOutput::single(ObjectStatus::Updated, object)
                        }
                        UpdateObjectOutcome::NameConflict { message } => ObjectOutput {
                            status: ObjectStatus::NameConflict,
                            objects: vec![current],
                            message: Some(message),
                        },
                    },
                )
            }

            ObjectCommands::Delete { object } => {
                let current = resolve_object(engine, object).await?;
                let deleted = objects.delete_object(&current.object_uuid).await?;
                Ok(ObjectOutput {
                    message: Some(format!(
                        "Table '{}' was kept in place",
                        deleted.database_object
                    )),
                    ..ObjectOutput::single(ObjectStatus::Deleted, deleted)
                })
            }
        }
    }
}
