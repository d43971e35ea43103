// fieldコマンドハンドラー
//
// フィールドの追加・一覧・更新・削除を実装します。
// 物理スキーマに対して実行された操作と、修復したドリフトを表示します。

use crate::cli::command_context::{resolve_object, CommandContext};
use crate::cli::commands::CommandOutput;
use crate::adapters::type_mapping::column_type_expression;
use crate::cli::FieldCommands;
use crate::core::field::{FieldPatch, FieldRecord, FieldSpec};
use crate::core::sync::SyncReport;
use crate::services::engine::SchemaEngine;
use crate::services::field_service::{AddFieldOutcome, UpdateFieldOutcome};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// fieldコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct FieldCommand {
    pub project_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub env: String,
    pub action: FieldCommands,
}

/// fieldコマンドの結果種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Created,
    AlreadyExists,
    Listed,
    Updated,
    NameConflict,
    Deleted,
}

/// fieldコマンドの出力
#[derive(Debug, Clone, Serialize)]
pub struct FieldOutput {
    pub status: FieldStatus,
    pub object_name: String,
    pub table_name: String,
    pub fields: Vec<FieldRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    /// 方言上のカラム型（例: "VARCHAR(255)"）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_dropped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldOutput {
    fn new(status: FieldStatus, object_name: &str, table_name: &str) -> Self {
        Self {
            status,
            object_name: object_name.to_string(),
            table_name: table_name.to_string(),
            fields: Vec::new(),
            column_name: None,
            column_type: None,
            sync: None,
            column_dropped: None,
            message: None,
        }
    }
}

impl CommandOutput for FieldOutput {
    fn to_text(&self) -> String {
        let mut output = String::new();

        let headline = match self.status {
            FieldStatus::Created => Some("Added field".green()),
            FieldStatus::AlreadyExists => Some("Field already exists".yellow()),
            FieldStatus::Updated => Some("Updated field".green()),
            FieldStatus::NameConflict => Some("Name conflict".yellow()),
            FieldStatus::Deleted => Some("Deleted field".green()),
            FieldStatus::Listed => None,
        };
        if let Some(headline) = headline {
            output.push_str(&format!("{} ({} / {})\n", headline, self.object_name, self.table_name));
        }
        if let Some(message) = &self.message {
            output.push_str(&format!("{}\n", message));
        }

        if self.status == FieldStatus::Listed && self.fields.is_empty() {
            output.push_str(&format!("No fields defined on '{}'.\n", self.object_name));
        }
        for field in &self.fields {
            output.push_str(&format!(
                "  {:>3}  {}  {} [{}]  \"{}\"\n",
                field.field_order,
                field.field_uuid,
                field.name.bold(),
                field.field_type,
                field.label
            ));
        }

        if let Some(column) = &self.column_name {
            match &self.column_type {
                Some(column_type) => {
                    output.push_str(&format!("  column: {} {}\n", column, column_type))
                }
                None => output.push_str(&format!("  column: {}\n", column)),
            }
        }
        if let Some(sync) = &self.sync {
            output.push_str(&format_sync(sync));
        }
        if let Some(dropped) = self.column_dropped {
            let text = if dropped {
                "  column dropped".to_string()
            } else {
                "  no column to drop".dimmed().to_string()
            };
            output.push_str(&format!("{}\n", text));
        }

        output.trim_end().to_string()
    }
}

fn format_sync(sync: &SyncReport) -> String {
    let mut output = String::new();

    let steps = [
        (sync.table_created, "table created"),
        (sync.column_added, "column added"),
        (sync.column_renamed, "column renamed"),
        (sync.type_altered, "column type altered"),
        (sync.column_dropped, "column dropped"),
    ];
    for (done, label) in steps {
        if done {
            output.push_str(&format!("  {} {}\n", "✓".green(), label));
        }
    }
    if sync.is_noop() {
        output.push_str(&format!("  {}\n", "schema unchanged".dimmed()));
    }
    for drift in &sync.drift {
        output.push_str(&format!("  {} {}\n", "⚠ repaired drift:".yellow(), drift));
    }

    output
}

/// fieldコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct FieldCommandHandler {}

impl FieldCommandHandler {
    /// 新しいFieldCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// fieldコマンドを実行
    pub async fn execute(&self, command: &FieldCommand) -> Result<FieldOutput> {
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
    pub async fn run(&self, engine: &SchemaEngine, action: &FieldCommands) -> Result<FieldOutput> {
        let fields = engine.fields();

        match action {
            FieldCommands::Add {
                object,
                name,
                label,
                field_type,
                description,
                order,
                constraints,
            } => {
                let object = resolve_object(engine, object).await?;
                let spec = FieldSpec {
                    name: name.clone(),
                    label: label.clone(),
                    description: description.clone(),
                    field_type: field_type.clone(),
                    field_order: *order,
                    created_by: None,
                    constraints: constraints.to_constraints(),
                };

                let mut output =
                    FieldOutput::new(FieldStatus::Created, &object.name, object.table_name());
                match fields.add_field(&object, &spec).await? {
                    AddFieldOutcome::Created(added) => {
                        output.column_type = Some(column_type_expression(
                            engine.dialect(),
                            added.field.field_type,
                            &added.field.constraints,
                        )?);
                        output.column_name = Some(added.column_name);
                        output.fields = vec![added.field];
                        output.sync = Some(added.sync);
                    }
                    AddFieldOutcome::AlreadyExists { message } => {
                        output.status = FieldStatus::AlreadyExists;
                        output.message = Some(message);
                    }
                }
                Ok(output)
            }

            FieldCommands::List { object } => {
                let object = resolve_object(engine, object).await?;
                let mut output =
                    FieldOutput::new(FieldStatus::Listed, &object.name, object.table_name());
                output.fields = fields.list_fields(&object).await?;
                Ok(output)
            }

            FieldCommands::Update {
                object,
                field,
                name,
                label,
                field_type,
                description,
                order,
                constraints,
            } => {
                let object = resolve_object(engine, object).await?;
                let patch = FieldPatch {
                    name: name.clone(),
                    label: label.clone(),
                    description: description.clone(),
                    field_type: field_type.clone(),
                    field_order: *order,
                    updated_by: None,
                    constraints: constraints.to_patch(),
                };

                let mut output =
                    FieldOutput::new(FieldStatus::Updated, &object.name, object.table_name());
                match fields.update_field(&object, field, &patch).await? {
                    UpdateFieldOutcome::Updated { field, sync } => {
                        output.column_name = field.column_name().ok();
                        output.fields = vec![field];
                        output.sync = Some(sync);
                    }
                    UpdateFieldOutcome::NameConflict { message } => {
                        output.status = FieldStatus::NameConflict;
                        output.message = Some(message);
                    }
                }
                Ok(output)
            }

            FieldCommands::Delete { object, field } => {
                let object = resolve_object(engine, object).await?;
                let deleted = fields.delete_field(&object, field).await?;

                let mut output =
                    FieldOutput::new(FieldStatus::Deleted, &object.name, &deleted.table_name);
                output.column_dropped = Some(deleted.column_dropped);
                output.fields = vec![deleted.field];
                Ok(output)
            }
        }
    }
}
