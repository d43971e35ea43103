// recordコマンドハンドラー
//
// オブジェクトの物理テーブルに対するレコードの一覧・挿入・削除を実装します。

use crate::adapters::record_repository::RecordRow;
use crate::cli::command_context::{resolve_object, CommandContext};
use crate::cli::commands::CommandOutput;
use crate::cli::RecordCommands;
use crate::services::engine::SchemaEngine;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// recordコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct RecordCommand {
    pub project_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub env: String,
    pub action: RecordCommands,
}

/// recordコマンドの結果種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Listed,
    Inserted,
    Deleted,
}

/// recordコマンドの出力
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutput {
    pub status: RecordStatus,
    pub table_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<RecordRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_uuid: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
}

impl CommandOutput for RecordOutput {
    fn to_text(&self) -> String {
        let mut output = String::new();

        match self.status {
            RecordStatus::Listed => {
                if self.records.is_empty() {
                    output.push_str(&format!("No records in '{}'.\n", self.table_name));
                }
                for record in &self.records {
                    let line = record
                        .iter()
                        .map(|(column, value)| format!("{}={}", column, display_value(value)))
                        .collect::<Vec<_>>()
                        .join("  ");
                    output.push_str(&format!("  {}\n", line));
                }
            }
            RecordStatus::Inserted => {
                output.push_str(&format!(
                    "{} {}\n",
                    "Inserted record".green(),
                    self.record_uuid.as_deref().unwrap_or_default()
                ));
                if !self.ignored.is_empty() {
                    output.push_str(&format!(
                        "  {} {}\n",
                        "ignored keys:".yellow(),
                        self.ignored.join(", ")
                    ));
                }
            }
            RecordStatus::Deleted => {
                output.push_str(&format!(
                    "{} {}\n",
                    "Deleted record".green(),
                    self.record_uuid.as_deref().unwrap_or_default()
                ));
            }
        }

        output.trim_end().to_string()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// recordコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct RecordCommandHandler {}

impl RecordCommandHandler {
    /// 新しいRecordCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// recordコマンドを実行
    pub async fn execute(&self, command: &RecordCommand) -> Result<RecordOutput> {
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
    pub async fn run(
        &self,
        engine: &SchemaEngine,
        action: &RecordCommands,
    ) -> Result<RecordOutput> {
        let records = engine.records();

        match action {
            RecordCommands::List { object } => {
                let object = resolve_object(engine, object).await?;
                Ok(RecordOutput {
                    status: RecordStatus::Listed,
                    table_name: object.table_name().to_string(),
                    records: records.list_records(&object).await?,
                    record_uuid: None,
                    ignored: Vec::new(),
                })
            }

            RecordCommands::Insert { object, data } => {
                let payload: Value = serde_json::from_str(data)
                    .with_context(|| "Record data must be valid JSON")?;
                let object = resolve_object(engine, object).await?;
                let inserted = records.insert_record(&object, &payload).await?;

                Ok(RecordOutput {
                    status: RecordStatus::Inserted,
                    table_name: inserted.table_name,
                    records: Vec::new(),
                    record_uuid: Some(inserted.record_uuid),
                    ignored: inserted.ignored,
                })
            }

            RecordCommands::Delete { object, record } => {
                let object = resolve_object(engine, object).await?;
                records.delete_record(&object, record).await?;

                Ok(RecordOutput {
                    status: RecordStatus::Deleted,
                    table_name: object.table_name().to_string(),
                    records: Vec::new(),
                    record_uuid: Some(record.clone()),
                    ignored: Vec::new(),
                })
            }
        }
    }
}
