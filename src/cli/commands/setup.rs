// setupコマンドハンドラー
//
// メタデータテーブル（sph_objects, sph_object_fields）を作成します。
// 既に存在する場合は何もしません。

use crate::cli::command_context::CommandContext;
use crate::cli::commands::CommandOutput;
use crate::core::config::Dialect;
use crate::core::naming::{FIELDS_TABLE, OBJECTS_TABLE};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// setupコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct SetupCommand {
    pub project_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub env: String,
}

/// setupコマンドの出力
#[derive(Debug, Clone, Serialize)]
pub struct SetupOutput {
    pub environment: String,
    pub dialect: Dialect,
    pub tables: Vec<String>,
}

impl CommandOutput for SetupOutput {
    fn to_text(&self) -> String {
        format!(
            "{} metadata tables installed in '{}' ({}): {}",
            "✓".green(),
            self.environment,
            self.dialect,
            self.tables.join(", ")
        )
    }
}

/// setupコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct SetupCommandHandler {}

impl SetupCommandHandler {
    /// 新しいSetupCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// setupコマンドを実行
    pub async fn execute(&self, command: &SetupCommand) -> Result<SetupOutput> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;
        let engine = context.connect(&command.env).await?;

        engine
            .install()
            .await
            .with_context(|| "Failed to install metadata tables")?;
        let dialect = engine.dialect();
        engine.close().await;

        Ok(SetupOutput {
            environment: command.env.clone(),
            dialect,
            tables: vec![OBJECTS_TABLE.to_string(), FIELDS_TABLE.to_string()],
        })
    }
}
