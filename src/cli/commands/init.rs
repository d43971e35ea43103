// initコマンドハンドラー
//
// 設定ファイル（.sphere.yaml）を生成します。
// - 方言に応じた既定の接続設定
// - 既存の設定ファイルの検出と警告

use crate::cli::commands::CommandOutput;
use crate::core::config::{Config, DatabaseConfig, Dialect, FieldLimits};
use crate::services::config_serializer::ConfigSerializer;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// initコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InitCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// 書き出し先（未指定時はプロジェクト直下の .sphere.yaml）
    pub config_path: Option<PathBuf>,
    /// データベース方言
    pub dialect: Dialect,
    /// 既存の設定を上書き
    pub force: bool,
    /// データベース名（SQLiteの場合はファイルパス）
    pub database_name: Option<String>,
}

/// initコマンドの出力
#[derive(Debug, Clone, Serialize)]
pub struct InitOutput {
    pub config_path: String,
    pub dialect: Dialect,
    pub database: String,
}

impl CommandOutput for InitOutput {
    fn to_text(&self) -> String {
        format!(
            "{} {} ({} / {})",
            "Created".green().bold(),
            self.config_path,
            self.dialect,
            self.database
        )
    }
}

/// initコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct InitCommandHandler {}

impl InitCommandHandler {
    /// 新しいInitCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// initコマンドを実行
    ///
    /// # Arguments
    ///
    /// * `command` - initコマンドのパラメータ
    ///
    /// # Returns
    ///
    /// 書き出した設定ファイルの情報
    pub fn execute(&self, command: &InitCommand) -> Result<InitOutput> {
        let config_path = command
            .config_path
            .clone()
            .unwrap_or_else(|| command.project_path.join(Config::DEFAULT_CONFIG_PATH));

        if config_path.exists() && !command.force {
            return Err(anyhow!(
                "Config file already exists: {:?}. Use --force option to overwrite it.",
                config_path
            ));
        }

        let config = self.default_config(command.dialect, command.database_name.as_deref());
        self.write_config(&config_path, &config)?;

        let database = config
            .get_database_config(Config::DEFAULT_ENVIRONMENT)?
            .database;
        Ok(InitOutput {
            config_path: config_path.display().to_string(),
            dialect: command.dialect,
            database,
        })
    }

    /// 方言に応じた既定の設定を作成
    pub fn default_config(&self, dialect: Dialect, database_name: Option<&str>) -> Config {
        let db_config = match dialect {
            Dialect::PostgreSQL => DatabaseConfig {
                host: "localhost".to_string(),
                port: Some(5432),
                database: database_name.unwrap_or("sphere_dev").to_string(),
                user: Some("postgres".to_string()),
                password: None,
                timeout: Some(30),
            },
            Dialect::SQLite => DatabaseConfig {
                host: "localhost".to_string(),
                port: None,
                database: database_name.unwrap_or("sphere_dev.db").to_string(),
                user: None,
                password: None,
                timeout: Some(30),
            },
        };

        let mut environments = BTreeMap::new();
        environments.insert(Config::DEFAULT_ENVIRONMENT.to_string(), db_config);

        Config {
            version: "1.0".to_string(),
            dialect,
            limits: FieldLimits::default(),
            environments,
        }
    }

    fn write_config(&self, config_path: &Path, config: &Config) -> Result<()> {
        let yaml = ConfigSerializer::to_yaml(config)?;
        fs::write(config_path, yaml)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))
    }
}
