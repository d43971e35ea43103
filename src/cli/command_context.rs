// コマンド共通コンテキスト
//
// 設定ファイル読み込み、エンジン接続、オブジェクト解決の重複をCLI層で集約する。

use crate::core::config::{Config, Dialect};
use crate::core::error::ErrorKind;
use crate::core::object::ObjectRecord;
use crate::services::config_loader::ConfigLoader;
use crate::services::engine::SchemaEngine;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// プロジェクトルートから設定を読み込んでコンテキストを作成
    pub fn load(project_path: PathBuf) -> Result<Self> {
        Self::load_with_config(project_path, None)
    }

    /// カスタム設定ファイルパスを指定してコンテキストを作成
    pub fn load_with_config(
        project_path: PathBuf,
        custom_config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config_path = custom_config_path
            .unwrap_or_else(|| project_path.join(Config::DEFAULT_CONFIG_PATH));

        if !config_path.exists() {
            return Err(anyhow!(
                "Config file not found: {:?}. Please create one first with the `init` command.",
                config_path
            ));
        }

        let config =
            ConfigLoader::from_file(&config_path).with_context(|| "Failed to read config file")?;

        Ok(Self {
            project_path,
            config_path,
            config,
        })
    }

    /// 指定環境のデータベースに接続してエンジンを作成
    ///
    /// SQLiteの相対パスは設定ファイルのあるディレクトリを基準に解決します。
    pub async fn connect(&self, environment: &str) -> Result<SchemaEngine> {
        let mut config = self.config.clone();
        if config.dialect == Dialect::SQLite {
            let base = self
                .config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.project_path.clone());
            for db_config in config.environments.values_mut() {
                let path = Path::new(&db_config.database);
                if path.is_relative() && db_config.database != ":memory:" {
                    db_config.database = base.join(path).to_string_lossy().into_owned();
                }
            }
        }

        SchemaEngine::connect(&config, environment).await
    }
}

/// オブジェクトをUUID・数値ID・名前の順で解決
pub async fn resolve_object(engine: &SchemaEngine, key: &str) -> Result<ObjectRecord> {
    match engine.objects().resolve_object(key).await {
        Ok(object) => Ok(object),
        Err(error) if error.kind() == ErrorKind::NotFound => engine
            .objects()
            .get_object_by_name(key)
            .await
            .map_err(|_| anyhow!(error)),
        Err(error) => Err(error.into()),
    }
}
