// スキーマエンジン
//
// 接続プールと方言を保持し、オブジェクトディレクトリ・フィールドメタデータストア・
// レコードサービスをまとめて提供するファサードです。

use crate::adapters::database::DatabaseConnectionService;
use crate::adapters::metadata_schema::MetadataSchema;
use crate::core::config::{Config, Dialect, FieldLimits};
use crate::core::error::DatabaseError;
use crate::services::database_config_resolver::DatabaseConfigResolver;
use crate::services::field_service::FieldService;
use crate::services::object_directory::ObjectDirectory;
use crate::services::record_service::RecordService;
use anyhow::{Context, Result};
use sqlx::AnyPool;
use tracing::info;

/// スキーマエンジン
#[derive(Debug)]
pub struct SchemaEngine {
    pool: AnyPool,
    dialect: Dialect,
    objects: ObjectDirectory,
    fields: FieldService,
    records: RecordService,
}

impl SchemaEngine {
    /// 設定ファイルの環境定義から接続してエンジンを作成
    ///
    /// 環境変数（DB_HOST など）による上書きを適用してから接続します。
    pub async fn connect(config: &Config, environment: &str) -> Result<Self> {
        let db_config = config.get_database_config(environment)?;
        let db_config = DatabaseConfigResolver::apply_env_overrides(&db_config);

        let pool = DatabaseConnectionService::new()
            .create_pool(config.dialect, &db_config)
            .await
            .with_context(|| format!("Failed to connect to environment '{}'", environment))?;

        Ok(Self::from_pool(pool, config.dialect, config.limits))
    }

    /// 既存の接続プールからエンジンを作成
    pub fn from_pool(pool: AnyPool, dialect: Dialect, limits: FieldLimits) -> Self {
        Self {
            objects: ObjectDirectory::new(pool.clone(), dialect),
            fields: FieldService::new(pool.clone(), dialect, limits),
            records: RecordService::new(pool.clone(), dialect),
            pool,
            dialect,
        }
    }

    /// メタデータテーブルを作成（既に存在する場合は何もしない）
    pub async fn install(&self) -> Result<(), DatabaseError> {
        MetadataSchema::new().install(&self.pool, self.dialect).await?;
        info!(dialect = %self.dialect, "metadata tables installed");
        Ok(())
    }

    pub fn objects(&self) -> &ObjectDirectory {
        &self.objects
    }

    pub fn fields(&self) -> &FieldService {
        &self.fields
    }

    pub fn records(&self) -> &RecordService {
        &self.records
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// 接続プールを閉じる
    pub async fn close(self) {
        DatabaseConnectionService::new().close_pool(self.pool).await;
    }
}
