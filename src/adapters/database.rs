// データベース接続アダプター
//
// SQLxのAnyドライバーを使用したデータベース接続の管理を行います。
// PostgreSQLとSQLiteに対応した統一されたインターフェースを提供します。

use crate::adapters::connection_string;
use crate::core::config::{DatabaseConfig, Dialect};
use crate::core::error::DatabaseError;
use sqlx::pool::PoolOptions;
use sqlx::{Any, AnyPool};
use std::time::Duration;
use tracing::debug;

/// 既定の最大接続数
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// SQLiteの最大接続数
///
/// 別接続で実行されたDDLの後に古いスキーマで文が準備されることがあるため、単一接続に制限します。
const SQLITE_MAX_CONNECTIONS: u32 = 1;

/// 既定の接続タイムアウト（秒）
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// データベース接続サービス
///
/// データベース接続プールの初期化と管理を行います。
#[derive(Debug, Clone, Default)]
pub struct DatabaseConnectionService;

impl DatabaseConnectionService {
    /// 新しいDatabaseConnectionServiceを作成
    pub fn new() -> Self {
        Self
    }

    /// データベース接続文字列を構築
    pub fn build_connection_string(&self, dialect: Dialect, config: &DatabaseConfig) -> String {
        connection_string::build_connection_string(dialect, config)
    }

    /// データベース接続プールを作成
    ///
    /// # Arguments
    ///
    /// * `dialect` - データベース方言
    /// * `config` - データベース設定
    ///
    /// # Returns
    ///
    /// 接続プールまたはエラー
    pub async fn create_pool(
        &self,
        dialect: Dialect,
        config: &DatabaseConfig,
    ) -> Result<AnyPool, DatabaseError> {
        let connection_string = self.build_connection_string(dialect, config);
        debug!(%dialect, database = %config.database, "creating connection pool");

        self.create_pool_options(dialect, config)
            .connect(&connection_string)
            .await
            .map_err(|e| DatabaseError::Connection {
                message: format!("Failed to create database connection pool: {}", dialect),
                cause: e.to_string(),
            })
    }

    /// 接続テストを実行
    pub async fn test_connection(&self, pool: &AnyPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseError::Connection {
                message: "Database connection test failed".to_string(),
                cause: e.to_string(),
            })
    }

    /// DatabaseConfigからプールオプションを作成
    ///
    /// timeout が未設定の場合は30秒を使用します。
    pub fn create_pool_options(&self, dialect: Dialect, config: &DatabaseConfig) -> PoolOptions<Any> {
        let timeout = config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_connections = match dialect {
            Dialect::PostgreSQL => DEFAULT_MAX_CONNECTIONS,
            Dialect::SQLite => SQLITE_MAX_CONNECTIONS,
        };

        PoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(timeout))
    }

    /// 接続プールを閉じる
    pub async fn close_pool(&self, pool: AnyPool) {
        pool.close().await;
    }
}

/// sqlxのエラーをDatabaseErrorに分類
///
/// 一意制約違反は呼び出し側が「既に存在する」結果へ変換できるよう区別します。
pub fn classify_error(error: sqlx::Error, sql: &str) -> DatabaseError {
    match error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DatabaseError::UniqueViolation {
                message: db_err.message().to_string(),
                constraint: db_err.constraint().map(str::to_string),
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DatabaseError::Connection {
                message: "Lost connection to the database".to_string(),
                cause: error.to_string(),
            }
        }
        other => DatabaseError::Query {
            message: other.to_string(),
            sql: Some(sql.to_string()),
        },
    }
}
