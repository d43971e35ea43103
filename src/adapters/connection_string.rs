// 接続文字列ビルダー
//
// DatabaseConfig と Dialect から接続文字列を生成する。

use crate::core::config::{DatabaseConfig, Dialect};
use urlencoding::encode;

/// 接続文字列を生成
///
/// ユーザー名とパスワードはパーセントエンコードされます。
/// SQLiteはファイルが存在しない場合に作成するモード（rwc）で開きます。
pub fn build_connection_string(dialect: Dialect, config: &DatabaseConfig) -> String {
    match dialect {
        Dialect::PostgreSQL => {
            let user = config.user.as_deref().unwrap_or("postgres");
            let encoded_user = encode(user);
            let auth = match config.password.as_deref() {
                Some(password) if !password.is_empty() => {
                    format!("{}:{}", encoded_user, encode(password))
                }
                _ => encoded_user.to_string(),
            };
            format!(
                "postgresql://{}@{}:{}/{}",
                auth,
                config.host,
                config.port_or_default(dialect),
                config.database
            )
        }
        Dialect::SQLite => format!("sqlite://{}?mode=rwc", config.database),
    }
}
