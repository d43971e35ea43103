// データベース設定の解決サービス
//
// 環境変数による上書きをCLI/サービス層で扱い、coreは純粋な構造体に保つ。

use crate::core::config::DatabaseConfig;

/// データベース設定の解決ユーティリティ
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfigResolver;

impl DatabaseConfigResolver {
    /// 環境変数による上書きを適用
    ///
    /// DB_HOST, DB_PORT, DB_DATABASE, DB_USER, DB_PASSWORD を参照します。
    pub fn apply_env_overrides(base: &DatabaseConfig) -> DatabaseConfig {
        Self::apply_overrides(base, |key| std::env::var(key).ok())
    }

    /// 任意の値取得関数で上書きを適用
    pub fn apply_overrides<F>(base: &DatabaseConfig, lookup: F) -> DatabaseConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = base.clone();

        if let Some(host) = lookup("DB_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("DB_PORT").and_then(|p| p.parse::<u16>().ok()) {
            config.port = Some(port);
        }
        if let Some(database) = lookup("DB_DATABASE") {
            config.database = database;
        }
        if let Some(user) = lookup("DB_USER") {
            config.user = Some(user);
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            config.password = Some(password);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> DatabaseConfig {
        DatabaseConfig {
            host: "localhost".to_string(),
            port: Some(5432),
            database: "sphere_dev".to_string(),
            user: Some("postgres".to_string()),
            password: None,
            timeout: None,
        }
    }

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = [
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6432"),
            ("DB_PASSWORD", "secret"),
        ]
        .into_iter()
        .collect();

        let config =
            DatabaseConfigResolver::apply_overrides(&base(), |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, Some(6432));
        assert_eq!(config.database, "sphere_dev");
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let config = DatabaseConfigResolver::apply_overrides(&base(), |key| {
            (key == "DB_PORT").then(|| "not-a-port".to_string())
        });

        assert_eq!(config.port, Some(5432));
    }
}
