// 命名ポリシー
//
// アプリケーション名、メタデータテーブル名、物理テーブルの命名規則の単一ソースを提供します。

/// 現行アプリケーション名
pub const APP_NAME: &str = "sphere";

/// 既定の設定ファイル名
pub const CONFIG_FILE: &str = ".sphere.yaml";

/// バイナリ名
pub const BINARY_NAME: &str = "sphere";

/// オブジェクトメタデータテーブル
pub const OBJECTS_TABLE: &str = "sph_objects";

/// フィールドメタデータテーブル
pub const FIELDS_TABLE: &str = "sph_object_fields";

/// 物理テーブル名の接頭辞
pub const OBJECT_TABLE_PREFIX: &str = "sph_object_";

/// 識別子の最大長
pub const MAX_IDENTIFIER_LENGTH: usize = 60;

/// 監査カラムの既定ユーザー
pub const SYSTEM_USER: &str = "system";

/// レコードUUIDカラム
pub const RECORD_UUID_COLUMN: &str = "record_uuid";

/// レコードIDカラム
pub const RECORD_ID_COLUMN: &str = "record_id";

/// 物理テーブルの基本カラム（フィールド名として使用不可）
pub const BASE_COLUMNS: [&str; 6] = [
    RECORD_UUID_COLUMN,
    RECORD_ID_COLUMN,
    "created_at",
    "created_by",
    "last_updated_at",
    "last_updated_by",
];

/// 呼び出し側のペイロードから設定できないカラム
pub const PROTECTED_COLUMNS: [&str; 2] = [RECORD_UUID_COLUMN, RECORD_ID_COLUMN];

/// 命名プロファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingProfile {
    pub app_name: String,
    pub config_path: String,
    pub binary_name: String,
    pub table_prefix: String,
}

/// 命名ポリシー
pub trait NamingPolicy {
    fn current() -> NamingProfile;
}

/// 既定の命名ポリシー
pub struct DefaultNamingPolicy;

impl NamingPolicy for DefaultNamingPolicy {
    fn current() -> NamingProfile {
        NamingProfile {
            app_name: APP_NAME.to_string(),
            config_path: CONFIG_FILE.to_string(),
            binary_name: BINARY_NAME.to_string(),
            table_prefix: OBJECT_TABLE_PREFIX.to_string(),
        }
    }
}

/// 基本カラムかどうか
pub fn is_base_column(name: &str) -> bool {
    BASE_COLUMNS.contains(&name)
}

/// 保護カラムかどうか
pub fn is_protected_column(name: &str) -> bool {
    PROTECTED_COLUMNS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_naming_profile() {
        let profile = DefaultNamingPolicy::current();

        assert_eq!(profile.app_name, "sphere");
        assert_eq!(profile.config_path, ".sphere.yaml");
        assert_eq!(profile.binary_name, "sphere");
        assert_eq!(profile.table_prefix, "sph_object_");
    }

    #[test]
    fn test_base_and_protected_columns() {
        assert!(is_base_column("record_id"));
        assert!(is_base_column("last_updated_by"));
        assert!(!is_base_column("email"));

        assert!(is_protected_column("record_uuid"));
        assert!(!is_protected_column("created_at"));
    }
}
