// オブジェクトモデル
//
// 実行時に定義される論理エンティティ型と、その物理テーブル名を表現します。
// 物理テーブル名は作成時に一度だけ決定され、以後オブジェクト名を変更しても変わりません。

use serde::{Deserialize, Serialize};

/// 永続化されたオブジェクト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub object_uuid: String,
    pub object_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 物理テーブル名（作成後は不変）
    pub database_object: String,
    pub is_deleted: bool,
    pub created_at: String,
    pub created_by: String,
    pub last_updated_at: String,
    pub last_updated_by: String,
}

impl ObjectRecord {
    /// 物理テーブル名
    pub fn table_name(&self) -> &str {
        &self.database_object
    }
}

/// オブジェクト作成リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewObject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// 物理テーブル名を明示する場合のみ指定
    #[serde(default)]
    pub database_object: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl NewObject {
    /// 名前と説明を指定してリクエストを作成
    pub fn new(name: &str, description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            description: description.map(str::to_string),
            ..Default::default()
        }
    }
}

/// オブジェクト更新リクエスト
///
/// 物理テーブル名は更新対象に含まれません。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}
