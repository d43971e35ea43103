// フィールドメタデータモデル
//
// オブジェクトに属するフィールド（属性）の永続化表現と、追加・更新リクエストを定義します。

use crate::core::error::ValidationError;
use crate::core::field_type::FieldType;
use crate::core::identifier::column_name_for;
use serde::{Deserialize, Serialize};

/// フィールドの型固有制約
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
    /// テキスト型の最大長
    #[serde(default)]
    pub max_length: Option<i64>,
    /// 数値型の最小値
    #[serde(default)]
    pub min_value: Option<f64>,
    /// 数値型の最大値
    #[serde(default)]
    pub max_value: Option<f64>,
    /// 小数を許可するか
    #[serde(default)]
    pub allow_decimal: bool,
    /// 小数点以下の桁数
    #[serde(default)]
    pub decimal_places: Option<i64>,
    /// 既定値
    #[serde(default)]
    pub default_value: Option<String>,
    /// Markdownとして表示するか
    #[serde(default)]
    pub markdown: bool,
}

impl FieldConstraints {
    /// 未指定の項目を現在値のまま残してパッチを適用
    pub fn merged(&self, patch: &ConstraintPatch) -> FieldConstraints {
        FieldConstraints {
            max_length: patch.max_length.or(self.max_length),
            min_value: patch.min_value.or(self.min_value),
            max_value: patch.max_value.or(self.max_value),
            allow_decimal: patch.allow_decimal.unwrap_or(self.allow_decimal),
            decimal_places: patch.decimal_places.or(self.decimal_places),
            default_value: patch
                .default_value
                .clone()
                .or_else(|| self.default_value.clone()),
            markdown: patch.markdown.unwrap_or(self.markdown),
        }
    }
}

/// 制約の部分更新
///
/// `None` の項目は変更しません（NULLで上書きしない）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintPatch {
    #[serde(default)]
    pub max_length: Option<i64>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub allow_decimal: Option<bool>,
    #[serde(default)]
    pub decimal_places: Option<i64>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub markdown: Option<bool>,
}

impl ConstraintPatch {
    /// 変更項目がないかどうか
    pub fn is_empty(&self) -> bool {
        self == &ConstraintPatch::default()
    }
}

/// 永続化されたフィールド
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub field_uuid: String,
    pub field_id: i64,
    pub object_uuid: String,
    pub name: String,
    pub label: String,
    pub description: Option<String>,
    pub field_type: FieldType,
    pub field_order: i64,
    pub created_by: String,
    pub created_at: String,
    pub last_updated_by: String,
    pub last_updated_at: String,
    #[serde(flatten)]
    pub constraints: FieldConstraints,
}

impl FieldRecord {
    /// 物理カラム名
    pub fn column_name(&self) -> Result<String, ValidationError> {
        column_name_for(&self.name)
    }
}

/// フィールド追加リクエスト
///
/// `field_type` は外部入力のまま受け取り、永続化前に検証されます。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    pub field_type: String,
    /// 正の値のみ有効。未指定・0以下は末尾に追加
    #[serde(default)]
    pub field_order: Option<i64>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(flatten)]
    pub constraints: FieldConstraints,
}

impl FieldSpec {
    /// 名前・ラベル・型を指定してリクエストを作成
    pub fn new(name: &str, label: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type: field_type.to_string(),
            ..Default::default()
        }
    }
}

/// フィールド更新リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub field_order: Option<i64>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(flatten)]
    pub constraints: ConstraintPatch,
}

/// 検証済みのフィールド更新内容
///
/// メタデータ層に渡す直前の形で、型は解析済みです。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdate {
    pub name: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub field_type: Option<FieldType>,
    pub field_order: Option<i64>,
    pub updated_by: String,
    pub constraints: ConstraintPatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_keeps_unspecified() {
        let current = FieldConstraints {
            max_length: Some(100),
            min_value: Some(1.0),
            allow_decimal: true,
            decimal_places: Some(2),
            default_value: Some("x".to_string()),
            ..Default::default()
        };
        let patch = ConstraintPatch {
            max_value: Some(9.0),
            decimal_places: Some(4),
            ..Default::default()
        };

        let merged = current.merged(&patch);
        assert_eq!(merged.max_length, Some(100));
        assert_eq!(merged.min_value, Some(1.0));
        assert_eq!(merged.max_value, Some(9.0));
        assert!(merged.allow_decimal);
        assert_eq!(merged.decimal_places, Some(4));
        assert_eq!(merged.default_value.as_deref(), Some("x"));
    }

    #[test]
    fn test_constraint_patch_is_empty() {
        assert!(ConstraintPatch::default().is_empty());
        assert!(!ConstraintPatch {
            markdown: Some(false),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_field_spec_from_json() {
        let spec: FieldSpec = serde_json::from_str(
            r#"{"name":"price","label":"Price","field_type":"number","allow_decimal":true,"decimal_places":2}"#,
        )
        .unwrap();

        assert_eq!(spec.field_type, "number");
        assert!(spec.constraints.allow_decimal);
        assert_eq!(spec.constraints.decimal_places, Some(2));
        assert_eq!(spec.field_order, None);
    }
}
