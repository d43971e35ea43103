// フィールド型
//
// オブジェクトに定義できるフィールド型の閉じた集合です。

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// フィールド型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    LongText,
    Number,
    Checkbox,
    Dropdown,
    Radio,
    Email,
    StarRating,
}

impl FieldType {
    /// サポートされるすべてのフィールド型
    pub const ALL: [FieldType; 8] = [
        FieldType::ShortText,
        FieldType::LongText,
        FieldType::Number,
        FieldType::Checkbox,
        FieldType::Dropdown,
        FieldType::Radio,
        FieldType::Email,
        FieldType::StarRating,
    ];

    /// 外部表現（snake_case）
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::ShortText => "short_text",
            FieldType::LongText => "long_text",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Dropdown => "dropdown",
            FieldType::Radio => "radio",
            FieldType::Email => "email",
            FieldType::StarRating => "star_rating",
        }
    }

    /// max_length制約を受け付けるテキスト型かどうか
    pub fn accepts_max_length(&self) -> bool {
        matches!(self, FieldType::ShortText | FieldType::LongText)
    }

    /// 数値制約を受け付けるかどうか
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|field_type| field_type.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedFieldType {
                value: s.to_string(),
            })
    }
}
