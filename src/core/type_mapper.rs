// 型マッパー
//
// フィールド型と制約から方言非依存のカラム型を導出します。
// 規則は TYPE_RULES の表で一元管理し、条件分岐を散在させません。

use crate::core::error::ValidationError;
use crate::core::field::FieldConstraints;
use crate::core::field_type::FieldType;
use crate::core::schema::ColumnType;

/// 既定の文字列長
pub const DEFAULT_TEXT_LENGTH: u32 = 255;

/// 数値型の全体桁数
pub const DECIMAL_PRECISION: u32 = 38;

/// 数値型の既定スケール
pub const DEFAULT_DECIMAL_SCALE: u32 = 3;

/// 数値型で許可する最大スケール
pub const MAX_DECIMAL_PLACES: i64 = 10;

/// 型規則
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    /// max_length > 0 ならその長さ、それ以外は既定長のVARCHAR
    BoundedText { default_length: u32 },
    /// max_length > 0 ならVARCHAR、それ以外はTEXT
    OptionalBoundedText,
    /// allow_decimal ならdecimal_placesをスケールに、それ以外はスケール0
    Decimal { precision: u32, default_scale: u32 },
    /// 真偽値
    Boolean,
    /// 固定長のVARCHAR（制約を無視）
    FixedText { length: u32 },
    /// 整数
    Integer,
}

/// フィールド型ごとの型規則
pub static TYPE_RULES: [(FieldType, TypeRule); 8] = [
    (
        FieldType::ShortText,
        TypeRule::BoundedText {
            default_length: DEFAULT_TEXT_LENGTH,
        },
    ),
    (FieldType::LongText, TypeRule::OptionalBoundedText),
    (
        FieldType::Number,
        TypeRule::Decimal {
            precision: DECIMAL_PRECISION,
            default_scale: DEFAULT_DECIMAL_SCALE,
        },
    ),
    (FieldType::Checkbox, TypeRule::Boolean),
    (
        FieldType::Dropdown,
        TypeRule::FixedText {
            length: DEFAULT_TEXT_LENGTH,
        },
    ),
    (
        FieldType::Radio,
        TypeRule::FixedText {
            length: DEFAULT_TEXT_LENGTH,
        },
    ),
    (
        FieldType::Email,
        TypeRule::FixedText {
            length: DEFAULT_TEXT_LENGTH,
        },
    ),
    (FieldType::StarRating, TypeRule::Integer),
];

/// フィールド型に対応する型規則を取得
pub fn rule_for(field_type: FieldType) -> Option<TypeRule> {
    TYPE_RULES
        .iter()
        .find(|(candidate, _)| *candidate == field_type)
        .map(|(_, rule)| *rule)
}

impl TypeRule {
    /// 制約を適用してカラム型を生成
    pub fn apply(&self, constraints: &FieldConstraints) -> ColumnType {
        match *self {
            TypeRule::BoundedText { default_length } => ColumnType::VARCHAR {
                length: positive_length(constraints.max_length).unwrap_or(default_length),
            },
            TypeRule::OptionalBoundedText => match positive_length(constraints.max_length) {
                Some(length) => ColumnType::VARCHAR { length },
                None => ColumnType::TEXT,
            },
            TypeRule::Decimal {
                precision,
                default_scale,
            } => {
                let scale = if constraints.allow_decimal {
                    constraints
                        .decimal_places
                        .filter(|places| (0..=MAX_DECIMAL_PLACES).contains(places))
                        .and_then(|places| u32::try_from(places).ok())
                        .unwrap_or(default_scale)
                } else {
                    0
                };
                ColumnType::DECIMAL { precision, scale }
            }
            TypeRule::Boolean => ColumnType::BOOLEAN,
            TypeRule::FixedText { length } => ColumnType::VARCHAR { length },
            TypeRule::Integer => ColumnType::INTEGER,
        }
    }
}

/// フィールド型と制約からカラム型を導出
pub fn map_field_type(
    field_type: FieldType,
    constraints: &FieldConstraints,
) -> Result<ColumnType, ValidationError> {
    rule_for(field_type)
        .map(|rule| rule.apply(constraints))
        .ok_or_else(|| ValidationError::UnsupportedFieldType {
            value: field_type.to_string(),
        })
}

fn positive_length(max_length: Option<i64>) -> Option<u32> {
    max_length
        .filter(|length| *length > 0)
        .and_then(|length| u32::try_from(length).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_max_length(max_length: i64) -> FieldConstraints {
        FieldConstraints {
            max_length: Some(max_length),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_field_type_has_rule() {
        for field_type in FieldType::ALL {
            assert!(rule_for(field_type).is_some(), "{} has no rule", field_type);
        }
    }

    #[test]
    fn test_short_text() {
        let none = FieldConstraints::default();
        assert_eq!(
            map_field_type(FieldType::ShortText, &none).unwrap(),
            ColumnType::VARCHAR { length: 255 }
        );
        assert_eq!(
            map_field_type(FieldType::ShortText, &with_max_length(80)).unwrap(),
            ColumnType::VARCHAR { length: 80 }
        );
        assert_eq!(
            map_field_type(FieldType::ShortText, &with_max_length(0)).unwrap(),
            ColumnType::VARCHAR { length: 255 }
        );
    }

    #[test]
    fn test_long_text() {
        assert_eq!(
            map_field_type(FieldType::LongText, &FieldConstraints::default()).unwrap(),
            ColumnType::TEXT
        );
        assert_eq!(
            map_field_type(FieldType::LongText, &with_max_length(4000)).unwrap(),
            ColumnType::VARCHAR { length: 4000 }
        );
    }

    #[test]
    fn test_number_scale() {
        let integer_only = FieldConstraints {
            decimal_places: Some(5),
            ..Default::default()
        };
        assert_eq!(
            map_field_type(FieldType::Number, &integer_only).unwrap(),
            ColumnType::DECIMAL {
                precision: 38,
                scale: 0
            }
        );

        let default_scale = FieldConstraints {
            allow_decimal: true,
            ..Default::default()
        };
        assert_eq!(
            map_field_type(FieldType::Number, &default_scale).unwrap(),
            ColumnType::DECIMAL {
                precision: 38,
                scale: 3
            }
        );

        let explicit = FieldConstraints {
            allow_decimal: true,
            decimal_places: Some(10),
            ..Default::default()
        };
        assert_eq!(
            map_field_type(FieldType::Number, &explicit).unwrap(),
            ColumnType::DECIMAL {
                precision: 38,
                scale: 10
            }
        );
    }

    #[test]
    fn test_fixed_types_ignore_constraints() {
        let constraints = with_max_length(20);
        for field_type in [FieldType::Dropdown, FieldType::Radio, FieldType::Email] {
            assert_eq!(
                map_field_type(field_type, &constraints).unwrap(),
                ColumnType::VARCHAR { length: 255 }
            );
        }
        assert_eq!(
            map_field_type(FieldType::Checkbox, &constraints).unwrap(),
            ColumnType::BOOLEAN
        );
        assert_eq!(
            map_field_type(FieldType::StarRating, &constraints).unwrap(),
            ColumnType::INTEGER
        );
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let constraints = FieldConstraints {
            max_length: Some(42),
            allow_decimal: true,
            decimal_places: Some(2),
            ..Default::default()
        };
        for field_type in FieldType::ALL {
            assert_eq!(
                map_field_type(field_type, &constraints).unwrap(),
                map_field_type(field_type, &constraints.clone()).unwrap()
            );
        }
    }

    #[test]
    fn test_unknown_type_rejected_before_mapping() {
        let err = "signature".parse::<FieldType>().unwrap_err();
        assert!(err.is_unsupported_field_type());
    }
}
