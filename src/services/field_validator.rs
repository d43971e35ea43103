// フィールド検証サービス
//
// フィールドの必須属性、型、型固有の制約を検証します。
// 検証はすべて永続化やDDLの実行前に行います。

use crate::core::config::FieldLimits;
use crate::core::error::ValidationError;
use crate::core::field::{FieldConstraints, FieldSpec};
use crate::core::field_type::FieldType;
use crate::core::identifier::column_name_for;
use crate::core::type_mapper::MAX_DECIMAL_PLACES;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// 星評価の上限
const MAX_STAR_RATING: i64 = 5;

/// 検証済みの追加リクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedField {
    pub field_type: FieldType,
    pub column_name: String,
}

/// フィールド検証サービス
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    limits: FieldLimits,
}

impl FieldValidator {
    /// 新しいFieldValidatorを作成
    pub fn new(limits: FieldLimits) -> Self {
        Self { limits }
    }

    /// 追加リクエストを検証
    ///
    /// # Returns
    ///
    /// 解析済みのフィールド型と物理カラム名
    pub fn validate_new(&self, spec: &FieldSpec) -> Result<ValidatedField, ValidationError> {
        require("name", &spec.name)?;
        require("label", &spec.label)?;
        require("field_type", &spec.field_type)?;

        let field_type: FieldType = spec.field_type.trim().parse()?;
        let column_name = column_name_for(&spec.name)?;
        self.validate_constraints(field_type, &spec.constraints)?;

        Ok(ValidatedField {
            field_type,
            column_name,
        })
    }

    /// 更新後の名前を検証し、物理カラム名を返す
    pub fn validate_name(&self, name: &str) -> Result<String, ValidationError> {
        require("name", name)?;
        column_name_for(name)
    }

    /// 型固有の制約を検証
    pub fn validate_constraints(
        &self,
        field_type: FieldType,
        constraints: &FieldConstraints,
    ) -> Result<(), ValidationError> {
        if field_type.accepts_max_length() {
            self.validate_max_length(constraints.max_length)?;
        }

        let default_value = constraints
            .default_value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match field_type {
            FieldType::Number => validate_number(constraints, default_value),
            FieldType::Email => validate_email_default(default_value),
            FieldType::StarRating => validate_star_rating_default(default_value),
            _ => Ok(()),
        }
    }

    fn validate_max_length(&self, max_length: Option<i64>) -> Result<(), ValidationError> {
        let Some(max_length) = max_length else {
            return Ok(());
        };

        if max_length <= 0 {
            return Err(ValidationError::constraint(
                "max_length",
                "must be a positive integer",
            ));
        }
        if max_length > self.limits.max_text_length {
            return Err(ValidationError::constraint(
                "max_length",
                format!("must not exceed {}", self.limits.max_text_length),
            ));
        }

        Ok(())
    }
}

fn require(attribute: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(attribute));
    }
    Ok(())
}

fn validate_number(
    constraints: &FieldConstraints,
    default_value: Option<&str>,
) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (constraints.min_value, constraints.max_value) {
        if min >= max {
            return Err(ValidationError::constraint(
                "min_value",
                "must be less than max_value",
            ));
        }
    }

    if let Some(places) = constraints.decimal_places {
        if !(0..=MAX_DECIMAL_PLACES).contains(&places) {
            return Err(ValidationError::constraint(
                "decimal_places",
                format!("must be an integer between 0 and {}", MAX_DECIMAL_PLACES),
            ));
        }
    }

    if let Some(raw) = default_value {
        let value: f64 = raw
            .parse()
            .map_err(|_| ValidationError::constraint("default_value", "must be a number"))?;

        if constraints.min_value.is_some_and(|min| value < min) {
            return Err(ValidationError::constraint(
                "default_value",
                "must not be less than min_value",
            ));
        }
        if constraints.max_value.is_some_and(|max| value > max) {
            return Err(ValidationError::constraint(
                "default_value",
                "must not be greater than max_value",
            ));
        }
    }

    Ok(())
}

fn validate_email_default(default_value: Option<&str>) -> Result<(), ValidationError> {
    let Some(value) = default_value else {
        return Ok(());
    };

    let matches = EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value));
    if !matches {
        return Err(ValidationError::constraint(
            "default_value",
            "must be a valid email address",
        ));
    }

    Ok(())
}

fn validate_star_rating_default(default_value: Option<&str>) -> Result<(), ValidationError> {
    let Some(value) = default_value else {
        return Ok(());
    };

    match value.parse::<i64>() {
        Ok(rating) if (0..=MAX_STAR_RATING).contains(&rating) => Ok(()),
        _ => Err(ValidationError::constraint(
            "default_value",
            format!("must be an integer between 0 and {}", MAX_STAR_RATING),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> FieldValidator {
        FieldValidator::new(FieldLimits {
            max_text_length: 500,
        })
    }

    fn number(min: Option<f64>, max: Option<f64>) -> FieldConstraints {
        FieldConstraints {
            min_value: min,
            max_value: max,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_new_requires_attributes() {
        let err = validator()
            .validate_new(&FieldSpec::new("  ", "Email", "email"))
            .unwrap_err();
        assert!(err.is_missing_attribute());

        let err = validator()
            .validate_new(&FieldSpec::new("email", "", "email"))
            .unwrap_err();
        assert_eq!(err, ValidationError::missing("label"));

        let err = validator()
            .validate_new(&FieldSpec::new("email", "Email", ""))
            .unwrap_err();
        assert_eq!(err, ValidationError::missing("field_type"));
    }

    #[test]
    fn test_validate_new_rejects_unknown_type() {
        let err = validator()
            .validate_new(&FieldSpec::new("mood", "Mood", "emoji"))
            .unwrap_err();
        assert!(err.is_unsupported_field_type());
    }

    #[test]
    fn test_validate_new_rejects_reserved_column() {
        let err = validator()
            .validate_new(&FieldSpec::new("Record ID", "Record", "short_text"))
            .unwrap_err();
        assert!(err.is_reserved_identifier());
    }

    #[test]
    fn test_validate_new_returns_column() {
        let validated = validator()
            .validate_new(&FieldSpec::new("Contact Email", "Contact", "email"))
            .unwrap();

        assert_eq!(validated.field_type, FieldType::Email);
        assert_eq!(validated.column_name, "contact_email");
    }

    #[test]
    fn test_max_length_bounds() {
        let v = validator();
        let with_length = |n| FieldConstraints {
            max_length: Some(n),
            ..Default::default()
        };

        assert!(v
            .validate_constraints(FieldType::ShortText, &with_length(100))
            .is_ok());
        assert!(v
            .validate_constraints(FieldType::ShortText, &with_length(0))
            .unwrap_err()
            .is_constraint());
        assert!(v
            .validate_constraints(FieldType::LongText, &with_length(501))
            .is_err());
        // テキスト型以外では無視する
        assert!(v
            .validate_constraints(FieldType::Checkbox, &with_length(-1))
            .is_ok());
    }

    #[test]
    fn test_number_range() {
        let v = validator();

        assert!(v
            .validate_constraints(FieldType::Number, &number(Some(1.0), Some(5.0)))
            .is_ok());
        assert!(v
            .validate_constraints(FieldType::Number, &number(Some(10.0), Some(5.0)))
            .is_err());
        assert!(v
            .validate_constraints(FieldType::Number, &number(Some(5.0), Some(5.0)))
            .is_err());
        assert!(v
            .validate_constraints(FieldType::Number, &number(Some(10.0), None))
            .is_ok());
    }

    #[test]
    fn test_number_decimal_places() {
        let v = validator();
        let with_places = |p| FieldConstraints {
            allow_decimal: true,
            decimal_places: Some(p),
            ..Default::default()
        };

        assert!(v.validate_constraints(FieldType::Number, &with_places(0)).is_ok());
        assert!(v.validate_constraints(FieldType::Number, &with_places(10)).is_ok());
        assert!(v.validate_constraints(FieldType::Number, &with_places(11)).is_err());
        assert!(v.validate_constraints(FieldType::Number, &with_places(-1)).is_err());
    }

    #[test]
    fn test_number_default_value() {
        let v = validator();
        let mut constraints = number(Some(0.0), Some(100.0));

        constraints.default_value = Some("42.5".to_string());
        assert!(v.validate_constraints(FieldType::Number, &constraints).is_ok());

        constraints.default_value = Some("abc".to_string());
        assert!(v.validate_constraints(FieldType::Number, &constraints).is_err());

        constraints.default_value = Some("101".to_string());
        assert!(v.validate_constraints(FieldType::Number, &constraints).is_err());

        constraints.default_value = Some("   ".to_string());
        assert!(v.validate_constraints(FieldType::Number, &constraints).is_ok());
    }

    #[test]
    fn test_email_default_value() {
        let v = validator();
        let with_default = |value: &str| FieldConstraints {
            default_value: Some(value.to_string()),
            ..Default::default()
        };

        assert!(v
            .validate_constraints(FieldType::Email, &with_default("team@example.com"))
            .is_ok());
        assert!(v
            .validate_constraints(FieldType::Email, &with_default("not-an-email"))
            .is_err());
        assert!(v
            .validate_constraints(FieldType::Email, &with_default(""))
            .is_ok());
    }

    #[test]
    fn test_star_rating_default_value() {
        let v = validator();
        let with_default = |value: &str| FieldConstraints {
            default_value: Some(value.to_string()),
            ..Default::default()
        };

        assert!(v
            .validate_constraints(FieldType::StarRating, &with_default("5"))
            .is_ok());
        assert!(v
            .validate_constraints(FieldType::StarRating, &with_default("6"))
            .is_err());
        assert!(v
            .validate_constraints(FieldType::StarRating, &with_default("3.5"))
            .is_err());
    }
}
