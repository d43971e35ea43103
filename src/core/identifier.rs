// 識別子サニタイザー
//
// 任意の入力文字列を、DDLに埋め込める決定的なSQL識別子へ変換します。
// テーブル名・カラム名はすべてこのモジュールを通してから引用符付けされます。

use crate::core::error::ValidationError;
use crate::core::naming::{is_base_column, MAX_IDENTIFIER_LENGTH, OBJECT_TABLE_PREFIX};
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").ok());

/// 入力文字列を安全な識別子に変換
///
/// 1. 前後の空白を除去して小文字化
/// 2. `[a-z0-9_]` 以外の連続を単一の `_` に置換
/// 3. 先頭の `[a-z_]` 以外の文字を除去
/// 4. 最大長で切り詰め
/// 5. `^[a-z_][a-z0-9_]*$` で検証
///
/// 英数字を1文字も含まない結果（`_` のみ）は空識別子とみなして拒否します。
///
/// 冪等です: `sanitize(sanitize(x)) == sanitize(x)`
pub fn sanitize(raw: &str) -> Result<String, ValidationError> {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return Err(invalid(raw, "identifier is empty"));
    }

    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_run = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            collapsed.push(c);
            in_run = false;
        } else if !in_run {
            collapsed.push('_');
            in_run = true;
        }
    }

    let stripped = collapsed.trim_start_matches(|c: char| !(c.is_ascii_lowercase() || c == '_'));
    if stripped.is_empty() {
        return Err(invalid(raw, "identifier is empty after sanitization"));
    }

    // ASCIIのみなのでバイト境界で切り詰めてよい
    let truncated = &stripped[..stripped.len().min(MAX_IDENTIFIER_LENGTH)];

    let matches_pattern = IDENTIFIER_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(truncated));
    if !matches_pattern {
        return Err(invalid(raw, "identifier contains invalid characters"));
    }

    if !truncated.chars().any(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid(raw, "identifier has no alphanumeric characters"));
    }

    Ok(truncated.to_string())
}

/// オブジェクト名から物理テーブル名を導出
///
/// `database_object` が指定されていればそれを優先します。
pub fn table_name_for(
    object_name: &str,
    database_object: Option<&str>,
) -> Result<String, ValidationError> {
    match database_object.map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => sanitize(explicit),
        None => sanitize(&format!("{}{}", OBJECT_TABLE_PREFIX, object_name)),
    }
}

/// フィールド名から物理カラム名を導出
pub fn column_name_for(field_name: &str) -> Result<String, ValidationError> {
    let column = sanitize(field_name)?;
    if is_base_column(&column) {
        return Err(ValidationError::ReservedIdentifier { name: column });
    }
    Ok(column)
}

fn invalid(raw: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidIdentifier {
        raw: raw.to_string(),
        reason: reason.to_string(),
    }
}
