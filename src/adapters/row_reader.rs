// 行デコードヘルパー
//
// Anyドライバーは方言ごとに整数幅や真偽値の表現が異なるため、
// 取得時の差異をここで吸収します。

use crate::core::error::DatabaseError;
use sqlx::any::AnyRow;
use sqlx::Row;

fn decode_error(column: &str, error: sqlx::Error) -> DatabaseError {
    DatabaseError::Query {
        message: format!("Failed to decode column '{}': {}", column, error),
        sql: None,
    }
}

/// 文字列カラムを取得
pub fn get_string(row: &AnyRow, column: &str) -> Result<String, DatabaseError> {
    row.try_get::<String, _>(column)
        .map_err(|e| decode_error(column, e))
}

/// NULL許可の文字列カラムを取得
pub fn get_opt_string(row: &AnyRow, column: &str) -> Result<Option<String>, DatabaseError> {
    row.try_get::<Option<String>, _>(column)
        .map_err(|e| decode_error(column, e))
}

/// NULL許可の整数カラムを取得（INTEGER / BIGINT のどちらでも可）
pub fn get_opt_i64(row: &AnyRow, column: &str) -> Result<Option<i64>, DatabaseError> {
    row.try_get::<Option<i64>, _>(column)
        .or_else(|_| {
            row.try_get::<Option<i32>, _>(column)
                .map(|value| value.map(i64::from))
        })
        .map_err(|e| decode_error(column, e))
}

/// 整数カラムを取得
pub fn get_i64(row: &AnyRow, column: &str) -> Result<i64, DatabaseError> {
    get_opt_i64(row, column)?.ok_or_else(|| DatabaseError::Query {
        message: format!("Column '{}' is unexpectedly NULL", column),
        sql: None,
    })
}

/// NULL許可の浮動小数点カラムを取得
pub fn get_opt_f64(row: &AnyRow, column: &str) -> Result<Option<f64>, DatabaseError> {
    row.try_get::<Option<f64>, _>(column)
        .or_else(|_| {
            row.try_get::<Option<f32>, _>(column)
                .map(|value| value.map(f64::from))
        })
        .map_err(|e| decode_error(column, e))
}

/// 0/1 で保存された真偽値カラムを取得
pub fn get_flag(row: &AnyRow, column: &str) -> Result<bool, DatabaseError> {
    Ok(get_opt_i64(row, column)?.unwrap_or(0) != 0)
}

/// 真偽値を 0/1 で表現
pub fn flag(value: bool) -> i64 {
    i64::from(value)
}
