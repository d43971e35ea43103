// PostgreSQL用型マッパー

use super::TypeMapper;
use crate::core::schema::ColumnType;

/// PostgreSQL用型マッパー
pub struct PostgresTypeMapper;

impl TypeMapper for PostgresTypeMapper {
    fn format_sql_type(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::INTEGER => "INTEGER".to_string(),
            ColumnType::VARCHAR { length } => format!("VARCHAR({})", length),
            ColumnType::TEXT => "TEXT".to_string(),
            ColumnType::BOOLEAN => "BOOLEAN".to_string(),
            ColumnType::DECIMAL { precision, scale } => {
                format!("NUMERIC({}, {})", precision, scale)
            }
        }
    }
}
