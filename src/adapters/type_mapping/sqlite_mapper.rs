// SQLite用型マッパー

use super::TypeMapper;
use crate::core::schema::ColumnType;

/// SQLite用型マッパー
///
/// SQLiteは型アフィニティによる簡略化された型システムを持つため、
/// 長さや精度は型名に含めません。
pub struct SqliteTypeMapper;

impl TypeMapper for SqliteTypeMapper {
    fn format_sql_type(&self, column_type: &ColumnType) -> String {
        match column_type {
            ColumnType::INTEGER => "INTEGER".to_string(),
            ColumnType::VARCHAR { .. } => "TEXT".to_string(),
            ColumnType::TEXT => "TEXT".to_string(),
            ColumnType::BOOLEAN => "INTEGER".to_string(),
            ColumnType::DECIMAL { .. } => "NUMERIC".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sqlite_affinity() {
        let mapper = SqliteTypeMapper;

        assert_eq!(
            mapper.format_sql_type(&ColumnType::VARCHAR { length: 255 }),
            "TEXT"
        );
        assert_eq!(mapper.format_sql_type(&ColumnType::BOOLEAN), "INTEGER");
        assert_eq!(
            mapper.format_sql_type(&ColumnType::DECIMAL {
                precision: 38,
                scale: 3
            }),
            "NUMERIC"
        );
    }
}
