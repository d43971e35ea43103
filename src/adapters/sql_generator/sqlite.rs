// SQLite用DDLジェネレーター
//
// SQLiteはADD COLUMN IF NOT EXISTSとALTER COLUMN TYPEをサポートしないため、
// 追加は呼び出し側の存在確認で冪等にし、型変更はテーブル再作成で実現します。

use crate::adapters::sql_generator::sqlite_table_recreator::SqliteTableRecreator;
use crate::adapters::sql_generator::{build_create_table, DdlGenerator};
use crate::adapters::sql_quote::quote_identifier;
use crate::adapters::type_mapping::TypeMappingService;
use crate::core::config::Dialect;
use crate::core::naming::SYSTEM_USER;
use crate::core::schema::{ColumnType, RawColumnInfo};

/// SQLite用DDLジェネレーター
#[derive(Debug, Clone)]
pub struct SqliteDdlGenerator {
    type_mapping: TypeMappingService,
}

impl SqliteDdlGenerator {
    /// 新しいSqliteDdlGeneratorを作成
    pub fn new() -> Self {
        Self {
            type_mapping: TypeMappingService::new(Dialect::SQLite),
        }
    }
}

impl Default for SqliteDdlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DdlGenerator for SqliteDdlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn sql_type(&self, column_type: &ColumnType) -> String {
        self.type_mapping.to_sql_type(column_type)
    }

    fn base_column_definitions(&self) -> Vec<String> {
        vec![
            "\"record_id\" INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            "\"record_uuid\" TEXT NOT NULL UNIQUE".to_string(),
            "\"created_at\" TEXT DEFAULT CURRENT_TIMESTAMP".to_string(),
            format!("\"created_by\" TEXT DEFAULT '{}'", SYSTEM_USER),
            "\"last_updated_at\" TEXT DEFAULT CURRENT_TIMESTAMP".to_string(),
            format!("\"last_updated_by\" TEXT DEFAULT '{}'", SYSTEM_USER),
        ]
    }

    fn generate_create_object_table(&self, table_name: &str) -> String {
        build_create_table(table_name, &self.base_column_definitions(), true)
    }

    fn generate_add_column(
        &self,
        table_name: &str,
        column_name: &str,
        column_type: &ColumnType,
    ) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            quote_identifier(table_name),
            quote_identifier(column_name),
            self.sql_type(column_type)
        )
    }

    fn generate_retype_column(
        &self,
        table_name: &str,
        column_name: &str,
        _source_type: Option<&ColumnType>,
        target_type: &ColumnType,
        existing_columns: &[RawColumnInfo],
    ) -> Vec<String> {
        SqliteTableRecreator::new(self.base_column_definitions()).generate_table_recreation(
            table_name,
            existing_columns,
            column_name,
            &self.sql_type(target_type),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_create_object_table() {
        let generator = SqliteDdlGenerator::new();
        let sql = generator.generate_create_object_table("sph_object_task");

        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"sph_object_task\""));
        assert!(sql.contains("\"record_id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("\"record_uuid\" TEXT NOT NULL UNIQUE"));
        assert!(sql.contains("\"created_at\" TEXT DEFAULT CURRENT_TIMESTAMP"));
    }

    #[test]
    fn test_generate_add_column_without_if_not_exists() {
        let generator = SqliteDdlGenerator::new();
        let sql = generator.generate_add_column(
            "sph_object_task",
            "done",
            &ColumnType::BOOLEAN,
        );

        assert_eq!(sql, r#"ALTER TABLE "sph_object_task" ADD COLUMN "done" INTEGER"#);
    }

    #[test]
    fn test_generate_retype_column_recreates_table() {
        let generator = SqliteDdlGenerator::new();
        let columns = vec![
            RawColumnInfo {
                name: "record_id".to_string(),
                data_type: "INTEGER".to_string(),
                is_nullable: false,
                default_value: None,
            },
            RawColumnInfo {
                name: "score".to_string(),
                data_type: "TEXT".to_string(),
                is_nullable: true,
                default_value: None,
            },
        ];

        let statements = generator.generate_retype_column(
            "sph_object_task",
            "score",
            None,
            &ColumnType::INTEGER,
            &columns,
        );

        assert!(statements
            .iter()
            .any(|sql| sql.contains("\"score\" INTEGER")));
        assert!(statements
            .iter()
            .any(|sql| sql == r#"ALTER TABLE "new_sph_object_task" RENAME TO "sph_object_task""#));
    }
}
