// PostgreSQL用DDLジェネレーター
//
// オンラインのADD/RENAME/ALTER TYPE/DROP COLUMNをそのまま利用します。

use crate::adapters::sql_generator::{build_create_table, DdlGenerator};
use crate::adapters::sql_quote::quote_identifier;
use crate::adapters::type_mapping::TypeMappingService;
use crate::core::config::Dialect;
use crate::core::naming::SYSTEM_USER;
use crate::core::schema::{ColumnType, RawColumnInfo};

/// PostgreSQL用DDLジェネレーター
#[derive(Debug, Clone)]
pub struct PostgresDdlGenerator {
    type_mapping: TypeMappingService,
}

impl PostgresDdlGenerator {
    /// 新しいPostgresDdlGeneratorを作成
    pub fn new() -> Self {
        Self {
            type_mapping: TypeMappingService::new(Dialect::PostgreSQL),
        }
    }

    /// USING句の変換式を生成
    ///
    /// 数値から真偽値、真偽値から数値への直接キャストは存在しないため中間型を経由します。
    fn using_expression(
        &self,
        quoted_column: &str,
        source_type: Option<&ColumnType>,
        target_type: &ColumnType,
    ) -> String {
        let target_sql = self.sql_type(target_type);
        match (source_type, target_type) {
            (_, ColumnType::BOOLEAN) => format!("{}::text::{}", quoted_column, target_sql),
            (Some(ColumnType::BOOLEAN), ColumnType::INTEGER | ColumnType::DECIMAL { .. }) => {
                format!("{}::integer::{}", quoted_column, target_sql)
            }
            _ => format!("{}::{}", quoted_column, target_sql),
        }
    }
}

impl Default for PostgresDdlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DdlGenerator for PostgresDdlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn sql_type(&self, column_type: &ColumnType) -> String {
        self.type_mapping.to_sql_type(column_type)
    }

    fn base_column_definitions(&self) -> Vec<String> {
        vec![
            "\"record_uuid\" VARCHAR(36) PRIMARY KEY".to_string(),
            "\"record_id\" BIGSERIAL UNIQUE NOT NULL".to_string(),
            "\"created_at\" TIMESTAMP DEFAULT NOW()".to_string(),
            format!("\"created_by\" VARCHAR(255) DEFAULT '{}'", SYSTEM_USER),
            "\"last_updated_at\" TIMESTAMP DEFAULT NOW()".to_string(),
            format!("\"last_updated_by\" VARCHAR(255) DEFAULT '{}'", SYSTEM_USER),
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
            "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
            quote_identifier(table_name),
            quote_identifier(column_name),
            self.sql_type(column_type)
        )
    }

    fn generate_retype_column(
        &self,
        table_name: &str,
        column_name: &str,
        source_type: Option<&ColumnType>,
        target_type: &ColumnType,
        _existing_columns: &[RawColumnInfo],
    ) -> Vec<String> {
        let quoted_column = quote_identifier(column_name);
        vec![format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {} USING {}",
            quote_identifier(table_name),
            quoted_column,
            self.sql_type(target_type),
            self.using_expression(&quoted_column, source_type, target_type)
        )]
    }

    fn generate_drop_column(&self, table_name: &str, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN IF EXISTS {}",
            quote_identifier(table_name),
            quote_identifier(column_name)
        )
    }
}
