// 型マッピングサービス
//
// 方言に依存しない ColumnType から、方言ごとのSQL型文字列への変換を一元管理します。

mod postgres_mapper;
mod sqlite_mapper;

pub use postgres_mapper::PostgresTypeMapper;
pub use sqlite_mapper::SqliteTypeMapper;

use crate::core::config::Dialect;
use crate::core::error::ValidationError;
use crate::core::field::FieldConstraints;
use crate::core::field_type::FieldType;
use crate::core::schema::ColumnType;
use crate::core::type_mapper::map_field_type;

/// 方言固有の型マッピング
pub trait TypeMapper: Send + Sync {
    /// ColumnTypeからSQL型文字列へ変換
    fn format_sql_type(&self, column_type: &ColumnType) -> String;
}

/// 型マッピングサービス
pub struct TypeMappingService {
    dialect: Dialect,
    mapper: Box<dyn TypeMapper>,
}

impl Clone for TypeMappingService {
    fn clone(&self) -> Self {
        Self::new(self.dialect)
    }
}

impl std::fmt::Debug for TypeMappingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMappingService")
            .field("dialect", &self.dialect)
            .finish()
    }
}

impl TypeMappingService {
    /// 新しいTypeMappingServiceを作成
    pub fn new(dialect: Dialect) -> Self {
        let mapper: Box<dyn TypeMapper> = match dialect {
            Dialect::PostgreSQL => Box::new(PostgresTypeMapper),
            Dialect::SQLite => Box::new(SqliteTypeMapper),
        };
        Self { dialect, mapper }
    }

    /// 方言を取得
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// ColumnType -> SQL型文字列
    ///
    /// # Returns
    /// SQL型文字列（例: "VARCHAR(255)", "NUMERIC(38, 2)"）
    pub fn to_sql_type(&self, column_type: &ColumnType) -> String {
        self.mapper.format_sql_type(column_type)
    }
}

/// フィールド型と制約から方言ごとのカラム型式を導出
pub fn column_type_expression(
    dialect: Dialect,
    field_type: FieldType,
    constraints: &FieldConstraints,
) -> Result<String, ValidationError> {
    let column_type = map_field_type(field_type, constraints)?;
    Ok(TypeMappingService::new(dialect).to_sql_type(&column_type))
}
