// Adapters
// データベースへのアクセスを抽象化

pub mod connection_string;
pub mod database;
pub mod database_introspector;
pub mod field_repository;
pub mod metadata_schema;
pub mod object_repository;
pub mod record_repository;
pub mod row_reader;
pub mod sql_generator;
pub mod sql_quote;
pub mod type_mapping;
