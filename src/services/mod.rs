// Services Layer
// ドメインロジックを実行するサービス層

pub mod config_loader;
pub mod config_serializer;
pub mod database_config_resolver;
pub mod engine;
pub mod field_service;
pub mod field_validator;
pub mod object_directory;
pub mod record_service;
pub mod schema_synchronizer;
