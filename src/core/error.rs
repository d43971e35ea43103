// エラー型定義
//
// スキーマエンジン全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、ValidationError, DatabaseError, EngineError を定義します。

use std::fmt;
use thiserror::Error;

/// バリデーションエラー
///
/// 変更系のストレージ呼び出しより前に検出される入力エラーを表現します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Missing required attribute
    #[error("Missing required attribute: {attribute}")]
    MissingAttribute {
        /// 属性名
        attribute: String,
    },

    /// Invalid identifier
    #[error("Invalid identifier '{raw}': {reason}")]
    InvalidIdentifier {
        /// 入力値
        raw: String,
        /// 不正な理由
        reason: String,
    },

    /// Reserved identifier
    #[error("Identifier '{name}' is reserved for system columns")]
    ReservedIdentifier {
        /// 識別子
        name: String,
    },

    /// Unsupported field type
    #[error("Unsupported field type: '{value}'")]
    UnsupportedFieldType {
        /// 入力値
        value: String,
    },

    /// Constraint error
    #[error("Constraint error on '{attribute}': {message}")]
    Constraint {
        /// 対象の制約属性
        attribute: String,
        /// エラーメッセージ
        message: String,
    },
}

impl ValidationError {
    /// 制約エラーを作成
    pub fn constraint(attribute: &str, message: impl Into<String>) -> Self {
        ValidationError::Constraint {
            attribute: attribute.to_string(),
            message: message.into(),
        }
    }

    /// 必須属性エラーを作成
    pub fn missing(attribute: &str) -> Self {
        ValidationError::MissingAttribute {
            attribute: attribute.to_string(),
        }
    }

    /// 必須属性エラーかどうか
    pub fn is_missing_attribute(&self) -> bool {
        matches!(self, ValidationError::MissingAttribute { .. })
    }

    /// 識別子エラーかどうか
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, ValidationError::InvalidIdentifier { .. })
    }

    /// 予約識別子エラーかどうか
    pub fn is_reserved_identifier(&self) -> bool {
        matches!(self, ValidationError::ReservedIdentifier { .. })
    }

    /// 未対応フィールド型エラーかどうか
    pub fn is_unsupported_field_type(&self) -> bool {
        matches!(self, ValidationError::UnsupportedFieldType { .. })
    }

    /// 制約エラーかどうか
    pub fn is_constraint(&self) -> bool {
        matches!(self, ValidationError::Constraint { .. })
    }
}

/// データベースエラー
///
/// アダプター層でのデータベース操作時に発生するエラーを表現します。
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Database connection error: {message} (cause: {cause})")]
    Connection {
        /// エラーメッセージ
        message: String,
        /// エラー原因
        cause: String,
    },

    /// Query execution error
    #[error("Query execution error: {message}")]
    Query {
        /// エラーメッセージ
        message: String,
        /// 失敗したSQL
        sql: Option<String>,
    },

    /// Unique constraint violation
    #[error("Unique constraint violation: {message}")]
    UniqueViolation {
        /// エラーメッセージ
        message: String,
        /// 違反した制約名
        constraint: Option<String>,
    },
}

impl DatabaseError {
    /// 接続エラーかどうか
    pub fn is_connection(&self) -> bool {
        matches!(self, DatabaseError::Connection { .. })
    }

    /// クエリエラーかどうか
    pub fn is_query(&self) -> bool {
        matches!(self, DatabaseError::Query { .. })
    }

    /// 一意制約違反かどうか
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation { .. })
    }
}

/// エンティティ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Object,
    Field,
    Record,
    Table,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Object => write!(f, "Object"),
            EntityKind::Field => write!(f, "Field"),
            EntityKind::Record => write!(f, "Record"),
            EntityKind::Table => write!(f, "Table"),
        }
    }
}

/// エラー分類
///
/// 上位のトランスポート層が応答コードを決めるための分類です。
/// スキーマドリフトの修復はエラーではなく `SyncReport::drift` で報告されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    OwnershipMismatch,
    Conflict,
    StorageFailure,
}

/// スキーマエンジンのエラー
#[derive(Debug, Error)]
pub enum EngineError {
    /// Validation failure (raised before any mutating storage call)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Object, field or record not found
    #[error("{entity} not found: {key}")]
    NotFound {
        /// エンティティ種別
        entity: EntityKind,
        /// 検索キー
        key: String,
    },

    /// Field does not belong to the object
    #[error("Field {field_uuid} does not belong to object {object_uuid}")]
    OwnershipMismatch {
        /// フィールドUUID
        field_uuid: String,
        /// リクエストされたオブジェクトUUID
        object_uuid: String,
    },

    /// Late uniqueness violation outside the soft-outcome paths
    #[error("Conflict: {message}")]
    Conflict {
        /// エラーメッセージ
        message: String,
    },

    /// Storage failure
    #[error(transparent)]
    Storage(DatabaseError),
}

impl From<DatabaseError> for EngineError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::UniqueViolation { message, .. } => EngineError::Conflict { message },
            other => EngineError::Storage(other),
        }
    }
}

impl EngineError {
    /// NotFoundエラーを作成
    pub fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// エラー分類を取得
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation(_) => ErrorKind::Validation,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::OwnershipMismatch { .. } => ErrorKind::OwnershipMismatch,
            EngineError::Conflict { .. } => ErrorKind::Conflict,
            EngineError::Storage(_) => ErrorKind::StorageFailure,
        }
    }

    /// HTTP相当のステータスコード
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::OwnershipMismatch => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::StorageFailure => 500,
        }
    }

    /// クライアント起因のエラーかどうか
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// スキーマエンジンの結果型
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_predicates() {
        let error = ValidationError::missing("field_name");
        assert!(error.is_missing_attribute());
        assert!(!error.is_constraint());
        assert_eq!(error.to_string(), "Missing required attribute: field_name");

        let error = ValidationError::constraint("min_value", "must be less than max_value");
        assert!(error.is_constraint());
        assert!(error.to_string().contains("min_value"));
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let error: EngineError = DatabaseError::UniqueViolation {
            message: "duplicate key".to_string(),
            constraint: Some("idx_sph_object_fields_object_name_lower".to_string()),
        }
        .into();

        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.status_code(), 409);
    }

    #[test]
    fn test_query_error_maps_to_storage_failure() {
        let error: EngineError = DatabaseError::Query {
            message: "syntax error".to_string(),
            sql: Some("ALTER TABLE".to_string()),
        }
        .into();

        assert_eq!(error.kind(), ErrorKind::StorageFailure);
        assert_eq!(error.status_code(), 500);
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_status_codes() {
        let error: EngineError = ValidationError::UnsupportedFieldType {
            value: "color".to_string(),
        }
        .into();
        assert_eq!(error.status_code(), 400);

        let error = EngineError::not_found(EntityKind::Field, "abc");
        assert_eq!(error.status_code(), 404);
        assert_eq!(error.to_string(), "Field not found: abc");

        let error = EngineError::OwnershipMismatch {
            field_uuid: "f".to_string(),
            object_uuid: "o".to_string(),
        };
        assert_eq!(error.kind(), ErrorKind::OwnershipMismatch);
        assert!(error.is_client_error());
    }
}
