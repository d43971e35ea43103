// Core Domain
// 識別子の正規化、型マッピング、メタデータモデルなど、DBに依存しない純粋なロジック

pub mod config;
pub mod error;
pub mod field;
pub mod field_type;
pub mod identifier;
pub mod naming;
pub mod object;
pub mod schema;
pub mod sync;
pub mod type_mapper;
