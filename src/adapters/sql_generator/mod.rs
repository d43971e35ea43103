// SQL生成アダプター
//
// オブジェクトの物理テーブルに対する各データベース方言用のDDL文を生成するアダプター層。
// 識別子はすべて呼び出し側でサニタイズ済みであることを前提に、ここでクォートします。

pub mod postgres;
pub mod sqlite;
pub mod sqlite_table_recreator;

pub use postgres::PostgresDdlGenerator;
pub use sqlite::SqliteDdlGenerator;

use crate::adapters::sql_quote::quote_identifier;
use crate::core::config::Dialect;
use crate::core::schema::{ColumnType, RawColumnInfo};

/// DDLジェネレータートレイト
///
/// 各データベース方言用のDDLジェネレーターが実装すべきインターフェース。
pub trait DdlGenerator: Send + Sync {
    /// 方言
    fn dialect(&self) -> Dialect;

    /// ColumnTypeを方言のSQL型文字列に変換
    fn sql_type(&self, column_type: &ColumnType) -> String;

    /// 基本スキーマ（サロゲートキーと監査カラム）でのCREATE TABLE文を生成
    ///
    /// # Arguments
    ///
    /// * `table_name` - テーブル名
    fn generate_create_object_table(&self, table_name: &str) -> String;

    /// 基本スキーマのカラム定義を生成
    fn base_column_definitions(&self) -> Vec<String>;

    /// ALTER TABLE ADD COLUMN文を生成
    ///
    /// # Arguments
    ///
    /// * `table_name` - テーブル名
    /// * `column_name` - 追加するカラム名
    /// * `column_type` - カラム型
    fn generate_add_column(
        &self,
        table_name: &str,
        column_name: &str,
        column_type: &ColumnType,
    ) -> String;

    /// ALTER TABLE RENAME COLUMN文を生成
    fn generate_rename_column(&self, table_name: &str, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {}",
            quote_identifier(table_name),
            quote_identifier(old_name),
            quote_identifier(new_name)
        )
    }

    /// カラムの型変更SQLを生成
    ///
    /// # Arguments
    ///
    /// * `table_name` - テーブル名
    /// * `column_name` - 対象カラム名
    /// * `source_type` - 変更前の型
    /// * `target_type` - 変更後の型
    /// * `existing_columns` - 現在の物理カラム一覧（テーブル再作成が必要な方言で使用）
    ///
    /// # Returns
    ///
    /// 順に実行するSQL文のリスト
    fn generate_retype_column(
        &self,
        table_name: &str,
        column_name: &str,
        source_type: Option<&ColumnType>,
        target_type: &ColumnType,
        existing_columns: &[RawColumnInfo],
    ) -> Vec<String>;

    /// ALTER TABLE DROP COLUMN文を生成
    fn generate_drop_column(&self, table_name: &str, column_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            quote_identifier(table_name),
            quote_identifier(column_name)
        )
    }
}

/// 方言に応じたDDLジェネレーターを作成
pub fn create_ddl_generator(dialect: Dialect) -> Box<dyn DdlGenerator> {
    match dialect {
        Dialect::PostgreSQL => Box::new(PostgresDdlGenerator::new()),
        Dialect::SQLite => Box::new(SqliteDdlGenerator::new()),
    }
}

/// CREATE TABLE文を組み立てる共通ヘルパー
pub(crate) fn build_create_table(table_name: &str, definitions: &[String], if_not_exists: bool) -> String {
    let clause = if if_not_exists { "IF NOT EXISTS " } else { "" };
    let body = definitions
        .iter()
        .map(|definition| format!("    {}", definition))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "CREATE TABLE {}{} (\n{}\n)",
        clause,
        quote_identifier(table_name),
        body
    )
}
