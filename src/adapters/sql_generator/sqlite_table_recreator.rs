// SQLiteテーブル再作成サービス
//
// SQLiteはALTER COLUMN TYPEをサポートしていないため、
// テーブル再作成パターンで型変更を実現します。
// 生成したSQLは呼び出し側が単一トランザクション内で実行します。

use crate::adapters::sql_generator::build_create_table;
use crate::adapters::sql_quote::{quote_columns, quote_identifier};
use crate::core::naming::is_base_column;
use crate::core::schema::RawColumnInfo;

/// 再作成時に使用する一時テーブル名の接頭辞
const NEW_TABLE_PREFIX: &str = "new_";

/// SQLiteテーブル再作成サービス
pub struct SqliteTableRecreator {
    base_definitions: Vec<String>,
}

impl SqliteTableRecreator {
    /// 新しいSqliteTableRecreatorを作成
    ///
    /// # Arguments
    /// * `base_definitions` - 基本スキーマのカラム定義（再作成後も同じ定義を使用）
    pub fn new(base_definitions: Vec<String>) -> Self {
        Self { base_definitions }
    }

    /// テーブル再作成SQLを生成
    ///
    /// # Arguments
    /// * `table_name` - 対象テーブル名
    /// * `existing_columns` - 現在の物理カラム一覧（PRAGMA table_info の順序）
    /// * `column_name` - 型を変更するカラム名
    /// * `target_sql_type` - 変更後のSQL型文字列
    ///
    /// # Returns
    /// 以下の順序のSQL文ベクター:
    /// 1. DROP TABLE IF EXISTS new_{table}（前回の失敗の残骸を除去）
    /// 2. CREATE TABLE new_{table} (新スキーマ)
    /// 3. INSERT INTO new_{table} SELECT ... FROM {table}
    /// 4. DROP TABLE {table}
    /// 5. ALTER TABLE new_{table} RENAME TO {table}
    pub fn generate_table_recreation(
        &self,
        table_name: &str,
        existing_columns: &[RawColumnInfo],
        column_name: &str,
        target_sql_type: &str,
    ) -> Vec<String> {
        let new_table_name = format!("{}{}", NEW_TABLE_PREFIX, table_name);
        let quoted_table = quote_identifier(table_name);
        let quoted_new_table = quote_identifier(&new_table_name);

        vec![
            format!("DROP TABLE IF EXISTS {}", quoted_new_table),
            self.generate_create_table_with_name(
                &new_table_name,
                existing_columns,
                column_name,
                target_sql_type,
            ),
            self.generate_data_copy_sql(&new_table_name, table_name, existing_columns),
            format!("DROP TABLE {}", quoted_table),
            format!(
                "ALTER TABLE {} RENAME TO {}",
                quoted_new_table, quoted_table
            ),
        ]
    }

    /// 指定した名前でCREATE TABLE文を生成
    ///
    /// 基本カラムは固定定義を使い、ユーザーカラムは既存の型を引き継ぎます。
    fn generate_create_table_with_name(
        &self,
        table_name: &str,
        existing_columns: &[RawColumnInfo],
        column_name: &str,
        target_sql_type: &str,
    ) -> String {
        let mut definitions = self.base_definitions.clone();

        for column in existing_columns.iter().filter(|c| !is_base_column(&c.name)) {
            let sql_type = if column.name == column_name {
                target_sql_type
            } else {
                column.data_type.as_str()
            };
            let definition = if sql_type.is_empty() {
                quote_identifier(&column.name)
            } else {
                format!("{} {}", quote_identifier(&column.name), sql_type)
            };
            definitions.push(definition);
        }

        build_create_table(table_name, &definitions, false)
    }

    /// データコピーSQLを生成
    ///
    /// 再作成前後でカラム集合は同一のため、既存カラムをすべてコピーします。
    fn generate_data_copy_sql(
        &self,
        new_table_name: &str,
        table_name: &str,
        existing_columns: &[RawColumnInfo],
    ) -> String {
        let names: Vec<&str> = existing_columns.iter().map(|c| c.name.as_str()).collect();
        let column_list = quote_columns(&names);

        format!(
            "INSERT INTO {} ({}) SELECT {} FROM {}",
            quote_identifier(new_table_name),
            column_list,
            column_list,
            quote_identifier(table_name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data_type: &str) -> RawColumnInfo {
        RawColumnInfo {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: true,
            default_value: None,
        }
    }

    fn recreator() -> SqliteTableRecreator {
        SqliteTableRecreator::new(vec![
            "\"record_id\" INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            "\"record_uuid\" TEXT NOT NULL UNIQUE".to_string(),
        ])
    }

    #[test]
    fn test_generate_table_recreation_order() {
        let columns = vec![
            column("record_id", "INTEGER"),
            column("record_uuid", "TEXT"),
            column("title", "TEXT"),
            column("score", "TEXT"),
        ];

        let statements =
            recreator().generate_table_recreation("sph_object_task", &columns, "score", "NUMERIC");

        assert_eq!(statements.len(), 5);
        assert_eq!(statements[0], r#"DROP TABLE IF EXISTS "new_sph_object_task""#);
        assert!(statements[1].starts_with(r#"CREATE TABLE "new_sph_object_task""#));
        assert!(statements[2].starts_with(r#"INSERT INTO "new_sph_object_task""#));
        assert_eq!(statements[3], r#"DROP TABLE "sph_object_task""#);
        assert_eq!(
            statements[4],
            r#"ALTER TABLE "new_sph_object_task" RENAME TO "sph_object_task""#
        );
    }

    #[test]
    fn test_recreated_table_keeps_other_columns() {
        let columns = vec![
            column("record_id", "INTEGER"),
            column("record_uuid", "TEXT"),
            column("title", "TEXT"),
            column("score", "TEXT"),
        ];

        let statements =
            recreator().generate_table_recreation("sph_object_task", &columns, "score", "NUMERIC");
        let create = &statements[1];

        assert!(create.contains("\"record_id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(create.contains("\"title\" TEXT"));
        assert!(create.contains("\"score\" NUMERIC"));
        // 基本カラムは重複定義しない
        assert_eq!(create.matches("\"record_uuid\"").count(), 1);
    }

    #[test]
    fn test_data_copy_uses_all_columns() {
        let columns = vec![column("record_id", "INTEGER"), column("title", "TEXT")];

        let statements =
            recreator().generate_table_recreation("sph_object_task", &columns, "title", "INTEGER");

        assert_eq!(
            statements[2],
            r#"INSERT INTO "new_sph_object_task" ("record_id", "title") SELECT "record_id", "title" FROM "sph_object_task""#
        );
    }
}
