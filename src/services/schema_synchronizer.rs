// スキーマ同期サービス
//
// フィールドメタデータの操作に合わせて、オブジェクトの物理テーブルを調整します。
// メタデータの書き込みとDDLは同一トランザクションではないため、
// 各操作は現在の物理スキーマを確認してから実行し、ずれていれば修復して SyncReport に記録します。

use crate::adapters::database::classify_error;
use crate::adapters::database_introspector::{create_introspector, SchemaIntrospector};
use crate::adapters::sql_generator::{create_ddl_generator, DdlGenerator};
use crate::core::config::Dialect;
use crate::core::error::DatabaseError;
use crate::core::schema::ColumnType;
use crate::core::sync::{ColumnChange, ColumnTarget, SchemaDrift, SyncReport};
use sqlx::AnyPool;
use tracing::{debug, info, warn};

/// スキーマ同期サービス
pub struct SchemaSynchronizer {
    pool: AnyPool,
    generator: Box<dyn DdlGenerator>,
    introspector: Box<dyn SchemaIntrospector>,
}

impl std::fmt::Debug for SchemaSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaSynchronizer")
            .field("dialect", &self.generator.dialect())
            .finish()
    }
}

impl SchemaSynchronizer {
    /// 新しいSchemaSynchronizerを作成
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self {
            pool,
            generator: create_ddl_generator(dialect),
            introspector: create_introspector(dialect),
        }
    }

    /// 方言ごとのSQL型文字列
    pub fn sql_type(&self, column_type: &ColumnType) -> String {
        self.generator.sql_type(column_type)
    }

    /// テーブルが存在するか
    pub async fn table_exists(&self, table: &str) -> Result<bool, DatabaseError> {
        self.introspector.table_exists(&self.pool, table).await
    }

    /// カラムが存在するか
    pub async fn column_exists(&self, table: &str, column: &str) -> Result<bool, DatabaseError> {
        self.introspector
            .column_exists(&self.pool, table, column)
            .await
    }

    /// テーブルが存在しなければ基本スキーマで作成
    ///
    /// # Returns
    ///
    /// 新たに作成した場合は true
    pub async fn ensure_table(&self, table: &str) -> Result<bool, DatabaseError> {
        if self.table_exists(table).await? {
            return Ok(false);
        }

        let sql = self.generator.generate_create_object_table(table);
        self.execute(&sql).await?;
        info!(table, "created object table");
        Ok(true)
    }

    /// カラムを追加（既に存在する場合は何もしない）
    ///
    /// # Returns
    ///
    /// 新たに追加した場合は true
    pub async fn add_column(&self, target: &ColumnTarget) -> Result<bool, DatabaseError> {
        if self.column_exists(&target.table, &target.column).await? {
            debug!(table = %target.table, column = %target.column, "column already present");
            return Ok(false);
        }

        let sql =
            self.generator
                .generate_add_column(&target.table, &target.column, &target.column_type);
        self.execute(&sql).await?;
        info!(table = %target.table, column = %target.column, "added column");
        Ok(true)
    }

    /// カラムをリネーム
    ///
    /// 変更前のカラムが存在しない場合は、変更後の名前と型でカラムを追加します。
    /// 変更後の名前が既に存在する場合は何もしません。
    pub async fn rename_column(&self, change: &ColumnChange) -> Result<SyncReport, DatabaseError> {
        let mut report = SyncReport::default();
        if !change.is_rename() {
            return Ok(report);
        }

        let source_exists = self
            .column_exists(&change.table, &change.old_column)
            .await?;
        if !source_exists {
            let drift = SchemaDrift::RenameSourceMissing {
                old_column: change.old_column.clone(),
                new_column: change.new_column.clone(),
            };
            warn!(table = %change.table, %drift, "schema drift repaired");
            report.record_drift(drift);
            report.column_added = self.add_column(&change.target()).await?;
            return Ok(report);
        }

        if self
            .column_exists(&change.table, &change.new_column)
            .await?
        {
            let drift = SchemaDrift::RenameTargetPresent {
                old_column: change.old_column.clone(),
                new_column: change.new_column.clone(),
            };
            warn!(table = %change.table, %drift, "schema drift repaired");
            report.record_drift(drift);
            return Ok(report);
        }

        let sql = self.generator.generate_rename_column(
            &change.table,
            &change.old_column,
            &change.new_column,
        );
        self.execute(&sql).await?;
        info!(
            table = %change.table,
            from = %change.old_column,
            to = %change.new_column,
            "renamed column"
        );
        report.column_renamed = true;
        Ok(report)
    }

    /// カラムの型を変更
    ///
    /// 対象カラムが存在しない場合は型変更を行わず、ドリフトとして報告します。
    pub async fn retype_column(
        &self,
        table: &str,
        column: &str,
        source_type: Option<&ColumnType>,
        target_type: &ColumnType,
    ) -> Result<SyncReport, DatabaseError> {
        let mut report = SyncReport::default();

        let columns = self.introspector.get_columns(&self.pool, table).await?;
        if !columns.iter().any(|c| c.name == column) {
            let drift = SchemaDrift::RetypeTargetMissing {
                column: column.to_string(),
            };
            warn!(table, %drift, "schema drift detected");
            report.record_drift(drift);
            return Ok(report);
        }

        let statements = self.generator.generate_retype_column(
            table,
            column,
            source_type,
            target_type,
            &columns,
        );
        self.execute_in_transaction(&statements).await?;
        info!(table, column, target = %self.sql_type(target_type), "altered column type");
        report.type_altered = true;
        Ok(report)
    }

    /// カラムを削除
    ///
    /// テーブルまたはカラムが存在しない場合は何もせず false を返します。
    pub async fn drop_column(&self, table: &str, column: &str) -> Result<bool, DatabaseError> {
        if !self.table_exists(table).await? {
            debug!(table, "table does not exist, nothing to drop");
            return Ok(false);
        }
        if !self.column_exists(table, column).await? {
            debug!(table, column, "column does not exist, nothing to drop");
            return Ok(false);
        }

        let sql = self.generator.generate_drop_column(table, column);
        self.execute(&sql).await?;
        info!(table, column, "dropped column");
        Ok(true)
    }

    /// フィールド追加時の物理化（テーブル作成 → カラム追加）
    pub async fn materialize(&self, target: &ColumnTarget) -> Result<SyncReport, DatabaseError> {
        let mut report = SyncReport {
            table_created: self.ensure_table(&target.table).await?,
            ..Default::default()
        };
        report.column_added = self.add_column(target).await?;
        Ok(report)
    }

    /// フィールド更新時の調整
    ///
    /// 実行順序: テーブル作成（不在時）→ リネームまたは不在カラムの追加 → 型変更。
    /// 型変更は方言上のSQL型が変わる場合のみ行います。
    pub async fn reconcile(&self, change: &ColumnChange) -> Result<SyncReport, DatabaseError> {
        let mut report = SyncReport::default();

        if !self.table_exists(&change.table).await? {
            let drift = SchemaDrift::TableMissing {
                table: change.table.clone(),
            };
            warn!(%drift, "schema drift repaired");
            report.record_drift(drift);
            report.absorb(self.materialize(&change.target()).await?);
            return Ok(report);
        }

        if change.is_rename() {
            report.absorb(self.rename_column(change).await?);
        } else if !self
            .column_exists(&change.table, &change.new_column)
            .await?
        {
            let drift = SchemaDrift::ColumnMissing {
                column: change.new_column.clone(),
            };
            warn!(table = %change.table, %drift, "schema drift repaired");
            report.record_drift(drift);
            report.column_added = self.add_column(&change.target()).await?;
        }

        // 追加したカラムは既に変更後の型を持つ
        let type_changed = self.sql_type(&change.source_type) != self.sql_type(&change.target_type);
        if type_changed && !report.column_added {
            report.absorb(
                self.retype_column(
                    &change.table,
                    &change.new_column,
                    Some(&change.source_type),
                    &change.target_type,
                )
                .await?,
            );
        }

        Ok(report)
    }

    async fn execute(&self, sql: &str) -> Result<(), DatabaseError> {
        debug!(%sql, "executing DDL");
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| classify_error(e, sql))?;
        Ok(())
    }

    async fn execute_in_transaction(&self, statements: &[String]) -> Result<(), DatabaseError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify_error(e, "BEGIN"))?;

        for sql in statements {
            debug!(%sql, "executing DDL");
            sqlx::query(sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| classify_error(e, sql))?;
        }

        tx.commit().await.map_err(|e| classify_error(e, "COMMIT"))
    }
}
