// スキーマ同期の結果モデル
//
// メタデータと物理スキーマの差異（ドリフト）と、同期処理で実行されたDDLの結果を表現します。

use crate::core::schema::ColumnType;
use serde::Serialize;
use std::fmt;

/// 物理化対象のカラム
///
/// フィールドメタデータから同期処理へ渡す唯一の契約です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTarget {
    /// 物理テーブル名（サニタイズ済み）
    pub table: String,
    /// 物理カラム名（サニタイズ済み）
    pub column: String,
    /// カラム型
    pub column_type: ColumnType,
}

impl ColumnTarget {
    pub fn new(table: impl Into<String>, column: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            column_type,
        }
    }
}

/// 既存カラムの変更内容（リネームと型変更）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChange {
    /// 物理テーブル名
    pub table: String,
    /// 変更前のカラム名
    pub old_column: String,
    /// 変更後のカラム名（リネームしない場合は old_column と同じ）
    pub new_column: String,
    /// 変更前の型
    pub source_type: ColumnType,
    /// 変更後の型
    pub target_type: ColumnType,
}

impl ColumnChange {
    /// リネームを伴うかどうか
    pub fn is_rename(&self) -> bool {
        self.old_column != self.new_column
    }

    /// 変更後のカラム
    pub fn target(&self) -> ColumnTarget {
        ColumnTarget::new(
            self.table.clone(),
            self.new_column.clone(),
            self.target_type.clone(),
        )
    }
}

/// 検出・修復されたスキーマドリフト
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaDrift {
    /// 更新対象の物理テーブルが存在しなかった
    TableMissing { table: String },
    /// メタデータに対応するカラムが存在しなかった
    ColumnMissing { column: String },
    /// リネーム元のカラムが存在しなかった（新しい名前で追加）
    RenameSourceMissing { old_column: String, new_column: String },
    /// リネーム先のカラムが既に存在した（何もしない）
    ///
    /// 旧カラムとそのデータは残り、以後の操作では削除されません。
    RenameTargetPresent { old_column: String, new_column: String },
    /// 型変更対象のカラムが存在しなかった（型変更をスキップ）
    RetypeTargetMissing { column: String },
}

impl fmt::Display for SchemaDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDrift::TableMissing { table } => write!(f, "table '{}' was missing", table),
            SchemaDrift::ColumnMissing { column } => write!(f, "column '{}' was missing", column),
            SchemaDrift::RenameSourceMissing {
                old_column,
                new_column,
            } => write!(
                f,
                "rename source '{}' was missing, added '{}'",
                old_column, new_column
            ),
            SchemaDrift::RenameTargetPresent {
                old_column,
                new_column,
            } => write!(
                f,
                "rename target '{}' already existed; old column '{}' and its data were left in place and must be dropped manually",
                new_column, old_column
            ),
            SchemaDrift::RetypeTargetMissing { column } => {
                write!(f, "retype target '{}' was missing", column)
            }
        }
    }
}

/// 同期処理の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub table_created: bool,
    pub column_added: bool,
    pub column_renamed: bool,
    pub type_altered: bool,
    pub column_dropped: bool,
    pub drift: Vec<SchemaDrift>,
}

impl SyncReport {
    /// 別の結果を取り込む
    pub fn absorb(&mut self, other: SyncReport) {
        self.table_created |= other.table_created;
        self.column_added |= other.column_added;
        self.column_renamed |= other.column_renamed;
        self.type_altered |= other.type_altered;
        self.column_dropped |= other.column_dropped;
        self.drift.extend(other.drift);
    }

    /// ドリフトを記録
    pub fn record_drift(&mut self, drift: SchemaDrift) {
        self.drift.push(drift);
    }

    /// ドリフトが検出されたかどうか
    pub fn has_drift(&self) -> bool {
        !self.drift.is_empty()
    }

    /// DDLを一切実行しなかったかどうか
    pub fn is_noop(&self) -> bool {
        !(self.table_created
            || self.column_added
            || self.column_renamed
            || self.type_altered
            || self.column_dropped)
    }
}
