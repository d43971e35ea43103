// カラム型定義
//
// フィールド型から導出される方言非依存のカラム型を表現します。
// 方言ごとのSQL型文字列への変換は adapters::type_mapping が担当します。

use serde::{Deserialize, Serialize};

/// カラム型
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ColumnType {
    /// 整数型
    INTEGER,

    /// 可変長文字列型
    VARCHAR {
        /// 最大長
        length: u32,
    },

    /// テキスト型（長文）
    TEXT,

    /// 真偽値型
    BOOLEAN,

    /// 固定小数点数型
    DECIMAL {
        /// 全体の桁数
        precision: u32,
        /// 小数点以下の桁数 (0 <= scale <= precision)
        scale: u32,
    },
}

impl ColumnType {
    /// 文字列系の型かどうか
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::VARCHAR { .. } | ColumnType::TEXT)
    }
}

/// 物理テーブルの既存カラム情報
///
/// カタログから取得した値をそのまま保持します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumnInfo {
    /// カラム名
    pub name: String,
    /// データ型（DB固有の型文字列）
    pub data_type: String,
    /// NULL許可フラグ
    pub is_nullable: bool,
    /// デフォルト値
    pub default_value: Option<String>,
}
