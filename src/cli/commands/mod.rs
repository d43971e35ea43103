// コマンドハンドラー層
// 各CLIコマンドの実装

pub mod field;
pub mod init;
pub mod object;
pub mod record;
pub mod setup;

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;

/// コマンド出力
///
/// JSON出力はSerializeの結果、テキスト出力は `to_text` の結果を使用します。
pub trait CommandOutput: Serialize {
    fn to_text(&self) -> String;
}

/// 出力フォーマットに従って出力を文字列化
pub fn render_output<T: CommandOutput>(output: &T, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(output.to_text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(output).with_context(|| "Failed to serialize output")
        }
    }
}
