// SQL識別子クォートユーティリティ
//
// PostgreSQLとSQLiteはどちらもダブルクォートで識別子を囲みます。
// DDLに埋め込む識別子は必ずサニタイズ後にここを通します。

/// 識別子をダブルクォートで囲む
///
/// 識別子内のダブルクォートは二重にエスケープします。
///
/// # Examples
/// ```
/// use sphere::adapters::sql_quote::quote_identifier;
/// assert_eq!(quote_identifier("email"), r#""email""#);
/// assert_eq!(quote_identifier(r#"a"b"#), r#""a""b""#);
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// カラム名リストをクォートしてカンマ区切りで結合
pub fn quote_columns<S: AsRef<str>>(columns: &[S]) -> String {
    columns
        .iter()
        .map(|c| quote_identifier(c.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
