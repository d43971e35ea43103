// Sphereライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメインロジック（識別子の正規化、型マッピング、メタデータモデル）
// - adapters: データベースへのアクセス（DDL生成、カタログ参照、リポジトリ）
// - services: オブジェクト・フィールド・レコード操作とスキーマ同期のオーケストレーション

pub mod cli;
pub mod core;
pub mod adapters;
pub mod services;
