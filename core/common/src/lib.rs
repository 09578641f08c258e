//! llm-chat 共通ライブラリ
//!
//! `chat` コマンドが使うエラー型・ドメイン型・Outbound ポートと標準アダプタ、
//! OpenAI 互換プロバイダを提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// 会話メッセージ
pub mod msg;

/// Outbound ポート
pub mod ports;

/// ポートの標準実装
pub mod adapter;

/// LLM プロバイダとモデル一覧
pub mod llm;

/// チャット ID のパス検証
pub mod safe_chat_path;

#[cfg(test)]
mod test_server;
