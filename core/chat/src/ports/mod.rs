//! Ports & Adapters のポート定義
//!
//! - inbound: ドライバ（CLI）がアプリを呼び出すインターフェース
//! - outbound: アプリが外界（設定・チャット保存・LLM ストリーム・割り込み等）を使うための trait

pub mod inbound;
pub mod outbound;
