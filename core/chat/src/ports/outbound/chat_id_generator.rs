//! チャット ID 生成 Outbound ポート
//!
//! usecase は ChatIdGenerator を注入し、テストでは固定 ID を返す実装を渡せる。

use crate::domain::ChatIndex;
use common::domain::ChatId;

/// 新しいチャット ID を決める抽象（Outbound ポート）
pub trait ChatIdGenerator: Send + Sync {
    /// 現在の索引を見て ID を返す。索引との重複は呼び出し側で検査する。
    fn next_id(&self, index: &ChatIndex) -> ChatId;
}
