//! 連番のチャット ID（chat_<n>）を発行する ChatIdGenerator 実装

use crate::domain::ChatIndex;
use crate::ports::outbound::ChatIdGenerator;
use common::domain::ChatId;

const PREFIX: &str = "chat_";

/// 索引内の `chat_<n>` の最大値 + 1 を返す。該当がなければ chat_1
///
/// 桁あふれするときは最大値の ID をそのまま返す（呼び出し側で衝突として扱われる）。
pub struct SequentialChatIdGenerator;

impl ChatIdGenerator for SequentialChatIdGenerator {
    fn next_id(&self, index: &ChatIndex) -> ChatId {
        let max = index
            .iter()
            .filter_map(|e| e.id.strip_prefix(PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next = max.checked_add(1).unwrap_or(max);
        ChatId::new(format!("{}{}", PREFIX, next))
    }
}
