//! チャット索引とメッセージログ
//!
//! 索引は新しいものが先頭（prepend）。タイトルは作成時に 1 度だけ決める。

use common::domain::ChatId;
use common::error::Error;
use common::msg::{Message, Role};
use serde::{Deserialize, Serialize};

/// タイトルに使う先頭の単語数
pub const TITLE_WORDS: usize = 4;

/// 1 チャットのメッセージ列（system メッセージは保存しない）
pub type MessageLog = Vec<Message>;

/// 索引 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatIndexEntry {
    pub id: ChatId,
    pub title: String,
}

impl ChatIndexEntry {
    pub fn new(id: ChatId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// チャット索引（`{"chats":[...]}`、並び順＝新しい順）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatIndex {
    #[serde(default)]
    pub chats: Vec<ChatIndexEntry>,
}

impl ChatIndex {
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn contains(&self, id: &ChatId) -> bool {
        self.chats.iter().any(|c| &c.id == id)
    }


    /// 先頭に追加する（最新が先頭）
    pub fn prepend(&mut self, entry: ChatIndexEntry) {
        self.chats.insert(0, entry);
    }

    /// ID が一致するエントリを取り除いて返す
    pub fn remove(&mut self, id: &ChatId) -> Option<ChatIndexEntry> {
        let pos = self.chats.iter().position(|c| &c.id == id)?;
        Some(self.chats.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatIndexEntry> {
        self.chats.iter()
    }
}

/// 最初のプロンプトからタイトルを作る（空白区切りの先頭 4 語）
pub fn title_from_prompt(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// assistant_index の応答と直前の user メッセージを取り除く
///
/// 範囲外、または user→assistant の組になっていなければ Invariant エラーでログは変えない。
pub fn remove_exchange(log: &mut MessageLog, assistant_index: usize) -> Result<(), Error> {
    if assistant_index < 1 || assistant_index >= log.len() {
        return Err(Error::invariant(format!(
            "no exchange at index {} (log has {} messages)",
            assistant_index,
            log.len()
        )));
    }
    if log[assistant_index].role != Role::Assistant || log[assistant_index - 1].role != Role::User {
        return Err(Error::invariant(format!(
            "message {} is not an assistant reply to a user prompt",
            assistant_index
        )));
    }
    log.drain(assistant_index - 1..=assistant_index);
    Ok(())
}
