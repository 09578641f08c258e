//! チャット保存 Outbound ポート
//!
//! 索引 1 つとチャットごとのメッセージログを、それぞれ独立した単位として丸ごと読み書きする。

use crate::domain::ChatIndex;
use common::domain::ChatId;
use common::error::Error;
use common::msg::Message;

/// チャット索引とメッセージログの保存先
///
/// 読み込みは「存在しなければ空」。存在するが読めない場合は Err（Error::Persistence）。
/// 書き込みは常に全体の上書き（追記やマージはしない）。
pub trait ChatStore: Send + Sync {
    fn load_index(&self) -> Result<ChatIndex, Error>;
    fn save_index(&self, index: &ChatIndex) -> Result<(), Error>;
    fn load_log(&self, id: &ChatId) -> Result<Vec<Message>, Error>;
    fn save_log(&self, id: &ChatId, log: &[Message]) -> Result<(), Error>;
    /// 存在しなければ何もしない
    fn delete_log(&self, id: &ChatId) -> Result<(), Error>;
}
