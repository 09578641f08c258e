//! chat コマンドの enum（Command Pattern）
//!
//! 一発実行の操作と対話モードの分岐を enum で明示する。

use common::domain::{ChatId, ModelName};

/// chat の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// ヘルプ表示
    Help,
    /// モデル一覧
    ListModels,
    /// チャット一覧（新しい順）
    ListChats,
    /// チャットの履歴を表示
    ShowChat { chat: ChatId, full: bool },
    /// チャットを丸ごと削除
    DeleteChat { chat: ChatId },
    /// assistant 応答とその直前の user メッセージを削除
    DeleteExchange { chat: ChatId, assistant_index: usize },
    /// 設定の更新（指定された項目だけ）
    Configure {
        endpoint: Option<String>,
        api_key: Option<String>,
        system: Option<String>,
        model: Option<ModelName>,
    },
    /// 1 回だけ送信（chat 未指定なら新規チャット）
    Send {
        chat: Option<ChatId>,
        model: Option<ModelName>,
        prompt: String,
    },
    /// 対話モード（REPL）
    Interactive {
        chat: Option<ChatId>,
        model: Option<ModelName>,
    },
}
