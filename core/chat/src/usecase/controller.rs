//! セッションコントローラ: 選択中のチャットと「新規チャット待ち」を管理する
//!
//! チャットは最初のプロンプト送信時に作る（索引に追加 → 空ログを保存 → 交換）。
//! 索引と設定は操作のたびに読み直し、選択中チャットのログだけをメモリに持つ。

use crate::domain::{remove_exchange, title_from_prompt, ChatIndex, ChatIndexEntry};
use crate::ports::outbound::{ChatIdGenerator, ChatStore, InterruptChecker, SettingsStore};
use crate::usecase::stream_session::{ExchangeContext, ExchangeReport, StreamingEngine};
use common::domain::{ChatId, ModelName};
use common::error::Error;
use common::msg::Message;
use common::ports::outbound::{now_iso8601, Log, LogLevel, LogRecord};
use std::sync::Arc;

/// コントローラの依存（wiring が組み立てる）
#[derive(Clone)]
pub struct ControllerDeps {
    pub store: Arc<dyn ChatStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub engine: StreamingEngine,
    pub id_gen: Arc<dyn ChatIdGenerator>,
    pub log: Arc<dyn Log>,
}

pub struct SessionController {
    deps: ControllerDeps,
    active: Option<ChatId>,
    pending: bool,
    messages: Vec<Message>,
}

impl SessionController {
    /// 起動直後は選択なし（最初の送信で新しいチャットを作る）
    pub fn new(deps: ControllerDeps) -> Self {
        Self {
            deps,
            active: None,
            pending: false,
            messages: Vec::new(),
        }
    }

    pub fn active_chat(&self) -> Option<&ChatId> {
        self.active.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// 索引（新しい順）。読めなければ空にしてログに残す
    pub fn list_chats(&self) -> ChatIndex {
        match self.deps.store.load_index() {
            Ok(index) => index,
            Err(e) => {
                self.warn(format!("Error loading chats: {}", e));
                ChatIndex::default()
            }
        }
    }

    /// 既存チャットを選択してログを読み込む。ログが読めなければ空で開く
    pub fn select_chat(&mut self, chat_id: &ChatId) -> Result<(), Error> {
        let index = self.deps.store.load_index()?;
        if !index.contains(chat_id) {
            return Err(Error::invalid_argument(format!("Unknown chat: {}", chat_id)));
        }
        self.messages = match self.deps.store.load_log(chat_id) {
            Ok(log) => log,
            Err(e) => {
                self.warn(format!("Error loading chat {}: {}", chat_id, e));
                Vec::new()
            }
        };
        self.active = Some(chat_id.clone());
        self.pending = false;
        Ok(())
    }

    /// 選択を外し、次の送信で新しいチャットを作る（保存先は変更しない）
    pub fn start_new_chat_pending(&mut self) {
        self.active = None;
        self.messages.clear();
        self.pending = true;
    }

    /// プロンプトを送る。選択中のチャットがなければ先に作成する
    pub fn submit_prompt(
        &mut self,
        text: &str,
        model: &ModelName,
        interrupt: &dyn InterruptChecker,
        on_update: &mut dyn FnMut(&str),
    ) -> Result<ExchangeReport, Error> {
        if text.trim().is_empty() {
            return Err(Error::invalid_argument("Prompt is empty"));
        }
        let chat_id = match self.active.clone() {
            Some(id) => id,
            None => self.create_chat(text)?,
        };
        let settings = self.deps.settings.load();
        let ctx = ExchangeContext {
            settings: &settings,
            model,
            interrupt,
        };
        self.deps
            .engine
            .run_exchange(&chat_id, &mut self.messages, text, &ctx, on_update)
    }

    /// assistant_index の応答と直前のプロンプトを消して保存する
    pub fn delete_exchange(&mut self, chat_id: &ChatId, assistant_index: usize) -> Result<(), Error> {
        if self.active.as_ref() == Some(chat_id) {
            remove_exchange(&mut self.messages, assistant_index)?;
            return self
                .deps
                .store
                .save_log(chat_id, &self.messages)
                .map_err(|e| e.with_context("Error saving chat"));
        }
        let index = self.deps.store.load_index()?;
        if !index.contains(chat_id) {
            return Err(Error::invalid_argument(format!("Unknown chat: {}", chat_id)));
        }
        let mut log = self.deps.store.load_log(chat_id)?;
        remove_exchange(&mut log, assistant_index)?;
        self.deps
            .store
            .save_log(chat_id, &log)
            .map_err(|e| e.with_context("Error saving chat"))
    }

    /// 索引から外してログも消す。ログ削除に失敗すると孤立ファイルが残る
    pub fn delete_chat(&mut self, chat_id: &ChatId) -> Result<(), Error> {
        let mut index = self.deps.store.load_index()?;
        if index.remove(chat_id).is_none() {
            return Err(Error::invalid_argument(format!("Unknown chat: {}", chat_id)));
        }
        self.deps
            .store
            .save_index(&index)
            .map_err(|e| e.with_context("Error saving chat index"))?;
        if self.active.as_ref() == Some(chat_id) {
            self.active = None;
            self.messages.clear();
        }
        self.deps.store.delete_log(chat_id).map_err(|e| {
            let e = e.with_context(format!("Error deleting chat {}", chat_id));
            self.warn(e.to_string());
            e
        })
    }

    fn create_chat(&mut self, prompt: &str) -> Result<ChatId, Error> {
        let mut index = self.deps.store.load_index()?;
        let id = self.deps.id_gen.next_id(&index);
        if index.contains(&id) {
            return Err(Error::io_msg(format!("Chat id already exists: {}", id)));
        }
        index.prepend(ChatIndexEntry::new(id.clone(), title_from_prompt(prompt)));
        self.deps
            .store
            .save_index(&index)
            .map_err(|e| e.with_context("Error saving chat index"))?;
        self.deps
            .store
            .save_log(&id, &[])
            .map_err(|e| e.with_context("Error saving chat"))?;
        self.active = Some(id.clone());
        self.pending = false;
        self.messages.clear();

        let mut fields = std::collections::BTreeMap::new();
        fields.insert("chat_id".to_string(), serde_json::json!(&*id));
        fields.insert("chats".to_string(), serde_json::json!(index.len()));
        let _ = self.deps.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "chat created".to_string(),
            layer: Some("usecase".to_string()),
            kind: Some("chat".to_string()),
            fields: Some(fields),
        });
        Ok(id)
    }

    fn warn(&self, message: String) {
        let _ = self.deps.log.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Warn,
            message,
            layer: Some("usecase".to_string()),
            kind: Some("error".to_string()),
            fields: None,
        });
    }
}
