//! 1 回の交換を実行するストリーミングエンジン
//!
//! user メッセージを先にログへ追加し、ログ全体からリクエストを組み立てる。
//! 断片ごとに placeholder の本文を置き換え、終了理由にかかわらず最後にログを保存する。

use crate::domain::{Settings, StreamOutcome, StreamSession, StreamState};
use crate::ports::outbound::{ChatCompletion, ChatStore, InterruptChecker};
use common::domain::{ChatId, ModelName};
use common::error::Error;
use common::llm::{ChatRequest, DeltaStream};
use common::msg::Message;
use common::ports::outbound::{now_iso8601, Log, LogLevel, LogRecord};
use std::sync::Arc;

/// 交換ごとの入力（設定は呼び出し側が読み直したもの）
pub struct ExchangeContext<'a> {
    pub settings: &'a Settings,
    pub model: &'a ModelName,
    pub interrupt: &'a dyn InterruptChecker,
}

/// 交換の結果
///
/// `commit` はログ保存の結果。保存に失敗してもメモリ上のログは戻さない。
#[derive(Debug)]
pub struct ExchangeReport {
    pub outcome: StreamOutcome,
    pub assistant_index: usize,
    pub commit: Result<(), Error>,
}

#[derive(Clone)]
pub struct StreamingEngine {
    completion: Arc<dyn ChatCompletion>,
    store: Arc<dyn ChatStore>,
    log: Arc<dyn Log>,
}

impl StreamingEngine {
    pub fn new(
        completion: Arc<dyn ChatCompletion>,
        store: Arc<dyn ChatStore>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            completion,
            store,
            log,
        }
    }

    /// system メッセージ（空でなければ）+ ログ全体
    pub fn build_request(settings: &Settings, model: &ModelName, log: &[Message]) -> ChatRequest {
        let messages = settings
            .system_message()
            .into_iter()
            .chain(log.iter().cloned())
            .collect();
        ChatRequest::streaming(model.to_string(), messages)
    }

    /// prompt を送り、応答を `messages` に反映して保存する。
    /// `on_update` には断片を受け取るたびに現時点の全文を渡す。
    pub fn run_exchange(
        &self,
        chat_id: &ChatId,
        messages: &mut Vec<Message>,
        prompt: &str,
        ctx: &ExchangeContext<'_>,
        on_update: &mut dyn FnMut(&str),
    ) -> Result<ExchangeReport, Error> {
        ctx.interrupt.reset();
        let mut session = StreamSession::new(chat_id.clone());

        messages.push(Message::user(prompt));
        let request = Self::build_request(ctx.settings, ctx.model, messages);

        self.transition(&mut session, StreamState::Requesting)?;
        let opened = self.completion.open_stream(
            &ctx.settings.endpoint_url,
            &ctx.settings.api_key,
            &request,
        );
        let outcome = match opened {
            Err(e) => {
                self.transition(&mut session, StreamState::Failed)?;
                StreamOutcome::Failed(e)
            }
            Ok(mut stream) => {
                self.transition(&mut session, StreamState::Streaming)?;
                messages.push(Message::assistant(""));
                let index = messages.len() - 1;
                session.fix_assistant_index(index)?;
                let outcome = consume(
                    &mut session,
                    stream.as_mut(),
                    &mut messages[index],
                    ctx.interrupt,
                    on_update,
                );
                self.transition(&mut session, outcome.state())?;
                outcome
            }
        };

        // 接続前に失敗した場合もここで placeholder を足して 1 交換として残す
        let assistant_index = match session.assistant_index() {
            Some(i) => i,
            None => {
                messages.push(Message::assistant(""));
                let i = messages.len() - 1;
                session.fix_assistant_index(i)?;
                i
            }
        };
        messages[assistant_index].content = session.final_content(&outcome);

        let commit = self
            .store
            .save_log(chat_id, messages)
            .map_err(|e| e.with_context("Error saving chat"));
        if let Err(ref e) = commit {
            self.log_event(LogLevel::Error, "error", e.to_string(), chat_id, None);
        }
        self.transition(&mut session, StreamState::Idle)?;

        Ok(ExchangeReport {
            outcome,
            assistant_index,
            commit,
        })
    }

    fn transition(&self, session: &mut StreamSession, next: StreamState) -> Result<(), Error> {
        let from = session.state();
        session.transition(next)?;
        let level = match next {
            StreamState::Failed => LogLevel::Warn,
            StreamState::Completed | StreamState::Cancelled => LogLevel::Info,
            _ => LogLevel::Debug,
        };
        // 終端では受け取った文字数と中断の有無も残す
        let summary = next
            .is_terminal()
            .then(|| (session.accumulated().chars().count(), session.is_cancelled()));
        self.log_event(
            level,
            "stream",
            format!("stream {} -> {}", from.as_str(), next.as_str()),
            session.chat_id(),
            summary,
        );
        Ok(())
    }

    fn log_event(
        &self,
        level: LogLevel,
        kind: &str,
        message: String,
        chat_id: &ChatId,
        summary: Option<(usize, bool)>,
    ) {
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("chat_id".to_string(), serde_json::json!(&**chat_id));
        if let Some((chars, cancelled)) = summary {
            fields.insert("chars".to_string(), serde_json::json!(chars));
            fields.insert("cancelled".to_string(), serde_json::json!(cancelled));
        }
        let _ = self.log.log(&LogRecord {
            ts: now_iso8601(),
            level,
            message,
            layer: Some("usecase".to_string()),
            kind: Some(kind.to_string()),
            fields: Some(fields),
        });
    }
}

/// 中断・終端・エラーまで断片を読み、placeholder を更新し続ける
fn consume(
    session: &mut StreamSession,
    stream: &mut dyn DeltaStream,
    placeholder: &mut Message,
    interrupt: &dyn InterruptChecker,
    on_update: &mut dyn FnMut(&str),
) -> StreamOutcome {
    loop {
        if interrupt.is_interrupted() {
            stream.stop();
            return StreamOutcome::Cancelled;
        }
        match stream.next_delta() {
            None => return StreamOutcome::Completed,
            Some(Err(e)) => {
                stream.stop();
                return StreamOutcome::Failed(e);
            }
            Some(Ok(fragment)) => {
                let text = session.push_fragment(&fragment);
                placeholder.content = text.to_string();
                on_update(text);
            }
        }
    }
}
