//! 1 回のリクエスト/レスポンスの状態（StreamSession）
//!
//! Idle -> Requesting -> Streaming -> {Completed, Cancelled, Failed} -> (commit) -> Idle

use common::domain::ChatId;
use common::error::Error;

/// ストリームの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Requesting,
    Streaming,
    Completed,
    Cancelled,
    Failed,
}

impl StreamState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Streaming => "streaming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    fn can_transition_to(self, next: StreamState) -> bool {
        use StreamState::*;
        matches!(
            (self, next),
            (Idle, Requesting)
                | (Requesting, Streaming)
                | (Requesting, Failed)
                | (Streaming, Completed)
                | (Streaming, Cancelled)
                | (Streaming, Failed)
                | (Completed, Idle)
                | (Cancelled, Idle)
                | (Failed, Idle)
        )
    }
}

/// 終了理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed,
    Cancelled,
    Failed(Error),
}

impl StreamOutcome {
    pub fn state(&self) -> StreamState {
        match self {
            Self::Completed => StreamState::Completed,
            Self::Cancelled => StreamState::Cancelled,
            Self::Failed(_) => StreamState::Failed,
        }
    }
}

/// 失敗時に本文へ付ける注記
pub fn annotate_failure(accumulated: &str, err: &Error) -> String {
    format!("{}\n\n<Request failed: {}>", accumulated, err.message())
}

/// 進行中の 1 交換（永続化しない）
#[derive(Debug, Clone)]
pub struct StreamSession {
    chat_id: ChatId,
    assistant_index: Option<usize>,
    cancelled: bool,
    accumulated: String,
    state: StreamState,
}

impl StreamSession {
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            assistant_index: None,
            cancelled: false,
            accumulated: String::new(),
            state: StreamState::Idle,
        }
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// placeholder の位置（Streaming に入るまで None）
    pub fn assistant_index(&self) -> Option<usize> {
        self.assistant_index
    }

    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// 状態遷移。許されない遷移は Invariant エラー
    pub fn transition(&mut self, next: StreamState) -> Result<(), Error> {
        if !self.state.can_transition_to(next) {
            return Err(Error::invariant(format!(
                "stream state {} cannot move to {}",
                self.state.as_str(),
                next.as_str()
            )));
        }
        if next == StreamState::Cancelled {
            self.cancelled = true;
        }
        self.state = next;
        Ok(())
    }

    /// placeholder の位置を固定する。1 回だけ。
    pub fn fix_assistant_index(&mut self, index: usize) -> Result<(), Error> {
        if self.assistant_index.is_some() {
            return Err(Error::invariant("assistant placeholder already fixed"));
        }
        self.assistant_index = Some(index);
        Ok(())
    }

    /// 断片を足して、現時点の全文を返す
    pub fn push_fragment(&mut self, fragment: &str) -> &str {
        self.accumulated.push_str(fragment);
        &self.accumulated
    }

    /// 終了理由に応じた placeholder の最終本文
    pub fn final_content(&self, outcome: &StreamOutcome) -> String {
        match outcome {
            StreamOutcome::Failed(e) => annotate_failure(&self.accumulated, e),
            StreamOutcome::Completed | StreamOutcome::Cancelled => self.accumulated.clone(),
        }
    }
}
