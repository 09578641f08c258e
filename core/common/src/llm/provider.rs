//! LLM プロバイダのトレイト定義

use crate::error::Error;
use crate::msg::Message;
use serde::Serialize;

/// 1 リクエストあたりのトークン上限
pub const DEFAULT_MAX_TOKENS: u32 = 20000;

/// チャット補完リクエスト（OpenAI 互換の body にそのままシリアライズできる形）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub stream: bool,
}

impl ChatRequest {
    /// ストリーミング要求（max_tokens は DEFAULT_MAX_TOKENS）
    pub fn streaming(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: DEFAULT_MAX_TOKENS,
            stream: true,
        }
    }
}

/// テキスト断片の遅延列
///
/// `next_delta` は呼ばれた時点で次の断片を読みに行く。`stop` 後はそれ以上読まない。
/// 断片は空文字列のこともある。
pub trait DeltaStream: Send {
    /// 次の断片。`None` でストリーム終端
    fn next_delta(&mut self) -> Option<Result<String, Error>>;

    /// 以降の断片を要求しない（接続を手放す。サーバ側の生成が止まる保証はない）
    fn stop(&mut self);
}

/// LLM プロバイダのトレイト
///
/// 各プロバイダ（OpenAI 互換など）はこのトレイトを実装する。
pub trait LlmProvider {
    /// リクエストを送信し、受理されたら断片ストリームを返す
    ///
    /// # Returns
    /// * `Ok(Box<dyn DeltaStream>)` - 応答本文を読み進めるストリーム
    /// * `Err(Error)` - 接続失敗・エラーステータス（Error::Stream）
    fn open_stream(&self, request: &ChatRequest) -> Result<Box<dyn DeltaStream>, Error>;
}
