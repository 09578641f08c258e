//! LLM プロバイダとモデル一覧
//!
//! チャット補完（ストリーミング）は LlmProvider / DeltaStream で抽象化し、
//! OpenAI 互換エンドポイント向けの実装を openai_compat に置く。

pub mod models;
pub mod openai_compat;
pub mod provider;

pub use models::{ListingRequest, ListingStyle};
pub use openai_compat::{OpenAiCompatProvider, SseDeltaStream};
pub use provider::{ChatRequest, DeltaStream, LlmProvider, DEFAULT_MAX_TOKENS};
