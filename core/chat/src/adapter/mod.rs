//! アダプタ: ポートの実装（ファイル・HTTP・シグナル）

mod file_chat_store;
mod file_settings_store;
mod memory_store;
mod openai_completion;
mod sequential_chat_id;
mod sigint_checker;
mod stub_completion;

pub use file_chat_store::FileChatStore;
pub use file_settings_store::FileSettingsStore;
pub use openai_completion::OpenAiCompletion;
pub use sequential_chat_id::SequentialChatIdGenerator;
pub use sigint_checker::{CancelFlag, NoopInterruptChecker, SigintChecker};

#[cfg(test)]
pub use memory_store::{MemoryChatStore, MemorySettingsStore, RecordingHttp};
#[cfg(test)]
pub use stub_completion::StubCompletion;
